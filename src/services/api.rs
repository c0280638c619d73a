// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym platform API client.
//!
//! Single chokepoint for every outbound call:
//! - Base URL and version prefix
//! - Default headers, including the bearer token when one is held
//! - Envelope parsing and the split between application failures
//!   (`Ok` with `success = false`) and transport failures (`Err`)
//!
//! The client never touches persisted storage; the session store decides
//! which token it holds.

use std::sync::RwLock;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{
    ApiResponse, AuthPayload, Deleted, Gym, GymList, GymQuery, GymReview, GymSearchQuery,
    GymUpdate, Health, Location, LocationList, LocationQuery, LocationUpdate, LoginRequest,
    NewGym, NewGymReview, NewLocation, PageQuery, RegisterRequest, SubscriptionList,
    SubscriptionListing, SubscriptionQuery, VerifyPayload,
};

/// Default search radius for nearby lookups (km).
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

/// HTTP client for the gym platform API.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a client for the configured base URL, holding no token.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the credential used by all subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    /// Currently held bearer token.
    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    // ─── Auth ────────────────────────────────────────────────────────────────

    /// `POST /auth/register-user`. Sends `userType: "customer"` unless set.
    pub async fn register_user(
        &self,
        user: &RegisterRequest,
    ) -> Result<ApiResponse<AuthPayload>> {
        let body = user.with_default_role();
        self.send(self.request(Method::POST, "/auth/register-user").json(&body))
            .await
    }

    /// `POST /auth/login-user`.
    pub async fn login_user(&self, credentials: &LoginRequest) -> Result<ApiResponse<AuthPayload>> {
        self.send(self.request(Method::POST, "/auth/login-user").json(credentials))
            .await
    }

    /// `POST /auth/logout`.
    ///
    /// Only transport problems and server errors are reported; the body is
    /// ignored since callers clean up locally either way.
    pub async fn logout_user(&self) -> Result<()> {
        let response = self.request(Method::POST, "/auth/logout").send().await?;
        let status = response.status();
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http { status, body });
        }
        tracing::debug!(status = status.as_u16(), "Logout acknowledged");
        Ok(())
    }

    /// `GET /auth/verify-token` using the held token.
    pub async fn verify_token(&self) -> Result<ApiResponse<VerifyPayload>> {
        self.send(self.request(Method::GET, "/auth/verify-token"))
            .await
    }

    // ─── Gyms ────────────────────────────────────────────────────────────────

    /// `GET /gyms?page&limit&sort`.
    pub async fn get_gyms(&self, query: &GymQuery) -> Result<ApiResponse<GymList>> {
        self.send(self.request(Method::GET, "/gyms").query(&query.pairs()))
            .await
    }

    /// `GET /gyms?near&radius&page&limit`.
    pub async fn search_gyms(&self, query: &GymSearchQuery) -> Result<ApiResponse<GymList>> {
        self.send(self.request(Method::GET, "/gyms").query(&query.pairs()))
            .await
    }

    /// `GET /gyms/:id`.
    pub async fn get_gym_by_id(&self, id: &str) -> Result<ApiResponse<Gym>> {
        let path = format!("/gyms/{}", urlencoding::encode(id));
        self.send(self.request(Method::GET, &path)).await
    }

    /// `POST /gyms`.
    pub async fn create_gym(&self, gym: &NewGym) -> Result<ApiResponse<Gym>> {
        self.send(self.request(Method::POST, "/gyms").json(gym)).await
    }

    /// `PUT /gyms/:id` with only the fields being changed.
    pub async fn update_gym(&self, id: &str, update: &GymUpdate) -> Result<ApiResponse<Gym>> {
        let path = format!("/gyms/{}", urlencoding::encode(id));
        self.send(self.request(Method::PUT, &path).json(update)).await
    }

    /// `DELETE /gyms/:id`.
    pub async fn delete_gym(&self, id: &str) -> Result<ApiResponse<Deleted>> {
        let path = format!("/gyms/{}", urlencoding::encode(id));
        self.send(self.request(Method::DELETE, &path)).await
    }

    /// `GET /gyms/:id/subscription-listings`.
    pub async fn get_gym_subscription_listings(
        &self,
        gym_id: &str,
    ) -> Result<ApiResponse<Vec<SubscriptionListing>>> {
        let path = format!("/gyms/{}/subscription-listings", urlencoding::encode(gym_id));
        self.send(self.request(Method::GET, &path)).await
    }

    // ─── Locations ───────────────────────────────────────────────────────────

    /// `GET /locations?page&limit&near&radius`.
    pub async fn get_locations(&self, query: &LocationQuery) -> Result<ApiResponse<LocationList>> {
        self.send(self.request(Method::GET, "/locations").query(&query.pairs()))
            .await
    }

    /// Locations within `radius` km of a point (first 20).
    pub async fn search_gyms_by_location(
        &self,
        latitude: f64,
        longitude: f64,
        radius: Option<f64>,
    ) -> Result<ApiResponse<LocationList>> {
        let query = LocationQuery::near_point(
            latitude,
            longitude,
            radius.unwrap_or(DEFAULT_SEARCH_RADIUS_KM),
        );
        self.get_locations(&query).await
    }

    /// `POST /locations`.
    pub async fn create_location(&self, location: &NewLocation) -> Result<ApiResponse<Location>> {
        self.send(self.request(Method::POST, "/locations").json(location))
            .await
    }

    /// `PUT /locations/:id`.
    pub async fn update_location(
        &self,
        id: &str,
        update: &LocationUpdate,
    ) -> Result<ApiResponse<Location>> {
        let path = format!("/locations/{}", urlencoding::encode(id));
        self.send(self.request(Method::PUT, &path).json(update)).await
    }

    /// `DELETE /locations/:id`.
    pub async fn delete_location(&self, id: &str) -> Result<ApiResponse<Deleted>> {
        let path = format!("/locations/{}", urlencoding::encode(id));
        self.send(self.request(Method::DELETE, &path)).await
    }

    // ─── Subscriptions & reviews ─────────────────────────────────────────────

    /// `GET /subscription-listings?gymId&type&page&limit`.
    pub async fn get_subscription_listings(
        &self,
        query: &SubscriptionQuery,
    ) -> Result<ApiResponse<SubscriptionList>> {
        self.send(
            self.request(Method::GET, "/subscription-listings")
                .query(&query.pairs()),
        )
        .await
    }

    /// `GET /gym-reviews/gym/:gymId?page&limit`.
    pub async fn get_gym_reviews(
        &self,
        gym_id: &str,
        page: &PageQuery,
    ) -> Result<ApiResponse<Vec<GymReview>>> {
        let path = format!("/gym-reviews/gym/{}", urlencoding::encode(gym_id));
        self.send(self.request(Method::GET, &path).query(&page.pairs()))
            .await
    }

    /// `POST /gym-reviews`. Rejects out-of-range ratings before sending.
    pub async fn create_gym_review(&self, review: &NewGymReview) -> Result<ApiResponse<GymReview>> {
        review.validate()?;
        self.send(self.request(Method::POST, "/gym-reviews").json(review))
            .await
    }

    /// `GET /health`.
    pub async fn health_check(&self) -> Result<ApiResponse<Health>> {
        self.send(self.request(Method::GET, "/health")).await
    }

    // ─── Plumbing ────────────────────────────────────────────────────────────

    /// Request builder with the default header set.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, path, "API request");

        let builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the envelope.
    ///
    /// - 2xx: the body must be an envelope, otherwise `Decode`.
    /// - Non-2xx with an envelope body: returned as-is (application failure),
    ///   except 5xx which is always `Http`.
    /// - 401/403 with a non-envelope body: synthesized rejection envelope.
    /// - Anything else: `Http`.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "API request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "API server error");
            return Err(ClientError::Http { status, body });
        }

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(e) if status.is_success() => Err(ClientError::Decode(e.to_string())),
            Err(_) if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Ok(ApiResponse::failure(format!("HTTP {}", status.as_u16())))
            }
            Err(_) => Err(ClientError::Http { status, body }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_slot() {
        let client = ApiClient::new(&Config::test_default()).unwrap();
        assert!(client.token().is_none());

        client.set_token(Some("tok1".to_string()));
        assert_eq!(client.token().as_deref(), Some("tok1"));

        client.set_token(None);
        assert!(client.token().is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let mut config = Config::test_default();
        config.api_base_url = "http://localhost:4170/api/v1/".to_string();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4170/api/v1");
    }
}
