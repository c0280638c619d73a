// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The slice of the API client the session store depends on.
//!
//! Kept as a trait so session logic can run against a scripted fake.

use std::future::Future;

use crate::error::Result;
use crate::models::{ApiResponse, AuthPayload, LoginRequest, RegisterRequest, VerifyPayload};
use crate::services::ApiClient;

/// Auth operations plus the token slot they read from.
pub trait AuthGateway: Send + Sync {
    /// Replace the bearer token used by subsequent calls.
    fn set_token(&self, token: Option<String>);

    fn login_user(
        &self,
        credentials: &LoginRequest,
    ) -> impl Future<Output = Result<ApiResponse<AuthPayload>>> + Send;

    fn register_user(
        &self,
        user: &RegisterRequest,
    ) -> impl Future<Output = Result<ApiResponse<AuthPayload>>> + Send;

    fn logout_user(&self) -> impl Future<Output = Result<()>> + Send;

    fn verify_token(&self) -> impl Future<Output = Result<ApiResponse<VerifyPayload>>> + Send;
}

impl AuthGateway for ApiClient {
    fn set_token(&self, token: Option<String>) {
        ApiClient::set_token(self, token);
    }

    async fn login_user(&self, credentials: &LoginRequest) -> Result<ApiResponse<AuthPayload>> {
        ApiClient::login_user(self, credentials).await
    }

    async fn register_user(&self, user: &RegisterRequest) -> Result<ApiResponse<AuthPayload>> {
        ApiClient::register_user(self, user).await
    }

    async fn logout_user(&self) -> Result<()> {
        ApiClient::logout_user(self).await
    }

    async fn verify_token(&self) -> Result<ApiResponse<VerifyPayload>> {
        ApiClient::verify_token(self).await
    }
}
