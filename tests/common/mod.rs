// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use niyofit_client::error::{ClientError, Result};
use niyofit_client::models::{
    ApiResponse, AuthPayload, LoginRequest, RegisterRequest, User, VerifyPayload,
};
use niyofit_client::services::{AuthGateway, RecordingNavigator, SessionStore};
use niyofit_client::storage::{keys, MemoryStore};
use serde_json::{json, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Scripted gateway for session tests
// ─────────────────────────────────────────────────────────────────────────────

/// What the fake service does for one call.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Reply<T> {
    Envelope(ApiResponse<T>),
    NetworkError,
    /// Refused before anything was sent.
    Invalid(String),
}

/// One recorded gateway call and the token held when it was made.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: &'static str,
    pub token: Option<String>,
}

/// Gateway answering from per-operation queues. An empty queue answers
/// with a network error.
#[derive(Default)]
pub struct FakeGateway {
    token: Mutex<Option<String>>,
    login: Mutex<VecDeque<(Duration, Reply<AuthPayload>)>>,
    register: Mutex<VecDeque<Reply<AuthPayload>>>,
    verify: Mutex<VecDeque<(Duration, Reply<VerifyPayload>)>>,
    logout_fails: Mutex<bool>,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_login(self, reply: Reply<AuthPayload>) -> Self {
        self.on_login_after(Duration::ZERO, reply)
    }

    pub fn on_login_after(self, delay: Duration, reply: Reply<AuthPayload>) -> Self {
        self.login.lock().unwrap().push_back((delay, reply));
        self
    }

    pub fn on_register(self, reply: Reply<AuthPayload>) -> Self {
        self.register.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_verify(self, reply: Reply<VerifyPayload>) -> Self {
        self.on_verify_after(Duration::ZERO, reply)
    }

    pub fn on_verify_after(self, delay: Duration, reply: Reply<VerifyPayload>) -> Self {
        self.verify.lock().unwrap().push_back((delay, reply));
        self
    }

    pub fn failing_logout(self) -> Self {
        *self.logout_fails.lock().unwrap() = true;
        self
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.op).collect()
    }

    fn record(&self, op: &'static str) {
        let token = self.token();
        self.calls.lock().unwrap().push(Call { op, token });
    }
}

/// Wait out a scripted delay, then answer.
async fn answer_after<T>(next: Option<(Duration, Reply<T>)>) -> Result<ApiResponse<T>> {
    let (delay, reply) = match next {
        Some((delay, reply)) => (delay, Some(reply)),
        None => (Duration::ZERO, None),
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    answer(reply)
}

fn answer<T>(reply: Option<Reply<T>>) -> Result<ApiResponse<T>> {
    match reply {
        Some(Reply::Envelope(envelope)) => Ok(envelope),
        Some(Reply::Invalid(reason)) => Err(ClientError::Validation(reason)),
        Some(Reply::NetworkError) | None => {
            Err(ClientError::Transport("connection refused".to_string()))
        }
    }
}

impl AuthGateway for FakeGateway {
    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    async fn login_user(&self, _credentials: &LoginRequest) -> Result<ApiResponse<AuthPayload>> {
        self.record("login");
        let next = self.login.lock().unwrap().pop_front();
        answer_after(next).await
    }

    async fn register_user(&self, _user: &RegisterRequest) -> Result<ApiResponse<AuthPayload>> {
        self.record("register");
        let reply = self.register.lock().unwrap().pop_front();
        answer(reply)
    }

    async fn logout_user(&self) -> Result<()> {
        self.record("logout");
        if *self.logout_fails.lock().unwrap() {
            return Err(ClientError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    async fn verify_token(&self) -> Result<ApiResponse<VerifyPayload>> {
        self.record("verify");
        let next = self.verify.lock().unwrap().pop_front();
        answer_after(next).await
    }
}

/// Session store over a fake gateway and in-memory storage.
pub struct Harness {
    pub session: SessionStore<FakeGateway>,
    pub gateway: Arc<FakeGateway>,
    pub storage: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
}

#[allow(dead_code)]
impl Harness {
    pub fn new(gateway: FakeGateway, storage: MemoryStore) -> Self {
        let gateway = Arc::new(gateway);
        let storage = Arc::new(storage);
        let navigator = Arc::new(RecordingNavigator::new());
        let session = SessionStore::new(gateway.clone(), storage.clone(), navigator.clone());
        Self {
            session,
            gateway,
            storage,
            navigator,
        }
    }

    pub fn serialized(self) -> Self {
        Self {
            session: self.session.with_serialized_ops(true),
            gateway: self.gateway,
            storage: self.storage,
            navigator: self.navigator,
        }
    }

    /// A fresh session over the same storage, as after an app restart.
    pub fn restart(&self, gateway: FakeGateway) -> Self {
        let gateway = Arc::new(gateway);
        let navigator = Arc::new(RecordingNavigator::new());
        let session = SessionStore::new(gateway.clone(), self.storage.clone(), navigator.clone());
        Self {
            session,
            gateway,
            storage: self.storage.clone(),
            navigator,
        }
    }

    pub fn stored_token(&self) -> Option<String> {
        self.storage.snapshot().unwrap().get(keys::TOKEN).cloned()
    }

    /// Snapshot, gateway and storage all hold the same token (or none).
    pub fn assert_token_agrees(&self) {
        let snapshot = self.session.snapshot();
        assert_eq!(
            snapshot.auth_token,
            self.gateway.token(),
            "session and gateway disagree"
        );
        assert_eq!(
            snapshot.auth_token,
            self.stored_token(),
            "session and storage disagree"
        );
        assert_eq!(snapshot.user, self.stored_user(), "stored user differs");
        assert_eq!(snapshot.user.is_some(), snapshot.auth_token.is_some());
    }

    pub fn stored_user(&self) -> Option<User> {
        self.storage
            .snapshot()
            .unwrap()
            .get(keys::USER)
            .map(|raw| serde_json::from_str(raw).unwrap())
    }
}

#[allow(dead_code)]
pub fn jo() -> User {
    User::new("u1", "Jo Lee", "jo@x.com")
}

#[allow(dead_code)]
pub fn auth_ok(user: User, token: &str) -> Reply<AuthPayload> {
    Reply::Envelope(ApiResponse::ok(AuthPayload {
        user,
        token: token.to_string(),
    }))
}

#[allow(dead_code)]
pub fn verified(user: User) -> Reply<VerifyPayload> {
    Reply::Envelope(ApiResponse::ok(VerifyPayload { user: Some(user) }))
}

/// Storage holding a previously persisted session.
#[allow(dead_code)]
pub fn persisted(token: &str, user: &User) -> MemoryStore {
    let user_json = serde_json::to_string(user).unwrap();
    MemoryStore::with_entries([(keys::TOKEN, token), (keys::USER, user_json.as_str())])
}

// ─────────────────────────────────────────────────────────────────────────────
// In-process mock of the remote service
// ─────────────────────────────────────────────────────────────────────────────

/// One request as the mock service saw it.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

/// Requests and JSON bodies received by the mock service.
#[derive(Clone, Default)]
pub struct Recorder {
    pub requests: Arc<Mutex<Vec<Seen>>>,
    pub bodies: Arc<Mutex<Vec<Value>>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn requests(&self) -> Vec<Seen> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_to(&self, path: &str) -> Option<Seen> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

async fn record(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    let seen = {
        let headers = request.headers();
        let header_value = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Seen {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
        }
    };
    recorder.requests.lock().unwrap().push(seen);
    next.run(request).await
}

/// Token the mock service issues on login and accepts on verify.
pub const SERVICE_TOKEN: &str = "tok-service";

fn gym_json(id: &str) -> Value {
    json!({
        "_id": id,
        "name": "Iron Temple",
        "locationId": "l1",
        "priceRange": "premium",
        "rating": 4.7,
        "isActive": true
    })
}

async fn login_user(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Response {
    recorder.bodies.lock().unwrap().push(body.clone());
    if body["password"] == "pw" {
        Json(json!({
            "success": true,
            "data": {
                "user": {"_id": "u1", "name": "Jo Lee", "email": body["email"]},
                "token": SERVICE_TOKEN
            }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn register_user(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Response {
    recorder.bodies.lock().unwrap().push(body.clone());
    if body["email"] == "taken@x.com" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"success": false, "message": "Email already registered"})),
        )
            .into_response();
    }
    Json(json!({
        "success": true,
        "data": {
            "user": {"id": "u2", "name": body["name"], "email": body["email"], "userType": body["userType"]},
            "token": "tok-new"
        }
    }))
    .into_response()
}

async fn verify_token(request: Request) -> Response {
    let expected = format!("Bearer {SERVICE_TOKEN}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .is_some_and(|v| v.as_bytes() == expected.as_bytes());
    if authorized {
        Json(json!({
            "success": true,
            "data": {"user": {"_id": "u1", "name": "Jo Lee", "email": "jo@x.com"}}
        }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

async fn get_gym(Path(id): Path<String>) -> Response {
    if id == "g1" {
        Json(json!({"success": true, "data": gym_json("g1")})).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Gym not found"})),
        )
            .into_response()
    }
}

async fn create_review(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Json<Value> {
    recorder.bodies.lock().unwrap().push(body.clone());
    Json(json!({
        "success": true,
        "data": {"_id": "r1", "gymId": body["gymId"], "userId": "u1", "rating": body["rating"]}
    }))
}

/// Router mimicking the platform API under `/api/v1`.
pub fn mock_service(recorder: Recorder) -> Router {
    let api = Router::new()
        .route("/auth/login-user", post(login_user))
        .route("/auth/register-user", post(register_user))
        .route("/auth/verify-token", get(verify_token))
        .route(
            "/auth/logout",
            post(|| async { Json(json!({"success": true, "message": "Logged out"})) }),
        )
        .route(
            "/gyms",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": {"gyms": [gym_json("g1")], "total": 1, "page": 1, "pages": 1}
                }))
            }),
        )
        .route("/gyms/{id}", get(get_gym))
        .route(
            "/gyms/{id}/subscription-listings",
            get(|| async { Json(json!({"success": true, "data": []})) }),
        )
        .route(
            "/locations",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": {"locations": [], "total": 0, "page": 1, "pages": 0}
                }))
            }),
        )
        .route(
            "/gym-reviews/gym/{gym_id}",
            get(|| async { Json(json!({"success": true, "data": []})) }),
        )
        .route("/gym-reviews", post(create_review))
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": {"status": "ok", "timestamp": "2026-01-01T00:00:00Z", "uptime": 12.5, "environment": "test"}
                }))
            }),
        )
        .with_state(recorder.clone());

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(recorder, record))
}

/// Serve `router` on an ephemeral port; returns the API base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

/// Start the mock service; returns its base URL and request log.
#[allow(dead_code)]
pub async fn start_mock_service() -> (String, Recorder) {
    let recorder = Recorder::default();
    let base_url = spawn(mock_service(recorder.clone())).await;
    (base_url, recorder)
}

/// Base URL on a port nothing listens on.
#[allow(dead_code)]
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1")
}
