// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API access and session logic.

pub mod api;
pub mod directory;
pub mod gateway;
pub mod guard;
pub mod navigation;
pub mod session;

pub use api::ApiClient;
pub use directory::{GymFilter, GymSort};
pub use gateway::AuthGateway;
pub use guard::{
    redirect_if_authenticated, require_admin, require_authenticated, GuardDecision, PageAccess,
};
pub use navigation::{Navigator, RecordingNavigator, TracingNavigator};
pub use session::{AuthFailure, SessionPhase, SessionSnapshot, SessionStore};
