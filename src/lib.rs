// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! NiyoFit client: discover and book pay-per-day gym access.
//!
//! This crate provides the API gateway client for the NiyoFit platform and
//! the session store that owns the logged-in user, its bearer token and the
//! persisted copy of both.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use config::Config;
use error::ClientError;
use services::{ApiClient, Navigator, SessionStore};
use storage::CredentialStore;

/// Shared application context handed to the UI layer.
pub struct AppContext {
    pub config: Config,
    pub api: Arc<ApiClient>,
    pub session: SessionStore<ApiClient>,
}

impl AppContext {
    /// Wire the API client and session store together.
    pub fn new(
        config: Config,
        storage: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let api = Arc::new(ApiClient::new(&config)?);
        let session = SessionStore::new(api.clone(), storage, navigator)
            .with_serialized_ops(config.serialize_session_ops);

        Ok(Self {
            config,
            api,
            session,
        })
    }
}
