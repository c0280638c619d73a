// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side redirects.

use std::sync::Mutex;

/// Route paths the session layer redirects to.
pub mod routes {
    pub const LOGIN: &str = "/login";
    pub const DASHBOARD: &str = "/dashboard";
}

/// Whatever renders pages: browser router, TUI, CLI.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator for headless use: just logs the redirect.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "Redirect");
    }
}

/// Navigator that remembers every redirect, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        match self.visits.lock() {
            Ok(visits) => visits.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        match self.visits.lock() {
            Ok(mut visits) => visits.push(path.to_string()),
            Err(poisoned) => poisoned.into_inner().push(path.to_string()),
        }
    }
}
