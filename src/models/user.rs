// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model as returned by the auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role. Self-registered accounts are `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Customer,
    Member,
    Admin,
    Superadmin,
}

impl UserType {
    /// Whether this role may use the admin console.
    pub fn is_admin(self) -> bool {
        matches!(self, UserType::Admin | UserType::Superadmin)
    }
}

/// Authenticated user.
///
/// Only `id`, `name` and `email` are guaranteed; the rest is whatever the
/// service chose to include.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireUser")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Minimal user record.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: None,
            user_type: None,
            is_active: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the user may manage gyms and locations.
    pub fn is_admin(&self) -> bool {
        self.user_type.is_some_and(UserType::is_admin)
    }
}

/// On the wire the identifier shows up as `id`, `_id`, or both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    user_type: Option<UserType>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<WireUser> for User {
    type Error = String;

    fn try_from(wire: WireUser) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .or(wire.object_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "user record has no id".to_string())?;

        Ok(Self {
            id,
            name: wire.name,
            email: wire.email,
            phone: wire.phone,
            user_type: wire.user_type,
            is_active: wire.is_active,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}
