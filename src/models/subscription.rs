// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription listings (day passes, monthly plans, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plan length category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Custom,
}

impl SubscriptionType {
    /// Query-string value.
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionType::Daily => "daily",
            SubscriptionType::Weekly => "weekly",
            SubscriptionType::Monthly => "monthly",
            SubscriptionType::Quarterly => "quarterly",
            SubscriptionType::Yearly => "yearly",
            SubscriptionType::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

/// Time-limited discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub valid_until: DateTime<Utc>,
}

/// A purchasable plan at one gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionListing {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    pub duration_in_days: u32,
    pub gym_id: String,
    pub cost: f64,
    pub currency: String,
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

impl SubscriptionListing {
    /// Price after any discount still valid at `now`. Never negative.
    pub fn effective_cost(&self, now: DateTime<Utc>) -> f64 {
        let Some(discount) = self.discount.as_ref().filter(|d| d.valid_until > now) else {
            return self.cost;
        };

        let reduced = match discount.kind {
            DiscountKind::Percentage => self.cost * (1.0 - discount.amount.clamp(0.0, 100.0) / 100.0),
            DiscountKind::Fixed => self.cost - discount.amount,
        };
        reduced.max(0.0)
    }
}

/// One page of `GET /subscription-listings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionList {
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionListing>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
}
