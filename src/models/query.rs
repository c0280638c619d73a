// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query parameters for the list endpoints.
//!
//! Unset values are left out of the query string, and so are numeric zeros:
//! the service treats a missing `page` as page 1 and we never want to send
//! `page=0`.

use super::SubscriptionType;

type Pairs = Vec<(&'static str, String)>;

fn push_num<N: PartialEq + Default + ToString>(pairs: &mut Pairs, key: &'static str, value: Option<N>) {
    if let Some(v) = value.filter(|v| *v != N::default()) {
        pairs.push((key, v.to_string()));
    }
}

fn push_str(pairs: &mut Pairs, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        pairs.push((key, v.to_string()));
    }
}

/// Plain pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        pairs
    }
}

/// `GET /gyms` pagination and sort key (e.g. `name`, `-rating`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GymQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

impl GymQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_str(&mut pairs, "sort", self.sort.as_deref());
        pairs
    }
}

/// `GET /gyms` proximity search. `near` is `"lat,lon"` or a place name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GymSearchQuery {
    pub near: Option<String>,
    pub radius: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl GymSearchQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_str(&mut pairs, "near", self.near.as_deref());
        push_num(&mut pairs, "radius", self.radius);
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        pairs
    }
}

/// `GET /locations` pagination and proximity filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub near: Option<String>,
    pub radius: Option<f64>,
}

impl LocationQuery {
    /// Nearby search as the location page issues it: first 20 results.
    pub fn near_point(latitude: f64, longitude: f64, radius: f64) -> Self {
        Self {
            page: Some(1),
            limit: Some(20),
            near: Some(format!("{latitude},{longitude}")),
            radius: Some(radius),
        }
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_str(&mut pairs, "near", self.near.as_deref());
        push_num(&mut pairs, "radius", self.radius);
        pairs
    }
}

/// `GET /subscription-listings` filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionQuery {
    pub gym_id: Option<String>,
    pub kind: Option<SubscriptionType>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SubscriptionQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_str(&mut pairs, "gymId", self.gym_id.as_deref());
        push_str(&mut pairs, "type", self.kind.map(SubscriptionType::as_str));
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        pairs
    }
}
