// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym directory view helpers.
//!
//! The service paginates and sorts; the directory page then narrows the
//! fetched page by price tier, free-text search, rating and facilities.

use std::cmp::Ordering;

use chrono::Weekday;

use crate::models::{Gym, GymList, PriceRange};

/// Client-side narrowing of a fetched gym page. Empty fields match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GymFilter {
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
    pub price_range: Option<PriceRange>,
    /// Gyms without a rating never pass a rating filter
    pub min_rating: Option<f32>,
    /// Every listed facility must be offered
    pub facilities: Vec<String>,
}

impl GymFilter {
    pub fn matches(&self, gym: &Gym) -> bool {
        if let Some(range) = self.price_range {
            if gym.price_range != Some(range) {
                return false;
            }
        }

        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let in_name = gym.name.to_lowercase().contains(&term);
            let in_description = gym
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));
            if !in_name && !in_description {
                return false;
            }
        }

        if let Some(min) = self.min_rating {
            if !gym.rating.is_some_and(|r| r >= min) {
                return false;
            }
        }

        self.facilities.iter().all(|wanted| {
            gym.facilities
                .iter()
                .any(|offered| offered.eq_ignore_ascii_case(wanted))
        })
    }
}

/// Apply a filter to a fetched page, keeping the service's order.
pub fn apply(list: &GymList, filter: &GymFilter) -> Vec<Gym> {
    list.gyms
        .iter()
        .filter(|gym| filter.matches(gym))
        .cloned()
        .collect()
}

/// Sort orders offered by the directory page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GymSort {
    #[default]
    Name,
    RatingDesc,
    Newest,
}

impl GymSort {
    /// Sort key understood by `GET /gyms?sort=`.
    pub fn as_query(self) -> &'static str {
        match self {
            GymSort::Name => "name",
            GymSort::RatingDesc => "-rating",
            GymSort::Newest => "-createdAt",
        }
    }
}

impl std::str::FromStr for GymSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(GymSort::Name),
            "rating" | "-rating" => Ok(GymSort::RatingDesc),
            "newest" | "-createdAt" => Ok(GymSort::Newest),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Stable sort in place. Missing ratings and dates go last.
pub fn sort_gyms(gyms: &mut [Gym], order: GymSort) {
    match order {
        GymSort::Name => gyms.sort_by_key(|g| g.name.to_lowercase()),
        GymSort::RatingDesc => gyms.sort_by(|a, b| match (a.rating, b.rating) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        GymSort::Newest => gyms.sort_by(|a, b| match (a.created_at, b.created_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}

/// Opening hours line shown on a gym card for the given day.
pub fn opening_hours_label(gym: &Gym, day: Weekday) -> String {
    match gym.opening_hours.for_weekday(day) {
        Some(hours) if hours.closed => "Closed today".to_string(),
        Some(hours) => format!("{} - {}", hours.open, hours.close),
        None => "Hours not available".to_string(),
    }
}
