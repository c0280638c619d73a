// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wire models for the gym platform API.

pub mod auth;
pub mod gym;
pub mod location;
pub mod query;
pub mod response;
pub mod review;
pub mod subscription;
pub mod user;

pub use auth::{AuthPayload, LoginRequest, RegisterRequest, VerifyPayload};
pub use gym::{Contact, DayHours, Gym, GymList, GymUpdate, NewGym, OpeningHours, PriceRange};
pub use location::{Address, AddressUpdate, GeoPoint, Location, LocationList, LocationUpdate, NewLocation};
pub use query::{GymQuery, GymSearchQuery, LocationQuery, PageQuery, SubscriptionQuery};
pub use response::{ApiResponse, Deleted, Health};
pub use review::{GymReview, NewGymReview};
pub use subscription::{Discount, DiscountKind, SubscriptionList, SubscriptionListing, SubscriptionType};
pub use user::{User, UserType};
