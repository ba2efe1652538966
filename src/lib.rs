//! Care Match - finds care-providing organizations and ranks them for a requester
//!
//! This library provides the matching and ranking engine: a weighted,
//! partially-applicable scoring function over directory records, enriched with
//! aggregated ratings fetched concurrently from a reputation store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, haversine_distance, parse_business_hours};
pub use crate::models::{OrganizationRecord, RequesterPreferences, ScoredOrganization, ScoreBreakdown, ScoringWeights, Rating};
pub use crate::services::{SearchService, SearchError, OrganizationDirectory, ReputationAggregator};
