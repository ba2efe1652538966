use crate::core::Matcher;
use crate::models::{GeoPoint, OrganizationRecord, Rating, RequesterPreferences, ScoredOrganization};
use crate::services::directory::OrganizationDirectory;
use crate::services::reputation::ReputationAggregator;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

/// Errors returned to callers of the search entry points
///
/// Only malformed queries are errors; an unavailable directory or rating
/// store degrades to fewer results instead.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Ranks organizations from the directory for a requester
///
/// All query shapes share the same pipeline: fetch from the directory,
/// score and sort, then attach aggregated ratings.
#[derive(Clone)]
pub struct SearchService {
    directory: Arc<dyn OrganizationDirectory>,
    reputation: Arc<dyn ReputationAggregator>,
    matcher: Matcher,
}

impl SearchService {
    pub fn new(
        directory: Arc<dyn OrganizationDirectory>,
        reputation: Arc<dyn ReputationAggregator>,
        matcher: Matcher,
    ) -> Self {
        Self {
            directory,
            reputation,
            matcher,
        }
    }

    /// Rank organizations in a zipcode
    pub async fn search_by_zipcode(
        &self,
        zipcode: &str,
        preferences: &RequesterPreferences,
    ) -> Result<Vec<ScoredOrganization>, SearchError> {
        let zipcode = require("zipcode", zipcode)?;

        let organizations = match self.directory.fetch_by_zipcode(zipcode).await {
            Ok(orgs) => orgs,
            Err(e) => {
                tracing::warn!("Directory lookup for zipcode {} failed: {}", zipcode, e);
                vec![]
            }
        };

        Ok(self.assemble(organizations, preferences).await)
    }

    /// Rank organizations around a point; distance scoring applies
    ///
    /// The point becomes the requester's location for scoring, and the
    /// preferences' radius bounds the directory query.
    pub async fn search_by_location(
        &self,
        latitude: f64,
        longitude: f64,
        preferences: &RequesterPreferences,
    ) -> Result<Vec<ScoredOrganization>, SearchError> {
        if !(latitude.is_finite() && longitude.is_finite()) {
            return Err(SearchError::InvalidQuery(format!(
                "coordinates must be finite, got ({}, {})",
                latitude, longitude
            )));
        }
        let radius = preferences.radius;
        if !radius.is_finite() || radius < 0.0 {
            return Err(SearchError::InvalidQuery(format!("invalid radius {}", radius)));
        }

        let organizations = match self
            .directory
            .fetch_by_location(latitude, longitude, radius)
            .await
        {
            Ok(orgs) => orgs,
            Err(e) => {
                tracing::warn!(
                    "Directory lookup near ({}, {}) within {}mi failed: {}",
                    latitude,
                    longitude,
                    radius,
                    e
                );
                vec![]
            }
        };

        let anchored = RequesterPreferences {
            user_location: Some(GeoPoint::new(latitude, longitude)),
            ..preferences.clone()
        };

        Ok(self.assemble(organizations, &anchored).await)
    }

    /// Rank organizations in a city
    pub async fn search_by_state_city(
        &self,
        state: &str,
        city: &str,
        preferences: &RequesterPreferences,
    ) -> Result<Vec<ScoredOrganization>, SearchError> {
        let state = require("state", state)?;
        let city = require("city", city)?;

        let organizations = match self.directory.fetch_by_state_city(state, city).await {
            Ok(orgs) => orgs,
            Err(e) => {
                tracing::warn!("Directory lookup for {}, {} failed: {}", city, state, e);
                vec![]
            }
        };

        Ok(self.assemble(organizations, preferences).await)
    }

    /// Score a single organization by id
    ///
    /// Returns `Ok(None)` when the directory does not know the id or cannot
    /// be reached.
    pub async fn get_by_id(
        &self,
        id: &str,
        preferences: &RequesterPreferences,
    ) -> Result<Option<ScoredOrganization>, SearchError> {
        let id = require("id", id)?;

        let organization = match self.directory.fetch_by_id(id).await {
            Ok(Some(org)) => org,
            Ok(None) => {
                tracing::debug!("Organization {} not found", id);
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!("Directory lookup for organization {} failed: {}", id, e);
                return Ok(None);
            }
        };

        Ok(self.assemble(vec![organization], preferences).await.pop())
    }

    /// Score, sort and attach ratings to a batch of directory records
    pub async fn assemble(
        &self,
        organizations: Vec<OrganizationRecord>,
        preferences: &RequesterPreferences,
    ) -> Vec<ScoredOrganization> {
        let candidates = organizations.len();
        let mut ranked = self.matcher.rank(preferences, organizations);

        let ratings = self.fetch_ratings(&ranked).await;
        for scored in &mut ranked {
            scored.rating = ratings
                .get(&scored.organization.id)
                .copied()
                .unwrap_or_default();
        }

        tracing::info!(
            "Ranked {} organizations (top score: {})",
            candidates,
            ranked.first().map(|s| s.match_score).unwrap_or(0.0)
        );

        ranked
    }

    /// Look up every distinct id concurrently
    ///
    /// Each lookup stands alone: an error, panic or cancellation of one task
    /// leaves that id at the zero rating and the others untouched.
    async fn fetch_ratings(&self, ranked: &[ScoredOrganization]) -> HashMap<String, Rating> {
        let mut lookups = JoinSet::new();
        let mut seen = HashSet::new();

        for scored in ranked {
            let id = scored.organization.id.clone();
            if !seen.insert(id.clone()) {
                continue;
            }

            let reputation = Arc::clone(&self.reputation);
            lookups.spawn(async move {
                let rating = reputation.get_average_rating(&id).await;
                (id, rating)
            });
        }

        let mut ratings = HashMap::with_capacity(seen.len());
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((id, rating)) => {
                    ratings.insert(id, rating);
                }
                Err(e) => tracing::warn!("Rating lookup task failed: {}", e),
            }
        }

        ratings
    }
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, SearchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SearchError::InvalidQuery(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}
