use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::core::criteria::{standard_criteria, Criterion};
use crate::core::scoring::calculate_match_score;
use crate::models::{OrganizationRecord, RequesterPreferences, ScoredOrganization, ScoringWeights};

/// Scores organizations and ranks them by match score
///
/// # Pipeline Stages
/// 1. Score every record against the preferences (input order kept)
/// 2. Stable sort, best match first
#[derive(Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    criteria: Arc<Vec<Box<dyn Criterion>>>,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            criteria: Arc::new(standard_criteria(&weights)),
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Score a single organization
    pub fn score(
        &self,
        organization: OrganizationRecord,
        preferences: &RequesterPreferences,
    ) -> ScoredOrganization {
        calculate_match_score(organization, preferences, &self.criteria)
    }

    /// Score every organization and sort by match score, descending
    ///
    /// Equal scores keep their input order.
    pub fn rank(
        &self,
        preferences: &RequesterPreferences,
        organizations: Vec<OrganizationRecord>,
    ) -> Vec<ScoredOrganization> {
        let mut scored: Vec<ScoredOrganization> = organizations
            .into_iter()
            .map(|org| self.score(org, preferences))
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
        });

        scored
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("weights", &self.weights)
            .field("criteria", &self.criteria.iter().map(|c| c.name()).collect::<Vec<_>>())
            .finish()
    }
}
