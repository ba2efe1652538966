use serde::{Deserialize, Serialize};
use crate::models::domain::ScoredOrganization;

/// Message returned alongside an empty result list
pub const NO_RESULTS_MESSAGE: &str = "No organizations found";

/// Response for the search endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub organizations: Vec<ScoredOrganization>,
    pub total_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn new(organizations: Vec<ScoredOrganization>) -> Self {
        let total_results = organizations.len();
        let message = if organizations.is_empty() {
            Some(NO_RESULTS_MESSAGE.to_string())
        } else {
            None
        };

        Self {
            organizations,
            total_results,
            message,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
