use crate::models::Rating;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a reputation store
#[derive(Debug, Error)]
pub enum ReputationError {
    #[error("Reputation store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid rating data: {0}")]
    InvalidData(String),
}

/// Lookup of aggregated ratings by organization id
#[async_trait]
pub trait ReputationAggregator: Send + Sync {
    /// Query the store for an organization's rating
    async fn fetch_rating(&self, organization_id: &str) -> Result<Rating, ReputationError>;

    /// Rating for an organization, or `{0, 0}` if the lookup fails
    async fn get_average_rating(&self, organization_id: &str) -> Rating {
        match self.fetch_rating(organization_id).await {
            Ok(rating) => rating,
            Err(e) => {
                tracing::warn!("Rating lookup failed for {}, defaulting to none: {}", organization_id, e);
                Rating::default()
            }
        }
    }
}
