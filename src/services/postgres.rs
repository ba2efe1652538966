use crate::core::round2;
use crate::models::Rating;
use crate::services::reputation::{ReputationAggregator, ReputationError};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<PostgresError> for ReputationError {
    fn from(value: PostgresError) -> Self {
        match value {
            PostgresError::InvalidInput(msg) => ReputationError::InvalidData(msg),
            other => ReputationError::Unavailable(other.to_string()),
        }
    }
}

/// PostgreSQL client for the ratings store
///
/// Ratings are written by the review workflow elsewhere; this service only
/// aggregates them per organization.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Average rating and rating count for one organization
    pub async fn average_rating(&self, organization_id: &str) -> Result<Rating, PostgresError> {
        if organization_id.is_empty() {
            return Err(PostgresError::InvalidInput("empty organization id".to_string()));
        }

        let query = r#"
            SELECT
                COALESCE(AVG(rating)::float8, 0) AS average_rating,
                COUNT(*) AS total_ratings
            FROM ratings
            WHERE organization_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(organization_id)
            .fetch_one(&self.pool)
            .await?;

        let average: f64 = row.get("average_rating");
        let total: i64 = row.get("total_ratings");

        tracing::trace!("Organization {} has {} ratings", organization_id, total);

        Ok(Rating {
            average_rating: round2(average),
            total_ratings: total.max(0) as u64,
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ReputationAggregator for PostgresClient {
    async fn fetch_rating(&self, organization_id: &str) -> Result<Rating, ReputationError> {
        Ok(self.average_rating(organization_id).await?)
    }
}
