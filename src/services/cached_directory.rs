use crate::models::OrganizationRecord;
use crate::services::cache::{CacheError, CacheKey, CacheManager};
use crate::services::directory::{DirectoryError, OrganizationDirectory};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// Read-through cache in front of an organization directory
///
/// Only successful responses are stored, so an upstream outage is never
/// remembered as "no organizations". Cache failures fall through to the
/// wrapped directory.
pub struct CachedDirectory {
    inner: Arc<dyn OrganizationDirectory>,
    cache: Arc<CacheManager>,
}

impl CachedDirectory {
    pub fn new(inner: Arc<dyn OrganizationDirectory>, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }

    async fn read_through<T, F>(&self, key: String, fetch: F) -> Result<T, DirectoryError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, DirectoryError>>,
    {
        match self.cache.get::<T>(&key).await {
            Ok(hit) => return Ok(hit),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
        }

        let value = fetch.await?;

        if let Err(e) = self.cache.set(&key, &value).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }

        Ok(value)
    }
}

#[async_trait]
impl OrganizationDirectory for CachedDirectory {
    async fn fetch_by_zipcode(&self, zipcode: &str) -> Result<Vec<OrganizationRecord>, DirectoryError> {
        self.read_through(CacheKey::zipcode(zipcode), self.inner.fetch_by_zipcode(zipcode))
            .await
    }

    async fn fetch_by_location(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
    ) -> Result<Vec<OrganizationRecord>, DirectoryError> {
        self.read_through(
            CacheKey::location(latitude, longitude, radius_miles),
            self.inner.fetch_by_location(latitude, longitude, radius_miles),
        )
        .await
    }

    async fn fetch_by_state_city(
        &self,
        state: &str,
        city: &str,
    ) -> Result<Vec<OrganizationRecord>, DirectoryError> {
        self.read_through(
            CacheKey::state_city(state, city),
            self.inner.fetch_by_state_city(state, city),
        )
        .await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<OrganizationRecord>, DirectoryError> {
        self.read_through(CacheKey::organization(id), self.inner.fetch_by_id(id))
            .await
    }
}
