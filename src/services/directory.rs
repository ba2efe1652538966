use crate::models::OrganizationRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when querying the organization directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Source of raw organization records, one call per query shape
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    async fn fetch_by_zipcode(&self, zipcode: &str) -> Result<Vec<OrganizationRecord>, DirectoryError>;

    async fn fetch_by_location(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
    ) -> Result<Vec<OrganizationRecord>, DirectoryError>;

    async fn fetch_by_state_city(
        &self,
        state: &str,
        city: &str,
    ) -> Result<Vec<OrganizationRecord>, DirectoryError>;

    /// `Ok(None)` when the directory does not know the id
    async fn fetch_by_id(&self, id: &str) -> Result<Option<OrganizationRecord>, DirectoryError>;
}

/// HTTP client for the third-party organization directory
///
/// Every call is a single GET authenticated with an API key header.
pub struct HttpDirectoryClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpDirectoryClient {
    /// Create a new directory client
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn organizations_url(&self) -> String {
        format!("{}/organizations", self.base_url.trim_end_matches('/'))
    }

    fn query_string(params: &[(&str, String)]) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    async fn get_json(&self, url: &str) -> Result<Option<Value>, DirectoryError> {
        tracing::debug!("Querying directory: {}", url);

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DirectoryError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(DirectoryError::ApiError(format!("{} - {}", status, body)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| DirectoryError::InvalidResponse(format!("Body is not JSON: {}", e)))
    }

    async fn fetch_list(&self, params: &[(&str, String)]) -> Result<Vec<OrganizationRecord>, DirectoryError> {
        let url = format!("{}?{}", self.organizations_url(), Self::query_string(params));

        // A 404 on a list query just means nothing matched
        let Some(json) = self.get_json(&url).await? else {
            return Ok(vec![]);
        };

        let organizations = parse_record_list(json)?;
        tracing::debug!("Directory returned {} organizations", organizations.len());
        Ok(organizations)
    }
}

/// Decode a list body, skipping entries that are not usable records
fn parse_record_list(json: Value) -> Result<Vec<OrganizationRecord>, DirectoryError> {
    let Value::Array(items) = json else {
        return Err(DirectoryError::InvalidResponse("Expected an array of organizations".into()));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<OrganizationRecord>(item) {
            Ok(org) => Some(org),
            Err(e) => {
                tracing::debug!("Skipping undecodable organization: {}", e);
                None
            }
        })
        .collect())
}

/// Decode a single-record body; a one-element array is accepted too
fn parse_single_record(json: Value) -> Result<Option<OrganizationRecord>, DirectoryError> {
    let item = match json {
        Value::Array(items) => match items.into_iter().next() {
            Some(item) => item,
            None => return Ok(None),
        },
        Value::Null => return Ok(None),
        other => other,
    };

    serde_json::from_value(item)
        .map(Some)
        .map_err(|e| DirectoryError::InvalidResponse(format!("Failed to parse organization: {}", e)))
}

#[async_trait]
impl OrganizationDirectory for HttpDirectoryClient {
    async fn fetch_by_zipcode(&self, zipcode: &str) -> Result<Vec<OrganizationRecord>, DirectoryError> {
        self.fetch_list(&[("zipcode", zipcode.to_string())]).await
    }

    async fn fetch_by_location(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
    ) -> Result<Vec<OrganizationRecord>, DirectoryError> {
        self.fetch_list(&[
            ("lat", latitude.to_string()),
            ("lng", longitude.to_string()),
            ("radius", radius_miles.to_string()),
        ])
        .await
    }

    async fn fetch_by_state_city(
        &self,
        state: &str,
        city: &str,
    ) -> Result<Vec<OrganizationRecord>, DirectoryError> {
        self.fetch_list(&[("state", state.to_string()), ("city", city.to_string())])
            .await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<OrganizationRecord>, DirectoryError> {
        let url = format!("{}/{}", self.organizations_url(), urlencoding::encode(id));

        match self.get_json(&url).await? {
            Some(json) => parse_single_record(json),
            None => Ok(None),
        }
    }
}
