use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Search radius used when a request does not name one
pub const DEFAULT_RADIUS_MILES: f64 = 1.4;

/// Organization record as returned by the external directory
///
/// Directory payloads are loosely typed: ids and zipcodes arrive as strings
/// or numbers, and coordinates as decimal strings that may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub org_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub longitude: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub business_hours: Option<String>,
    /// Reputation snapshot embedded by the directory. Cleared once scored;
    /// the scored output carries the aggregated `rating` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingSnapshot>,
}

impl OrganizationRecord {
    /// Parsed (latitude, longitude), or None unless both are finite numbers
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = parse_coordinate(self.latitude.as_deref())?;
        let lon = parse_coordinate(self.longitude.as_deref())?;
        Some((lat, lon))
    }

    /// Embedded average rating, if the directory supplied a numeric one
    pub fn embedded_average_rating(&self) -> Option<f64> {
        self.rating.as_ref().and_then(|r| r.average_rating)
    }
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// True when an optional text field carries a non-blank value
pub fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Reputation snapshot embedded in a directory record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingSnapshot {
    #[serde(rename = "averageRating", alias = "average_rating", default, deserialize_with = "lenient_number")]
    pub average_rating: Option<f64>,
    #[serde(rename = "totalRatings", alias = "total_ratings", default, deserialize_with = "lenient_number")]
    pub total_ratings: Option<f64>,
}

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// What the requester is looking for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterPreferences {
    #[serde(default)]
    pub service_needs: Vec<String>,
    #[serde(rename = "type", default)]
    pub org_type: Option<String>,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub user_location: Option<GeoPoint>,
}

impl RequesterPreferences {
    /// The type filter, if one was given and is not blank
    pub fn type_filter(&self) -> Option<&str> {
        self.org_type.as_deref().filter(|t| !t.is_empty())
    }
}

impl Default for RequesterPreferences {
    fn default() -> Self {
        Self {
            service_needs: Vec::new(),
            org_type: None,
            radius: DEFAULT_RADIUS_MILES,
            user_location: None,
        }
    }
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_MILES
}

/// Points one criterion put on the table and how many it awarded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: String,
    pub possible: f64,
    pub earned: f64,
}

impl CriterionScore {
    /// Build a score, clamping `earned` into `[0, possible]`
    ///
    /// A negative or non-finite budget counts as zero.
    pub fn new(criterion: &str, possible: f64, earned: f64) -> Self {
        let possible = if possible.is_finite() { possible.max(0.0) } else { 0.0 };
        let earned = if earned.is_finite() {
            earned.clamp(0.0, possible)
        } else {
            0.0
        };
        Self {
            criterion: criterion.to_string(),
            possible,
            earned,
        }
    }
}

/// Normalized score plus the criteria that produced it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub total_possible: f64,
    pub earned: f64,
    pub percentage: f64,
    pub criteria: Vec<CriterionScore>,
}

/// Aggregated reputation for an organization
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub average_rating: f64,
    pub total_ratings: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDetails {
    #[serde(rename = "type")]
    pub org_type: Option<String>,
    pub hours: BTreeMap<String, String>,
    pub description: Option<String>,
}

/// Organization record enriched with its match score and presentation fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredOrganization {
    #[serde(flatten)]
    pub organization: OrganizationRecord,
    pub match_score: f64,
    pub match_score_details: ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_in_miles: Option<f64>,
    pub formatted_address: String,
    pub contact_info: ContactInfo,
    pub service_details: ServiceDetails,
    pub rating: Rating,
}

/// Point budget of each scoring criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub distance: f64,
    pub type_match: f64,
    pub availability: f64,
    pub reputation: f64,
    pub contact: f64,
    pub service_needs: f64,
    /// Distance points lost per mile
    pub distance_penalty_per_mile: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            distance: 30.0,
            type_match: 20.0,
            availability: 15.0,
            reputation: 20.0,
            contact: 15.0,
            service_needs: 20.0,
            distance_penalty_per_mile: 2.0,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// Non-numeric values are dropped rather than failing the whole record
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}
