use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{GeoPoint, RequesterPreferences};

/// Preferences block shared by every search request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPreferences {
    #[serde(default)]
    pub service_needs: Vec<String>,
    #[serde(rename = "type", default)]
    pub org_type: Option<String>,
}

impl SearchPreferences {
    /// Build engine preferences with the given search radius
    pub fn into_requester_preferences(self, radius: f64) -> RequesterPreferences {
        RequesterPreferences {
            service_needs: self.service_needs,
            org_type: self.org_type,
            radius,
            user_location: None,
        }
    }
}

/// Request to rank organizations in a zipcode
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ZipcodeSearchRequest {
    #[validate(length(min = 1, max = 10))]
    pub zipcode: String,
    #[serde(default)]
    pub preferences: SearchPreferences,
}

/// Request to rank organizations around a point
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationSearchRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lng")]
    pub longitude: f64,
    #[validate(range(min = 0.0, max = 500.0))]
    pub radius: Option<f64>,
    #[serde(default)]
    pub preferences: SearchPreferences,
}

impl LocationSearchRequest {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Request to rank organizations in a city
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CitySearchRequest {
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[serde(default)]
    pub preferences: SearchPreferences,
}
