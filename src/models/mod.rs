// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    OrganizationRecord, RatingSnapshot, GeoPoint, RequesterPreferences, CriterionScore,
    ScoreBreakdown, Rating, ContactInfo, ServiceDetails, ScoredOrganization, ScoringWeights,
    DEFAULT_RADIUS_MILES, is_present,
};
pub use requests::{SearchPreferences, ZipcodeSearchRequest, LocationSearchRequest, CitySearchRequest};
pub use responses::{SearchResponse, HealthResponse, ErrorResponse, NO_RESULTS_MESSAGE};
