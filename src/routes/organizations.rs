use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    CitySearchRequest, ErrorResponse, HealthResponse, LocationSearchRequest, RequesterPreferences,
    ScoredOrganization, SearchResponse, ZipcodeSearchRequest,
};
use crate::services::{PostgresClient, SearchError, SearchService};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub postgres: Arc<PostgresClient>,
    pub default_radius_miles: f64,
}

/// Configure all organization routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/organizations/search/zipcode", web::post().to(search_by_zipcode))
        .route("/organizations/search/location", web::post().to(search_by_location))
        .route("/organizations/search/city", web::post().to(search_by_city))
        .route("/organizations/{id}", web::get().to(get_organization));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn search_result(result: Result<Vec<ScoredOrganization>, SearchError>) -> HttpResponse {
    match result {
        Ok(organizations) => HttpResponse::Ok().json(SearchResponse::new(organizations)),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid query".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
    }
}

/// Rank organizations in a zipcode
///
/// POST /api/v1/organizations/search/zipcode
///
/// Request body:
/// ```json
/// {
///   "zipcode": "12345",
///   "preferences": { "serviceNeeds": ["meals"], "type": "shelter" }
/// }
/// ```
async fn search_by_zipcode(
    state: web::Data<AppState>,
    req: web::Json<ZipcodeSearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let request_id = uuid::Uuid::new_v4();
    tracing::info!(%request_id, "Searching organizations in zipcode {}", req.zipcode);

    let preferences = req.preferences.into_requester_preferences(state.default_radius_miles);
    search_result(state.search.search_by_zipcode(&req.zipcode, &preferences).await)
}

/// Rank organizations around a point
///
/// POST /api/v1/organizations/search/location
///
/// Request body:
/// ```json
/// {
///   "latitude": 40.7128,
///   "longitude": -74.0060,
///   "radius": 5.0,
///   "preferences": { "serviceNeeds": ["beds"] }
/// }
/// ```
async fn search_by_location(
    state: web::Data<AppState>,
    req: web::Json<LocationSearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let point = req.point();
    let radius = req.radius.unwrap_or(state.default_radius_miles);
    let request_id = uuid::Uuid::new_v4();
    tracing::info!(
        %request_id,
        "Searching organizations within {}mi of ({}, {})",
        radius,
        point.latitude,
        point.longitude
    );

    let preferences = req.preferences.into_requester_preferences(radius);
    search_result(
        state
            .search
            .search_by_location(point.latitude, point.longitude, &preferences)
            .await,
    )
}

/// Rank organizations in a city
///
/// POST /api/v1/organizations/search/city
///
/// Request body:
/// ```json
/// { "state": "NY", "city": "Albany", "preferences": {} }
/// ```
async fn search_by_city(
    state: web::Data<AppState>,
    req: web::Json<CitySearchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let request_id = uuid::Uuid::new_v4();
    tracing::info!(%request_id, "Searching organizations in {}, {}", req.city, req.state);

    let preferences = req.preferences.into_requester_preferences(state.default_radius_miles);
    search_result(
        state
            .search
            .search_by_state_city(&req.state, &req.city, &preferences)
            .await,
    )
}

/// Fetch and score a single organization
///
/// GET /api/v1/organizations/{id}
async fn get_organization(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    let preferences = RequesterPreferences {
        radius: state.default_radius_miles,
        ..Default::default()
    };

    match state.search.get_by_id(&id, &preferences).await {
        Ok(Some(organization)) => HttpResponse::Ok().json(organization),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: format!("No organization found with id {}", id),
            status_code: 404,
        }),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid query".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
    }
}
