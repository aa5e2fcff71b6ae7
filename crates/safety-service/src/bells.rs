//! `/api/emergency-bells` handlers.
//!
//! The bell document is re-read on every request, so edits to the file show
//! up without a restart.

use axum::{
    extract::{Query, State},
    routing::{get, MethodRouter},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use safety_lib::bells::{filter_by_purpose, ALL_PURPOSES};
use safety_lib::proximity::{sort_by_distance, DEFAULT_BELL_RADIUS_KM};
use safety_lib::{within_radius, Bell, BellStats, GeoPoint};
use safety_service_shared::{
    ApiError, AppState, Listing, ProximityQuery, QueryParams, ServiceResponse,
};

/// Key added to each record returned by the proximity search.
pub const DISTANCE_FIELD: &str = "distance";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route("/nearby", get(nearby_bells))
        .route("/filter", get(filter_bells))
        .route("/stats", get(bell_stats))
}

/// Handlers for the prefix itself, mounted with and without a trailing slash.
pub fn collection() -> MethodRouter<AppState> {
    get(list_bells)
}

#[derive(Debug, Serialize)]
pub struct NearbyBells {
    pub count: usize,
    pub radius_km: f64,
    pub center: GeoPoint,
    pub data: Vec<Bell>,
}

#[derive(Debug, Serialize)]
pub struct FilteredBells {
    pub count: usize,
    pub filter: String,
    pub data: Vec<Bell>,
}

async fn list_bells(
    State(state): State<AppState>,
) -> Result<ServiceResponse<Listing<Bell>>, ApiError> {
    let bells = state.run(|s| Ok(s.bells().load_all())).await?;
    info!(count = bells.len(), "listing emergency bells");
    Ok(ServiceResponse::new(Listing::new(bells)))
}

/// Bells within `radius` km of `lat`/`lng`, nearest first, each with a
/// `distance` field in km.
async fn nearby_bells(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<ServiceResponse<NearbyBells>, ApiError> {
    let query = ProximityQuery::from_params(&params, DEFAULT_BELL_RADIUS_KM)?;

    let mut hits = state
        .run(move |s| Ok(within_radius(query.center, query.radius_km, s.bells().load_all())))
        .await?;
    sort_by_distance(&mut hits);

    let data: Vec<Bell> = hits
        .into_iter()
        .map(|hit| {
            let mut bell = hit.item;
            bell.insert(DISTANCE_FIELD.to_string(), Value::from(hit.distance_km));
            bell
        })
        .collect();

    info!(
        lat = query.center.lat,
        lng = query.center.lng,
        radius_km = query.radius_km,
        count = data.len(),
        "nearby emergency bells"
    );

    Ok(ServiceResponse::new(NearbyBells {
        count: data.len(),
        radius_km: query.radius_km,
        center: query.center,
        data,
    }))
}

async fn filter_bells(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<ServiceResponse<FilteredBells>, ApiError> {
    let purpose = params.text("purpose").unwrap_or(ALL_PURPOSES).to_string();

    let selected = purpose.clone();
    let data = state
        .run(move |s| Ok(filter_by_purpose(s.bells().load_all(), &selected)))
        .await?;

    Ok(ServiceResponse::new(FilteredBells {
        count: data.len(),
        filter: purpose,
        data,
    }))
}

async fn bell_stats(State(state): State<AppState>) -> Result<ServiceResponse<BellStats>, ApiError> {
    let stats = state
        .run(|s| Ok(BellStats::collect(&s.bells().load_all())))
        .await?;
    Ok(ServiceResponse::new(stats))
}
