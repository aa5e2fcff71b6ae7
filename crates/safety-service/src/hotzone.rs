//! `/api/hotzone` handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use safety_lib::proximity::{sort_by_rank_desc, DEFAULT_HOTZONE_RADIUS_KM};
use safety_lib::{
    within_radius, GeoPoint, Hotzone, HotzoneDetail, HotzoneStats, Nearby, NewHotzone, NewIncident,
};
use safety_service_shared::{
    json_body, parse_id, ApiError, AppState, CreateHotzoneRequest, CreateIncidentRequest, Created,
    Listing, ProximityQuery, QueryParams, ServiceResponse, Validate,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route("/nearby", get(nearby_hotzones))
        .route("/stats", get(hotzone_stats))
        .route("/{id}", get(get_hotzone))
        .route("/{id}/incidents", post(add_incident))
}

/// Handlers for the prefix itself, mounted with and without a trailing slash.
pub fn collection() -> MethodRouter<AppState> {
    get(list_hotzones).post(create_hotzone)
}

/// Hotzone summary returned by the proximity search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyHotzone {
    pub id: i64,
    pub area_name: String,
    pub description: Option<String>,
    pub risk_level: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub crime_type: Option<String>,
    pub distance_km: f64,
}

impl From<Nearby<Hotzone>> for NearbyHotzone {
    fn from(hit: Nearby<Hotzone>) -> Self {
        let zone = hit.item;
        Self {
            id: zone.id,
            area_name: zone.area_name,
            description: zone.description,
            risk_level: zone.risk_level,
            latitude: zone.latitude,
            longitude: zone.longitude,
            radius: zone.radius,
            crime_type: zone.crime_type,
            distance_km: hit.distance_km,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NearbyHotzones {
    pub count: usize,
    pub search_radius_km: f64,
    pub center: GeoPoint,
    pub data: Vec<NearbyHotzone>,
}

/// Hotzones, highest risk first. `risk_level` narrows to one level; `0` or
/// an unparseable value lists everything.
async fn list_hotzones(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<ServiceResponse<Listing<Hotzone>>, ApiError> {
    let risk_level = params.int("risk_level").filter(|level| *level != 0);
    let zones = state.run(move |s| s.hotzones().list(risk_level)).await?;
    Ok(ServiceResponse::new(Listing::new(zones)))
}

/// Hotzones whose centre lies within `radius` km, highest risk first.
async fn nearby_hotzones(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<ServiceResponse<NearbyHotzones>, ApiError> {
    let query = ProximityQuery::from_params(&params, DEFAULT_HOTZONE_RADIUS_KM)?;

    let mut hits = state
        .run(move |s| {
            let zones = s.hotzones().all()?;
            Ok(within_radius(query.center, query.radius_km, zones))
        })
        .await?;
    sort_by_rank_desc(&mut hits, |zone| zone.risk_level);

    let data: Vec<NearbyHotzone> = hits.into_iter().map(NearbyHotzone::from).collect();
    info!(
        lat = query.center.lat,
        lng = query.center.lng,
        radius_km = query.radius_km,
        count = data.len(),
        "nearby hotzones"
    );

    Ok(ServiceResponse::new(NearbyHotzones {
        count: data.len(),
        search_radius_km: query.radius_km,
        center: query.center,
        data,
    }))
}

async fn create_hotzone(
    State(state): State<AppState>,
    payload: Result<Json<CreateHotzoneRequest>, JsonRejection>,
) -> Result<ServiceResponse<Created>, ApiError> {
    let request = json_body(payload)?;
    request.validate()?;

    let new: NewHotzone = request.into();
    let id = state.run(move |s| s.hotzones().create(&new)).await?;
    info!(hotzone_id = id, "hotzone created");

    Ok(ServiceResponse::created(Created::new(
        "Hotzone created.",
        "hotzone_id",
        id,
    )))
}

/// One hotzone with its incidents, most recent first.
async fn get_hotzone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ServiceResponse<HotzoneDetail>, ApiError> {
    let id = parse_id(&id)?;
    let detail = state.run(move |s| s.hotzones().get(id)).await?;
    Ok(ServiceResponse::new(detail))
}

async fn add_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<ServiceResponse<Created>, ApiError> {
    let hotzone_id = parse_id(&id)?;
    let request = json_body(payload)?;
    request.validate()?;

    let new: NewIncident = request.into();
    let incident_id = state
        .run(move |s| s.hotzones().add_incident(hotzone_id, &new))
        .await?;
    info!(hotzone_id, incident_id, "incident recorded");

    Ok(ServiceResponse::created(Created::new(
        "Incident recorded.",
        "incident_id",
        incident_id,
    )))
}

async fn hotzone_stats(
    State(state): State<AppState>,
) -> Result<ServiceResponse<HotzoneStats>, ApiError> {
    let stats = state.run(|s| s.hotzones().stats()).await?;
    Ok(ServiceResponse::new(stats))
}
