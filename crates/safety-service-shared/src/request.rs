//! Request parsing and validation for HTTP endpoints.
//!
//! Query strings are parsed leniently: a parameter that cannot be converted
//! to the expected type is treated as absent and the endpoint falls back to
//! its default. Only explicitly required inputs produce a 400.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use safety_lib::community::ALL_CATEGORIES;
use safety_lib::pagination::DEFAULT_PER_PAGE;
use safety_lib::{GeoPoint, NewComment, NewHotzone, NewIncident, NewPost, Page};

use crate::ApiError;

/// Validation trait for request bodies.
pub trait Validate {
    /// Check that every required field is present.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Raw query string parameters with lenient typed accessors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// A finite float, or `None` when absent or unparseable.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.text(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.text(name).and_then(|v| v.trim().parse::<i64>().ok())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A validated radius search: `lat`, `lng` and optional `radius` (km).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProximityQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl ProximityQuery {
    /// Read `lat`/`lng`/`radius` from the query string.
    ///
    /// `lat` and `lng` are required. A value of exactly `0` is rejected like
    /// a missing one, which also rules out queries on the equator or the
    /// prime meridian.
    pub fn from_params(params: &QueryParams, default_radius_km: f64) -> Result<Self, ApiError> {
        let lat = params.float("lat").filter(|v| *v != 0.0);
        let lng = params.float("lng").filter(|v| *v != 0.0);
        let (Some(lat), Some(lng)) = (lat, lng) else {
            return Err(ApiError::validation(
                "Latitude (lat) and longitude (lng) are required.",
            ));
        };
        Ok(Self {
            center: GeoPoint::new(lat, lng),
            radius_km: params.float("radius").unwrap_or(default_radius_km),
        })
    }
}

/// `page`, `per_page` and `category` for the post list.
#[derive(Debug, Clone, PartialEq)]
pub struct PostListQuery {
    pub page: Page,
    pub category: String,
}

impl PostListQuery {
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            page: Page::new(
                params.int("page").unwrap_or(1),
                params.int("per_page").unwrap_or(DEFAULT_PER_PAGE as i64),
            ),
            category: params
                .text("category")
                .unwrap_or(ALL_CATEGORIES)
                .to_string(),
        }
    }
}

/// Unwrap a JSON body, turning a missing or malformed body into a 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(ApiError::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Body of `POST /api/hotzone`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateHotzoneRequest {
    pub area_name: Option<String>,
    pub description: Option<String>,
    /// Range-checked by storage, not here.
    pub risk_level: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub crime_type: Option<String>,
}

impl Validate for CreateHotzoneRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if !present(&self.area_name) || self.risk_level.unwrap_or(0) == 0 {
            return Err(ApiError::validation(
                "Area name (area_name) and risk level (risk_level) are required.",
            ));
        }
        Ok(())
    }
}

impl From<CreateHotzoneRequest> for NewHotzone {
    fn from(request: CreateHotzoneRequest) -> Self {
        NewHotzone {
            area_name: request.area_name.unwrap_or_default(),
            description: request.description,
            risk_level: request.risk_level.unwrap_or_default(),
            latitude: request.latitude,
            longitude: request.longitude,
            radius: request.radius,
            crime_type: request.crime_type,
        }
    }
}

/// Body of `POST /api/hotzone/{id}/incidents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIncidentRequest {
    pub incident_type: Option<String>,
    pub description: Option<String>,
    pub incident_date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Range-checked by storage, not here.
    pub severity: Option<i64>,
}

impl Validate for CreateIncidentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if !present(&self.incident_type) || !present(&self.incident_date) {
            return Err(ApiError::validation(
                "Incident type (incident_type) and date (incident_date) are required.",
            ));
        }
        Ok(())
    }
}

impl From<CreateIncidentRequest> for NewIncident {
    fn from(request: CreateIncidentRequest) -> Self {
        NewIncident {
            incident_type: request.incident_type.unwrap_or_default(),
            description: request.description,
            incident_date: request.incident_date.unwrap_or_default(),
            latitude: request.latitude,
            longitude: request.longitude,
            severity: request.severity,
        }
    }
}

/// Body of `POST /api/community`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
}

impl Validate for CreatePostRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if !present(&self.title) || !present(&self.content) || !present(&self.author) {
            return Err(ApiError::validation(
                "Title, content and author are required.",
            ));
        }
        Ok(())
    }
}

impl From<CreatePostRequest> for NewPost {
    fn from(request: CreatePostRequest) -> Self {
        NewPost {
            title: request.title.unwrap_or_default(),
            content: request.content.unwrap_or_default(),
            author: request.author.unwrap_or_default(),
            location: request.location,
            latitude: request.latitude,
            longitude: request.longitude,
            category: request.category,
        }
    }
}

/// Body of `POST /api/community/{id}/comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub author: Option<String>,
}

impl Validate for CreateCommentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if !present(&self.content) || !present(&self.author) {
            return Err(ApiError::validation(
                "Comment content and author are required.",
            ));
        }
        Ok(())
    }
}

impl From<CreateCommentRequest> for NewComment {
    fn from(request: CreateCommentRequest) -> Self {
        NewComment {
            content: request.content.unwrap_or_default(),
            author: request.author.unwrap_or_default(),
        }
    }
}

/// Parse a path id. Anything that is not an integer names no entity.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found(crate::error::MSG_ENDPOINT_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn malformed_numbers_read_as_absent() {
        let p = params(&[("radius", "far"), ("page", "2x"), ("lat", "NaN")]);
        assert_eq!(p.float("radius"), None);
        assert_eq!(p.int("page"), None);
        assert_eq!(p.float("lat"), None);
        assert_eq!(p.float("missing"), None);
    }

    #[test]
    fn proximity_requires_lat_and_lng() {
        let err = ProximityQuery::from_params(&params(&[("lat", "37.5")]), 2.0).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let err =
            ProximityQuery::from_params(&params(&[("lat", "abc"), ("lng", "127")]), 2.0).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn proximity_rejects_zero_coordinates() {
        let p = params(&[("lat", "0"), ("lng", "127.0")]);
        assert!(ProximityQuery::from_params(&p, 2.0).is_err());
    }

    #[test]
    fn proximity_radius_falls_back_to_default() {
        let p = params(&[("lat", "37.5"), ("lng", "127.0"), ("radius", "wide")]);
        let query = ProximityQuery::from_params(&p, 5.0).unwrap();
        assert_eq!(query.center, GeoPoint::new(37.5, 127.0));
        assert_eq!(query.radius_km, 5.0);

        let p = params(&[("lat", "37.5"), ("lng", "127.0"), ("radius", "1.5")]);
        assert_eq!(ProximityQuery::from_params(&p, 5.0).unwrap().radius_km, 1.5);
    }

    #[test]
    fn post_list_defaults() {
        let q = PostListQuery::from_params(&QueryParams::default());
        assert_eq!(q.page, Page::new(1, 10));
        assert_eq!(q.category, "all");

        let q = PostListQuery::from_params(&params(&[("page", "3"), ("per_page", "oops")]));
        assert_eq!(q.page, Page::new(3, 10));
    }

    #[test]
    fn hotzone_requires_name_and_nonzero_risk() {
        let mut req = CreateHotzoneRequest {
            area_name: Some("Market".into()),
            risk_level: Some(3),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        req.risk_level = Some(0);
        assert!(req.validate().is_err());

        req.risk_level = Some(9);
        assert!(req.validate().is_ok(), "range is left to storage");

        req.area_name = Some("  ".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn post_and_comment_require_text_fields() {
        let post = CreatePostRequest {
            title: Some("t".into()),
            content: Some("c".into()),
            author: None,
            ..Default::default()
        };
        assert!(post.validate().is_err());

        let comment = CreateCommentRequest {
            content: Some("hi".into()),
            author: Some("me".into()),
        };
        assert!(comment.validate().is_ok());
    }

    #[test]
    fn incident_requires_type_and_date() {
        let req: CreateIncidentRequest =
            serde_json::from_str(r#"{"incident_type":"theft"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateIncidentRequest =
            serde_json::from_str(r#"{"incident_type":"theft","incident_date":"2024-06-01","severity":2}"#)
                .unwrap();
        assert!(req.validate().is_ok());
        let new = NewIncident::from(req);
        assert_eq!(new.severity, Some(2));
    }

    #[test]
    fn non_integer_ids_are_not_found() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("abc"), Err(ApiError::NotFound(_))));
    }
}
