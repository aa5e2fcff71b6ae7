//! Success envelope for HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Wrapper for successful responses: `{"success": true, ...payload}`.
///
/// The payload is flattened into the envelope, so a payload struct with a
/// `data` field and a `count` field serializes as
/// `{"success":true,"data":...,"count":...}`.
///
/// # Example
///
/// ```
/// use safety_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Listing {
///     count: usize,
///     data: Vec<String>,
/// }
///
/// let response = ServiceResponse::new(Listing { count: 0, data: vec![] });
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse<T> {
    pub success: bool,

    /// The actual response payload.
    #[serde(flatten)]
    pub payload: T,

    #[serde(skip)]
    status: StatusCode,
}

impl<T> ServiceResponse<T> {
    /// A 200 OK response.
    pub fn new(payload: T) -> Self {
        Self {
            success: true,
            payload,
            status: StatusCode::OK,
        }
    }

    /// A 201 Created response.
    pub fn created(payload: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(payload)
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(payload: T) -> Self {
        Self::new(payload)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Payload for list endpoints: `{"count": n, "data": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Payload for creation endpoints: a message plus the new id under a
/// resource-specific key such as `post_id`.
#[derive(Debug, Clone, Serialize)]
pub struct Created {
    pub message: String,

    #[serde(flatten)]
    pub id: serde_json::Map<String, serde_json::Value>,
}

impl Created {
    pub fn new(message: impl Into<String>, id_key: &str, id: i64) -> Self {
        let mut ids = serde_json::Map::new();
        ids.insert(id_key.to_string(), id.into());
        Self {
            message: message.into(),
            id: ids,
        }
    }
}
