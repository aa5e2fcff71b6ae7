//! Home descriptor and liveness handlers.
//!
//! Neither payload uses the `success` envelope: they describe the server
//! itself rather than a resource.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Public API version reported by the home route.
pub const API_VERSION: &str = "1.0.0";

/// Greeting shown by the home route.
pub const HOME_MESSAGE: &str = "Seoul Safety App API Server";

/// Path prefix of each resource router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub emergency_bells: String,
    pub community: String,
    pub hotzone: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            emergency_bells: "/api/emergency-bells".to_string(),
            community: "/api/community".to_string(),
            hotzone: "/api/hotzone".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeDescriptor {
    pub message: String,
    pub version: String,
    pub endpoints: Endpoints,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always "healthy" while the process answers.
    pub status: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: local_timestamp(),
        }
    }
}

/// Current local time as ISO-8601 without an offset, microsecond precision.
pub fn local_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// `GET /`
pub async fn home() -> Json<HomeDescriptor> {
    Json(HomeDescriptor {
        message: HOME_MESSAGE.to_string(),
        version: API_VERSION.to_string(),
        endpoints: Endpoints::default(),
        timestamp: local_timestamp(),
    })
}

/// `GET /api/health`
///
/// ```text
/// {"status":"healthy","timestamp":"2025-06-01T09:30:12.123456"}
/// ```
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}
