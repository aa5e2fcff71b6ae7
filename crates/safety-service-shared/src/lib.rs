//! Shared HTTP infrastructure for the safety API.
//!
//! The service follows a thin-handler pattern: storage, proximity search and
//! pagination live in `safety-lib`, and this crate only provides the glue a
//! handler needs around them:
//!
//! - [`AppState`]: handles to the three stores, plus a blocking-pool runner
//! - [`ServiceResponse`] and [`ApiError`]: the `success` envelopes
//! - [`QueryParams`] and the `Create*Request` bodies with [`Validate`]
//! - [`health`]: home descriptor and liveness handlers
//! - [`logging`] and [`middleware`]: tracing setup and request ids
//! - [`ServiceConfig`]: environment configuration
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse query / JSON body                                  │
//! │  - Validate required fields                                 │
//! │  - Call safety-lib on the blocking pool                     │
//! │  - Wrap the result in the success envelope                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Enable the `test-utils` feature to use [`test_utils`] from other crates.

#![deny(warnings)]

pub mod config;
mod error;
pub mod health;
pub mod logging;
pub mod middleware;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ServiceConfig;
pub use error::{
    endpoint_not_found, panic_response, ApiError, ErrorBody, MSG_ENDPOINT_NOT_FOUND,
    MSG_INTERNAL_ERROR,
};
pub use health::{health_check, home, HealthStatus, HomeDescriptor};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use middleware::{extract_or_generate_request_id, request_span, RequestId};
pub use request::{
    json_body, parse_id, CreateCommentRequest, CreateHotzoneRequest, CreateIncidentRequest,
    CreatePostRequest, PostListQuery, ProximityQuery, QueryParams, Validate,
};
pub use response::{Created, Listing, ServiceResponse};
pub use state::{AppState, AppStateError};
