//! Application state for the HTTP service.
//!
//! The state holds only store handles (file paths). Connections are opened
//! per call inside the stores, so nothing mutable is shared between
//! requests.

use std::sync::Arc;

use safety_lib::{BellStore, CommunityStore, Error as LibError, HotzoneStore};

use crate::config::ServiceConfig;
use crate::ApiError;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to open or initialise the hotzone store.
    HotzoneStore(LibError),

    /// Failed to open or initialise the community store.
    CommunityStore(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HotzoneStore(e) => write!(f, "failed to open hotzone store: {}", e),
            Self::CommunityStore(e) => write!(f, "failed to open community store: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HotzoneStore(e) | Self::CommunityStore(e) => Some(e),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable; share it via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use safety_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let bells = state.bells().load_all();
///     // ...
/// }
///
/// let state = AppState::open(&ServiceConfig::from_env()).unwrap();
/// let app = Router::new()
///     .route("/api/emergency-bells", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    bells: BellStore,
    hotzones: HotzoneStore,
    community: CommunityStore,
}

impl AppState {
    /// Open every store named by `config`, creating schemas (and sample
    /// hotzones when enabled) as needed.
    ///
    /// The bell document is not touched here; it is read per request.
    pub fn open(config: &ServiceConfig) -> Result<Self, AppStateError> {
        tracing::info!(path = %config.hotzone_db.display(), seed = config.seed_samples, "opening hotzone store");
        let hotzones = HotzoneStore::open(&config.hotzone_db, config.seed_samples)
            .map_err(AppStateError::HotzoneStore)?;

        tracing::info!(path = %config.community_db.display(), "opening community store");
        let community =
            CommunityStore::open(&config.community_db).map_err(AppStateError::CommunityStore)?;

        let bells = BellStore::new(&config.bells_path);
        if !bells.path().exists() {
            tracing::warn!(
                path = %bells.path().display(),
                "emergency bell dataset not found, bell endpoints will return no records"
            );
        }

        Ok(Self::from_components(bells, hotzones, community))
    }

    /// Create application state from already-opened stores.
    pub fn from_components(
        bells: BellStore,
        hotzones: HotzoneStore,
        community: CommunityStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                bells,
                hotzones,
                community,
            }),
        }
    }

    pub fn bells(&self) -> &BellStore {
        &self.inner.bells
    }

    pub fn hotzones(&self) -> &HotzoneStore {
        &self.inner.hotzones
    }

    pub fn community(&self) -> &CommunityStore {
        &self.inner.community
    }

    /// Run a blocking store operation on the blocking thread pool.
    ///
    /// SQLite and file I/O are synchronous; running them here keeps the async
    /// workers free while a store call is in progress.
    pub async fn run<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&AppState) -> safety_lib::Result<T> + Send + 'static,
    {
        let state = self.clone();
        let result = tokio::task::spawn_blocking(move || operation(&state)).await?;
        Ok(result?)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("bells", &self.inner.bells.path())
            .field("hotzones", &self.inner.hotzones.path())
            .field("community", &self.inner.community.path())
            .finish()
    }
}
