//! Test fixtures for handler testing.
//!
//! Each fixture owns a temporary directory holding a fresh bell document and
//! both SQLite stores, so tests never share state.

use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::ServiceConfig;
use crate::state::AppState;

/// Centre point used by the fixture bells (Seoul City Hall).
pub const FIXTURE_LAT: f64 = 37.5665;
pub const FIXTURE_LNG: f64 = 126.9780;

/// A temporary set of stores plus the state built on them.
///
/// Dropping the fixture deletes the directory.
pub struct TestStores {
    dir: TempDir,
    state: AppState,
}

impl TestStores {
    /// Fresh stores with the five sample hotzones and [`fixture_bells`].
    pub fn seeded() -> Self {
        let stores = Self::with_seed(true);
        stores.write_bells(&fixture_bells());
        stores
    }

    /// Fresh stores with no hotzones and no bell document.
    pub fn empty() -> Self {
        Self::with_seed(false)
    }

    fn with_seed(seed_samples: bool) -> Self {
        let dir = tempfile::tempdir()
            .unwrap_or_else(|e| panic!("failed to create temp dir for test stores: {}", e));
        let config = ServiceConfig {
            bells_path: dir.path().join("emergency_bells.json"),
            hotzone_db: dir.path().join("database/hotzone.db"),
            community_db: dir.path().join("database/community.db"),
            seed_samples,
            ..ServiceConfig::default()
        };
        let state = AppState::open(&config)
            .unwrap_or_else(|e| panic!("failed to open test stores: {}", e));
        Self { dir, state }
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn bells_path(&self) -> PathBuf {
        self.dir.path().join("emergency_bells.json")
    }

    /// Replace the bell document on disk.
    pub fn write_bells(&self, document: &Value) {
        let text = serde_json::to_string(document)
            .unwrap_or_else(|e| panic!("failed to encode bell fixture: {}", e));
        std::fs::write(self.bells_path(), text)
            .unwrap_or_else(|e| panic!("failed to write bell fixture: {}", e));
    }
}

/// Four bells: two near the fixture centre, one about 5.5 km north and one
/// without coordinates.
pub fn fixture_bells() -> Value {
    json!([
        {
            "관리번호": "B-001",
            "WGS84위도": "37.5665",
            "WGS84경도": "126.9780",
            "설치목적": "방범용",
            "관리기관명": "서울특별시 중구",
            "설치장소유형": "도로"
        },
        {
            "관리번호": "B-002",
            "WGS84위도": 37.5705,
            "WGS84경도": 126.9780,
            "설치목적": "공원",
            "관리기관명": "서울특별시 중구",
            "설치장소유형": "공원"
        },
        {
            "관리번호": "B-003",
            "WGS84위도": "37.6165",
            "WGS84경도": "126.9780",
            "설치목적": "방범용",
            "관리기관명": "서울특별시 종로구",
            "설치장소유형": null
        },
        {
            "관리번호": "B-004",
            "WGS84위도": "",
            "WGS84경도": "",
            "설치목적": "기타",
            "관리기관명": "서울특별시 종로구"
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_fixture_has_bells_and_hotzones() {
        let stores = TestStores::seeded();
        let state = stores.state();
        assert_eq!(state.bells().load_all().len(), 4);
        assert_eq!(state.hotzones().all().unwrap().len(), 5);
    }

    #[test]
    fn fixtures_do_not_share_directories() {
        let a = TestStores::empty();
        let b = TestStores::empty();
        assert_ne!(a.bells_path(), b.bells_path());
        assert!(a.state().bells().load_all().is_empty());
    }
}
