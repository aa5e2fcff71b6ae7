//! Emergency bell dataset access.
//!
//! The dataset is a JSON array of flat records exported from the city's
//! spreadsheet. Field names are the spreadsheet's Korean column headers and
//! are passed through untouched; only the handful of keys below are
//! interpreted.
//!
//! The backing file is re-read on every call so an externally refreshed
//! export is picked up without a restart.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::proximity::{GeoPoint, Located};

/// One emergency bell record, keyed by dataset column name.
pub type Bell = Map<String, Value>;

/// WGS84 latitude column.
pub const FIELD_LATITUDE: &str = "WGS84위도";
/// WGS84 longitude column.
pub const FIELD_LONGITUDE: &str = "WGS84경도";
/// Installation purpose column.
pub const FIELD_PURPOSE: &str = "설치목적";
/// Managing agency column, used as the district grouping.
pub const FIELD_DISTRICT: &str = "관리기관명";
/// Installation site type column.
pub const FIELD_LOCATION_TYPE: &str = "설치장소유형";

/// Bucket label for records that lack a grouping value.
pub const OTHER_BUCKET: &str = "기타";

/// Filter value that disables purpose filtering.
pub const ALL_PURPOSES: &str = "all";

/// Read-only store over the bell JSON document.
#[derive(Debug, Clone)]
pub struct BellStore {
    path: PathBuf,
}

impl BellStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record from the backing document.
    ///
    /// A missing file yields an empty list. Any other read or parse failure
    /// is logged and also yields an empty list; the error never reaches the
    /// caller.
    pub fn load_all(&self) -> Vec<Bell> {
        match read_bells(&self.path) {
            Ok(bells) => {
                debug!(path = %self.path.display(), count = bells.len(), "loaded emergency bells");
                bells
            }
            Err(crate::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "emergency bell dataset not present");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to load emergency bells");
                Vec::new()
            }
        }
    }
}

fn read_bells(path: &Path) -> Result<Vec<Bell>> {
    let raw = fs::read_to_string(path)?;
    let bells: Vec<Bell> = serde_json::from_str(&raw)?;
    Ok(bells)
}

/// Interpret a JSON value as a coordinate: numbers as-is, strings parsed
/// after trimming. Anything else is unusable.
fn as_coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// The bell's position, if both coordinate fields hold numeric values.
pub fn bell_coordinates(bell: &Bell) -> Option<GeoPoint> {
    let lat = bell.get(FIELD_LATITUDE).and_then(as_coordinate)?;
    let lng = bell.get(FIELD_LONGITUDE).and_then(as_coordinate)?;
    Some(GeoPoint::new(lat, lng))
}

impl Located for Bell {
    fn coordinates(&self) -> Option<GeoPoint> {
        bell_coordinates(self)
    }
}

/// Keep the bells whose installation purpose equals `purpose`.
/// [`ALL_PURPOSES`] keeps everything.
pub fn filter_by_purpose(bells: Vec<Bell>, purpose: &str) -> Vec<Bell> {
    if purpose == ALL_PURPOSES {
        return bells;
    }
    bells
        .into_iter()
        .filter(|bell| bell.get(FIELD_PURPOSE).and_then(Value::as_str) == Some(purpose))
        .collect()
}

/// Per-field record counts over the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BellStats {
    pub total_count: usize,
    pub district_stats: BTreeMap<String, usize>,
    pub purpose_stats: BTreeMap<String, usize>,
    pub location_stats: BTreeMap<String, usize>,
}

impl BellStats {
    pub fn collect(bells: &[Bell]) -> Self {
        let mut stats = BellStats {
            total_count: bells.len(),
            ..Default::default()
        };
        for bell in bells {
            *stats
                .district_stats
                .entry(group_label(bell, FIELD_DISTRICT))
                .or_default() += 1;
            *stats
                .purpose_stats
                .entry(group_label(bell, FIELD_PURPOSE))
                .or_default() += 1;
            *stats
                .location_stats
                .entry(group_label(bell, FIELD_LOCATION_TYPE))
                .or_default() += 1;
        }
        stats
    }
}

/// Grouping key for one field. Only an absent key falls into
/// [`OTHER_BUCKET`]; an explicit `null` is grouped under `"null"`.
fn group_label(bell: &Bell, field: &str) -> String {
    match bell.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => OTHER_BUCKET.to_string(),
    }
}
