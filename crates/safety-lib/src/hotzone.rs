//! Hotzone store: risk areas and their incident history.
//!
//! Backed by its own SQLite file with a `hotzones` parent table and an
//! `incidents` child table. `risk_level` and `severity` are range-checked by
//! the schema only; callers pass values through unvalidated and surface the
//! constraint failure as a storage error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, info};

use crate::db::{count_rows, open_connection, prepare_store_path, row_exists, text_column};
use crate::error::{Error, Result};
use crate::proximity::{GeoPoint, Located};

/// Radius applied when a new hotzone does not specify one.
pub const DEFAULT_AREA_RADIUS_KM: f64 = 0.5;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS hotzones (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    area_name TEXT NOT NULL,
    description TEXT,
    risk_level INTEGER NOT NULL CHECK (risk_level >= 1 AND risk_level <= 5),
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    radius REAL DEFAULT 0.5,
    crime_type TEXT,
    last_incident_date DATE,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS incidents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hotzone_id INTEGER,
    incident_type TEXT NOT NULL,
    description TEXT,
    incident_date DATE NOT NULL,
    latitude REAL,
    longitude REAL,
    severity INTEGER CHECK (severity >= 1 AND severity <= 5),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (hotzone_id) REFERENCES hotzones (id)
);
"#;

/// (area_name, description, risk_level, latitude, longitude, radius, crime_type)
type SampleHotzone = (&'static str, &'static str, i64, f64, f64, f64, &'static str);

const SAMPLE_HOTZONES: [SampleHotzone; 5] = [
    ("강남역 주변", "강남역 인근 번화가", 4, 37.4979, 127.0276, 0.8, "절도, 폭력"),
    ("홍대입구역 주변", "홍대입구역 인근 상권", 3, 37.5571, 126.9236, 0.6, "절도, 성범죄"),
    ("동대문역사문화공원역", "동대문 상권", 3, 37.5658, 127.0090, 0.7, "절도, 폭력"),
    ("신촌역 주변", "신촌 대학가", 2, 37.5552, 126.9368, 0.5, "절도"),
    ("건대입구역 주변", "건대입구역 인근", 2, 37.5407, 127.0892, 0.6, "절도, 폭력"),
];

/// A stored risk area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotzone {
    pub id: i64,
    pub area_name: String,
    pub description: Option<String>,
    pub risk_level: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub crime_type: Option<String>,
    pub last_incident_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Located for Hotzone {
    fn coordinates(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude, self.longitude))
    }
}

/// A recorded incident inside a hotzone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    pub id: i64,
    pub hotzone_id: Option<i64>,
    pub incident_type: String,
    pub description: Option<String>,
    pub incident_date: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub severity: Option<i64>,
    pub created_at: String,
}

/// A hotzone together with its incidents, most recent incident first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotzoneDetail {
    #[serde(flatten)]
    pub hotzone: Hotzone,
    pub incidents: Vec<Incident>,
}

/// Insert payload for a hotzone. Coordinates are optional here so a missing
/// value reaches the schema's `NOT NULL` constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewHotzone {
    pub area_name: String,
    pub description: Option<String>,
    pub risk_level: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub crime_type: Option<String>,
}

/// Insert payload for an incident.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewIncident {
    pub incident_type: String,
    pub description: Option<String>,
    pub incident_date: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub severity: Option<i64>,
}

/// Aggregate counts over the hotzone store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HotzoneStats {
    pub total_hotzones: i64,
    pub total_incidents: i64,
    /// Number of hotzones per risk level.
    pub risk_level_stats: BTreeMap<i64, i64>,
}

/// Handle to the hotzone database file.
#[derive(Debug, Clone)]
pub struct HotzoneStore {
    path: PathBuf,
}

impl HotzoneStore {
    /// Open the store at `path`, creating the schema if needed and, when
    /// `seed` is set, inserting the sample hotzones into an empty table.
    pub fn open(path: impl Into<PathBuf>, seed: bool) -> Result<Self> {
        let store = Self { path: path.into() };
        prepare_store_path(&store.path)?;
        store.init_schema()?;
        if seed {
            store.seed_samples()?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh connection; dropped by the caller when the operation ends.
    pub fn connect(&self) -> Result<Connection> {
        open_connection(&self.path)
    }

    /// Create both tables if they are absent. Safe to call repeatedly.
    pub fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %self.path.display(), "hotzone schema ready");
        Ok(())
    }

    /// Insert the sample hotzones if the table is empty. Returns the number
    /// of rows inserted.
    pub fn seed_samples(&self) -> Result<usize> {
        let mut conn = self.connect()?;
        if count_rows(&conn, "hotzones")? > 0 {
            debug!("hotzones already populated, skipping samples");
            return Ok(0);
        }

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO hotzones (area_name, description, risk_level, latitude, longitude, radius, crime_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (area, description, risk, lat, lng, radius, crime) in SAMPLE_HOTZONES {
                stmt.execute(params![area, description, risk, lat, lng, radius, crime])?;
            }
        }
        tx.commit()?;
        info!(count = SAMPLE_HOTZONES.len(), "seeded sample hotzones");
        Ok(SAMPLE_HOTZONES.len())
    }

    /// Hotzones ordered by risk level, highest first, optionally restricted
    /// to one level.
    pub fn list(&self, risk_level: Option<i64>) -> Result<Vec<Hotzone>> {
        let conn = self.connect()?;
        let zones = match risk_level {
            Some(level) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM hotzones WHERE risk_level = ?1 ORDER BY risk_level DESC, id ASC",
                )?;
                let rows = stmt.query_map([level], row_to_hotzone)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM hotzones ORDER BY risk_level DESC, id ASC")?;
                let rows = stmt.query_map([], row_to_hotzone)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(zones)
    }

    /// Every hotzone in insertion order.
    pub fn all(&self) -> Result<Vec<Hotzone>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT * FROM hotzones ORDER BY id ASC")?;
        let rows = stmt.query_map([], row_to_hotzone)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Insert a hotzone and return its id.
    pub fn create(&self, new: &NewHotzone) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO hotzones (area_name, description, risk_level, latitude, longitude, radius, crime_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.area_name,
                new.description,
                new.risk_level,
                new.latitude,
                new.longitude,
                new.radius.unwrap_or(DEFAULT_AREA_RADIUS_KM),
                new.crime_type,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(hotzone_id = id, area = %new.area_name, "hotzone created");
        Ok(id)
    }

    /// Fetch a hotzone and its incidents.
    pub fn get(&self, id: i64) -> Result<HotzoneDetail> {
        let conn = self.connect()?;
        let hotzone = conn
            .query_row("SELECT * FROM hotzones WHERE id = ?1", [id], row_to_hotzone)
            .optional()?
            .ok_or(Error::HotzoneNotFound { id })?;

        let mut stmt = conn.prepare(
            "SELECT * FROM incidents WHERE hotzone_id = ?1 ORDER BY incident_date DESC, id DESC",
        )?;
        let incidents = stmt
            .query_map([id], row_to_incident)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(HotzoneDetail { hotzone, incidents })
    }

    /// Record an incident against an existing hotzone and return its id.
    ///
    /// The hotzone's `last_incident_date` advances when the new incident is
    /// more recent. Nothing is written if the hotzone does not exist.
    pub fn add_incident(&self, hotzone_id: i64, new: &NewIncident) -> Result<i64> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        if !row_exists(&tx, "hotzones", hotzone_id)? {
            return Err(Error::HotzoneNotFound { id: hotzone_id });
        }

        tx.execute(
            "INSERT INTO incidents (hotzone_id, incident_type, description, incident_date, latitude, longitude, severity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                hotzone_id,
                new.incident_type,
                new.description,
                new.incident_date,
                new.latitude,
                new.longitude,
                new.severity,
            ],
        )?;
        let incident_id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE hotzones SET last_incident_date = ?1, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?2 AND (last_incident_date IS NULL OR last_incident_date < ?1)",
            params![new.incident_date, hotzone_id],
        )?;
        tx.commit()?;

        debug!(hotzone_id, incident_id, "incident recorded");
        Ok(incident_id)
    }

    /// Totals and the per-risk-level breakdown.
    pub fn stats(&self) -> Result<HotzoneStats> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT risk_level, COUNT(*) FROM hotzones GROUP BY risk_level ORDER BY risk_level DESC",
        )?;
        let risk_level_stats = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;

        Ok(HotzoneStats {
            total_hotzones: count_rows(&conn, "hotzones")?,
            total_incidents: count_rows(&conn, "incidents")?,
            risk_level_stats,
        })
    }
}

fn row_to_hotzone(row: &Row<'_>) -> rusqlite::Result<Hotzone> {
    Ok(Hotzone {
        id: row.get("id")?,
        area_name: row.get("area_name")?,
        description: row.get("description")?,
        risk_level: row.get("risk_level")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        radius: row
            .get::<_, Option<f64>>("radius")?
            .unwrap_or(DEFAULT_AREA_RADIUS_KM),
        crime_type: row.get("crime_type")?,
        last_incident_date: text_column(row, "last_incident_date")?,
        created_at: text_column(row, "created_at")?.unwrap_or_default(),
        updated_at: text_column(row, "updated_at")?.unwrap_or_default(),
    })
}

fn row_to_incident(row: &Row<'_>) -> rusqlite::Result<Incident> {
    Ok(Incident {
        id: row.get("id")?,
        hotzone_id: row.get("hotzone_id")?,
        incident_type: row.get("incident_type")?,
        description: row.get("description")?,
        incident_date: text_column(row, "incident_date")?.unwrap_or_default(),
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        severity: row.get("severity")?,
        created_at: text_column(row, "created_at")?.unwrap_or_default(),
    })
}
