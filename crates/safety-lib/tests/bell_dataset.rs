use std::fs;

use safety_lib::bells::{filter_by_purpose, BellStore};
use safety_lib::proximity::{sort_by_distance, within_radius, GeoPoint, DEFAULT_BELL_RADIUS_KM};
use tempfile::tempdir;

#[test]
fn nearby_bell_at_query_point_has_zero_distance() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("emergency_bells.json");
    fs::write(&path, r#"[{"WGS84위도":"37.50","WGS84경도":"127.00"}]"#).expect("write dataset");

    let store = BellStore::new(&path);
    let hits = within_radius(GeoPoint::new(37.50, 127.00), 2.0, store.load_all());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].distance_km, 0.0);
}

#[test]
fn document_is_reread_on_every_call() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("emergency_bells.json");
    let store = BellStore::new(&path);
    assert!(store.load_all().is_empty());

    fs::write(&path, r#"[{"설치목적":"방범용"},{"설치목적":"공원"}]"#).expect("write dataset");
    assert_eq!(store.load_all().len(), 2);

    fs::write(&path, r#"[{"설치목적":"방범용"}]"#).expect("rewrite dataset");
    assert_eq!(filter_by_purpose(store.load_all(), "방범용").len(), 1);
}

#[test]
fn malformed_document_loads_empty() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("emergency_bells.json");
    fs::write(&path, "{ not json").expect("write dataset");
    assert!(BellStore::new(&path).load_all().is_empty());
}

#[test]
fn default_radius_excludes_distant_and_unset_bells() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("emergency_bells.json");
    fs::write(
        &path,
        r#"[
            {"id":"far","WGS84위도":37.60,"WGS84경도":127.00},
            {"id":"near","WGS84위도":37.51,"WGS84경도":127.00},
            {"id":"nearest","WGS84위도":37.505,"WGS84경도":127.00},
            {"id":"unset","WGS84위도":0,"WGS84경도":0},
            {"id":"blank","WGS84위도":null,"WGS84경도":"127.0"}
        ]"#,
    )
    .expect("write dataset");

    let mut hits = within_radius(
        GeoPoint::new(37.50, 127.00),
        DEFAULT_BELL_RADIUS_KM,
        BellStore::new(&path).load_all(),
    );
    sort_by_distance(&mut hits);
    let ids: Vec<_> = hits
        .iter()
        .map(|h| h.item["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, vec!["nearest", "near"]);
}
