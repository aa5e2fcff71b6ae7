//! Radius search shared by the emergency bell and hotzone resources.
//!
//! Distances are planar: the Euclidean distance between two points in
//! degrees, scaled by [`KM_PER_DEGREE`]. That is the length of one degree of
//! latitude at the equator, so the result is only meaningful for short
//! ranges (a few kilometres) and ignores longitude convergence entirely.
//!
//! A coordinate of exactly `0.0` marks an unset value in the bell dataset and
//! excludes the candidate from every search.

use serde::Serialize;

/// Kilometres per degree used for the degree-to-km conversion.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Search radius used by the bell `nearby` query when none is given.
pub const DEFAULT_BELL_RADIUS_KM: f64 = 2.0;

/// Search radius used by the hotzone `nearby` query when none is given.
pub const DEFAULT_HOTZONE_RADIUS_KM: f64 = 5.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar distance to `other` in degrees.
    pub fn degrees_to(&self, other: &GeoPoint) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }

    /// Approximate distance to `other` in kilometres.
    pub fn km_to(&self, other: &GeoPoint) -> f64 {
        self.degrees_to(other) * KM_PER_DEGREE
    }
}

/// Anything that can be placed on the map.
pub trait Located {
    /// The entity's position, or `None` if it has no usable coordinates.
    fn coordinates(&self) -> Option<GeoPoint>;
}

/// A search hit annotated with its rounded distance from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<T> {
    pub item: T,
    pub distance_km: f64,
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn usable(point: &GeoPoint) -> bool {
    point.lat.is_finite() && point.lng.is_finite() && point.lat != 0.0 && point.lng != 0.0
}

/// Keep the candidates whose approximate distance from `center` is at most
/// `radius_km`, preserving input order.
pub fn within_radius<T, I>(center: GeoPoint, radius_km: f64, candidates: I) -> Vec<Nearby<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    candidates
        .into_iter()
        .filter_map(|item| {
            let point = item.coordinates().filter(usable)?;
            let km = center.km_to(&point);
            (km <= radius_km).then(|| Nearby {
                item,
                distance_km: round2(km),
            })
        })
        .collect()
}

/// Sort hits nearest first. Equal distances keep their input order.
pub fn sort_by_distance<T>(hits: &mut [Nearby<T>]) {
    hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

/// Sort hits by a rank key, highest first. Equal ranks keep their input order.
pub fn sort_by_rank_desc<T, K, F>(hits: &mut [Nearby<T>], mut rank: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    hits.sort_by(|a, b| rank(&b.item).cmp(&rank(&a.item)));
}
