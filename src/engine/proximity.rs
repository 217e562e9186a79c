//! Great-circle distance helpers for turning fire detections into a proximity count.

use crate::models::{FireConfidence, FireDetection};

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_PER_DEGREE_LAT: f64 = 111.32;

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Counts detections within `radius_km` of the point whose confidence is at least
/// `min_confidence`.
pub fn count_nearby_fires(
    detections: &[FireDetection],
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    min_confidence: FireConfidence,
) -> u32 {
    let count = detections
        .iter()
        .filter(|d| d.confidence >= min_confidence)
        .filter(|d| haversine_km(latitude, longitude, d.latitude, d.longitude) <= radius_km)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// West/south/east/north box that encloses a circle of `radius_km`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn around(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        let d_lat = radius_km / KM_PER_DEGREE_LAT;
        // Longitude degrees shrink towards the poles; cap the cosine to keep the box finite.
        let d_lon = radius_km / (KM_PER_DEGREE_LAT * latitude.to_radians().cos().max(0.01));
        Self {
            west: (longitude - d_lon).max(-180.0),
            south: (latitude - d_lat).max(-90.0),
            east: (longitude + d_lon).min(180.0),
            north: (latitude + d_lat).min(90.0),
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }

    /// The `west,south,east,north` form FIRMS expects.
    pub fn to_firms_area(&self) -> String {
        format!(
            "{:.4},{:.4},{:.4},{:.4}",
            self.west, self.south, self.east, self.north
        )
    }
}
