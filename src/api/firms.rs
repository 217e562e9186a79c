//! Provides a client for the NASA FIRMS area API (active fire detections, CSV).
//!
//! Requires a FIRMS MAP_KEY. FIRMS reports a bad key with a plain-text body and a
//! 200 status, so the body is checked before CSV parsing.

use super::Fetcher;
use crate::engine::{haversine_km, BoundingBox};
use crate::error::{AppError, Result};
use crate::models::{FireConfidence, FireDetection, FirmsRecord};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info, warn};

pub const FIRMS_BASE_URL: &str = "https://firms.modaps.eosdis.nasa.gov";
pub const DEFAULT_SOURCE: &str = "VIIRS_SNPP_NRT";

pub struct FirmsClient {
    fetcher: Fetcher,
    base_url: String,
    map_key: String,
    source: String,
}

impl FirmsClient {
    pub fn new(fetcher: Fetcher, base_url: &str, map_key: &str, source: &str) -> Self {
        Self {
            fetcher: fetcher.redacting(map_key),
            base_url: base_url.trim_end_matches('/').to_string(),
            map_key: map_key.to_string(),
            source: source.to_string(),
        }
    }

    /// Fetches detections from the last `days` days within `radius_km` of a point.
    pub async fn get_detections(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        days: u8,
    ) -> Result<Vec<FireDetection>> {
        info!(
            "Fetching fire detections within {} km of {}, {}",
            radius_km, latitude, longitude
        );

        let bbox = BoundingBox::around(latitude, longitude, radius_km);
        let area = bbox.to_firms_area();
        let url = format!(
            "{}/api/area/csv/{}/{}/{}/{}",
            self.base_url,
            self.map_key,
            self.source,
            area,
            days.clamp(1, 10)
        );
        let body = self.fetcher.get_text(&url, &[]).await?;

        let detections: Vec<FireDetection> = parse_firms_csv(&body)?
            .into_iter()
            .filter(|d| bbox.contains(d.latitude, d.longitude))
            .filter(|d| haversine_km(latitude, longitude, d.latitude, d.longitude) <= radius_km)
            .collect();

        debug!("{} detections within {} km", detections.len(), radius_km);
        Ok(detections)
    }
}

/// Parses a FIRMS area CSV body. Rows with an unreadable confidence or
/// acquisition time are skipped.
pub fn parse_firms_csv(body: &str) -> Result<Vec<FireDetection>> {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !trimmed.starts_with("latitude") {
        let first_line = trimmed.lines().next().unwrap_or_default();
        return Err(AppError::Provider(format!("FIRMS: {}", first_line)));
    }

    let mut reader = csv::Reader::from_reader(trimmed.as_bytes());
    let mut detections = Vec::new();
    for record in reader.deserialize::<FirmsRecord>() {
        let record = record?;

        let Some(confidence) = FireConfidence::parse(&record.confidence) else {
            warn!("Skipping detection with confidence '{}'", record.confidence);
            continue;
        };
        let Some(acquired_at) = acquisition_time(&record.acq_date, &record.acq_time) else {
            warn!(
                "Skipping detection with acquisition time '{} {}'",
                record.acq_date, record.acq_time
            );
            continue;
        };

        detections.push(FireDetection {
            latitude: record.latitude,
            longitude: record.longitude,
            brightness: record.brightness.or(record.frp).unwrap_or(0.0),
            confidence,
            acquired_at,
        });
    }
    Ok(detections)
}

/// FIRMS splits acquisition into `YYYY-MM-DD` and `HHMM` (leading zeros may be dropped).
fn acquisition_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let hhmm: u32 = time.trim().parse().ok()?;
    let time = NaiveTime::from_hms_opt(hhmm / 100, hhmm % 100, 0)?;
    Some(date.and_time(time).and_utc())
}
