//! Wire formats of the third-party providers.
//!
//! These mirror the provider payloads as closely as needed and nothing more;
//! conversion into the typed readings happens in the `api` clients.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// --- Open-Meteo forecast ---

/// Response of `/v1/forecast` with `current_weather=true` and an hourly block.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastResponse {
    pub current_weather: CurrentWeather,
    /// The `current=` block with the secondary variables.
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    pub hourly: Option<HourlySeries>,
}

/// The `current_weather` block. Units are provider defaults (°C, km/h).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    /// ISO-8601 local time without offset, e.g. `2024-07-01T15:00`.
    pub time: String,
}

/// Units are provider defaults (km/h, mm, %, hPa).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CurrentConditions {
    pub wind_gusts_10m: Option<f64>,
    pub precipitation: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub surface_pressure: Option<f64>,
}

/// Hourly series, index-aligned with `time`. Any value may be null.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub relativehumidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub uv_index: Vec<Option<f64>>,
    /// metres
    #[serde(default)]
    pub visibility: Vec<Option<f64>>,
    /// metres
    #[serde(default)]
    pub snow_depth: Vec<Option<f64>>,
    #[serde(default)]
    pub soil_moisture_0_to_1cm: Vec<Option<f64>>,
}

// --- Open-Meteo air quality ---

/// Response of `/v1/air-quality` with `current=pm2_5,ozone,nitrogen_dioxide`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirQualityResponse {
    pub current: Option<AirQualityCurrent>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AirQualityCurrent {
    pub time: Option<String>,
    pub pm2_5: Option<f64>,
    pub ozone: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
}

// --- NWS alerts (GeoJSON) ---

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NwsAlertCollection {
    #[serde(default)]
    pub features: Vec<NwsAlertFeature>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NwsAlertFeature {
    pub properties: NwsAlertProperties,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NwsAlertProperties {
    pub event: String,
    pub severity: Option<String>,
    pub headline: Option<String>,
    pub area_desc: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub effective: Option<DateTime<FixedOffset>>,
    pub expires: Option<DateTime<FixedOffset>>,
}

// --- NASA FIRMS area CSV ---

/// One CSV row of the FIRMS area API. VIIRS sources publish `bright_ti4`,
/// MODIS sources publish `brightness`.
#[derive(Debug, Clone, Deserialize)]
pub struct FirmsRecord {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(alias = "bright_ti4", default)]
    pub brightness: Option<f64>,
    #[serde(default)]
    pub frp: Option<f64>,
    pub acq_date: String,
    pub acq_time: String,
    pub confidence: String,
}

// --- Nominatim ---

/// One result of Nominatim `/search?format=json`. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}
