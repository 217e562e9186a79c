//! Typed snapshots of the raw readings gathered for a location.
//!
//! Includes:
//! - Weather and air-quality readings (already normalized to °F / mph / percent).
//! - Fire detections and their confidence classes.
//! - Weather alerts with their NWS severity vocabulary.
//! - Geocoded places.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Point-in-time weather at a location. Created per query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Air temperature in °F.
    pub temperature_f: f64,
    /// Relative humidity in percent, when the provider reported one.
    pub humidity_pct: Option<f64>,
    /// Wind speed in mph.
    pub wind_speed_mph: f64,
    /// UV index (0–11+), when the provider reported one.
    pub uv_index: Option<f64>,
    pub observed_at: DateTime<Utc>,
    /// Shown in reports; the engine never reads these.
    #[serde(default)]
    pub extended: ExtendedConditions,
}

/// Secondary weather readings reported alongside the core ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedConditions {
    pub wind_gusts_mph: Option<f64>,
    pub visibility_miles: Option<f64>,
    /// Precipitation over the preceding hour, in inches.
    pub precipitation_in: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub surface_pressure_hpa: Option<f64>,
    pub snow_depth_in: Option<f64>,
    /// Volumetric soil moisture at 0–1 cm depth (m³/m³).
    pub soil_moisture: Option<f64>,
}

/// US EPA Air Quality Index categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Maps a PM2.5 concentration (µg/m³) onto its AQI category using the
    /// EPA 2024 breakpoints.
    pub fn from_pm25(pm25: f64) -> Self {
        match pm25 {
            v if v <= 9.0 => Self::Good,
            v if v <= 35.4 => Self::Moderate,
            v if v <= 55.4 => Self::UnhealthyForSensitiveGroups,
            v if v <= 125.4 => Self::Unhealthy,
            v if v <= 225.4 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

/// Point-in-time air quality at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityReading {
    /// PM2.5 concentration in µg/m³.
    pub pm25: f64,
    pub category: Option<AqiCategory>,
    /// Ozone in µg/m³.
    #[serde(default)]
    pub ozone: Option<f64>,
    /// Nitrogen dioxide in µg/m³.
    #[serde(default)]
    pub nitrogen_dioxide: Option<f64>,
}

impl AirQualityReading {
    /// Builds a reading and derives its AQI category from the concentration.
    pub fn new(pm25: f64) -> Self {
        Self {
            pm25,
            category: Some(AqiCategory::from_pm25(pm25)),
            ozone: None,
            nitrogen_dioxide: None,
        }
    }

    pub fn with_gases(mut self, ozone: Option<f64>, nitrogen_dioxide: Option<f64>) -> Self {
        self.ozone = ozone;
        self.nitrogen_dioxide = nitrogen_dioxide;
        self
    }
}

/// Detection confidence class as published by FIRMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FireConfidence {
    Low,
    Nominal,
    High,
}

impl FireConfidence {
    /// Parses either the VIIRS letter codes (`l`, `n`, `h`) or the MODIS
    /// numeric confidence (0–100).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "l" | "low" => return Some(Self::Low),
            "n" | "nominal" => return Some(Self::Nominal),
            "h" | "high" => return Some(Self::High),
            _ => {},
        }
        let percent: u8 = raw.parse().ok()?;
        match percent {
            0..=29 => Some(Self::Low),
            30..=79 => Some(Self::Nominal),
            80..=100 => Some(Self::High),
            _ => None,
        }
    }
}

/// A single satellite fire detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireDetection {
    pub latitude: f64,
    pub longitude: f64,
    /// Brightness temperature in Kelvin, or radiative power when brightness is absent.
    pub brightness: f64,
    pub confidence: FireConfidence,
    pub acquired_at: DateTime<Utc>,
}

/// Category of a weather alert, derived from the NWS event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertType {
    Tornado,
    Thunderstorm,
    Flood,
    Heat,
    Wind,
    FireWeather,
    Fog,
    Other,
}

impl AlertType {
    /// Classifies an NWS event name such as "Red Flag Warning" or "Flash Flood Watch".
    pub fn from_event(event: &str) -> Self {
        let event = event.to_ascii_lowercase();
        if event.contains("tornado") {
            Self::Tornado
        } else if event.contains("thunderstorm") {
            Self::Thunderstorm
        } else if event.contains("flood") {
            Self::Flood
        } else if event.contains("heat") {
            Self::Heat
        } else if event.contains("red flag") || event.contains("fire weather") {
            Self::FireWeather
        } else if event.contains("fog") {
            Self::Fog
        } else if event.contains("wind") && !event.contains("chill") {
            Self::Wind
        } else {
            Self::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tornado => "Tornado",
            Self::Thunderstorm => "Thunderstorm",
            Self::Flood => "Flood",
            Self::Heat => "Heat",
            Self::Wind => "Wind",
            Self::FireWeather => "Fire Weather",
            Self::Fog => "Fog",
            Self::Other => "Other",
        }
    }
}

/// NWS CAP severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Unknown,
    Minor,
    Moderate,
    Severe,
    Extreme,
}

impl AlertSeverity {
    /// Severe and Extreme alerts force the safety tier to at least Danger.
    pub fn is_high(&self) -> bool {
        *self >= Self::Severe
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
            Self::Extreme => "Extreme",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown" => Ok(Self::Unknown),
            "minor" => Ok(Self::Minor),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            "extreme" => Ok(Self::Extreme),
            other => Err(format!(
                "unknown alert severity '{}' (expected minor, moderate, severe or extreme)",
                other
            )),
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An active weather alert covering a location. Display-only input to the engine,
/// which looks at nothing but its severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub alert_type: AlertType,
    /// The raw NWS event name, e.g. "Excessive Heat Warning".
    pub event: String,
    pub severity: AlertSeverity,
    pub headline: Option<String>,
    pub area: String,
    pub description: String,
    pub instruction: Option<String>,
    pub effective: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}
