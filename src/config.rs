//! Runtime configuration loaded from the environment (and an optional `.env` file).

use crate::api::{
    AIR_QUALITY_BASE_URL, DEFAULT_SOURCE, FIRMS_BASE_URL, FORECAST_BASE_URL, NOMINATIM_BASE_URL,
    NWS_BASE_URL,
};
use crate::engine::Thresholds;
use crate::error::{AppError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_FIRE_RADIUS_KM: f64 = 50.0;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub providers: ProviderConfig,
    pub thresholds: Thresholds,
    /// Radius used to count nearby fire detections.
    pub fire_radius_km: f64,
    pub logging: LoggingConfig,
}

/// Base URLs and credentials of the upstream providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub open_meteo_url: String,
    pub open_meteo_air_url: String,
    pub nws_url: String,
    pub firms_url: String,
    /// Fire detections are skipped when no key is configured.
    pub firms_map_key: Option<String>,
    pub firms_source: String,
    pub nominatim_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Daily rolling log files are written here when set.
    pub directory: Option<PathBuf>,
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let providers = ProviderConfig {
            open_meteo_url: get_or("OPEN_METEO_URL", FORECAST_BASE_URL),
            open_meteo_air_url: get_or("OPEN_METEO_AIR_URL", AIR_QUALITY_BASE_URL),
            nws_url: get_or("NWS_URL", NWS_BASE_URL),
            firms_url: get_or("FIRMS_URL", FIRMS_BASE_URL),
            firms_map_key: get("FIRMS_MAP_KEY"),
            firms_source: get_or("FIRMS_SOURCE", DEFAULT_SOURCE),
            nominatim_url: get_or("NOMINATIM_URL", NOMINATIM_BASE_URL),
            user_agent: get_or(
                "HAZARD_USER_AGENT",
                concat!("hazard-watch/", env!("CARGO_PKG_VERSION")),
            ),
        };

        let thresholds = match get("HAZARD_THRESHOLDS") {
            Some(path) => load_thresholds(Path::new(&path))?,
            None => Thresholds::default(),
        };

        let fire_radius_km = match get("HAZARD_FIRE_RADIUS_KM") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(km) if km.is_finite() && km > 0.0 => km,
                _ => {
                    return Err(AppError::Config(format!(
                        "HAZARD_FIRE_RADIUS_KM must be a positive number, got '{}'",
                        raw
                    )))
                },
            },
            None => DEFAULT_FIRE_RADIUS_KM,
        };

        let format = match get("HAZARD_LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Text,
            Some(f) if f == "text" => LogFormat::Text,
            Some(f) if f == "json" => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "HAZARD_LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                )))
            },
        };

        Ok(Self {
            providers,
            thresholds,
            fire_radius_km,
            logging: LoggingConfig {
                directory: get("HAZARD_LOG_DIR").map(PathBuf::from),
                format,
            },
        })
    }
}

/// Reads threshold tables from a JSON file and validates them. Tables missing from
/// the file keep their defaults.
pub fn load_thresholds(path: &Path) -> Result<Thresholds> {
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!(
            "cannot read thresholds file {}: {}",
            path.display(),
            e
        ))
    })?;
    let thresholds: Thresholds = serde_json::from_str(&raw).map_err(|e| {
        AppError::Config(format!(
            "invalid thresholds file {}: {}",
            path.display(),
            e
        ))
    })?;
    thresholds.validate()?;
    Ok(thresholds)
}
