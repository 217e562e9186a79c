//! Provides a client for the Open-Meteo forecast and air-quality APIs.
//!
//! Open-Meteo needs no API key. Readings are converted to °F and mph here so the
//! engine never sees provider-native units.

use super::Fetcher;
use crate::error::{AppError, Result};
use crate::models::{
    AirQualityReading, AirQualityResponse, ExtendedConditions, ForecastResponse, WeatherReading,
};
use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, warn};

pub const FORECAST_BASE_URL: &str = "https://api.open-meteo.com";
pub const AIR_QUALITY_BASE_URL: &str = "https://air-quality-api.open-meteo.com";

const KMH_TO_MPH: f64 = 0.621371;
const METRES_TO_MILES: f64 = 0.000621371;
const MM_PER_INCH: f64 = 25.4;
const CURRENT_VARIABLES: &str = "wind_gusts_10m,precipitation,cloud_cover,surface_pressure";
const HOURLY_VARIABLES: &str =
    "relativehumidity_2m,uv_index,visibility,snow_depth,soil_moisture_0_to_1cm";
const AIR_QUALITY_VARIABLES: &str = "pm2_5,ozone,nitrogen_dioxide";

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * KMH_TO_MPH
}

/// An asynchronous client for current weather and PM2.5 at a point.
pub struct OpenMeteoClient {
    fetcher: Fetcher,
    forecast_url: String,
    air_quality_url: String,
}

impl OpenMeteoClient {
    pub fn new(fetcher: Fetcher, forecast_url: &str, air_quality_url: &str) -> Self {
        Self {
            fetcher,
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
            air_quality_url: air_quality_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches current temperature and wind, plus humidity and UV from the hourly
    /// row matching the current observation time.
    pub async fn get_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherReading> {
        info!("Fetching weather for {}, {}", latitude, longitude);

        let url = format!("{}/v1/forecast", self.forecast_url);
        let forecast: ForecastResponse = self
            .fetcher
            .get_json(
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("current_weather", "true".to_string()),
                    ("current", CURRENT_VARIABLES.to_string()),
                    ("hourly", HOURLY_VARIABLES.to_string()),
                    ("timezone", "GMT".to_string()),
                ],
            )
            .await?;

        Ok(weather_from_forecast(&forecast))
    }

    /// Fetches current PM2.5, ozone and NO₂. `Ok(None)` when the provider has no
    /// PM2.5 value for the point.
    pub async fn get_air_quality(&self, latitude: f64, longitude: f64) -> Result<Option<AirQualityReading>> {
        info!("Fetching air quality for {}, {}", latitude, longitude);

        let url = format!("{}/v1/air-quality", self.air_quality_url);
        let response: AirQualityResponse = self
            .fetcher
            .get_json(
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("current", AIR_QUALITY_VARIABLES.to_string()),
                    ("timezone", "GMT".to_string()),
                ],
            )
            .await?;

        let current = response.current.unwrap_or_default();
        match current.pm2_5 {
            Some(value) if value.is_finite() && value >= 0.0 => {
                debug!("PM2.5 at {}, {} is {}", latitude, longitude, value);
                Ok(Some(AirQualityReading::new(value).with_gases(
                    non_negative(current.ozone),
                    non_negative(current.nitrogen_dioxide),
                )))
            },
            Some(value) => Err(AppError::Provider(format!(
                "Open-Meteo returned an invalid PM2.5 value: {}",
                value
            ))),
            None => {
                warn!("No PM2.5 value available for {}, {}", latitude, longitude);
                Ok(None)
            },
        }
    }
}

fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

fn at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten().filter(|v| v.is_finite())
}

/// Converts a forecast payload into a reading in °F / mph / percent.
///
/// The hourly row whose time equals `current_weather.time` supplies humidity, UV,
/// visibility, snow depth and soil moisture; if no row matches, the first row is used.
pub fn weather_from_forecast(forecast: &ForecastResponse) -> WeatherReading {
    let current = &forecast.current_weather;
    let conditions = forecast.current.clone().unwrap_or_default();
    let hourly = forecast.hourly.clone().unwrap_or_default();

    let index = hourly
        .time
        .iter()
        .position(|t| t == &current.time)
        .unwrap_or(0);
    let humidity_pct = at(&hourly.relativehumidity_2m, index);
    let uv_index = at(&hourly.uv_index, index);

    let extended = ExtendedConditions {
        wind_gusts_mph: non_negative(conditions.wind_gusts_10m).map(kmh_to_mph),
        visibility_miles: non_negative(at(&hourly.visibility, index)).map(|m| m * METRES_TO_MILES),
        precipitation_in: non_negative(conditions.precipitation).map(|mm| mm / MM_PER_INCH),
        cloud_cover_pct: non_negative(conditions.cloud_cover).map(|c| c.min(100.0)),
        surface_pressure_hpa: non_negative(conditions.surface_pressure),
        snow_depth_in: non_negative(at(&hourly.snow_depth, index))
            .map(|m| m * 1000.0 / MM_PER_INCH),
        soil_moisture: non_negative(at(&hourly.soil_moisture_0_to_1cm, index)),
    };

    let observed_at = NaiveDateTime::parse_from_str(&current.time, "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|e| {
            warn!("Unparseable observation time '{}': {}", current.time, e);
            Utc::now()
        });

    WeatherReading {
        temperature_f: celsius_to_fahrenheit(current.temperature),
        humidity_pct: humidity_pct.map(|h| h.clamp(0.0, 100.0)),
        wind_speed_mph: kmh_to_mph(current.windspeed),
        uv_index: uv_index.map(|uv| uv.max(0.0)),
        observed_at,
        extended,
    }
}
