//! Provides clients and utilities for interacting with external APIs.
//!
//! Includes:
//! - `fetch`: shared rate-limited, retrying GET client.
//! - `openmeteo`: current weather and PM2.5 (Open-Meteo).
//! - `nws`: active weather alerts (NOAA NWS).
//! - `firms`: active fire detections (NASA FIRMS).
//! - `nominatim`: US geocoding (OpenStreetMap Nominatim).

mod fetch;
mod firms;
mod nominatim;
mod nws;
mod openmeteo;

#[cfg(test)]
mod openmeteo_test;

pub use fetch::*;
pub use firms::*;
pub use nominatim::*;
pub use nws::*;
pub use openmeteo::*;
