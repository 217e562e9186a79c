//! Environmental hazard assessment for US locations.
//!
//! The [`engine`] turns weather, air-quality, fire and alert readings into a heat
//! index, a fire risk score and a safety tier with guidance. The [`api`] clients
//! gather those readings from Open-Meteo, NWS, NASA FIRMS and Nominatim, and the
//! [`cli`] module wires both into the `hazard-watch` binary.

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
