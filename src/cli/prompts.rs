//! Interactive prompts used by the menu-driven mode.

use super::{CheckArgs, LocationArgs, PointArgs};
use crate::error::Result;
use crate::models::{AlertSeverity, Place};
use dialoguer::{theme::ColorfulTheme, FuzzySelect, Input, Select};

pub fn prompt_point() -> Result<PointArgs> {
    let theme = ColorfulTheme::default();
    let lat = Input::<f64>::with_theme(&theme)
        .with_prompt("Latitude")
        .validate_with(|v: &f64| -> std::result::Result<(), &'static str> {
            if (-90.0..=90.0).contains(v) {
                Ok(())
            } else {
                Err("Latitude must be between -90 and 90")
            }
        })
        .interact_text()?;
    let lon = Input::<f64>::with_theme(&theme)
        .with_prompt("Longitude")
        .validate_with(|v: &f64| -> std::result::Result<(), &'static str> {
            if (-180.0..=180.0).contains(v) {
                Ok(())
            } else {
                Err("Longitude must be between -180 and 180")
            }
        })
        .interact_text()?;
    Ok(PointArgs { lat, lon })
}

pub fn prompt_location() -> Result<LocationArgs> {
    Ok(LocationArgs {
        point: prompt_point()?,
        radius_km: None,
        json: false,
    })
}

pub fn prompt_query() -> Result<String> {
    let query = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Place name (e.g. \"Boulder, CO\")")
        .interact_text()?;
    Ok(query.trim().to_string())
}

/// Asks for a number the user may skip by pressing enter.
fn prompt_optional(label: &str) -> Result<Option<f64>> {
    let raw = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{} (enter to skip)", label))
        .allow_empty(true)
        .validate_with(|s: &String| -> std::result::Result<(), &'static str> {
            let s = s.trim();
            if s.is_empty() || s.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
                Ok(())
            } else {
                Err("Enter a number or leave blank")
            }
        })
        .interact_text()?;
    let raw = raw.trim();
    Ok(if raw.is_empty() { None } else { raw.parse().ok() })
}

pub fn prompt_check_args() -> Result<CheckArgs> {
    let temperature = prompt_optional("Temperature (°F)")?;
    let humidity = prompt_optional("Relative humidity (%)")?;
    let wind = prompt_optional("Wind speed (mph)")?;
    let uv = prompt_optional("UV index")?;
    let pm25 = prompt_optional("PM2.5 (µg/m³)")?;
    let fires = prompt_optional("Fire detections nearby")?.map(|n| n.max(0.0).round() as u32);

    let severities = ["None", "Minor", "Moderate", "Severe", "Extreme"];
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Most severe active weather alert")
        .items(&severities)
        .default(0)
        .interact()?;
    let alert_severity = match choice {
        1 => Some(AlertSeverity::Minor),
        2 => Some(AlertSeverity::Moderate),
        3 => Some(AlertSeverity::Severe),
        4 => Some(AlertSeverity::Extreme),
        _ => None,
    };

    Ok(CheckArgs {
        temperature,
        humidity,
        wind,
        uv,
        pm25,
        fires,
        alert_severity,
        json: false,
    })
}

/// Lets the user pick one of several geocoding results. `None` when cancelled.
pub fn choose_place(places: &[Place]) -> Result<Option<usize>> {
    let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
    let choice = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Which place?")
        .items(&names)
        .default(0)
        .interact_opt()?;
    Ok(choice)
}
