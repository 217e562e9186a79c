//! Plain-text rendering of reports, alerts and fire detections for the terminal.

use crate::engine::haversine_km;
use crate::models::{Alert, FireDetection, LocationReport, Place, RiskAssessment, SafetyTier};
use colored::{ColoredString, Colorize};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::fmt::Write;

pub fn tier_colored(tier: SafetyTier) -> ColoredString {
    let label = tier.label().to_uppercase();
    match tier {
        SafetyTier::Safe => label.green().bold(),
        SafetyTier::Caution => label.yellow().bold(),
        SafetyTier::Danger => label.red().bold(),
        SafetyTier::Emergency => label.white().on_red().bold(),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn value_or_dash(value: Option<f64>, unit: &str, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => "n/a".to_string(),
    }
}

/// Renders the full report for a location: readings, then the assessment.
pub fn render_report(report: &LocationReport) -> String {
    let mut out = String::new();
    let title = match &report.name {
        Some(name) => format!("{} ({:.4}, {:.4})", name, report.latitude, report.longitude),
        None => format!("{:.4}, {:.4}", report.latitude, report.longitude),
    };
    let _ = writeln!(out, "{}", title.cyan().bold());

    let weather = report.weather.as_ref();
    let mut table = new_table(vec!["Reading", "Value"]);
    table.add_row(vec![
        "Temperature".to_string(),
        value_or_dash(weather.map(|w| w.temperature_f), " °F", 1),
    ]);
    table.add_row(vec![
        "Humidity".to_string(),
        value_or_dash(weather.and_then(|w| w.humidity_pct), " %", 0),
    ]);
    table.add_row(vec![
        "Wind".to_string(),
        value_or_dash(weather.map(|w| w.wind_speed_mph), " mph", 1),
    ]);
    table.add_row(vec![
        "UV index".to_string(),
        value_or_dash(weather.and_then(|w| w.uv_index), "", 1),
    ]);
    let pm25 = match &report.air_quality {
        Some(aq) => match aq.category {
            Some(category) => format!("{:.1} µg/m³ ({})", aq.pm25, category.label()),
            None => format!("{:.1} µg/m³", aq.pm25),
        },
        None => "n/a".to_string(),
    };
    table.add_row(vec!["PM2.5".to_string(), pm25]);
    let air = report.air_quality.as_ref();
    table.add_row(vec![
        "Ozone".to_string(),
        value_or_dash(air.and_then(|aq| aq.ozone), " µg/m³", 1),
    ]);
    table.add_row(vec![
        "NO₂".to_string(),
        value_or_dash(air.and_then(|aq| aq.nitrogen_dioxide), " µg/m³", 1),
    ]);

    let extended = weather.map(|w| &w.extended);
    let rows: [(&str, Option<f64>, &str, usize); 7] = [
        ("Wind gusts", extended.and_then(|e| e.wind_gusts_mph), " mph", 1),
        ("Visibility", extended.and_then(|e| e.visibility_miles), " mi", 1),
        ("Precipitation", extended.and_then(|e| e.precipitation_in), " in", 2),
        ("Cloud cover", extended.and_then(|e| e.cloud_cover_pct), " %", 0),
        ("Surface pressure", extended.and_then(|e| e.surface_pressure_hpa), " hPa", 1),
        ("Snow depth", extended.and_then(|e| e.snow_depth_in), " in", 1),
        ("Soil moisture", extended.and_then(|e| e.soil_moisture), " m³/m³", 3),
    ];
    for (label, value, unit, precision) in rows {
        table.add_row(vec![label.to_string(), value_or_dash(value, unit, precision)]);
    }
    table.add_row(vec![
        "Nearby fire detections".to_string(),
        report
            .nearby_fire_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "n/a".to_string()),
    ]);
    table.add_row(vec!["Active alerts".to_string(), report.alerts.len().to_string()]);
    let _ = writeln!(out, "{}", table);

    for alert in &report.alerts {
        let _ = writeln!(
            out,
            "{} {} ({})",
            "!".red().bold(),
            alert.headline.as_deref().unwrap_or(&alert.event),
            alert.severity
        );
    }

    out.push_str(&render_assessment(&report.assessment));
    out
}

/// Renders the engine output on its own.
pub fn render_assessment(assessment: &RiskAssessment) -> String {
    let mut out = String::new();

    let mut table = new_table(vec!["Derived", "Value"]);
    table.add_row(vec![
        "Heat index".to_string(),
        value_or_dash(assessment.heat_index, " °F", 1),
    ]);
    table.add_row(vec![
        "Fire risk".to_string(),
        format!(
            "{:.1} / 10 ({})",
            assessment.fire_risk_score,
            assessment.fire_risk_level.label()
        ),
    ]);
    let _ = writeln!(out, "{}", table);

    let _ = write!(out, "Safety status: {}", tier_colored(assessment.safety_tier));
    if !assessment.triggered_by.is_empty() {
        let drivers: Vec<&str> = assessment.triggered_by.iter().map(|s| s.label()).collect();
        let _ = write!(out, " (driven by {})", drivers.join(", "));
    }
    out.push('\n');

    for line in &assessment.guidance {
        let _ = writeln!(out, "  • {}", line);
    }
    if !assessment.at_risk_groups.is_empty() {
        let _ = writeln!(out, "{}", "At-risk groups:".bold());
        for group in &assessment.at_risk_groups {
            let _ = writeln!(out, "  - {}", group.label());
        }
    }
    out
}

pub fn render_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No active weather alerts.\n".to_string();
    }
    let mut table = new_table(vec!["Severity", "Type", "Event", "Area", "Expires"]);
    for alert in alerts {
        table.add_row(vec![
            alert.severity.to_string(),
            alert.alert_type.label().to_string(),
            alert.event.clone(),
            alert.area.clone(),
            alert
                .expires
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    format!("{}\n", table)
}

pub fn render_fires(detections: &[FireDetection], latitude: f64, longitude: f64) -> String {
    if detections.is_empty() {
        return "No fire detections in range.\n".to_string();
    }
    let mut sorted: Vec<(f64, &FireDetection)> = detections
        .iter()
        .map(|d| (haversine_km(latitude, longitude, d.latitude, d.longitude), d))
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut table = new_table(vec!["Distance", "Location", "Confidence", "Brightness", "Acquired"]);
    for (distance, d) in sorted {
        table.add_row(vec![
            format!("{:.1} km", distance),
            format!("{:.4}, {:.4}", d.latitude, d.longitude),
            format!("{:?}", d.confidence).to_lowercase(),
            format!("{:.1}", d.brightness),
            d.acquired_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ]);
    }
    format!("{}\n", table)
}

pub fn render_places(places: &[Place]) -> String {
    let mut out = String::new();
    for (i, place) in places.iter().enumerate() {
        let _ = writeln!(
            out,
            "[{}] {} ({:.4}, {:.4})",
            i + 1,
            place.name,
            place.latitude,
            place.longitude
        );
    }
    out
}
