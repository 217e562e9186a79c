//! Input and output records of the risk engine, plus the per-location report the
//! CLI prints.

use super::{AirQualityReading, Alert, AlertSeverity, FireDetection, WeatherReading};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered safety classification. `Safe < Caution < Danger < Emergency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SafetyTier {
    Safe,
    Caution,
    Danger,
    Emergency,
}

impl SafetyTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Caution => "Caution",
            Self::Danger => "Danger",
            Self::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label attached to a fire risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FireRiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl FireRiskLevel {
    /// Fire risk levels track the tier the fire-score table assigns.
    pub fn from_tier(tier: SafetyTier) -> Self {
        match tier {
            SafetyTier::Safe => Self::Low,
            SafetyTier::Caution => Self::Moderate,
            SafetyTier::Danger => Self::High,
            SafetyTier::Emergency => Self::Extreme,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Extreme => "Extreme",
        }
    }
}

/// One of the individual signals the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Signal {
    HeatIndex,
    AirQuality,
    UvIndex,
    FireRisk,
    NearbyFires,
    WeatherAlert,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HeatIndex => "heat index",
            Self::AirQuality => "air quality",
            Self::UvIndex => "UV index",
            Self::FireRisk => "fire weather",
            Self::NearbyFires => "nearby fires",
            Self::WeatherAlert => "weather alert",
        }
    }
}

/// Population groups called out by the guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtRiskGroup {
    Elderly,
    Children,
    RespiratoryConditions,
    CardiovascularConditions,
    OutdoorWorkers,
}

impl AtRiskGroup {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Elderly => "Older adults",
            Self::Children => "Children",
            Self::RespiratoryConditions => "People with asthma or other respiratory conditions",
            Self::CardiovascularConditions => "People with heart disease",
            Self::OutdoorWorkers => "Outdoor workers",
        }
    }
}

/// The engine's input bundle. Every field is optional; an absent field simply
/// contributes nothing to the assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentInput {
    /// °F
    pub temperature: Option<f64>,
    /// percent
    pub humidity: Option<f64>,
    /// mph
    pub wind_speed: Option<f64>,
    pub uv_index: Option<f64>,
    /// µg/m³
    pub pm25: Option<f64>,
    pub fire_proximity_count: Option<u32>,
    pub active_alert_severity: Option<AlertSeverity>,
}

impl AssessmentInput {
    /// Assembles an input bundle from whatever readings were gathered. The most
    /// severe of the active alerts is the one carried forward.
    pub fn from_readings(
        weather: Option<&WeatherReading>,
        air: Option<&AirQualityReading>,
        fire_proximity_count: Option<u32>,
        alerts: &[Alert],
    ) -> Self {
        Self {
            temperature: weather.map(|w| w.temperature_f),
            humidity: weather.and_then(|w| w.humidity_pct),
            wind_speed: weather.map(|w| w.wind_speed_mph),
            uv_index: weather.and_then(|w| w.uv_index),
            pm25: air.map(|a| a.pm25),
            fire_proximity_count,
            active_alert_severity: alerts.iter().map(|a| a.severity).max(),
        }
    }
}

/// The engine's output. Computed fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Apparent temperature in °F; absent when no temperature was supplied.
    pub heat_index: Option<f64>,
    /// Composite fire weather score on a 0–10 scale.
    pub fire_risk_score: f64,
    pub fire_risk_level: FireRiskLevel,
    pub safety_tier: SafetyTier,
    /// Signals whose individual tier equals the overall tier. Empty when Safe.
    pub triggered_by: Vec<Signal>,
    /// Tier-level activity advice, then one line per signal above Safe.
    pub guidance: Vec<String>,
    pub at_risk_groups: Vec<AtRiskGroup>,
}

/// Everything gathered and derived for one location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: Option<WeatherReading>,
    pub air_quality: Option<AirQualityReading>,
    pub alerts: Vec<Alert>,
    /// Detections within the search radius; `None` when fire data was unavailable.
    pub fires: Option<Vec<FireDetection>>,
    pub nearby_fire_count: Option<u32>,
    pub assessment: RiskAssessment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertType;
    use chrono::Utc;

    fn alert(severity: AlertSeverity) -> Alert {
        Alert {
            alert_type: AlertType::Heat,
            event: "Heat Advisory".to_string(),
            severity,
            headline: None,
            area: "Maricopa County".to_string(),
            description: String::new(),
            instruction: None,
            effective: None,
            expires: None,
        }
    }

    #[test]
    fn test_input_from_readings_carries_worst_alert() {
        let weather = WeatherReading {
            temperature_f: 99.0,
            humidity_pct: Some(20.0),
            wind_speed_mph: 12.0,
            uv_index: None,
            observed_at: Utc::now(),
            extended: Default::default(),
        };
        let air = AirQualityReading::new(12.0);
        let alerts = vec![
            alert(AlertSeverity::Minor),
            alert(AlertSeverity::Extreme),
            alert(AlertSeverity::Moderate),
        ];

        let input = AssessmentInput::from_readings(Some(&weather), Some(&air), Some(2), &alerts);

        assert_eq!(input.temperature, Some(99.0));
        assert_eq!(input.humidity, Some(20.0));
        assert_eq!(input.wind_speed, Some(12.0));
        assert_eq!(input.uv_index, None);
        assert_eq!(input.pm25, Some(12.0));
        assert_eq!(input.fire_proximity_count, Some(2));
        assert_eq!(input.active_alert_severity, Some(AlertSeverity::Extreme));
    }

    #[test]
    fn test_input_from_nothing_is_empty() {
        let input = AssessmentInput::from_readings(None, None, None, &[]);
        assert_eq!(input, AssessmentInput::default());
    }

    #[test]
    fn test_input_deserializes_partial_camel_case_bundle() {
        let input: AssessmentInput = serde_json::from_str(
            r#"{"temperature": 88.5, "windSpeed": 14, "activeAlertSeverity": "severe"}"#,
        )
        .unwrap();
        assert_eq!(input.temperature, Some(88.5));
        assert_eq!(input.wind_speed, Some(14.0));
        assert_eq!(input.humidity, None);
        assert_eq!(input.active_alert_severity, Some(AlertSeverity::Severe));
    }

    #[test]
    fn test_tier_ordering() {
        assert!(SafetyTier::Safe < SafetyTier::Caution);
        assert!(SafetyTier::Caution < SafetyTier::Danger);
        assert!(SafetyTier::Danger < SafetyTier::Emergency);
    }
}
