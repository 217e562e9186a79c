//! Composite fire weather score on a 0–10 scale.
//!
//! Each factor is mapped onto `[0, 1]` by a linear ramp between a "no risk" and a
//! "full risk" bound, weighted, and summed. Missing or non-finite inputs contribute
//! nothing.

use super::ThresholdError;
use serde::{Deserialize, Serialize};

pub const FIRE_RISK_MAX: f64 = 10.0;

/// Linear normalization of one factor. `zero` maps to 0 and `full` maps to 1;
/// when `full < zero` the ramp is descending (lower values mean more risk).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub zero: f64,
    pub full: f64,
    pub weight: f64,
}

impl Ramp {
    pub fn contribution(&self, value: Option<f64>) -> f64 {
        match value.filter(|v| v.is_finite()) {
            Some(v) => ((v - self.zero) / (self.full - self.zero)).clamp(0.0, 1.0) * self.weight,
            None => 0.0,
        }
    }

    fn is_ascending(&self) -> bool {
        self.full > self.zero
    }

    fn is_descending(&self) -> bool {
        self.full < self.zero
    }
}

/// Weights and ramps of the fire risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireRiskModel {
    /// °F
    pub temperature: Ramp,
    /// percent, descending
    pub humidity: Ramp,
    /// mph
    pub wind: Ramp,
}

impl Default for FireRiskModel {
    fn default() -> Self {
        Self {
            temperature: Ramp {
                zero: 60.0,
                full: 100.0,
                weight: 3.0,
            },
            humidity: Ramp {
                zero: 70.0,
                full: 10.0,
                weight: 4.0,
            },
            wind: Ramp {
                zero: 5.0,
                full: 30.0,
                weight: 3.0,
            },
        }
    }
}

impl FireRiskModel {
    /// Scores the three factors. The result is always within `[0, 10]`.
    pub fn score(&self, temperature_f: Option<f64>, humidity_pct: Option<f64>, wind_mph: Option<f64>) -> f64 {
        let total = self.temperature.contribution(temperature_f)
            + self.humidity.contribution(humidity_pct)
            + self.wind.contribution(wind_mph);
        total.clamp(0.0, FIRE_RISK_MAX)
    }

    /// Rejects ramps that would break the monotonicity of the score: temperature
    /// and wind must ramp upward, humidity downward, weights must be non-negative.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let ramps = [
            ("temperature", &self.temperature, self.temperature.is_ascending()),
            ("humidity", &self.humidity, self.humidity.is_descending()),
            ("wind", &self.wind, self.wind.is_ascending()),
        ];
        for (name, ramp, direction_ok) in ramps {
            let finite = ramp.zero.is_finite() && ramp.full.is_finite() && ramp.weight.is_finite();
            if !finite || ramp.weight < 0.0 || !direction_ok {
                return Err(ThresholdError::InvalidRamp(name));
            }
        }
        Ok(())
    }
}

/// Scores fire weather with the default model.
pub fn fire_risk_score(temperature_f: Option<f64>, humidity_pct: Option<f64>, wind_mph: Option<f64>) -> f64 {
    FireRiskModel::default().score(temperature_f, humidity_pct, wind_mph)
}
