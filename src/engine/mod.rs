//! The environmental risk assessment engine.
//!
//! Pure, synchronous functions that turn a location's weather, air-quality and fire
//! readings into a heat index, a fire risk score and a safety tier with guidance.
//! Nothing here performs I/O or keeps state between calls, so a [`RiskEngine`] can be
//! shared freely across threads.

mod classifier;
mod fire_risk;
mod heat_index;
mod proximity;
mod thresholds;

pub use classifier::*;
pub use fire_risk::*;
pub use heat_index::*;
pub use proximity::*;
pub use thresholds::*;

use crate::models::{AssessmentInput, FireRiskLevel, RiskAssessment};
use rayon::prelude::*;
use tracing::debug;

/// Assesses input bundles against a validated set of thresholds.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    thresholds: Thresholds,
}

impl RiskEngine {
    /// Creates an engine after checking the tables are ordered and the fire model
    /// keeps the score monotonic.
    pub fn new(thresholds: Thresholds) -> Result<Self, ThresholdError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Produces a fresh assessment for one input bundle.
    ///
    /// Absent and non-finite inputs are treated as "no contribution". When
    /// temperature is known but humidity is not, the heat index falls back to the
    /// temperature itself.
    pub fn assess(&self, input: &AssessmentInput) -> RiskAssessment {
        let temperature = finite(input.temperature);
        let humidity = finite(input.humidity);

        let apparent_f = temperature.map(|t| match humidity {
            Some(rh) => heat_index(t, rh),
            None => t,
        });

        let fire_risk_score =
            self.thresholds
                .fire_model
                .score(temperature, humidity, finite(input.wind_speed));

        let signals = SignalSet {
            heat_index: apparent_f,
            pm25: finite(input.pm25),
            uv_index: finite(input.uv_index),
            fire_risk_score: Some(fire_risk_score),
            nearby_fires: input.fire_proximity_count,
            alert_severity: input.active_alert_severity,
        };
        let classification = classify(&signals, &self.thresholds);

        RiskAssessment {
            heat_index: apparent_f,
            fire_risk_score,
            fire_risk_level: FireRiskLevel::from_tier(
                self.thresholds.fire_risk.tier_for(fire_risk_score),
            ),
            safety_tier: classification.tier,
            triggered_by: classification.triggered_by,
            guidance: classification.guidance,
            at_risk_groups: classification.at_risk_groups,
        }
    }

    /// Assesses many bundles in parallel. Output order matches input order.
    pub fn assess_batch(&self, inputs: &[AssessmentInput]) -> Vec<RiskAssessment> {
        debug!("Assessing a batch of {} inputs", inputs.len());
        inputs.par_iter().map(|input| self.assess(input)).collect()
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
