//! Ordered lookup tables mapping a signal value onto a safety tier.
//!
//! Each table is a list of `(min, tier)` bands sorted by `min`. A value falls in the
//! last band whose `min` it reaches; values below the first band are Safe. The
//! defaults follow NOAA heat index categories, EPA PM2.5 breakpoints and the WHO
//! UV index scale; all of them can be overridden from a JSON file.

use super::FireRiskModel;
use crate::models::SafetyTier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected threshold configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("{table} thresholds: boundary {value} is not finite")]
    NonFinite { table: &'static str, value: f64 },

    #[error("{table} thresholds: boundaries must be strictly ascending ({previous} then {next})")]
    Unsorted {
        table: &'static str,
        previous: f64,
        next: f64,
    },

    #[error("{table} thresholds: tiers must not decrease as boundaries rise")]
    TierDecreases { table: &'static str },

    #[error("fire risk ramp '{0}' has a non-finite bound, a negative weight or the wrong direction")]
    InvalidRamp(&'static str),
}

/// A single band of a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub tier: SafetyTier,
}

/// An ordered `boundary -> tier` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    bands: Vec<Band>,
}

impl ThresholdTable {
    /// Builds a table from `(min, tier)` pairs.
    pub fn new(bands: &[(f64, SafetyTier)]) -> Self {
        Self {
            bands: bands.iter().map(|&(min, tier)| Band { min, tier }).collect(),
        }
    }

    /// Looks up the tier for `value`. NaN never matches a band and stays Safe.
    pub fn tier_for(&self, value: f64) -> SafetyTier {
        self.bands
            .iter()
            .rev()
            .find(|band| value >= band.min)
            .map(|band| band.tier)
            .unwrap_or(SafetyTier::Safe)
    }

    fn validate(&self, table: &'static str) -> Result<(), ThresholdError> {
        for band in &self.bands {
            if !band.min.is_finite() {
                return Err(ThresholdError::NonFinite {
                    table,
                    value: band.min,
                });
            }
        }
        for pair in self.bands.windows(2) {
            if pair[1].min <= pair[0].min {
                return Err(ThresholdError::Unsorted {
                    table,
                    previous: pair[0].min,
                    next: pair[1].min,
                });
            }
            if pair[1].tier < pair[0].tier {
                return Err(ThresholdError::TierDecreases { table });
            }
        }
        Ok(())
    }
}

/// All tables the classifier uses, plus the fire risk model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    /// Heat index in °F.
    pub heat_index: ThresholdTable,
    /// PM2.5 in µg/m³.
    pub pm25: ThresholdTable,
    pub uv_index: ThresholdTable,
    /// Fire risk score (0–10).
    pub fire_risk: ThresholdTable,
    /// Number of fire detections within the search radius.
    pub nearby_fires: ThresholdTable,
    pub fire_model: FireRiskModel,
}

impl Default for Thresholds {
    fn default() -> Self {
        use SafetyTier::*;
        Self {
            heat_index: ThresholdTable::new(&[(80.0, Caution), (103.0, Danger), (125.0, Emergency)]),
            pm25: ThresholdTable::new(&[(35.5, Caution), (55.5, Danger), (225.5, Emergency)]),
            uv_index: ThresholdTable::new(&[(6.0, Caution), (8.0, Danger)]),
            fire_risk: ThresholdTable::new(&[(3.0, Caution), (6.0, Danger), (8.0, Emergency)]),
            nearby_fires: ThresholdTable::new(&[(1.0, Caution), (3.0, Danger), (10.0, Emergency)]),
            fire_model: FireRiskModel::default(),
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ThresholdError> {
        self.heat_index.validate("heat index")?;
        self.pm25.validate("pm2.5")?;
        self.uv_index.validate("uv index")?;
        self.fire_risk.validate("fire risk")?;
        self.nearby_fires.validate("nearby fires")?;
        self.fire_model.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use SafetyTier::*;

    #[rstest]
    #[case(79.9, Safe)]
    #[case(80.0, Caution)]
    #[case(102.9, Caution)]
    #[case(103.0, Danger)]
    #[case(125.0, Emergency)]
    #[case(160.0, Emergency)]
    fn test_heat_index_bands(#[case] value: f64, #[case] expected: SafetyTier) {
        assert_eq!(Thresholds::default().heat_index.tier_for(value), expected);
    }

    #[rstest]
    #[case(8.0, Safe)]
    #[case(35.5, Caution)]
    #[case(180.0, Danger)]
    #[case(500.0, Emergency)]
    fn test_pm25_bands(#[case] value: f64, #[case] expected: SafetyTier) {
        assert_eq!(Thresholds::default().pm25.tier_for(value), expected);
    }

    #[test]
    fn test_uv_table_tops_out_at_danger() {
        let table = Thresholds::default().uv_index;
        assert_eq!(table.tier_for(2.0), Safe);
        assert_eq!(table.tier_for(9.0), Danger);
        assert_eq!(table.tier_for(14.0), Danger);
    }

    #[test]
    fn test_nan_is_safe() {
        assert_eq!(Thresholds::default().pm25.tier_for(f64::NAN), Safe);
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(Thresholds::default().validate(), Ok(()));
    }

    #[test]
    fn test_unsorted_table_is_rejected() {
        let thresholds = Thresholds {
            pm25: ThresholdTable::new(&[(55.5, Danger), (35.5, Caution)]),
            ..Thresholds::default()
        };
        assert_eq!(
            thresholds.validate(),
            Err(ThresholdError::Unsorted {
                table: "pm2.5",
                previous: 55.5,
                next: 35.5
            })
        );
    }

    #[test]
    fn test_decreasing_tier_is_rejected() {
        let thresholds = Thresholds {
            uv_index: ThresholdTable::new(&[(6.0, Danger), (8.0, Caution)]),
            ..Thresholds::default()
        };
        assert_eq!(
            thresholds.validate(),
            Err(ThresholdError::TierDecreases { table: "uv index" })
        );
    }

    #[test]
    fn test_partial_json_override_keeps_other_defaults() {
        let json = r#"{
            "pm25": [
                {"min": 12.1, "tier": "Caution"},
                {"min": 35.5, "tier": "Danger"},
                {"min": 150.5, "tier": "Emergency"}
            ]
        }"#;
        let thresholds: Thresholds = serde_json::from_str(json).unwrap();

        assert_eq!(thresholds.pm25.tier_for(20.0), Caution);
        assert_eq!(thresholds.pm25.tier_for(200.0), Emergency);
        assert_eq!(thresholds.heat_index, Thresholds::default().heat_index);
        assert_eq!(thresholds.fire_model, FireRiskModel::default());
    }
}
