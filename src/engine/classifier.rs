//! Worst-signal safety classification and guidance.
//!
//! Every present signal is looked up in its threshold table; the overall tier is
//! the maximum of those tiers. A Severe or Extreme weather alert lifts the tier to
//! at least Danger. Signals are never averaged.
//!
//! The signals at the overall tier are reported as its drivers, while guidance and
//! at-risk groups cover every elevated signal so lesser hazards still get advice.

use super::Thresholds;
use crate::models::{AlertSeverity, AtRiskGroup, SafetyTier, Signal};

/// The signal values the classifier works from. `None` means "no contribution".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalSet {
    pub heat_index: Option<f64>,
    pub pm25: Option<f64>,
    pub uv_index: Option<f64>,
    pub fire_risk_score: Option<f64>,
    pub nearby_fires: Option<u32>,
    pub alert_severity: Option<AlertSeverity>,
}

/// Result of classifying a [`SignalSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub tier: SafetyTier,
    /// Per-signal tiers, in fixed signal order, for every signal present.
    pub signal_tiers: Vec<(Signal, SafetyTier)>,
    /// Signals whose tier equals `tier`.
    pub triggered_by: Vec<Signal>,
    /// Activity advice for `tier`, then one line for every signal above Safe,
    /// including signals below the overall tier.
    pub guidance: Vec<String>,
    /// Gathered from every signal above Safe.
    pub at_risk_groups: Vec<AtRiskGroup>,
}

/// Classifies a signal set against the given tables.
pub fn classify(signals: &SignalSet, thresholds: &Thresholds) -> Classification {
    let signal_tiers = signal_tiers(signals, thresholds);

    let tier = signal_tiers
        .iter()
        .map(|(_, tier)| *tier)
        .max()
        .unwrap_or(SafetyTier::Safe);

    let triggered_by = if tier == SafetyTier::Safe {
        Vec::new()
    } else {
        signal_tiers
            .iter()
            .filter(|(_, t)| *t == tier)
            .map(|(signal, _)| *signal)
            .collect()
    };

    let mut guidance = Vec::new();
    let mut at_risk_groups = Vec::new();
    push_unique(&mut guidance, activity_advice(tier).to_string());

    for &(signal, signal_tier) in &signal_tiers {
        if let Some((line, groups)) = signal_advice(signal, signal_tier) {
            push_unique(&mut guidance, line.to_string());
            for group in groups {
                push_unique(&mut at_risk_groups, *group);
            }
        }
    }

    Classification {
        tier,
        signal_tiers,
        triggered_by,
        guidance,
        at_risk_groups,
    }
}

fn signal_tiers(signals: &SignalSet, thresholds: &Thresholds) -> Vec<(Signal, SafetyTier)> {
    let mut tiers = Vec::with_capacity(6);
    if let Some(hi) = signals.heat_index {
        tiers.push((Signal::HeatIndex, thresholds.heat_index.tier_for(hi)));
    }
    if let Some(pm25) = signals.pm25 {
        tiers.push((Signal::AirQuality, thresholds.pm25.tier_for(pm25)));
    }
    if let Some(uv) = signals.uv_index {
        tiers.push((Signal::UvIndex, thresholds.uv_index.tier_for(uv)));
    }
    if let Some(score) = signals.fire_risk_score {
        tiers.push((Signal::FireRisk, thresholds.fire_risk.tier_for(score)));
    }
    if let Some(count) = signals.nearby_fires {
        tiers.push((
            Signal::NearbyFires,
            thresholds.nearby_fires.tier_for(f64::from(count)),
        ));
    }
    if let Some(severity) = signals.alert_severity {
        let tier = if severity.is_high() {
            SafetyTier::Danger
        } else {
            SafetyTier::Safe
        };
        tiers.push((Signal::WeatherAlert, tier));
    }
    tiers
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn activity_advice(tier: SafetyTier) -> &'static str {
    match tier {
        SafetyTier::Safe => "Conditions are safe for outdoor activities such as walking and running.",
        SafetyTier::Caution => {
            "Outdoor activity is fine with precautions: take breaks and watch for symptoms."
        },
        SafetyTier::Danger => "Avoid prolonged outdoor exposure and strenuous exercise outdoors.",
        SafetyTier::Emergency => "Stay indoors; outdoor activity is not recommended.",
    }
}

fn signal_advice(signal: Signal, tier: SafetyTier) -> Option<(&'static str, &'static [AtRiskGroup])> {
    use AtRiskGroup::*;
    use SafetyTier::*;

    let advice: (&'static str, &'static [AtRiskGroup]) = match (signal, tier) {
        (_, Safe) => return None,

        (Signal::HeatIndex, Caution) => (
            "Heat may cause fatigue with prolonged exposure; drink water regularly.",
            &[Elderly, Children],
        ),
        (Signal::HeatIndex, Danger) => (
            "Heat exhaustion and heat cramps are likely; limit time in the sun and rest in shade.",
            &[Elderly, Children, CardiovascularConditions, OutdoorWorkers],
        ),
        (Signal::HeatIndex, Emergency) => (
            "Heat stroke is highly likely; stay in air conditioning and check on neighbours.",
            &[Elderly, Children, CardiovascularConditions, OutdoorWorkers],
        ),

        (Signal::AirQuality, Caution) => (
            "Air quality is unhealthy for sensitive groups; reduce prolonged outdoor exertion.",
            &[RespiratoryConditions, Children, Elderly],
        ),
        (Signal::AirQuality, Danger) => (
            "Air quality is unhealthy; wear a well-fitted N95 mask outdoors and keep windows closed.",
            &[RespiratoryConditions, CardiovascularConditions, Children, Elderly],
        ),
        (Signal::AirQuality, Emergency) => (
            "Air quality is hazardous; stay indoors with filtered air.",
            &[RespiratoryConditions, CardiovascularConditions, Children, Elderly],
        ),

        (Signal::UvIndex, Caution) => (
            "UV is high; use SPF 30+ sunscreen and seek shade around midday.",
            &[OutdoorWorkers],
        ),
        (Signal::UvIndex, Danger | Emergency) => (
            "UV is very high; minimize sun exposure between 10am and 4pm.",
            &[OutdoorWorkers, Children],
        ),

        (Signal::FireRisk, Caution) => (
            "Fire weather is elevated; avoid open flames and outdoor burning.",
            &[],
        ),
        (Signal::FireRisk, Danger) => (
            "Fire danger is high; avoid any activity that could spark a wildfire.",
            &[RespiratoryConditions],
        ),
        (Signal::FireRisk, Emergency) => (
            "Fire danger is extreme; new fires will spread rapidly. Prepare to evacuate.",
            &[RespiratoryConditions],
        ),

        (Signal::NearbyFires, Caution) => (
            "Wildfire activity has been detected nearby; monitor local conditions.",
            &[RespiratoryConditions],
        ),
        (Signal::NearbyFires, Danger) => (
            "Multiple active fires are nearby; watch for smoke and evacuation orders.",
            &[RespiratoryConditions, Elderly],
        ),
        (Signal::NearbyFires, Emergency) => (
            "Extensive fire activity is nearby; follow evacuation orders immediately.",
            &[RespiratoryConditions, Elderly, Children],
        ),

        (Signal::WeatherAlert, _) => (
            "A severe weather alert is active for this location; follow official instructions.",
            &[],
        ),
    };
    Some(advice)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> SignalSet {
        SignalSet {
            heat_index: Some(72.0),
            pm25: Some(6.0),
            uv_index: Some(3.0),
            fire_risk_score: Some(1.0),
            nearby_fires: Some(0),
            alert_severity: None,
        }
    }

    #[test]
    fn test_all_nominal_is_safe() {
        let result = classify(&nominal(), &Thresholds::default());
        assert_eq!(result.tier, SafetyTier::Safe);
        assert!(result.triggered_by.is_empty());
        assert!(result.at_risk_groups.is_empty());
        assert_eq!(result.guidance, vec![activity_advice(SafetyTier::Safe).to_string()]);
    }

    #[test]
    fn test_no_signals_is_safe() {
        let result = classify(&SignalSet::default(), &Thresholds::default());
        assert_eq!(result.tier, SafetyTier::Safe);
        assert!(result.signal_tiers.is_empty());
    }

    #[test]
    fn test_single_extreme_signal_sets_tier() {
        let thresholds = Thresholds::default();
        let cases = [
            (SignalSet { heat_index: Some(140.0), ..nominal() }, SafetyTier::Emergency, Signal::HeatIndex),
            (SignalSet { pm25: Some(400.0), ..nominal() }, SafetyTier::Emergency, Signal::AirQuality),
            (SignalSet { uv_index: Some(13.0), ..nominal() }, SafetyTier::Danger, Signal::UvIndex),
            (SignalSet { fire_risk_score: Some(10.0), ..nominal() }, SafetyTier::Emergency, Signal::FireRisk),
            (SignalSet { nearby_fires: Some(40), ..nominal() }, SafetyTier::Emergency, Signal::NearbyFires),
        ];

        for (signals, expected_tier, expected_signal) in cases {
            let result = classify(&signals, &thresholds);
            assert_eq!(result.tier, expected_tier, "signal {:?}", expected_signal);
            assert_eq!(result.triggered_by, vec![expected_signal]);
        }
    }

    #[test]
    fn test_severe_alert_forces_danger() {
        for severity in [AlertSeverity::Severe, AlertSeverity::Extreme] {
            let signals = SignalSet {
                alert_severity: Some(severity),
                ..nominal()
            };
            let result = classify(&signals, &Thresholds::default());
            assert_eq!(result.tier, SafetyTier::Danger);
            assert_eq!(result.triggered_by, vec![Signal::WeatherAlert]);
        }
    }

    #[test]
    fn test_minor_alert_does_not_raise_tier() {
        let signals = SignalSet {
            alert_severity: Some(AlertSeverity::Moderate),
            ..nominal()
        };
        assert_eq!(classify(&signals, &Thresholds::default()).tier, SafetyTier::Safe);
    }

    #[test]
    fn test_alert_does_not_lower_emergency() {
        let signals = SignalSet {
            heat_index: Some(130.0),
            alert_severity: Some(AlertSeverity::Severe),
            ..nominal()
        };
        let result = classify(&signals, &Thresholds::default());
        assert_eq!(result.tier, SafetyTier::Emergency);
        assert_eq!(result.triggered_by, vec![Signal::HeatIndex]);
    }

    #[test]
    fn test_signals_are_not_averaged() {
        // One Danger signal among many Safe ones still yields Danger.
        let signals = SignalSet {
            pm25: Some(80.0),
            ..nominal()
        };
        assert_eq!(classify(&signals, &Thresholds::default()).tier, SafetyTier::Danger);
    }

    #[test]
    fn test_each_triggering_signal_contributes_guidance_without_duplicates() {
        let signals = SignalSet {
            heat_index: Some(110.0),
            pm25: Some(60.0),
            uv_index: Some(9.0),
            ..nominal()
        };
        let result = classify(&signals, &Thresholds::default());

        assert_eq!(result.tier, SafetyTier::Danger);
        assert_eq!(
            result.triggered_by,
            vec![Signal::HeatIndex, Signal::AirQuality, Signal::UvIndex]
        );
        // Activity line plus one line per elevated signal.
        assert_eq!(result.guidance.len(), 4);

        let mut groups = result.at_risk_groups.clone();
        groups.dedup();
        assert_eq!(groups.len(), result.at_risk_groups.len());
        assert!(result.at_risk_groups.contains(&AtRiskGroup::RespiratoryConditions));
        assert!(result.at_risk_groups.contains(&AtRiskGroup::Elderly));
        assert_eq!(result.at_risk_groups[0], AtRiskGroup::Elderly);
    }
}
