//! Provides a client for active NOAA National Weather Service alerts.

use super::Fetcher;
use crate::error::Result;
use crate::models::{Alert, AlertSeverity, AlertType, NwsAlertCollection, NwsAlertProperties};
use chrono::Utc;
use tracing::{debug, info};

pub const NWS_BASE_URL: &str = "https://api.weather.gov";

pub struct NwsClient {
    fetcher: Fetcher,
    base_url: String,
}

impl NwsClient {
    pub fn new(fetcher: Fetcher, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches alerts currently in effect at a point, most severe first.
    pub async fn get_active_alerts(&self, latitude: f64, longitude: f64) -> Result<Vec<Alert>> {
        info!("Fetching active alerts for {}, {}", latitude, longitude);

        let url = format!("{}/alerts/active", self.base_url);
        let collection: NwsAlertCollection = self
            .fetcher
            .get_json(&url, &[("point", format!("{:.4},{:.4}", latitude, longitude))])
            .await?;

        let now = Utc::now();
        let mut alerts: Vec<Alert> = collection
            .features
            .into_iter()
            .map(|feature| alert_from_properties(feature.properties))
            .filter(|alert| alert.expires.map_or(true, |expires| expires > now))
            .collect();
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));

        debug!("Received {} active alerts", alerts.len());
        Ok(alerts)
    }
}

fn alert_from_properties(props: NwsAlertProperties) -> Alert {
    let severity = props
        .severity
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(AlertSeverity::Unknown);

    Alert {
        alert_type: AlertType::from_event(&props.event),
        event: props.event,
        severity,
        headline: props.headline,
        area: props.area_desc.unwrap_or_default(),
        description: props.description.unwrap_or_default(),
        instruction: props.instruction,
        effective: props.effective.map(|t| t.with_timezone(&Utc)),
        expires: props.expires.map(|t| t.with_timezone(&Utc)),
    }
}
