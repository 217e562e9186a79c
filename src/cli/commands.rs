use super::render;
use crate::api::{Fetcher, FirmsClient, NominatimClient, NwsClient, OpenMeteoClient, RetryPolicy};
use crate::config::AppConfig;
use crate::engine::{count_nearby_fires, RiskEngine};
use crate::error::{AppError, Result};
use crate::models::{
    AlertSeverity, AssessmentInput, FireConfidence, FireDetection, LocationReport, Place,
    RiskAssessment,
};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Look-back window for fire detections, in days.
const FIRE_LOOKBACK_DAYS: u8 = 1;
/// Number of geocoding candidates offered.
const GEOCODE_LIMIT: u8 = 5;

/// Environmental hazard assessment for US locations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch current conditions for a point and assess them
    Assess(LocationArgs),

    /// Assess readings given on the command line (no network access)
    Check(CheckArgs),

    /// Look up a US place by name and assess the best match
    Geocode(GeocodeArgs),

    /// List active NWS weather alerts for a point
    Alerts(PointArgs),

    /// List satellite fire detections near a point
    Fires(LocationArgs),

    /// Assess a JSON file holding an array of input bundles
    Batch(BatchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PointArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(Args, Debug, Clone)]
pub struct LocationArgs {
    #[command(flatten)]
    pub point: PointArgs,

    /// Fire search radius in km (default: HAZARD_FIRE_RADIUS_KM or 50)
    #[arg(short, long)]
    pub radius_km: Option<f64>,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Air temperature in °F
    #[arg(long, allow_negative_numbers = true, value_parser = finite_number)]
    pub temperature: Option<f64>,

    /// Relative humidity in percent
    #[arg(long, value_parser = finite_number)]
    pub humidity: Option<f64>,

    /// Wind speed in mph
    #[arg(long, value_parser = finite_number)]
    pub wind: Option<f64>,

    /// UV index
    #[arg(long, value_parser = finite_number)]
    pub uv: Option<f64>,

    /// PM2.5 in µg/m³
    #[arg(long, value_parser = finite_number)]
    pub pm25: Option<f64>,

    /// Number of fire detections nearby
    #[arg(long)]
    pub fires: Option<u32>,

    /// Most severe active alert (minor, moderate, severe, extreme)
    #[arg(long)]
    pub alert_severity: Option<AlertSeverity>,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn to_input(&self) -> AssessmentInput {
        AssessmentInput {
            temperature: self.temperature,
            humidity: self.humidity,
            wind_speed: self.wind,
            uv_index: self.uv,
            pm25: self.pm25,
            fire_proximity_count: self.fires,
            active_alert_severity: self.alert_severity,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GeocodeArgs {
    /// Place name, e.g. "Paradise, CA"
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Fire search radius in km
    #[arg(short, long)]
    pub radius_km: Option<f64>,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Path to a JSON array of input bundles
    pub path: PathBuf,
}

/// CLI application: the risk engine plus the provider clients that feed it.
pub struct App {
    engine: RiskEngine,
    weather: OpenMeteoClient,
    alerts: NwsClient,
    fires: Option<FirmsClient>,
    geocoder: NominatimClient,
    fire_radius_km: f64,
}

impl App {
    /// Create the application from loaded configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    pub fn with_retry_policy(config: &AppConfig, policy: RetryPolicy) -> Result<Self> {
        let engine = RiskEngine::new(config.thresholds.clone())?;
        let providers = &config.providers;
        let fetcher = || Fetcher::new(&providers.user_agent, policy);

        let fires = match &providers.firms_map_key {
            Some(key) => Some(FirmsClient::new(
                fetcher()?,
                &providers.firms_url,
                key,
                &providers.firms_source,
            )),
            None => {
                warn!("FIRMS_MAP_KEY not set; fire detections are disabled");
                None
            },
        };

        Ok(Self {
            engine,
            weather: OpenMeteoClient::new(
                fetcher()?,
                &providers.open_meteo_url,
                &providers.open_meteo_air_url,
            ),
            alerts: NwsClient::new(fetcher()?, &providers.nws_url),
            fires,
            geocoder: NominatimClient::new(fetcher()?, &providers.nominatim_url),
            fire_radius_km: config.fire_radius_km,
        })
    }

    /// Run one command to completion
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Assess(args) => {
                let report = self
                    .assess_location(None, args.point.lat, args.point.lon, args.radius_km)
                    .await?;
                print_output(&report, args.json, || render::render_report(&report))?;
            },
            Commands::Check(args) => {
                let assessment = self.engine.assess(&args.to_input());
                print_output(&assessment, args.json, || render::render_assessment(&assessment))?;
            },
            Commands::Geocode(args) => {
                let query = args.query.join(" ");
                let places = self.search_places(&query).await?;
                let place = places
                    .first()
                    .ok_or_else(|| AppError::Cli(format!("No US place found for '{}'", query)))?;
                if places.len() > 1 && !args.json {
                    println!("{}", render::render_places(&places));
                }
                self.report_place(place, args.radius_km, args.json).await?;
            },
            Commands::Alerts(args) => {
                validate_point(args.lat, args.lon)?;
                let alerts = self.alerts.get_active_alerts(args.lat, args.lon).await?;
                print!("{}", render::render_alerts(&alerts));
            },
            Commands::Fires(args) => {
                let (lat, lon) = (args.point.lat, args.point.lon);
                let radius_km = self.radius(args.radius_km)?;
                validate_point(lat, lon)?;
                let detections = self.fetch_fires(lat, lon, radius_km).await?.ok_or_else(|| {
                    AppError::Cli("Fire detections need FIRMS_MAP_KEY to be set".to_string())
                })?;
                print_output(&detections, args.json, || {
                    render::render_fires(&detections, lat, lon)
                })?;
            },
            Commands::Batch(args) => {
                let assessments = self.assess_file(&args.path).await?;
                println!("{}", serde_json::to_string_pretty(&assessments)?);
            },
        }

        Ok(())
    }

    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>> {
        if query.trim().is_empty() {
            return Err(AppError::Cli("Place name must not be empty".to_string()));
        }
        self.geocoder.search(query, GEOCODE_LIMIT).await
    }

    /// Assess a geocoded place and print the report
    pub async fn report_place(&self, place: &Place, radius_km: Option<f64>, json: bool) -> Result<()> {
        let report = self
            .assess_location(Some(place.name.clone()), place.latitude, place.longitude, radius_km)
            .await?;
        print_output(&report, json, || render::render_report(&report))
    }

    /// Fetches every signal for a point concurrently and assesses whatever arrived.
    ///
    /// A failed fetch is logged and treated as an absent signal; only invalid
    /// coordinates or a bad radius fail the whole call.
    pub async fn assess_location(
        &self,
        name: Option<String>,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> Result<LocationReport> {
        validate_point(latitude, longitude)?;
        let radius_km = self.radius(radius_km)?;
        info!("Assessing {}, {} (fire radius {} km)", latitude, longitude, radius_km);

        let progress = spinner("Fetching weather, air quality, alerts and fire detections...")?;
        let (weather, air_quality, alerts, fires) = tokio::join!(
            self.weather.get_weather(latitude, longitude),
            self.weather.get_air_quality(latitude, longitude),
            self.alerts.get_active_alerts(latitude, longitude),
            self.fetch_fires(latitude, longitude, radius_km),
        );
        progress.finish_and_clear();

        let weather = degrade("weather", weather);
        let air_quality = degrade("air quality", air_quality).flatten();
        let alerts = degrade("weather alerts", alerts).unwrap_or_default();
        let fires = degrade("fire detections", fires).flatten();

        let nearby_fire_count = fires.as_ref().map(|detections| {
            count_nearby_fires(
                detections,
                latitude,
                longitude,
                radius_km,
                FireConfidence::Nominal,
            )
        });

        let input = AssessmentInput::from_readings(
            weather.as_ref(),
            air_quality.as_ref(),
            nearby_fire_count,
            &alerts,
        );
        let assessment = self.engine.assess(&input);
        info!(
            "Assessment for {}, {}: {} (fire risk {:.1})",
            latitude, longitude, assessment.safety_tier, assessment.fire_risk_score
        );

        Ok(LocationReport {
            name,
            latitude,
            longitude,
            weather,
            air_quality,
            alerts,
            fires,
            nearby_fire_count,
            assessment,
        })
    }

    /// Reads a JSON array of input bundles and assesses them in parallel.
    pub async fn assess_file(&self, path: &Path) -> Result<Vec<RiskAssessment>> {
        let raw = tokio::fs::read_to_string(path).await?;
        let inputs: Vec<AssessmentInput> = serde_json::from_str(&raw)?;
        info!("Assessing {} bundles from {}", inputs.len(), path.display());
        Ok(self.engine.assess_batch(&inputs))
    }

    async fn fetch_fires(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Option<Vec<FireDetection>>> {
        match &self.fires {
            Some(client) => client
                .get_detections(latitude, longitude, radius_km, FIRE_LOOKBACK_DAYS)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    fn radius(&self, requested: Option<f64>) -> Result<f64> {
        match requested {
            Some(km) if km.is_finite() && km > 0.0 => Ok(km),
            Some(km) => Err(AppError::Cli(format!(
                "Radius must be a positive number of km, got {}",
                km
            ))),
            None => Ok(self.fire_radius_km),
        }
    }
}

/// Parses a reading, rejecting `NaN` and infinities that `f64::from_str` accepts.
fn finite_number(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{}' is not a finite number", raw))
    }
}

fn validate_point(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::Cli(format!(
            "Invalid coordinates ({}, {}): latitude must be within ±90 and longitude within ±180",
            latitude, longitude
        )));
    }
    Ok(())
}

/// Logs a failed fetch and turns it into an absent signal.
fn degrade<T>(signal: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Could not fetch {}: {}. Assessing without it.", signal, e);
            None
        },
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}

fn print_output<T, F>(value: &T, json: bool, render: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render());
    }
    Ok(())
}
