use crate::api::{weather_from_forecast, Fetcher, OpenMeteoClient, RetryPolicy};
use crate::error::Result;
use crate::models::{AqiCategory, CurrentWeather, ExtendedConditions, ForecastResponse, HourlySeries};
use chrono::{TimeZone, Utc};
use mockito::Matcher;
use serde_json::json;

fn client(server_url: &str) -> OpenMeteoClient {
    let fetcher = Fetcher::new("hazard-watch-tests", RetryPolicy::immediate()).unwrap();
    OpenMeteoClient::new(fetcher, server_url, server_url)
}

// Helper to build a forecast with the hourly rows the client looks at
fn forecast(current_time: &str, times: &[&str], humidity: Vec<Option<f64>>, uv: Vec<Option<f64>>) -> ForecastResponse {
    ForecastResponse {
        current_weather: CurrentWeather {
            temperature: 35.0,
            windspeed: 16.0934,
            time: current_time.to_string(),
        },
        current: None,
        hourly: Some(HourlySeries {
            time: times.iter().map(|t| t.to_string()).collect(),
            relativehumidity_2m: humidity,
            uv_index: uv,
            ..HourlySeries::default()
        }),
    }
}

#[test]
fn test_forecast_is_converted_to_imperial_units() {
    let f = forecast(
        "2024-07-01T15:00",
        &["2024-07-01T14:00", "2024-07-01T15:00"],
        vec![Some(30.0), Some(45.0)],
        vec![Some(7.0), Some(8.5)],
    );

    let reading = weather_from_forecast(&f);

    assert!((reading.temperature_f - 95.0).abs() < 1e-9);
    assert!((reading.wind_speed_mph - 10.0).abs() < 0.01);
    assert_eq!(reading.humidity_pct, Some(45.0));
    assert_eq!(reading.uv_index, Some(8.5));
    assert_eq!(
        reading.observed_at,
        Utc.with_ymd_and_hms(2024, 7, 1, 15, 0, 0).unwrap()
    );
}

#[test]
fn test_unmatched_time_falls_back_to_first_row() {
    let f = forecast(
        "2024-07-01T15:15",
        &["2024-07-01T14:00", "2024-07-01T15:00"],
        vec![Some(30.0), Some(45.0)],
        vec![None, Some(8.5)],
    );

    let reading = weather_from_forecast(&f);

    assert_eq!(reading.humidity_pct, Some(30.0));
    assert_eq!(reading.uv_index, None);
}

#[test]
fn test_missing_hourly_block_leaves_humidity_absent() {
    let mut f = forecast("2024-07-01T15:00", &[], Vec::new(), Vec::new());
    f.hourly = None;

    let reading = weather_from_forecast(&f);

    assert_eq!(reading.humidity_pct, None);
    assert_eq!(reading.uv_index, None);
    assert_eq!(reading.extended, ExtendedConditions::default());
}

#[tokio::test]
async fn test_get_weather_success() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "latitude": 33.45,
        "longitude": -112.07,
        "current_weather": {"temperature": 40.0, "windspeed": 8.0, "winddirection": 200, "time": "2024-07-01T21:00"},
        "hourly": {
            "time": ["2024-07-01T20:00", "2024-07-01T21:00"],
            "relativehumidity_2m": [12, 10],
            "uv_index": [9.1, 7.4],
            "visibility": [24140.0, 16093.4],
            "snow_depth": [0.0, 0.0],
            "soil_moisture_0_to_1cm": [0.08, 0.071]
        },
        "current": {
            "time": "2024-07-01T21:00",
            "wind_gusts_10m": 40.2,
            "precipitation": 2.54,
            "cloud_cover": 12,
            "surface_pressure": 1004.2
        }
    });
    let mock = server
        .mock("GET", "/v1/forecast")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("latitude".into(), "33.45".into()),
            Matcher::UrlEncoded("longitude".into(), "-112.07".into()),
            Matcher::UrlEncoded("current_weather".into(), "true".into()),
            Matcher::UrlEncoded(
                "hourly".into(),
                "relativehumidity_2m,uv_index,visibility,snow_depth,soil_moisture_0_to_1cm".into(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let reading = client(&server.url()).get_weather(33.45, -112.07).await?;

    assert!((reading.temperature_f - 104.0).abs() < 1e-9);
    assert_eq!(reading.humidity_pct, Some(10.0));
    assert_eq!(reading.uv_index, Some(7.4));

    let extended = &reading.extended;
    assert!((extended.wind_gusts_mph.unwrap() - 24.98).abs() < 0.01);
    assert!((extended.visibility_miles.unwrap() - 10.0).abs() < 0.01);
    assert!((extended.precipitation_in.unwrap() - 0.1).abs() < 1e-9);
    assert_eq!(extended.cloud_cover_pct, Some(12.0));
    assert_eq!(extended.surface_pressure_hpa, Some(1004.2));
    assert_eq!(extended.snow_depth_in, Some(0.0));
    assert_eq!(extended.soil_moisture, Some(0.071));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_get_air_quality_success() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/air-quality")
        .match_query(Matcher::UrlEncoded("current".into(), "pm2_5,ozone,nitrogen_dioxide".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"current": {"time": "2024-07-01T21:00", "pm2_5": 61.2, "ozone": 118.0, "nitrogen_dioxide": -1.0}})
                .to_string(),
        )
        .create_async()
        .await;

    let reading = client(&server.url()).get_air_quality(33.45, -112.07).await?;

    let reading = reading.expect("PM2.5 should be present");
    assert_eq!(reading.pm25, 61.2);
    assert_eq!(reading.category, Some(AqiCategory::Unhealthy));
    assert_eq!(reading.ozone, Some(118.0));
    // Negative concentrations are sensor noise, not readings.
    assert_eq!(reading.nitrogen_dioxide, None);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_get_air_quality_without_value_is_none() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/air-quality")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"current": {"time": "2024-07-01T21:00", "pm2_5": null}}).to_string())
        .create_async()
        .await;

    let reading = client(&server.url()).get_air_quality(33.45, -112.07).await?;

    assert!(reading.is_none());
    Ok(())
}

#[tokio::test]
async fn test_get_weather_server_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/forecast")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let result = client(&server.url()).get_weather(33.45, -112.07).await;

    assert!(result.is_err(), "Should return an error on API failure");
}

#[cfg(feature = "integration-tests")]
#[tokio::test]
async fn test_live_open_meteo() -> Result<()> {
    use crate::api::{AIR_QUALITY_BASE_URL, FORECAST_BASE_URL};

    let fetcher = Fetcher::new("hazard-watch-integration-tests", RetryPolicy::default())?;
    let client = OpenMeteoClient::new(fetcher, FORECAST_BASE_URL, AIR_QUALITY_BASE_URL);
    let reading = client.get_weather(39.7392, -104.9903).await?;
    assert!(reading.temperature_f > -80.0 && reading.temperature_f < 140.0);
    Ok(())
}
