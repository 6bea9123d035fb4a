use std::fmt;

use async_trait::async_trait;

use crate::{
    model::WeatherResponse,
    network::{ApiRequest, NetworkError, NetworkService},
};

use super::WeatherService;

const CURRENT_PATH: &str = "/current.json";
const FORECAST_PATH: &str = "/forecast.json";

/// weatherapi.com adapter.
#[derive(Clone)]
pub struct WeatherApiService {
    network: NetworkService,
    api_key: String,
}

impl fmt::Debug for WeatherApiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiService")
            .field("network", &self.network)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherApiService {
    pub fn new(network: NetworkService, api_key: impl Into<String>) -> Self {
        Self { network, api_key: api_key.into() }
    }
}

#[async_trait]
impl WeatherService for WeatherApiService {
    async fn current_weather(&self, city: &str) -> Result<WeatherResponse, NetworkError> {
        let request = ApiRequest::get(CURRENT_PATH)
            .query("key", self.api_key.as_str())
            .query("q", city)
            .query("aqi", "no");

        self.network.request(request).await
    }

    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherResponse, NetworkError> {
        let request = ApiRequest::get(FORECAST_PATH)
            .query("key", self.api_key.as_str())
            .query("q", city)
            .query("days", days.to_string())
            .query("aqi", "no")
            .query("alerts", "no");

        self.network.request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::weather::fixtures::{current_weather_json, forecast_day_json};
    use crate::network::{
        EndpointConfig,
        testing::{MockTransport, json_response},
    };
    use serde_json::json;
    use std::sync::Arc;

    fn service(mock: &Arc<MockTransport>) -> WeatherApiService {
        let network = NetworkService::with_transport(EndpointConfig::weather_api(), mock.clone());
        WeatherApiService::new(network, "secret-key")
    }

    #[tokio::test]
    async fn current_weather_query() {
        let mock = MockTransport::replying([json_response(200, current_weather_json("London"))]);

        let weather = service(&mock).current_weather("London").await.unwrap();

        assert_eq!(weather.location.name, "London");
        let sent = &mock.requests()[0];
        assert_eq!(
            sent.url.as_str(),
            "https://api.weatherapi.com/v1/current.json?key=secret-key&q=London&aqi=no"
        );
    }

    #[tokio::test]
    async fn forecast_decodes_days() {
        let mut body = current_weather_json("Paris");
        body["forecast"] = json!({
            "forecastday": [forecast_day_json("2023-11-13"), forecast_day_json("2023-11-14")]
        });
        let mock = MockTransport::replying([json_response(200, body)]);

        let weather = service(&mock).forecast("Paris", 2).await.unwrap();

        let days = weather.forecast.expect("forecast present").forecastday;
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].weekday().as_deref(), Some("Tue"));
        let url = mock.requests()[0].url.to_string();
        assert!(url.contains("/forecast.json?key=secret-key&q=Paris&days=2"));
    }

    #[tokio::test]
    async fn unknown_location_is_server_error() {
        let body = json!({"error": {"code": 1006, "message": "No matching location found."}});
        let mock = MockTransport::replying([json_response(400, body.clone())]);

        let err = service(&mock).current_weather("Nowhere").await.unwrap_err();

        match err {
            NetworkError::ServerError { status, body: raw } => {
                assert_eq!(status, 400);
                assert_eq!(raw, Some(body.to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn debug_redacts_api_key() {
        let mock = MockTransport::replying([]);
        let rendered = format!("{:?}", service(&mock));
        assert!(!rendered.contains("secret-key"));
    }
}
