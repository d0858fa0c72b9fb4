use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::TrackerError;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Remote geo-data provider. Both calls may fail; callers degrade to the
/// cache or the embedded fallback table instead of propagating.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    async fn list_countries(&self) -> Result<Vec<Country>, TrackerError>;
    async fn list_cities(&self, country_code: &str) -> Result<Vec<String>, TrackerError>;
}

/// HTTP client for a geo-data API exposing `/countries` and
/// `/countries/{code}/cities`. The request timeout bounds every call so a
/// hung endpoint cannot stall the scheduler loop.
pub struct HttpGeoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeoProvider {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoProvider for HttpGeoProvider {
    async fn list_countries(&self) -> Result<Vec<Country>, TrackerError> {
        let url = format!("{}/countries", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let countries: Vec<Country> = response.json().await?;
        Ok(countries)
    }

    async fn list_cities(&self, country_code: &str) -> Result<Vec<String>, TrackerError> {
        let url = format!("{}/countries/{}/cities", self.base_url, country_code);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let cities: Vec<String> = response.json().await?;
        Ok(cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_countries_and_cities() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/countries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"code": "PH", "name": "Philippines"}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/countries/PH/cities"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!(["Manila", "Cebu City"])),
            )
            .mount(&server)
            .await;

        let provider = HttpGeoProvider::new(server.uri(), None).unwrap();

        let countries = provider.list_countries().await.unwrap();
        assert_eq!(
            countries,
            vec![Country {
                code: "PH".into(),
                name: "Philippines".into()
            }]
        );

        let cities = provider.list_cities("PH").await.unwrap();
        assert_eq!(cities, vec!["Manila".to_string(), "Cebu City".to_string()]);
    }

    #[tokio::test]
    async fn non_2xx_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/countries/PH/cities"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = HttpGeoProvider::new(server.uri(), None).unwrap();
        let err = provider.list_cities("PH").await.unwrap_err();
        assert!(matches!(err, TrackerError::Transport(_)));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/countries"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = HttpGeoProvider::new(server.uri(), None).unwrap();
        let err = provider.list_countries().await.unwrap_err();
        assert!(matches!(err, TrackerError::Transport(_)));
    }
}
