/// External API clients module
use crate::domain::{LaunchCategory, LaunchRecord};
use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Raw access to launch records by category
#[async_trait]
pub trait LaunchSource: Send + Sync {
    async fn launches(&self, category: LaunchCategory) -> ApiResult<Vec<LaunchRecord>>;
}

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("launch-tracker/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// SpaceX launches API client
pub struct SpaceXClient {
    http_client: HttpClient,
    base_url: String,
}

impl SpaceXClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http_client: HttpClient::new()?,
            base_url,
        })
    }

    /// Endpoint for a launch category
    pub fn launches_url(&self, category: LaunchCategory) -> String {
        format!("{}/launches/{}", self.base_url, category.path())
    }
}

#[async_trait]
impl LaunchSource for SpaceXClient {
    async fn launches(&self, category: LaunchCategory) -> ApiResult<Vec<LaunchRecord>> {
        let url = self.launches_url(category);
        let resp = self.http_client.get_client().get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(ApiError::Upstream {
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        let records = decode_launches(json);
        debug!("Fetched {} {} launches", records.len(), category);
        Ok(records)
    }
}

/// Launch object as served upstream; only the fields we read
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLaunch {
    id: Option<String>,
    name: Option<String>,
    flight_number: Option<u32>,
    date_utc: Option<String>,
    success: Option<bool>,
    launchpad: Option<String>,
    links: Option<RawLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLinks {
    patch: Option<RawPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPatch {
    small: Option<String>,
}

impl From<RawLaunch> for LaunchRecord {
    fn from(raw: RawLaunch) -> Self {
        LaunchRecord {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            flight_number: raw.flight_number,
            date_utc: raw.date_utc.unwrap_or_default(),
            success: raw.success,
            launchpad: raw.launchpad.unwrap_or_default(),
            patch_image_url: raw.links.and_then(|l| l.patch).and_then(|p| p.small),
        }
    }
}

/// Accept an array of launches or a single launch object
fn decode_launches(json: Value) -> Vec<LaunchRecord> {
    let items = match json {
        Value::Array(items) => items,
        Value::Object(_) => vec![json],
        other => {
            warn!("Unexpected launches payload: {}", other);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawLaunch>(item) {
            Ok(raw) => Some(LaunchRecord::from(raw)),
            Err(e) => {
                warn!("Skipping malformed launch entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn launch_json(id: &str, name: &str, success: Value) -> Value {
        serde_json::json!({
            "id": id,
            "flight_number": 187,
            "name": name,
            "date_utc": "2022-12-08T22:27:00.000Z",
            "success": success,
            "launchpad": "5e9e4502f509094188566f88",
            "links": { "patch": { "small": "https://images2.imgbox.com/small.png", "large": null } },
            "rocket": "5e9d0d95eda69973a809d1ec",
            "cores": []
        })
    }

    #[test]
    fn test_decode_array() {
        let json = serde_json::json!([
            launch_json("a", "Starlink 4-37", Value::Bool(true)),
            launch_json("b", "O3b mPOWER 1-2", Value::Null),
        ]);
        let records = decode_launches(json);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[0].flight_number, Some(187));
        assert_eq!(records[0].success, Some(true));
        assert_eq!(
            records[0].patch_image_url.as_deref(),
            Some("https://images2.imgbox.com/small.png")
        );
        assert_eq!(records[1].success, None);
    }

    #[test]
    fn test_decode_single_object() {
        let records = decode_launches(launch_json("n", "USSF-44", Value::Null));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "USSF-44");
    }

    #[test]
    fn test_decode_defaults_missing_fields() {
        let records = decode_launches(serde_json::json!([{ "name": "Crew-6" }]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "");
        assert_eq!(records[0].flight_number, None);
        assert_eq!(records[0].date_utc, "");
        assert_eq!(records[0].patch_image_url, None);
    }

    #[test]
    fn test_decode_skips_malformed_entries() {
        let json = serde_json::json!([
            "not a launch",
            { "name": "Bad", "flight_number": "twelve" },
            launch_json("ok", "Transporter-6", Value::Bool(false)),
        ]);
        let records = decode_launches(json);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "ok");
    }

    #[test]
    fn test_decode_scalar_payload_is_empty() {
        assert!(decode_launches(serde_json::json!(42)).is_empty());
    }

    #[test]
    fn test_launches_url() {
        let client = SpaceXClient::new("https://api.spacexdata.com/v5/").unwrap();
        assert_eq!(
            client.launches_url(LaunchCategory::All),
            "https://api.spacexdata.com/v5/launches/"
        );
        assert_eq!(
            client.launches_url(LaunchCategory::Past),
            "https://api.spacexdata.com/v5/launches/past"
        );
    }

    #[tokio::test]
    async fn test_fetch_past_launches() {
        let mut server = Server::new_async().await;
        let body = serde_json::json!([launch_json("a", "Starlink 4-37", Value::Bool(true))]);
        let mock = server
            .mock("GET", "/launches/past")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = SpaceXClient::new(server.url()).unwrap();
        let records = client.launches(LaunchCategory::Past).await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Starlink 4-37");
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/launches/next")
            .with_status(503)
            .create_async()
            .await;

        let client = SpaceXClient::new(server.url()).unwrap();
        let err = client.launches(LaunchCategory::Next).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream { status: 503 }));
    }

    #[tokio::test]
    async fn test_invalid_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/launches/latest")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = SpaceXClient::new(server.url()).unwrap();
        let err = client.launches(LaunchCategory::Latest).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
