//! REST implementation of `SyncClient`
//!
//! Talks to the inventory backend over HTTP with `reqwest`. The backend
//! reports most failures in-band (`{"error": "..."}` with status 200), so
//! every JSON response is checked for an embedded error before it is
//! deserialised.

use std::time::Duration;

use plano_core::DeviceId;
use plano_model::serialization::{embedded_error, parse_list};
use plano_model::{Connection, Device, NewConnection, NewDevice, PlanoName};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::SyncClient;
use crate::error::{SyncError, SyncResult};

/// Default backend origin
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Configuration
// ============================================================================

/// How position and attribute updates are sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceUpdateMode {
    /// `PUT /api/devices/{id}` with the full device
    #[default]
    Put,
    /// `POST /api/devices` with the full device, id included
    LegacyPost,
}

/// Settings for `HttpSyncClient`
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Backend origin, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    pub timeout: Duration,
    pub update_mode: DeviceUpdateMode,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            update_mode: DeviceUpdateMode::default(),
        }
    }
}

/// Body returned by `POST /api/devices`
#[derive(Debug, Deserialize)]
struct CreatedDevice {
    #[serde(alias = "id")]
    device_id: DeviceId,
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client for the inventory backend
///
/// # Example
///
/// ```rust,ignore
/// let client = HttpSyncClient::new(HttpClientConfig::default())?;
/// let devices = client.list_devices(&PlanoName::new("planta-baja")?).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpSyncClient {
    /// The underlying reqwest HTTP client
    client: Client,
    /// Backend origin without a trailing slash
    base_url: String,
    update_mode: DeviceUpdateMode,
}

impl HttpSyncClient {
    /// Create a client from its configuration
    pub fn new(config: HttpClientConfig) -> SyncResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            update_mode: config.update_mode,
        })
    }

    /// Backend origin this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configured update verb
    pub fn update_mode(&self) -> DeviceUpdateMode {
        self.update_mode
    }

    /// Build the full URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Generic request helpers
    // ========================================================================

    /// Send a GET request and return the JSON body
    async fn get_json(&self, path: &str, plano: &PlanoName) -> SyncResult<Value> {
        tracing::debug!("GET {} (plano={})", path, plano);
        let response = self
            .client
            .get(self.url(path))
            .query(&[("plano", plano.as_str())])
            .send()
            .await?;
        json_body(response, path).await
    }

    /// Send a POST request with a JSON body and return the JSON response
    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> SyncResult<Value> {
        tracing::debug!("POST {}", path);
        let response = self.client.post(self.url(path)).json(body).send().await?;
        json_body(response, path).await
    }

    /// Send a PUT request with a JSON body and return the JSON response
    async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> SyncResult<Value> {
        tracing::debug!("PUT {}", path);
        let response = self.client.put(self.url(path)).json(body).send().await?;
        json_body(response, path).await
    }
}

impl SyncClient for HttpSyncClient {
    async fn fetch_surface(&self, plano: &PlanoName) -> SyncResult<String> {
        let path = plano.surface_path();
        tracing::debug!("GET {}", path);
        let response = self.client.get(self.url(&path)).send().await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(SyncError::NotFound(format!("Floor plan '{}'", plano)));
        }
        if !status.is_success() {
            return Err(SyncError::Api {
                status: status.as_u16(),
                message: format!("Server returned status {} for {}", status.as_u16(), path),
            });
        }
        Ok(response.text().await?)
    }

    async fn list_devices(&self, plano: &PlanoName) -> SyncResult<Vec<Device>> {
        let body = self.get_json("/api/devices", plano).await?;
        decode_list(body, "device")
    }

    async fn list_connections(&self, plano: &PlanoName) -> SyncResult<Vec<Connection>> {
        let body = self.get_json("/api/connections", plano).await?;
        decode_list(body, "connection")
    }

    async fn create_device(&self, device: &NewDevice) -> SyncResult<DeviceId> {
        let body = self.post_json("/api/devices", device).await?;
        decode_created_device(body)
    }

    async fn update_device(&self, device: &Device) -> SyncResult<()> {
        let body = match self.update_mode {
            DeviceUpdateMode::Put => {
                self.put_json(&format!("/api/devices/{}", device.id), device)
                    .await?
            }
            DeviceUpdateMode::LegacyPost => self.post_json("/api/devices", device).await?,
        };
        check_embedded(&body)
    }

    async fn delete_device(&self, id: DeviceId) -> SyncResult<()> {
        let path = format!("/api/devices/{}", id);
        tracing::debug!("DELETE {}", path);
        let response = self.client.delete(self.url(&path)).send().await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(SyncError::NotFound(format!("Device {}", id)));
        }
        let text = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => check_embedded(&body),
            Err(_) => Ok(()),
        }
    }

    async fn create_connection(&self, connection: &NewConnection) -> SyncResult<Connection> {
        let body = self.post_json("/api/connections", connection).await?;
        decode_entity(body)
    }
}

// ============================================================================
// Response handling
// ============================================================================

/// Check the status and read the JSON body of a response
async fn json_body(response: reqwest::Response, path: &str) -> SyncResult<Value> {
    let status = response.status();
    let text = response.text().await?;

    if status.as_u16() == 404 {
        return Err(SyncError::NotFound(path.to_string()));
    }
    if !status.is_success() {
        return Err(api_error(status.as_u16(), &text));
    }
    serde_json::from_str(&text).map_err(|e| SyncError::Parse(e.to_string()))
}

/// Build an `Api` error from an error response body
///
/// FastAPI-style bodies carry `detail`; legacy bodies carry `error`.
fn api_error(status: u16, text: &str) -> SyncError {
    let message = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| {
            embedded_error(&body).or_else(|| {
                body.get("detail").map(|d| match d {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            })
        })
        .unwrap_or_else(|| format!("Server returned status {}", status));
    SyncError::Api { status, message }
}

fn check_embedded(body: &Value) -> SyncResult<()> {
    match embedded_error(body) {
        Some(message) => Err(SyncError::Backend(message)),
        None => Ok(()),
    }
}

fn decode_entity<T: DeserializeOwned>(body: Value) -> SyncResult<T> {
    check_embedded(&body)?;
    serde_json::from_value(body).map_err(|e| SyncError::Parse(e.to_string()))
}

fn decode_created_device(body: Value) -> SyncResult<DeviceId> {
    decode_entity::<CreatedDevice>(body).map(|created| created.device_id)
}

fn decode_list<T: DeserializeOwned>(body: Value, what: &str) -> SyncResult<Vec<T>> {
    check_embedded(&body)?;
    let (items, rejected) = parse_list(body).map_err(|e| SyncError::Parse(e.to_string()))?;
    for reason in &rejected {
        tracing::warn!("Skipping malformed {} row: {}", what, reason);
    }
    Ok(items)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use plano_core::ConnectionType;
    use serde_json::json;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpSyncClient::new(HttpClientConfig {
            base_url: "http://inventory.local:8000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://inventory.local:8000");
        assert_eq!(client.url("/api/devices"), "http://inventory.local:8000/api/devices");
        assert_eq!(client.update_mode(), DeviceUpdateMode::Put);
    }

    #[test]
    fn test_update_mode_serde() {
        let mode: DeviceUpdateMode = serde_json::from_str("\"legacy_post\"").unwrap();
        assert_eq!(mode, DeviceUpdateMode::LegacyPost);
        assert_eq!(serde_json::to_string(&DeviceUpdateMode::Put).unwrap(), "\"put\"");
    }

    #[test]
    fn test_decode_created_device() {
        let id = decode_created_device(json!({
            "message": "Device created successfully",
            "device_id": 17
        }))
        .unwrap();
        assert_eq!(id, 17);

        assert_eq!(decode_created_device(json!({"id": 5, "name": "x"})).unwrap(), 5);

        let err = decode_created_device(json!({"error": "Unsupported device type: nas"}))
            .unwrap_err();
        assert!(matches!(err, SyncError::Backend(ref m) if m == "Unsupported device type: nas"));

        let err = decode_created_device(json!({"message": "ok"})).unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn test_decode_connection() {
        let conn: Connection = decode_entity(json!({
            "id": 3, "from_device_id": 1, "to_device_id": 2,
            "connection_type": "ethernet", "description": null
        }))
        .unwrap();
        assert_eq!(conn.id, Some(3));
        assert_eq!(conn.connection_type, ConnectionType::Ethernet);

        let err = decode_entity::<Connection>(json!({"error": "FOREIGN KEY constraint failed"}))
            .unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn test_decode_list_skips_bad_rows() {
        let devices: Vec<Device> = decode_list(
            json!([
                {"id": 1, "name": "a", "type": "pc", "x": 1, "y": 2, "status": "online"},
                {"name": "missing id"}
            ]),
            "device",
        )
        .unwrap();
        assert_eq!(devices.len(), 1);

        let err = decode_list::<Device>(json!({"error": "no such table"}), "device").unwrap_err();
        assert!(matches!(err, SyncError::Backend(_)));
    }

    #[test]
    fn test_api_error_message() {
        let err = api_error(422, r#"{"detail": "field required"}"#);
        assert!(matches!(err, SyncError::Api { status: 422, ref message } if message == "field required"));

        let err = api_error(500, "Internal Server Error");
        assert!(matches!(err, SyncError::Api { status: 500, ref message } if message == "Server returned status 500"));
    }
}
