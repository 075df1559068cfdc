//! Application configuration
//!
//! `AppConfig` is read from an optional TOML file where every field has a
//! default. The binary applies command-line flags and their `PLANO_API_URL`
//! and `PLANO_NAME` environment fallbacks on top.
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:8000"
//! timeout_secs = 30
//! position_updates = "put"
//!
//! [editor]
//! default_plano = "plano"
//! zoom_sensitivity = 0.001
//! default_connection_type = "ethernet"
//!
//! [log]
//! filter = "info"
//! ```

use std::path::Path;
use std::time::Duration;

use plano_core::{ConnectionType, EditorError, EditorResult};
use plano_editor::SessionOptions;
use plano_model::PlanoName;
use plano_sync::{DeviceUpdateMode, HttpClientConfig};
use serde::{Deserialize, Serialize};

// ============================================================================
// Sections
// ============================================================================

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// How position updates are sent
    pub position_updates: DeviceUpdateMode,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: plano_sync::http::DEFAULT_BASE_URL.to_string(),
            timeout_secs: plano_sync::http::DEFAULT_TIMEOUT_SECS,
            position_updates: DeviceUpdateMode::default(),
        }
    }
}

/// Editor behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Diagram opened at startup
    pub default_plano: String,
    pub zoom_sensitivity: f64,
    pub default_connection_type: ConnectionType,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_plano: PlanoName::default().to_string(),
            zoom_sensitivity: plano_editor::view::DEFAULT_ZOOM_SENSITIVITY,
            default_connection_type: ConnectionType::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

// ============================================================================
// AppConfig
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub editor: EditorConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> EditorResult<Self> {
        toml::from_str(content).map_err(|e| EditorError::InvalidConfig(e.to_string()))
    }

    /// Read a config file
    pub fn load(path: &Path) -> EditorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EditorError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Read a config file if one is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> EditorResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Replace the backend origin and startup plano where given
    pub fn apply_overrides(&mut self, api_url: Option<String>, plano: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(plano) = plano.filter(|p| !p.trim().is_empty()) {
            self.editor.default_plano = plano;
        }
    }

    /// Check the values a session and client can start from
    pub fn validate(&self) -> EditorResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(EditorError::InvalidConfig("api.base_url is empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(EditorError::InvalidConfig(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }
        let k = self.editor.zoom_sensitivity;
        if !k.is_finite() || k <= 0.0 {
            return Err(EditorError::InvalidConfig(format!(
                "editor.zoom_sensitivity must be positive, got {}",
                k
            )));
        }
        self.default_plano()?;
        Ok(())
    }

    pub fn default_plano(&self) -> EditorResult<PlanoName> {
        PlanoName::new(self.editor.default_plano.as_str())
            .map_err(|e| EditorError::InvalidConfig(format!("editor.default_plano: {}", e)))
    }

    /// Settings for the HTTP sync client
    pub fn to_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            base_url: self.api.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            update_mode: self.api.position_updates,
        }
    }

    /// Settings for a new editor session
    pub fn to_session_options(&self) -> EditorResult<SessionOptions> {
        Ok(SessionOptions {
            plano: self.default_plano()?,
            zoom_sensitivity: self.editor.zoom_sensitivity,
            connection_type: self.editor.default_connection_type.clone(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.position_updates, DeviceUpdateMode::Put);
        assert_eq!(config.editor.default_plano, "plano");
        assert_eq!(config.log.filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            base_url = "http://inventario.local:9000"
            position_updates = "legacy_post"

            [editor]
            default_connection_type = "fiber"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://inventario.local:9000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.position_updates, DeviceUpdateMode::LegacyPost);
        assert_eq!(config.editor.default_connection_type, ConnectionType::Fiber);
        assert_eq!(config.editor.zoom_sensitivity, 0.001);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor]\ndefault_plano = \"planta-alta\"\n[log]\nfilter = \"debug\"").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.editor.default_plano, "planta-alta");
        assert_eq!(config.log.filter, "debug");
        assert_eq!(config.default_plano().unwrap().as_str(), "planta-alta");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, EditorError::FileRead { .. }));
        assert!(AppConfig::load_or_default(None).is_ok());
    }

    #[test]
    fn test_malformed_file() {
        let err = AppConfig::from_toml("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, EditorError::InvalidConfig(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.api.base_url = "  ".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.editor.zoom_sensitivity = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.editor.default_plano = "../etc".into();
        assert!(matches!(config.validate(), Err(EditorError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("http://10.0.0.5:8000".into()), Some("sotano".into()));
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.editor.default_plano, "sotano");

        config.apply_overrides(Some(String::new()), None);
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000");
    }

    #[test]
    fn test_client_and_session_settings() {
        let mut config = AppConfig::default();
        config.api.base_url = "http://localhost:8000/".into();
        config.api.timeout_secs = 5;
        let client = config.to_client_config();
        assert_eq!(client.base_url, "http://localhost:8000");
        assert_eq!(client.timeout, Duration::from_secs(5));

        let options = config.to_session_options().unwrap();
        assert_eq!(options.plano.as_str(), "plano");
        assert_eq!(options.connection_type, ConnectionType::Ethernet);
    }
}
