//! Application state for the plano desktop editor
//!
//! All editor behaviour lives in the [`Session`]; this module only holds it
//! in a global signal together with the backend client and the active
//! configuration.

use std::sync::{Arc, OnceLock};

use dioxus::prelude::*;
use plano_core::{EditorError, EditorResult, ResultExt};
use plano_editor::{Scene, Session};
use plano_sync::HttpSyncClient;

use crate::config::AppConfig;

// ============================================================================
// Startup
// ============================================================================

/// Configuration and client fixed at launch
struct Startup {
    config: AppConfig,
    client: Arc<HttpSyncClient>,
}

static STARTUP: OnceLock<Startup> = OnceLock::new();

// ============================================================================
// App State
// ============================================================================

/// Root state of the desktop editor
#[derive(Debug, Clone)]
pub struct AppState {
    /// The editor session: mode, view, diagram contents, status
    pub session: Session,

    /// Backend client, absent when the app was not launched with one
    pub client: Option<Arc<HttpSyncClient>>,

    pub config: AppConfig,
}

impl AppState {
    /// State from the launch configuration, or defaults without a backend
    pub fn new() -> Self {
        match STARTUP.get() {
            Some(startup) => Self::with_backend(startup.config.clone(), Some(startup.client.clone())),
            None => Self::with_backend(AppConfig::default(), None),
        }
    }

    pub fn with_backend(config: AppConfig, client: Option<Arc<HttpSyncClient>>) -> Self {
        let options = config.to_session_options().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default editor settings: {}", e);
            Default::default()
        });
        Self {
            session: Session::new(options),
            client,
            config,
        }
    }

    /// Render model for the diagram view
    pub fn scene(&self) -> Scene {
        Scene::build(&self.session)
    }

    /// Get window title
    pub fn window_title(&self) -> String {
        let loading = if self.session.is_loading() { " (loading)" } else { "" };
        format!("{}{} - Plano Editor", self.session.plano(), loading)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Global State Context
// ============================================================================

/// Global application state signal
pub static APP_STATE: GlobalSignal<AppState> = Signal::global(AppState::new);

/// Fix the configuration and backend client for this process
///
/// Must run before the first render.
pub fn init_app_state(config: AppConfig) -> EditorResult<()> {
    config.validate()?;
    let client =
        HttpSyncClient::new(config.to_client_config()).with_context("Building backend client")?;
    tracing::info!("Backend at {}", client.base_url());

    STARTUP
        .set(Startup {
            config,
            client: Arc::new(client),
        })
        .map_err(|_| EditorError::internal("application state already initialised"))
}

// ============================================================================
// Tests
// ============================================================================
