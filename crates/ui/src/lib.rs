//! # Plano UI
//!
//! Dioxus Desktop UI for the plano floor-plan editor.
//!
//! ## Features
//!
//! - Floor-plan view with pan (drag the background) and wheel zoom
//! - Device markers coloured by status, links drawn between them
//! - Device placement with a creation form, drag to reposition
//! - Connection drawing with a selectable link type
//! - Detail panel with connect and delete actions
//!

// ============================================================================
// Modules
// ============================================================================

pub mod app;
pub mod components;
pub mod config;
pub mod runner;
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use plano_core;
pub use plano_editor;

pub use app::App;
pub use config::AppConfig;
pub use state::{APP_STATE, AppState, init_app_state};

// ============================================================================
// Constants
// ============================================================================

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = "Plano Editor";

/// Application display title
pub const TITLE: &str = "Plano Editor - Network Floor Plans";

/// CSS styles for the application
const STYLES: &str = include_str!("../../../assets/styles/main.css");

// ============================================================================
// Launch Function
// ============================================================================

/// Launch the plano editor desktop application
///
/// Validates the configuration, builds the backend client and starts the
/// UI. Returns only when the window is closed.
///
/// # Example
///
/// ```rust,ignore
/// fn main() -> anyhow::Result<()> {
///     plano_ui::launch(plano_ui::AppConfig::default())?;
///     Ok(())
/// }
/// ```
pub fn launch(config: AppConfig) -> plano_core::EditorResult<()> {
    tracing::info!("Starting {} v{}", NAME, VERSION);

    init_app_state(config)?;

    // Build custom head with embedded CSS
    let custom_head = format!(r#"<style type="text/css">{}</style>"#, STYLES);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title(TITLE)
                        .with_resizable(true)
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1400.0, 900.0))
                        .with_min_inner_size(dioxus::desktop::LogicalSize::new(800.0, 600.0)),
                )
                .with_menu(None)
                .with_custom_head(custom_head),
        )
        .launch(App);

    Ok(())
}

/// Get the embedded CSS styles
pub fn get_styles() -> &'static str {
    STYLES
}

// ============================================================================
// Tests
// ============================================================================
