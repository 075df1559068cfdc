//! Main Application Component for the plano editor
//!
//! Lays out the toolbar, the diagram view with the detail panel beside it,
//! the status bar and the device form overlay.

use dioxus::prelude::*;
use plano_core::ConnectionType;
use plano_editor::{Intent, PointerInput, StatusMessage};
use plano_model::PlanoName;

use crate::components::{DetailPanel, DeviceForm, DiagramView, Select, SelectOption};
use crate::runner::{dispatch, handle_input, reload};
use crate::state::APP_STATE;

/// Wheel-equivalent delta of one zoom button press
pub const ZOOM_BUTTON_DELTA: f64 = 100.0;

// ============================================================================
// Main App Component
// ============================================================================

/// Root application component
#[component]
pub fn App() -> Element {
    // Initial load of the configured plano
    use_effect(|| {
        tracing::info!("Plano editor UI initialized");
        reload();
    });

    use_effect(|| {
        let title = APP_STATE.read().window_title();
        dioxus::desktop::window().set_title(&title);
    });

    rsx! {
        div {
            class: "app-container",
            tabindex: 0,
            onkeydown: move |e| {
                if e.key() == Key::Escape {
                    handle_input(PointerInput::Escape);
                }
            },

            Toolbar {}

            div {
                class: "app-main",
                DiagramView {}
                DetailPanel {}
            }

            StatusBar {}

            DeviceForm {}
        }
    }
}

// ============================================================================
// Toolbar Component
// ============================================================================

/// Top toolbar with editor actions and plano selection
#[component]
fn Toolbar() -> Element {
    let state = APP_STATE.read();
    let current_plano = state.session.plano().to_string();
    let connection_type = state.session.connection_type().as_str().to_string();
    let idle = state.session.mode().is_idle();
    let has_selection = state.session.selection().is_some();
    let loading = state.session.is_loading();
    drop(state);

    let mut plano_input = use_signal(|| current_plano.clone());

    let open_plano = move || {
        let text = plano_input.read().trim().to_string();
        match PlanoName::new(text) {
            Ok(plano) => dispatch(Intent::SwitchPlano(plano)),
            Err(e) => APP_STATE
                .write()
                .session
                .set_status(StatusMessage::warning(e.to_string())),
        }
    };

    let connection_options = vec![
        SelectOption::new(ConnectionType::Ethernet.as_str(), "Ethernet"),
        SelectOption::new(ConnectionType::Fiber.as_str(), "Fiber"),
    ];

    rsx! {
        header {
            class: "toolbar",

            div {
                class: "toolbar-title",
                span { class: "toolbar-logo", "🗺" }
                span { "Plano" }
            }

            div {
                class: "toolbar-group",

                ToolbarButton {
                    icon: "➕",
                    label: "Add device",
                    disabled: !idle,
                    onclick: move |_| dispatch(Intent::StartPlacement),
                }

                ToolbarButton {
                    icon: "🔗",
                    label: "Connect",
                    disabled: !idle || !has_selection,
                    onclick: move |_| dispatch(Intent::BeginConnect),
                }

                Select {
                    value: connection_type,
                    options: connection_options,
                    class: "toolbar-select".to_string(),
                    on_change: move |v: String| {
                        dispatch(Intent::SetConnectionType(ConnectionType::from(v)));
                    },
                }
            }

            div {
                class: "toolbar-group",

                ToolbarButton {
                    icon: "➖",
                    label: "Zoom out",
                    onclick: move |_| dispatch(Intent::Zoom(ZOOM_BUTTON_DELTA)),
                }
                ToolbarButton {
                    icon: "🔍",
                    label: "Zoom in",
                    onclick: move |_| dispatch(Intent::Zoom(-ZOOM_BUTTON_DELTA)),
                }
                ToolbarButton {
                    icon: "⟲",
                    label: "Reset view",
                    onclick: move |_| dispatch(Intent::ResetView),
                }
            }

            div { class: "toolbar-spacer" }

            div {
                class: "toolbar-group",

                input {
                    class: "input toolbar-plano",
                    value: "{plano_input}",
                    placeholder: "plano",
                    oninput: move |e| plano_input.set(e.value()),
                    onkeydown: move |e| {
                        if e.key() == Key::Enter {
                            open_plano();
                        }
                    },
                }
                ToolbarButton {
                    icon: "📂",
                    label: "Open",
                    shortcut: "Enter",
                    onclick: move |_| open_plano(),
                }
                ToolbarButton {
                    icon: "🔄",
                    label: "Reload",
                    disabled: loading,
                    onclick: move |_| reload(),
                }
            }
        }
    }
}

/// Toolbar button component
#[component]
fn ToolbarButton(
    icon: &'static str,
    label: &'static str,
    #[props(default)] shortcut: &'static str,
    #[props(default = false)] disabled: bool,
    onclick: EventHandler<MouseEvent>,
) -> Element {
    let state_class = if disabled { "disabled" } else { "enabled" };

    rsx! {
        button {
            class: "toolbar-button {state_class}",
            disabled: disabled,
            title: if shortcut.is_empty() { label.to_string() } else { format!("{} ({})", label, shortcut) },
            onclick: move |e| {
                if !disabled {
                    onclick.call(e);
                }
            },
            span { "{icon}" }
            span { class: "toolbar-label", "{label}" }
        }
    }
}

// ============================================================================
// Status Bar Component
// ============================================================================

/// Bottom status bar
#[component]
fn StatusBar() -> Element {
    let state = APP_STATE.read();
    let session = &state.session;
    let status = session
        .status()
        .map(|m| (m.level.css_class(), m.text.clone()));
    let hint = session.mode().hint();
    let mode = session.mode().to_string();
    let device_count = session.store().device_count();
    let connection_count = session.store().connections().len();
    let zoom = format!("{:.0}%", session.view().scale() * 100.0);
    let loading = session.is_loading();
    drop(state);

    rsx! {
        footer {
            class: "status-bar",

            if let Some((level_class, text)) = status {
                span {
                    class: "{level_class}",
                    title: "Click to dismiss",
                    onclick: move |_| APP_STATE.write().session.clear_status(),
                    "{text}"
                }
            } else if let Some(hint) = hint {
                span { class: "status-hint", "{hint}" }
            } else if loading {
                span { "Loading…" }
            } else {
                span { "Ready" }
            }

            div { class: "status-spacer" }

            div {
                class: "status-stats",
                span { "Mode: {mode}" }
                span { "Devices: {device_count}" }
                span { "Links: {connection_count}" }
                span { "Zoom: {zoom}" }
            }
        }
    }
}
