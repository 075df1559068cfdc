//! # Detail Panel
//!
//! Information about the selected device, with the Connect and Delete
//! actions and the list of links touching it.

use dioxus::prelude::*;
use plano_editor::{Intent, InteractionMode};
use plano_model::Device;

use crate::runner::dispatch;
use crate::state::APP_STATE;

/// One entry of the panel's link list
#[derive(Debug, Clone, PartialEq)]
struct LinkRow {
    key: String,
    peer: String,
    kind: String,
}

/// Right-hand panel for the selected device
#[component]
pub fn DetailPanel() -> Element {
    let state = APP_STATE.read();
    let session = &state.session;
    let Some(device) = session.selected_device().cloned() else {
        return rsx! {};
    };
    let idle = session.mode().is_idle();
    let connecting = matches!(session.mode(), InteractionMode::Connecting { .. });
    let links: Vec<LinkRow> = session
        .store()
        .connections_of(device.id)
        .map(|c| {
            let peer = c
                .other_end(device.id)
                .and_then(|id| session.store().device(id))
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "unknown device".to_string());
            LinkRow {
                key: c.key().to_string(),
                peer,
                kind: c.connection_type.to_string(),
            }
        })
        .collect();
    drop(state);

    let id = device.id;
    let link_heading = format!("Connections ({})", links.len());

    rsx! {
        aside {
            class: "detail-panel",

            DeviceHeader { device: device.clone() }

            dl {
                class: "detail-rows",
                for (label, value) in device.detail_rows() {
                    dt { key: "{label}", "{label}" }
                    dd { "{value}" }
                }
            }

            div {
                class: "detail-actions",
                if connecting {
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| dispatch(Intent::Cancel),
                        "Cancel connection"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        disabled: !idle,
                        onclick: move |_| dispatch(Intent::BeginConnect),
                        "Connect"
                    }
                }
                button {
                    class: "btn btn-danger",
                    disabled: !idle,
                    onclick: move |_| dispatch(Intent::DeleteDevice(id)),
                    "Delete"
                }
            }

            h3 { class: "detail-section", "{link_heading}" }
            if links.is_empty() {
                p { class: "detail-empty", "Not connected" }
            }
            ul {
                class: "detail-links",
                for link in links {
                    li {
                        key: "{link.key}",
                        span { "{link.peer}" }
                        span { class: "link-kind", "{link.kind}" }
                    }
                }
            }
        }
    }
}

#[component]
fn DeviceHeader(device: Device) -> Element {
    let dot_style = format!("background-color: {};", device.status.color());

    rsx! {
        header {
            class: "detail-header",
            span {
                class: "status-dot",
                style: "{dot_style}",
            }
            h2 { "{device.name}" }
            span { class: "detail-id", "#{device.id}" }
        }
    }
}
