//! # Diagram View
//!
//! Renders the floor-plan surface with the device and connection overlay,
//! and feeds pointer and wheel input into the editor session.
//!
//! The viewport div stays untransformed; its client rect is the layer origin
//! the session maps screen points against. The layer inside it carries the
//! pan/zoom CSS transform, the surface markup and an overlay SVG that shares
//! the surface's `viewBox` and `preserveAspectRatio`, so overlay shapes are
//! drawn directly in diagram coordinates.

use std::rc::Rc;

use dioxus::prelude::*;
use plano_core::Position;
use plano_editor::{DeviceShape, LinkShape, PointerInput, Scene};

use crate::runner::handle_input;
use crate::state::APP_STATE;

// ============================================================================
// Constants
// ============================================================================

/// Stroke width of a connection line in diagram units
pub const LINK_WIDTH: f64 = 2.0;

/// Dash pattern of fiber links
pub const DASH_PATTERN: &str = "6 4";

/// Vertical gap between a device marker and its label
const LABEL_GAP: f64 = 6.0;

// ============================================================================
// Diagram Component
// ============================================================================

/// Pan/zoomable floor plan with devices and connections
#[component]
pub fn DiagramView() -> Element {
    let mut viewport = use_signal(|| None::<Rc<MountedData>>);

    let scene = APP_STATE.read().scene();
    let Scene {
        surface,
        transform,
        links,
        devices,
        cursor,
    } = scene;

    rsx! {
        div {
            class: "diagram-viewport",
            style: "cursor: {cursor};",

            onmounted: move |e| {
                let element = e.data();
                viewport.set(Some(element.clone()));
                refresh_layer_origin(element);
            },
            onresize: move |_| {
                if let Some(element) = viewport() {
                    refresh_layer_origin(element);
                }
            },
            onmousedown: move |e| handle_input(PointerInput::BackgroundDown(client_position(&e))),
            onmousemove: move |e| handle_input(PointerInput::Move(client_position(&e))),
            onmouseup: move |e| handle_input(PointerInput::Up(client_position(&e))),
            onclick: move |e| handle_input(PointerInput::BackgroundClick(client_position(&e))),
            onwheel: move |e| {
                e.prevent_default();
                handle_input(PointerInput::Wheel(e.delta().strip_units().y));
            },

            if let Some(surface) = surface {
                div {
                    class: "diagram-layer",
                    style: "transform: {transform}; width: {surface.size.width}px; height: {surface.size.height}px;",

                    div {
                        class: "diagram-surface",
                        dangerous_inner_html: "{surface.markup}",
                    }

                    svg {
                        class: "diagram-overlay",
                        width: "{surface.size.width}",
                        height: "{surface.size.height}",
                        view_box: "{surface.view_box}",
                        preserve_aspect_ratio: "{surface.aspect}",

                        for link in links {
                            LinkLine { key: "{link.key}", link }
                        }

                        for device in devices {
                            DeviceMarker { key: "{device.id}", device }
                        }
                    }
                }
            } else {
                div {
                    class: "diagram-empty",
                    "No floor plan loaded"
                }
            }
        }
    }
}

// ============================================================================
// Overlay Shapes
// ============================================================================

#[component]
fn LinkLine(link: LinkShape) -> Element {
    let dash = if link.dashed { DASH_PATTERN } else { "none" };

    rsx! {
        line {
            class: "diagram-link",
            x1: "{link.from.x}",
            y1: "{link.from.y}",
            x2: "{link.to.x}",
            y2: "{link.to.y}",
            stroke: "{link.stroke}",
            stroke_width: "{LINK_WIDTH}",
            stroke_dasharray: "{dash}",
        }
    }
}

/// A device circle with its label
#[component]
fn DeviceMarker(device: DeviceShape) -> Element {
    let id = device.id;
    let class = marker_class(&device);
    let label_y = device.center.y + device.radius + LABEL_GAP;

    rsx! {
        g {
            class: "{class}",

            onmousedown: move |e| {
                e.stop_propagation();
                handle_input(PointerInput::DeviceDown { device: id, at: client_position(&e) });
            },
            onclick: move |e| {
                e.stop_propagation();
                handle_input(PointerInput::DeviceClick(id));
            },

            circle {
                cx: "{device.center.x}",
                cy: "{device.center.y}",
                r: "{device.radius}",
                fill: "{device.fill}",
            }
            text {
                class: "device-label",
                x: "{device.center.x}",
                y: "{label_y}",
                text_anchor: "middle",
                "{device.label}"
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn client_position(e: &MouseEvent) -> Position {
    let point = e.client_coordinates();
    Position::new(point.x, point.y)
}

/// Re-read the viewport's screen position into the session
fn refresh_layer_origin(element: Rc<MountedData>) {
    spawn(async move {
        match element.get_client_rect().await {
            Ok(rect) => {
                APP_STATE
                    .write()
                    .session
                    .set_layer_origin(Position::new(rect.origin.x, rect.origin.y));
            }
            Err(e) => tracing::debug!("Diagram viewport rect unavailable: {:?}", e),
        }
    });
}

fn marker_class(device: &DeviceShape) -> String {
    let mut classes = vec!["device-marker"];
    if device.selected {
        classes.push("selected");
    }
    if device.connect_source {
        classes.push("connect-source");
    }
    if device.dragging {
        classes.push("dragging");
    }
    classes.join(" ")
}

// ============================================================================
// Tests
// ============================================================================
