//! Render model
//!
//! A `Scene` is a plain snapshot of what should be drawn, built from the
//! session after every change. The UI renders it without consulting any
//! editor state of its own.

use plano_core::{DeviceId, Position, Size};
use plano_model::ConnectionKey;

use crate::mode::InteractionMode;
use crate::session::Session;

/// Radius of a device marker in diagram units
pub const DEVICE_RADIUS: f64 = 8.0;

/// A device marker
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceShape {
    pub id: DeviceId,
    pub label: String,
    pub center: Position,
    pub radius: f64,
    pub fill: &'static str,
    pub selected: bool,
    /// First endpoint of a connection being drawn
    pub connect_source: bool,
    pub dragging: bool,
}

/// A drawn link between two devices
#[derive(Debug, Clone, PartialEq)]
pub struct LinkShape {
    pub key: ConnectionKey,
    pub from: Position,
    pub to: Position,
    pub stroke: &'static str,
    pub dashed: bool,
}

/// The floor-plan layer
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLayer {
    pub markup: String,
    pub view_box: String,
    pub aspect: String,
    pub size: Size,
}

/// Everything the diagram view draws
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub surface: Option<SurfaceLayer>,
    /// CSS transform of the whole diagram layer
    pub transform: String,
    pub links: Vec<LinkShape>,
    pub devices: Vec<DeviceShape>,
    pub cursor: &'static str,
}

impl Scene {
    /// Build the scene for the current session state
    pub fn build(session: &Session) -> Self {
        let surface = session.surface().map(|s| SurfaceLayer {
            markup: s.markup().to_string(),
            view_box: s.view_box_attr(),
            aspect: s.aspect_attr(),
            size: s.viewport(),
        });

        let links = session
            .store()
            .renderable_connections()
            .into_iter()
            .map(|r| LinkShape {
                key: r.connection.key(),
                from: r.from,
                to: r.to,
                stroke: r.connection.connection_type.stroke_color(),
                dashed: r.connection.connection_type.is_dashed(),
            })
            .collect();

        let mode = session.mode();
        let devices = session
            .store()
            .devices()
            .map(|d| DeviceShape {
                id: d.id,
                label: d.name.clone(),
                center: d.position(),
                radius: DEVICE_RADIUS,
                fill: d.status.color(),
                selected: session.selection() == Some(d.id),
                connect_source: mode == InteractionMode::Connecting { from: d.id },
                dragging: mode == InteractionMode::DraggingDevice { device: d.id },
            })
            .collect();

        Self {
            surface,
            transform: session.view().css_transform(),
            links,
            devices,
            cursor: cursor_for(session),
        }
    }
}

fn cursor_for(session: &Session) -> &'static str {
    match session.mode() {
        InteractionMode::PlacingDevice => "crosshair",
        InteractionMode::DraggingDevice { .. } => "grabbing",
        InteractionMode::Connecting { .. } => "pointer",
        InteractionMode::Idle if session.is_panning() => "grabbing",
        InteractionMode::Idle => "grab",
    }
}
