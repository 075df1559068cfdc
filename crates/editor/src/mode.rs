//! Interaction modes, intents and effects
//!
//! Input is translated into a closed set of [`Intent`]s. The session's
//! transition table consumes them and answers with [`Effect`]s, the only way
//! the editor asks for network work.

use plano_core::{ConnectionType, DeviceId, Position};
use plano_model::{Device, DeviceDraft, NewConnection, NewDevice, PlanoName};

use crate::loader::LoadTicket;

// ============================================================================
// Interaction Mode
// ============================================================================

/// The single active interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Waiting for a background click to place a new device
    PlacingDevice,
    /// A connection is being drawn from `from`
    Connecting { from: DeviceId },
    /// `device` follows the pointer
    DraggingDevice { device: DeviceId },
}

impl InteractionMode {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::PlacingDevice => "placing-device",
            InteractionMode::Connecting { .. } => "connecting",
            InteractionMode::DraggingDevice { .. } => "dragging-device",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    /// Whether a pan gesture may start in this mode
    pub fn allows_pan(&self) -> bool {
        matches!(
            self,
            InteractionMode::Idle | InteractionMode::Connecting { .. }
        )
    }

    /// Hint shown in the status bar
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            InteractionMode::Idle => None,
            InteractionMode::PlacingDevice => Some("Click on the floor plan to place the device"),
            InteractionMode::Connecting { .. } => Some("Click the device to connect to"),
            InteractionMode::DraggingDevice { .. } => Some("Release to save the new position"),
        }
    }
}

impl std::fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionMode::Connecting { from } => write!(f, "connecting({})", from),
            InteractionMode::DraggingDevice { device } => write!(f, "dragging-device({})", device),
            other => f.write_str(other.name()),
        }
    }
}

// ============================================================================
// Intents
// ============================================================================

/// Everything the user can ask of the editor
///
/// Positions are screen coordinates; the session maps them itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    // Device creation
    StartPlacement,
    PlaceAt(Position),
    SubmitDevice(DeviceDraft),
    DismissDeviceForm,

    // Selection and connections
    SelectDevice(DeviceId),
    BeginConnect,
    ConfirmConnectTarget(DeviceId),
    SetConnectionType(ConnectionType),

    // Drag
    BeginDrag(DeviceId),
    DragTo(Position),
    EndDrag,

    DeleteDevice(DeviceId),
    Cancel,

    // View
    BeginPan(Position),
    PanTo(Position),
    EndPan,
    Zoom(f64),
    ResetView,

    // Diagram
    SwitchPlano(PlanoName),
    Reload,
}

impl Intent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::StartPlacement => "start-placement",
            Intent::PlaceAt(_) => "place-at",
            Intent::SubmitDevice(_) => "submit-device",
            Intent::DismissDeviceForm => "dismiss-device-form",
            Intent::SelectDevice(_) => "select-device",
            Intent::BeginConnect => "begin-connect",
            Intent::ConfirmConnectTarget(_) => "confirm-connect-target",
            Intent::SetConnectionType(_) => "set-connection-type",
            Intent::BeginDrag(_) => "begin-drag",
            Intent::DragTo(_) => "drag-to",
            Intent::EndDrag => "end-drag",
            Intent::DeleteDevice(_) => "delete-device",
            Intent::Cancel => "cancel",
            Intent::BeginPan(_) => "begin-pan",
            Intent::PanTo(_) => "pan-to",
            Intent::EndPan => "end-pan",
            Intent::Zoom(_) => "zoom",
            Intent::ResetView => "reset-view",
            Intent::SwitchPlano(_) => "switch-plano",
            Intent::Reload => "reload",
        }
    }
}

// ============================================================================
// Effects
// ============================================================================

/// A write to the backend; a full reload always follows it
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateDevice(NewDevice),
    UpdateDevice(Device),
    DeleteDevice(DeviceId),
    CreateConnection(NewConnection),
}

impl Mutation {
    /// Description used in logs and status messages
    pub fn describe(&self) -> String {
        match self {
            Mutation::CreateDevice(d) => format!("create device '{}'", d.name),
            Mutation::UpdateDevice(d) => format!("move device {}", d.id),
            Mutation::DeleteDevice(id) => format!("delete device {}", id),
            Mutation::CreateConnection(c) => {
                format!("connect {} to {}", c.from_device_id, c.to_device_id)
            }
        }
    }
}

/// A diagram load to perform
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub plano: PlanoName,
    pub ticket: LoadTicket,
}

/// Network work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Load(LoadRequest),
    Mutate(Mutation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display() {
        assert_eq!(InteractionMode::Idle.to_string(), "idle");
        assert_eq!(InteractionMode::Connecting { from: 4 }.to_string(), "connecting(4)");
        assert_eq!(
            InteractionMode::DraggingDevice { device: 2 }.to_string(),
            "dragging-device(2)"
        );
    }

    #[test]
    fn test_pan_allowed_per_mode() {
        assert!(InteractionMode::Idle.allows_pan());
        assert!(InteractionMode::Connecting { from: 1 }.allows_pan());
        assert!(!InteractionMode::PlacingDevice.allows_pan());
        assert!(!InteractionMode::DraggingDevice { device: 1 }.allows_pan());
    }

    #[test]
    fn test_mutation_describe() {
        assert_eq!(Mutation::DeleteDevice(3).describe(), "delete device 3");
        let conn = NewConnection::new(1, 2, ConnectionType::Ethernet).unwrap();
        assert_eq!(Mutation::CreateConnection(conn).describe(), "connect 1 to 2");
    }
}
