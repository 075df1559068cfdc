//! Editor session state
//!
//! A `Session` holds everything one open editor knows: the current plano,
//! view transform, interaction mode, selection, pending placement, active
//! drag and the entity store. It never talks to the network itself; the
//! transition table in `controller` returns effects for a runner to perform,
//! and the runner reports back through `apply_load` and `complete_mutation`.

use plano_core::{ConnectionType, DeviceId, EditorError, EditorResult, Position};
use plano_model::{Device, PlanoName};

use crate::drag::ActiveDrag;
use crate::loader::{DiagramSnapshot, LoadTicket};
use crate::mapper::CoordinateMapper;
use crate::mode::{Effect, InteractionMode, LoadRequest, Mutation};
use crate::store::EntityStore;
use crate::surface::{FloorPlanSurface, MountedSurface};
use crate::view::{PanAnchor, ViewTransform};

// ============================================================================
// Status Messages
// ============================================================================

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

impl StatusLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusLevel::Info => "status-info",
            StatusLevel::Warning => "status-warning",
            StatusLevel::Error => "status-error",
        }
    }
}

/// Message shown to the user in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, text: text.into() }
    }
}

/// What happened to a finished load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued meanwhile; the result was dropped
    Stale,
    Failed,
}

// ============================================================================
// Session
// ============================================================================

/// Settings a session starts from
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub plano: PlanoName,
    pub zoom_sensitivity: f64,
    pub connection_type: ConnectionType,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            plano: PlanoName::default(),
            zoom_sensitivity: crate::view::DEFAULT_ZOOM_SENSITIVITY,
            connection_type: ConnectionType::default(),
        }
    }
}

/// State of one open editor
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) plano: PlanoName,
    pub(crate) view: ViewTransform,
    pub(crate) pan: Option<PanAnchor>,
    pub(crate) pan_moved: bool,
    pub(crate) mode: InteractionMode,
    pub(crate) selection: Option<DeviceId>,
    /// Diagram position of a device whose form is open
    pub(crate) pending_placement: Option<Position>,
    pub(crate) drag: Option<ActiveDrag>,
    pub(crate) store: EntityStore,
    pub(crate) surface: Option<FloorPlanSurface>,
    /// Screen position of the diagram layer's top-left corner
    pub(crate) layer_origin: Position,
    pub(crate) connection_type: ConnectionType,
    pub(crate) latest_ticket: LoadTicket,
    pub(crate) loading: bool,
    pub(crate) status: Option<StatusMessage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            plano: options.plano,
            view: ViewTransform::new(options.zoom_sensitivity),
            pan: None,
            pan_moved: false,
            mode: InteractionMode::Idle,
            selection: None,
            pending_placement: None,
            drag: None,
            store: EntityStore::new(),
            surface: None,
            layer_origin: Position::zero(),
            connection_type: options.connection_type,
            latest_ticket: LoadTicket::default(),
            loading: false,
            status: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn plano(&self) -> &PlanoName {
        &self.plano
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn selection(&self) -> Option<DeviceId> {
        self.selection
    }

    /// The selected device, if it is still loaded
    pub fn selected_device(&self) -> Option<&Device> {
        self.selection.and_then(|id| self.store.device(id))
    }

    /// Diagram position awaiting the device form, if the form is open
    pub fn pending_placement(&self) -> Option<Position> {
        self.pending_placement
    }

    pub fn drag(&self) -> Option<&ActiveDrag> {
        self.drag.as_ref()
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn surface(&self) -> Option<&FloorPlanSurface> {
        self.surface.as_ref()
    }

    pub fn connection_type(&self) -> &ConnectionType {
        &self.connection_type
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Whether the current or last pan gesture actually moved the view
    pub fn pan_moved(&self) -> bool {
        self.pan_moved
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Record where the diagram layer sits on screen
    pub fn set_layer_origin(&mut self, origin: Position) {
        if origin.is_finite() {
            self.layer_origin = origin;
        }
    }

    pub fn layer_origin(&self) -> Position {
        self.layer_origin
    }

    // ========================================================================
    // Coordinate mapping
    // ========================================================================

    /// Mapper over the surface as currently shown
    pub fn mapper(&self) -> CoordinateMapper<MountedSurface<'_>> {
        CoordinateMapper::new(self.surface.as_ref().map(|surface| MountedSurface {
            surface,
            view: &self.view,
            origin: self.layer_origin,
        }))
    }

    /// Map a screen point into diagram space
    pub fn screen_to_diagram(&self, screen: Position) -> EditorResult<Position> {
        self.mapper().screen_to_diagram(screen)
    }

    // ========================================================================
    // Mode changes
    // ========================================================================

    pub(crate) fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            tracing::debug!("Mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Issue a new load ticket for a plano
    pub fn begin_load(&mut self, plano: PlanoName) -> Effect {
        self.latest_ticket = self.latest_ticket.next();
        self.loading = true;
        tracing::info!("Loading plano '{}' ({})", plano, self.latest_ticket);
        Effect::Load(LoadRequest {
            plano,
            ticket: self.latest_ticket,
        })
    }

    /// Reload the current plano
    pub fn reload(&mut self) -> Effect {
        self.begin_load(self.plano.clone())
    }

    /// Accept the result of a load, unless a newer one has been issued
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: EditorResult<DiagramSnapshot>,
    ) -> LoadOutcome {
        if ticket != self.latest_ticket {
            tracing::warn!(
                "Discarding load {} superseded by {}",
                ticket,
                self.latest_ticket
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::error!("Loading plano '{}' failed: {}", self.plano, err);
                self.status = Some(StatusMessage::error(format!(
                    "Could not load plano '{}': {}",
                    self.plano, err
                )));
                return LoadOutcome::Failed;
            }
        };

        if snapshot.plano != self.plano {
            // Only a reload for the plano shown now can be applied
            return LoadOutcome::Stale;
        }

        self.surface = Some(snapshot.surface);
        self.store.load(snapshot.devices, snapshot.connections);

        // A drag in progress keeps its live position over the fetched one
        if let Some(drag) = self.drag {
            if drag.moves() > 0 {
                let _ = self.store.set_position(drag.device(), drag.last());
            }
        }
        self.prune_missing();

        tracing::info!(
            "Plano '{}' loaded: {} devices, {} connections",
            self.plano,
            self.store.device_count(),
            self.store.connections().len()
        );
        LoadOutcome::Applied
    }

    /// Drop references to devices that are no longer loaded
    fn prune_missing(&mut self) {
        if let Some(id) = self.selection {
            if !self.store.contains(id) {
                self.selection = None;
            }
        }
        match self.mode {
            InteractionMode::Connecting { from } if !self.store.contains(from) => {
                self.set_mode(InteractionMode::Idle);
            }
            InteractionMode::DraggingDevice { device } if !self.store.contains(device) => {
                self.drag = None;
                self.set_mode(InteractionMode::Idle);
            }
            _ => {}
        }
    }

    /// Record the result of a mutation and issue the reload that follows it
    pub fn complete_mutation(&mut self, mutation: &Mutation, result: EditorResult<()>) -> Effect {
        match result {
            Ok(()) => {
                tracing::info!("Done: {}", mutation.describe());
                if !matches!(mutation, Mutation::UpdateDevice(_)) {
                    self.status = Some(StatusMessage::info(format!(
                        "Saved: {}",
                        mutation.describe()
                    )));
                }
            }
            Err(err) => {
                tracing::error!("Failed to {}: {}", mutation.describe(), err);
                self.status = Some(StatusMessage::error(format!(
                    "Could not {}: {}",
                    mutation.describe(),
                    err
                )));
            }
        }
        self.reload()
    }

    /// Report a local failure without changing mode
    pub(crate) fn report(&mut self, err: &EditorError) {
        if err.is_mapping() {
            tracing::debug!("Ignoring input: {}", err);
            return;
        }
        let status = if err.is_validation() {
            StatusMessage::warning(err.to_string())
        } else {
            StatusMessage::error(err.to_string())
        };
        self.status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plano_model::Connection;

    const SVG: &str = r#"<svg width="200" height="100" viewBox="0 0 200 100"></svg>"#;

    fn snapshot(plano: &str, devices: Vec<Device>) -> DiagramSnapshot {
        DiagramSnapshot {
            plano: PlanoName::new(plano).unwrap(),
            surface: FloorPlanSurface::parse(SVG).unwrap(),
            devices,
            connections: vec![Connection::new(1, 2)],
        }
    }

    fn load_ticket(effect: Effect) -> LoadTicket {
        match effect {
            Effect::Load(request) => request.ticket,
            other => panic!("expected a load, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut session = Session::default();
        let first = load_ticket(session.reload());
        let second = load_ticket(session.reload());

        let newer = snapshot("plano", vec![Device::new(2, "new", Position::zero())]);
        let older = snapshot("plano", vec![Device::new(1, "old", Position::zero())]);

        // Responses arrive out of order
        assert_eq!(session.apply_load(second, Ok(newer)), LoadOutcome::Applied);
        assert_eq!(session.apply_load(first, Ok(older)), LoadOutcome::Stale);
        assert!(session.store().contains(2));
        assert!(!session.store().contains(1));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let mut session = Session::default();
        let ticket = load_ticket(session.reload());
        session.apply_load(ticket, Ok(snapshot("plano", vec![Device::new(1, "a", Position::zero())])));

        let ticket = load_ticket(session.reload());
        let outcome = session.apply_load(ticket, Err(EditorError::network("list devices", "refused")));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(session.store().contains(1));
        assert_eq!(session.status().unwrap().level, StatusLevel::Error);
    }

    #[test]
    fn test_load_clears_vanished_selection() {
        let mut session = Session::default();
        let ticket = load_ticket(session.reload());
        session.apply_load(ticket, Ok(snapshot("plano", vec![Device::new(1, "a", Position::zero())])));
        session.selection = Some(1);

        let ticket = load_ticket(session.reload());
        session.apply_load(ticket, Ok(snapshot("plano", vec![])));
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_mapper_needs_a_surface() {
        let mut session = Session::default();
        assert!(session.screen_to_diagram(Position::new(5.0, 5.0)).unwrap_err().is_mapping());

        let ticket = load_ticket(session.reload());
        session.apply_load(ticket, Ok(snapshot("plano", vec![])));
        session.set_layer_origin(Position::new(10.0, 20.0));
        assert_eq!(
            session.screen_to_diagram(Position::new(60.0, 70.0)).unwrap(),
            Position::new(50.0, 50.0)
        );
    }

    #[test]
    fn test_complete_mutation_always_reloads() {
        let mut session = Session::default();
        let effect = session.complete_mutation(&Mutation::DeleteDevice(4), Err(EditorError::network("delete", "timeout")));
        assert!(matches!(effect, Effect::Load(_)));
        assert_eq!(session.status().unwrap().level, StatusLevel::Error);
        assert!(session.status().unwrap().text.contains("delete device 4"));
    }
}
