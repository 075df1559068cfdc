//! Interaction mode transition table
//!
//! `Session::dispatch` is the only place intents change the mode. Each
//! handler either applies the intent and returns the effects it needs, or
//! logs that the intent does not apply in the current mode and returns
//! nothing.

use plano_core::{DeviceId, Position, Validatable};
use plano_model::{DeviceDraft, NewConnection, PlanoName};

use crate::drag::{ActiveDrag, DragOutcome};
use crate::mode::{Effect, Intent, InteractionMode, Mutation};
use crate::session::Session;

impl Session {
    /// Apply an intent and return the network work it requires
    pub fn dispatch(&mut self, intent: Intent) -> Vec<Effect> {
        tracing::debug!("Intent {} in mode {}", intent.name(), self.mode);
        match intent {
            Intent::StartPlacement => self.start_placement(),
            Intent::PlaceAt(screen) => self.place_at(screen),
            Intent::SubmitDevice(draft) => self.submit_device(draft),
            Intent::DismissDeviceForm => {
                self.pending_placement = None;
                Vec::new()
            }

            Intent::SelectDevice(id) => self.select_device(id),
            Intent::BeginConnect => self.begin_connect(),
            Intent::ConfirmConnectTarget(id) => self.confirm_connect_target(id),
            Intent::SetConnectionType(connection_type) => {
                self.connection_type = connection_type;
                Vec::new()
            }

            Intent::BeginDrag(id) => self.begin_drag(id),
            Intent::DragTo(screen) => self.drag_to(screen),
            Intent::EndDrag => self.end_drag(),

            Intent::DeleteDevice(id) => self.delete_device(id),
            Intent::Cancel => self.cancel(),

            Intent::BeginPan(screen) => self.begin_pan(screen),
            Intent::PanTo(screen) => {
                if let Some(anchor) = self.pan {
                    self.view.pan_to(&anchor, screen);
                    self.pan_moved = true;
                }
                Vec::new()
            }
            Intent::EndPan => {
                self.pan = None;
                Vec::new()
            }
            Intent::Zoom(delta) => {
                self.view.apply_zoom(delta);
                Vec::new()
            }
            Intent::ResetView => {
                self.view.reset();
                Vec::new()
            }

            Intent::SwitchPlano(plano) => self.switch_plano(plano),
            Intent::Reload => vec![self.reload()],
        }
    }

    fn ignored(&self, what: &str) -> Vec<Effect> {
        tracing::debug!("Ignoring {} in mode {}", what, self.mode);
        Vec::new()
    }

    // ========================================================================
    // Device creation
    // ========================================================================

    fn start_placement(&mut self) -> Vec<Effect> {
        if !self.mode.is_idle() {
            return self.ignored("start-placement");
        }
        self.pending_placement = None;
        self.pan = None;
        self.set_mode(InteractionMode::PlacingDevice);
        Vec::new()
    }

    fn place_at(&mut self, screen: Position) -> Vec<Effect> {
        if self.mode != InteractionMode::PlacingDevice {
            return self.ignored("place-at");
        }
        match self.screen_to_diagram(screen) {
            Ok(position) => {
                self.pending_placement = Some(position);
                self.set_mode(InteractionMode::Idle);
            }
            Err(err) => self.report(&err),
        }
        Vec::new()
    }

    fn submit_device(&mut self, draft: DeviceDraft) -> Vec<Effect> {
        let Some(position) = self.pending_placement else {
            return self.ignored("submit-device");
        };

        let payload = draft.place(position, &self.plano);
        if let Err(err) = payload.validate() {
            // The form stays open so the user can correct it
            self.report(&err);
            return Vec::new();
        }

        self.pending_placement = None;
        vec![Effect::Mutate(Mutation::CreateDevice(payload))]
    }

    // ========================================================================
    // Selection and connections
    // ========================================================================

    fn select_device(&mut self, id: DeviceId) -> Vec<Effect> {
        if !self.mode.is_idle() || !self.store.contains(id) {
            return self.ignored("select-device");
        }
        self.selection = Some(id);
        Vec::new()
    }

    fn begin_connect(&mut self) -> Vec<Effect> {
        match self.selection {
            Some(from) if self.mode.is_idle() && self.store.contains(from) => {
                self.set_mode(InteractionMode::Connecting { from });
                Vec::new()
            }
            _ => self.ignored("begin-connect"),
        }
    }

    fn confirm_connect_target(&mut self, target: DeviceId) -> Vec<Effect> {
        let InteractionMode::Connecting { from } = self.mode else {
            return self.ignored("confirm-connect-target");
        };
        if target != from && !self.store.contains(target) {
            return self.ignored("confirm-connect-target");
        }

        self.set_mode(InteractionMode::Idle);
        match NewConnection::new(from, target, self.connection_type.clone()) {
            Ok(payload) => vec![Effect::Mutate(Mutation::CreateConnection(payload))],
            Err(err) => {
                self.report(&err);
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Drag
    // ========================================================================

    fn begin_drag(&mut self, id: DeviceId) -> Vec<Effect> {
        if !self.mode.is_idle() || self.selection != Some(id) {
            return self.ignored("begin-drag");
        }
        let Some(device) = self.store.device(id) else {
            return self.ignored("begin-drag");
        };

        self.drag = Some(ActiveDrag::begin(id, device.position()));
        self.pan = None;
        self.set_mode(InteractionMode::DraggingDevice { device: id });
        Vec::new()
    }

    fn drag_to(&mut self, screen: Position) -> Vec<Effect> {
        if !matches!(self.mode, InteractionMode::DraggingDevice { .. }) {
            return self.ignored("drag-to");
        }
        let position = match self.screen_to_diagram(screen) {
            Ok(position) => position,
            Err(err) => {
                // The last mapped position stays
                self.report(&err);
                return Vec::new();
            }
        };

        if !position.is_finite() {
            tracing::debug!("Ignoring non-finite drag position {:?}", position);
            return Vec::new();
        }

        if let Some(drag) = self.drag.as_mut() {
            drag.move_to(position);
            match self.store.device(drag.device()).cloned() {
                Some(mut device) => {
                    device.set_position(position);
                    self.store.upsert_local(device);
                }
                None => tracing::debug!("Drag target {} vanished", drag.device()),
            }
        }
        Vec::new()
    }

    fn end_drag(&mut self) -> Vec<Effect> {
        if !matches!(self.mode, InteractionMode::DraggingDevice { .. }) {
            return self.ignored("end-drag");
        }
        self.set_mode(InteractionMode::Idle);
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };

        match drag.finish() {
            DragOutcome::Unmoved { device } => {
                tracing::debug!("Device {} released without moving", device);
                Vec::new()
            }
            DragOutcome::Moved { device, position } => match self.store.device(device) {
                Some(stored) => {
                    let mut updated = stored.clone();
                    updated.set_position(position);
                    vec![Effect::Mutate(Mutation::UpdateDevice(updated))]
                }
                None => {
                    tracing::debug!("Dragged device {} vanished before release", device);
                    Vec::new()
                }
            },
        }
    }

    // ========================================================================
    // Deletion and cancel
    // ========================================================================

    fn delete_device(&mut self, id: DeviceId) -> Vec<Effect> {
        if !self.mode.is_idle() || !self.store.contains(id) {
            return self.ignored("delete-device");
        }
        if self.selection == Some(id) {
            self.selection = None;
        }
        vec![Effect::Mutate(Mutation::DeleteDevice(id))]
    }

    fn cancel(&mut self) -> Vec<Effect> {
        self.pan = None;
        match self.mode {
            InteractionMode::PlacingDevice | InteractionMode::Connecting { .. } => {
                self.set_mode(InteractionMode::Idle);
            }
            InteractionMode::DraggingDevice { device } => {
                if let Some(drag) = self.drag.take() {
                    let _ = self.store.set_position(device, drag.origin());
                }
                self.set_mode(InteractionMode::Idle);
            }
            InteractionMode::Idle => {
                if self.pending_placement.take().is_none() {
                    self.selection = None;
                }
            }
        }
        Vec::new()
    }

    // ========================================================================
    // View and diagram
    // ========================================================================

    fn begin_pan(&mut self, screen: Position) -> Vec<Effect> {
        if !self.mode.allows_pan() {
            return self.ignored("begin-pan");
        }
        self.pan = Some(self.view.begin_pan(screen));
        self.pan_moved = false;
        Vec::new()
    }

    fn switch_plano(&mut self, plano: PlanoName) -> Vec<Effect> {
        self.set_mode(InteractionMode::Idle);
        self.selection = None;
        self.pending_placement = None;
        self.drag = None;
        self.pan = None;
        self.store.clear();
        self.surface = None;
        self.view.reset();
        self.status = None;
        self.plano = plano.clone();
        vec![self.begin_load(plano)]
    }
}
