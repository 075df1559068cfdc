//! Pointer and keyboard input translation
//!
//! Raw input from the rendering surface is turned into an [`Intent`] based
//! on the current mode and selection. Input that means nothing in the
//! current state yields `None`.

use plano_core::{DeviceId, Position};

use crate::mode::{Intent, InteractionMode};
use crate::session::Session;

/// Raw input from the diagram surface, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Pointer pressed on a device shape
    DeviceDown { device: DeviceId, at: Position },
    /// Click completed on a device shape
    DeviceClick(DeviceId),
    /// Pointer pressed on the background
    BackgroundDown(Position),
    /// Click completed on the background
    BackgroundClick(Position),
    Move(Position),
    Up(Position),
    /// Vertical wheel delta
    Wheel(f64),
    Escape,
}

impl Session {
    /// Translate raw input into an intent for the current state
    pub fn translate(&self, input: PointerInput) -> Option<Intent> {
        match (input, self.mode) {
            // Only the selected device's own shape starts a drag
            (PointerInput::DeviceDown { device, .. }, InteractionMode::Idle) => {
                (self.selection == Some(device)).then_some(Intent::BeginDrag(device))
            }
            (PointerInput::DeviceDown { .. }, _) => None,

            (PointerInput::DeviceClick(device), InteractionMode::Idle) => {
                Some(Intent::SelectDevice(device))
            }
            (PointerInput::DeviceClick(device), InteractionMode::Connecting { .. }) => {
                Some(Intent::ConfirmConnectTarget(device))
            }
            (PointerInput::DeviceClick(_), _) => None,

            (PointerInput::BackgroundDown(at), mode) if mode.allows_pan() => {
                Some(Intent::BeginPan(at))
            }
            (PointerInput::BackgroundDown(_), _) => None,

            (PointerInput::BackgroundClick(at), InteractionMode::PlacingDevice) => {
                Some(Intent::PlaceAt(at))
            }
            // A click that ends a pan gesture is not a cancel
            (PointerInput::BackgroundClick(_), InteractionMode::Connecting { .. }) => {
                (!self.pan_moved).then_some(Intent::Cancel)
            }
            (PointerInput::BackgroundClick(_), _) => None,

            (PointerInput::Move(at), InteractionMode::DraggingDevice { .. }) => {
                Some(Intent::DragTo(at))
            }
            (PointerInput::Move(at), _) => self.pan.map(|_| Intent::PanTo(at)),

            (PointerInput::Up(_), InteractionMode::DraggingDevice { .. }) => Some(Intent::EndDrag),
            (PointerInput::Up(_), _) => self.pan.map(|_| Intent::EndPan),

            (PointerInput::Wheel(delta), _) => Some(Intent::Zoom(delta)),
            (PointerInput::Escape, _) => Some(Intent::Cancel),
        }
    }

    /// Translate and dispatch in one step
    pub fn handle_input(&mut self, input: PointerInput) -> Vec<crate::mode::Effect> {
        match self.translate(input) {
            Some(intent) => self.dispatch(intent),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DiagramSnapshot;
    use crate::mode::Effect;
    use crate::surface::FloorPlanSurface;
    use plano_model::Device;

    fn loaded() -> Session {
        let mut session = Session::default();
        let Effect::Load(request) = session.reload() else {
            unreachable!()
        };
        session.apply_load(
            request.ticket,
            Ok(DiagramSnapshot {
                plano: request.plano,
                surface: FloorPlanSurface::parse(r#"<svg viewBox="0 0 100 100"></svg>"#).unwrap(),
                devices: vec![
                    Device::new(1, "a", Position::new(10.0, 10.0)),
                    Device::new(2, "b", Position::new(20.0, 20.0)),
                ],
                connections: vec![],
            }),
        );
        session
    }

    #[test]
    fn test_device_down_drags_only_the_selected_device() {
        let mut session = loaded();
        let at = Position::new(10.0, 10.0);
        assert_eq!(session.translate(PointerInput::DeviceDown { device: 1, at }), None);

        session.handle_input(PointerInput::DeviceClick(1));
        assert_eq!(
            session.translate(PointerInput::DeviceDown { device: 1, at }),
            Some(Intent::BeginDrag(1))
        );
        assert_eq!(session.translate(PointerInput::DeviceDown { device: 2, at }), None);
    }

    #[test]
    fn test_full_drag_gesture() {
        let mut session = loaded();
        session.handle_input(PointerInput::DeviceClick(1));
        session.handle_input(PointerInput::DeviceDown { device: 1, at: Position::new(10.0, 10.0) });
        assert!(session.handle_input(PointerInput::Move(Position::new(30.0, 40.0))).is_empty());

        let effects = session.handle_input(PointerInput::Up(Position::new(30.0, 40.0)));
        assert_eq!(effects.len(), 1);
        assert_eq!(session.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_device_click_while_connecting_confirms() {
        let mut session = loaded();
        session.handle_input(PointerInput::DeviceClick(1));
        session.dispatch(Intent::BeginConnect);
        assert_eq!(
            session.translate(PointerInput::DeviceClick(2)),
            Some(Intent::ConfirmConnectTarget(2))
        );
    }

    #[test]
    fn test_background_click_semantics() {
        let mut session = loaded();
        let at = Position::new(50.0, 50.0);
        assert_eq!(session.translate(PointerInput::BackgroundClick(at)), None);

        session.dispatch(Intent::StartPlacement);
        assert_eq!(session.translate(PointerInput::BackgroundClick(at)), Some(Intent::PlaceAt(at)));
        assert_eq!(session.translate(PointerInput::DeviceClick(1)), None);
        assert_eq!(session.translate(PointerInput::BackgroundDown(at)), None);
    }

    #[test]
    fn test_background_click_cancels_connect_unless_panned() {
        let mut session = loaded();
        session.handle_input(PointerInput::DeviceClick(1));
        session.dispatch(Intent::BeginConnect);

        let at = Position::new(50.0, 50.0);
        session.handle_input(PointerInput::BackgroundDown(at));
        session.handle_input(PointerInput::Move(Position::new(60.0, 50.0)));
        session.handle_input(PointerInput::Up(Position::new(60.0, 50.0)));
        session.handle_input(PointerInput::BackgroundClick(Position::new(60.0, 50.0)));
        assert_eq!(session.mode(), InteractionMode::Connecting { from: 1 });

        session.handle_input(PointerInput::BackgroundDown(at));
        session.handle_input(PointerInput::Up(at));
        session.handle_input(PointerInput::BackgroundClick(at));
        assert_eq!(session.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_wheel_and_escape() {
        let session = loaded();
        assert_eq!(session.translate(PointerInput::Wheel(-120.0)), Some(Intent::Zoom(-120.0)));
        assert_eq!(session.translate(PointerInput::Escape), Some(Intent::Cancel));
        assert_eq!(session.translate(PointerInput::Move(Position::zero())), None);
    }
}
