//! Device drag gesture

use plano_core::{DeviceId, Position};

/// How a drag gesture ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// The device moved; persist this final position
    Moved { device: DeviceId, position: Position },
    /// Pointer went down and up without a mapped move
    Unmoved { device: DeviceId },
}

/// State of an in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    device: DeviceId,
    origin: Position,
    last: Position,
    moves: usize,
}

impl ActiveDrag {
    /// Start dragging `device`, currently at `origin`
    pub fn begin(device: DeviceId, origin: Position) -> Self {
        Self {
            device,
            origin,
            last: origin,
            moves: 0,
        }
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Position before the gesture started
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Last mapped pointer position
    pub fn last(&self) -> Position {
        self.last
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Record a mapped pointer move
    pub fn move_to(&mut self, position: Position) {
        self.last = position;
        self.moves += 1;
    }

    pub fn finish(self) -> DragOutcome {
        if self.moves == 0 {
            DragOutcome::Unmoved {
                device: self.device,
            }
        } else {
            DragOutcome::Moved {
                device: self.device,
                position: self.last,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmoved_drag() {
        let drag = ActiveDrag::begin(3, Position::new(1.0, 1.0));
        assert_eq!(drag.finish(), DragOutcome::Unmoved { device: 3 });
    }

    #[test]
    fn test_last_move_wins() {
        let mut drag = ActiveDrag::begin(3, Position::new(1.0, 1.0));
        drag.move_to(Position::new(2.0, 2.0));
        drag.move_to(Position::new(5.0, 8.0));
        assert_eq!(drag.moves(), 2);
        assert_eq!(drag.origin(), Position::new(1.0, 1.0));
        assert_eq!(
            drag.finish(),
            DragOutcome::Moved { device: 3, position: Position::new(5.0, 8.0) }
        );
    }
}
