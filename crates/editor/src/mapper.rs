//! Screen to diagram coordinate mapping

use plano_core::{EditorError, EditorResult, Position};

use crate::surface::RenderSurface;

/// Converts pointer positions into diagram coordinates
///
/// The surface transform is asked for on every call and inverted there, so
/// the result always reflects the latest pan/zoom state.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<S> {
    surface: Option<S>,
}

impl<S: RenderSurface> CoordinateMapper<S> {
    pub fn new(surface: Option<S>) -> Self {
        Self { surface }
    }

    /// Map a screen point into diagram space
    ///
    /// Fails with `NoSurface` when nothing is rendered and with
    /// `SingularTransform` when the current transform cannot be inverted.
    /// Both are mapping failures; callers treat them as no-ops.
    pub fn screen_to_diagram(&self, screen: Position) -> EditorResult<Position> {
        let surface = self.surface.as_ref().ok_or(EditorError::NoSurface)?;
        let ctm = surface.screen_ctm().ok_or(EditorError::NoSurface)?;
        let inverse = ctm.inverse().ok_or(EditorError::SingularTransform)?;
        Ok(inverse.apply(screen))
    }

    /// Map a diagram point onto the screen
    pub fn diagram_to_screen(&self, diagram: Position) -> EditorResult<Position> {
        let surface = self.surface.as_ref().ok_or(EditorError::NoSurface)?;
        let ctm = surface.screen_ctm().ok_or(EditorError::NoSurface)?;
        Ok(ctm.apply(diagram))
    }
}
