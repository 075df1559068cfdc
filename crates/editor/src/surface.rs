//! Floor-plan surface
//!
//! The background of a diagram is an SVG document. Its root element's
//! `viewBox`, `width`, `height` and `preserveAspectRatio` attributes define
//! how diagram (local) coordinates land in the surface viewport, which is
//! the piece the coordinate mapper needs besides the view transform.

use std::collections::HashMap;
use std::sync::OnceLock;

use plano_core::{Affine, EditorError, EditorResult, Position, Rect, Size};
use regex::Regex;

use crate::view::ViewTransform;

// ============================================================================
// Attribute parsing
// ============================================================================

fn svg_open_tag() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?is)<svg\b([^>]*)>").ok())
        .as_ref()
}

fn attribute() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).ok())
        .as_ref()
}

fn length() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*(px)?\s*$").ok())
        .as_ref()
}

fn root_attributes(markup: &str) -> EditorResult<HashMap<String, String>> {
    let (Some(open_tag), Some(attribute)) = (svg_open_tag(), attribute()) else {
        return Err(EditorError::internal("surface patterns failed to compile"));
    };
    let captures = open_tag
        .captures(markup)
        .ok_or_else(|| EditorError::InvalidSurface("no <svg> root element".to_string()))?;
    let attrs = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    Ok(attribute
        .captures_iter(attrs)
        .filter_map(|c| {
            let name = c.get(1)?.as_str().to_string();
            let value = c.get(2).or_else(|| c.get(3))?.as_str().to_string();
            Some((name, value))
        })
        .collect())
}

/// Parse an absolute length (`"800"`, `"800px"`); relative units yield `None`
fn parse_length(value: &str) -> Option<f64> {
    let captures = length()?.captures(value)?;
    let n: f64 = captures.get(1)?.as_str().parse().ok()?;
    (n.is_finite() && n > 0.0).then_some(n)
}

fn parse_view_box(value: &str) -> EditorResult<Rect> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| EditorError::InvalidSurface(format!("malformed viewBox '{}'", value)))?;

    match numbers.as_slice() {
        [x, y, w, h] if *w > 0.0 && *h > 0.0 => Ok(Rect::from_xywh(*x, *y, *w, *h)),
        _ => Err(EditorError::InvalidSurface(format!(
            "viewBox '{}' must have four numbers with positive size",
            value
        ))),
    }
}

// ============================================================================
// Aspect ratio
// ============================================================================

/// Alignment of the viewBox inside the viewport along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Min,
    Mid,
    Max,
}

impl Align {
    fn factor(self) -> f64 {
        match self {
            Align::Min => 0.0,
            Align::Mid => 0.5,
            Align::Max => 1.0,
        }
    }
}

/// Parsed `preserveAspectRatio`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// Stretch each axis independently
    None,
    /// Uniform scale, aligned per axis; `slice` covers instead of fitting
    Uniform { x: Align, y: Align, slice: bool },
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::Uniform {
            x: Align::Mid,
            y: Align::Mid,
            slice: false,
        }
    }
}

impl AspectRatio {
    /// Parse the attribute value, falling back to `xMidYMid meet`
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split_whitespace();
        let align = parts.next().unwrap_or("xMidYMid");
        let slice = parts.next() == Some("slice");

        if align == "none" {
            return AspectRatio::None;
        }
        let axis = |s: &str| match s {
            "Min" => Some(Align::Min),
            "Mid" => Some(Align::Mid),
            "Max" => Some(Align::Max),
            _ => None,
        };
        match (align.get(1..4).and_then(axis), align.get(5..8).and_then(axis)) {
            (Some(x), Some(y)) if align.starts_with('x') && align.get(4..5) == Some("Y") => {
                AspectRatio::Uniform { x, y, slice }
            }
            _ => AspectRatio::default(),
        }
    }
}

// ============================================================================
// Floor Plan Surface
// ============================================================================

/// A loaded floor-plan image and its local coordinate system
#[derive(Debug, Clone, PartialEq)]
pub struct FloorPlanSurface {
    markup: String,
    view_box: Rect,
    viewport: Size,
    aspect: AspectRatio,
}

impl FloorPlanSurface {
    /// Parse SVG markup
    pub fn parse(markup: impl Into<String>) -> EditorResult<Self> {
        let markup = markup.into();
        let attrs = root_attributes(&markup)?;

        let width = attrs.get("width").and_then(|w| parse_length(w));
        let height = attrs.get("height").and_then(|h| parse_length(h));
        let view_box = match attrs.get("viewBox") {
            Some(vb) => parse_view_box(vb)?,
            None => match (width, height) {
                (Some(w), Some(h)) => Rect::from_xywh(0.0, 0.0, w, h),
                _ => {
                    return Err(EditorError::InvalidSurface(
                        "surface needs a viewBox or absolute width and height".to_string(),
                    ));
                }
            },
        };

        let viewport = match (width, height) {
            (Some(w), Some(h)) => Size::new(w, h),
            (Some(w), None) => Size::new(w, w * view_box.size.height / view_box.size.width),
            (None, Some(h)) => Size::new(h * view_box.size.width / view_box.size.height, h),
            (None, None) => view_box.size,
        };

        let aspect = attrs
            .get("preserveAspectRatio")
            .map(|v| AspectRatio::parse(v))
            .unwrap_or_default();

        Ok(Self {
            markup,
            view_box,
            viewport,
            aspect,
        })
    }

    /// Original SVG markup
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    /// Rendered size of the surface in unscaled layer pixels
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    /// `viewBox` attribute value for an overlay sharing this coordinate system
    pub fn view_box_attr(&self) -> String {
        let vb = self.view_box;
        format!(
            "{} {} {} {}",
            vb.position.x, vb.position.y, vb.size.width, vb.size.height
        )
    }

    /// `preserveAspectRatio` attribute value for an overlay
    pub fn aspect_attr(&self) -> String {
        match self.aspect {
            AspectRatio::None => "none".to_string(),
            AspectRatio::Uniform { x, y, slice } => {
                let name = |a: Align| match a {
                    Align::Min => "Min",
                    Align::Mid => "Mid",
                    Align::Max => "Max",
                };
                format!(
                    "x{}Y{} {}",
                    name(x),
                    name(y),
                    if slice { "slice" } else { "meet" }
                )
            }
        }
    }

    /// Map from diagram (viewBox) coordinates to viewport pixels
    pub fn local_to_viewport(&self) -> Affine {
        let vb = self.view_box;
        let sx = self.viewport.width / vb.size.width;
        let sy = self.viewport.height / vb.size.height;

        match self.aspect {
            AspectRatio::None => {
                Affine::scale_xy(sx, sy) * Affine::translate(-vb.position.x, -vb.position.y)
            }
            AspectRatio::Uniform { x, y, slice } => {
                let s = if slice { sx.max(sy) } else { sx.min(sy) };
                let tx = (self.viewport.width - vb.size.width * s) * x.factor();
                let ty = (self.viewport.height - vb.size.height * s) * y.factor();
                Affine::translate(tx, ty)
                    * Affine::scale(s)
                    * Affine::translate(-vb.position.x, -vb.position.y)
            }
        }
    }

    /// Full diagram-to-screen transform for a layer placed at `origin`
    pub fn screen_ctm(&self, view: &ViewTransform, origin: Position) -> Affine {
        Affine::translate(origin.x, origin.y) * view.matrix() * self.local_to_viewport()
    }
}

// ============================================================================
// Render Surface
// ============================================================================

/// Something rendered on screen with a current local-to-screen transform
pub trait RenderSurface {
    /// Current transform from local coordinates to screen coordinates,
    /// or `None` when nothing is rendered
    fn screen_ctm(&self) -> Option<Affine>;
}

/// A floor plan as currently shown: surface, view transform and layer origin
#[derive(Debug, Clone, Copy)]
pub struct MountedSurface<'a> {
    pub surface: &'a FloorPlanSurface,
    pub view: &'a ViewTransform,
    pub origin: Position,
}

impl RenderSurface for MountedSurface<'_> {
    fn screen_ctm(&self) -> Option<Affine> {
        Some(self.surface.screen_ctm(self.view, self.origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAN: &str = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600" viewBox="0 0 400 300">
  <rect x="0" y="0" width="400" height="300" fill="#eee"/>
</svg>"##;

    fn approx(a: Position, b: Position) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_parse_plan() {
        let surface = FloorPlanSurface::parse(PLAN).unwrap();
        assert_eq!(surface.view_box(), Rect::from_xywh(0.0, 0.0, 400.0, 300.0));
        assert_eq!(surface.viewport(), Size::new(800.0, 600.0));
        assert_eq!(surface.aspect(), AspectRatio::default());
        assert_eq!(surface.view_box_attr(), "0 0 400 300");
        assert_eq!(surface.aspect_attr(), "xMidYMid meet");
    }

    #[test]
    fn test_parse_fallbacks() {
        let surface =
            FloorPlanSurface::parse(r#"<svg width="100%" viewBox="10,20,200,100"></svg>"#).unwrap();
        assert_eq!(surface.viewport(), Size::new(200.0, 100.0));

        let surface = FloorPlanSurface::parse(r#"<svg width='640px' height='480px'></svg>"#).unwrap();
        assert_eq!(surface.view_box(), Rect::from_xywh(0.0, 0.0, 640.0, 480.0));

        let surface = FloorPlanSurface::parse(r#"<svg width="300" viewBox="0 0 200 100"></svg>"#).unwrap();
        assert_eq!(surface.viewport(), Size::new(300.0, 150.0));
    }

    #[test]
    fn test_parse_rejects_unusable_markup() {
        for markup in [
            "<html></html>",
            "<svg></svg>",
            r#"<svg viewBox="0 0 0 10"></svg>"#,
            r#"<svg viewBox="a b c d"></svg>"#,
        ] {
            let err = FloorPlanSurface::parse(markup).unwrap_err();
            assert!(matches!(err, EditorError::InvalidSurface(_)), "{markup}");
        }
    }

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!(AspectRatio::parse("none"), AspectRatio::None);
        assert_eq!(
            AspectRatio::parse("xMinYMax slice"),
            AspectRatio::Uniform { x: Align::Min, y: Align::Max, slice: true }
        );
        assert_eq!(AspectRatio::parse("garbage"), AspectRatio::default());
    }

    #[test]
    fn test_local_to_viewport_meet_centers() {
        // 400x300 viewBox in an 800x800 viewport: scale 2, centred vertically
        let surface = FloorPlanSurface::parse(
            r#"<svg width="800" height="800" viewBox="0 0 400 300"></svg>"#,
        )
        .unwrap();
        let m = surface.local_to_viewport();
        assert!(approx(m.apply(Position::new(0.0, 0.0)), Position::new(0.0, 100.0)));
        assert!(approx(m.apply(Position::new(400.0, 300.0)), Position::new(800.0, 700.0)));
    }

    #[test]
    fn test_local_to_viewport_none_stretches() {
        let surface = FloorPlanSurface::parse(
            r#"<svg width="800" height="800" viewBox="100 0 400 200" preserveAspectRatio="none"></svg>"#,
        )
        .unwrap();
        let m = surface.local_to_viewport();
        assert!(approx(m.apply(Position::new(100.0, 0.0)), Position::zero()));
        assert!(approx(m.apply(Position::new(500.0, 200.0)), Position::new(800.0, 800.0)));
    }

    #[test]
    fn test_screen_ctm_composition() {
        let surface = FloorPlanSurface::parse(PLAN).unwrap();
        let mut view = ViewTransform::default();
        view.apply_zoom(-500.0); // scale 1.5
        view.apply_pan(Position::new(20.0, 10.0));

        let ctm = surface.screen_ctm(&view, Position::new(200.0, 50.0));
        // local (100, 100) -> viewport (200, 200) -> view (320, 310) -> screen (520, 360)
        assert!(approx(ctm.apply(Position::new(100.0, 100.0)), Position::new(520.0, 360.0)));

        let mounted = MountedSurface { surface: &surface, view: &view, origin: Position::new(200.0, 50.0) };
        assert_eq!(mounted.screen_ctm(), Some(ctm));
    }
}
