//! Core types used throughout the plano editor
//!
//! This module contains the fundamental types shared by the model, the sync
//! client and the interactive editor: identifiers, diagram geometry, the
//! affine transform used for screen/diagram mapping, and the small closed
//! vocabularies (device status, device type, connection type).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Identifier of a device, assigned by the backend on creation
pub type DeviceId = i64;

/// Identifier of a persisted connection
pub type ConnectionId = i64;

// ============================================================================
// Geometry Types
// ============================================================================

/// Position in either screen space or diagram space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a position at the origin (0, 0)
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Whether both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Width and height of a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub position: Position,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    /// Create a rectangle from coordinates and dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Position::new(x, y),
            size: Size::new(width, height),
        }
    }
}

// ============================================================================
// Affine Transform
// ============================================================================

/// 2D affine transform in SVG matrix order
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`, the same layout as an
/// SVG `matrix(a b c d e f)` or a DOM `getScreenCTM()` result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    /// Determinants smaller than this are treated as singular
    pub const SINGULAR_EPSILON: f64 = 1e-12;

    /// The identity transform
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Create a transform from its six matrix coefficients
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Pure translation
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Uniform scale about the origin
    pub fn scale(s: f64) -> Self {
        Self::new(s, 0.0, 0.0, s, 0.0, 0.0)
    }

    /// Non-uniform scale about the origin
    pub fn scale_xy(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Compose two transforms: the result applies `inner` first, then `self`
    pub fn then_after(&self, inner: &Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    /// Determinant of the linear part
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < Self::SINGULAR_EPSILON {
            return None;
        }

        let inv = 1.0 / det;
        Some(Affine {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Apply the transform to a point
    pub fn apply(&self, p: Position) -> Position {
        Position {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Affine {
    type Output = Affine;

    fn mul(self, rhs: Affine) -> Affine {
        self.then_after(&rhs)
    }
}

// ============================================================================
// Device Vocabulary
// ============================================================================

/// Reachability status reported for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl DeviceStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Unknown => "unknown",
        }
    }

    /// Fill colour used for the device marker
    pub fn color(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "lime",
            DeviceStatus::Offline => "red",
            DeviceStatus::Unknown => "orange",
        }
    }

    /// All statuses, in display order
    pub fn all() -> &'static [DeviceStatus] {
        &[
            DeviceStatus::Online,
            DeviceStatus::Offline,
            DeviceStatus::Unknown,
        ]
    }
}

impl From<String> for DeviceStatus {
    fn from(value: String) -> Self {
        DeviceStatus::from(value.as_str())
    }
}

impl From<&str> for DeviceStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => DeviceStatus::Online,
            "offline" => DeviceStatus::Offline,
            _ => DeviceStatus::Unknown,
        }
    }
}

impl From<DeviceStatus> for String {
    fn from(value: DeviceStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of device; open-ended since the backend grows new types over time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    /// Workstation with hardware inventory attributes
    Pc,
    /// Any type this client has no dedicated handling for
    Other(String),
}

impl DeviceType {
    /// Wire name of the type
    pub fn as_str(&self) -> &str {
        match self {
            DeviceType::Pc => "pc",
            DeviceType::Other(name) => name.as_str(),
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> String {
        match self {
            DeviceType::Pc => "PC".to_string(),
            DeviceType::Other(name) => name.clone(),
        }
    }
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Pc
    }
}

impl From<String> for DeviceType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pc" => DeviceType::Pc,
            _ => DeviceType::Other(value),
        }
    }
}

impl From<&str> for DeviceType {
    fn from(value: &str) -> Self {
        DeviceType::from(value.to_string())
    }
}

impl From<DeviceType> for String {
    fn from(value: DeviceType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical medium of a link between two devices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
    Ethernet,
    Fiber,
    Other(String),
}

impl ConnectionType {
    /// Wire name of the connection type
    pub fn as_str(&self) -> &str {
        match self {
            ConnectionType::Ethernet => "ethernet",
            ConnectionType::Fiber => "fiber",
            ConnectionType::Other(name) => name.as_str(),
        }
    }

    /// Stroke colour used for the link
    pub fn stroke_color(&self) -> &'static str {
        match self {
            ConnectionType::Ethernet => "#3b82f6",
            ConnectionType::Fiber => "#f59e0b",
            ConnectionType::Other(_) => "#64748b",
        }
    }

    /// Whether the link is drawn dashed
    pub fn is_dashed(&self) -> bool {
        matches!(self, ConnectionType::Fiber)
    }
}

impl Default for ConnectionType {
    fn default() -> Self {
        ConnectionType::Ethernet
    }
}

impl From<String> for ConnectionType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ethernet" => ConnectionType::Ethernet,
            "fiber" | "fibre" => ConnectionType::Fiber,
            _ => ConnectionType::Other(value),
        }
    }
}

impl From<&str> for ConnectionType {
    fn from(value: &str) -> Self {
        ConnectionType::from(value.to_string())
    }
}

impl From<ConnectionType> for String {
    fn from(value: ConnectionType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Attribute Values
// ============================================================================

/// Value of a type-specific device attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<AttributeValue>),
    Object(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Check if null
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Render the value for the detail panel
    pub fn display(&self) -> String {
        match self {
            AttributeValue::Null => String::new(),
            AttributeValue::Bool(v) => v.to_string(),
            AttributeValue::Int(v) => v.to_string(),
            AttributeValue::Float(v) => v.to_string(),
            AttributeValue::String(v) => v.clone(),
            AttributeValue::Array(items) => items
                .iter()
                .map(AttributeValue::display)
                .collect::<Vec<_>>()
                .join(", "),
            AttributeValue::Object(map) => map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v.display()))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl Default for AttributeValue {
    fn default() -> Self {
        AttributeValue::Null
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(a: Position, b: Position) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(1.0, 2.0);
        let b = Position::new(4.0, 6.0);
        assert_eq!(a + b, Position::new(5.0, 8.0));
        assert_eq!(b - a, Position::new(3.0, 4.0));
        assert!(!Position::new(f64::NAN, 0.0).is_finite());
    }

    #[test]
    fn test_affine_compose_order() {
        // scale first, then translate
        let t = Affine::translate(10.0, 20.0) * Affine::scale(2.0);
        assert_eq!(t.apply(Position::new(1.0, 1.0)), Position::new(12.0, 22.0));

        // translate first, then scale
        let t = Affine::scale(2.0) * Affine::translate(10.0, 20.0);
        assert_eq!(t.apply(Position::new(1.0, 1.0)), Position::new(22.0, 42.0));
    }

    #[test]
    fn test_affine_inverse_round_trip() {
        let transforms = [
            Affine::IDENTITY,
            Affine::translate(-35.5, 12.25),
            Affine::translate(50.0, 50.0) * Affine::scale(2.0),
            Affine::scale_xy(0.5, 3.0) * Affine::translate(7.0, -9.0),
            Affine::new(0.8, 0.6, -0.6, 0.8, 100.0, -40.0),
        ];
        let points = [
            Position::zero(),
            Position::new(123.0, -45.5),
            Position::new(-800.25, 1024.0),
        ];

        for t in transforms {
            let inv = t.inverse().unwrap();
            for p in points {
                assert_close(inv.apply(t.apply(p)), p);
                assert_close(t.apply(inv.apply(p)), p);
            }
        }
    }

    #[test]
    fn test_affine_singular_has_no_inverse() {
        assert!(Affine::scale(0.0).inverse().is_none());
        assert!(Affine::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0).inverse().is_none());
    }

    #[test]
    fn test_device_status_parsing_and_color() {
        assert_eq!(DeviceStatus::from("online"), DeviceStatus::Online);
        assert_eq!(DeviceStatus::from("OFFLINE"), DeviceStatus::Offline);
        assert_eq!(DeviceStatus::from("maintenance"), DeviceStatus::Unknown);
        assert_eq!(DeviceStatus::Online.color(), "lime");
        assert_eq!(DeviceStatus::Offline.color(), "red");
        assert_eq!(DeviceStatus::Unknown.color(), "orange");
    }

    #[test]
    fn test_device_type_is_extensible() {
        assert_eq!(DeviceType::from("pc"), DeviceType::Pc);
        let printer = DeviceType::from("printer");
        assert_eq!(printer, DeviceType::Other("printer".to_string()));
        assert_eq!(printer.as_str(), "printer");

        let json = serde_json::to_string(&DeviceType::Pc).unwrap();
        assert_eq!(json, "\"pc\"");
        let back: DeviceType = serde_json::from_str("\"switch\"").unwrap();
        assert_eq!(back, DeviceType::Other("switch".to_string()));
    }

    #[test]
    fn test_connection_type_wire_names() {
        assert_eq!(ConnectionType::from("fiber"), ConnectionType::Fiber);
        assert_eq!(ConnectionType::default().as_str(), "ethernet");
        assert!(ConnectionType::Fiber.is_dashed());
        assert!(!ConnectionType::Ethernet.is_dashed());
    }

    #[test]
    fn test_attribute_value_untagged() {
        let v: AttributeValue = serde_json::from_str("16").unwrap();
        assert_eq!(v.as_int(), Some(16));
        let v: AttributeValue = serde_json::from_str("\"RTX 3060\"").unwrap();
        assert_eq!(v.as_str(), Some("RTX 3060"));
        let v: AttributeValue = serde_json::from_str("null").unwrap();
        assert!(v.is_null());
        assert_eq!(AttributeValue::from(Some(8i64)).display(), "8");
        assert_eq!(AttributeValue::from(None::<String>), AttributeValue::Null);
    }
}
