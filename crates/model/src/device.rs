//! Device definitions
//!
//! This module contains the `Device` entity as the backend reports it, the
//! `DeviceDraft` produced by the attribute form, the `NewDevice` creation
//! payload, and the per-type attribute models (currently only `pc`).

use chrono::NaiveDateTime;
use plano_core::{
    AttributeValue, DeviceId, DeviceStatus, DeviceType, EditorError, EditorResult, Position,
    Validatable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

use crate::plano::PlanoName;
use crate::serialization::null_as_default;

/// Open mapping of type-specific attributes
pub type TypeAttributes = BTreeMap<String, AttributeValue>;

// ============================================================================
// Device Type Registry
// ============================================================================

/// Device types the backend accepts on creation
pub const CREATABLE_DEVICE_TYPES: &[DeviceType] = &[DeviceType::Pc];

/// Whether a device of this type can be created
pub fn is_creatable(device_type: &DeviceType) -> bool {
    CREATABLE_DEVICE_TYPES.contains(device_type)
}

/// Attribute keys owned by a device type's subtable
pub fn attribute_keys(device_type: &DeviceType) -> &'static [&'static str] {
    match device_type {
        DeviceType::Pc => PcAttributes::KEYS,
        DeviceType::Other(_) => &[],
    }
}

// ============================================================================
// Device
// ============================================================================

/// A device placed on a floor plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Backend-assigned identifier
    pub id: DeviceId,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub device_type: DeviceType,

    /// IP address, empty when unknown
    #[serde(default, deserialize_with = "null_as_default")]
    pub ip: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: DeviceStatus,

    /// Diagram-space x coordinate
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f64,

    /// Diagram-space y coordinate
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f64,

    /// Plano the device belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plano: Option<String>,

    /// Person responsible for the device
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Room or area label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<NaiveDateTime>,

    /// Type-specific attributes, flattened into the same JSON object
    #[serde(flatten)]
    pub type_attributes: TypeAttributes,
}

impl Device {
    /// Create a device with the given id, name and position
    pub fn new(id: DeviceId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            device_type: DeviceType::default(),
            ip: String::new(),
            status: DeviceStatus::default(),
            x: position.x,
            y: position.y,
            plano: None,
            user: None,
            description: None,
            place_name: None,
            last_update: None,
            type_attributes: TypeAttributes::new(),
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the device type
    pub fn with_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the IP address
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = ip.into();
        self
    }

    /// Set the plano
    pub fn in_plano(mut self, plano: impl Into<String>) -> Self {
        self.plano = Some(plano.into());
        self
    }

    /// Set one type attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.type_attributes.insert(key.into(), value.into());
        self
    }

    // ========================================================================
    // Position
    // ========================================================================

    /// Diagram-space position
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Move the device in diagram space
    pub fn set_position(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Typed view of the `pc` attributes, when this is a PC
    pub fn pc_attributes(&self) -> Option<PcAttributes> {
        match self.device_type {
            DeviceType::Pc => Some(PcAttributes::from_attributes(&self.type_attributes)),
            DeviceType::Other(_) => None,
        }
    }

    /// Label/value rows for the detail panel
    pub fn detail_rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Type".to_string(), self.device_type.display_name()),
            ("IP".to_string(), self.ip.clone()),
            ("Status".to_string(), self.status.to_string()),
        ];
        if let Some(user) = &self.user {
            rows.push(("User".to_string(), user.clone()));
        }
        if let Some(place) = &self.place_name {
            rows.push(("Place".to_string(), place.clone()));
        }
        if let Some(description) = &self.description {
            rows.push(("Description".to_string(), description.clone()));
        }
        for (key, value) in &self.type_attributes {
            if !value.is_null() {
                rows.push((key.clone(), value.display()));
            }
        }
        rows
    }
}

impl Validatable for Device {
    fn validate(&self) -> EditorResult<()> {
        validate_common(&self.name, &self.ip, self.position())
    }
}

fn validate_common(name: &str, ip: &str, position: Position) -> EditorResult<()> {
    if name.trim().is_empty() {
        return Err(EditorError::validation("Device name is required"));
    }
    if !ip.trim().is_empty() && ip.trim().parse::<IpAddr>().is_err() {
        return Err(EditorError::validation(format!(
            "'{}' is not a valid IP address",
            ip
        )));
    }
    if !position.is_finite() {
        return Err(EditorError::validation("Device position must be finite"));
    }
    Ok(())
}

// ============================================================================
// Device Draft
// ============================================================================

/// Device attributes entered in the creation form, before placement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceDraft {
    pub name: String,
    pub device_type: DeviceType,
    pub ip: String,
    pub status: DeviceStatus,
    pub user: Option<String>,
    pub description: Option<String>,
    pub place_name: Option<String>,
    pub type_attributes: TypeAttributes,
}

impl DeviceDraft {
    /// Create a draft with a name and type
    pub fn new(name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            name: name.into(),
            device_type,
            ..Default::default()
        }
    }

    /// Attach typed PC attributes
    pub fn with_pc(mut self, pc: PcAttributes) -> Self {
        self.type_attributes.extend(pc.into_attributes());
        self
    }

    /// Combine with a diagram position and plano into a creation payload
    pub fn place(self, position: Position, plano: &PlanoName) -> NewDevice {
        NewDevice {
            name: self.name.trim().to_string(),
            device_type: self.device_type,
            ip: self.ip.trim().to_string(),
            status: self.status,
            x: position.x,
            y: position.y,
            plano: plano.as_str().to_string(),
            user: self.user.filter(|s| !s.trim().is_empty()),
            description: self.description.filter(|s| !s.trim().is_empty()),
            place_name: self.place_name.filter(|s| !s.trim().is_empty()),
            type_attributes: self.type_attributes,
        }
    }
}

// ============================================================================
// New Device
// ============================================================================

/// Creation payload for `POST /api/devices` (a device without an id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,

    #[serde(rename = "type")]
    pub device_type: DeviceType,

    pub ip: String,
    pub status: DeviceStatus,
    pub x: f64,
    pub y: f64,
    pub plano: String,

    #[serde(rename = "usuario", skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,

    #[serde(flatten)]
    pub type_attributes: TypeAttributes,
}

impl NewDevice {
    /// Diagram-space position the device will be created at
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Materialize as a device once the backend has assigned an id
    pub fn into_device(self, id: DeviceId) -> Device {
        Device {
            id,
            name: self.name,
            device_type: self.device_type,
            ip: self.ip,
            status: self.status,
            x: self.x,
            y: self.y,
            plano: Some(self.plano),
            user: self.user,
            description: self.description,
            place_name: self.place_name,
            last_update: None,
            type_attributes: self.type_attributes,
        }
    }
}

impl Validatable for NewDevice {
    fn validate(&self) -> EditorResult<()> {
        if !is_creatable(&self.device_type) {
            return Err(EditorError::UnsupportedDeviceType(
                self.device_type.as_str().to_string(),
            ));
        }
        PlanoName::new(self.plano.clone())?;
        validate_common(&self.name, &self.ip, self.position())?;

        let allowed = attribute_keys(&self.device_type);
        if let Some(key) = self
            .type_attributes
            .keys()
            .find(|k| !allowed.contains(&k.as_str()))
        {
            return Err(EditorError::validation(format!(
                "Attribute '{}' does not belong to device type '{}'",
                key, self.device_type
            )));
        }
        Ok(())
    }
}

// ============================================================================
// PC Attributes
// ============================================================================

/// Hardware inventory carried by `pc` devices
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PcAttributes {
    pub user: Option<String>,
    pub cpu_benchmark: Option<String>,
    pub cpu: Option<String>,
    /// Installed memory in GB
    pub ram: Option<i64>,
    pub office: Option<String>,
    pub antivirus: Option<String>,
    pub motherboard: Option<String>,
    pub disks: Option<String>,
    pub ram_ddr: Option<String>,
    pub gpu: Option<String>,
    pub gpu_memory: Option<String>,
}

impl PcAttributes {
    /// Attribute keys of the `pc` subtable
    pub const KEYS: &'static [&'static str] = &[
        "user",
        "cpu_benchmark",
        "cpu",
        "ram",
        "office",
        "antivirus",
        "motherboard",
        "disks",
        "ram_ddr",
        "gpu",
        "gpu_memory",
    ];

    /// Read the typed view out of an attribute map, ignoring unrelated keys
    pub fn from_attributes(attributes: &TypeAttributes) -> Self {
        let text = |key: &str| {
            attributes.get(key).and_then(|v| match v {
                AttributeValue::Null => None,
                AttributeValue::String(s) => Some(s.clone()),
                other => Some(other.display()),
            })
        };
        let ram = attributes.get("ram").and_then(|v| match v {
            AttributeValue::Int(n) => Some(*n),
            AttributeValue::Float(f) => Some(f.round() as i64),
            AttributeValue::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        Self {
            user: text("user"),
            cpu_benchmark: text("cpu_benchmark"),
            cpu: text("cpu"),
            ram,
            office: text("office"),
            antivirus: text("antivirus"),
            motherboard: text("motherboard"),
            disks: text("disks"),
            ram_ddr: text("ram_ddr"),
            gpu: text("gpu"),
            gpu_memory: text("gpu_memory"),
        }
    }

    /// Convert into attribute map entries, skipping unset fields
    pub fn into_attributes(self) -> TypeAttributes {
        let mut map = TypeAttributes::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                map.insert(key.to_string(), AttributeValue::String(v));
            }
        };
        put("user", self.user);
        put("cpu_benchmark", self.cpu_benchmark);
        put("cpu", self.cpu);
        put("office", self.office);
        put("antivirus", self.antivirus);
        put("motherboard", self.motherboard);
        put("disks", self.disks);
        put("ram_ddr", self.ram_ddr);
        put("gpu", self.gpu);
        put("gpu_memory", self.gpu_memory);
        if let Some(ram) = self.ram {
            map.insert("ram".to_string(), AttributeValue::Int(ram));
        }
        map
    }
}

// ============================================================================
// Tests
// ============================================================================
