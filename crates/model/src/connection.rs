//! Connection definitions
//!
//! A connection is an undirected-in-meaning, directed-in-storage link between
//! two devices of the same diagram.

use plano_core::{ConnectionId, ConnectionType, DeviceId, EditorError, EditorResult, Validatable};
use serde::{Deserialize, Serialize};

use crate::serialization::null_as_default;

/// Stable key for a connection, usable before the backend assigns an id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnectionKey {
    Persisted(ConnectionId),
    Endpoints(DeviceId, DeviceId),
}

impl std::fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionKey::Persisted(id) => write!(f, "#{}", id),
            ConnectionKey::Endpoints(from, to) => write!(f, "{}->{}", from, to),
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

/// A link between two devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ConnectionId>,

    pub from_device_id: DeviceId,

    pub to_device_id: DeviceId,

    #[serde(default, deserialize_with = "null_as_default")]
    pub connection_type: ConnectionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Connection {
    /// Create an unpersisted connection
    pub fn new(from: DeviceId, to: DeviceId) -> Self {
        Self {
            id: None,
            from_device_id: from,
            to_device_id: to,
            connection_type: ConnectionType::default(),
            description: None,
        }
    }

    /// Set the backend id
    pub fn with_id(mut self, id: ConnectionId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the connection type
    pub fn with_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    /// Key identifying this connection within a diagram
    pub fn key(&self) -> ConnectionKey {
        match self.id {
            Some(id) => ConnectionKey::Persisted(id),
            None => ConnectionKey::Endpoints(self.from_device_id, self.to_device_id),
        }
    }

    /// Whether the device is one of the endpoints
    pub fn involves(&self, device: DeviceId) -> bool {
        self.from_device_id == device || self.to_device_id == device
    }

    /// The endpoint opposite to `device`, if `device` is an endpoint
    pub fn other_end(&self, device: DeviceId) -> Option<DeviceId> {
        if self.from_device_id == device {
            Some(self.to_device_id)
        } else if self.to_device_id == device {
            Some(self.from_device_id)
        } else {
            None
        }
    }

    /// Whether both connections join the same pair of devices, in either direction
    pub fn same_endpoints(&self, other: &Connection) -> bool {
        (self.from_device_id == other.from_device_id && self.to_device_id == other.to_device_id)
            || (self.from_device_id == other.to_device_id
                && self.to_device_id == other.from_device_id)
    }
}

impl Validatable for Connection {
    fn validate(&self) -> EditorResult<()> {
        if self.from_device_id == self.to_device_id {
            return Err(EditorError::SelfConnection(self.from_device_id));
        }
        Ok(())
    }
}

// ============================================================================
// New Connection
// ============================================================================

/// Creation payload for `POST /api/connections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConnection {
    pub from_device_id: DeviceId,
    pub to_device_id: DeviceId,
    pub connection_type: ConnectionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewConnection {
    /// Build a validated creation payload
    pub fn new(
        from: DeviceId,
        to: DeviceId,
        connection_type: ConnectionType,
    ) -> EditorResult<Self> {
        let payload = Self {
            from_device_id: from,
            to_device_id: to,
            connection_type,
            description: None,
        };
        payload.validate()?;
        Ok(payload)
    }

    /// Attach a free-text description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    /// Materialize as a connection, optionally with a backend id
    pub fn into_connection(self, id: Option<ConnectionId>) -> Connection {
        Connection {
            id,
            from_device_id: self.from_device_id,
            to_device_id: self.to_device_id,
            connection_type: self.connection_type,
            description: self.description,
        }
    }
}

impl Validatable for NewConnection {
    fn validate(&self) -> EditorResult<()> {
        if self.from_device_id == self.to_device_id {
            return Err(EditorError::SelfConnection(self.from_device_id));
        }
        Ok(())
    }
}
