//! In-memory entity store for the current diagram
//!
//! Rebuilt wholesale on every load. Between loads it is only mutated locally
//! by drag, so the rendered position follows the pointer without network
//! traffic.

use std::collections::BTreeMap;

use plano_core::{DeviceId, EditorError, EditorResult, Position};
use plano_model::{Connection, Device};

/// A connection whose endpoints are both present, with their positions
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableConnection<'a> {
    pub connection: &'a Connection,
    pub from: Position,
    pub to: Position,
}

/// Devices and connections of the current diagram
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    devices: BTreeMap<DeviceId, Device>,
    connections: Vec<Connection>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all contents
    ///
    /// Devices are keyed by id; a duplicate id keeps the last row. Connections
    /// are kept as-is, dangling ones included.
    pub fn load(&mut self, devices: Vec<Device>, connections: Vec<Connection>) {
        self.clear();
        for device in devices {
            if let Some(previous) = self.devices.insert(device.id, device) {
                tracing::warn!("Duplicate device id {} in load, keeping the last row", previous.id);
            }
        }
        self.connections = connections;
    }

    pub fn clear(&mut self) {
        self.devices.clear();
        self.connections.clear();
    }

    /// Insert or replace a device locally, without a network call
    pub fn upsert_local(&mut self, device: Device) {
        self.devices.insert(device.id, device);
    }

    /// Move a device locally
    pub fn set_position(&mut self, id: DeviceId, position: Position) -> EditorResult<()> {
        let device = self
            .devices
            .get_mut(&id)
            .ok_or(EditorError::DeviceNotFound(id))?;
        device.set_position(position);
        Ok(())
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.contains_key(&id)
    }

    /// Devices in id order
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// All loaded connections, including dangling ones
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.connections.is_empty()
    }

    /// Connections whose endpoints are both loaded; the rest are skipped
    pub fn renderable_connections(&self) -> Vec<RenderableConnection<'_>> {
        self.connections
            .iter()
            .filter_map(|connection| {
                let from = self.devices.get(&connection.from_device_id)?;
                let to = self.devices.get(&connection.to_device_id)?;
                Some(RenderableConnection {
                    connection,
                    from: from.position(),
                    to: to.position(),
                })
            })
            .collect()
    }

    /// Connections touching a device
    pub fn connections_of(&self, id: DeviceId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.involves(id))
    }
}
