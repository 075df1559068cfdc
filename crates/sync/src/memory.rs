//! In-process `SyncClient`
//!
//! `MemorySyncClient` keeps devices, connections and surfaces in memory and
//! behaves like the inventory backend (per-plano scoping, cascade on delete,
//! legacy type checks). Every call is appended to a `RequestLog`, so callers
//! can assert exactly which requests an interaction produced.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use plano_core::{ConnectionId, DeviceId, Position};
use plano_model::{Connection, Device, NewConnection, NewDevice, PlanoName, is_creatable};

use crate::client::SyncClient;
use crate::error::{SyncError, SyncResult};

// ============================================================================
// Request Log
// ============================================================================

/// One request received by the in-memory backend
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    FetchSurface(String),
    ListDevices(String),
    ListConnections(String),
    CreateDevice(NewDevice),
    UpdateDevice { id: DeviceId, position: Position },
    DeleteDevice(DeviceId),
    CreateConnection(NewConnection),
}

impl Request {
    /// Whether the request changes backend state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Request::CreateDevice(_)
                | Request::UpdateDevice { .. }
                | Request::DeleteDevice(_)
                | Request::CreateConnection(_)
        )
    }
}

/// Ordered record of the requests received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestLog {
    requests: Vec<Request>,
}

impl RequestLog {
    /// All requests in arrival order
    pub fn all(&self) -> &[Request] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Requests that change backend state
    pub fn mutations(&self) -> Vec<&Request> {
        self.requests.iter().filter(|r| r.is_mutation()).collect()
    }

    /// Number of complete diagram loads (surface fetches)
    pub fn reloads(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| matches!(r, Request::FetchSurface(_)))
            .count()
    }

    /// Position updates sent for a device
    pub fn updates_for(&self, id: DeviceId) -> Vec<Position> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                Request::UpdateDevice { id: updated, position } if *updated == id => {
                    Some(*position)
                }
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// Backend State
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    surfaces: HashMap<String, String>,
    devices: BTreeMap<DeviceId, Device>,
    connections: Vec<Connection>,
    next_device_id: DeviceId,
    next_connection_id: ConnectionId,
    log: RequestLog,
    offline: bool,
    reject_next: Option<String>,
}

impl MemoryState {
    fn record(&mut self, request: Request) -> SyncResult<()> {
        let mutation = request.is_mutation();
        self.log.requests.push(request);

        if self.offline {
            return Err(SyncError::Api {
                status: 503,
                message: "Backend unavailable".to_string(),
            });
        }
        if mutation {
            if let Some(message) = self.reject_next.take() {
                return Err(SyncError::Backend(message));
            }
        }
        Ok(())
    }

    fn device_in_plano(&self, id: DeviceId, plano: &str) -> bool {
        self.devices
            .get(&id)
            .is_some_and(|d| d.plano.as_deref() == Some(plano))
    }
}

// ============================================================================
// Memory Client
// ============================================================================

/// In-memory stand-in for the inventory backend
///
/// Clones share the same state, so a test can keep one handle for inspection
/// while the editor owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySyncClient {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySyncClient {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ========================================================================
    // Seeding
    // ========================================================================

    /// Register the floor-plan markup for a plano
    pub fn with_surface(self, plano: impl Into<String>, svg: impl Into<String>) -> Self {
        self.lock().surfaces.insert(plano.into(), svg.into());
        self
    }

    /// Insert a device as-is, keeping its id
    pub fn with_device(self, device: Device) -> Self {
        {
            let mut state = self.lock();
            state.next_device_id = state.next_device_id.max(device.id);
            state.devices.insert(device.id, device);
        }
        self
    }

    /// Insert a connection, assigning an id when it has none
    pub fn with_connection(self, mut connection: Connection) -> Self {
        {
            let mut state = self.lock();
            match connection.id {
                Some(id) => state.next_connection_id = state.next_connection_id.max(id),
                None => {
                    state.next_connection_id += 1;
                    connection.id = Some(state.next_connection_id);
                }
            }
            state.connections.push(connection);
        }
        self
    }

    // ========================================================================
    // Failure injection
    // ========================================================================

    /// Make every subsequent request fail with a 503
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Reject the next mutating request with an in-band backend error
    pub fn reject_next_mutation(&self, message: impl Into<String>) {
        self.lock().reject_next = Some(message.into());
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Snapshot of the request log
    pub fn requests(&self) -> RequestLog {
        self.lock().log.clone()
    }

    /// Forget all recorded requests
    pub fn clear_requests(&self) {
        self.lock().log = RequestLog::default();
    }

    /// Stored copy of a device
    pub fn device(&self, id: DeviceId) -> Option<Device> {
        self.lock().devices.get(&id).cloned()
    }

    /// Number of stored devices across all planos
    pub fn device_count(&self) -> usize {
        self.lock().devices.len()
    }

    /// All stored connections across all planos
    pub fn connections(&self) -> Vec<Connection> {
        self.lock().connections.clone()
    }
}

impl SyncClient for MemorySyncClient {
    async fn fetch_surface(&self, plano: &PlanoName) -> SyncResult<String> {
        let mut state = self.lock();
        state.record(Request::FetchSurface(plano.to_string()))?;
        state
            .surfaces
            .get(plano.as_str())
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("Floor plan '{}'", plano)))
    }

    async fn list_devices(&self, plano: &PlanoName) -> SyncResult<Vec<Device>> {
        let mut state = self.lock();
        state.record(Request::ListDevices(plano.to_string()))?;
        Ok(state
            .devices
            .values()
            .filter(|d| d.plano.as_deref() == Some(plano.as_str()))
            .cloned()
            .collect())
    }

    async fn list_connections(&self, plano: &PlanoName) -> SyncResult<Vec<Connection>> {
        let mut state = self.lock();
        state.record(Request::ListConnections(plano.to_string()))?;
        Ok(state
            .connections
            .iter()
            .filter(|c| {
                state.device_in_plano(c.from_device_id, plano.as_str())
                    || state.device_in_plano(c.to_device_id, plano.as_str())
            })
            .cloned()
            .collect())
    }

    async fn create_device(&self, device: &NewDevice) -> SyncResult<DeviceId> {
        let mut state = self.lock();
        state.record(Request::CreateDevice(device.clone()))?;

        if !is_creatable(&device.device_type) {
            return Err(SyncError::Backend(format!(
                "Unsupported device type: {}",
                device.device_type
            )));
        }
        state.next_device_id += 1;
        let id = state.next_device_id;
        state.devices.insert(id, device.clone().into_device(id));
        Ok(id)
    }

    async fn update_device(&self, device: &Device) -> SyncResult<()> {
        let mut state = self.lock();
        state.record(Request::UpdateDevice {
            id: device.id,
            position: device.position(),
        })?;

        match state.devices.get_mut(&device.id) {
            Some(stored) => {
                *stored = device.clone();
                Ok(())
            }
            None => Err(SyncError::NotFound(format!("Device {}", device.id))),
        }
    }

    async fn delete_device(&self, id: DeviceId) -> SyncResult<()> {
        let mut state = self.lock();
        state.record(Request::DeleteDevice(id))?;

        if state.devices.remove(&id).is_none() {
            return Err(SyncError::NotFound(format!("Device {}", id)));
        }
        state.connections.retain(|c| !c.involves(id));
        Ok(())
    }

    async fn create_connection(&self, connection: &NewConnection) -> SyncResult<Connection> {
        let mut state = self.lock();
        state.record(Request::CreateConnection(connection.clone()))?;

        if connection.from_device_id == connection.to_device_id {
            return Err(SyncError::Backend(
                "CHECK constraint failed: no_self_connection".to_string(),
            ));
        }
        for endpoint in [connection.from_device_id, connection.to_device_id] {
            if !state.devices.contains_key(&endpoint) {
                return Err(SyncError::Backend(format!(
                    "FOREIGN KEY constraint failed: device {}",
                    endpoint
                )));
            }
        }

        state.next_connection_id += 1;
        let created = connection
            .clone()
            .into_connection(Some(state.next_connection_id));
        state.connections.push(created.clone());
        Ok(created)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use plano_core::{ConnectionType, DeviceType};
    use plano_model::DeviceDraft;

    fn plano(name: &str) -> PlanoName {
        PlanoName::new(name).unwrap()
    }

    fn backend() -> MemorySyncClient {
        MemorySyncClient::new()
            .with_surface("planta", "<svg viewBox=\"0 0 100 100\"></svg>")
            .with_device(Device::new(1, "a", Position::new(10.0, 10.0)).in_plano("planta"))
            .with_device(Device::new(2, "b", Position::new(50.0, 50.0)).in_plano("planta"))
            .with_device(Device::new(3, "c", Position::new(5.0, 5.0)).in_plano("otro"))
            .with_connection(Connection::new(1, 2))
    }

    #[tokio::test]
    async fn test_lists_are_scoped_by_plano() {
        let client = backend();
        let devices = client.list_devices(&plano("planta")).await.unwrap();
        assert_eq!(devices.len(), 2);
        let connections = client.list_connections(&plano("planta")).await.unwrap();
        assert_eq!(connections.len(), 1);
        assert!(client.list_connections(&plano("otro")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_surface() {
        let client = backend();
        let err = client.fetch_surface(&plano("sotano")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let client = backend();
        let payload = DeviceDraft::new("nuevo", DeviceType::Pc)
            .place(Position::new(1.0, 2.0), &plano("planta"));
        let id = client.create_device(&payload).await.unwrap();
        assert_eq!(id, 4);
        assert_eq!(client.device(id).unwrap().plano.as_deref(), Some("planta"));

        let payload = DeviceDraft::new("sw", DeviceType::from("switch"))
            .place(Position::zero(), &plano("planta"));
        let err = client.create_device(&payload).await.unwrap_err();
        assert!(matches!(err, SyncError::Backend(_)));
        assert_eq!(client.device_count(), 4);
    }

    #[tokio::test]
    async fn test_delete_cascades_connections() {
        let client = backend();
        client.delete_device(2).await.unwrap();
        assert!(client.connections().is_empty());
        assert!(client.delete_device(2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_create_connection_checks_endpoints() {
        let client = backend();
        let ok = NewConnection::new(2, 3, ConnectionType::Fiber).unwrap();
        let created = client.create_connection(&ok).await.unwrap();
        assert_eq!(created.id, Some(2));

        let dangling = NewConnection::new(1, 99, ConnectionType::Ethernet).unwrap();
        assert!(client.create_connection(&dangling).await.is_err());
    }

    #[tokio::test]
    async fn test_request_log_and_failures() {
        let client = backend();
        let mut device = client.device(1).unwrap();
        device.set_position(Position::new(70.0, 80.0));
        client.update_device(&device).await.unwrap();

        client.reject_next_mutation("database is locked");
        assert!(client.update_device(&device).await.is_err());
        client.update_device(&device).await.unwrap();

        client.set_offline(true);
        assert!(client.list_devices(&plano("planta")).await.is_err());

        let log = client.requests();
        assert_eq!(log.len(), 4);
        assert_eq!(log.mutations().len(), 3);
        assert_eq!(log.updates_for(1), vec![Position::new(70.0, 80.0); 3]);

        client.clear_requests();
        assert!(client.requests().is_empty());
    }
}
