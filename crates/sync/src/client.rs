//! The backend boundary
//!
//! Everything the editor knows about persistence goes through `SyncClient`.
//! Writes are fire-and-forget from the editor's point of view: the caller
//! issues one request and then reloads the whole diagram, so no method here
//! returns more than the backend strictly has to.

use std::future::Future;

use plano_core::DeviceId;
use plano_model::{Connection, Device, NewConnection, NewDevice, PlanoName};

use crate::error::SyncResult;

/// Remote store of devices, connections and floor-plan surfaces
pub trait SyncClient: Send + Sync {
    /// Fetch the floor-plan SVG markup for a plano
    fn fetch_surface(&self, plano: &PlanoName) -> impl Future<Output = SyncResult<String>> + Send;

    /// List the devices placed on a plano
    fn list_devices(
        &self,
        plano: &PlanoName,
    ) -> impl Future<Output = SyncResult<Vec<Device>>> + Send;

    /// List the connections of a plano
    fn list_connections(
        &self,
        plano: &PlanoName,
    ) -> impl Future<Output = SyncResult<Vec<Connection>>> + Send;

    /// Create a device, returning the id the backend assigned
    fn create_device(
        &self,
        device: &NewDevice,
    ) -> impl Future<Output = SyncResult<DeviceId>> + Send;

    /// Persist an existing device (position included)
    fn update_device(&self, device: &Device) -> impl Future<Output = SyncResult<()>> + Send;

    /// Delete a device; the backend drops its connections
    fn delete_device(&self, id: DeviceId) -> impl Future<Output = SyncResult<()>> + Send;

    /// Create a connection
    fn create_connection(
        &self,
        connection: &NewConnection,
    ) -> impl Future<Output = SyncResult<Connection>> + Send;
}
