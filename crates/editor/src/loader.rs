//! Diagram loading
//!
//! A load fetches the floor plan first, then its devices, then its
//! connections, and hands the result back as one snapshot. Every load is
//! tagged with a ticket from a monotonic counter so the session can discard
//! results that were overtaken by a newer load.

use plano_core::{EditorError, EditorResult};
use plano_model::{Connection, Device, PlanoName};
use plano_sync::SyncClient;

use crate::surface::FloorPlanSurface;

/// Generation number of a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }

    /// The ticket issued after this one
    pub fn next(self) -> Self {
        LoadTicket(self.0 + 1)
    }
}

impl std::fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything needed to show one diagram
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSnapshot {
    pub plano: PlanoName,
    pub surface: FloorPlanSurface,
    pub devices: Vec<Device>,
    pub connections: Vec<Connection>,
}

/// Fetches diagrams through a `SyncClient`
#[derive(Debug)]
pub struct DiagramLoader<'a, C> {
    client: &'a C,
}

impl<'a, C: SyncClient> DiagramLoader<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetch the surface, devices and connections of a plano, in that order
    pub async fn fetch(&self, plano: &PlanoName) -> EditorResult<DiagramSnapshot> {
        let markup = self
            .client
            .fetch_surface(plano)
            .await
            .map_err(|e| e.into_editor_error(format!("load floor plan '{}'", plano)))?;
        let surface = FloorPlanSurface::parse(markup)?;

        let devices = self
            .client
            .list_devices(plano)
            .await
            .map_err(|e| e.into_editor_error("list devices"))?;

        let connections = self
            .client
            .list_connections(plano)
            .await
            .map_err(|e| e.into_editor_error("list connections"))?;

        tracing::debug!(
            "Fetched plano '{}': {} devices, {} connections",
            plano,
            devices.len(),
            connections.len()
        );

        Ok(DiagramSnapshot {
            plano: plano.clone(),
            surface,
            devices,
            connections,
        })
    }
}

/// Fetch a diagram, keeping the error for the session to report
pub async fn fetch_diagram<C: SyncClient>(
    client: &C,
    plano: &PlanoName,
) -> Result<DiagramSnapshot, EditorError> {
    DiagramLoader::new(client).fetch(plano).await
}
