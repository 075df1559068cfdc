//! # Plano Model
//!
//! Entities exchanged with the inventory backend:
//!
//! - **Devices**: `Device` as reported, `DeviceDraft` from the creation form,
//!   `NewDevice` as sent, and the per-type attribute models
//! - **Connections**: `Connection` and the `NewConnection` payload
//! - **Planos**: `PlanoName`, the validated diagram scope
//!
//! ## Example
//!
//! ```rust,ignore
//! use plano_model::prelude::*;
//!
//! let plano = PlanoName::new("planta-baja")?;
//! let payload = DeviceDraft::new("Recepcion-PC", DeviceType::Pc)
//!     .place(Position::new(120.0, 80.0), &plano);
//! payload.validate()?;
//! ```

pub mod connection;
pub mod device;
pub mod plano;
pub mod serialization;

pub use connection::{Connection, ConnectionKey, NewConnection};
pub use device::{
    CREATABLE_DEVICE_TYPES, Device, DeviceDraft, NewDevice, PcAttributes, TypeAttributes,
    attribute_keys, is_creatable,
};
pub use plano::PlanoName;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::connection::{Connection, ConnectionKey, NewConnection};
    pub use crate::device::{Device, DeviceDraft, NewDevice, PcAttributes, TypeAttributes};
    pub use crate::plano::PlanoName;

    pub use plano_core::{
        ConnectionType, DeviceId, DeviceStatus, DeviceType, EditorError, EditorResult, Position,
        Validatable,
    };
}
