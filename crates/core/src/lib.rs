//! # Plano Core
//!
//! Core types, traits, and error handling for the plano editor.
//!
//! This crate provides the foundational building blocks used by every other
//! crate in the workspace, including:
//!
//! - **Types**: identifiers, geometry (`Position`, `Rect`, `Affine`) and the
//!   device/connection vocabularies
//! - **Traits**: `Validatable` for local checks before a request is issued
//! - **Errors**: unified error handling with `EditorError` and `EditorResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EditorError, EditorResult, ResultExt};
pub use traits::Validatable;
pub use types::{
    Affine, AttributeValue, ConnectionId, ConnectionType, DeviceId, DeviceStatus, DeviceType,
    Position, Rect, Size,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
