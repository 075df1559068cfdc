//! # UI Components
//!
//! Dioxus components of the plano editor window.
//!
//! ## Component Hierarchy
//!
//! ```text
//! DiagramView
//! ├── surface markup (floor plan SVG)
//! └── overlay SVG
//!     ├── LinkLine (multiple)
//!     └── DeviceMarker (multiple)
//!
//! DetailPanel
//! └── DeviceHeader
//!
//! DeviceForm
//! └── Input components
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod detail_panel;
pub mod device_form;
pub mod diagram;
pub mod inputs;

// ============================================================================
// Re-exports
// ============================================================================

pub use detail_panel::DetailPanel;
pub use device_form::{DeviceForm, DeviceFormValues};
pub use diagram::DiagramView;
pub use inputs::{Select, SelectOption, TextInput};
