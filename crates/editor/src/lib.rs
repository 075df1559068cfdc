//! # Plano Editor
//!
//! The interactive core of the floor-plan diagram editor, independent of any
//! rendering toolkit:
//!
//! - [`view`]: pan/zoom transform with clamped scale and anchored pan
//! - [`surface`] and [`mapper`]: floor-plan geometry and screen-to-diagram mapping
//! - [`store`]: devices and connections of the current diagram
//! - [`mode`] and [`controller`]: interaction modes and the intent transition table
//! - [`drag`]: live device drag with a single persistence call on release
//! - [`loader`]: ordered, generation-fenced diagram loads
//! - [`scene`]: render model for the UI
//! - [`editor`]: headless runner pairing a session with a `SyncClient`
//!
//! ## Example
//!
//! ```rust,ignore
//! use plano_editor::prelude::*;
//!
//! let mut editor = DiagramEditor::new(client, Session::default());
//! editor.open(PlanoName::new("planta-baja")?).await;
//! editor.dispatch(Intent::SelectDevice(7)).await;
//! editor.dispatch(Intent::BeginConnect).await;
//! editor.dispatch(Intent::ConfirmConnectTarget(9)).await;
//! ```

pub mod controller;
pub mod drag;
pub mod editor;
pub mod input;
pub mod loader;
pub mod mapper;
pub mod mode;
pub mod scene;
pub mod session;
pub mod store;
pub mod surface;
pub mod view;

pub use drag::{ActiveDrag, DragOutcome};
pub use editor::{DiagramEditor, perform_load, perform_mutation};
pub use input::PointerInput;
pub use loader::{DiagramLoader, DiagramSnapshot, LoadTicket, fetch_diagram};
pub use mapper::CoordinateMapper;
pub use mode::{Effect, Intent, InteractionMode, LoadRequest, Mutation};
pub use scene::{DEVICE_RADIUS, DeviceShape, LinkShape, Scene, SurfaceLayer};
pub use session::{LoadOutcome, Session, SessionOptions, StatusLevel, StatusMessage};
pub use store::{EntityStore, RenderableConnection};
pub use surface::{FloorPlanSurface, MountedSurface, RenderSurface};
pub use view::{MAX_SCALE, MIN_SCALE, PanAnchor, ViewTransform};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::editor::DiagramEditor;
    pub use crate::input::PointerInput;
    pub use crate::mode::{Effect, Intent, InteractionMode, Mutation};
    pub use crate::scene::Scene;
    pub use crate::session::{Session, SessionOptions, StatusLevel, StatusMessage};

    pub use plano_core::{ConnectionType, DeviceId, EditorError, EditorResult, Position};
    pub use plano_model::{DeviceDraft, PlanoName};
}
