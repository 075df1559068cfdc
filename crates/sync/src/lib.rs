//! # Plano Sync
//!
//! Backend synchronisation for the plano editor.
//!
//! - [`SyncClient`]: the boundary the editor depends on
//! - [`HttpSyncClient`]: REST client for the inventory backend
//! - [`MemorySyncClient`]: in-process backend with a request log

pub mod client;
pub mod error;
pub mod http;
pub mod memory;

pub use client::SyncClient;
pub use error::{SyncError, SyncResult};
pub use http::{DeviceUpdateMode, HttpClientConfig, HttpSyncClient};
pub use memory::{MemorySyncClient, Request, RequestLog};
