//! State-and-synchronization core for a live transit-dispatch dashboard.
//!
//! This crate is the shared application core: it owns all in-memory state,
//! consumes UI and transport events through a single `update` entry point,
//! and describes its side effects (persistence calls, durable snapshot
//! reads/writes, render requests) as capability operations executed by the
//! host shell. Rendering, routing, and transport mechanics live in the shell.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod capabilities;
pub mod event;
pub mod model;
pub mod notifications;
pub mod push;
pub mod route_tabs;
pub mod snapshot;
pub mod view;

pub use app::{App, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{Config, Model};

/// Retries after the initial attempt before a failed route-tab push is
/// abandoned. Tuned value carried over from the reference deployment.
pub const DEFAULT_PUSH_RETRIES: u32 = 2;

/// Notifications older than this are dropped by the expiry sweep.
pub const DEFAULT_NOTIFICATION_EXPIRY_MS: u64 = 8 * 60 * 60 * 1000;

/// Most recent search queries kept in the persisted snapshot.
pub const MAX_SAVED_SEARCH_QUERIES: usize = 10;

/// Key under which the UI-state snapshot lives in the shell's durable store.
pub const SNAPSHOT_STORAGE_KEY: &str = "dispatch-ui-state";
