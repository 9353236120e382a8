//! Platform-independent core of the Kathmandu trip planner client.
//!
//! The browser frontend supplies three things: a [`map::MapSurface`]
//! (Leaflet), a [`storage::KeyValueStore`] (Web Storage) and a
//! [`transport::Transport`] (HTTP). Everything else lives here, so the whole
//! client flow runs natively under `cargo test`.

pub mod commands;
pub mod controller;
pub mod errors;
pub mod map;
pub mod models;
pub mod sequencer;
pub mod session;
pub mod storage;
pub mod transport;
pub mod trip;
pub mod view;

pub use controller::Controller;
pub use errors::{ClientError, CommandError, StorageError};
pub use session::{ClientSession, ExecutionReport, ViewSnapshot};
