//! # LED Toggle Panel for Bevy
//!
//! A Bevy UI panel that mirrors the state of a networked LED and toggles it over
//! a WebSocket. The device reports `{"status": "on" | "off"}`; clicking the
//! button sends `{"state": ...}` with the complement of the last report.
//!
//! ## Example
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_led_toggle::{LedClientConfig, LedTogglePlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(LedTogglePlugin::new(
//!             LedClientConfig::default().with_endpoint("ws://baobao.local/wsled"),
//!         ))
//!         .add_systems(Startup, |mut commands: Commands| {
//!             commands.spawn(Camera2d);
//!         })
//!         .run();
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod led_bevy;
pub mod protocol;
pub mod socket;

pub use client::{LedToggleClient, StatusDisplay};
pub use config::{LedClientConfig, StatusPolicy};
pub use error::{LedClientError, LedResult};
pub use led_bevy::LedTogglePlugin;
pub use protocol::{LedStatus, StatusReport, ToggleRequest};
pub use socket::{LedSocket, ReadyState, SocketEvent, SocketEventReceiver, Transport};
