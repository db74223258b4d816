//! LED Toggle Bevy Plugin
//!
//! Renders the LED panel with Bevy UI and wires it to the device socket.

mod plugin;
mod systems;

pub use plugin::LedTogglePlugin;
pub use systems::*;
