use bevy::prelude::*;
use bevy_led_toggle::{LedClientConfig, LedTogglePlugin};

fn main() {
    // Endpoint and options can be overridden with LED_TOGGLE_* variables
    let config = LedClientConfig::from_env();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "LED Control".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(LedTogglePlugin::new(config))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
