//! LED Toggle Plugin Implementation

use bevy::prelude::*;

use crate::client::LedToggleClient;
use crate::config::LedClientConfig;
use crate::led_bevy::systems::*;
use crate::socket::LedSocket;

/// Bevy plugin for the LED toggle panel.
///
/// This plugin:
/// - Opens the device connection while the app is built
/// - Spawns the status text and toggle button at startup
/// - Feeds socket events and button presses to the client each frame
/// - Closes the connection on `AppExit`
///
/// ## Usage
///
/// ```ignore
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(LedTogglePlugin::new(LedClientConfig::from_env()))
///     .run();
/// ```
pub struct LedTogglePlugin {
    config: LedClientConfig,
}

impl LedTogglePlugin {
    pub fn new(config: LedClientConfig) -> Self {
        Self { config }
    }
}

impl Default for LedTogglePlugin {
    fn default() -> Self {
        Self::new(LedClientConfig::default())
    }
}

impl Plugin for LedTogglePlugin {
    fn build(&self, app: &mut App) {
        log::info!("Building LED toggle plugin for {}", self.config.endpoint);

        match LedSocket::connect(&self.config) {
            Ok((socket, receiver)) => {
                let client = LedToggleClient::new(socket, self.config.status_policy);
                app.insert_resource(LedClientResource(client));
                app.insert_resource(LedEventReceiver(receiver));
            }
            Err(e) => {
                // The panel still renders; it just never receives a status
                log::error!("LED connection unavailable: {}", e);
            }
        }

        app.add_systems(Startup, spawn_led_panel)
            .add_systems(Update, (process_socket_events, handle_control_button))
            .add_systems(Last, close_on_exit);

        log::info!("LED toggle plugin configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::test_support::{CLOSE_FRAME, WAIT, recording_device, start_server, wait_until};
    use crate::socket::{ReadyState, Transport};
    use std::sync::mpsc;
    use std::time::Duration;

    fn build_app(config: LedClientConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(LedTogglePlugin::new(config));
        app
    }

    fn status_texts(app: &mut App) -> Vec<String> {
        let mut query = app
            .world_mut()
            .query_filtered::<&Text, With<LedStatusText>>();
        query.iter(app.world()).map(|text| text.0.clone()).collect()
    }

    fn control_button(app: &mut App) -> Entity {
        let mut query = app
            .world_mut()
            .query_filtered::<Entity, With<LedControlButton>>();
        query.single(app.world()).unwrap()
    }

    fn ready_state(app: &App) -> ReadyState {
        app.world()
            .resource::<LedClientResource>()
            .0
            .transport()
            .ready_state()
    }

    /// Run frames until the status node shows `expected`
    fn update_until_status(app: &mut App, expected: &str) -> bool {
        wait_until(|| {
            app.update();
            status_texts(app) == vec![expected.to_string()]
        })
    }

    #[test]
    fn test_panel_spawns_without_connection() {
        let mut app = build_app(LedClientConfig::default().with_endpoint("not a url"));
        app.update();

        assert!(app.world().get_resource::<LedClientResource>().is_none());
        assert_eq!(status_texts(&mut app), vec![String::new()]);

        let mut buttons = app
            .world_mut()
            .query_filtered::<&Name, With<LedControlButton>>();
        let names: Vec<String> = buttons
            .iter(app.world())
            .map(|name| name.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["ledControlButton".to_string()]);
    }

    #[test]
    fn test_failed_connection_leaves_status_blank() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut app = build_app(
            LedClientConfig::default().with_endpoint(format!("ws://127.0.0.1:{}/wsled", port)),
        );

        assert!(wait_until(|| {
            app.update();
            ready_state(&app) == ReadyState::Closed
        }));
        // One more frame drains the error/close events
        app.update();

        let client = app.world().resource::<LedClientResource>();
        assert_eq!(client.0.current_status(), "");
        assert!(!client.0.on_unload());
        assert_eq!(status_texts(&mut app), vec![String::new()]);
    }

    #[test]
    fn test_panel_round_trip_and_exit() {
        let (frames_tx, frames) = mpsc::channel::<String>();
        let (_rt, url) = start_server(move |ws| recording_device(ws, frames_tx));
        let mut app = build_app(LedClientConfig::default().with_endpoint(url));

        // Device report reaches the status node
        assert!(update_until_status(&mut app, "off"));

        // A press sends exactly one toggle request
        let button = control_button(&mut app);
        *app.world_mut().get_mut::<Interaction>(button).unwrap() = Interaction::Pressed;
        app.update();

        assert_eq!(frames.recv_timeout(WAIT).unwrap(), r#"{"state":"on"}"#);
        assert!(update_until_status(&mut app, "on"));
        assert!(frames.recv_timeout(Duration::from_millis(100)).is_err());

        // Exit closes the socket
        app.world_mut().write_message(AppExit::Success);
        app.update();

        assert!(matches!(
            ready_state(&app),
            ReadyState::Closing | ReadyState::Closed
        ));
        assert_eq!(frames.recv_timeout(WAIT).unwrap(), CLOSE_FRAME);

        // A second exit finds the socket closed and sends nothing
        app.world_mut().write_message(AppExit::Success);
        app.update();

        assert!(!app.world().resource::<LedClientResource>().0.transport().is_open());
        assert!(frames.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
