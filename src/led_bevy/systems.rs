use bevy::prelude::*;

use crate::client::{LedToggleClient, StatusDisplay};
use crate::socket::{LedSocket, SocketEventReceiver};

const BUTTON_IDLE: Color = Color::srgb(0.18, 0.18, 0.22);
const BUTTON_HOVERED: Color = Color::srgb(0.26, 0.26, 0.32);
const BUTTON_PRESSED: Color = Color::srgb(0.35, 0.55, 0.35);

/// Marker for the text node showing the LED status (`ledStatus`)
#[derive(Component)]
pub struct LedStatusText;

/// Marker for the toggle button (`ledControlButton`)
#[derive(Component)]
pub struct LedControlButton;

#[derive(Resource)]
pub struct LedClientResource(pub LedToggleClient<LedSocket>);

#[derive(Resource)]
pub struct LedEventReceiver(pub SocketEventReceiver);

/// Latest status shown during one frame's event pump
#[derive(Default)]
struct PendingStatus(Option<String>);

impl StatusDisplay for PendingStatus {
    fn show_status(&mut self, status: &str) {
        self.0 = Some(status.to_string());
    }
}

/// Spawn the status text and the toggle button
pub fn spawn_led_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            Name::new("ledPanel"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont::from_font_size(48.0),
                LedStatusText,
                Name::new("ledStatus"),
            ));

            parent
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(24.0), Val::Px(12.0)),
                        ..default()
                    },
                    BackgroundColor(BUTTON_IDLE),
                    LedControlButton,
                    Name::new("ledControlButton"),
                ))
                .with_children(|button| {
                    button.spawn(Text::new("Toggle LED"));
                });
        });

    log::info!("Spawned LED panel");
}

/// Drain socket events into the client
pub fn process_socket_events(
    receiver: Option<Res<LedEventReceiver>>,
    client: Option<ResMut<LedClientResource>>,
    mut status_text: Query<&mut Text, With<LedStatusText>>,
) {
    let (Some(receiver), Some(mut client)) = (receiver, client) else {
        return;
    };

    let mut pending = PendingStatus::default();
    while let Some(event) = receiver.0.try_recv() {
        log::debug!("Processing socket event: {:?}", event);
        client.0.handle_event(event, &mut pending);
    }

    if let Some(status) = pending.0 {
        for mut text in &mut status_text {
            text.0 = status.clone();
        }
    }
}

/// Send a toggle request when the control button is pressed
pub fn handle_control_button(
    mut query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<LedControlButton>),
    >,
    client: Option<Res<LedClientResource>>,
) {
    for (interaction, mut background) in &mut query {
        background.0 = match *interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        };

        if *interaction != Interaction::Pressed {
            continue;
        }

        match client {
            Some(ref client) => client.0.on_click(),
            None => log::warn!("Toggle ignored: no LED connection"),
        }
    }
}

/// Close the socket when the app is shutting down
pub fn close_on_exit(mut exits: MessageReader<AppExit>, client: Option<Res<LedClientResource>>) {
    if exits.read().next().is_none() {
        return;
    }

    if let Some(client) = client {
        client.0.on_unload();
    }
}
