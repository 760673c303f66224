//! Rendering systems for the board.
//!
//! Uses Bevy's Gizmos API to draw every body from its geometry and fill
//! style each frame. Board coordinates grow downwards from the top-left
//! corner; Bevy world coordinates grow upwards from the window center.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::bevy::events::{BoardRebuiltEvent, ResizeBoardEvent};
use crate::bevy::{MainCamera, SessionRes, SlotHighlights, SlotLabelText};
use crate::board::RenderShape;
use crate::color::Color as BoardColor;
use crate::layout::{BoardConfig, RenderStyle};

/// Board point to Bevy world point.
pub fn board_to_world(config: &BoardConfig, point: [f32; 2]) -> Vec2 {
    Vec2::new(point[0] - config.width / 2.0, config.height / 2.0 - point[1])
}

/// Bevy world point to board point.
pub fn world_to_board(config: &BoardConfig, point: Vec2) -> [f32; 2] {
    [point.x + config.width / 2.0, config.height / 2.0 - point.y]
}

/// Converts a board color with an opacity to a Bevy color.
pub fn to_bevy_color(color: BoardColor, opacity: f32) -> Color {
    Color::srgba_u8(color.r, color.g, color.b, color.a).with_alpha(opacity.clamp(0.0, 1.0))
}

fn style_color(style: &RenderStyle) -> Color {
    to_bevy_color(style.fill, style.opacity)
}

/// Spawns the 2D camera.
pub fn setup_board_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera));
    tracing::info!("board camera spawned");
}

/// System to render every visible body using gizmos.
pub fn render_board(mut gizmos: Gizmos, session: Option<Res<SessionRes>>) {
    let Some(session) = session else {
        return;
    };
    let config = session.0.config();

    for item in session.0.render_items() {
        let color = style_color(&item.style);
        match &item.shape {
            RenderShape::Circle { center, radius } => {
                let pos = board_to_world(config, *center);
                gizmos.circle_2d(Isometry2d::from_translation(pos), *radius, color);
            }
            RenderShape::Rect { center, size } => {
                let pos = board_to_world(config, *center);
                gizmos.rect_2d(
                    Isometry2d::from_translation(pos),
                    Vec2::new(size[0], size[1]),
                    color,
                );
            }
            RenderShape::Polygon { points } => {
                let points: Vec<Vec2> = points.iter().map(|p| board_to_world(config, *p)).collect();
                for (i, start) in points.iter().enumerate() {
                    let end = points[(i + 1) % points.len()];
                    gizmos.line_2d(*start, end, color);
                }
            }
        }
    }
}

fn spawn_labels(commands: &mut Commands, session: &SessionRes) {
    let config = session.0.config();
    for label in session.0.labels() {
        let center = board_to_world(config, [label.center_x(), label.top + label.height / 2.0]);
        commands.spawn((
            SlotLabelText { slot: label.slot },
            Text2d::new(label.text),
            TextFont {
                font_size: label.font_size,
                ..default()
            },
            TextColor(Color::WHITE),
            Transform::from_translation(center.extend(1.0)),
        ));
    }
}

/// Spawns one text entity per slot label.
pub fn spawn_slot_labels(mut commands: Commands, session: Option<Res<SessionRes>>) {
    if let Some(session) = session {
        spawn_labels(&mut commands, &session);
    }
}

/// Respawns the slot labels after the board was rebuilt.
pub fn refresh_slot_labels(
    mut commands: Commands,
    mut events: MessageReader<BoardRebuiltEvent>,
    labels: Query<Entity, With<SlotLabelText>>,
    session: Option<Res<SessionRes>>,
) {
    if events.read().count() == 0 {
        return;
    }
    let Some(session) = session else {
        return;
    };
    for entity in &labels {
        commands.entity(entity).despawn();
    }
    spawn_labels(&mut commands, &session);
}

/// Tints the label of the selected slot.
pub fn update_slot_label_colors(
    highlights: Res<SlotHighlights>,
    mut labels: Query<(&SlotLabelText, &mut TextColor)>,
) {
    let selected = to_bevy_color(BoardColor::HIGHLIGHT, 1.0);
    for (label, mut color) in &mut labels {
        color.0 = if highlights.0.is_highlighted(label.slot) {
            selected
        } else {
            Color::WHITE
        };
    }
}

/// Grabs, drags and releases the disc with the left mouse button.
pub fn handle_pointer_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    session: Option<ResMut<SessionRes>>,
) {
    let Some(mut session) = session else {
        return;
    };
    if mouse_button.just_released(MouseButton::Left) {
        session.0.release();
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_position) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_position) else {
        return;
    };
    let point = world_to_board(session.0.config(), world_pos);

    if mouse_button.just_pressed(MouseButton::Left) {
        if session.0.grab(point) {
            tracing::debug!(?point, "disc grabbed");
        }
    } else if mouse_button.pressed(MouseButton::Left) {
        session.0.drag_to(point);
    }
}

/// Turns window resizes into board rebuild requests.
pub fn forward_window_resize(
    mut resized: MessageReader<WindowResized>,
    mut requests: MessageWriter<ResizeBoardEvent>,
) {
    if let Some(event) = resized.read().last() {
        requests.write(ResizeBoardEvent {
            width: event.width,
            height: event.height,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_world_mapping_roundtrips() {
        let config = BoardConfig::new(800.0, 600.0, 4).unwrap();

        assert_eq!(board_to_world(&config, [0.0, 0.0]), Vec2::new(-400.0, 300.0));
        assert_eq!(board_to_world(&config, [400.0, 300.0]), Vec2::ZERO);

        let point = [123.0, 456.0];
        assert_eq!(world_to_board(&config, board_to_world(&config, point)), point);
    }

    #[test]
    fn test_hidden_style_is_transparent() {
        let hidden = style_color(&RenderStyle::hidden(BoardColor::ORANGE));
        assert_eq!(hidden.alpha(), 0.0);

        let solid = style_color(&RenderStyle::solid(BoardColor::BOARD));
        assert_eq!(solid.alpha(), 1.0);
    }
}
