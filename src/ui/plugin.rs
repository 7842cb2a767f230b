//! UI plugin - HUD and the pause overlay.

use bevy::prelude::*;

use super::hud;
use crate::core::{GameState, NeedKind};
use crate::inventory::{Inventory, KeyRing};
use crate::player::Player;
use crate::stats::Needs;
use crate::world::DayNightCycle;

const OVERLAY_TINT: Color = Color::srgba(0.02, 0.02, 0.05, 0.75);
const TEXT_COLOR: Color = Color::srgb(0.85, 0.82, 0.75);

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.add_systems(OnEnter(GameState::Paused), spawn_pause_overlay)
            .add_systems(Update, pause_overlay_buttons.run_if(in_state(GameState::Paused)))
            .add_systems(OnExit(GameState::Paused), despawn_pause_overlay);
    }
}

#[derive(Component)]
struct PauseOverlay;

#[derive(Component, Debug, Clone, Copy)]
enum PauseAction {
    Resume,
    Quit,
}

impl PauseAction {
    fn label(self) -> &'static str {
        match self {
            PauseAction::Resume => "Resume",
            PauseAction::Quit => "Quit",
        }
    }

    /// Background for each button interaction state.
    fn tint(interaction: Interaction) -> Color {
        match interaction {
            Interaction::Pressed => Color::srgb(0.35, 0.3, 0.22),
            Interaction::Hovered => Color::srgb(0.27, 0.23, 0.17),
            Interaction::None => Color::srgb(0.18, 0.15, 0.12),
        }
    }
}

/// Lines shown under the pause title: date, needs and carried load.
pub fn pause_summary(
    clock: Option<&DayNightCycle>,
    needs: Option<&Needs>,
    inventory: Option<&Inventory>,
    keys: Option<&KeyRing>,
) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(clock) = clock {
        lines.push(format!("Day {}, {}", clock.day(), clock.formatted_time()));
    }
    if let Some(needs) = needs {
        let hunger = needs.get(NeedKind::Hunger).percent() * 100.0;
        let thirst = needs.get(NeedKind::Thirst).percent() * 100.0;
        lines.push(format!("Hunger {:.0}%  Thirst {:.0}%", hunger, thirst));
    }
    match inventory {
        Some(inventory) if inventory.has_backpack() => lines.push(format!(
            "Pack {}/{} slots, {:.1}/{:.1} kg",
            inventory.used_slots(),
            inventory.used_slots() + inventory.free_slots(),
            inventory.current_weight(),
            inventory.weight_limit(),
        )),
        Some(_) => lines.push("No pack".to_string()),
        None => {}
    }
    if let Some(keys) = keys.filter(|keys| !keys.is_empty()) {
        lines.push(format!("Keys carried: {}", keys.len()));
    }
    lines
}

fn spawn_pause_overlay(
    mut commands: Commands,
    clock: Option<Res<DayNightCycle>>,
    players: Query<(&Needs, &Inventory, &KeyRing), With<Player>>,
) {
    let player = players.get_single().ok();
    let summary = pause_summary(
        clock.as_deref(),
        player.map(|(needs, _, _)| needs),
        player.map(|(_, inventory, _)| inventory),
        player.map(|(_, _, keys)| keys),
    );

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(OVERLAY_TINT),
            GlobalZIndex(10),
            PauseOverlay,
        ))
        .with_children(|overlay| {
            overlay.spawn((
                Text::new("Resting"),
                TextFont {
                    font_size: 44.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
            for line in summary {
                overlay.spawn((
                    Text::new(line),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR.with_alpha(0.8)),
                ));
            }
            overlay.spawn(Node {
                height: Val::Px(24.0),
                ..default()
            });
            for action in [PauseAction::Resume, PauseAction::Quit] {
                overlay
                    .spawn((
                        Button,
                        Node {
                            width: Val::Px(180.0),
                            padding: UiRect::axes(Val::Px(0.0), Val::Px(10.0)),
                            justify_content: JustifyContent::Center,
                            ..default()
                        },
                        BackgroundColor(PauseAction::tint(Interaction::None)),
                        action,
                    ))
                    .with_child((
                        Text::new(action.label()),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                    ));
            }
        });
}

fn pause_overlay_buttons(
    mut buttons: Query<(&Interaction, &PauseAction, &mut BackgroundColor), Changed<Interaction>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, action, mut background) in &mut buttons {
        background.0 = PauseAction::tint(*interaction);
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action {
            PauseAction::Resume => next_state.set(GameState::InGame),
            PauseAction::Quit => {
                exit.send(AppExit::Success);
            }
        }
    }
}

fn despawn_pause_overlay(mut commands: Commands, overlays: Query<Entity, With<PauseOverlay>>) {
    for entity in &overlays {
        commands.entity(entity).despawn_recursive();
    }
}
