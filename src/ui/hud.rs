//! In-game HUD - survival bars, interaction prompt, clock and container panel.

use bevy::prelude::*;

use crate::core::{FocusChanged, FocusLost, GameState, PlayState, SurvivalSet};
use crate::interaction::{InteractionData, InteractionFocus};
use crate::inventory::Inventory;
use crate::player::Player;
use crate::stats::{Needs, Stamina};
use crate::world::{Container, DayNightCycle};

const BAR_BACKGROUND: Color = Color::srgb(0.1, 0.1, 0.1);
const LABEL_COLOR: Color = Color::srgb(0.8, 0.8, 0.8);

/// Marker for HUD root entities.
#[derive(Component)]
pub struct HudRoot;

/// Which player stat a bar fill tracks.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatBar {
    Stamina,
    Hunger,
    Thirst,
}

#[derive(Component)]
pub struct PromptText;

#[derive(Component)]
pub struct HoldProgressBar;

#[derive(Component)]
pub struct ClockText;

#[derive(Component)]
pub struct ContainerPanel;

#[derive(Component)]
pub struct ContainerPanelText;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    // Spawned once; pausing overlays the HUD instead of tearing it down
    app.add_systems(OnExit(GameState::Loading), spawn_hud)
        .add_systems(
            Update,
            (
                update_stat_bars,
                update_prompt,
                update_hold_progress,
                update_clock,
                update_container_panel,
            )
                .in_set(SurvivalSet::Presentation),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Survival bars (bottom-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_bar(parent, "Stamina", Color::srgb(0.2, 0.8, 0.3), StatBar::Stamina);
            spawn_bar(parent, "Hunger", Color::srgb(0.85, 0.55, 0.2), StatBar::Hunger);
            spawn_bar(parent, "Thirst", Color::srgb(0.25, 0.5, 0.9), StatBar::Thirst);
        });

    // Clock (top-right corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::End,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(LABEL_COLOR),
                ClockText,
            ));
        });

    // Crosshair with the prompt and hold progress underneath
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    margin: UiRect::bottom(Val::Px(24.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.9, 0.8)),
                PromptText,
            ));

            parent
                .spawn((
                    Node {
                        width: Val::Px(120.0),
                        height: Val::Px(6.0),
                        margin: UiRect::top(Val::Px(6.0)),
                        ..default()
                    },
                    BackgroundColor(BAR_BACKGROUND),
                    Visibility::Hidden,
                    HoldProgressBar,
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.95, 0.85, 0.5)),
                    ));
                });
        });

    // Container panel (right side), shown while a container is open
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(20.0),
                top: Val::Percent(25.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
            Visibility::Hidden,
            HudRoot,
            ContainerPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(LABEL_COLOR),
                ContainerPanelText,
            ));
        });
}

/// Helper to spawn a labelled status bar.
fn spawn_bar(parent: &mut ChildBuilder, label: &str, color: Color, stat: StatBar) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(LABEL_COLOR),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            row.spawn((
                Node {
                    width: Val::Px(150.0),
                    height: Val::Px(12.0),
                    ..default()
                },
                BackgroundColor(BAR_BACKGROUND),
            ))
            .with_children(|bg| {
                bg.spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(color),
                    stat,
                ));
            });
        });
}

/// Prompt line shown under the crosshair.
pub fn prompt_line(data: &InteractionData) -> String {
    let mut line = data.text.clone();
    if !data.secondary_text.is_empty() {
        line.push_str(&format!(" ({})", data.secondary_text));
    }
    if data.can_interact {
        if data.duration > 0.0 {
            line = format!("[Hold E] {line}");
        } else {
            line = format!("[E] {line}");
        }
    }
    line
}

/// Two-column listing of an open container and the player's bag.
pub fn container_listing(container: &Container, inventory: &Inventory) -> String {
    let mut text = format!(
        "{} ({}/{})\n",
        container.display_name(),
        container.used_slots(),
        container.capacity()
    );
    if container.items().is_empty() {
        text.push_str("  (empty)\n");
    }
    for (index, item) in container.items().iter().enumerate() {
        text.push_str(&format!("  {}. {}\n", index + 1, item.name));
    }

    match inventory.backpack() {
        Some(backpack) => {
            text.push_str(&format!(
                "\nBackpack ({}/{}, {:.1}/{:.1} kg)\n",
                inventory.used_slots(),
                backpack.slots,
                inventory.current_weight(),
                backpack.weight_limit
            ));
            for (index, item) in inventory.items().iter().enumerate() {
                text.push_str(&format!("  {}. {}\n", index + 1, item.name));
            }
        }
        None => text.push_str("\nNo backpack\n"),
    }

    text.push_str("\n1-9 take, Shift+1-9 deposit, E close");
    text
}

fn update_stat_bars(
    player_query: Query<(&Stamina, &Needs), With<Player>>,
    mut bars: Query<(&mut Node, &StatBar)>,
) {
    let Ok((stamina, needs)) = player_query.get_single() else {
        return;
    };

    for (mut node, stat) in bars.iter_mut() {
        let percent = match stat {
            StatBar::Stamina => stamina.percent(),
            StatBar::Hunger => needs.hunger.percent(),
            StatBar::Thirst => needs.thirst.percent(),
        };
        node.width = Val::Percent(percent * 100.0);
    }
}

/// Follow focus events for the player's prompt.
fn update_prompt(
    mut changed: EventReader<FocusChanged>,
    mut lost: EventReader<FocusLost>,
    players: Query<Entity, With<Player>>,
    mut prompt: Query<&mut Text, With<PromptText>>,
) {
    let Ok(player) = players.get_single() else {
        return;
    };
    let Ok(mut text) = prompt.get_single_mut() else {
        return;
    };

    // Lost always precedes a new focus within a frame
    if lost.read().any(|event| event.instigator == player) {
        text.0.clear();
    }
    if let Some(event) = changed.read().filter(|event| event.instigator == player).last() {
        text.0 = prompt_line(&event.data);
    }
}

fn update_hold_progress(
    players: Query<&InteractionFocus, With<Player>>,
    mut bar: Query<(&mut Visibility, &Children), With<HoldProgressBar>>,
    mut fills: Query<&mut Node>,
) {
    let Ok(focus) = players.get_single() else {
        return;
    };
    let Ok((mut visibility, children)) = bar.get_single_mut() else {
        return;
    };

    *visibility = if focus.is_holding() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for child in children.iter() {
        if let Ok(mut node) = fills.get_mut(*child) {
            node.width = Val::Percent(focus.hold_progress() * 100.0);
        }
    }
}

fn update_clock(clock: Res<DayNightCycle>, mut text: Query<&mut Text, With<ClockText>>) {
    let Ok(mut text) = text.get_single_mut() else {
        return;
    };
    let phase = if clock.is_day() { "Day" } else { "Night" };
    text.0 = format!("Day {} {} ({})", clock.day(), clock.formatted_time(), phase);
}

fn update_container_panel(
    play_state: Option<Res<State<PlayState>>>,
    players: Query<(Entity, &Inventory), With<Player>>,
    containers: Query<&Container>,
    mut panel: Query<&mut Visibility, With<ContainerPanel>>,
    mut text: Query<&mut Text, With<ContainerPanelText>>,
) {
    let Ok(mut visibility) = panel.get_single_mut() else {
        return;
    };
    let in_container = play_state.is_some_and(|state| *state.get() == PlayState::Container);
    let open = players.get_single().ok().and_then(|(player, inventory)| {
        containers
            .iter()
            .find(|container| container.opened_by() == Some(player))
            .map(|container| (container, inventory))
    });

    match open {
        Some((container, inventory)) if in_container => {
            *visibility = Visibility::Inherited;
            if let Ok(mut text) = text.get_single_mut() {
                text.0 = container_listing(container, inventory);
            }
        }
        _ => *visibility = Visibility::Hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{ItemData, ItemKind};
    use crate::world::ContainerConfig;

    #[test]
    fn prompt_marks_hold_and_blocked_interactions() {
        let open = InteractionData::new("Open Door");
        assert_eq!(prompt_line(&open), "[E] Open Door");

        let lever = InteractionData::new("Pull Lever").with_duration(1.5);
        assert_eq!(prompt_line(&lever), "[Hold E] Pull Lever");

        let locked = InteractionData::new("Locked")
            .with_secondary("Requires Cellar Key")
            .blocked();
        assert_eq!(prompt_line(&locked), "Locked (Requires Cellar Key)");
    }

    #[test]
    fn listing_numbers_both_sides() {
        let pantry = Container::new(ContainerConfig {
            display_name: "Pantry".into(),
            capacity: 4,
            items: vec![ItemData::new("apple", ItemKind::Food, "Apple")],
            ..default()
        });
        let mut bag = Inventory::with_backpack(6, 20.0);
        bag.add_item(ItemData::new("water", ItemKind::Beverage, "Water Flask").with_weight(1.0));

        let listing = container_listing(&pantry, &bag);
        assert!(listing.starts_with("Pantry (1/4)"));
        assert!(listing.contains("  1. Apple"));
        assert!(listing.contains("Backpack (1/6, 1.0/20.0 kg)"));
        assert!(listing.contains("  1. Water Flask"));

        let listing = container_listing(&pantry, &Inventory::default());
        assert!(listing.contains("No backpack"));
    }
}
