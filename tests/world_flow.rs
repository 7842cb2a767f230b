//! Containers, the clock and the shipped data files.

mod common;

use bevy::prelude::*;
use common::*;
use hearthbound::core::{
    ClockEvent, ContainerEvent, ContainerSignal, GameplayConfig, InteractionCommand,
    TransferDirection, TransferRequest, GAMEPLAY_CONFIG_PATH,
};
use hearthbound::interaction::InteractionPlugin;
use hearthbound::inventory::{Inventory, InventoryPlugin, ItemData, ItemKind};
use hearthbound::stats::StatsPlugin;
use hearthbound::world::{
    Container, ContainerConfig, DayNightConfig, DayNightCycle, InteractableRegistry, WorldPlugin,
    INTERACTABLES_PATH,
};

fn world_app() -> App {
    let mut app = headless_app();
    app.add_plugins((StatsPlugin, InventoryPlugin, InteractionPlugin, WorldPlugin));
    record::<ContainerEvent>(&mut app);
    record::<ClockEvent>(&mut app);
    app
}

fn pantry() -> Container {
    Container::new(ContainerConfig {
        display_name: "Pantry".into(),
        capacity: 2,
        items: vec![
            ItemData::new("bread", ItemKind::Food, "Bread").with_weight(0.5),
            ItemData::new("anvil", ItemKind::Quest, "Anvil").with_weight(50.0),
        ],
        ..default()
    })
}

fn transfer(app: &mut App, owner: Entity, container: Entity, direction: TransferDirection, index: usize) {
    send(app, TransferRequest { owner, container, direction, index });
    step(app, 0.1);
}

#[test]
fn items_move_between_container_and_backpack() {
    let mut app = world_app();
    let survivor = spawn_survivor(&mut app, Vec3::ZERO);
    app.world_mut()
        .entity_mut(survivor)
        .insert(Inventory::with_backpack(3, 10.0));
    let container = app.world_mut().spawn(pantry()).id();

    send(&mut app, InteractionCommand::InteractWith { instigator: survivor, target: container });
    step(&mut app, 0.1);
    assert_eq!(
        app.world().get::<Container>(container).unwrap().opened_by(),
        Some(survivor)
    );

    transfer(&mut app, survivor, container, TransferDirection::Take, 0);
    assert!(app.world().get::<Inventory>(survivor).unwrap().has_item("bread"));
    assert_eq!(app.world().get::<Container>(container).unwrap().used_slots(), 1);

    // Too heavy: nothing moves
    transfer(&mut app, survivor, container, TransferDirection::Take, 0);
    assert_eq!(app.world().get::<Container>(container).unwrap().used_slots(), 1);
    assert_eq!(app.world().get::<Inventory>(survivor).unwrap().used_slots(), 1);

    transfer(&mut app, survivor, container, TransferDirection::Deposit, 0);
    assert_eq!(app.world().get::<Inventory>(survivor).unwrap().used_slots(), 0);
    assert_eq!(app.world().get::<Container>(container).unwrap().used_slots(), 2);

    // Container full: deposit refused
    app.world_mut()
        .get_mut::<Inventory>(survivor)
        .unwrap()
        .add_item(ItemData::new("apple", ItemKind::Food, "Apple").with_weight(0.3));
    transfer(&mut app, survivor, container, TransferDirection::Deposit, 0);
    assert!(app.world().get::<Inventory>(survivor).unwrap().has_item("apple"));

    send(&mut app, InteractionCommand::InteractWith { instigator: survivor, target: container });
    step(&mut app, 0.1);

    let signals: Vec<_> = recorded::<ContainerEvent>(&app)
        .into_iter()
        .map(|event| event.signal)
        .collect();
    assert_eq!(signals.first(), Some(&ContainerSignal::Opened { by: survivor }));
    assert_eq!(signals.last(), Some(&ContainerSignal::Closed));
    let removed = signals
        .iter()
        .filter(|signal| matches!(signal, ContainerSignal::ItemRemoved(_)))
        .count();
    let added = signals
        .iter()
        .filter(|signal| matches!(signal, ContainerSignal::ItemAdded(_)))
        .count();
    assert_eq!((removed, added), (1, 1));
}

#[test]
fn clock_crosses_into_night_and_the_next_day() {
    let mut app = world_app();
    app.insert_resource(DayNightCycle::new(DayNightConfig {
        starting_hour: 19.5,
        seconds_per_hour: 1.0,
        ..default()
    }));

    step(&mut app, 1.0);
    let night_edges: Vec<_> = recorded::<ClockEvent>(&app)
        .into_iter()
        .filter_map(|event| match event {
            ClockEvent::DayNightChanged { is_day } => Some(is_day),
            _ => None,
        })
        .collect();
    assert_eq!(night_edges, vec![true, false]);

    // 20:30 plus five hours rolls over midnight
    run_for(&mut app, 5, 1.0);
    let clock = app.world().resource::<DayNightCycle>();
    assert_eq!(clock.day(), 2);
    assert_eq!(clock.formatted_time(), "01:30");
    assert!(recorded::<ClockEvent>(&app)
        .iter()
        .any(|event| *event == ClockEvent::DayChanged { day: 2 }));
}

#[test]
fn shipped_gameplay_config_matches_defaults() {
    let config = GameplayConfig::load_from(GAMEPLAY_CONFIG_PATH).expect("gameplay.ron parses");
    let defaults = GameplayConfig::default();
    assert_eq!(config.stamina, defaults.stamina);
    assert_eq!(config.needs.thirst.decay_interval, 4.0);
    assert_eq!(config.interaction.distance, 300.0);
    assert_eq!(config.movement.exhausted_speed_multiplier, 0.7);
}

#[test]
fn every_shipped_placement_resolves() {
    let registry = InteractableRegistry::load(INTERACTABLES_PATH).expect("interactables.ron parses");
    assert_eq!(registry.placements().len(), 9);
    let pantry = registry.container("pantry").expect("pantry resolves");
    assert_eq!(pantry.items.len(), 4);
    assert_eq!(registry.item("cellar_key").unwrap().kind, ItemKind::Key);
}
