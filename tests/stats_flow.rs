//! Stamina and needs driven through the scheduled systems.

mod common;

use bevy::prelude::*;
use common::*;
use hearthbound::core::{
    ConsumeItemRequest, NeedChanged, NeedCritical, NeedDepleted, NeedKind, StaminaChanged,
    StaminaDepleted, StaminaRecovered,
};
use hearthbound::inventory::{Inventory, InventoryPlugin, ItemData, ItemKind};
use hearthbound::stats::{NeedConfig, Needs, NeedsConfig, Stamina, StaminaConfig, StaminaDrainReason, StatsPlugin};

fn stats_app() -> App {
    let mut app = headless_app();
    app.add_plugins((StatsPlugin, InventoryPlugin));
    record::<StaminaChanged>(&mut app);
    record::<StaminaDepleted>(&mut app);
    record::<StaminaRecovered>(&mut app);
    record::<NeedChanged>(&mut app);
    record::<NeedCritical>(&mut app);
    record::<NeedDepleted>(&mut app);
    app
}

#[test]
fn spending_stamina_waits_out_the_usage_delay() {
    let mut app = stats_app();
    let runner = app.world_mut().spawn(Stamina::default()).id();

    app.world_mut()
        .get_mut::<Stamina>(runner)
        .unwrap()
        .consume(30.0, StaminaDrainReason::Custom);
    step(&mut app, 0.1);

    let changed = recorded::<StaminaChanged>(&app);
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].entity, runner);
    assert_eq!(changed[0].current, 70.0);
    assert_eq!(changed[0].max, 100.0);

    // 2.5 s usage delay
    run_for(&mut app, 20, 0.1);
    let stamina = app.world().get::<Stamina>(runner).unwrap();
    assert_eq!(stamina.current(), 70.0);
    assert!(!stamina.is_regenerating());

    run_for(&mut app, 10, 0.1);
    let stamina = app.world().get::<Stamina>(runner).unwrap();
    assert!(stamina.is_regenerating());
    assert!(stamina.current() > 70.0);
}

#[test]
fn sprinting_to_empty_exhausts_once_and_recovers_past_the_band() {
    let mut app = stats_app();
    let config = StaminaConfig {
        max_stamina: 10.0,
        sprint_drain_rate: 50.0,
        regen_rate_idle: 10.0,
        regen_delay_after_depletion: 1.0,
        ..default()
    };
    let runner = app.world_mut().spawn(Stamina::new(&config)).id();

    app.world_mut()
        .get_mut::<Stamina>(runner)
        .unwrap()
        .start_drain(config.sprint_drain_rate);
    run_for(&mut app, 5, 0.1);

    {
        let stamina = app.world().get::<Stamina>(runner).unwrap();
        assert_eq!(stamina.current(), 0.0);
        assert!(stamina.is_exhausted());
        assert!(!stamina.is_draining());
        assert!(!stamina.can_sprint());
    }
    assert_eq!(recorded::<StaminaDepleted>(&app).len(), 1);

    // Rest of the 1 s delay, then half-rate regen of 5/s until above half
    run_for(&mut app, 10, 0.1);
    assert!(recorded::<StaminaRecovered>(&app).is_empty());
    assert!(app.world().get::<Stamina>(runner).unwrap().is_exhausted());
    run_for(&mut app, 20, 0.1);

    assert_eq!(recorded::<StaminaRecovered>(&app).len(), 1);
    assert_eq!(recorded::<StaminaDepleted>(&app).len(), 1);
    assert!(app.world().get::<Stamina>(runner).unwrap().can_sprint());
}

#[test]
fn hunger_turns_critical_then_depleted_once_each() {
    let mut app = stats_app();
    let needs = Needs::new(&NeedsConfig {
        hunger: NeedConfig::hunger(),
        thirst: NeedConfig {
            decay_amount: 0.0,
            ..NeedConfig::thirst()
        },
    });
    let survivor = app.world_mut().spawn(needs).id();

    // 80 decay ticks of 1 every 5 s
    run_for(&mut app, 80, 5.0);
    let hunger = app.world().get::<Needs>(survivor).unwrap().hunger.current();
    assert!((hunger - 20.0).abs() < 1e-3);

    let critical = recorded::<NeedCritical>(&app);
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].need, NeedKind::Hunger);
    assert!((critical[0].percent - 0.2).abs() < 1e-4);

    run_for(&mut app, 20, 5.0);
    let needs = app.world().get::<Needs>(survivor).unwrap();
    assert_eq!(needs.hunger.current(), 0.0);
    assert!(!needs.hunger.is_critical());
    assert!(needs.hunger.is_depleted());
    assert_eq!(needs.thirst.current(), needs.thirst.max());

    let depleted = recorded::<NeedDepleted>(&app);
    assert_eq!(depleted.len(), 1);
    assert_eq!(depleted[0].need, NeedKind::Hunger);
    assert_eq!(recorded::<NeedCritical>(&app).len(), 1);
}

#[test]
fn eating_restores_hunger_and_removes_the_item() {
    let mut app = stats_app();
    let mut inventory = Inventory::with_backpack(4, 10.0);
    inventory.add_item(ItemData::new("apple", ItemKind::Food, "Apple").with_restore(15.0, 5.0));
    inventory.add_item(ItemData::new("journal", ItemKind::Document, "Journal"));

    let mut needs = Needs::default();
    needs.hunger.set(50.0);
    needs.thirst.set(50.0);
    let survivor = app.world_mut().spawn((inventory, needs)).id();
    step(&mut app, 0.01);
    clear::<NeedChanged>(&mut app);

    send(&mut app, ConsumeItemRequest { owner: survivor, item_id: "apple".into() });
    send(&mut app, ConsumeItemRequest { owner: survivor, item_id: "journal".into() });
    step(&mut app, 0.01);

    let needs = app.world().get::<Needs>(survivor).unwrap();
    assert_eq!(needs.hunger.current(), 65.0);
    assert_eq!(needs.thirst.current(), 55.0);

    let inventory = app.world().get::<Inventory>(survivor).unwrap();
    assert!(!inventory.has_item("apple"));
    assert!(inventory.has_item("journal"));

    let kinds: Vec<_> = recorded::<NeedChanged>(&app).iter().map(|e| e.need).collect();
    assert_eq!(kinds, vec![NeedKind::Hunger, NeedKind::Thirst]);
}
