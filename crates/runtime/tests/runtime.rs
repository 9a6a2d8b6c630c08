//! End-to-end runtime behavior through the async handle.

use std::time::Duration;

use effect_content::{ContentFactory, standard_hooks};
use effect_core::{
    ApplyOptions, Combatant, EffectCatalog, EffectDefinition, EventPayload, LifeState,
    Modifier, OwnerId, RemoveCause, SentMessage, SequenceRng, WeaponStats, World, stat_tags,
};
use effect_runtime::{FileAttributeStore, Runtime, RuntimeConfig, RuntimeError};

const HERO: OwnerId = OwnerId(1);
const FOE: OwnerId = OwnerId(2);

fn catalog() -> EffectCatalog {
    let mut catalog = EffectCatalog::new();
    catalog
        .register_all([
            EffectDefinition::new("focus", "Focus", 10.0)
                .unique()
                .modifier(Modifier::add(stat_tags::ACCURACY, 1000.0, 0.0)),
            EffectDefinition::new("rage", "Rage", 30.0)
                .stacking(3)
                .combat()
                .modifier(Modifier::multiply(stat_tags::DAMAGE, 0.5, 0.0)),
        ])
        .unwrap();
    catalog
}

#[tokio::test]
async fn commands_run_against_one_world() {
    let runtime = Runtime::builder()
        .catalog(catalog())
        .seed(7)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle.spawn(HERO, Combatant::new("hero", 20)).await.unwrap();
    handle.spawn(FOE, Combatant::new("foe", 20)).await.unwrap();

    let focus = handle
        .apply_effect(HERO, "focus", HERO, ApplyOptions::default())
        .await
        .unwrap();
    assert_eq!(focus.key, "focus");
    assert_eq!(
        handle.check(HERO, 5.0, stat_tags::ACCURACY, true).await.unwrap(),
        1005.0
    );

    let views = handle.view_effects(HERO).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].remaining, Some(10.0));

    handle.advance(11.0).await.unwrap();
    assert!(handle.view_effects(HERO).await.unwrap().is_empty());
    assert_eq!(handle.now().await.unwrap(), 11.0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn world_errors_surface_through_the_handle() {
    let runtime = Runtime::builder().catalog(catalog()).build().await.unwrap();
    let handle = runtime.handle();

    let err = handle
        .apply_effect(HERO, "focus", HERO, ApplyOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::World(_)));

    handle.spawn(HERO, Combatant::new("hero", 20)).await.unwrap();
    assert!(handle.spawn(HERO, Combatant::new("hero", 20)).await.is_err());
    assert!(
        handle
            .remove_effect(HERO, "focus", RemoveCause::Manual, false)
            .await
            .unwrap()
            .is_none()
    );

    assert!(matches!(
        handle.save().await,
        Err(RuntimeError::MissingRepository)
    ));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn events_and_messages_are_forwarded() {
    let runtime = Runtime::builder()
        .catalog(catalog())
        .seed(1)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut events = runtime.subscribe_events();
    let mut messages = runtime.subscribe_messages();

    handle.spawn(HERO, Combatant::new("hero", 20)).await.unwrap();
    handle.spawn(FOE, Combatant::new("foe", 5)).await.unwrap();
    handle
        .apply_effect(FOE, "rage", FOE, ApplyOptions::default())
        .await
        .unwrap();

    let report = handle.injure(FOE, 50.0, Some(HERO), None).await.unwrap().unwrap();
    assert!(report.killed);
    assert_eq!(report.taken, 5);

    let injury = events.recv().await.unwrap();
    assert_eq!(injury.name, "injury");
    assert!(injury.has_tag("neutral"));
    let death = events.recv().await.unwrap();
    assert_eq!(death.name, "death");

    assert_eq!(
        messages.recv().await.unwrap(),
        SentMessage::Direct {
            to: FOE,
            text: "You have died.".to_owned()
        }
    );
    assert!(matches!(
        messages.recv().await.unwrap(),
        SentMessage::Broadcast { origin, .. } if origin == FOE
    ));
    assert!(handle.view_effects(FOE).await.unwrap().is_empty());

    let envelope = handle
        .publish("rally", Some(HERO), EventPayload::Empty, vec!["rally".to_owned()])
        .await
        .unwrap();
    assert_eq!(events.recv().await.unwrap().id, envelope.id);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn weapon_attack_resolves_in_the_worker() {
    let runtime = Runtime::builder()
        .catalog(catalog())
        .seed(11)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.spawn(HERO, Combatant::new("hero", 50)).await.unwrap();
    handle.spawn(FOE, Combatant::new("foe", 50)).await.unwrap();
    handle
        .apply_effect(HERO, "focus", HERO, ApplyOptions::default())
        .await
        .unwrap();

    let weapon = WeaponStats::new("repeater", 4.0, 0.0).with_shots(3);
    let report = handle.weapon_attack(HERO, weapon, FOE).await.unwrap();
    assert_eq!(report.shots.len(), 3);
    assert_eq!(report.injury.defender, FOE);
    let taken = report.injury.taken;

    let foe = handle.combatant(FOE).await.unwrap().unwrap();
    assert_eq!(foe.hp, 50 - taken);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn hosts_a_prebuilt_world() {
    // Each shot: hit 90 against dodge 10, a crit at the default multiplier.
    let samples = [0.9, 0.0, 0.1, 0.0].repeat(3);
    let mut world = World::builder()
        .catalog(catalog())
        .rng(SequenceRng::new(samples))
        .build();
    world.spawn(HERO, Combatant::new("hero", 50)).unwrap();
    world.spawn(FOE, Combatant::new("foe", 50)).unwrap();

    let runtime = Runtime::builder().world(world).build().await.unwrap();
    let handle = runtime.handle();

    let weapon = WeaponStats::new("repeater", 4.0, 0.0).with_shots(3);
    let report = handle.weapon_attack(HERO, weapon, FOE).await.unwrap();
    assert_eq!(report.hits(), 3);
    assert_eq!(report.crits(), 3);
    assert_eq!(report.total, 24.0);
    assert_eq!(handle.combatant(FOE).await.unwrap().unwrap().hp, 26);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn save_and_load_across_runtimes() {
    let dir = tempfile::tempdir().unwrap();

    let runtime = Runtime::builder()
        .catalog(catalog())
        .repository(FileAttributeStore::in_dir(dir.path()).unwrap())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.spawn(HERO, Combatant::new("hero", 10)).await.unwrap();
    handle
        .apply_effect(HERO, "rage", HERO, ApplyOptions::stacks(2))
        .await
        .unwrap();
    handle.injure(HERO, 100.0, None, None).await.unwrap();
    handle.advance(4.0).await.unwrap();
    assert_eq!(handle.save().await.unwrap(), 1);
    runtime.shutdown().await.unwrap();

    let runtime = Runtime::builder()
        .catalog(catalog())
        .repository(FileAttributeStore::in_dir(dir.path()).unwrap())
        .load_on_start(true)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    assert_eq!(handle.now().await.unwrap(), 4.0);
    let hero = handle.combatant(HERO).await.unwrap().unwrap();
    assert_eq!(hero.life, LifeState::Dead);

    // The revive timer scheduled before the save still fires.
    handle.advance(30.0).await.unwrap();
    let hero = handle.combatant(HERO).await.unwrap().unwrap();
    assert_eq!(hero.life, LifeState::Alive);
    assert_eq!(hero.hp, 10);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn clock_worker_advances_virtual_time() {
    let config = RuntimeConfig {
        tick_interval: Some(Duration::from_millis(5)),
        time_scale: 100.0,
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .catalog(catalog())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.spawn(HERO, Combatant::new("hero", 10)).await.unwrap();
    handle
        .apply_effect(HERO, "focus", HERO, ApplyOptions::default())
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(handle.now().await.unwrap() > 10.2);
    assert!(handle.view_effects(HERO).await.unwrap().is_empty());
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn shipped_content_drives_the_runtime() {
    let factory = ContentFactory::new(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../game/content/data"),
    );
    let catalog = factory.load_effects(standard_hooks()).unwrap();
    let weapons = factory.load_weapons().unwrap();

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            engine: factory.load_config().unwrap(),
            ..RuntimeConfig::default()
        })
        .catalog(catalog)
        .seed(3)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut messages = handle.subscribe_messages();

    handle.spawn(HERO, Combatant::new("hero", 30)).await.unwrap();
    handle.spawn(FOE, Combatant::new("foe", 30)).await.unwrap();
    handle
        .apply_effect(HERO, "haste", HERO, ApplyOptions::default())
        .await
        .unwrap();
    assert_eq!(
        messages.recv().await.unwrap(),
        SentMessage::Direct {
            to: HERO,
            text: "You are affected by Haste.".to_owned()
        }
    );

    let pistol = weapons.get("pistol").unwrap().clone();
    let report = handle.weapon_attack(HERO, pistol, FOE).await.unwrap();
    assert_eq!(report.shots.len(), 1);
    runtime.shutdown().await.unwrap();
}
