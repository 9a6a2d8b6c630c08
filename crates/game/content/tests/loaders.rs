//! Loading the shipped data directory and ad-hoc files.

use std::io::Write;
use std::path::PathBuf;

use effect_content::{ContentFactory, EffectLoader, WeaponLoader, standard_hooks};
use effect_core::{
    ApplyOptions, Combatant, EffectCatalog, EffectFlags, OwnerId, World, stat_tags,
};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn shipped_content_loads() {
    let factory = ContentFactory::new(data_dir());

    let config = factory.load_config().unwrap();
    assert_eq!(config.revive_delay, 30.0);

    let catalog = factory.load_effects(standard_hooks()).unwrap();
    assert!(catalog.contains("haste"));
    assert!(catalog.contains("thorns"));
    let thorns = catalog.definition("thorns").unwrap();
    assert!(thorns.flags.contains(EffectFlags::KEEP_ON_DEATH));
    assert!(thorns.is_infinite());

    let weapons = factory.load_weapons().unwrap();
    assert_eq!(weapons.get("repeater").unwrap().shots, 3);
    assert_eq!(weapons.get("flamer").unwrap().element, "fire");
}

#[test]
fn shipped_effects_modify_stats() {
    let factory = ContentFactory::new(data_dir());
    let catalog = factory.load_effects(standard_hooks()).unwrap();
    let mut world = World::builder()
        .config(factory.load_config().unwrap())
        .catalog(catalog)
        .build();
    let hero = OwnerId(1);
    world.spawn(hero, Combatant::new("hero", 30)).unwrap();

    world
        .apply_effect(hero, "haste", hero, ApplyOptions::stacks(2))
        .unwrap();
    // 10 base + 5 for the second stack.
    assert_eq!(world.check(hero, 40.0, stat_tags::ACCURACY, true), 55.0);

    world
        .apply_effect(hero, "stone_skin", hero, ApplyOptions::default())
        .unwrap();
    assert_eq!(world.check(hero, 8.0, stat_tags::INJURY, true), 6.0);
}

#[test]
fn shipped_modifiers_target_resolved_stats() {
    let resolved = [
        stat_tags::ACCURACY,
        stat_tags::PRECISION,
        stat_tags::DAMAGE,
        stat_tags::TOTAL_DAMAGE,
        stat_tags::INJURY,
    ];
    let catalog = ContentFactory::new(data_dir())
        .load_effects(standard_hooks())
        .unwrap();
    for key in catalog.keys() {
        let definition = catalog.definition(key).unwrap();
        for modifier in &definition.modifiers {
            assert!(
                resolved.contains(&modifier.stat.as_str()),
                "{key} modifies unread stat {}",
                modifier.stat
            );
        }
    }
}

#[test]
fn unbound_hook_ids_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("effects.ron");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"(effects: [(key: "glow", name: "Glow", duration: 5.0, hooks: Some("missing"))])"#
    )
    .unwrap();

    let mut catalog = EffectCatalog::new();
    let err = EffectLoader::load_into(&path, &mut catalog).unwrap_err();
    assert!(err.to_string().contains("missing"));
    assert!(catalog.is_empty());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weapons.ron");
    let err = WeaponLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("weapons.ron"));
}
