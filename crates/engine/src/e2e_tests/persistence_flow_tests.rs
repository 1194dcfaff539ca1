//! Save/load flows: a database survives a round trip, and loading an older
//! database only tops up the built-in defaults it lacks.

use std::sync::Arc;

use divscope_domain::{Comparator, EntityKind, Rank, Tier};

use super::{E2EContext, ROOT};
use crate::app::{App, Collaborators};
use crate::entities::GroupList;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::defaults::POWERS;
use crate::infrastructure::persistence::TextLabeledReader;
use crate::test_fixtures::PanicFatalSink;

#[test]
fn seeded_game_survives_a_round_trip() {
    let mut ctx = E2EContext::seeded();
    let ops = ctx
        .app
        .use_cases
        .divisions
        .create(&mut ctx.app.space, ROOT, "Ops")
        .unwrap();
    let player = ctx.player_in(10, Some(ops));
    ctx.app
        .space
        .set_rank(player, Rank::new(12, Rank::MAX_LEVEL).unwrap());
    let sword = ctx.object(50, EntityKind::Thing, player);
    ctx.app
        .use_cases
        .groups
        .assign(&mut ctx.app.space, ROOT, player, "Royalty", true)
        .unwrap();
    ctx.app
        .use_cases
        .powers
        .register(&mut ctx.app.space, ROOT, "Gardening", Comparator::LevelCheck)
        .unwrap();
    ctx.force_tier(player, "Gardening", Tier::YesLt);

    let (loaded, report, added) = ctx.reload();
    assert!(report.had_power_section);
    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    assert_eq!(report.powers, POWERS.len() + 1);
    assert!(added.is_empty(), "{:?}", added);

    let space = &loaded.app.space;
    assert_eq!(space.division_of(player), Some(ops));
    assert_eq!(space.rank_of(player).value(), 12);
    assert_eq!(space.division_of(sword), Some(ops));
    assert_eq!(space.rank_of(sword).value(), 12);
    assert_eq!(space.groups_of(player), ctx.app.space.groups_of(player));
    assert_eq!(loaded.tier(player, "Boot"), Tier::Yes);
    assert_eq!(loaded.tier(player, "Gardening"), Tier::YesLt);
    assert_eq!(space.power("long_fingers").unwrap().name, "Remote");
    assert_eq!(
        space.power("Gardening").unwrap().comparator,
        Comparator::LevelCheck
    );

    let queries = &loaded.app.use_cases.queries;
    assert_eq!(
        queries.entity_summary(space, player),
        ctx.app.use_cases.queries.entity_summary(&ctx.app.space, player)
    );
    assert_eq!(
        queries.group_summary(space, "Director").unwrap(),
        ctx.app
            .use_cases
            .queries
            .group_summary(&ctx.app.space, "Director")
            .unwrap()
    );
}

#[test]
fn older_database_gains_missing_defaults_only() {
    let mut ctx = E2EContext::bare();
    let boot = ctx
        .app
        .space
        .register_power("Boot", Comparator::LevelSet)
        .unwrap();
    let wizard = ctx.app.space.create_group("Wizard").unwrap();
    ctx.app
        .space
        .write_group_tier(&wizard, &boot, GroupList::Ceiling, Tier::YesLt);

    let (loaded, report, added) = ctx.reload();
    assert_eq!(report.powers, 1);
    assert_eq!(report.groups, 1);
    assert!(!added.powers.contains(&"Boot".to_string()));
    assert_eq!(added.powers.len(), POWERS.len() - 1);
    assert!(!added.groups.contains(&"Wizard".to_string()));
    assert!(added.groups.contains(&"Royalty".to_string()));

    let space = &loaded.app.space;
    let boot = space.power("Boot").cloned().unwrap();
    assert_eq!(boot.comparator, Comparator::LevelSet);
    assert_eq!(
        space.group_tier(&wizard, &boot, GroupList::Ceiling),
        Tier::YesLt
    );
    let nuke = space.power("Nuke").cloned().unwrap();
    assert_eq!(space.group_tier(&wizard, &nuke, GroupList::Ceiling), Tier::No);
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("powers.db");

    let mut ctx = E2EContext::seeded();
    let player = ctx.player_in(10, None);
    ctx.force_tier(player, "Hide", Tier::Yes);
    ctx.app.save_file(&path).unwrap();

    let collaborators = Collaborators {
        fatal: Arc::new(PanicFatalSink),
        ..Collaborators::with_log_sinks(ctx.world.clone(), ctx.world.clone())
    };
    let (app, report, added) =
        App::load_file(EngineConfig::default(), collaborators, &path).unwrap();
    assert_eq!(report.powers, POWERS.len());
    assert!(added.is_empty());
    let hide = app.space.power("Hide").unwrap();
    assert_eq!(app.space.entity_tier(player, hide), Tier::Yes);
}

#[test]
fn missing_power_section_loads_empty_then_seeds() {
    let (app, report, added) = {
        let ctx = E2EContext::bare();
        let collaborators = Collaborators::with_log_sinks(ctx.world.clone(), ctx.world.clone());
        let mut reader = TextLabeledReader::new("".as_bytes());
        App::load(EngineConfig::default(), collaborators, &mut reader).unwrap()
    };
    assert!(!report.had_power_section);
    assert_eq!(added.powers.len(), POWERS.len());
    assert!(app.space.resolve_group("Player").is_some());
}
