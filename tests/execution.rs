use screeps_architect::*;

fn open_room() -> RoomData {
    RoomData::new(FastRoomTerrain::plain())
        .with_controller(Location::from_xy(40, 10))
        .with_source(Location::from_xy(10, 10))
        .with_source(Location::from_xy(10, 40))
        .with_mineral(Location::from_xy(40, 40))
}

fn engine() -> Engine<MemoryStore> {
    let config = EngineConfig {
        seed: Some(11),
        ..Default::default()
    };
    Engine::new(config, Capabilities::controller_structures(), MemoryStore::new())
}

fn world_with_spawn(names: &[&str], tier: u8) -> SimWorld {
    let mut world = SimWorld::default();
    for name in names {
        world.add_room(name, open_room(), tier);
        world.add_structure(name, StructureKind::Spawn, Location::from_xy(25, 25));
    }
    world
}

#[test]
fn first_execution_generates_plan() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 2);

    assert_eq!(engine.phase("W1N1"), BasePhase::Unplanned);
    let report = engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();

    assert!(report.sites_created > 0);
    assert_eq!(engine.phase("W1N1"), BasePhase::Executing);
    let plan = engine.store().load_plan("W1N1").unwrap();
    assert_eq!(plan.anchor, Location::from_xy(25, 25));
    assert!(plan.defenses.is_some());
}

#[test]
fn missing_anchor_is_reported() {
    let mut engine = engine();
    let mut world = SimWorld::default();
    world.add_room("W1N1", open_room(), 2);

    let result = engine.execute_once("W1N1", &mut world.room("W1N1").unwrap());
    assert_eq!(result, Err(PlanError::NoAnchor));
    assert_eq!(engine.phase("W1N1"), BasePhase::Unplanned);
    assert!(engine.store().load_plan("W1N1").is_none());
}

#[test]
fn markers_stay_within_budgets() {
    let names: Vec<String> = (0..25).map(|i| format!("W{}N1", i)).collect();
    let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    let mut engine = engine();
    let mut world = world_with_spawn(&refs, 8);

    let mut hit_global_cap = false;
    for round in 0..6 {
        for name in &refs {
            engine
                .execute_once(name, &mut world.room(name).unwrap())
                .unwrap();
            assert!(world.markers(name).len() <= 5, "{} over base budget", name);
            assert!(world.total_markers() <= 100, "over global budget");
            hit_global_cap |= world.total_markers() == 100;
        }
        if round % 2 == 1 {
            for name in &refs {
                world.complete_markers(name, 2);
            }
        }
        world.advance(1);
    }

    assert!(hit_global_cap);
}

#[test]
fn every_kind_gets_a_turn() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 8);
    let mut attempted = std::collections::BTreeSet::new();

    for _ in 0..60 {
        let report = engine
            .execute_once("W1N1", &mut world.room("W1N1").unwrap())
            .unwrap();
        attempted.extend(report.attempted_kinds);
        world.complete_markers("W1N1", 5);
        world.advance(1);
    }

    let plan = engine.get_plan("W1N1", 8).unwrap();
    for kind in plan.kinds() {
        if kind == StructureKind::Spawn && plan.locations(kind).len() == 1 {
            // The anchor spawn is already built.
            continue;
        }
        assert!(attempted.contains(&kind), "{:?} never attempted", kind);
    }
}

#[test]
fn base_converges_and_resumes_on_tier_up() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 1);

    let mut converged = false;
    for _ in 0..500 {
        engine
            .execute_once("W1N1", &mut world.room("W1N1").unwrap())
            .unwrap();
        if engine.phase("W1N1") == BasePhase::Converged {
            converged = true;
            break;
        }
        world.complete_markers("W1N1", 5);
        world.advance(1);
    }
    assert!(converged);

    let tier_one = engine.get_plan("W1N1", 1).unwrap();
    for kind in tier_one.kinds() {
        for loc in tier_one.locations(kind) {
            assert!(world
                .structures("W1N1")
                .iter()
                .any(|s| s.kind == kind && s.position == *loc));
        }
    }

    world.set_tier("W1N1", 2);
    let report = engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();
    assert!(report.sites_created > 0);
    assert_eq!(engine.phase("W1N1"), BasePhase::Executing);
}

#[test]
fn audit_removes_one_structure_past_threshold() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 3);
    engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();

    let plan = engine.get_plan("W1N1", 3).unwrap();
    let stray: Vec<Location> = (0..7)
        .map(|i| Location::from_xy(4 + i * 2, 46))
        .filter(|loc| plan.kinds().iter().all(|k| !plan.contains(*k, *loc)))
        .collect();
    assert!(stray.len() > 5);

    world.add_structure("W1N1", StructureKind::Tower, stray[0]);
    for loc in &stray[1..] {
        world.add_structure("W1N1", StructureKind::Extension, *loc);
    }

    let report = engine.audit("W1N1", &mut world.room("W1N1").unwrap()).unwrap();
    assert_eq!(report.misaligned.len(), stray.len());
    let removed = report.removed.unwrap();
    assert_eq!(removed.kind, StructureKind::Extension);
    assert_eq!(
        world.structures("W1N1").iter().filter(|s| stray.contains(&s.position)).count(),
        stray.len() - 1
    );

    let state = engine.store().load_state("W1N1");
    assert_eq!(state.misaligned.len(), stray.len() - 1);
}

#[test]
fn audit_under_threshold_removes_nothing() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 3);
    engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();

    world.add_structure("W1N1", StructureKind::Road, Location::from_xy(3, 46));
    let report = engine.audit("W1N1", &mut world.room("W1N1").unwrap()).unwrap();
    assert_eq!(report.misaligned.len(), 1);
    assert!(report.removed.is_none());
}

#[test]
fn replan_resets_progress() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 2);
    engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();

    engine.request_replan("W1N1");
    assert_eq!(engine.phase("W1N1"), BasePhase::Unplanned);
    assert_eq!(
        engine.get_plan("W1N1", 2),
        Err(PlanError::UnknownBase("W1N1".to_owned()))
    );

    engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();
    assert!(engine.get_plan("W1N1", 2).is_ok());
}

#[test]
fn outdated_or_corrupt_plans_are_regenerated() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 2);
    engine
        .store_mut()
        .put_raw_plan("W1N1", r#"{"anchor":1,"version":0}"#);

    engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();
    let plan = engine.store().load_plan("W1N1").unwrap();
    assert_eq!(plan.version, PLAN_VERSION);

    engine.store_mut().put_raw_plan("W1N1", "garbage");
    engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();
    assert!(engine.store().load_plan("W1N1").unwrap().is_current());
}

#[test]
fn pending_positions_skip_built_cells() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 2);
    engine
        .generate_plan("W1N1", &world.room("W1N1").unwrap())
        .unwrap();

    let pending = engine
        .next_pending_positions("W1N1", &world.room("W1N1").unwrap(), 500)
        .unwrap();
    assert!(!pending.contains(&(StructureKind::Spawn, Location::from_xy(25, 25))));

    let limited = engine
        .next_pending_positions("W1N1", &world.room("W1N1").unwrap(), 3)
        .unwrap();
    assert_eq!(limited.len(), 3);
    assert_eq!(&pending[..3], &limited[..]);
}

#[test]
fn buffer_hands_over_to_transfer_node_on_tier_up() {
    let mut engine = engine();
    let mut world = world_with_spawn(&["W1N1"], 5);
    let plan = engine
        .generate_plan("W1N1", &world.room("W1N1").unwrap())
        .unwrap();

    let buffer = plan
        .roles
        .resource_buffers
        .iter()
        .copied()
        .find(|b| plan.roles.transfer_index(*b) == Some(2))
        .unwrap();
    assert!(plan.tier(4).unwrap().contains(StructureKind::Container, buffer));
    assert!(!plan.tier(5).unwrap().contains(StructureKind::Link, buffer));
    assert!(plan.tier(6).unwrap().contains(StructureKind::Link, buffer));

    // The buffer survives from the low tiers; everything else of tier 6 is built.
    world.add_structure("W1N1", StructureKind::Container, buffer);
    let tier_six = plan.tier(6).unwrap();
    for kind in tier_six.kinds() {
        for loc in tier_six.locations(kind) {
            let built = world
                .structures("W1N1")
                .iter()
                .any(|s| s.kind == kind && s.position == *loc);
            if !built && *loc != buffer {
                world.add_structure("W1N1", kind, *loc);
            }
        }
    }

    world.set_tier("W1N1", 6);
    let report = engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();
    assert_eq!(report.cleared, vec![buffer]);
    assert!(report.remaining > 0);
    assert_eq!(engine.phase("W1N1"), BasePhase::Executing);

    world.advance(1);
    engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();
    assert!(world
        .markers("W1N1")
        .iter()
        .any(|m| m.kind == StructureKind::Link && m.position == buffer));

    world.complete_markers("W1N1", 5);
    world.advance(1);
    engine
        .execute_once("W1N1", &mut world.room("W1N1").unwrap())
        .unwrap();
    assert_eq!(engine.phase("W1N1"), BasePhase::Converged);
}
