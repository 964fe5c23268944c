//! Property-based тесты детерминизма
//!
//! Одинаковый seed + одинаковый сценарий контактов → идентичные снепшоты
//! (включая rng-зависимые брызги крови).

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rosefall_simulation::*;

fn tick(app: &mut App) {
    let step = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut().resource_mut::<Time<Fixed>>().advance_by(step);
    app.world_mut().run_schedule(FixedUpdate);
}

fn send_contact(app: &mut App, a: Entity, b: Entity, point: Vec2) {
    let groups_a = *app.world().get::<CollisionGroups>(a).unwrap();
    let groups_b = *app.world().get::<CollisionGroups>(b).unwrap();
    app.world_mut().send_event(ContactEvent {
        entity_a: a,
        entity_b: b,
        category_a: groups_a.memberships,
        category_b: groups_b.memberships,
        point,
    });
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 200;

    let snapshot1 = run_simulation(SEED, TICK_COUNT);
    let snapshot2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 200;

    // Запускаем 5 раз — все должны быть идентичны
    let snapshots: Vec<_> = (0..5)
        .map(|_| run_simulation(SEED, TICK_COUNT))
        .collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

/// Запускает сценарий (падение, попадания, разрушение) и возвращает snapshot
fn run_simulation(seed: u64, tick_count: usize) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let categories = *app.world().resource::<GameCategories>();
    let (hero, enemy, block, arrow1, arrow2, ground) = {
        let mut commands = app.world_mut().commands();
        (
            spawn::spawn_hero(&mut commands, &categories, Vec2::new(0.0, 200.0)),
            spawn::spawn_enemy(&mut commands, &categories, Vec2::new(120.0, 0.0)),
            spawn::spawn_destructible_block(&mut commands, &categories, Vec2::new(-80.0, 0.0)),
            spawn::spawn_arrow(&mut commands, &categories, Vec2::new(60.0, 10.0), Vec2::new(300.0, 0.0)),
            spawn::spawn_arrow(&mut commands, &categories, Vec2::new(-40.0, 10.0), Vec2::new(-300.0, 0.0)),
            spawn::spawn_terrain(
                &mut commands,
                categories.ground,
                Vec2::new(0.0, -20.0),
                Vec2::new(500.0, 10.0),
            ),
        )
    };
    app.world_mut().flush();

    for t in 0..tick_count {
        // Фиксированный сценарий внешних фактов
        if t == 3 {
            app.world_mut().get_mut::<Velocity>(hero).unwrap().linvel = Vec2::new(0.0, -30.0);
        }
        if t == 5 {
            send_contact(&mut app, arrow1, enemy, Vec2::new(110.0, 5.0));
        }
        if t == 10 {
            send_contact(&mut app, arrow2, block, Vec2::new(-64.0, 5.0));
        }
        if t == 20 {
            send_contact(&mut app, hero, ground, Vec2::new(0.0, -10.0));
        }
        tick(&mut app);
    }

    // Snapshot: трекеры, здоровье, стадии разрушения, pin-флаги
    let mut snapshot = world_snapshot::<GravityTracker>(app.world_mut());
    snapshot.extend(world_snapshot::<Health>(app.world_mut()));
    snapshot.extend(world_snapshot::<Destructible>(app.world_mut()));
    snapshot.extend(world_snapshot::<FlightStatus>(app.world_mut()));
    snapshot
}
