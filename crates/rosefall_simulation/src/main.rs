//! Headless симуляция ROSEFALL
//!
//! Запускает Bevy App без рендера: героиня падает на землю,
//! стрела летит во врага, гравитационный снаряд раскрывает поле.

use bevy::prelude::*;
use rosefall_simulation::{create_headless_app, spawn, GameCategories, SimulationPlugin};

fn main() {
    let seed = 42;
    println!("Starting ROSEFALL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    // Малая демо-сцена
    let categories = *app.world().resource::<GameCategories>();
    let ground = categories.ground;
    let mut commands = app.world_mut().commands();
    spawn::spawn_terrain(
        &mut commands,
        ground,
        Vec2::new(0.0, -20.0),
        Vec2::new(500.0, 10.0),
    );
    spawn::spawn_hero(&mut commands, &categories, Vec2::new(0.0, 200.0));
    spawn::spawn_enemy(&mut commands, &categories, Vec2::new(120.0, 0.0));
    spawn::spawn_arrow(
        &mut commands,
        &categories,
        Vec2::new(-100.0, 10.0),
        Vec2::new(300.0, 60.0),
    );
    spawn::spawn_gravity_projectile(
        &mut commands,
        &categories,
        Vec2::new(60.0, 150.0),
        Vec2::new(0.0, -200.0),
    );

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
}
