//! ROSEFALL Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (strategic layer) для 2D action-игры
//! с переменной гравитацией.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (gravity states, collision rules, domain events)
//! - Tactical layer (rapier) = интеграция тел, narrow-phase, joints
//! - Presentation layer = спрайты и анимации по нашим триггерам

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod collision;
pub mod components;
pub mod gravity;
pub mod logger;
pub mod movement;
pub mod spawn;

// Re-export базовых типов для удобства
pub use collision::{
    CategoryRegistry, CollisionKind, ContactEvent, DestructibleBroken, EnemyDefeated,
    EnemyHitByArrow, GameCategories, LevelCompleted, PinOutcome, ARROW_DAMAGE,
};
pub use components::*;
pub use gravity::{
    AnimationTriggered, Facing, GravityPolicy, GravityState, GravityStateChanged, GravityTracker,
    HardLanding, TriggerMode,
};
pub use movement::{JumpIntent, StopIntent, WalkIntent};

/// Фазы одного тика симуляции: intents → классификатор → контакты → уборка.
/// Жёсткий порядок фаз — required для детерминизма прогонов.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Intents,
    Gravity,
    Collision,
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0));

        // Детерминистичный RNG: seed по умолчанию, если хост не вставил свой
        if app.world().get_resource::<DeterministicRng>().is_none() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Порядок фаз тика
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Intents,
                    SimulationSet::Gravity,
                    SimulationSet::Collision,
                    SimulationSet::Cleanup,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((
                movement::MovementPlugin,
                gravity::GravityPlugin,
                collision::CollisionPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-байты компонентов, сортировка по Entity ID)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
