//! Collision module: категории, dispatch контактов, реакции
//!
//! ECS ответственность:
//! - Реестр category-битов и симметричная таблица CollisionKind
//! - Dispatch контактов в доменные реакции (pin, урон, разрушение)
//! - At-most-once pin joints на снарядах
//!
//! Tactical-слой (rapier) ответственность:
//! - Narrow-phase и генерация CollisionEvent
//! - Интеграция тел, исполнение joints

use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

pub mod category;
pub mod contact;
pub mod dispatcher;
pub mod pinning;
pub mod reactions;

// Re-export основных типов
pub use category::{CategoryError, CategoryRegistry, CollisionKind, GameCategories};
pub use contact::{ingest_collision_events, ContactEvent};
pub use dispatcher::{dispatch_contacts, side_with};
pub use pinning::{try_pin, PinOutcome};
pub use reactions::{
    BloodSpilled, DestructibleBroken, EnemyDefeated, EnemyHitByArrow, LevelCompleted,
    ARROW_DAMAGE, BLOOD_LINGER_SECS, FIELD_LIFETIME_SECS,
};

use crate::components::despawn_after_timeout;
use crate::SimulationSet;

/// Collision Plugin
///
/// Порядок выполнения:
/// 1. ingest_collision_events — rapier события → ContactEvent
/// 2. dispatch_contacts — резолв kind + реакции
/// 3. spawn_blood_spatter — брызги по результатам попаданий
/// 4. despawn_after_timeout — уборка (кровь, истёкшие поля)
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация категорий — startup-инвариант: ошибка здесь означает
        // wiring bug, падаем сразу
        let mut registry = CategoryRegistry::default();
        let categories = GameCategories::build(&mut registry)
            .expect("collision category registration is a startup invariant");
        app.insert_resource(registry);
        app.insert_resource(categories);

        // CollisionEvent регистрирует и RapierPhysicsPlugin, если хост гоняет
        // физику в этом же App; add_event идемпотентен
        app.add_event::<CollisionEvent>()
            .add_event::<ContactEvent>()
            .add_event::<EnemyHitByArrow>()
            .add_event::<EnemyDefeated>()
            .add_event::<DestructibleBroken>()
            .add_event::<LevelCompleted>()
            .add_event::<BloodSpilled>();

        app.add_systems(
            FixedUpdate,
            (
                contact::ingest_collision_events,
                dispatcher::dispatch_contacts,
                reactions::spawn_blood_spatter,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Collision),
        );

        app.add_systems(
            FixedUpdate,
            despawn_after_timeout.in_set(SimulationSet::Cleanup),
        );
    }
}
