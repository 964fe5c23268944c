//! Gravity module: классификатор состояний + state-анимации
//!
//! ECS ответственность:
//! - GravityTracker state machine (Ground/Falling/Pull/Landing/Climbing)
//! - Per-tick классификация скоростей (пороги в GravityPolicy)
//! - Edge-triggered анимационные триггеры по ключам состояний
//! - Радиальные поля (остатки гравитационных снарядов)
//!
//! Презентационный слой ответственность:
//! - Проигрывание/отмена анимаций по ключам из AnimationTriggered
//! - Спрайты, текстуры, повороты на экране

use bevy::prelude::*;

pub mod animation;
pub mod classifier;
pub mod field;
pub mod landing;
pub mod state;

// Re-export основных типов
pub use animation::{
    drive_state_animations, ActiveStateAnimation, AnimationCancelled, AnimationTriggered,
    TriggerMode,
};
pub use classifier::{classify, update_gravity_states, Classification, GravityPolicy};
pub use landing::{HardLanding, LandingTimer, LANDING_RECOVERY_SECS};
pub use state::{set_gravity_state, Facing, GravityState, GravityStateChanged, GravityTracker};

use crate::SimulationSet;

/// Gravity Plugin
///
/// Порядок выполнения (внутри SimulationSet::Gravity):
/// 1. apply_radial_gravity — поля тянут тела
/// 2. update_gravity_states — классификатор sweep
/// 3. apply_hard_landings — внешние Landing-запросы
/// 4. tick_landing_timers — возврат Landing → Ground
/// 5. drive_state_animations — переходы → триггеры
pub struct GravityPlugin;

impl Plugin for GravityPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GravityPolicy>();

        app.add_event::<GravityStateChanged>()
            .add_event::<HardLanding>()
            .add_event::<AnimationTriggered>()
            .add_event::<AnimationCancelled>();

        app.add_systems(
            FixedUpdate,
            (
                field::apply_radial_gravity,
                classifier::update_gravity_states,
                landing::apply_hard_landings,
                landing::tick_landing_timers,
                animation::drive_state_animations,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Gravity),
        );
    }
}
