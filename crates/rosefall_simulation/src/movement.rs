//! Movement intents: прыжок, ходьба, остановка
//!
//! Intent-события приходят от хоста (input слой / AI), системы применяют
//! их к телам. Прыжок — импульс, ходьба — прямая горизонтальная скорость.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::gravity::{
    set_gravity_state, AnimationCancelled, AnimationTriggered, Facing, GravityState,
    GravityStateChanged, GravityTracker, LandingTimer, TriggerMode,
};
use crate::logger;
use crate::SimulationSet;

/// Импульс прыжка (как в оригинальной механике: чуть вбок, сильно вверх)
pub const JUMP_IMPULSE_X: f32 = 50.0;
pub const JUMP_IMPULSE_Y: f32 = 1200.0;

/// Скорость ходьбы. Остаётся в ground-диапазоне классификатора (|dx| < 50),
/// иначе каждый шаг читался бы как Pull.
pub const WALK_SPEED: f32 = 40.0;

/// Ключ walk-анимации (вне state-машины, снимается по StopIntent)
pub const WALK_ACTION_KEY: &str = "walk";

/// Intent: прыгнуть в сторону точки
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
    /// Мировая точка, к которой прыгаем (знак dx импульса)
    pub toward: Vec2,
}

/// Intent: идти в направлении
#[derive(Event, Debug, Clone)]
pub struct WalkIntent {
    pub entity: Entity,
    pub facing: Facing,
}

/// Intent: остановиться
#[derive(Event, Debug, Clone)]
pub struct StopIntent {
    pub entity: Entity,
}

/// Система: применение прыжков
///
/// Прыжок отменяет активное приземление (снимает LandingTimer — Landing
/// перестаёт быть sticky) и переводит в Climbing. Классификатор
/// переклассифицирует на следующем изменении скорости.
pub fn apply_jump_intents(
    mut commands: Commands,
    mut events: EventReader<JumpIntent>,
    mut bodies: Query<(
        &Transform,
        &mut GravityTracker,
        &mut ExternalImpulse,
        Option<&LandingTimer>,
    )>,
    mut state_events: EventWriter<GravityStateChanged>,
) {
    for event in events.read() {
        let Ok((transform, mut tracker, mut impulse, landing)) = bodies.get_mut(event.entity)
        else {
            debug_assert!(false, "JumpIntent target has no body");
            logger::log_warning(&format!(
                "JumpIntent: entity {:?} has no impulse body",
                event.entity
            ));
            continue;
        };

        let dx = if event.toward.x > transform.translation.x {
            JUMP_IMPULSE_X
        } else {
            -JUMP_IMPULSE_X
        };
        impulse.impulse += Vec2::new(dx, JUMP_IMPULSE_Y);

        if landing.is_some() {
            commands.entity(event.entity).remove::<LandingTimer>();
        }
        set_gravity_state(
            event.entity,
            &mut tracker,
            GravityState::Climbing,
            &mut state_events,
        );
    }
}

/// Система: применение ходьбы
pub fn apply_walk_intents(
    mut events: EventReader<WalkIntent>,
    mut bodies: Query<(&mut GravityTracker, &mut Velocity)>,
    mut triggers: EventWriter<AnimationTriggered>,
) {
    for event in events.read() {
        let Ok((mut tracker, mut velocity)) = bodies.get_mut(event.entity) else {
            debug_assert!(false, "WalkIntent target has no body");
            logger::log_warning(&format!(
                "WalkIntent: entity {:?} has no tracker/body",
                event.entity
            ));
            continue;
        };

        tracker.facing = event.facing;
        velocity.linvel.x = match event.facing {
            Facing::Right => WALK_SPEED,
            Facing::Left => -WALK_SPEED,
        };
        triggers.write(AnimationTriggered {
            entity: event.entity,
            key: WALK_ACTION_KEY,
            mode: TriggerMode::Looping,
            facing: event.facing,
            rotation: tracker.rotation,
        });
    }
}

/// Система: остановка — гасим горизонтальную скорость, снимаем walk-анимацию
pub fn apply_stop_intents(
    mut events: EventReader<StopIntent>,
    mut bodies: Query<&mut Velocity, With<GravityTracker>>,
    mut cancels: EventWriter<AnimationCancelled>,
) {
    for event in events.read() {
        let Ok(mut velocity) = bodies.get_mut(event.entity) else {
            continue;
        };
        velocity.linvel.x = 0.0;
        cancels.write(AnimationCancelled {
            entity: event.entity,
            key: WALK_ACTION_KEY,
        });
    }
}

/// Movement Plugin
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpIntent>()
            .add_event::<WalkIntent>()
            .add_event::<StopIntent>()
            // Анимационные события регистрирует и GravityPlugin; add_event идемпотентен
            .add_event::<AnimationTriggered>()
            .add_event::<AnimationCancelled>()
            .add_event::<GravityStateChanged>();

        app.add_systems(
            FixedUpdate,
            (apply_walk_intents, apply_stop_intents, apply_jump_intents)
                .chain()
                .in_set(SimulationSet::Intents),
        );
    }
}
