//! Жёсткое приземление
//!
//! Landing — единственное состояние, которое ставится не классификатором:
//! внешний триггер (контакт с землёй во время Falling), sticky до истечения
//! таймера, таймер отменяем (прыжок снимает его досрочно).

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::state::{set_gravity_state, GravityState, GravityStateChanged, GravityTracker};
use crate::logger;

/// Полная длительность приземления: 0.2 кадр удара + 0.5 восстановление
pub const LANDING_RECOVERY_SECS: f32 = 0.7;

/// Событие: запрос жёсткого приземления. Валиден только из Falling,
/// в остальных состояниях молча игнорируется.
#[derive(Event, Debug, Clone)]
pub struct HardLanding {
    pub entity: Entity,
}

/// Таймер возврата Landing → Ground. Снятие компонента = отмена.
#[derive(Component, Debug)]
pub struct LandingTimer {
    pub timer: Timer,
}

impl LandingTimer {
    pub fn new(seconds: f32) -> Self {
        Self {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        }
    }
}

/// Система: применение HardLanding запросов
///
/// Скорость обнуляется, состояние становится Landing (sticky),
/// ставится таймер возврата в idle.
pub fn apply_hard_landings(
    mut commands: Commands,
    mut events: EventReader<HardLanding>,
    mut bodies: Query<(&mut GravityTracker, &mut Velocity)>,
    mut state_events: EventWriter<GravityStateChanged>,
) {
    for event in events.read() {
        let Ok((mut tracker, mut velocity)) = bodies.get_mut(event.entity) else {
            // Запрос на сущность без трекера/тела — ошибка wiring, не рантайма
            debug_assert!(false, "HardLanding target has no tracker/body");
            logger::log_warning(&format!(
                "HardLanding: entity {:?} has no GravityTracker + Velocity",
                event.entity
            ));
            continue;
        };

        if tracker.state != GravityState::Falling {
            continue;
        }

        velocity.linvel = Vec2::ZERO;
        // Нулевой сэмпл считаем классифицированным: после возврата в idle
        // short-circuit не даст переклассифицировать стоячее тело
        tracker.previous_velocity = Some(Vec2::ZERO);
        set_gravity_state(
            event.entity,
            &mut tracker,
            GravityState::Landing,
            &mut state_events,
        );
        commands
            .entity(event.entity)
            .insert(LandingTimer::new(LANDING_RECOVERY_SECS));
    }
}

/// Система: тик landing-таймеров
///
/// По истечении — снимаем таймер и возвращаемся в Ground (idle-триггер
/// уходит через обычный edge на setter'е).
pub fn tick_landing_timers(
    mut commands: Commands,
    mut query: Query<(Entity, &mut GravityTracker, &mut LandingTimer)>,
    time: Res<Time<Fixed>>,
    mut state_events: EventWriter<GravityStateChanged>,
) {
    for (entity, mut tracker, mut landing) in query.iter_mut() {
        landing.timer.tick(time.delta());
        if !landing.timer.finished() {
            continue;
        }
        commands.entity(entity).remove::<LandingTimer>();
        set_gravity_state(entity, &mut tracker, GravityState::Ground, &mut state_events);
    }
}
