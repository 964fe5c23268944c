//! Классификатор гравитационного состояния
//!
//! Чистая функция velocity → (state, facing, rotation) + система-sweep,
//! прогоняющая её раз в тик по всем трекерам.
//!
//! Пороги — policy, не константы реализации: вынесены в GravityPolicy.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use super::state::{set_gravity_state, Facing, GravityState, GravityStateChanged, GravityTracker};

/// Пороги классификатора (points/sec)
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GravityPolicy {
    /// dy ниже порога → Falling
    pub fall_dy: f32,
    /// dy выше порога → Pull
    pub pull_dy: f32,
    /// |dx| выше порога → Pull
    pub pull_dx: f32,
}

impl Default for GravityPolicy {
    fn default() -> Self {
        Self {
            fall_dy: -20.0,
            pull_dy: 50.0,
            pull_dx: 50.0,
        }
    }
}

/// Результат классификации одного сэмпла скорости
///
/// facing/rotation — подсказки (None = не менять текущие).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub state: GravityState,
    pub facing: Option<Facing>,
    pub rotation: Option<f32>,
}

/// Чистая классификация: одинаковый вход → одинаковый выход.
///
/// - dy < fall_dy → Falling (независимо от dx)
/// - dy > pull_dy или |dx| > pull_dx → Pull; facing по знаку dx,
///   rotation = atan2 скорости, для левого — зеркальный heading (+180°)
/// - иначе → Ground, rotation сбрасывается в 0
pub fn classify(velocity: Vec2, policy: &GravityPolicy) -> Classification {
    if velocity.y < policy.fall_dy {
        return Classification {
            state: GravityState::Falling,
            facing: None,
            rotation: None,
        };
    }

    if velocity.y > policy.pull_dy || velocity.x > policy.pull_dx || velocity.x < -policy.pull_dx {
        let heading = velocity.y.atan2(velocity.x);
        let (facing, rotation) = if velocity.x > 0.0 {
            (Some(Facing::Right), Some(heading))
        } else if velocity.x < 0.0 {
            // Спрайт зеркалится по X, heading доворачивается на 180°,
            // чтобы «нос» совпадал с направлением полёта
            (Some(Facing::Left), Some(heading + std::f32::consts::PI))
        } else {
            // Вертикальный рывок: направление взгляда не трогаем
            (None, None)
        };
        return Classification {
            state: GravityState::Pull,
            facing,
            rotation,
        };
    }

    Classification {
        state: GravityState::Ground,
        facing: None,
        rotation: Some(0.0),
    }
}

/// Система: per-tick sweep классификатора по всем трекерам
///
/// 1. Landing активен → ничего не считаем (sticky override)
/// 2. Скорость бит-в-бит равна прошлому сэмплу → пропуск
///    (иначе каждый тик рестартовали бы анимации)
/// 3. Иначе классифицируем и ведём результат через явный setter
pub fn update_gravity_states(
    policy: Res<GravityPolicy>,
    mut trackers: Query<(Entity, &Velocity, &mut GravityTracker)>,
    mut state_events: EventWriter<GravityStateChanged>,
) {
    for (entity, velocity, mut tracker) in trackers.iter_mut() {
        if tracker.state.is_sticky() {
            continue;
        }
        if tracker.previous_velocity == Some(velocity.linvel) {
            continue;
        }
        tracker.previous_velocity = Some(velocity.linvel);

        let result = classify(velocity.linvel, &policy);
        if let Some(facing) = result.facing {
            tracker.facing = facing;
        }
        if let Some(rotation) = result.rotation {
            tracker.rotation = rotation;
        }
        set_gravity_state(entity, &mut tracker, result.state, &mut state_events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn policy() -> GravityPolicy {
        GravityPolicy::default()
    }

    #[test]
    fn test_classify_is_pure() {
        let velocity = Vec2::new(60.0, 10.0);
        let first = classify(velocity, &policy());
        for _ in 0..10 {
            assert_eq!(classify(velocity, &policy()), first);
        }
    }

    #[test]
    fn test_falling_independent_of_dx() {
        // dy < -20 → Falling при любом dx
        for dx in [-500.0, -60.0, 0.0, 60.0, 500.0] {
            let result = classify(Vec2::new(dx, -25.0), &policy());
            assert_eq!(result.state, GravityState::Falling, "dx = {}", dx);
        }
    }

    #[test]
    fn test_ground_envelope() {
        // dy ∈ [-20, 50], dx ∈ [-50, 50] → Ground, rotation сброшен
        for (dx, dy) in [(0.0, 0.0), (-50.0, -20.0), (50.0, 50.0), (30.0, -10.0)] {
            let result = classify(Vec2::new(dx, dy), &policy());
            assert_eq!(result.state, GravityState::Ground, "({}, {})", dx, dy);
            assert_eq!(result.rotation, Some(0.0));
        }
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        // Сравнения строгие: значения на границе остаются Ground
        assert_eq!(classify(Vec2::new(0.0, -20.0), &policy()).state, GravityState::Ground);
        assert_eq!(classify(Vec2::new(0.0, -20.1), &policy()).state, GravityState::Falling);
        assert_eq!(classify(Vec2::new(50.0, 0.0), &policy()).state, GravityState::Ground);
        assert_eq!(classify(Vec2::new(50.1, 0.0), &policy()).state, GravityState::Pull);
        assert_eq!(classify(Vec2::new(-50.1, 0.0), &policy()).state, GravityState::Pull);
        assert_eq!(classify(Vec2::new(0.0, 50.1), &policy()).state, GravityState::Pull);
    }

    #[test]
    fn test_pull_facing_right() {
        let result = classify(Vec2::new(60.0, 10.0), &policy());
        assert_eq!(result.state, GravityState::Pull);
        assert_eq!(result.facing, Some(Facing::Right));

        let expected = 10.0_f32.atan2(60.0);
        assert!((result.rotation.unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_pull_facing_left_mirrors_heading() {
        let result = classify(Vec2::new(-60.0, 10.0), &policy());
        assert_eq!(result.state, GravityState::Pull);
        assert_eq!(result.facing, Some(Facing::Left));

        // Зеркальный heading: atan2 + 180°
        let expected = 10.0_f32.atan2(-60.0) + PI;
        assert!((result.rotation.unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_pull_keeps_facing() {
        // dx == 0: рывок строго вверх, направление взгляда не трогаем
        let result = classify(Vec2::new(0.0, 80.0), &policy());
        assert_eq!(result.state, GravityState::Pull);
        assert_eq!(result.facing, None);
        assert_eq!(result.rotation, None);
    }

    #[test]
    fn test_falling_wins_over_pull_dx() {
        // Отрицательный dy сильнее горизонтального порога
        let result = classify(Vec2::new(200.0, -25.0), &policy());
        assert_eq!(result.state, GravityState::Falling);
    }
}
