//! Гравитационное состояние сущности
//!
//! Единственная точка мутации состояния — явный setter `set_gravity_state`
//! (вместо property observer из прототипа): сравнивает old/new и шлёт
//! edge-triggered событие только на реальном переходе.

use bevy::prelude::*;

/// Дискретная классификация движения гравитационно-зависимой сущности
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum GravityState {
    /// На земле / в ground-диапазоне скоростей
    #[default]
    Ground,
    /// Падение (dy ниже порога)
    Falling,
    /// Затянута полем / быстрый горизонтальный рывок
    Pull,
    /// Жёсткое приземление — sticky, классификатор игнорируется
    Landing,
    /// Прыжок вверх (ставится только извне, не классификатором)
    Climbing,
}

impl GravityState {
    /// Ключ state-анимации. Презентационный слой отменяет анимации по ключу,
    /// поэтому ключи уникальны per-state.
    pub fn animation_key(&self) -> &'static str {
        match self {
            GravityState::Ground => "idle",
            GravityState::Falling => "falling",
            GravityState::Pull => "pull",
            GravityState::Landing => "hard-landing",
            GravityState::Climbing => "climbing",
        }
    }

    /// Sticky-состояния не переклассифицируются до внешнего сброса
    pub fn is_sticky(&self) -> bool {
        matches!(self, GravityState::Landing)
    }
}

/// Направление взгляда спрайта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Трекер гравитационного состояния (на каждой gravity-aware сущности)
///
/// Инициализируется Ground при спавне, умирает вместе с сущностью.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct GravityTracker {
    pub state: GravityState,
    pub facing: Facing,
    /// Heading спрайта в радианах (при Pull — направление полёта)
    pub rotation: f32,
    /// Последний классифицированный сэмпл скорости (equality short-circuit)
    pub previous_velocity: Option<Vec2>,
}

/// Событие: состояние сменилось (только на реальных переходах)
#[derive(Event, Debug, Clone)]
pub struct GravityStateChanged {
    pub entity: Entity,
    pub old: GravityState,
    pub new: GravityState,
}

/// Явный setter состояния. Мутация и событие только при old != new.
pub fn set_gravity_state(
    entity: Entity,
    tracker: &mut GravityTracker,
    new: GravityState,
    events: &mut EventWriter<GravityStateChanged>,
) {
    let old = tracker.state;
    if old == new {
        return;
    }
    tracker.state = new;
    events.write(GravityStateChanged { entity, old, new });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_keys_unique() {
        let states = [
            GravityState::Ground,
            GravityState::Falling,
            GravityState::Pull,
            GravityState::Landing,
            GravityState::Climbing,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in states.iter().skip(i + 1) {
                assert_ne!(a.animation_key(), b.animation_key());
            }
        }
    }

    #[test]
    fn test_only_landing_is_sticky() {
        assert!(GravityState::Landing.is_sticky());
        assert!(!GravityState::Ground.is_sticky());
        assert!(!GravityState::Falling.is_sticky());
        assert!(!GravityState::Pull.is_sticky());
        assert!(!GravityState::Climbing.is_sticky());
    }

    #[test]
    fn test_tracker_spawns_grounded() {
        let tracker = GravityTracker::default();
        assert_eq!(tracker.state, GravityState::Ground);
        assert_eq!(tracker.facing, Facing::Right);
        assert!(tracker.previous_velocity.is_none());
    }
}
