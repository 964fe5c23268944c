//! Драйвер state-анимаций
//!
//! ECS не проигрывает анимации — он шлёт презентационному слою триггеры
//! по ключам. Edge-triggering гарантирует setter состояния; здесь же
//! держим инвариант «не больше одной state-анимации на сущность».

use bevy::prelude::*;

use super::state::{Facing, GravityState, GravityStateChanged, GravityTracker};

/// Режим проигрывания триггера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Повторяется, пока не вытеснен новым ключом (idle, walk)
    Looping,
    /// Проигрывается один раз (falling, pull, landing)
    OneShot,
}

/// Событие для презентационного слоя: запустить анимацию по ключу.
/// Новый ключ вытесняет предыдущий у той же сущности.
#[derive(Event, Debug, Clone)]
pub struct AnimationTriggered {
    pub entity: Entity,
    pub key: &'static str,
    pub mode: TriggerMode,
    pub facing: Facing,
    pub rotation: f32,
}

/// Событие для презентационного слоя: снять анимацию по ключу
/// (walk-остановка и другие действия вне state-машины)
#[derive(Event, Debug, Clone)]
pub struct AnimationCancelled {
    pub entity: Entity,
    pub key: &'static str,
}

/// Текущая state-анимация сущности (не более одной)
#[derive(Component, Debug, Clone)]
pub struct ActiveStateAnimation {
    pub key: &'static str,
}

/// Режим для каждого состояния: только idle зациклен, остальные one-shot.
/// Landing сам дотянет до idle через landing-таймер.
pub fn trigger_mode_for(state: GravityState) -> TriggerMode {
    match state {
        GravityState::Ground => TriggerMode::Looping,
        GravityState::Falling
        | GravityState::Pull
        | GravityState::Landing
        | GravityState::Climbing => TriggerMode::OneShot,
    }
}

/// Система: переходы состояний → анимационные триггеры
pub fn drive_state_animations(
    mut commands: Commands,
    mut changes: EventReader<GravityStateChanged>,
    trackers: Query<&GravityTracker>,
    active: Query<&ActiveStateAnimation>,
    mut triggers: EventWriter<AnimationTriggered>,
    mut cancels: EventWriter<AnimationCancelled>,
) {
    for change in changes.read() {
        let Ok(tracker) = trackers.get(change.entity) else {
            // Сущность умерла между сменой состояния и драйвером
            continue;
        };

        let key = change.new.animation_key();
        if let Ok(current) = active.get(change.entity) {
            if current.key == key {
                // Тот же ключ уже играет — не рестартуем
                continue;
            }
            // Новый ключ вытесняет старый: презентационный слой снимает
            // предыдущую анимацию до старта новой
            cancels.write(AnimationCancelled {
                entity: change.entity,
                key: current.key,
            });
        }

        commands
            .entity(change.entity)
            .insert(ActiveStateAnimation { key });
        triggers.write(AnimationTriggered {
            entity: change.entity,
            key,
            mode: trigger_mode_for(change.new),
            facing: tracker.facing,
            rotation: tracker.rotation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_idle_loops() {
        assert_eq!(trigger_mode_for(GravityState::Ground), TriggerMode::Looping);
        assert_eq!(trigger_mode_for(GravityState::Falling), TriggerMode::OneShot);
        assert_eq!(trigger_mode_for(GravityState::Pull), TriggerMode::OneShot);
        assert_eq!(trigger_mode_for(GravityState::Landing), TriggerMode::OneShot);
        assert_eq!(trigger_mode_for(GravityState::Climbing), TriggerMode::OneShot);
    }
}
