//! Pin-сервис: «снаряд воткнулся в цель»
//!
//! Персистентный fixed joint между снарядом и телом в точке контакта.
//! At-most-once на снаряд: защита — check-and-set флага FlightStatus,
//! повторный вызов — гарантированный no-op (AlreadyPinned, не ошибка).

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::components::FlightStatus;
use crate::logger;

/// Результат попытки pin'а
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned,
    /// Флаг уже взведён — снаряд где-то сидит. Не ошибка.
    AlreadyPinned,
}

/// Создаёт joint снаряд↔цель в мировой точке `point`.
///
/// Без отката: успешный pin необратим, joint живёт в физическом мире,
/// пока живо любое из тел.
pub fn try_pin(
    commands: &mut Commands,
    projectile: Entity,
    flight: &mut FlightStatus,
    target: Entity,
    point: Vec2,
    projectile_transform: &Transform,
    target_transform: &Transform,
) -> PinOutcome {
    if !flight.try_mark_pinned() {
        return PinOutcome::AlreadyPinned;
    }

    let joint = FixedJointBuilder::new()
        .local_anchor1(local_anchor(target_transform, point))
        .local_anchor2(local_anchor(projectile_transform, point));
    commands
        .entity(projectile)
        .insert(ImpulseJoint::new(target, joint));

    logger::log(&format!(
        "pinned projectile {:?} to {:?} at {:?}",
        projectile, target, point
    ));
    PinOutcome::Pinned
}

/// Мировая точка → локальные координаты тела
fn local_anchor(transform: &Transform, point: Vec2) -> Vec2 {
    let offset = (point - transform.translation.truncate()).extend(0.0);
    (transform.rotation.inverse() * offset).truncate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_local_anchor_translation_only() {
        let transform = Transform::from_translation(Vec3::new(10.0, 5.0, 0.0));
        let anchor = local_anchor(&transform, Vec2::new(13.0, 5.0));

        assert!((anchor - Vec2::new(3.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_local_anchor_respects_rotation() {
        // Тело повёрнуто на 90°: мировой offset (0, 5) в локальных — (5, 0)
        let transform = Transform::from_translation(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let anchor = local_anchor(&transform, Vec2::new(10.0, 5.0));

        assert!((anchor - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }
}
