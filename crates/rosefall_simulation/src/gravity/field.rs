//! Радиальные гравитационные поля
//!
//! Поле спавнится на месте приземлившегося гравитационного снаряда и тянет
//! к центру все тела с RadialGravityAffected. Именно эти скорости
//! классификатор потом видит как Pull.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::components::{RadialGravityAffected, RadialGravityField};

/// Система: притяжение к центрам активных полей
///
/// Линейный falloff: полная сила у центра, ноль на границе радиуса.
pub fn apply_radial_gravity(
    fields: Query<(&RadialGravityField, &Transform)>,
    mut bodies: Query<(&Transform, &mut Velocity), With<RadialGravityAffected>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (field, field_transform) in fields.iter() {
        let center = field_transform.translation.truncate();

        for (body_transform, mut velocity) in bodies.iter_mut() {
            let position = body_transform.translation.truncate();
            let offset = center - position;
            let distance = offset.length();
            if distance >= field.radius || distance < f32::EPSILON {
                continue;
            }

            let falloff = 1.0 - distance / field.radius;
            velocity.linvel += offset / distance * field.strength * falloff * delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falloff_pull_toward_center() {
        // Логика притяжения напрямую (без App schedule)
        let field = RadialGravityField {
            strength: 800.0,
            radius: 300.0,
        };
        let center = Vec2::new(0.0, 0.0);
        let position = Vec2::new(150.0, 0.0);
        let mut velocity = Vec2::ZERO;

        let delta = 1.0 / 60.0;
        let offset = center - position;
        let distance = offset.length();
        let falloff = 1.0 - distance / field.radius;
        velocity += offset / distance * field.strength * falloff * delta;

        // На половине радиуса falloff = 0.5 → тянет влево к центру
        assert!(velocity.x < 0.0);
        assert!((velocity.x - (-800.0 * 0.5 * delta)).abs() < 1e-3);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_falloff_vanishes_at_boundary() {
        let field = RadialGravityField {
            strength: 800.0,
            radius: 300.0,
        };

        // На границе радиуса falloff = 0: приращение скорости нулевое
        let falloff = 1.0 - 299.999_f32 / field.radius;
        assert!(falloff < 1e-4);
    }
}
