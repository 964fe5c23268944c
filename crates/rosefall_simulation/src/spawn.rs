//! Spawn-хелперы
//!
//! Собирают полный набор компонентов на сущность: маркер роли, тело,
//! коллайдер, category-биты из GameCategories, ActiveEvents для контактов.
//! Параметры тел (запрет вращения, restitution, friction, density)
//! повторяют оригинальную настройку персонажей.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::collision::GameCategories;
use crate::components::{
    Arrow, Blood, Destructible, Enemy, FlightStatus, GravityProjectile, Health, Hero,
    RadialGravityAffected, TreasureChest,
};
use crate::gravity::GravityTracker;

/// Героиня: динамическое тело без вращения, гравитационный трекер,
/// затягивается радиальными полями
pub fn spawn_hero(commands: &mut Commands, categories: &GameCategories, position: Vec2) -> Entity {
    commands
        .spawn((
            (
                Hero,
                Health::default(),
                GravityTracker::default(),
                RadialGravityAffected,
            ),
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
            (
                RigidBody::Dynamic,
                Collider::capsule_y(16.0, 8.0),
                Velocity::default(),
                ExternalImpulse::default(),
                LockedAxes::ROTATION_LOCKED,
                Restitution::coefficient(0.0),
                Friction::coefficient(1.0),
                ColliderMassProperties::Density(1.0),
            ),
            (categories.hero_groups(), ActiveEvents::COLLISION_EVENTS),
        ))
        .id()
}

/// Враг
pub fn spawn_enemy(commands: &mut Commands, categories: &GameCategories, position: Vec2) -> Entity {
    commands
        .spawn((
            (Enemy, Health::default()),
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
            (
                RigidBody::Dynamic,
                Collider::ball(12.0),
                Velocity::default(),
                LockedAxes::ROTATION_LOCKED,
            ),
            (categories.enemy_groups(), ActiveEvents::COLLISION_EVENTS),
        ))
        .id()
}

/// Стрела: половинный прямоугольник текстуры, стартовая скорость полёта
pub fn spawn_arrow(
    commands: &mut Commands,
    categories: &GameCategories,
    position: Vec2,
    velocity: Vec2,
) -> Entity {
    commands
        .spawn((
            (Arrow, FlightStatus::default()),
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
            (
                RigidBody::Dynamic,
                Collider::cuboid(8.0, 2.0),
                Velocity::linear(velocity),
                ColliderMassProperties::Density(1.0),
            ),
            (categories.arrow_groups(), ActiveEvents::COLLISION_EVENTS),
        ))
        .id()
}

/// Разрушаемый блок каменной кладки
pub fn spawn_destructible_block(
    commands: &mut Commands,
    categories: &GameCategories,
    position: Vec2,
) -> Entity {
    commands
        .spawn((
            Destructible::default(),
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
            (RigidBody::Fixed, Collider::cuboid(16.0, 16.0)),
            (
                categories.destructible_groups(),
                ActiveEvents::COLLISION_EVENTS,
            ),
        ))
        .id()
}

/// Капля крови с разлётным импульсом
pub fn spawn_blood_droplet(
    commands: &mut Commands,
    categories: &GameCategories,
    position: Vec2,
    impulse: Vec2,
) -> Entity {
    commands
        .spawn((
            Blood,
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
            (
                RigidBody::Dynamic,
                Collider::ball(2.0),
                Velocity::default(),
                ExternalImpulse {
                    impulse,
                    torque_impulse: 0.0,
                },
                LockedAxes::ROTATION_LOCKED,
                Restitution::coefficient(0.0),
                Friction::coefficient(0.2),
            ),
            (categories.blood_groups(), ActiveEvents::COLLISION_EVENTS),
        ))
        .id()
}

/// Гравитационный снаряд
pub fn spawn_gravity_projectile(
    commands: &mut Commands,
    categories: &GameCategories,
    position: Vec2,
    velocity: Vec2,
) -> Entity {
    commands
        .spawn((
            (GravityProjectile, FlightStatus::default()),
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
            (
                RigidBody::Dynamic,
                Collider::ball(6.0),
                Velocity::linear(velocity),
            ),
            (
                categories.gravity_projectile_groups(),
                ActiveEvents::COLLISION_EVENTS,
            ),
        ))
        .id()
}

/// Сундук: contact-only сенсор, solver его не трогает
pub fn spawn_treasure_chest(
    commands: &mut Commands,
    categories: &GameCategories,
    position: Vec2,
) -> Entity {
    commands
        .spawn((
            TreasureChest,
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
            (RigidBody::Fixed, Collider::cuboid(12.0, 10.0), Sensor),
            (
                categories.treasure_chest_groups(),
                ActiveEvents::COLLISION_EVENTS,
            ),
        ))
        .id()
}

/// Статический рельеф: ground / edge / rock — вызывающий передаёт бит
pub fn spawn_terrain(
    commands: &mut Commands,
    membership: Group,
    position: Vec2,
    half_extents: Vec2,
) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            GlobalTransform::default(),
            (
                RigidBody::Fixed,
                Collider::cuboid(half_extents.x, half_extents.y),
            ),
            (
                CollisionGroups::new(membership, Group::ALL),
                ActiveEvents::COLLISION_EVENTS,
            ),
        ))
        .id()
}
