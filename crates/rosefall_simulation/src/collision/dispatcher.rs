//! Dispatcher контактов
//!
//! Один проход за тик: каждый ContactEvent резолвится через реестр в
//! CollisionKind и уходит в соответствующий handler. Роли сторон
//! определяются ТОЛЬКО по category-битам — на горячем пути коллизий
//! нет ни одной проверки конкретного типа сущности.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::category::{CategoryRegistry, CollisionKind, GameCategories};
use super::contact::ContactEvent;
use super::reactions::{self, ReactionOutbox};
use crate::components::{Arrow, Blood, Destructible, Enemy, FlightStatus, GravityProjectile, Health, Hero};
use crate::gravity::GravityTracker;

/// Сторона контакта, несущая категорию `category` (по битам, не по типам)
pub fn side_with(contact: &ContactEvent, category: Group) -> Option<Entity> {
    if contact.category_a.intersects(category) {
        Some(contact.entity_a)
    } else if contact.category_b.intersects(category) {
        Some(contact.entity_b)
    } else {
        None
    }
}

/// Система: dispatch всех контактов текущего шага
///
/// Незарезолвленные kind'ы игнорируются молча — большинство контактов
/// (ground|edge и т.п.) не несут доменного смысла.
#[allow(clippy::too_many_arguments)]
pub fn dispatch_contacts(
    mut commands: Commands,
    mut contacts: EventReader<ContactEvent>,
    registry: Res<CategoryRegistry>,
    categories: Res<GameCategories>,
    mut arrows: Query<(&mut FlightStatus, &Transform), With<Arrow>>,
    mut destructibles: Query<(&mut Destructible, &Transform)>,
    mut enemies: Query<(&mut Health, &Transform), With<Enemy>>,
    heroes: Query<&GravityTracker, With<Hero>>,
    mut blood: Query<&mut CollisionGroups, With<Blood>>,
    mut projectiles: Query<&mut FlightStatus, (With<GravityProjectile>, Without<Arrow>)>,
    mut outbox: ReactionOutbox,
) {
    for contact in contacts.read() {
        let kind = registry.combine(contact.category_a, contact.category_b);
        match kind {
            CollisionKind::ArrowHitsDestructible => reactions::arrow_hits_destructible(
                &mut commands,
                contact,
                &categories,
                &mut arrows,
                &mut destructibles,
                &mut outbox,
            ),
            CollisionKind::ArrowHitsEnemy => reactions::arrow_hits_enemy(
                &mut commands,
                contact,
                &categories,
                &mut arrows,
                &mut enemies,
                &mut outbox,
            ),
            CollisionKind::HeroTouchesGround => {
                reactions::hero_touches_ground(contact, &categories, &heroes, &mut outbox)
            }
            CollisionKind::BloodTouchesGround => {
                reactions::blood_touches_ground(&mut commands, contact, &categories, &mut blood)
            }
            CollisionKind::HeroReachesTreasureChest => {
                reactions::hero_reaches_treasure_chest(contact, &categories, &mut outbox)
            }
            CollisionKind::GravityProjectileLands => reactions::gravity_projectile_lands(
                &mut commands,
                contact,
                &categories,
                &mut projectiles,
            ),
            CollisionKind::None => {}
        }
    }
}
