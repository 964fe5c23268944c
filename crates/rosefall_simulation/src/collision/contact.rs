//! Контактные события
//!
//! Dispatcher работает с доменным ContactEvent, а не с сырым rapier-событием:
//! tactical-слой может писать ContactEvent сам (с точной manifold-точкой),
//! адаптер ниже конвертирует rapier CollisionEvent для хостов, которые
//! гоняют физику в том же App.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::logger;

/// Один контакт двух тел за текущий шаг. Живёт один dispatch.
#[derive(Event, Debug, Clone)]
pub struct ContactEvent {
    pub entity_a: Entity,
    pub entity_b: Entity,
    /// Category-маска (memberships) стороны A на момент контакта
    pub category_a: Group,
    /// Category-маска стороны B
    pub category_b: Group,
    /// Мировая точка контакта
    pub point: Vec2,
}

/// Система: адаптер rapier CollisionEvent::Started → ContactEvent
///
/// Точная manifold-точка принадлежит narrow-phase tactical-слоя; для
/// anchors достаточно середины между телами. Stopped-события не несут
/// доменного смысла и отбрасываются.
pub fn ingest_collision_events(
    mut raw: EventReader<CollisionEvent>,
    bodies: Query<(&CollisionGroups, &Transform)>,
    mut contacts: EventWriter<ContactEvent>,
) {
    for event in raw.read() {
        let CollisionEvent::Started(entity_a, entity_b, _) = event else {
            continue;
        };

        let (Ok((groups_a, transform_a)), Ok((groups_b, transform_b))) =
            (bodies.get(*entity_a), bodies.get(*entity_b))
        else {
            // Контакт от тела без CollisionGroups — нарушение setup-инварианта
            debug_assert!(false, "contact body without CollisionGroups/Transform");
            logger::log_warning(&format!(
                "contact {:?}/{:?}: body without CollisionGroups",
                entity_a, entity_b
            ));
            continue;
        };

        let point =
            (transform_a.translation.truncate() + transform_b.translation.truncate()) / 2.0;
        contacts.write(ContactEvent {
            entity_a: *entity_a,
            entity_b: *entity_b,
            category_a: groups_a.memberships,
            category_b: groups_b.memberships,
            point,
        });
    }
}
