//! Доменные реакции на контакты
//!
//! Каждый handler — маленький mapping «роли из контакта → сайд-эффекты»
//! (попытка pin'а, доменное событие). Роли уже разрешены dispatcher'ом
//! по category-битам; здесь никаких проверок типов сущностей.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

use super::category::GameCategories;
use super::contact::ContactEvent;
use super::dispatcher::side_with;
use super::pinning::try_pin;
use crate::components::{
    Arrow, Dead, DespawnAfter, Destructible, FlightStatus, GravityProjectile, Health,
    RadialGravityField,
};
use crate::gravity::{GravityState, GravityTracker, HardLanding};
use crate::logger;
use crate::spawn;
use crate::DeterministicRng;

/// Урон одной стрелы
pub const ARROW_DAMAGE: u32 = 50;

/// Сколько капля лежит на земле до исчезновения
pub const BLOOD_LINGER_SECS: f32 = 2.0;

/// Время жизни радиального поля
pub const FIELD_LIFETIME_SECS: f32 = 3.0;

/// Капель на одно попадание по врагу
pub const BLOOD_DROPLETS_PER_HIT: usize = 4;

/// Событие: враг получил стрелу (каждое попадание, без дедупликации)
#[derive(Event, Debug, Clone)]
pub struct EnemyHitByArrow {
    pub enemy: Entity,
    pub arrow: Entity,
    pub point: Vec2,
}

/// Событие: враг повержен (для level-слоя)
#[derive(Event, Debug, Clone)]
pub struct EnemyDefeated {
    pub enemy: Entity,
}

/// Событие: разрушаемый блок дошёл до terminal-стадии (для level-слоя)
#[derive(Event, Debug, Clone)]
pub struct DestructibleBroken {
    pub entity: Entity,
}

/// Событие: герой добрался до сундука — level-слой решает, что дальше
#[derive(Event, Debug, Clone)]
pub struct LevelCompleted {
    pub hero: Entity,
}

/// Событие: кровь пролита (для презентационного слоя)
#[derive(Event, Debug, Clone)]
pub struct BloodSpilled {
    pub position: Vec2,
}

/// Исходящие события реакций одним bundle'ом параметров
#[derive(SystemParam)]
pub struct ReactionOutbox<'w> {
    pub hard_landing: EventWriter<'w, HardLanding>,
    pub enemy_hit: EventWriter<'w, EnemyHitByArrow>,
    pub enemy_defeated: EventWriter<'w, EnemyDefeated>,
    pub destructible_broken: EventWriter<'w, DestructibleBroken>,
    pub level_completed: EventWriter<'w, LevelCompleted>,
}

/// Стрела × разрушаемый блок
///
/// Pin только пока блок не Broken; hit() — безусловно (учёт попаданий и
/// продвижение стадии происходят и при отклонённом pin'е, и после terminal).
pub fn arrow_hits_destructible(
    commands: &mut Commands,
    contact: &ContactEvent,
    categories: &GameCategories,
    arrows: &mut Query<(&mut FlightStatus, &Transform), With<Arrow>>,
    destructibles: &mut Query<(&mut Destructible, &Transform)>,
    outbox: &mut ReactionOutbox,
) {
    let (Some(arrow_entity), Some(block_entity)) = (
        side_with(contact, categories.arrow),
        side_with(contact, categories.destructible),
    ) else {
        debug_assert!(false, "arrow/destructible contact without matching categories");
        logger::log_warning("arrow/destructible contact: role resolution failed");
        return;
    };

    let Ok((mut flight, arrow_transform)) = arrows.get_mut(arrow_entity) else {
        debug_assert!(false, "arrow entity lost its FlightStatus");
        logger::log_warning(&format!("arrow {:?} has no FlightStatus", arrow_entity));
        return;
    };
    let Ok((mut block, block_transform)) = destructibles.get_mut(block_entity) else {
        debug_assert!(false, "destructible entity lost its Destructible");
        logger::log_warning(&format!("destructible {:?} has no component", block_entity));
        return;
    };

    if !block.is_broken() {
        // AlreadyPinned — не ошибка: стрела уже где-то сидит
        let _ = try_pin(
            commands,
            arrow_entity,
            &mut flight,
            block_entity,
            contact.point,
            arrow_transform,
            block_transform,
        );
    }

    if block.hit() {
        outbox
            .destructible_broken
            .write(DestructibleBroken { entity: block_entity });
        logger::log_info(&format!(
            "destructible {:?} broken after {} hits",
            block_entity, block.hits_taken
        ));
    }
}

/// Стрела × враг
///
/// Pin и урон безусловны: повторный контакт того же снаряда снова бьёт
/// (pin при этом отклоняется флагом). Дедупликации попаданий нет.
pub fn arrow_hits_enemy(
    commands: &mut Commands,
    contact: &ContactEvent,
    categories: &GameCategories,
    arrows: &mut Query<(&mut FlightStatus, &Transform), With<Arrow>>,
    enemies: &mut Query<(&mut Health, &Transform), With<crate::components::Enemy>>,
    outbox: &mut ReactionOutbox,
) {
    let (Some(arrow_entity), Some(enemy_entity)) = (
        side_with(contact, categories.arrow),
        side_with(contact, categories.enemy),
    ) else {
        debug_assert!(false, "arrow/enemy contact without matching categories");
        logger::log_warning("arrow/enemy contact: role resolution failed");
        return;
    };

    let Ok((mut flight, arrow_transform)) = arrows.get_mut(arrow_entity) else {
        debug_assert!(false, "arrow entity lost its FlightStatus");
        logger::log_warning(&format!("arrow {:?} has no FlightStatus", arrow_entity));
        return;
    };
    let Ok((mut health, enemy_transform)) = enemies.get_mut(enemy_entity) else {
        debug_assert!(false, "enemy entity lost its Health");
        logger::log_warning(&format!("enemy {:?} has no Health", enemy_entity));
        return;
    };

    let _ = try_pin(
        commands,
        arrow_entity,
        &mut flight,
        enemy_entity,
        contact.point,
        arrow_transform,
        enemy_transform,
    );

    let was_alive = health.is_alive();
    health.take_damage(ARROW_DAMAGE);
    outbox.enemy_hit.write(EnemyHitByArrow {
        enemy: enemy_entity,
        arrow: arrow_entity,
        point: contact.point,
    });

    if was_alive && !health.is_alive() {
        commands.entity(enemy_entity).insert(Dead);
        outbox.enemy_defeated.write(EnemyDefeated { enemy: enemy_entity });
        logger::log_info(&format!("enemy {:?} defeated by arrow {:?}", enemy_entity, arrow_entity));
    }
}

/// Герой × земля: во время Falling контакт превращается в HardLanding
pub fn hero_touches_ground(
    contact: &ContactEvent,
    categories: &GameCategories,
    heroes: &Query<&GravityTracker, With<crate::components::Hero>>,
    outbox: &mut ReactionOutbox,
) {
    let Some(hero_entity) = side_with(contact, categories.hero) else {
        debug_assert!(false, "hero/ground contact without hero category");
        logger::log_warning("hero/ground contact: role resolution failed");
        return;
    };
    let Ok(tracker) = heroes.get(hero_entity) else {
        debug_assert!(false, "hero entity lost its GravityTracker");
        logger::log_warning(&format!("hero {:?} has no GravityTracker", hero_entity));
        return;
    };

    if tracker.state == GravityState::Falling {
        outbox.hard_landing.write(HardLanding { entity: hero_entity });
    }
}

/// Кровь × земля: капля ложится — категория обнуляется (ровно один раз),
/// дальше только despawn-таймер
pub fn blood_touches_ground(
    commands: &mut Commands,
    contact: &ContactEvent,
    categories: &GameCategories,
    blood: &mut Query<&mut CollisionGroups, With<crate::components::Blood>>,
) {
    let Some(droplet) = side_with(contact, categories.blood) else {
        debug_assert!(false, "blood/ground contact without blood category");
        logger::log_warning("blood/ground contact: role resolution failed");
        return;
    };
    let Ok(mut groups) = blood.get_mut(droplet) else {
        return;
    };

    if groups.memberships == Group::NONE {
        // Уже легла (двойной контакт в одном тике)
        return;
    }
    groups.memberships = Group::NONE;
    groups.filters = categories.ground;
    commands
        .entity(droplet)
        .insert(DespawnAfter::new(BLOOD_LINGER_SECS));
}

/// Герой × сундук: конец уровня решает level-слой
pub fn hero_reaches_treasure_chest(
    contact: &ContactEvent,
    categories: &GameCategories,
    outbox: &mut ReactionOutbox,
) {
    let Some(hero_entity) = side_with(contact, categories.hero) else {
        debug_assert!(false, "hero/chest contact without hero category");
        logger::log_warning("hero/chest contact: role resolution failed");
        return;
    };
    outbox.level_completed.write(LevelCompleted { hero: hero_entity });
}

/// Гравитационный снаряд × земля: снаряд исчезает, на его месте — поле
pub fn gravity_projectile_lands(
    commands: &mut Commands,
    contact: &ContactEvent,
    categories: &GameCategories,
    projectiles: &mut Query<&mut FlightStatus, (With<GravityProjectile>, Without<Arrow>)>,
) {
    let Some(projectile) = side_with(contact, categories.gravity_projectile) else {
        debug_assert!(false, "projectile/ground contact without projectile category");
        logger::log_warning("gravity projectile contact: role resolution failed");
        return;
    };
    let Ok(mut flight) = projectiles.get_mut(projectile) else {
        return;
    };
    // Тот же check-and-set, что у pin'а: двойной контакт за тик — одно поле
    if !flight.try_mark_pinned() {
        return;
    }

    commands.entity(projectile).despawn();
    commands.spawn((
        RadialGravityField::default(),
        Transform::from_translation(contact.point.extend(0.0)),
        GlobalTransform::default(),
        DespawnAfter::new(FIELD_LIFETIME_SECS),
    ));
    logger::log(&format!(
        "gravity field spawned at {:?} (projectile {:?})",
        contact.point, projectile
    ));
}

/// Система: брызги крови на каждое попадание по врагу
///
/// Импульсы капель — из seeded RNG: прогоны с одинаковым seed дают
/// идентичный рисунок брызг.
pub fn spawn_blood_spatter(
    mut commands: Commands,
    mut hits: EventReader<EnemyHitByArrow>,
    categories: Res<GameCategories>,
    mut rng: ResMut<DeterministicRng>,
    mut spilled: EventWriter<BloodSpilled>,
) {
    for hit in hits.read() {
        for _ in 0..BLOOD_DROPLETS_PER_HIT {
            let impulse = Vec2::new(
                rng.rng.gen_range(-30.0..30.0),
                rng.rng.gen_range(20.0..60.0),
            );
            spawn::spawn_blood_droplet(&mut commands, &categories, hit.point, impulse);
        }
        spilled.write(BloodSpilled { position: hit.point });
    }
}
