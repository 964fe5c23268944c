//! Базовые ECS компоненты симуляции
//!
//! Роли сущностей задаются маркерами + category-битами их CollisionGroups.
//! Dispatcher определяет стороны контакта ТОЛЬКО по битам — маркеры нужны
//! query-фильтрам и spawn-хелперам, не горячему пути коллизий.

use bevy::prelude::*;

/// Героиня (гравитационно-классифицируемый персонаж)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Hero;

/// Враг (умирает от стрел)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// Стрела (pin-снаряд)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Arrow;

/// Капля крови (спавнится при попадании по врагу)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Blood;

/// Сундук с сокровищем (контакт героя = конец уровня)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct TreasureChest;

/// Гравитационный снаряд (при приземлении превращается в радиальное поле)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct GravityProjectile;

/// Здоровье
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Статус полёта снаряда
///
/// Инвариант: `pinned` переключается false→true ровно один раз и никогда
/// не сбрасывается. Это и есть защита от повторных joints на одном снаряде.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FlightStatus {
    pinned: bool,
}

impl FlightStatus {
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Check-and-set одним вызовом: true только при первом обращении.
    /// Два контакта одного тика сериализуются через один dispatcher,
    /// второй всегда увидит уже взведённый флаг.
    pub fn try_mark_pinned(&mut self) -> bool {
        if self.pinned {
            return false;
        }
        self.pinned = true;
        true
    }
}

/// Стадии разрушаемого блока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum DestructibleStage {
    #[default]
    Intact,
    Cracked,
    /// Terminal-стадия: попадания дальше только считаются
    Broken,
}

/// Разрушаемый блок (каменная кладка)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Destructible {
    pub stage: DestructibleStage,
    /// Все попадания, включая полученные после Broken
    pub hits_taken: u32,
}

impl Destructible {
    pub fn is_broken(&self) -> bool {
        self.stage == DestructibleStage::Broken
    }

    /// Регистрирует попадание. Возвращает true, если ИМЕННО это попадание
    /// довело блок до Broken.
    pub fn hit(&mut self) -> bool {
        self.hits_taken += 1;
        match self.stage {
            DestructibleStage::Intact => {
                self.stage = DestructibleStage::Cracked;
                false
            }
            DestructibleStage::Cracked => {
                self.stage = DestructibleStage::Broken;
                true
            }
            DestructibleStage::Broken => false,
        }
    }
}

/// Радиальное гравитационное поле (остаток гравитационного снаряда)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct RadialGravityField {
    /// Ускорение у центра (points/s²)
    pub strength: f32,
    /// Радиус действия (points)
    pub radius: f32,
}

impl Default for RadialGravityField {
    fn default() -> Self {
        Self {
            strength: 800.0,
            radius: 300.0,
        }
    }
}

/// Маркер: тело затягивается радиальными полями (аналог field-маски тела)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct RadialGravityAffected;

/// Компонент-маркер: entity мертв (Health == 0)
///
/// Деспавн не автоматический — трупы остаются на месте,
/// level-слой решает, что с ними делать.
#[derive(Component, Debug)]
pub struct Dead;

/// Отложенный despawn (кровь на земле, истёкшие поля)
#[derive(Component, Debug)]
pub struct DespawnAfter {
    pub timer: Timer,
}

impl DespawnAfter {
    pub fn new(seconds: f32) -> Self {
        Self {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        }
    }
}

/// Система: despawn сущностей с истёкшим таймером
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    for (entity, mut despawn) in query.iter_mut() {
        despawn.timer.tick(time.delta());
        if despawn.timer.finished() {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_take_damage() {
        let mut health = Health::new(100);
        health.take_damage(30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        // Урон больше остатка — saturating, не паника
        health.take_damage(200);
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal_caps_at_max() {
        let mut health = Health::new(100);
        health.take_damage(50);
        health.heal(80);
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_flight_status_flips_exactly_once() {
        let mut flight = FlightStatus::default();
        assert!(!flight.is_pinned());

        // Первый вызов — успех, второй — гарантированный отказ
        assert!(flight.try_mark_pinned());
        assert!(!flight.try_mark_pinned());
        assert!(!flight.try_mark_pinned());
        assert!(flight.is_pinned());
    }

    #[test]
    fn test_destructible_stage_progression() {
        let mut block = Destructible::default();
        assert_eq!(block.stage, DestructibleStage::Intact);

        assert!(!block.hit()); // Intact → Cracked
        assert_eq!(block.stage, DestructibleStage::Cracked);

        assert!(block.hit()); // Cracked → Broken (terminal-переход)
        assert!(block.is_broken());
    }

    #[test]
    fn test_destructible_counts_hits_after_broken() {
        let mut block = Destructible::default();
        block.hit();
        block.hit();
        assert!(block.is_broken());

        // После Broken стадия не двигается, но попадания считаются
        assert!(!block.hit());
        assert!(!block.hit());
        assert_eq!(block.hits_taken, 4);
        assert!(block.is_broken());
    }
}
