//! Реестр категорий коллизий
//!
//! Каждый физический вид тела владеет уникальным битом rapier `Group`.
//! Пара категорий → логический CollisionKind через симметричную таблицу
//! (ключ — OR двух масок, OR коммутативен, симметрия бесплатна).
//!
//! Реестр заменяет глобальные bitmask-константы прототипа: биты выдаются
//! при регистрации с fail-fast проверкой уникальности.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Логическая классификация пары категорий
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionKind {
    /// Нет доменной реакции (большинство контактов: ground|edge и т.п.)
    #[default]
    None,
    ArrowHitsDestructible,
    ArrowHitsEnemy,
    HeroTouchesGround,
    BloodTouchesGround,
    HeroReachesTreasureChest,
    GravityProjectileLands,
}

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("category `{0}` is already registered")]
    DuplicateName(String),
    #[error("all 32 category bits are taken")]
    BitsExhausted,
    #[error("category pair {0:#010x} already maps to {1:?}")]
    PairTaken(u32, CollisionKind),
}

/// Реестр категорий + таблица комбинаций
#[derive(Resource, Debug)]
pub struct CategoryRegistry {
    names: HashMap<String, Group>,
    used: Group,
    kinds: HashMap<u32, CollisionKind>,
}

// Не derive: Group::default() — это Group::ALL, а свежий реестр
// обязан стартовать с пустым набором занятых битов
impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            names: HashMap::new(),
            used: Group::NONE,
            kinds: HashMap::new(),
        }
    }
}

impl CategoryRegistry {
    /// Регистрирует категорию, выдаёт следующий свободный бит.
    /// Fail-fast: дубликат имени или исчерпание 32 битов — ошибка сразу.
    pub fn register(&mut self, name: &str) -> Result<Group, CategoryError> {
        if self.names.contains_key(name) {
            return Err(CategoryError::DuplicateName(name.to_string()));
        }
        for shift in 0..32u32 {
            let bit = Group::from_bits_truncate(1 << shift);
            if !self.used.intersects(bit) {
                self.used |= bit;
                self.names.insert(name.to_string(), bit);
                return Ok(bit);
            }
        }
        Err(CategoryError::BitsExhausted)
    }

    /// Бит ранее зарегистрированной категории
    pub fn get(&self, name: &str) -> Option<Group> {
        self.names.get(name).copied()
    }

    /// Связывает пару категорий с CollisionKind.
    /// Пара уже занята → fail-fast (две реакции на один контакт — wiring bug).
    pub fn register_kind(
        &mut self,
        a: Group,
        b: Group,
        kind: CollisionKind,
    ) -> Result<(), CategoryError> {
        let key = (a | b).bits();
        if let Some(existing) = self.kinds.get(&key) {
            return Err(CategoryError::PairTaken(key, *existing));
        }
        self.kinds.insert(key, kind);
        Ok(())
    }

    /// Симметричный lookup: combine(a, b) == combine(b, a).
    /// Незнакомые пары — CollisionKind::None, никогда не ошибка.
    pub fn combine(&self, a: Group, b: Group) -> CollisionKind {
        self.kinds
            .get(&(a | b).bits())
            .copied()
            .unwrap_or_default()
    }
}

/// Снимок именованных битов для горячего пути (dispatcher, spawn-хелперы)
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameCategories {
    pub hero: Group,
    pub enemy: Group,
    pub arrow: Group,
    pub ground: Group,
    pub edge: Group,
    pub rock: Group,
    pub destructible: Group,
    pub blood: Group,
    pub treasure_chest: Group,
    pub gravity_projectile: Group,
    pub radial_gravity_field: Group,
}

impl GameCategories {
    /// Регистрирует все игровые категории и таблицу комбинаций.
    /// Ошибка здесь — wiring bug уровня старта приложения.
    pub fn build(registry: &mut CategoryRegistry) -> Result<Self, CategoryError> {
        let hero = registry.register("hero")?;
        let enemy = registry.register("enemy")?;
        let arrow = registry.register("arrow")?;
        let ground = registry.register("ground")?;
        let edge = registry.register("edge")?;
        let rock = registry.register("rock")?;
        let destructible = registry.register("destructible")?;
        let blood = registry.register("blood")?;
        let treasure_chest = registry.register("treasure-chest")?;
        let gravity_projectile = registry.register("gravity-projectile")?;
        let radial_gravity_field = registry.register("radial-gravity-field")?;

        registry.register_kind(arrow, destructible, CollisionKind::ArrowHitsDestructible)?;
        registry.register_kind(arrow, enemy, CollisionKind::ArrowHitsEnemy)?;
        registry.register_kind(hero, ground, CollisionKind::HeroTouchesGround)?;
        registry.register_kind(blood, ground, CollisionKind::BloodTouchesGround)?;
        registry.register_kind(hero, treasure_chest, CollisionKind::HeroReachesTreasureChest)?;
        registry.register_kind(
            gravity_projectile,
            ground,
            CollisionKind::GravityProjectileLands,
        )?;

        Ok(Self {
            hero,
            enemy,
            arrow,
            ground,
            edge,
            rock,
            destructible,
            blood,
            treasure_chest,
            gravity_projectile,
            radial_gravity_field,
        })
    }

    /// Герой: сталкивается с рельефом, контактирует с землёй/сундуком
    pub fn hero_groups(&self) -> CollisionGroups {
        CollisionGroups::new(
            self.hero,
            self.ground | self.rock | self.edge | self.destructible | self.treasure_chest,
        )
    }

    /// Стрела: рельеф + цели
    pub fn arrow_groups(&self) -> CollisionGroups {
        CollisionGroups::new(
            self.arrow,
            self.ground | self.edge | self.enemy | self.destructible,
        )
    }

    /// Враг: рельеф + стрелы
    pub fn enemy_groups(&self) -> CollisionGroups {
        CollisionGroups::new(self.enemy, self.ground | self.edge | self.arrow)
    }

    /// Кровь: только земля
    pub fn blood_groups(&self) -> CollisionGroups {
        CollisionGroups::new(self.blood, self.ground)
    }

    /// Гравитационный снаряд: только рельеф
    pub fn gravity_projectile_groups(&self) -> CollisionGroups {
        CollisionGroups::new(self.gravity_projectile, self.ground | self.edge)
    }

    /// Сундук: contact-only с героем (sensor, без solver-отклика)
    pub fn treasure_chest_groups(&self) -> CollisionGroups {
        CollisionGroups::new(self.treasure_chest, self.hero)
    }

    /// Разрушаемый блок: стрелы + герой
    pub fn destructible_groups(&self) -> CollisionGroups {
        CollisionGroups::new(self.destructible, self.arrow | self.hero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_bits_are_unique() {
        let mut registry = CategoryRegistry::default();
        let categories = GameCategories::build(&mut registry).unwrap();

        let bits = [
            categories.hero,
            categories.enemy,
            categories.arrow,
            categories.ground,
            categories.edge,
            categories.rock,
            categories.destructible,
            categories.blood,
            categories.treasure_chest,
            categories.gravity_projectile,
            categories.radial_gravity_field,
        ];
        for (i, a) in bits.iter().enumerate() {
            assert_eq!(a.bits().count_ones(), 1, "категория должна владеть одним битом");
            for b in bits.iter().skip(i + 1) {
                assert!(!a.intersects(*b), "биты пересеклись: {:?} / {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_duplicate_name_fails_fast() {
        let mut registry = CategoryRegistry::default();
        registry.register("hero").unwrap();

        assert!(matches!(
            registry.register("hero"),
            Err(CategoryError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_bits_exhausted_on_33rd_category() {
        let mut registry = CategoryRegistry::default();
        for i in 0..32 {
            registry.register(&format!("cat-{}", i)).unwrap();
        }

        assert!(matches!(
            registry.register("one-too-many"),
            Err(CategoryError::BitsExhausted)
        ));
    }

    #[test]
    fn test_combine_is_symmetric_for_all_pairs() {
        let mut registry = CategoryRegistry::default();
        let c = GameCategories::build(&mut registry).unwrap();

        let pairs = [
            (c.arrow, c.destructible),
            (c.arrow, c.enemy),
            (c.hero, c.ground),
            (c.blood, c.ground),
            (c.hero, c.treasure_chest),
            (c.gravity_projectile, c.ground),
        ];
        for (a, b) in pairs {
            assert_eq!(registry.combine(a, b), registry.combine(b, a));
            assert_ne!(registry.combine(a, b), CollisionKind::None);
        }
    }

    #[test]
    fn test_unknown_pair_is_noop_kind() {
        let mut registry = CategoryRegistry::default();
        let c = GameCategories::build(&mut registry).unwrap();

        // Ground|Edge и прочие несмысловые контакты — None, не ошибка
        assert_eq!(registry.combine(c.ground, c.edge), CollisionKind::None);
        assert_eq!(registry.combine(c.hero, c.rock), CollisionKind::None);
        assert_eq!(registry.combine(c.enemy, c.enemy), CollisionKind::None);
    }

    #[test]
    fn test_pair_reregistration_fails_fast() {
        let mut registry = CategoryRegistry::default();
        let a = registry.register("a").unwrap();
        let b = registry.register("b").unwrap();

        registry
            .register_kind(a, b, CollisionKind::ArrowHitsEnemy)
            .unwrap();
        assert!(matches!(
            registry.register_kind(b, a, CollisionKind::ArrowHitsDestructible),
            Err(CategoryError::PairTaken(_, CollisionKind::ArrowHitsEnemy))
        ));
    }

    #[test]
    fn test_none_category_is_zero() {
        assert_eq!(Group::NONE.bits(), 0);
    }
}
