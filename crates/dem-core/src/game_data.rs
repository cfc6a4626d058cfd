//! The game-data lookup provider consulted by the object codec.
//!
//! Some object records have a layout that depends on static game data
//! rather than on anything in the capture: how many submodels a polygon
//! model has, and whether a robot is a boss. Callers supply that data
//! through [`GameData`]. Missing entries answer `0` / `false`, which
//! lets a capture decode (less completely) without the asset files.

use indexmap::{IndexMap, IndexSet};

use crate::tags::ObjectType;

/// Read-only oracle over the game's static data tables.
pub trait GameData {
    /// Number of submodels in polygon model `model_number`.
    fn submodel_count(&self, model_number: i32) -> usize;

    /// Whether robot type `robot_id` is a boss.
    fn is_boss_robot(&self, robot_id: u8) -> bool;

    /// Polygon model used by robot type `robot_id`.
    fn robot_model(&self, robot_id: u8) -> i32;

    /// Resolve the polygon model an object is drawn with.
    ///
    /// Robots use the robot table, players use model 0, clutter uses its
    /// own id, and every other type uses the model number stored in the
    /// record (`0` when none was stored).
    fn model_number_for(&self, object_type: ObjectType, id: u8, stored: Option<i32>) -> i32 {
        match object_type {
            ObjectType::ROBOT => self.robot_model(id),
            ObjectType::PLAYER => 0,
            ObjectType::CLUTTER => i32::from(id),
            _ => stored.unwrap_or(0),
        }
    }
}

/// Provider with no data: every lookup answers `0` / `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGameData;

impl GameData for NoGameData {
    fn submodel_count(&self, _model_number: i32) -> usize {
        0
    }

    fn is_boss_robot(&self, _robot_id: u8) -> bool {
        false
    }

    fn robot_model(&self, _robot_id: u8) -> i32 {
        0
    }
}

/// Table-backed provider, typically filled from the game's data files.
///
/// # Examples
///
/// ```
/// use dem_core::{GameData, GameDataTable, ObjectType};
///
/// let data = GameDataTable::new()
///     .with_robot_model(17, 42)
///     .with_submodels(42, 6)
///     .with_boss(17);
///
/// assert!(data.is_boss_robot(17));
/// assert_eq!(data.model_number_for(ObjectType::ROBOT, 17, None), 42);
/// assert_eq!(data.submodel_count(42), 6);
/// assert_eq!(data.submodel_count(7), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameDataTable {
    submodels: IndexMap<i32, usize>,
    bosses: IndexSet<u8>,
    robot_models: IndexMap<u8, i32>,
}

impl GameDataTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the submodel count of a polygon model.
    pub fn with_submodels(mut self, model_number: i32, count: usize) -> Self {
        self.submodels.insert(model_number, count);
        self
    }

    /// Flag a robot type as a boss.
    pub fn with_boss(mut self, robot_id: u8) -> Self {
        self.bosses.insert(robot_id);
        self
    }

    /// Record the polygon model used by a robot type.
    pub fn with_robot_model(mut self, robot_id: u8, model_number: i32) -> Self {
        self.robot_models.insert(robot_id, model_number);
        self
    }

    /// Number of polygon models with a known submodel count.
    pub fn model_count(&self) -> usize {
        self.submodels.len()
    }
}

impl GameData for GameDataTable {
    fn submodel_count(&self, model_number: i32) -> usize {
        self.submodels.get(&model_number).copied().unwrap_or(0)
    }

    fn is_boss_robot(&self, robot_id: u8) -> bool {
        self.bosses.contains(&robot_id)
    }

    fn robot_model(&self, robot_id: u8) -> i32 {
        self.robot_models.get(&robot_id).copied().unwrap_or(0)
    }
}

impl<T: GameData + ?Sized> GameData for &T {
    fn submodel_count(&self, model_number: i32) -> usize {
        (**self).submodel_count(model_number)
    }

    fn is_boss_robot(&self, robot_id: u8) -> bool {
        (**self).is_boss_robot(robot_id)
    }

    fn robot_model(&self, robot_id: u8) -> i32 {
        (**self).robot_model(robot_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_provider_degrades_to_zero() {
        let data = NoGameData;
        assert_eq!(data.submodel_count(3), 0);
        assert!(!data.is_boss_robot(3));
        assert_eq!(data.model_number_for(ObjectType::ROBOT, 3, None), 0);
    }

    #[test]
    fn resolution_rule_per_object_type() {
        let data = GameDataTable::new().with_robot_model(5, 33);
        assert_eq!(data.model_number_for(ObjectType::ROBOT, 5, Some(99)), 33);
        assert_eq!(data.model_number_for(ObjectType::PLAYER, 5, Some(99)), 0);
        assert_eq!(data.model_number_for(ObjectType::CLUTTER, 5, Some(99)), 5);
        assert_eq!(data.model_number_for(ObjectType::WEAPON, 5, Some(99)), 99);
        assert_eq!(data.model_number_for(ObjectType::DEBRIS, 5, None), 0);
    }

    #[test]
    fn later_insert_overwrites() {
        let data = GameDataTable::new().with_submodels(1, 4).with_submodels(1, 9);
        assert_eq!(data.submodel_count(1), 9);
        assert_eq!(data.model_count(), 1);
    }

    #[test]
    fn references_forward_to_the_provider() {
        let table = GameDataTable::new().with_boss(9);
        let by_ref: &dyn GameData = &table;
        assert!(GameData::is_boss_robot(&by_ref, 9));
    }
}
