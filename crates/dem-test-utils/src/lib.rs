//! Test utilities and mock types for demo codec development.
//!
//! Provides [`MockGameData`], a counting implementation of
//! [`GameData`], and the [`fixtures`] module with builders for
//! consistent events, objects and whole captures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use dem_core::GameData;

/// Mock implementation of [`GameData`].
///
/// Backed by hash maps for flexible test setup. Every lookup is counted
/// so tests can assert whether the codec consulted the provider.
#[derive(Default)]
pub struct MockGameData {
    submodels: HashMap<i32, usize>,
    bosses: HashSet<u8>,
    robot_models: HashMap<u8, i32>,
    lookups: AtomicUsize,
}

impl MockGameData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the submodel count of a polygon model.
    pub fn set_submodels(&mut self, model_number: i32, count: usize) {
        self.submodels.insert(model_number, count);
    }

    /// Flag a robot type as a boss.
    pub fn set_boss(&mut self, robot_id: u8) {
        self.bosses.insert(robot_id);
    }

    /// Set the polygon model of a robot type.
    pub fn set_robot_model(&mut self, robot_id: u8, model_number: i32) {
        self.robot_models.insert(robot_id, model_number);
    }

    /// Number of lookups answered so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// The provider used by [`fixtures`]: robot 1 is a boss on model 10
    /// with 4 submodels, robot 2 uses model 11 with 2, generic model 20
    /// has 3.
    pub fn standard() -> Self {
        let mut data = Self::new();
        data.set_robot_model(fixtures::BOSS_ROBOT, 10);
        data.set_submodels(10, 4);
        data.set_boss(fixtures::BOSS_ROBOT);
        data.set_robot_model(fixtures::GRUNT_ROBOT, 11);
        data.set_submodels(11, 2);
        data.set_submodels(fixtures::GENERIC_MODEL, 3);
        data
    }

    fn count(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }
}

impl GameData for MockGameData {
    fn submodel_count(&self, model_number: i32) -> usize {
        self.count();
        self.submodels.get(&model_number).copied().unwrap_or(0)
    }

    fn is_boss_robot(&self, robot_id: u8) -> bool {
        self.count();
        self.bosses.contains(&robot_id)
    }

    fn robot_model(&self, robot_id: u8) -> i32 {
        self.count();
        self.robot_models.get(&robot_id).copied().unwrap_or(0)
    }
}
