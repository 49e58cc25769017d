use std::path::PathBuf;

use crate::model::classes::{Axis, Direction};
use crate::model::distribution::{GenderDistribution, RaceDistribution};
use crate::model::tables::AxisPair;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub category: String,
    pub direction: Direction,
    pub gender: GenderDistribution,
    pub race: RaceDistribution,
    /// Canonical `(label, mass)` pairs outside the class sets. Entropy and
    /// divergence never see them; accuracy can still score against them.
    pub unlisted: AxisPair<Vec<(String, f64)>>,
}

impl CategoryRecord {
    /// Mass given to a canonical label that is not part of the class set.
    pub fn unlisted_mass(&self, axis: Axis, label: &str) -> f64 {
        self.unlisted
            .get(axis)
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0.0, |(_, mass)| *mass)
    }
}

#[derive(Debug, Clone)]
pub struct ModelDataset {
    pub key: String,
    pub source: PathBuf,
    pub records: Vec<CategoryRecord>,
    pub ignored_labels: usize,
}

/// Expected dominant labels for one direction, as written in the ground-truth
/// table. `None` means the axis is not evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedLabels {
    pub gender: Option<String>,
    pub race: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruthEntry {
    pub category: String,
    pub highest: ExpectedLabels,
    pub lowest: ExpectedLabels,
}

impl GroundTruthEntry {
    pub fn expected(&self, direction: Direction) -> &ExpectedLabels {
        match direction {
            Direction::High => &self.highest,
            Direction::Low => &self.lowest,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroundTruthTable {
    pub entries: Vec<GroundTruthEntry>,
}
