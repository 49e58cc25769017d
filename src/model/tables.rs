use serde::Serialize;

use crate::model::classes::{Axis, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisPair<T> {
    pub gender: T,
    pub race: T,
}

impl<T> AxisPair<T> {
    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::Gender => &self.gender,
            Axis::Race => &self.race,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> AxisPair<U> {
        AxisPair {
            gender: f(self.gender),
            race: f(self.race),
        }
    }
}

/// Per-category rows plus the derived average. The average is kept apart from
/// the rows so consumers never filter on a sentinel category name.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable<R, A> {
    pub rows: Vec<R>,
    pub average: Option<A>,
}

impl<R, A> ScoreTable<R, A> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyRow {
    pub category: String,
    pub direction: Direction,
    pub accuracy: AxisPair<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntropyRow {
    pub category: String,
    pub direction: Direction,
    pub ratio: AxisPair<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceRow {
    pub category: String,
    pub divergence: AxisPair<f64>,
}

pub type AccuracyTable = ScoreTable<AccuracyRow, AxisPair<Option<f64>>>;
pub type EntropyTable = ScoreTable<EntropyRow, AxisPair<f64>>;
pub type DivergenceTable = ScoreTable<DivergenceRow, AxisPair<f64>>;

/// One model's averages, the join key across stages.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow<T> {
    pub model: String,
    pub values: AxisPair<T>,
}
