use crate::model::classes::Axis;
use crate::model::config::ScoringConfig;
use crate::model::distribution::Distribution;
use crate::model::records::ModelDataset;
use crate::model::tables::{AccuracyRow, AccuracyTable, AxisPair, ScoreTable};
use crate::pipeline::stage2_resolve::{Expectation, GroundTruthResolver, normalize_category};
use crate::report::{mean, round_to};

#[derive(Debug, Clone)]
pub struct Stage3Output {
    pub table: AccuracyTable,
    /// Categories (as written in the input) with no ground-truth entry.
    pub unmatched: Vec<String>,
}

impl Stage3Output {
    /// An empty table summarizes to zero so downstream joins stay total.
    pub fn summary(&self) -> AxisPair<Option<f64>> {
        self.table.average.unwrap_or(AxisPair {
            gender: Some(0.0),
            race: Some(0.0),
        })
    }
}

pub fn run_stage3(
    dataset: &ModelDataset,
    resolver: &GroundTruthResolver,
    config: &ScoringConfig,
) -> Stage3Output {
    let mut rows = Vec::with_capacity(dataset.records.len());
    let mut unmatched = Vec::new();

    for record in &dataset.records {
        let Some(truth) = resolver.resolve(&record.category, record.direction) else {
            tracing::warn!(
                "{}: category '{}' not found in ground truth",
                dataset.key,
                normalize_category(&record.category)
            );
            unmatched.push(record.category.clone());
            continue;
        };

        rows.push(AccuracyRow {
            category: record.category.clone(),
            direction: record.direction,
            accuracy: AxisPair {
                gender: expected_mass(&truth.gender, &record.gender, |label| {
                    record.unlisted_mass(Axis::Gender, label)
                }),
                race: expected_mass(&truth.race, &record.race, |label| {
                    record.unlisted_mass(Axis::Race, label)
                }),
            },
        });
    }

    let average = if rows.is_empty() {
        None
    } else {
        Some(AxisPair {
            gender: mean(rows.iter().filter_map(|r| r.accuracy.gender))
                .map(|v| round_to(v, config.decimals)),
            race: mean(rows.iter().filter_map(|r| r.accuracy.race))
                .map(|v| round_to(v, config.decimals)),
        })
    };

    Stage3Output {
        table: ScoreTable { rows, average },
        unmatched,
    }
}

/// Mass the model put on the expected dominant label; `None` when the axis is
/// not evaluated for this category and direction. Labels outside the class
/// set are looked up through `unlisted`.
pub fn expected_mass<const N: usize>(
    expectation: &Expectation,
    dist: &Distribution<N>,
    unlisted: impl FnOnce(&str) -> f64,
) -> Option<f64> {
    match expectation {
        Expectation::NotEvaluated => None,
        Expectation::Class(idx) => Some(dist.mass(*idx)),
        Expectation::Unlisted(label) => Some(unlisted(label)),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_accuracy.rs"]
mod tests;
