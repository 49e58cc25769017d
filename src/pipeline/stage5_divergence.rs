use std::collections::BTreeMap;

use crate::model::classes::Direction;
use crate::model::config::ScoringConfig;
use crate::model::distribution::Distribution;
use crate::model::records::{CategoryRecord, ModelDataset};
use crate::model::tables::{AxisPair, DivergenceRow, DivergenceTable, ScoreTable};
use crate::report::{mean, round_to};

#[derive(Debug, Clone)]
pub struct Stage5Output {
    pub table: DivergenceTable,
    /// Categories lacking either a high or a low record.
    pub skipped: Vec<String>,
}

impl Stage5Output {
    pub fn summary(&self) -> AxisPair<f64> {
        self.table.average.unwrap_or_default()
    }
}

#[derive(Default)]
struct Pair<'a> {
    high: Option<&'a CategoryRecord>,
    low: Option<&'a CategoryRecord>,
}

pub fn run_stage5(dataset: &ModelDataset, config: &ScoringConfig) -> Stage5Output {
    let mut by_category: BTreeMap<&str, Pair<'_>> = BTreeMap::new();
    for record in &dataset.records {
        let pair = by_category.entry(record.category.as_str()).or_default();
        let slot = match record.direction {
            Direction::High => &mut pair.high,
            Direction::Low => &mut pair.low,
        };
        if slot.is_none() {
            *slot = Some(record);
        }
    }

    let eps = config.kl_epsilon;
    let mut rows = Vec::with_capacity(by_category.len());
    let mut skipped = Vec::new();

    for (category, pair) in by_category {
        let (Some(high), Some(low)) = (pair.high, pair.low) else {
            tracing::debug!(
                "{}: category '{}' lacks a high or low record; skipped",
                dataset.key,
                category
            );
            skipped.push(category.to_string());
            continue;
        };
        rows.push(DivergenceRow {
            category: category.to_string(),
            divergence: AxisPair {
                gender: round_to(
                    kl_divergence_bits(&high.gender, &low.gender, eps),
                    config.decimals,
                ),
                race: round_to(
                    kl_divergence_bits(&high.race, &low.race, eps),
                    config.decimals,
                ),
            },
        });
    }

    // Always present: an empty table averages to zero.
    let average = AxisPair {
        gender: round_to(
            mean(rows.iter().map(|r| r.divergence.gender)).unwrap_or(0.0),
            config.decimals,
        ),
        race: round_to(
            mean(rows.iter().map(|r| r.divergence.race)).unwrap_or(0.0),
            config.decimals,
        ),
    };

    Stage5Output {
        table: ScoreTable {
            rows,
            average: Some(average),
        },
        skipped,
    }
}

/// D(p || q) in bits after adding `eps` to every component of both sides and
/// renormalizing. Clamped at zero.
pub fn kl_divergence_bits<const N: usize>(
    p: &Distribution<N>,
    q: &Distribution<N>,
    eps: f64,
) -> f64 {
    let p = smoothed(p, eps);
    let q = smoothed(q, eps);
    let mut kl = 0.0f64;
    for (pi, qi) in p.iter().zip(q.iter()) {
        if *pi <= 0.0 {
            continue;
        }
        if *qi <= 0.0 {
            return f64::INFINITY;
        }
        kl += pi * (pi / qi).log2();
    }
    if kl > 0.0 { kl } else { 0.0 }
}

fn smoothed<const N: usize>(dist: &Distribution<N>, eps: f64) -> [f64; N] {
    let mut out = *dist.masses();
    for m in &mut out {
        *m += eps;
    }
    let total: f64 = out.iter().sum();
    if total > 0.0 {
        for m in &mut out {
            *m /= total;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_divergence.rs"]
mod tests;
