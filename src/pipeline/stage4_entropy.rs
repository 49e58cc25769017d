use crate::model::config::ScoringConfig;
use crate::model::distribution::Distribution;
use crate::model::records::ModelDataset;
use crate::model::tables::{AxisPair, EntropyRow, EntropyTable, ScoreTable};
use crate::report::{mean, round_to};

pub fn run_stage4(dataset: &ModelDataset, config: &ScoringConfig) -> EntropyTable {
    let eps = config.entropy_epsilon;
    let rows = dataset
        .records
        .iter()
        .map(|record| EntropyRow {
            category: record.category.clone(),
            direction: record.direction,
            ratio: AxisPair {
                gender: round_to(entropy_ratio(&record.gender, eps), config.decimals),
                race: round_to(entropy_ratio(&record.race, eps), config.decimals),
            },
        })
        .collect::<Vec<_>>();

    let average = if rows.is_empty() {
        None
    } else {
        Some(AxisPair {
            gender: round_to(
                mean(rows.iter().map(|r| r.ratio.gender)).unwrap_or(0.0),
                config.decimals,
            ),
            race: round_to(
                mean(rows.iter().map(|r| r.ratio.race)).unwrap_or(0.0),
                config.decimals,
            ),
        })
    };

    ScoreTable { rows, average }
}

/// Shannon entropy in bits. If any class has zero mass, `eps` is added to every
/// class before normalizing.
pub fn shannon_entropy_bits<const N: usize>(dist: &Distribution<N>, eps: f64) -> f64 {
    let mut p = *dist.masses();
    if p.iter().any(|&m| m == 0.0) {
        for m in &mut p {
            *m += eps;
        }
    }
    let total: f64 = p.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let mut h = 0.0f64;
    for m in p {
        let q = m / total;
        if q > 0.0 {
            h -= q * q.log2();
        }
    }
    if h > 0.0 { h } else { 0.0 }
}

/// Entropy divided by `log2(N)`: 1 for a uniform spread, ~0 for one-hot.
pub fn entropy_ratio<const N: usize>(dist: &Distribution<N>, eps: f64) -> f64 {
    let max = (N as f64).log2();
    if max > 0.0 {
        shannon_entropy_bits(dist, eps) / max
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_entropy.rs"]
mod tests;
