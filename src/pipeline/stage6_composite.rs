use crate::model::classes::Axis;
use crate::model::config::ScoringConfig;
use crate::model::tables::{AxisPair, SummaryRow};
use crate::report::round_to;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeScore {
    pub fair: f64,
    pub kld: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRow {
    pub model: String,
    pub scores: AxisPair<CompositeScore>,
}

/// One line of the combined objective-test result, keyed by display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveRow {
    pub model: String,
    pub attribute: Axis,
    pub accuracy: Option<f64>,
    pub entropy_ratio: f64,
}

#[derive(Debug, Clone)]
pub struct Stage6Inputs<'a> {
    pub config: &'a ScoringConfig,
    pub accuracy: &'a [SummaryRow<Option<f64>>],
    pub entropy: &'a [SummaryRow<f64>],
    pub divergence: &'a [SummaryRow<f64>],
}

#[derive(Debug, Clone)]
pub struct Stage6Output {
    pub composites: Vec<CompositeRow>,
    pub objective: Vec<ObjectiveRow>,
}

pub fn run_stage6(inputs: &Stage6Inputs<'_>) -> Stage6Output {
    let decimals = inputs.config.decimals;

    // Inner join on model key, in divergence-summary order.
    let mut composites = Vec::with_capacity(inputs.divergence.len());
    for kl in inputs.divergence {
        let Some(entropy) = inputs.entropy.iter().find(|e| e.model == kl.model) else {
            tracing::warn!("no entropy summary for {}; composite skipped", kl.model);
            continue;
        };
        let score = |axis: Axis| {
            let s = composite_score(*entropy.values.get(axis), *kl.values.get(axis));
            CompositeScore {
                fair: round_to(s.fair, decimals),
                kld: round_to(s.kld, decimals),
            }
        };
        composites.push(CompositeRow {
            model: kl.model.clone(),
            scores: AxisPair {
                gender: score(Axis::Gender),
                race: score(Axis::Race),
            },
        });
    }

    let mut objective = Vec::new();
    for model in &inputs.config.models {
        let accuracy = inputs.accuracy.iter().find(|r| r.model == model.key);
        let entropy = inputs.entropy.iter().find(|r| r.model == model.key);
        for &attribute in &inputs.config.attributes {
            objective.push(ObjectiveRow {
                model: model.display_name.clone(),
                attribute,
                accuracy: accuracy.map_or(Some(0.0), |r| *r.values.get(attribute)),
                entropy_ratio: entropy.map_or(0.0, |r| *r.values.get(attribute)),
            });
        }
    }

    Stage6Output {
        composites,
        objective,
    }
}

/// `kld = exp(-kl)`; `fair = e + (1 - e) * kld`. A fully spread distribution
/// scores 1 whatever the divergence; a collapsed one falls back to `kld`.
pub fn composite_score(entropy_ratio: f64, kl_divergence: f64) -> CompositeScore {
    let kld = (-kl_divergence).exp();
    let fair = entropy_ratio + (1.0 - entropy_ratio) * kld;
    CompositeScore { fair, kld }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_composite.rs"]
mod tests;
