pub mod stage1_load;
pub mod stage2_resolve;
pub mod stage3_accuracy;
pub mod stage4_entropy;
pub mod stage5_divergence;
pub mod stage6_composite;
pub mod stage7_report;

use std::path::PathBuf;

use crate::model::config::ScoringConfig;
use crate::model::records::ModelDataset;
use crate::model::tables::{EntropyTable, SummaryRow};
use crate::pipeline::stage2_resolve::GroundTruthResolver;
use crate::pipeline::stage3_accuracy::{Stage3Output, run_stage3};
use crate::pipeline::stage4_entropy::run_stage4;
use crate::pipeline::stage5_divergence::{Stage5Output, run_stage5};

/// Every per-model table derived from one dataset.
#[derive(Debug, Clone)]
pub struct ModelScores {
    pub key: String,
    pub source: PathBuf,
    pub records: usize,
    pub ignored_labels: usize,
    pub accuracy: Stage3Output,
    pub entropy: EntropyTable,
    pub divergence: Stage5Output,
}

pub fn score_model(
    dataset: &ModelDataset,
    resolver: &GroundTruthResolver,
    config: &ScoringConfig,
) -> ModelScores {
    ModelScores {
        key: dataset.key.clone(),
        source: dataset.source.clone(),
        records: dataset.records.len(),
        ignored_labels: dataset.ignored_labels,
        accuracy: run_stage3(dataset, resolver, config),
        entropy: run_stage4(dataset, config),
        divergence: run_stage5(dataset, config),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Summaries {
    pub accuracy: Vec<SummaryRow<Option<f64>>>,
    pub entropy: Vec<SummaryRow<f64>>,
    pub divergence: Vec<SummaryRow<f64>>,
}

/// One row per model per metric. Models with empty tables summarize to zero.
pub fn build_summaries(models: &[ModelScores]) -> Summaries {
    let mut out = Summaries::default();
    for m in models {
        out.accuracy.push(SummaryRow {
            model: m.key.clone(),
            values: m.accuracy.summary(),
        });
        out.entropy.push(SummaryRow {
            model: m.key.clone(),
            values: m.entropy.average.unwrap_or_default(),
        });
        out.divergence.push(SummaryRow {
            model: m.key.clone(),
            values: m.divergence.summary(),
        });
    }
    out
}
