use serde::Serialize;

use crate::model::tables::AxisPair;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub version: String,
    pub input: InputSummary,
    pub models: Vec<ModelRunSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub distributions: String,
    pub ground_truth: String,
    pub label_policy: String,
    pub gender_classes: Vec<String>,
    pub race_classes: Vec<String>,
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelRunSummary {
    pub key: String,
    pub display_name: String,
    pub source: String,
    pub records: usize,
    pub ignored_labels: usize,
    pub accuracy_rows: usize,
    pub unmatched_categories: Vec<String>,
    pub entropy_rows: usize,
    pub divergence_rows: usize,
    pub skipped_categories: Vec<String>,
    pub accuracy: AxisPair<Option<f64>>,
    pub entropy_ratio: AxisPair<f64>,
    pub kl_divergence: AxisPair<f64>,
    pub fair_score: Option<AxisPair<f64>>,
    pub kld_score: Option<AxisPair<f64>>,
}

pub fn render_summary_json(summary: &RunSummary) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(summary)?;
    out.push('\n');
    Ok(out)
}
