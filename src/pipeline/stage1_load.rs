use std::path::Path;

use crate::input::records::load_model_dataset;
use crate::input::{InputError, resolve_input_path};
use crate::model::config::ScoringConfig;
use crate::model::records::ModelDataset;

/// Loads one dataset per registered model, in registry order.
pub fn run_stage1(
    distributions_dir: &Path,
    config: &ScoringConfig,
) -> Result<Vec<ModelDataset>, InputError> {
    let mut datasets = Vec::with_capacity(config.models.len());
    for model in &config.models {
        let path = resolve_input_path(distributions_dir, &model.file)?;
        let dataset = load_model_dataset(&model.key, &path, config)?;
        tracing::info!(
            "loaded {} records for {} from {}",
            dataset.records.len(),
            model.key,
            path.display()
        );
        if dataset.ignored_labels > 0 {
            tracing::debug!(
                "{}: {} labels outside the class sets were ignored",
                model.key,
                dataset.ignored_labels
            );
        }
        datasets.push(dataset);
    }
    Ok(datasets)
}
