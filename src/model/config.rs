use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::classes::{
    Axis, ClassSet, GENDER_CLASS_COUNT, RACE_CLASS_COUNT, canonical_label,
};
use crate::model::distribution::LabelPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    pub key: String,
    pub file: String,
    pub display_name: String,
}

impl ModelSpec {
    fn new(key: &str, file: &str, display_name: &str) -> Self {
        Self {
            key: key.to_string(),
            file: file.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub gender_classes: ClassSet<GENDER_CLASS_COUNT>,
    pub race_classes: ClassSet<RACE_CLASS_COUNT>,
    pub gender_synonyms: BTreeMap<String, String>,
    pub race_synonyms: BTreeMap<String, String>,
    pub entropy_epsilon: f64,
    pub kl_epsilon: f64,
    pub decimals: u32,
    pub models: Vec<ModelSpec>,
    pub attributes: Vec<Axis>,
    pub label_policy: LabelPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

impl ScoringConfig {
    pub fn default_v1() -> Self {
        let synonyms = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            gender_classes: ClassSet::gender_v1(),
            race_classes: ClassSet::race_v1(),
            gender_synonyms: synonyms(&[("male", "man"), ("female", "woman")]),
            race_synonyms: synonyms(&[
                ("white", "white"),
                ("black", "black"),
                ("asian", "asian"),
                ("hispanic", "latino hispanic"),
            ]),
            entropy_epsilon: 1e-10,
            kl_epsilon: 1e-10,
            decimals: 4,
            models: vec![
                ModelSpec::new(
                    "flux-1.1-pro",
                    "flux-1.1-pro_distribution.csv",
                    "flux-1.1-pro",
                ),
                ModelSpec::new("dalle3", "dalle3_distribution.csv", "dall-e-3"),
                ModelSpec::new("midjourney", "midjourney_distribution.csv", "midjourney"),
                ModelSpec::new("sdxl_turbo", "sdxl-turbo_distribution.csv", "sdxl-turbo"),
            ],
            attributes: vec![Axis::Gender, Axis::Race],
            label_policy: LabelPolicy::Ignore,
        }
    }

    /// Built-in profile, optionally overridden field by field from a JSON file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                serde_json::from_str::<ScoringConfig>(&text)?
            }
            None => Self::default_v1(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::Invalid("model registry is empty".to_string()));
        }
        let mut keys = BTreeSet::new();
        for model in &self.models {
            if model.key.trim().is_empty() || model.file.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "model key and file must not be empty".to_string(),
                ));
            }
            if !keys.insert(model.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate model key '{}'",
                    model.key
                )));
            }
        }
        for (name, eps) in [
            ("entropy_epsilon", self.entropy_epsilon),
            ("kl_epsilon", self.kl_epsilon),
        ] {
            if !eps.is_finite() || eps < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {eps}"
                )));
            }
        }
        if self.decimals > 10 {
            return Err(ConfigError::Invalid(format!(
                "decimals must be at most 10, got {}",
                self.decimals
            )));
        }
        if self.attributes.is_empty() {
            return Err(ConfigError::Invalid("attribute list is empty".to_string()));
        }
        Ok(())
    }

    pub fn canonical_gender(&self, raw: &str) -> String {
        map_synonym(&self.gender_synonyms, raw)
    }

    pub fn canonical_race(&self, raw: &str) -> String {
        map_synonym(&self.race_synonyms, raw)
    }
}

fn map_synonym(table: &BTreeMap<String, String>, raw: &str) -> String {
    let label = canonical_label(raw);
    table
        .iter()
        .find(|(from, _)| canonical_label(from) == label)
        .map(|(_, to)| canonical_label(to))
        .unwrap_or(label)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/config.rs"]
mod tests;
