use std::collections::BTreeMap;

use crate::model::classes::{Axis, ClassSet, Direction};
use crate::model::config::ScoringConfig;
use crate::model::records::{ExpectedLabels, GroundTruthTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    NotEvaluated,
    /// Index into the axis class set.
    Class(usize),
    /// Canonical label that no class in the set matches; scored against the
    /// record's unlisted labels, zero when absent.
    Unlisted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTruth {
    pub gender: Expectation,
    pub race: Expectation,
}

#[derive(Debug, Clone, Default)]
pub struct GroundTruthResolver {
    by_category: BTreeMap<String, (ResolvedTruth, ResolvedTruth)>,
}

impl GroundTruthResolver {
    pub fn new(table: &GroundTruthTable, config: &ScoringConfig) -> Self {
        let mut by_category = BTreeMap::new();
        for entry in &table.entries {
            let key = entry.category.trim().to_lowercase();
            if by_category.contains_key(&key) {
                tracing::debug!(
                    "duplicate ground-truth category '{}'; keeping first",
                    entry.category
                );
                continue;
            }
            let high = resolve_labels(&entry.category, entry.expected(Direction::High), config);
            let low = resolve_labels(&entry.category, entry.expected(Direction::Low), config);
            by_category.insert(key, (high, low));
        }
        Self { by_category }
    }

    pub fn resolve(&self, category: &str, direction: Direction) -> Option<&ResolvedTruth> {
        let key = normalize_category(category).trim().to_lowercase();
        let (high, low) = self.by_category.get(&key)?;
        Some(match direction {
            Direction::High => high,
            Direction::Low => low,
        })
    }
}

/// `some_category` becomes `Some Category`.
pub fn normalize_category(raw: &str) -> String {
    title_case(&raw.replace('_', " "))
}

pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

fn resolve_labels(
    category: &str,
    labels: &ExpectedLabels,
    config: &ScoringConfig,
) -> ResolvedTruth {
    let gender = labels.gender.as_deref().map(|l| config.canonical_gender(l));
    let race = labels.race.as_deref().map(|l| config.canonical_race(l));
    ResolvedTruth {
        gender: expectation(category, Axis::Gender, gender, &config.gender_classes),
        race: expectation(category, Axis::Race, race, &config.race_classes),
    }
}

fn expectation<const N: usize>(
    category: &str,
    axis: Axis,
    label: Option<String>,
    classes: &ClassSet<N>,
) -> Expectation {
    let Some(label) = label else {
        return Expectation::NotEvaluated;
    };
    match classes.index_of(&label) {
        Some(idx) => Expectation::Class(idx),
        None => {
            tracing::warn!(
                "ground truth for '{}' names {} label '{}' outside the class set",
                category,
                axis.name(),
                label
            );
            Expectation::Unlisted(label)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_resolve.rs"]
mod tests;
