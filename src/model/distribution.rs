use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;

use crate::model::classes::{
    ClassSet, GENDER_CLASS_COUNT, RACE_CLASS_COUNT, canonical_label,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Labels outside the class set are dropped.
    #[default]
    Ignore,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),
    #[error("label '{label}' has invalid mass {value}")]
    InvalidMass { label: String, value: f64 },
    #[error("label '{0}' is not a known class")]
    UnknownLabel(String),
}

/// Non-negative masses over a fixed class set. Masses are relative weights and
/// are not required to sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution<const N: usize> {
    mass: [f64; N],
}

pub type GenderDistribution = Distribution<GENDER_CLASS_COUNT>;
pub type RaceDistribution = Distribution<RACE_CLASS_COUNT>;

impl<const N: usize> Distribution<N> {
    pub fn new(mass: [f64; N]) -> Result<Self, DistributionError> {
        for (idx, &value) in mass.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(DistributionError::InvalidMass {
                    label: format!("#{idx}"),
                    value,
                });
            }
        }
        Ok(Self { mass })
    }

    /// Builds a distribution from parsed `(label, mass)` pairs. Returns the
    /// pairs left out of the class set under [`LabelPolicy::Ignore`], with
    /// canonical labels.
    pub fn from_pairs(
        pairs: &[(String, f64)],
        classes: &ClassSet<N>,
        policy: LabelPolicy,
    ) -> Result<(Self, Vec<(String, f64)>), DistributionError> {
        let mut mass = [0.0f64; N];
        let mut seen = BTreeSet::new();
        let mut ignored = Vec::new();

        for (label, value) in pairs {
            let canonical = canonical_label(label);
            if !seen.insert(canonical.clone()) {
                return Err(DistributionError::DuplicateLabel(label.clone()));
            }
            if !value.is_finite() || *value < 0.0 {
                return Err(DistributionError::InvalidMass {
                    label: label.clone(),
                    value: *value,
                });
            }
            match classes.index_of(&canonical) {
                Some(idx) => mass[idx] = *value,
                None => match policy {
                    LabelPolicy::Ignore => ignored.push((canonical, *value)),
                    LabelPolicy::Reject => {
                        return Err(DistributionError::UnknownLabel(label.clone()));
                    }
                },
            }
        }

        Self::new(mass).map(|dist| (dist, ignored))
    }

    pub fn mass(&self, idx: usize) -> f64 {
        self.mass.get(idx).copied().unwrap_or(0.0)
    }

    pub fn masses(&self) -> &[f64; N] {
        &self.mass
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/distribution.rs"]
mod tests;
