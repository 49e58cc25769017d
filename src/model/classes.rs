use serde::{Deserialize, Deserializer};

pub const GENDER_CLASS_COUNT: usize = 2;
pub const RACE_CLASS_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Gender,
    Race,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::Gender => "gender",
            Axis::Race => "race",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    High,
    Low,
}

impl Direction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Direction::High),
            "low" => Some(Direction::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::High => "high",
            Direction::Low => "low",
        }
    }
}

/// Lowercases a demographic label and folds `-`, `_` and whitespace runs into
/// single spaces, so `Latino-Hispanic` and `latino hispanic` compare equal.
pub fn canonical_label(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered, fixed-size set of class labels for one demographic axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSet<const N: usize> {
    labels: [String; N],
}

impl<const N: usize> ClassSet<N> {
    pub fn from_labels(labels: Vec<String>) -> Result<Self, String> {
        let found = labels.len();
        let labels: [String; N] = labels
            .into_iter()
            .map(|l| canonical_label(&l))
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| format!("expected {N} class labels, found {found}"))?;
        for (i, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err("class labels must not be empty".to_string());
            }
            if labels[..i].contains(label) {
                return Err(format!("duplicate class label '{label}'"));
            }
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String; N] {
        &self.labels
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        let canonical = canonical_label(label);
        self.labels.iter().position(|l| *l == canonical)
    }
}

impl ClassSet<GENDER_CLASS_COUNT> {
    pub fn gender_v1() -> Self {
        Self {
            labels: ["man".to_string(), "woman".to_string()],
        }
    }
}

impl ClassSet<RACE_CLASS_COUNT> {
    pub fn race_v1() -> Self {
        Self {
            labels: [
                "black".to_string(),
                "white".to_string(),
                "asian".to_string(),
                "latino hispanic".to_string(),
            ],
        }
    }
}

impl<'de, const N: usize> Deserialize<'de> for ClassSet<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let labels = Vec::<String>::deserialize(deserializer)?;
        ClassSet::from_labels(labels).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/classes.rs"]
mod tests;
