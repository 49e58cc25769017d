use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::input::literal::parse_mapping_literal;
use crate::input::{InputError, open_maybe_gz};
use crate::model::classes::{ClassSet, Direction};
use crate::model::config::ScoringConfig;
use crate::model::distribution::Distribution;
use crate::model::records::{CategoryRecord, ModelDataset};
use crate::model::tables::AxisPair;

#[derive(Debug, Deserialize)]
struct DistributionRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "High or Low")]
    direction: String,
    #[serde(rename = "Gender Distribution")]
    gender: String,
    #[serde(rename = "Race Distribution")]
    race: String,
}

pub fn load_model_dataset(
    key: &str,
    path: &Path,
    config: &ScoringConfig,
) -> Result<ModelDataset, InputError> {
    let reader = open_maybe_gz(path)?;
    let (records, ignored_labels) = read_category_records(reader, path, config)?;
    Ok(ModelDataset {
        key: key.to_string(),
        source: path.to_path_buf(),
        records,
        ignored_labels,
    })
}

/// Reads every row of a distribution table. `path` is only used for error
/// context. Returns the records and the number of dropped labels.
pub fn read_category_records<R: Read>(
    reader: R,
    path: &Path,
    config: &ScoringConfig,
) -> Result<(Vec<CategoryRecord>, usize), InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    let mut ignored_labels = 0usize;

    for result in rdr.records() {
        let raw = result?;
        let line = raw.position().map(|p| p.line()).unwrap_or(0);
        let row: DistributionRow = raw.deserialize(Some(&headers))?;

        let direction =
            Direction::parse(&row.direction).ok_or_else(|| InputError::Direction {
                path: path.to_path_buf(),
                line,
                value: row.direction.clone(),
            })?;

        let (gender, dropped_gender) = parse_distribution(
            &row.gender,
            &config.gender_classes,
            config,
            path,
            line,
            "Gender Distribution",
        )?;
        let (race, dropped_race) = parse_distribution(
            &row.race,
            &config.race_classes,
            config,
            path,
            line,
            "Race Distribution",
        )?;

        for (label, _) in dropped_gender.iter().chain(dropped_race.iter()) {
            tracing::debug!(
                "{}:{}: ignoring label '{}' outside the class set",
                path.display(),
                line,
                label
            );
        }
        ignored_labels += dropped_gender.len() + dropped_race.len();

        records.push(CategoryRecord {
            category: row.category,
            direction,
            gender,
            race,
            unlisted: AxisPair {
                gender: dropped_gender,
                race: dropped_race,
            },
        });
    }

    Ok((records, ignored_labels))
}

fn parse_distribution<const N: usize>(
    text: &str,
    classes: &ClassSet<N>,
    config: &ScoringConfig,
    path: &Path,
    line: u64,
    column: &'static str,
) -> Result<(Distribution<N>, Vec<(String, f64)>), InputError> {
    let pairs = parse_mapping_literal(text).map_err(|source| InputError::Literal {
        path: path.to_path_buf(),
        line,
        column,
        source,
    })?;
    Distribution::from_pairs(&pairs, classes, config.label_policy).map_err(|source| {
        InputError::Distribution {
            path: path.to_path_buf(),
            line,
            column,
            source,
        }
    })
}
