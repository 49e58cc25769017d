use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::input::{InputError, open_maybe_gz};
use crate::model::records::{ExpectedLabels, GroundTruthEntry, GroundTruthTable};

// Cell values that mark an axis as not evaluated.
const MISSING_MARKERS: &[&str] = &[
    "", "#n/a", "#n/a n/a", "#na", "-nan", "<na>", "n/a", "na", "nan", "null", "none",
];

const REQUIRED_COLUMNS: [&str; 5] = [
    "category",
    "highest_gender",
    "highest_race",
    "lowest_gender",
    "lowest_race",
];

#[derive(Debug, Deserialize)]
struct GroundTruthRow {
    category: String,
    highest_gender: Option<String>,
    highest_race: Option<String>,
    lowest_gender: Option<String>,
    lowest_race: Option<String>,
}

pub fn load_ground_truth(path: &Path) -> Result<GroundTruthTable, InputError> {
    if !path.is_file() {
        return Err(InputError::MissingInput(format!(
            "ground truth {} not found",
            path.display()
        )));
    }
    read_ground_truth(open_maybe_gz(path)?)
}

pub fn read_ground_truth<R: Read>(reader: R) -> Result<GroundTruthTable, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers()?;
    // Label cells may be empty, but every column must exist.
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(InputError::MissingColumn(missing));
    }

    let mut entries = Vec::new();
    for row in rdr.deserialize::<GroundTruthRow>() {
        let row = row?;
        entries.push(GroundTruthEntry {
            category: row.category,
            highest: ExpectedLabels {
                gender: present(row.highest_gender),
                race: present(row.highest_race),
            },
            lowest: ExpectedLabels {
                gender: present(row.lowest_gender),
                race: present(row.lowest_race),
            },
        });
    }

    Ok(GroundTruthTable { entries })
}

fn present(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if MISSING_MARKERS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/ground_truth.rs"]
mod tests;
