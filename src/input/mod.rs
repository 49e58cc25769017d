use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub mod ground_truth;
pub mod literal;
pub mod records;

use crate::model::distribution::DistributionError;
use literal::LiteralError;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("{}:{line}: malformed {column}: {source}", path.display())]
    Literal {
        path: PathBuf,
        line: u64,
        column: &'static str,
        source: LiteralError,
    },
    #[error("{}:{line}: invalid {column}: {source}", path.display())]
    Distribution {
        path: PathBuf,
        line: u64,
        column: &'static str,
        source: DistributionError,
    },
    #[error("{}:{line}: invalid direction {value:?} (use high|low)", path.display())]
    Direction {
        path: PathBuf,
        line: u64,
        value: String,
    },
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, InputError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(MultiGzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Resolves `name` under `dir`, falling back to a gzipped sibling.
pub fn resolve_input_path(dir: &Path, name: &str) -> Result<PathBuf, InputError> {
    let plain = dir.join(name);
    if plain.is_file() {
        return Ok(plain);
    }
    let gz = dir.join(format!("{name}.gz"));
    if gz.is_file() {
        return Ok(gz);
    }
    Err(InputError::MissingInput(format!(
        "{} (or {}.gz) not found",
        plain.display(),
        name
    )))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
