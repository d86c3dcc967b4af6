//! CSV loader for batch simulation inputs.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name).
//!
//! | Column         | Required | Notes                                           |
//! |----------------|----------|-------------------------------------------------|
//! | `profession`   | yes      | `employee` or `self_employed`                   |
//! | `income`       | yes      | decimal, grouping separators are tolerated      |
//! | `contribution` | yes      | decimal, same period as the income              |
//! | `period`       | no       | `monthly` (default) or `annual`                 |
//!
//! The self-employed are always simulated annually whatever `period` says.
//!
//! ### Example
//!
//! ```csv
//! profession,income,contribution,period
//! employee,5000,1000,monthly
//! self_employed,100000,20000,
//! ```
use std::path::Path;

use savings_core::{Period, Profession, SimulationInput};
use serde::Deserialize;

use crate::models::{FormErrors, SimulationForm};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

/// Amounts stay raw so they go through the same validation as typed input.
#[derive(Debug, Deserialize)]
struct CsvRow {
    profession: String,
    income: String,
    contribution: String,
    #[serde(default)]
    period: Option<String>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading batch inputs. Row numbers are
/// 1-based and exclude the header.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised profession '{value}' on row {row}")]
    InvalidProfession { value: String, row: usize },

    #[error("unrecognised period '{value}' on row {row}")]
    InvalidPeriod { value: String, row: usize },

    #[error("invalid input on row {row}: {errors}")]
    InvalidInput { row: usize, errors: FormErrors },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<SimulationInput, CsvLoadError> {
    let profession =
        Profession::parse(&row.profession).ok_or_else(|| CsvLoadError::InvalidProfession {
            value: row.profession.clone(),
            row: row_number,
        })?;

    let period = match row.period.as_deref().map(str::trim) {
        None | Some("") => Period::default(),
        Some(value) => Period::parse(value).ok_or_else(|| CsvLoadError::InvalidPeriod {
            value: value.to_string(),
            row: row_number,
        })?,
    };

    let form = SimulationForm {
        profession,
        period,
        income: row.income,
        contribution: row.contribution,
    };
    form.validate().map_err(|errors| CsvLoadError::InvalidInput {
        row: row_number,
        errors,
    })
}

/// Parse CSV text and return one [`SimulationInput`] per row, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid or a required
///   column is missing.
/// * [`CsvLoadError::InvalidProfession`] / [`CsvLoadError::InvalidPeriod`]
///   for unknown codes.
/// * [`CsvLoadError::InvalidInput`] when an amount fails form validation.
pub fn load_from_str(input: &str) -> Result<Vec<SimulationInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<SimulationInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
