use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use savings_core::{BracketTable, BracketTableError, BracketTables, Period, TaxBracket};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum BracketTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid period '{period}' on row {row}")]
    InvalidPeriod { period: String, row: usize },

    #[error("No {0} brackets found")]
    MissingPeriod(Period),

    #[error("Invalid {period} table: {source}")]
    InvalidTable {
        period: Period,
        #[source]
        source: BracketTableError,
    },
}

impl From<csv::Error> for BracketTableLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket CSV file.
///
/// - `period`: `monthly` or `annual`
/// - `min_income`: lower bound of the bracket
/// - `max_income`: upper bound (empty for the unbounded top bracket)
/// - `rate`: marginal rate as a decimal (e.g. 0.10 for 10%)
/// - `deduction`: fixed deduction of the quick-method formula
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub period: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl From<&BracketRecord> for TaxBracket {
    fn from(record: &BracketRecord) -> Self {
        TaxBracket::new(
            record.min_income,
            record.max_income,
            record.rate,
            record.deduction,
        )
    }
}

/// Loader for custom bracket schedules stored as CSV.
///
/// One file carries both schedules; rows are told apart by the `period`
/// column and keep their file order within each schedule.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// Headers are matched by name, so column order does not matter.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed bracket records");
        Ok(records)
    }

    /// Split records by period and validate each schedule.
    ///
    /// # Errors
    ///
    /// - [`BracketTableLoaderError::InvalidPeriod`] for an unknown `period`
    ///   value (row numbers are 1-based, header excluded)
    /// - [`BracketTableLoaderError::MissingPeriod`] when a schedule has no rows
    /// - [`BracketTableLoaderError::InvalidTable`] when a schedule breaks the
    ///   partition invariant
    pub fn build(records: &[BracketRecord]) -> Result<BracketTables, BracketTableLoaderError> {
        let mut monthly = Vec::new();
        let mut annual = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let period = Period::parse(&record.period).ok_or_else(|| {
                BracketTableLoaderError::InvalidPeriod {
                    period: record.period.clone(),
                    row: idx + 1,
                }
            })?;
            match period {
                Period::Monthly => monthly.push(TaxBracket::from(record)),
                Period::Annual => annual.push(TaxBracket::from(record)),
            }
        }

        let monthly = Self::table(Period::Monthly, monthly)?;
        let annual = Self::table(Period::Annual, annual)?;

        BracketTables::new(monthly, annual).map_err(|source| {
            BracketTableLoaderError::InvalidTable {
                period: Period::Annual,
                source,
            }
        })
    }

    /// Read, parse and validate a bracket file.
    pub fn load_file(path: &Path) -> Result<BracketTables, BracketTableLoaderError> {
        let file = File::open(path).map_err(|source| BracketTableLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records = Self::parse(file)?;
        let tables = Self::build(&records)?;
        debug!(path = %path.display(), "loaded bracket tables");
        Ok(tables)
    }

    fn table(
        period: Period,
        brackets: Vec<TaxBracket>,
    ) -> Result<BracketTable, BracketTableLoaderError> {
        if brackets.is_empty() {
            return Err(BracketTableLoaderError::MissingPeriod(period));
        }
        BracketTable::new(period, brackets)
            .map_err(|source| BracketTableLoaderError::InvalidTable { period, source })
    }
}
