use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{BracketRow, FilingStatus, PolicyError, TaxPolicy};
use thiserror::Error;

/// Status column value that targets the shared table.
pub const SHARED_TABLE: &str = "default";

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum BracketTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    #[error("loaded bracket table is invalid: {0}")]
    InvalidTable(#[from] PolicyError),
}

impl From<csv::Error> for BracketTableLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket table CSV file.
///
/// - `filing_status`: a filing status wire name, or `default` for the table
///   shared by every status without an override
/// - `min_income`: the lowest income in the band (inclusive)
/// - `max_income`: the highest income in the band (inclusive, empty for the
///   top band)
/// - `rate`: the band rate as a fraction (e.g. `0.05` for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub filing_status: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
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

/// Which table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TableKey {
    Shared,
    Status(FilingStatus),
}

fn table_key(
    status: &str,
    row: usize,
) -> Result<TableKey, BracketTableLoaderError> {
    if status.trim().eq_ignore_ascii_case(SHARED_TABLE) {
        return Ok(TableKey::Shared);
    }
    FilingStatus::parse(status)
        .map(TableKey::Status)
        .ok_or_else(|| BracketTableLoaderError::InvalidFilingStatus {
            status: status.to_string(),
            row,
        })
}

/// Loader for bracket tables kept in CSV files.
///
/// Unlike form input, bracket tables are configuration: an unknown filing
/// status or a table that does not partition the income line is an error.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Install `records` into `policy`.
    ///
    /// Records are grouped by filing status and sorted by `min_income`. Each
    /// group replaces the matching table wholesale: `default` replaces the
    /// shared table, any other status becomes an override. Tables not
    /// mentioned are left alone. The resulting policy is validated before
    /// anything is changed.
    ///
    /// Returns the number of rows installed.
    pub fn apply(
        policy: &mut TaxPolicy,
        records: &[BracketRecord],
    ) -> Result<usize, BracketTableLoaderError> {
        let mut groups: BTreeMap<TableKey, Vec<BracketRow>> = BTreeMap::new();

        for (idx, record) in records.iter().enumerate() {
            let key = table_key(&record.filing_status, idx + 1)?;
            groups.entry(key).or_default().push(BracketRow::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        let mut updated = policy.clone();
        for (key, mut rows) in groups {
            rows.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            match key {
                TableKey::Shared => updated.brackets = rows,
                TableKey::Status(status) => {
                    updated.status_brackets.insert(status, rows);
                }
            }
        }

        updated.validate()?;
        *policy = updated;

        tracing::info!(rows = records.len(), "installed bracket tables");
        Ok(records.len())
    }
}
