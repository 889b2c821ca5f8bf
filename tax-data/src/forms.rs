//! CSV loader for batches of raw form submissions.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter and every
//! column is optional. Cells are kept as text and go through the same
//! tolerant parsing as interactive input: an empty or malformed amount is
//! zero, an unknown filing status is `single`.
//!
//! | Column                       | Type    | Notes |
//! |------------------------------|---------|-------|
//! | `label`                      | string  | Free-form row name, echoed in reports |
//! | `filing_status`              | string  | `single`, `married_joint`, `married_separate`, `head`, `widow` |
//! | `age`                        | integer | |
//! | `dependents`                 | integer | |
//! | `disability`                 | flag    | `true`/`yes`/`1` |
//! | `wages`                      | decimal | `1,234.56` accepted |
//! | `self_employment_income`     | decimal | |
//! | `investment_income`          | decimal | |
//! | `other_income`               | decimal | |
//! | `tax_withheld`               | decimal | |
//! | `student_loan_interest`      | decimal | |
//! | `charitable_contributions`   | decimal | |
//! | `medical_expenses`           | decimal | |
//! | `child_tax_credit_requested` | flag    | |
//! | `education_credit_requested` | flag    | |
//!
//! ### Example
//!
//! ```csv
//! label,filing_status,age,wages,tax_withheld
//! alice,single,28,400000,10000
//! ```

use std::path::Path;

use serde::Deserialize;
use tax_core::{FormValue, TaxForm};

/// Mirrors the CSV layout; every cell is optional text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    label: Option<String>,
    filing_status: Option<String>,
    age: Option<String>,
    dependents: Option<String>,
    disability: Option<String>,
    wages: Option<String>,
    self_employment_income: Option<String>,
    investment_income: Option<String>,
    other_income: Option<String>,
    tax_withheld: Option<String>,
    student_loan_interest: Option<String>,
    charitable_contributions: Option<String>,
    medical_expenses: Option<String>,
    child_tax_credit_requested: Option<String>,
    education_credit_requested: Option<String>,
}

/// Errors that can occur while loading form rows.
///
/// Only structural problems are errors. Bad values inside a well-formed row
/// never are.
#[derive(Debug, thiserror::Error)]
pub enum FormLoadError {
    #[error("cannot read form file: {0}")]
    Io(#[from] std::io::Error),

    /// Bad structure, such as a row with the wrong number of cells.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

/// One submission read from a batch file.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRecord {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub label: Option<String>,
    pub form: TaxForm,
}

impl FormRecord {
    /// The label if present, otherwise `row N`.
    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("row {}", self.row))
    }
}

fn text(cell: Option<String>) -> Option<FormValue> {
    cell.map(FormValue::Text)
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> FormRecord {
    FormRecord {
        row: row_number,
        label: row.label.filter(|label| !label.is_empty()),
        form: TaxForm {
            filing_status: row.filing_status,
            age: text(row.age),
            dependents: text(row.dependents),
            disability: text(row.disability),
            wages: text(row.wages),
            self_employment_income: text(row.self_employment_income),
            investment_income: text(row.investment_income),
            other_income: text(row.other_income),
            tax_withheld: text(row.tax_withheld),
            student_loan_interest: text(row.student_loan_interest),
            charitable_contributions: text(row.charitable_contributions),
            medical_expenses: text(row.medical_expenses),
            child_tax_credit_requested: text(row.child_tax_credit_requested),
            education_credit_requested: text(row.education_credit_requested),
        },
    }
}

/// Parses CSV text into form records, in file order.
///
/// # Errors
///
/// [`FormLoadError::Parse`] if the CSV is structurally invalid.
pub fn load_forms_from_str(input: &str) -> Result<Vec<FormRecord>, FormLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let records = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| Ok(convert_row(result?, idx + 1)))
        .collect::<Result<Vec<_>, FormLoadError>>()?;

    tracing::debug!(rows = records.len(), "loaded form rows");
    Ok(records)
}

/// Reads `path` and delegates to [`load_forms_from_str`].
///
/// # Errors
///
/// [`FormLoadError::Io`] when the file cannot be read, otherwise as
/// [`load_forms_from_str`].
pub fn load_forms_from_file(path: &Path) -> Result<Vec<FormRecord>, FormLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_forms_from_str(&contents)
}
