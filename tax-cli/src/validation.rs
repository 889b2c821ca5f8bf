//! Submission checks for raw forms.
//!
//! The engine accepts anything; these checks decide what the user is told
//! before it runs. Blocking issues stop the submission, the rest are
//! warnings about values that will be read as zero or as `single`.

use std::sync::LazyLock;

use regex::Regex;
use tax_core::{FilingStatus, FormValue, TaxForm};
use thiserror::Error;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d[\d,]*(\.\d+)?([eE][+-]?\d+)?$|^\.\d+$").expect("number pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormIssue {
    #[error("age must be a positive whole number")]
    AgeNotPositive,

    #[error("wages must be entered")]
    WagesMissing,

    #[error("{field}: '{value}' is not a valid amount and will be treated as 0")]
    NotNumeric { field: &'static str, value: String },

    #[error("filing status '{0}' is not recognised, single will be used")]
    UnknownFilingStatus(String),
}

impl FormIssue {
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::AgeNotPositive | Self::WagesMissing)
    }
}

/// Blocking issues that stopped a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form cannot be submitted: {}", join_issues(.0))]
pub struct IncompleteForm(pub Vec<FormIssue>);

fn join_issues(issues: &[FormIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn looks_numeric(value: &FormValue) -> bool {
    match value {
        FormValue::Text(s) => NUMBER.is_match(s.trim()),
        FormValue::Integer(n) => *n >= 0,
        FormValue::Float(f) => f.is_finite() && *f >= 0.0,
        FormValue::Flag(_) => false,
    }
}

fn display_value(value: &FormValue) -> String {
    match value {
        FormValue::Text(s) => s.clone(),
        FormValue::Integer(n) => n.to_string(),
        FormValue::Float(f) => f.to_string(),
        FormValue::Flag(b) => b.to_string(),
    }
}

fn is_missing(value: Option<&FormValue>) -> bool {
    value.is_none_or(FormValue::is_blank)
}

/// All issues with `form`, blocking ones first, in form order.
pub fn check_form(form: &TaxForm) -> Vec<FormIssue> {
    let mut blocking = Vec::new();
    let mut warnings = Vec::new();

    let age = form.age.as_ref();
    if is_missing(age) || age.is_some_and(|a| a.as_count() == 0) {
        blocking.push(FormIssue::AgeNotPositive);
    }
    if is_missing(form.wages.as_ref()) {
        blocking.push(FormIssue::WagesMissing);
    }

    if let Some(status) = form.filing_status.as_deref()
        && !status.trim().is_empty()
        && FilingStatus::parse(status).is_none()
    {
        warnings.push(FormIssue::UnknownFilingStatus(status.to_string()));
    }

    let counts = [("age", form.age.as_ref()), ("dependents", form.dependents.as_ref())];
    for (field, value) in counts.into_iter().chain(form.amount_fields()) {
        if let Some(value) = value
            && !value.is_blank()
            && !looks_numeric(value)
        {
            warnings.push(FormIssue::NotNumeric {
                field,
                value: display_value(value),
            });
        }
    }

    blocking.extend(warnings);
    blocking
}

/// Splits issues into a blocking error or a list of warnings.
pub fn validate_for_submit(form: &TaxForm) -> Result<Vec<FormIssue>, IncompleteForm> {
    let issues = check_form(form);
    if issues.iter().any(FormIssue::is_blocking) {
        return Err(IncompleteForm(
            issues.into_iter().filter(FormIssue::is_blocking).collect(),
        ));
    }
    Ok(issues)
}
