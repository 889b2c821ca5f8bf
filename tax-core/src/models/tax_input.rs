use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::FilingStatus;
use crate::parse::{amount_from_f64, count_from_decimal, parse_amount, parse_count, parse_flag};

/// Validated, fully numeric figures for one refund calculation.
///
/// Built fresh per submission (usually via [`TaxForm::to_input`]) and never
/// mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxInput {
    pub filing_status: FilingStatus,
    pub age: u32,
    pub dependents: u32,
    pub disability: bool,

    // Income
    pub wages: Decimal,
    pub self_employment_income: Decimal,
    pub investment_income: Decimal,
    pub other_income: Decimal,

    pub tax_withheld: Decimal,

    // Itemizable expenses
    pub student_loan_interest: Decimal,
    pub charitable_contributions: Decimal,
    pub medical_expenses: Decimal,

    // Credit checkboxes
    pub child_tax_credit_requested: bool,
    pub education_credit_requested: bool,
}

impl TaxInput {
    /// Sum of all income fields. Saturates at `Decimal::MAX`.
    pub fn total_income(&self) -> Decimal {
        [self.self_employment_income, self.investment_income, self.other_income]
            .into_iter()
            .fold(self.wages, Decimal::saturating_add)
    }

    /// Sum of all itemizable expenses. Saturates at `Decimal::MAX`.
    pub fn itemized_total(&self) -> Decimal {
        [self.charitable_contributions, self.medical_expenses]
            .into_iter()
            .fold(self.student_loan_interest, Decimal::saturating_add)
    }
}

/// A single raw form value. Forms hand over numbers, strings, or checkbox
/// booleans interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FormValue {
    pub fn as_amount(&self) -> Decimal {
        match self {
            Self::Flag(_) => Decimal::ZERO,
            Self::Integer(n) if *n < 0 => Decimal::ZERO,
            Self::Integer(n) => Decimal::from(*n),
            Self::Float(f) => amount_from_f64(*f),
            Self::Text(s) => parse_amount(s),
        }
    }

    pub fn as_count(&self) -> u32 {
        match self {
            Self::Text(s) => parse_count(s),
            other => count_from_decimal(other.as_amount()),
        }
    }

    pub fn as_flag(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && f.is_finite(),
            Self::Text(s) => parse_flag(s),
        }
    }

    /// Text value as entered, used by the presentation layer to decide
    /// whether a field was filled in at all.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// Raw form state as submitted. Every field may be missing or malformed;
/// [`TaxForm::to_input`] turns it into a [`TaxInput`] without failing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxForm {
    #[serde(alias = "filingStatus")]
    pub filing_status: Option<String>,
    pub age: Option<FormValue>,
    pub dependents: Option<FormValue>,
    pub disability: Option<FormValue>,
    pub wages: Option<FormValue>,
    #[serde(alias = "selfEmploymentIncome")]
    pub self_employment_income: Option<FormValue>,
    #[serde(alias = "investmentIncome")]
    pub investment_income: Option<FormValue>,
    #[serde(alias = "otherIncome")]
    pub other_income: Option<FormValue>,
    #[serde(alias = "taxWithheld")]
    pub tax_withheld: Option<FormValue>,
    #[serde(alias = "studentLoanInterest")]
    pub student_loan_interest: Option<FormValue>,
    #[serde(alias = "charitableContributions")]
    pub charitable_contributions: Option<FormValue>,
    #[serde(alias = "medicalExpenses")]
    pub medical_expenses: Option<FormValue>,
    #[serde(alias = "childTaxCreditRequested")]
    pub child_tax_credit_requested: Option<FormValue>,
    #[serde(alias = "educationCreditRequested")]
    pub education_credit_requested: Option<FormValue>,
}

fn amount(value: &Option<FormValue>) -> Decimal {
    value.as_ref().map_or(Decimal::ZERO, FormValue::as_amount)
}

fn count(value: &Option<FormValue>) -> u32 {
    value.as_ref().map_or(0, FormValue::as_count)
}

fn flag(value: &Option<FormValue>) -> bool {
    value.as_ref().is_some_and(FormValue::as_flag)
}

impl TaxForm {
    pub fn to_input(&self) -> TaxInput {
        TaxInput {
            filing_status: self
                .filing_status
                .as_deref()
                .map(FilingStatus::parse_or_default)
                .unwrap_or_default(),
            age: count(&self.age),
            dependents: count(&self.dependents),
            disability: flag(&self.disability),
            wages: amount(&self.wages),
            self_employment_income: amount(&self.self_employment_income),
            investment_income: amount(&self.investment_income),
            other_income: amount(&self.other_income),
            tax_withheld: amount(&self.tax_withheld),
            student_loan_interest: amount(&self.student_loan_interest),
            charitable_contributions: amount(&self.charitable_contributions),
            medical_expenses: amount(&self.medical_expenses),
            child_tax_credit_requested: flag(&self.child_tax_credit_requested),
            education_credit_requested: flag(&self.education_credit_requested),
        }
    }

    /// Named numeric fields in form order, for presentation-layer checks.
    pub fn amount_fields(&self) -> [(&'static str, Option<&FormValue>); 8] {
        [
            ("wages", self.wages.as_ref()),
            ("self_employment_income", self.self_employment_income.as_ref()),
            ("investment_income", self.investment_income.as_ref()),
            ("other_income", self.other_income.as_ref()),
            ("tax_withheld", self.tax_withheld.as_ref()),
            ("student_loan_interest", self.student_loan_interest.as_ref()),
            ("charitable_contributions", self.charitable_contributions.as_ref()),
            ("medical_expenses", self.medical_expenses.as_ref()),
        ]
    }
}
