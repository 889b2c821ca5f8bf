use std::collections::BTreeMap;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BracketRow, FilingStatus};

/// Problems found when checking a [`TaxPolicy`] loaded from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("bracket table for {0} is empty")]
    EmptyTable(String),

    #[error("bracket table for {table} starts at {min} instead of 0")]
    DoesNotStartAtZero { table: String, min: Decimal },

    #[error("bracket table for {table} has a gap or overlap before row {row}")]
    NotContiguous { table: String, row: usize },

    #[error("bracket table for {table}: only the last row may be unbounded (row {row})")]
    UnboundedBeforeEnd { table: String, row: usize },

    #[error("bracket table for {table} does not end with an unbounded row")]
    BoundedTop { table: String },

    #[error("bracket table for {table}: row {row} has max below min")]
    InvertedRow { table: String, row: usize },

    #[error("bracket table for {table}: rate {rate} on row {row} is outside [0, 1]")]
    RateOutOfRange {
        table: String,
        row: usize,
        rate: Decimal,
    },

    #[error("{0} must not be negative")]
    NegativeAmount(String),
}

/// Credit parameters: a per-dependent amount with an aggregate cap, and a cap
/// on the education credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditLimits {
    pub per_dependent: Decimal,
    pub dependent_cap: Decimal,
    pub education_cap: Decimal,
}

impl Default for CreditLimits {
    fn default() -> Self {
        Self {
            per_dependent: Decimal::from(25_000),
            dependent_cap: Decimal::from(150_000),
            education_cap: Decimal::from(50_000),
        }
    }
}

/// All rule constants the engine reads: bracket tables, standard deductions
/// and credit limits.
///
/// Missing fields in a configuration file fall back to the built-in values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxPolicy {
    /// Table shared by every filing status without an override.
    pub brackets: Vec<BracketRow>,
    pub status_brackets: BTreeMap<FilingStatus, Vec<BracketRow>>,
    pub default_standard_deduction: Decimal,
    pub standard_deductions: BTreeMap<FilingStatus, Decimal>,
    pub credits: CreditLimits,
}

fn bracket(
    min: i64,
    max: Option<i64>,
    rate_percent: i64,
) -> BracketRow {
    BracketRow::new(
        Decimal::from(min),
        max.map(Decimal::from),
        Decimal::new(rate_percent, 2),
    )
}

impl TaxPolicy {
    /// The built-in rule set: one shared six-band table and per-status
    /// standard deductions.
    pub fn observed() -> Self {
        let brackets = vec![
            bracket(0, Some(299_999), 0),
            bracket(300_000, Some(599_999), 5),
            bracket(600_000, Some(899_999), 10),
            bracket(900_000, Some(1_199_999), 15),
            bracket(1_200_000, Some(1_499_999), 20),
            bracket(1_500_000, None, 30),
        ];

        let standard_deductions = BTreeMap::from([
            (FilingStatus::Single, Decimal::from(50_000)),
            (FilingStatus::MarriedJoint, Decimal::from(100_000)),
            (FilingStatus::MarriedSeparate, Decimal::from(50_000)),
            (FilingStatus::Head, Decimal::from(75_000)),
            (FilingStatus::Widow, Decimal::from(100_000)),
        ]);

        Self {
            brackets,
            status_brackets: BTreeMap::new(),
            default_standard_deduction: Decimal::from(50_000),
            standard_deductions,
            credits: CreditLimits::default(),
        }
    }

    /// Bracket rows for `status`, falling back to the shared table.
    pub fn brackets_for(
        &self,
        status: FilingStatus,
    ) -> &[BracketRow] {
        self.status_brackets
            .get(&status)
            .filter(|rows| !rows.is_empty())
            .map_or(self.brackets.as_slice(), Vec::as_slice)
    }

    /// Standard deduction for `status`, falling back to the default amount.
    pub fn standard_deduction_for(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        self.standard_deductions
            .get(&status)
            .copied()
            .unwrap_or(self.default_standard_deduction)
    }

    /// Checks that every table partitions `[0, ∞)` and that all amounts are
    /// in range.
    pub fn validate(&self) -> Result<(), PolicyError> {
        validate_table("default", &self.brackets)?;
        for (status, rows) in &self.status_brackets {
            validate_table(status.as_str(), rows)?;
        }

        if self.default_standard_deduction.is_sign_negative() {
            return Err(PolicyError::NegativeAmount(
                "default_standard_deduction".to_string(),
            ));
        }
        for (status, amount) in &self.standard_deductions {
            if amount.is_sign_negative() {
                return Err(PolicyError::NegativeAmount(format!(
                    "standard deduction for {status}"
                )));
            }
        }

        let limits = [
            ("credits.per_dependent", self.credits.per_dependent),
            ("credits.dependent_cap", self.credits.dependent_cap),
            ("credits.education_cap", self.credits.education_cap),
        ];
        for (name, value) in limits {
            if value.is_sign_negative() {
                return Err(PolicyError::NegativeAmount(name.to_string()));
            }
        }

        Ok(())
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::observed()
    }
}

/// Shared instance of [`TaxPolicy::observed`].
pub fn default_policy() -> &'static TaxPolicy {
    static POLICY: OnceLock<TaxPolicy> = OnceLock::new();
    POLICY.get_or_init(TaxPolicy::observed)
}

fn validate_table(
    table: &str,
    rows: &[BracketRow],
) -> Result<(), PolicyError> {
    let first = rows
        .first()
        .ok_or_else(|| PolicyError::EmptyTable(table.to_string()))?;
    if !first.min_income.is_zero() {
        return Err(PolicyError::DoesNotStartAtZero {
            table: table.to_string(),
            min: first.min_income,
        });
    }

    let last_index = rows.len() - 1;
    for (index, row) in rows.iter().enumerate() {
        if row.rate < Decimal::ZERO || row.rate > Decimal::ONE {
            return Err(PolicyError::RateOutOfRange {
                table: table.to_string(),
                row: index,
                rate: row.rate,
            });
        }

        match row.max_income {
            None if index != last_index => {
                return Err(PolicyError::UnboundedBeforeEnd {
                    table: table.to_string(),
                    row: index,
                });
            }
            Some(_) if index == last_index => {
                return Err(PolicyError::BoundedTop {
                    table: table.to_string(),
                });
            }
            Some(max) if max < row.min_income => {
                return Err(PolicyError::InvertedRow {
                    table: table.to_string(),
                    row: index,
                });
            }
            _ => {}
        }

        if let Some(previous) = index.checked_sub(1).map(|i| &rows[i]) {
            let expected_min = previous
                .max_income
                .and_then(|max| max.checked_add(Decimal::ONE));
            if expected_min != Some(row.min_income) {
                return Err(PolicyError::NotContiguous {
                    table: table.to_string(),
                    row: index,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // observed policy
    // =========================================================================

    #[test]
    fn observed_policy_is_valid() {
        assert_eq!(TaxPolicy::observed().validate(), Ok(()));
    }

    #[test]
    fn observed_table_has_zero_band_and_five_positive_bands() {
        let policy = TaxPolicy::observed();

        assert_eq!(policy.brackets.len(), 6);
        assert_eq!(policy.brackets[0].rate, Decimal::ZERO);
        assert!(policy.brackets[1..].iter().all(|row| row.rate > Decimal::ZERO));
        assert_eq!(policy.brackets[5].rate, dec!(0.30));
        assert!(policy.brackets[5].is_unbounded());
    }

    #[test]
    fn every_status_shares_the_observed_table() {
        let policy = TaxPolicy::observed();

        for status in FilingStatus::all() {
            assert_eq!(policy.brackets_for(*status), policy.brackets.as_slice());
        }
    }

    #[test]
    fn status_override_replaces_shared_table() {
        let mut policy = TaxPolicy::observed();
        let flat = vec![BracketRow::new(dec!(0), None, dec!(0.10))];
        policy.status_brackets.insert(FilingStatus::Head, flat.clone());

        assert_eq!(policy.brackets_for(FilingStatus::Head), flat.as_slice());
        assert_eq!(policy.brackets_for(FilingStatus::Single).len(), 6);
    }

    #[test]
    fn missing_standard_deduction_uses_default_amount() {
        let mut policy = TaxPolicy::observed();
        policy.standard_deductions.remove(&FilingStatus::Widow);

        assert_eq!(
            policy.standard_deduction_for(FilingStatus::Widow),
            policy.default_standard_deduction
        );
    }

    #[test]
    fn default_policy_is_shared_observed_policy() {
        assert_eq!(default_policy(), &TaxPolicy::observed());
        assert!(std::ptr::eq(default_policy(), default_policy()));
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    fn policy_with(rows: Vec<BracketRow>) -> TaxPolicy {
        TaxPolicy {
            brackets: rows,
            ..TaxPolicy::observed()
        }
    }

    #[test]
    fn validate_rejects_empty_table() {
        let result = policy_with(vec![]).validate();

        assert_eq!(result, Err(PolicyError::EmptyTable("default".to_string())));
    }

    #[test]
    fn validate_rejects_table_not_starting_at_zero() {
        let result = policy_with(vec![BracketRow::new(dec!(1), None, dec!(0.1))]).validate();

        assert!(matches!(result, Err(PolicyError::DoesNotStartAtZero { .. })));
    }

    #[test]
    fn validate_rejects_gap_between_rows() {
        let result = policy_with(vec![
            BracketRow::new(dec!(0), Some(dec!(999)), dec!(0)),
            BracketRow::new(dec!(1001), None, dec!(0.1)),
        ])
        .validate();

        assert_eq!(
            result,
            Err(PolicyError::NotContiguous {
                table: "default".to_string(),
                row: 1
            })
        );
    }

    #[test]
    fn validate_rejects_overlapping_rows() {
        let result = policy_with(vec![
            BracketRow::new(dec!(0), Some(dec!(999)), dec!(0)),
            BracketRow::new(dec!(999), None, dec!(0.1)),
        ])
        .validate();

        assert!(matches!(result, Err(PolicyError::NotContiguous { row: 1, .. })));
    }

    #[test]
    fn validate_rejects_bounded_top_row() {
        let result = policy_with(vec![BracketRow::new(dec!(0), Some(dec!(10)), dec!(0))]).validate();

        assert_eq!(
            result,
            Err(PolicyError::BoundedTop {
                table: "default".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_row_after_largest_representable_bound() {
        let result = policy_with(vec![
            BracketRow::new(dec!(0), Some(Decimal::MAX), dec!(0)),
            BracketRow::new(Decimal::MAX, None, dec!(0.1)),
        ])
        .validate();

        assert!(matches!(result, Err(PolicyError::NotContiguous { row: 1, .. })));
    }

    #[test]
    fn validate_rejects_unbounded_middle_row() {
        let result = policy_with(vec![
            BracketRow::new(dec!(0), None, dec!(0)),
            BracketRow::new(dec!(10), None, dec!(0.1)),
        ])
        .validate();

        assert!(matches!(result, Err(PolicyError::UnboundedBeforeEnd { row: 0, .. })));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let result = policy_with(vec![BracketRow::new(dec!(0), None, dec!(1.5))]).validate();

        assert!(matches!(result, Err(PolicyError::RateOutOfRange { .. })));
    }

    #[test]
    fn validate_checks_status_overrides() {
        let mut policy = TaxPolicy::observed();
        policy
            .status_brackets
            .insert(FilingStatus::Widow, vec![]);

        assert_eq!(policy.validate(), Err(PolicyError::EmptyTable("widow".to_string())));
    }

    #[test]
    fn validate_rejects_negative_credit_limit() {
        let mut policy = TaxPolicy::observed();
        policy.credits.education_cap = dec!(-1);

        assert_eq!(
            policy.validate(),
            Err(PolicyError::NegativeAmount("credits.education_cap".to_string()))
        );
    }

    // =========================================================================
    // configuration
    // =========================================================================

    #[test]
    fn partial_toml_keeps_observed_defaults() {
        let policy: TaxPolicy = toml::from_str(
            r#"
            default_standard_deduction = 60000

            [credits]
            education_cap = 40000
            "#,
        )
        .unwrap();

        assert_eq!(policy.default_standard_deduction, dec!(60000));
        assert_eq!(policy.credits.education_cap, dec!(40000));
        assert_eq!(policy.credits.per_dependent, dec!(25000));
        assert_eq!(policy.brackets, TaxPolicy::observed().brackets);
    }

    #[test]
    fn status_keyed_tables_use_wire_names() {
        let policy: TaxPolicy = toml::from_str(
            r#"
            [standard_deductions]
            single = 1000
            head = 2000
            "#,
        )
        .unwrap();

        assert_eq!(policy.standard_deduction_for(FilingStatus::Head), dec!(2000));
        assert_eq!(
            policy.standard_deduction_for(FilingStatus::MarriedJoint),
            dec!(50000)
        );
    }
}
