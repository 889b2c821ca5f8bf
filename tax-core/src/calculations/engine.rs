//! Refund estimation.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Total income (wages + self-employment + investment + other) |
//! | 2    | Itemized total (student loan interest + charity + medical) |
//! | 3    | Deductions: larger of standard deduction and itemized total |
//! | 4    | Taxable income (step 1 - step 3, minimum 0) |
//! | 5    | Bracket tax, walking the table from the bottom band up |
//! | 6    | Credits (dependent + education) |
//! | 7    | Tax liability (step 5 - step 6, minimum 0) |
//! | 8    | Estimated refund (withholding - step 7, negative means owed) |
//!
//! Every step is total: the engine never fails, whatever the input.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::compute_refund;
//! use tax_core::{FilingStatus, TaxInput};
//!
//! let input = TaxInput {
//!     filing_status: FilingStatus::Single,
//!     age: 35,
//!     wages: dec!(400000),
//!     tax_withheld: dec!(10000),
//!     ..Default::default()
//! };
//!
//! let result = compute_refund(&input);
//!
//! assert_eq!(result.total_income, dec!(400000));
//! assert_eq!(result.total_deductions, dec!(50000));
//! assert_eq!(result.taxable_income, dec!(350000));
//! assert_eq!(result.tax_liability, dec!(2500));
//! assert_eq!(result.estimated_refund, dec!(7500));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::calculations::common::floor_at_zero;
use crate::calculations::credits::CreditAggregator;
use crate::calculations::deductions::DeductionResolver;
use crate::models::{BracketCharge, BracketRow, TaxInput, TaxPolicy, TaxResult, default_policy};

/// Refund calculator bound to one [`TaxPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    policy: &'a TaxPolicy,
}

impl<'a> TaxEngine<'a> {
    pub fn new(policy: &'a TaxPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &'a TaxPolicy {
        self.policy
    }

    /// Runs every step for `input`. Pure: the same input always produces the
    /// same result.
    pub fn compute_refund(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        let total_income = input.total_income();
        let itemized_total = input.itemized_total();

        let deduction =
            DeductionResolver::new(self.policy).choose(input.filing_status, itemized_total);
        let taxable_income = self.taxable_income(total_income, deduction.amount);

        let rows = self.policy.brackets_for(input.filing_status);
        let (tax_before_credits, bracket_charges) = self.calculate_tax(taxable_income, rows);

        let credits = CreditAggregator::new(&self.policy.credits).aggregate(input);
        let total_credits = credits.total();

        let tax_liability = self.tax_after_credits(tax_before_credits, total_credits);
        let estimated_refund = input.tax_withheld.saturating_sub(tax_liability);

        debug!(
            filing_status = %input.filing_status,
            %total_income,
            total_deductions = %deduction.amount,
            used_itemized = deduction.used_itemized,
            %taxable_income,
            %tax_before_credits,
            %total_credits,
            %tax_liability,
            %estimated_refund,
            "computed refund"
        );

        TaxResult {
            total_income,
            total_deductions: deduction.amount,
            taxable_income,
            tax_before_credits,
            tax_liability,
            tax_withheld: input.tax_withheld,
            total_credits,
            estimated_refund,
            used_itemized_deduction: deduction.used_itemized,
            credits,
            bracket_charges,
        }
    }

    fn taxable_income(
        &self,
        total_income: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        floor_at_zero(total_income - total_deductions)
    }

    /// Walks `rows` bottom-up. Each band absorbs at most its width
    /// (`max - min + 1`, unlimited for the top band); the walk stops as soon
    /// as nothing remains.
    fn calculate_tax(
        &self,
        taxable_income: Decimal,
        rows: &[BracketRow],
    ) -> (Decimal, Vec<BracketCharge>) {
        let mut remaining = taxable_income;
        let mut tax = Decimal::ZERO;
        let mut charges = Vec::new();

        for row in rows {
            if remaining <= Decimal::ZERO {
                break;
            }

            let taxed_amount = match row.width() {
                Some(width) => remaining.min(floor_at_zero(width)),
                None => remaining,
            };
            if taxed_amount.is_zero() {
                continue;
            }

            let row_tax = taxed_amount.saturating_mul(row.rate);
            trace!(min = %row.min_income, rate = %row.rate, %taxed_amount, %row_tax, "bracket");

            tax = tax.saturating_add(row_tax);
            remaining -= taxed_amount;
            charges.push(BracketCharge {
                row: row.clone(),
                taxed_amount,
                tax: row_tax,
            });
        }

        (tax, charges)
    }

    fn tax_after_credits(
        &self,
        tax_before_credits: Decimal,
        credits: Decimal,
    ) -> Decimal {
        floor_at_zero(tax_before_credits - credits)
    }
}

impl Default for TaxEngine<'static> {
    fn default() -> Self {
        Self::new(default_policy())
    }
}

/// [`TaxEngine::compute_refund`] under the built-in policy.
pub fn compute_refund(input: &TaxInput) -> TaxResult {
    TaxEngine::default().compute_refund(input)
}
