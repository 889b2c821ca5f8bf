//! Credit aggregation.
//!
//! Two independent, additive components:
//!
//! | Credit    | Active when                                    | Amount |
//! |-----------|------------------------------------------------|--------|
//! | Dependent | child credit requested and `dependents > 0`    | `min(dependents × per_dependent, dependent_cap)` |
//! | Education | education credit requested                     | `min(student_loan_interest, education_cap)` |
//!
//! Student loan interest also counts toward itemized deductions, so the same
//! figure can reduce both taxable income and tax. That overlap is inherited
//! behavior and kept as is.

use rust_decimal::Decimal;

use crate::models::{CreditBreakdown, CreditLimits, TaxInput, default_policy};

#[derive(Debug, Clone, Copy)]
pub struct CreditAggregator<'a> {
    limits: &'a CreditLimits,
}

impl<'a> CreditAggregator<'a> {
    pub fn new(limits: &'a CreditLimits) -> Self {
        Self { limits }
    }

    pub fn aggregate(
        &self,
        input: &TaxInput,
    ) -> CreditBreakdown {
        CreditBreakdown {
            dependent: self
                .dependent_credit(input.child_tax_credit_requested, input.dependents),
            education: self.education_credit(
                input.education_credit_requested,
                input.student_loan_interest,
            ),
        }
    }

    fn dependent_credit(
        &self,
        requested: bool,
        dependents: u32,
    ) -> Decimal {
        if !requested || dependents == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(dependents)
            .saturating_mul(self.limits.per_dependent)
            .min(self.limits.dependent_cap)
    }

    fn education_credit(
        &self,
        requested: bool,
        student_loan_interest: Decimal,
    ) -> Decimal {
        if !requested {
            return Decimal::ZERO;
        }
        student_loan_interest
            .max(Decimal::ZERO)
            .min(self.limits.education_cap)
    }
}

/// Credits for `input` under the built-in limits.
pub fn aggregate_credits(input: &TaxInput) -> CreditBreakdown {
    CreditAggregator::new(&default_policy().credits).aggregate(input)
}
