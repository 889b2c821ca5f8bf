//! Standard-versus-itemized deduction selection.

use rust_decimal::Decimal;

use crate::models::{FilingStatus, TaxPolicy, default_policy};

/// Which deduction was applied, and how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeductionChoice {
    pub amount: Decimal,
    pub used_itemized: bool,
}

/// Picks the larger of the standard deduction and the itemized total.
///
/// The itemized total is used as given; no cap applies here.
#[derive(Debug, Clone, Copy)]
pub struct DeductionResolver<'a> {
    policy: &'a TaxPolicy,
}

impl<'a> DeductionResolver<'a> {
    pub fn new(policy: &'a TaxPolicy) -> Self {
        Self { policy }
    }

    pub fn standard_deduction_for(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        self.policy.standard_deduction_for(status)
    }

    pub fn resolve_deductions(
        &self,
        status: FilingStatus,
        itemized_total: Decimal,
    ) -> Decimal {
        self.choose(status, itemized_total).amount
    }

    /// Itemized wins only when strictly larger.
    pub fn choose(
        &self,
        status: FilingStatus,
        itemized_total: Decimal,
    ) -> DeductionChoice {
        let standard = self.standard_deduction_for(status);
        if itemized_total > standard {
            DeductionChoice {
                amount: itemized_total,
                used_itemized: true,
            }
        } else {
            DeductionChoice {
                amount: standard,
                used_itemized: false,
            }
        }
    }
}

/// Standard deduction for `status` under the built-in policy.
pub fn standard_deduction_for(status: FilingStatus) -> Decimal {
    DeductionResolver::new(default_policy()).standard_deduction_for(status)
}

/// `max(standard_deduction_for(status), itemized_total)` under the built-in
/// policy.
pub fn resolve_deductions(
    status: FilingStatus,
    itemized_total: Decimal,
) -> Decimal {
    DeductionResolver::new(default_policy()).resolve_deductions(status, itemized_total)
}
