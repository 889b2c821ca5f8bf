use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BracketCharge;

/// The two independent credit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreditBreakdown {
    pub dependent: Decimal,
    pub education: Decimal,
}

impl CreditBreakdown {
    pub fn total(&self) -> Decimal {
        self.dependent.saturating_add(self.education)
    }
}

/// Outcome of one refund calculation.
///
/// `estimated_refund` is always `tax_withheld - tax_liability`; a negative
/// value is an amount owed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub total_income: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,

    /// Bracket tax before credits.
    pub tax_before_credits: Decimal,
    /// Tax after credits, never negative.
    pub tax_liability: Decimal,
    pub tax_withheld: Decimal,
    pub total_credits: Decimal,
    pub estimated_refund: Decimal,

    pub used_itemized_deduction: bool,
    pub credits: CreditBreakdown,
    /// Bands the taxable income reached, lowest first.
    pub bracket_charges: Vec<BracketCharge>,
}

impl TaxResult {
    pub fn is_refund(&self) -> bool {
        self.estimated_refund >= Decimal::ZERO
    }

    /// Balance due, zero when a refund is expected.
    pub fn amount_owed(&self) -> Decimal {
        if self.is_refund() {
            Decimal::ZERO
        } else {
            -self.estimated_refund
        }
    }
}
