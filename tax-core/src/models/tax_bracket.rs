use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One progressive band. Both bounds are inclusive; `max_income` of `None`
/// marks the open-ended top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRow {
    pub min_income: Decimal,
    #[serde(default)]
    pub max_income: Option<Decimal>,
    /// Fraction in `[0, 1]`, e.g. `0.05` for 5%.
    pub rate: Decimal,
}

impl BracketRow {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            rate,
        }
    }

    /// Amount of income this band can absorb: `max - min + 1` for bounded
    /// bands, `None` for the top band. Saturates at `Decimal::MAX`.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max| {
            max.checked_sub(self.min_income)
                .and_then(|span| span.checked_add(Decimal::ONE))
                .unwrap_or(Decimal::MAX)
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_income.is_none()
    }
}

/// The slice of a band consumed while walking the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketCharge {
    pub row: BracketRow,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}
