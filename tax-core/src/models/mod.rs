mod filing_status;
mod tax_bracket;
mod tax_input;
mod tax_policy;
mod tax_result;

pub use filing_status::FilingStatus;
pub use tax_bracket::{BracketCharge, BracketRow};
pub use tax_input::{FormValue, TaxForm, TaxInput};
pub use tax_policy::{CreditLimits, PolicyError, TaxPolicy, default_policy};
pub use tax_result::{CreditBreakdown, TaxResult};
