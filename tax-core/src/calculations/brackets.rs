//! Bracket table lookup.
//!
//! The tables themselves live in [`TaxPolicy`]; these helpers read the
//! built-in policy so callers without configuration never need one.

use crate::models::{BracketRow, FilingStatus, TaxPolicy, default_policy};

/// Bracket rows for `status` under the built-in policy, ascending by
/// `min_income`.
pub fn brackets_for(status: FilingStatus) -> &'static [BracketRow] {
    default_policy().brackets_for(status)
}

/// Bracket rows for a raw filing-status string. Unrecognized strings get the
/// single filer's table.
pub fn brackets_for_str(status: &str) -> &'static [BracketRow] {
    brackets_for(FilingStatus::parse_or_default(status))
}

/// Returns `true` when `rows` cover `[0, ∞)` in ascending order with every
/// row starting one unit above the previous row's maximum.
pub fn partitions_income_line(rows: &[BracketRow]) -> bool {
    let policy = TaxPolicy {
        brackets: rows.to_vec(),
        ..TaxPolicy::observed()
    };
    policy.validate().is_ok()
}
