//! The refund calculation and its stages.
//!
//! [`engine`] orchestrates; [`brackets`], [`deductions`] and [`credits`] are
//! usable on their own for previews and explanations.

pub mod brackets;
pub mod common;
pub mod credits;
pub mod deductions;
pub mod engine;

pub use brackets::{brackets_for, brackets_for_str};
pub use credits::{CreditAggregator, aggregate_credits};
pub use deductions::{DeductionChoice, DeductionResolver, resolve_deductions, standard_deduction_for};
pub use engine::{TaxEngine, compute_refund};
