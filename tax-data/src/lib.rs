//! CSV input for the refund estimator.
//!
//! * [`forms`] reads batches of raw form submissions.
//! * [`brackets`] reads bracket tables into a [`tax_core::TaxPolicy`].

pub mod brackets;
pub mod forms;

pub use brackets::{BracketRecord, BracketTableLoader, BracketTableLoaderError};
pub use forms::{FormLoadError, FormRecord, load_forms_from_file, load_forms_from_str};
