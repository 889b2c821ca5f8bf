//! Personal income-tax refund estimation.
//!
//! The [`calculations`] module holds the pure refund engine; [`parse`] turns
//! raw form values into numbers without ever failing; [`chatbot`] answers
//! canned questions. Nothing in this crate performs I/O.

pub mod calculations;
pub mod chatbot;
pub mod models;
pub mod parse;

pub use calculations::{TaxEngine, compute_refund};
pub use chatbot::{ChatResponder, respond};
pub use models::*;
