use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tax_core::{FormValue, TaxForm};

/// Personal income-tax refund estimator.
///
/// Computes the refund (or balance due) for a single form, a CSV batch of
/// forms, shows the bracket tables in effect and answers common questions.
#[derive(Debug, Parser)]
#[command(name = "refund-estimator", version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive; overrides RUST_LOG and the config file.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append plain-text logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the refund for one form.
    Estimate(EstimateArgs),

    /// Estimate every row of a CSV file.
    Batch(BatchArgs),

    /// Show bracket tables and standard deductions.
    Brackets(BracketsArgs),

    /// Ask a question, or start an interactive chat without one.
    Chat(ChatArgs),
}

/// Form fields for `estimate`.
///
/// Values are taken as typed and parsed leniently, exactly like the fields
/// of a form file. Flags given here override the same field from `--form`.
#[derive(Debug, Default, Args)]
pub struct EstimateArgs {
    /// Read the form from a .toml or .json file.
    #[arg(long)]
    pub form: Option<PathBuf>,

    #[arg(long)]
    pub filing_status: Option<String>,

    #[arg(long)]
    pub age: Option<String>,

    #[arg(long)]
    pub dependents: Option<String>,

    #[arg(long)]
    pub disability: bool,

    #[arg(long)]
    pub wages: Option<String>,

    #[arg(long)]
    pub self_employment_income: Option<String>,

    #[arg(long)]
    pub investment_income: Option<String>,

    #[arg(long)]
    pub other_income: Option<String>,

    #[arg(long)]
    pub tax_withheld: Option<String>,

    #[arg(long)]
    pub student_loan_interest: Option<String>,

    #[arg(long)]
    pub charitable_contributions: Option<String>,

    #[arg(long)]
    pub medical_expenses: Option<String>,

    /// Claim the per-dependent credit.
    #[arg(long)]
    pub child_tax_credit: bool,

    /// Claim the education credit.
    #[arg(long)]
    pub education_credit: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

fn overlay(
    slot: &mut Option<FormValue>,
    value: &Option<String>,
) {
    if let Some(value) = value {
        *slot = Some(FormValue::Text(value.clone()));
    }
}

fn overlay_flag(
    slot: &mut Option<FormValue>,
    set: bool,
) {
    if set {
        *slot = Some(FormValue::Flag(true));
    }
}

impl EstimateArgs {
    /// Applies the fields given on the command line on top of `base`.
    pub fn apply_to(
        &self,
        mut base: TaxForm,
    ) -> TaxForm {
        if let Some(status) = &self.filing_status {
            base.filing_status = Some(status.clone());
        }
        overlay(&mut base.age, &self.age);
        overlay(&mut base.dependents, &self.dependents);
        overlay_flag(&mut base.disability, self.disability);
        overlay(&mut base.wages, &self.wages);
        overlay(&mut base.self_employment_income, &self.self_employment_income);
        overlay(&mut base.investment_income, &self.investment_income);
        overlay(&mut base.other_income, &self.other_income);
        overlay(&mut base.tax_withheld, &self.tax_withheld);
        overlay(&mut base.student_loan_interest, &self.student_loan_interest);
        overlay(&mut base.charitable_contributions, &self.charitable_contributions);
        overlay(&mut base.medical_expenses, &self.medical_expenses);
        overlay_flag(&mut base.child_tax_credit_requested, self.child_tax_credit);
        overlay_flag(&mut base.education_credit_requested, self.education_credit);
        base
    }
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV file with one form per row.
    #[arg(long)]
    pub file: PathBuf,

    /// Print the results as a JSON array.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct BracketsArgs {
    /// Show a single filing status instead of all of them.
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Question to answer; omit for an interactive session.
    pub message: Vec<String>,
}

impl ChatArgs {
    pub fn question(&self) -> Option<String> {
        let joined = self.message.join(" ");
        (!joined.trim().is_empty()).then_some(joined)
    }
}
