//! Command handlers.
//!
//! [`App`] owns the loaded configuration and turns each subcommand into
//! output on the given writers. Reports and JSON go to `out`; warnings and
//! skipped rows go to `err`.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tax_core::{ChatResponder, FilingStatus, TaxEngine, TaxForm, TaxResult};
use tax_data::{FormRecord, load_forms_from_file};

use crate::cli::{BatchArgs, BracketsArgs, ChatArgs, Command, EstimateArgs};
use crate::config::AppConfig;
use crate::form_file::load_form;
use crate::render::{render_batch_line, render_brackets, render_report};
use crate::session::ChatSession;
use crate::validation::{IncompleteForm, validate_for_submit};

const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

/// One computed estimate with the warnings raised while reading its form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub filing_status: FilingStatus,
    pub warnings: Vec<String>,
    pub result: TaxResult,
}

/// Outcome of one batch row. `result` is `None` when the row was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub row: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    pub filing_status: Option<FilingStatus>,
    pub result: Option<TaxResult>,
}

impl BatchEntry {
    pub fn is_skipped(&self) -> bool {
        self.result.is_none()
    }
}

fn messages<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Reads the configuration file if one was given, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn engine(&self) -> TaxEngine<'_> {
        TaxEngine::new(&self.config.policy)
    }

    /// Validates `form` and computes its refund.
    pub fn estimate(
        &self,
        form: &TaxForm,
    ) -> Result<Estimate, IncompleteForm> {
        let warnings = validate_for_submit(form)?;
        let input = form.to_input();
        let result = self.engine().compute_refund(&input);

        Ok(Estimate {
            filing_status: input.filing_status,
            warnings: messages(&warnings),
            result,
        })
    }

    /// Computes every row, skipping those that fail validation.
    pub fn batch(
        &self,
        records: &[FormRecord],
    ) -> Vec<BatchEntry> {
        let entries: Vec<BatchEntry> = records
            .iter()
            .map(|record| {
                let name = record.display_name();
                match self.estimate(&record.form) {
                    Ok(estimate) => BatchEntry {
                        row: record.row,
                        name,
                        issues: estimate.warnings,
                        filing_status: Some(estimate.filing_status),
                        result: Some(estimate.result),
                    },
                    Err(IncompleteForm(issues)) => {
                        tracing::warn!(row = record.row, %name, "skipping incomplete form");
                        BatchEntry {
                            row: record.row,
                            name,
                            issues: messages(&issues),
                            filing_status: None,
                            result: None,
                        }
                    }
                }
            })
            .collect();

        let skipped = entries.iter().filter(|e| e.is_skipped()).count();
        tracing::info!(rows = entries.len(), skipped, "batch complete");
        entries
    }

    /// Bracket listing for one status, or for all of them.
    pub fn brackets(
        &self,
        status: Option<FilingStatus>,
    ) -> String {
        let symbol = self.config.display.currency_symbol.as_str();
        match status {
            Some(status) => render_brackets(status, &self.config.policy, symbol),
            None => FilingStatus::all()
                .iter()
                .map(|status| render_brackets(*status, &self.config.policy, symbol))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }

    /// Reads questions line by line until end of input or a quit word.
    pub fn run_chat<R: BufRead, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> io::Result<ChatSession> {
        let mut session = ChatSession::new(ChatResponder::default());
        writeln!(output, "Ask a tax question. Type 'quit' to leave.")?;

        let mut lines = input.lines();
        loop {
            write!(output, "> ")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                writeln!(output)?;
                break;
            };
            let line = line?;
            let message = line.trim();
            if message.is_empty() {
                continue;
            }
            if QUIT_WORDS.contains(&message.to_lowercase().as_str()) {
                break;
            }
            writeln!(output, "{}", session.ask(message))?;
        }

        tracing::debug!(questions = session.questions(), "chat ended");
        Ok(session)
    }

    /// Runs one subcommand.
    pub fn run(
        &self,
        command: Command,
        input: impl BufRead,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<()> {
        match command {
            Command::Estimate(args) => self.run_estimate(&args, out, err),
            Command::Batch(args) => self.run_batch(&args, out, err),
            Command::Brackets(args) => self.run_brackets(&args, out),
            Command::Chat(args) => self.run_chat_command(&args, input, out),
        }
    }

    fn run_estimate(
        &self,
        args: &EstimateArgs,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<()> {
        let base = match &args.form {
            Some(path) => load_form(path)?,
            None => TaxForm::default(),
        };
        let form = args.apply_to(base);
        let estimate = self.estimate(&form)?;

        for warning in &estimate.warnings {
            writeln!(err, "warning: {warning}")?;
        }

        if args.json {
            serde_json::to_writer_pretty(&mut *out, &estimate)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "{}",
                render_report(estimate.filing_status, &estimate.result, &self.config.display)
            )?;
        }
        Ok(())
    }

    fn run_batch(
        &self,
        args: &BatchArgs,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<()> {
        let records = load_forms_from_file(&args.file)
            .with_context(|| format!("failed to load forms from {}", args.file.display()))?;
        let entries = self.batch(&records);

        if args.json {
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
            return Ok(());
        }

        let symbol = self.config.display.currency_symbol.as_str();
        for entry in &entries {
            match &entry.result {
                Some(result) => {
                    for issue in &entry.issues {
                        writeln!(err, "warning: {}: {issue}", entry.name)?;
                    }
                    writeln!(out, "{}", render_batch_line(&entry.name, result, symbol))?;
                }
                None => writeln!(err, "skipped {}: {}", entry.name, entry.issues.join("; "))?,
            }
        }
        Ok(())
    }

    fn run_brackets(
        &self,
        args: &BracketsArgs,
        out: &mut impl Write,
    ) -> Result<()> {
        let status = args
            .status
            .as_deref()
            .map(|s| {
                FilingStatus::parse(s).ok_or_else(|| {
                    let known: Vec<_> = FilingStatus::all().iter().map(FilingStatus::as_str).collect();
                    anyhow!("unknown filing status '{s}', expected one of: {}", known.join(", "))
                })
            })
            .transpose()?;

        writeln!(out, "{}", self.brackets(status))?;
        Ok(())
    }

    fn run_chat_command(
        &self,
        args: &ChatArgs,
        input: impl BufRead,
        out: &mut impl Write,
    ) -> Result<()> {
        match args.question() {
            Some(question) => {
                let mut session = ChatSession::new(ChatResponder::default());
                writeln!(out, "{}", session.ask(&question))?;
            }
            None => {
                self.run_chat(input, &mut *out)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::FormValue;

    use super::*;

    fn form(
        wages: &str,
        withheld: &str,
    ) -> TaxForm {
        TaxForm {
            age: Some("30".into()),
            wages: Some(wages.into()),
            tax_withheld: Some(withheld.into()),
            ..Default::default()
        }
    }

    // =========================================================================
    // Estimates
    // =========================================================================

    #[test]
    fn estimate_uses_configured_policy() {
        let mut config = AppConfig::default();
        config.policy.default_standard_deduction = dec!(0);
        config.policy.standard_deductions.clear();
        let app = App::new(config);

        let estimate = app.estimate(&form("400000", "10000")).expect("form is complete");

        assert_eq!(estimate.result.total_deductions, dec!(0));
        assert_eq!(estimate.result.tax_liability, dec!(5000));
    }

    #[test]
    fn estimate_collects_warnings() {
        let mut input = form("400000", "ten thousand");
        input.filing_status = Some("martian".to_string());

        let estimate = App::default().estimate(&input).expect("warnings do not block");

        assert_eq!(estimate.filing_status, FilingStatus::Single);
        assert_eq!(estimate.warnings.len(), 2);
        assert_eq!(estimate.result.estimated_refund, dec!(-2500));
    }

    #[test]
    fn incomplete_form_is_rejected() {
        let result = App::default().estimate(&TaxForm {
            wages: Some(FormValue::Integer(1)),
            ..Default::default()
        });

        assert!(result.is_err());
    }

    // =========================================================================
    // Batch
    // =========================================================================

    #[test]
    fn batch_skips_incomplete_rows_and_keeps_order() {
        let records = vec![
            FormRecord {
                row: 1,
                label: Some("ok".to_string()),
                form: form("400000", "10000"),
            },
            FormRecord {
                row: 2,
                label: None,
                form: TaxForm::default(),
            },
        ];

        let entries = App::default().batch(&records);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].result.as_ref().map(|r| r.estimated_refund), Some(dec!(7500)));
        assert!(entries[1].is_skipped());
        assert_eq!(entries[1].name, "row 2");
        assert_eq!(entries[1].issues.len(), 2);
    }

    // =========================================================================
    // Brackets
    // =========================================================================

    #[test]
    fn brackets_for_all_statuses_lists_each_once() {
        let text = App::default().brackets(None);

        for status in FilingStatus::all() {
            assert_eq!(text.matches(&format!("({})", status.as_str())).count(), 1);
        }
    }

    #[test]
    fn unknown_status_for_brackets_is_an_error() {
        let mut out = Vec::new();
        let args = BracketsArgs {
            status: Some("pirate".to_string()),
        };

        let err = App::default().run_brackets(&args, &mut out).unwrap_err();

        assert!(err.to_string().contains("married_joint"));
    }

    // =========================================================================
    // Chat
    // =========================================================================

    #[test]
    fn chat_loop_stops_at_quit() {
        let input = "hello\n\nquit\nrefund\n";
        let mut output = Vec::new();

        let session = App::default()
            .run_chat(input.as_bytes(), &mut output)
            .expect("in-memory io");

        assert_eq!(session.questions(), 1);
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("Ask a tax question."));
        assert!(text.contains(ChatResponder::default().respond("hello")));
    }

    #[test]
    fn chat_loop_ends_at_end_of_input() {
        let mut output = Vec::new();

        let session = App::default()
            .run_chat("deduction\nEXIT\n".as_bytes(), &mut output)
            .expect("in-memory io");

        assert_eq!(session.questions(), 1);
        let session = App::default()
            .run_chat("bracket".as_bytes(), &mut output)
            .expect("in-memory io");
        assert_eq!(session.questions(), 1);
    }
}
