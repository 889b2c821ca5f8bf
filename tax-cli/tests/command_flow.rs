//! Drives whole subcommands with on-disk fixtures and in-memory io.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tax_cli::App;
use tax_cli::app::load_config;
use tax_cli::cli::Cli;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

struct Output {
    out: String,
    err: String,
}

fn run_with_input(
    args: &[&str],
    stdin: &str,
) -> anyhow::Result<Output> {
    let cli = Cli::try_parse_from(std::iter::once("refund-estimator").chain(args.iter().copied()))?;
    let app = App::new(load_config(cli.config.as_deref())?);

    let mut out = Vec::new();
    let mut err = Vec::new();
    app.run(cli.command, stdin.as_bytes(), &mut out, &mut err)?;

    Ok(Output {
        out: String::from_utf8(out)?,
        err: String::from_utf8(err)?,
    })
}

fn run(args: &[&str]) -> anyhow::Result<Output> {
    run_with_input(args, "")
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("not a decimal: {other}"),
    }
}

// ---------------------------------------------------------------------------
// estimate
// ---------------------------------------------------------------------------

#[test]
fn estimate_from_flags_prints_report() {
    let output = run(&[
        "estimate",
        "--age",
        "28",
        "--wages",
        "400000",
        "--tax-withheld",
        "10000",
    ])
    .expect("estimate should succeed");

    assert!(output.out.contains("Estimated refund:   ₹7,500.00"), "{}", output.out);
    assert!(output.out.contains("Bracket breakdown:"));
    assert_eq!(output.err, "");
}

#[test]
fn estimate_from_form_file_with_config_prints_json() {
    let config = fixture("refund.toml");
    let form = fixture("form.json");

    let output = run(&["--config", &config, "estimate", "--form", &form, "--json"])
        .expect("estimate should succeed");
    let json: Value = serde_json::from_str(&output.out).expect("stdout is JSON");

    assert_eq!(json["filing_status"], "single");
    assert_eq!(decimal(&json["result"]["taxable_income"]), dec!(350000));
    assert_eq!(decimal(&json["result"]["tax_liability"]), dec!(25000));
    assert_eq!(decimal(&json["result"]["estimated_refund"]), dec!(-15000));
}

#[test]
fn estimate_flags_override_form_file() {
    let form = fixture("form.json");

    let output = run(&["estimate", "--form", &form, "--wages", "100000", "--json"])
        .expect("estimate should succeed");
    let json: Value = serde_json::from_str(&output.out).expect("stdout is JSON");

    assert_eq!(decimal(&json["result"]["taxable_income"]), dec!(50000));
    assert_eq!(decimal(&json["result"]["estimated_refund"]), dec!(10000));
}

#[test]
fn estimate_warns_about_coerced_values() {
    let output = run(&[
        "estimate",
        "--age",
        "30",
        "--wages",
        "400000",
        "--tax-withheld",
        "plenty",
    ])
    .expect("warnings do not fail the command");

    assert!(output.err.contains("warning: tax_withheld: 'plenty'"), "{}", output.err);
    assert!(output.out.contains("Amount owed:        ₹2,500.00"), "{}", output.out);
}

#[test]
fn estimate_without_age_fails() {
    let err = run(&["estimate", "--wages", "400000"]).err().expect("age is required");

    assert!(err.to_string().contains("age must be a positive whole number"), "{err}");
}

// ---------------------------------------------------------------------------
// batch
// ---------------------------------------------------------------------------

#[test]
fn batch_prints_one_line_per_row_and_reports_skips() {
    let config = fixture("refund.toml");
    let forms = fixture("forms.csv");

    let output = run(&["--config", &config, "batch", "--file", &forms]).expect("batch should succeed");

    assert_eq!(
        output.out.lines().collect::<Vec<_>>(),
        vec![
            "alice: taxable $350,000.00, liability $25,000.00, owes $15,000.00",
            "grad: taxable $600,000.00, liability $0.00, refund $30,000.00",
        ]
    );
    assert!(output.err.contains("skipped nowage: wages must be entered"), "{}", output.err);
}

#[test]
fn batch_json_keeps_skipped_rows() {
    let forms = fixture("forms.csv");

    let output = run(&["batch", "--file", &forms, "--json"]).expect("batch should succeed");
    let json: Value = serde_json::from_str(&output.out).expect("stdout is JSON");
    let rows = json.as_array().expect("array");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1]["name"], "nowage");
    assert!(rows[1]["result"].is_null());
    assert_eq!(decimal(&rows[0]["result"]["estimated_refund"]), dec!(7500));
}

#[test]
fn batch_with_missing_file_fails_with_path() {
    let err = run(&["batch", "--file", "/no/such/forms.csv"])
        .err()
        .expect("missing file is an error");

    assert!(format!("{err:#}").contains("/no/such/forms.csv"));
}

// ---------------------------------------------------------------------------
// brackets
// ---------------------------------------------------------------------------

#[test]
fn brackets_reflect_installed_csv() {
    let config = fixture("refund.toml");

    let output = run(&["--config", &config, "brackets", "--status", "widow"]).expect("brackets should print");

    assert!(output.out.contains("Standard deduction: $100,000.00"), "{}", output.out);
    assert!(output.out.contains("5%  $500,000.00 and above"), "{}", output.out);
    assert_eq!(output.out.lines().count(), 4);
}

// ---------------------------------------------------------------------------
// chat
// ---------------------------------------------------------------------------

#[test]
fn chat_answers_one_question() {
    let output = run(&["chat", "hello", "there"]).expect("chat should answer");

    assert_eq!(output.out.trim_end(), tax_core::respond("hello there"));
}

#[test]
fn chat_runs_interactively_until_quit() {
    let output = run_with_input(&["chat"], "what deduction applies?\nquit\n").expect("chat should run");

    assert!(output.out.contains(&tax_core::respond("deduction")));
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[test]
fn config_naming_missing_bracket_csv_fails() {
    let err = load_config(Some(Path::new(&fixture("bad_brackets.toml")))).unwrap_err();

    assert!(format!("{err:#}").contains("missing.csv"), "{err:#}");
}

#[test]
fn config_file_settings_are_loaded() {
    let config = load_config(Some(Path::new(&fixture("refund.toml")))).expect("fixture config loads");

    assert_eq!(config.log_level.as_deref(), Some("warn"));
    assert_eq!(config.display.currency_symbol, "$");
    assert_eq!(config.policy.credits.education_cap, dec!(40000));
}
