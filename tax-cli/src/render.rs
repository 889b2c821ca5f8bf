//! Plain-text rendering of results and bracket tables.

use rust_decimal::Decimal;
use tax_core::calculations::common::round_half_up;
use tax_core::{BracketRow, FilingStatus, TaxPolicy, TaxResult};

use crate::config::DisplayConfig;

const LABEL_WIDTH: usize = 20;

/// Formats `amount` as money: half-up to two places, comma-grouped
/// thousands, `symbol` in front and a leading `-` for negatives.
pub fn format_currency(
    amount: Decimal,
    symbol: &str,
) -> String {
    let mut rounded = round_half_up(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded = rounded.abs();
    rounded.rescale(2);

    let text = rounded.to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{cents}")
}

/// `0.05` as `5%`, `0.125` as `12.5%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn format_band(
    row: &BracketRow,
    symbol: &str,
) -> String {
    let min = format_currency(row.min_income, symbol);
    match row.max_income {
        Some(max) => format!("{min} to {}", format_currency(max, symbol)),
        None => format!("{min} and above"),
    }
}

fn line(
    label: &str,
    value: String,
) -> String {
    format!("{:<width$}{value}", format!("{label}:"), width = LABEL_WIDTH)
}

/// Multi-line report for one estimate.
pub fn render_report(
    status: FilingStatus,
    result: &TaxResult,
    display: &DisplayConfig,
) -> String {
    let symbol = display.currency_symbol.as_str();
    let money = |amount| format_currency(amount, symbol);
    let deduction_kind = if result.used_itemized_deduction {
        "itemized"
    } else {
        "standard"
    };

    let mut lines = vec![
        line("Filing status", status.label().to_string()),
        line("Total income", money(result.total_income)),
        line(
            "Deductions",
            format!("{} ({deduction_kind})", money(result.total_deductions)),
        ),
        line("Taxable income", money(result.taxable_income)),
        line("Tax before credits", money(result.tax_before_credits)),
        line(
            "Credits",
            format!(
                "{} (dependents {}, education {})",
                money(result.total_credits),
                money(result.credits.dependent),
                money(result.credits.education)
            ),
        ),
        line("Tax liability", money(result.tax_liability)),
        line("Tax withheld", money(result.tax_withheld)),
    ];

    if result.is_refund() {
        lines.push(line("Estimated refund", money(result.estimated_refund)));
    } else {
        lines.push(line("Amount owed", money(result.amount_owed())));
    }

    if display.show_breakdown && !result.bracket_charges.is_empty() {
        lines.push(String::new());
        lines.push("Bracket breakdown:".to_string());
        for charge in &result.bracket_charges {
            lines.push(format!(
                "  {} @ {}: {} taxed, {}",
                format_band(&charge.row, symbol),
                format_rate(charge.row.rate),
                money(charge.taxed_amount),
                money(charge.tax)
            ));
        }
    }

    lines.join("\n")
}

/// The bracket table and standard deduction in effect for `status`.
pub fn render_brackets(
    status: FilingStatus,
    policy: &TaxPolicy,
    symbol: &str,
) -> String {
    let mut lines = vec![
        format!("{} ({})", status.label(), status.as_str()),
        line(
            "Standard deduction",
            format_currency(policy.standard_deduction_for(status), symbol),
        ),
    ];
    for row in policy.brackets_for(status) {
        lines.push(format!(
            "  {:>6}  {}",
            format_rate(row.rate),
            format_band(row, symbol)
        ));
    }
    lines.join("\n")
}

/// One summary line for a batch row.
pub fn render_batch_line(
    name: &str,
    result: &TaxResult,
    symbol: &str,
) -> String {
    let outcome = if result.is_refund() {
        format!("refund {}", format_currency(result.estimated_refund, symbol))
    } else {
        format!("owes {}", format_currency(result.amount_owed(), symbol))
    };
    format!(
        "{name}: taxable {}, liability {}, {outcome}",
        format_currency(result.taxable_income, symbol),
        format_currency(result.tax_liability, symbol)
    )
}
