//! Presentation and formatting helpers.
//!
//! Everything here is a pure function over extracted data: absent fields are
//! substituted with [`NA`] at read time and the stored record is never
//! mutated.

use serde::Serialize;
use serde_json::Value;

use crate::record::InvoiceStatus;
use crate::schema::Invoice;

/// Sentinel shown for any absent field.
pub const NA: &str = "N/A";

/// Format a raw extracted amount as a dollar string.
///
/// Behavior, preserved exactly from the original application:
/// - absent or null input renders as `"N/A"`,
/// - numbers and numeric strings render as `$#,##0.00`,
/// - a present but non-numeric value falls back to its literal string form,
///   never to `"N/A"`.
pub fn format_currency(value: Option<&Value>) -> String {
    let value = match value {
        None | Some(Value::Null) => return NA.to_string(),
        Some(v) => v,
    };

    let numeric = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match numeric {
        Some(amount) => format_dollars(amount),
        None => match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

/// `$#,##0.00` with thousands separators. The sign follows the dollar sign,
/// matching the original's `f"${amount:,.2f}"`.
fn format_dollars(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(&(cents / 100).to_string());
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("${}{}.{:02}", sign, whole, cents % 100)
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// Badge style for a record status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusStyle {
    Success,
    Warning,
    Error,
    Info,
}

/// Map a status to its badge style. Unknown statuses are informational,
/// not an error.
pub fn status_style(status: &InvoiceStatus) -> StatusStyle {
    match status {
        InvoiceStatus::Completed => StatusStyle::Success,
        InvoiceStatus::Processing => StatusStyle::Warning,
        InvoiceStatus::Failed => StatusStyle::Error,
        _ => StatusStyle::Info,
    }
}

/// A display-ready line item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemRow {
    pub item_number: String,
    pub description: String,
    pub quantity: String,
    pub unit: String,
    pub net_price: String,
    pub net_worth: String,
    pub vat_percentage: String,
    pub gross_worth: String,
}

/// A display-ready VAT summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VatSummaryRow {
    pub vat_percentage: String,
    pub net_worth: String,
    pub vat_amount: String,
    pub gross_worth: String,
}

/// Flatten the invoice's line items into display rows.
pub fn line_item_rows(invoice: &Invoice) -> Vec<LineItemRow> {
    invoice
        .items
        .iter()
        .map(|item| LineItemRow {
            item_number: text_or_na(item.item_number.as_deref()),
            description: text_or_na(item.description.as_deref()),
            quantity: number_or_na(item.quantity),
            unit: text_or_na(item.unit_of_measure.as_deref()),
            net_price: format_currency(item.net_price.as_ref()),
            net_worth: format_currency(item.net_worth.as_ref()),
            vat_percentage: text_or_na(item.vat_percentage.as_deref()),
            gross_worth: format_currency(item.gross_worth.as_ref()),
        })
        .collect()
}

/// Flatten the invoice's VAT summary into display rows.
pub fn vat_summary_rows(invoice: &Invoice) -> Vec<VatSummaryRow> {
    invoice
        .summary
        .as_ref()
        .map(|summary| {
            summary
                .vat_summary
                .iter()
                .map(|entry| VatSummaryRow {
                    vat_percentage: text_or_na(entry.vat_percentage.as_deref()),
                    net_worth: format_currency(entry.net_worth.as_ref()),
                    vat_amount: format_currency(entry.vat.as_ref()),
                    gross_worth: format_currency(entry.gross_worth.as_ref()),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Text field or the N/A sentinel.
pub fn text_or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NA.to_string())
}

/// Numeric field or the N/A sentinel.
pub fn number_or_na(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NA.to_string())
}
