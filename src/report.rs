//! Results presentation
//!
//! Which result fields are shown, under which labels, and the plain-text
//! summary that gets copied for presentations.

use crate::calculation::{CalculationResult, CONFIDENCE_LEVELS};
use crate::currency::CurrencyFormatter;
use crate::project_types::ProjectType;
use self::Visibility::{Positive, Present};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Where the rows end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportView {
    Screen,
    Clipboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Present,
    Positive,
}

struct ResultLabel {
    key: &'static str,
    label: &'static str,
    screen: Visibility,
    clipboard: Visibility,
}

impl ResultLabel {
    const fn new(key: &'static str, label: &'static str, screen: Visibility, clipboard: Visibility) -> Self {
        Self {
            key,
            label,
            screen,
            clipboard,
        }
    }
}

// npsIncrease is a point count, not money, so it has no row.
const RESULT_LABELS: &[ResultLabel] = &[
    ResultLabel::new("incrementalSales", "Incremental Sales", Present, Present),
    ResultLabel::new("grossProfit", "Gross Profit", Present, Present),
    ResultLabel::new("laborSavings", "Labor Savings", Present, Present),
    ResultLabel::new("retentionSavings", "Retention Savings", Present, Present),
    ResultLabel::new("productivityValue", "Productivity Value", Present, Present),
    ResultLabel::new("npsValue", "NPS Value", Present, Present),
    ResultLabel::new("conversionImpact", "Conversion Impact", Positive, Present),
    ResultLabel::new("otherSavings", "Other Savings", Positive, Positive),
];

/// One labelled amount, already formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub label: &'static str,
    pub amount: String,
}

/// Labelled rows for the result fields visible in `view`, in display order.
pub fn result_rows(result: &CalculationResult, view: ReportView, formatter: &CurrencyFormatter) -> Vec<ReportRow> {
    RESULT_LABELS
        .iter()
        .filter_map(|entry| {
            let value = result.get(entry.key)?;
            let visibility = match view {
                ReportView::Screen => entry.screen,
                ReportView::Clipboard => entry.clipboard,
            };
            if visibility == Positive && (value <= 0.0 || value.is_nan()) {
                return None;
            }
            Some(ReportRow {
                label: entry.label,
                amount: formatter.format(value),
            })
        })
        .collect()
}

/// The summary copied for presentations.
pub fn render_clipboard_text(
    project_type: &ProjectType,
    result: &CalculationResult,
    formatter: &CurrencyFormatter,
) -> String {
    let mut text = String::new();
    text.push_str(&format!("{} Results\n", project_type.name));
    text.push_str(&format!("{}\n", SEPARATOR));
    for row in result_rows(result, ReportView::Clipboard, formatter) {
        text.push_str(&format!("{}: {}\n", row.label, row.amount));
    }
    text.push_str(&format!("{}\n", SEPARATOR));
    text.push_str(&format!("TOTAL EBIT IMPACT: {}\n\n", formatter.format(result.total())));
    text.push_str("Confidence Analysis:\n");
    for percent in CONFIDENCE_LEVELS {
        text.push_str(&format!(
            "{}% confidence: {}\n",
            percent,
            formatter.format(result.confidence(percent))
        ));
    }
    text
}

/// The on-screen results panel as plain text.
pub fn render_screen_text(result: &CalculationResult, formatter: &CurrencyFormatter) -> String {
    let mut text = String::from("Results\n");
    for row in result_rows(result, ReportView::Screen, formatter) {
        text.push_str(&format!("{}: {}\n", row.label, row.amount));
    }
    text.push_str(&format!("TOTAL EBIT IMPACT: {}\n", formatter.format(result.total())));
    text.push_str("\nConfidence Analysis\n");
    for row in result.confidence_table().rows() {
        text.push_str(&format!("{}%: {}\n", row.percent, formatter.format(row.value)));
    }
    text
}
