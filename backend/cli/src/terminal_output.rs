//! Terminal output: colored notes, audit reports, and the inventory table.

use stockaudit_core::{AuditReport, InventoryRecord, StockLevel};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Color is on unless `NO_COLOR` is set or the terminal is dumb.
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::env::var_os("COLORTERM").is_some()
        || std::env::var("TERM").is_ok_and(|t| t != "dumb")
}

fn paint(color: &str, text: &str) -> String {
    if supports_color() {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

fn note(color: &str, symbol: &str, plain: &str, msg: &str) -> String {
    if supports_color() {
        format!("{color}{BOLD}{symbol}{RESET} {msg}")
    } else {
        format!("{plain}: {msg}")
    }
}

pub fn note_info(msg: &str) {
    println!("{}", note(CYAN, "ℹ", "INFO", msg));
}

pub fn note_warn(msg: &str) {
    println!("{}", note(YELLOW, "⚠", "WARN", msg));
}

/// Errors go to stderr.
pub fn note_error(msg: &str) {
    eprintln!("{}", note(RED, "✗", "ERROR", msg));
}

pub fn note_success(msg: &str) {
    println!("{}", note(GREEN, "✓", "OK", msg));
}

fn level_color(level: StockLevel) -> &'static str {
    match level {
        StockLevel::Low => RED,
        StockLevel::Medium => YELLOW,
        StockLevel::High => GREEN,
        StockLevel::Unknown => DIM,
    }
}

/// Colored stock badge, e.g. "High Stock" in green.
pub fn stock_badge(record: &InventoryRecord) -> String {
    paint(level_color(record.stock_level), &record.stock_level.label())
}

/// Human-readable audit report.
pub fn render_report(report: &AuditReport) -> String {
    let footer = format!(
        "{} / {} in {} ms, audit {}",
        report.provider, report.model, report.latency_ms, report.audit_id
    );
    format!(
        "Item:      {}\nReasoning: {}\nStock:     {} ({})\n{}\n",
        report.item,
        report.reasoning,
        stock_badge(&report.inventory),
        report.inventory.count,
        paint(DIM, &footer),
    )
}

/// Inventory rows as an aligned table. Padding is computed on the plain
/// labels so color codes never shift the columns.
pub fn render_inventory(entries: &[(String, InventoryRecord)]) -> String {
    let item_width = entries
        .iter()
        .map(|(item, _)| item.chars().count())
        .chain(["Item".len()])
        .max()
        .unwrap_or_default();
    let stock_width = entries
        .iter()
        .map(|(_, record)| record.stock_level.label().len())
        .chain(["Stock".len()])
        .max()
        .unwrap_or_default();
    let count_width = entries
        .iter()
        .map(|(_, record)| record.count.to_string().len())
        .chain(["Count".len()])
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "  {:<item_width$}  {:<stock_width$}  {:>count_width$}\n",
        "Item", "Stock", "Count"
    );
    out.push_str(&format!(
        "  {}  {}  {}\n",
        "-".repeat(item_width),
        "-".repeat(stock_width),
        "-".repeat(count_width)
    ));

    for (item, record) in entries {
        let label = format!("{:<stock_width$}", record.stock_level.label());
        out.push_str(&format!(
            "  {:<item_width$}  {}  {:>count_width$}\n",
            item,
            paint(level_color(record.stock_level), &label),
            record.count
        ));
    }
    out
}
