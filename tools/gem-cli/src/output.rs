//! Output formatting for the CLI.

use chrono::{DateTime, Utc};
use console::style;
use gem_commerce::prelude::{ConflictNotice, OrderStatus, Totals};
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a step in a process.
    pub fn step(&self, num: u8, total: u8, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style(format!("[{}/{}]", num, total)).dim(), msg);
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print a price breakdown, right-aligned.
    pub fn totals(&self, totals: &Totals) {
        if self.json {
            return;
        }
        let rows = totals_rows(totals);
        let width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        for (label, value) in rows {
            if label == "Total" {
                println!(
                    "  {:<10} {}",
                    style(label).bold(),
                    style(format!("{:>width$}", value, width = width)).bold()
                );
            } else {
                println!("  {:<10} {:>width$}", label, value, width = width);
            }
        }
        if totals.free_shipping_remaining.is_positive() {
            println!(
                "  {}",
                style(format!(
                    "Add {} more for free standard shipping",
                    totals.free_shipping_remaining.display()
                ))
                .dim()
            );
        }
    }

    /// Tell the user another session's cart was overwritten.
    pub fn conflict(&self, notice: Option<ConflictNotice>) {
        if let Some(notice) = notice {
            tracing::debug!(?notice, "cart conflict");
            self.warn(&format!(
                "Your cart was changed elsewhere (version {} expected, {} found); this change replaced it.",
                notice.expected, notice.found
            ));
        }
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Label/value pairs for a totals breakdown. Zero discount and premium
/// rows are left out.
pub fn totals_rows(totals: &Totals) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Subtotal", totals.subtotal.display()),
        ("Tax", totals.tax.display()),
    ];
    rows.push((
        "Shipping",
        if totals.has_free_shipping() {
            "FREE".to_string()
        } else {
            totals.shipping.display()
        },
    ));
    if totals.has_discount() {
        rows.push(("Discount", format!("-{}", totals.discount.display())));
    }
    if totals.premium.is_positive() {
        rows.push(("Premium", totals.premium.display()));
    }
    rows.push(("Total", totals.total.display()));
    rows
}

/// Status badge for order states.
pub fn status_badge(status: OrderStatus) -> String {
    let name = status.display_name();
    match status {
        OrderStatus::Delivered => style(name).green().to_string(),
        OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Shipped => {
            style(name).yellow().to_string()
        }
        OrderStatus::Cancelled | OrderStatus::Refunded => style(name).red().to_string(),
        OrderStatus::Unknown => style(name).dim().to_string(),
    }
}

/// Format an RFC 3339 timestamp for display. Unparseable input is shown
/// as-is.
pub fn format_timestamp(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| ts.to_string())
}
