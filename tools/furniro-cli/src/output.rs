//! Output formatting for the CLI.

use console::style;
use furniro_cart::{CartItem, Money, PersistenceStatus, WishlistItem};

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

    /// Print cart entries as a table.
    pub fn cart_table(&self, items: &[CartItem]) {
        if items.is_empty() {
            self.list_item(&style("(empty)").dim().to_string());
            return;
        }
        let widths = column_widths(items.iter().map(|i| (i.product_id.as_str(), i.title.as_str())));
        self.table_row(&["ID", "TITLE", "QTY", "PRICE", "TOTAL"], &widths);
        for item in items {
            self.table_row(
                &[
                    item.product_id.as_str(),
                    &item.title,
                    &item.quantity.to_string(),
                    &item.unit_price.display(),
                    &item.line_total().display(),
                ],
                &widths,
            );
        }
    }

    /// Print wishlist entries as a table.
    pub fn wishlist_table(&self, items: &[WishlistItem]) {
        if items.is_empty() {
            self.list_item(&style("(empty)").dim().to_string());
            return;
        }
        let widths = column_widths(items.iter().map(|i| (i.product_id.as_str(), i.title.as_str())));
        self.table_row(&["ID", "TITLE", "PRICE"], &[widths[0], widths[1], widths[3]]);
        for item in items {
            self.table_row(
                &[item.product_id.as_str(), &item.title, &item.unit_price.display()],
                &[widths[0], widths[1], widths[3]],
            );
        }
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn column_widths<'a>(rows: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<usize> {
    let (mut id, mut title) = (2, 5);
    for (i, t) in rows {
        id = id.max(i.chars().count());
        title = title.max(t.chars().count());
    }
    vec![id, title.min(40), 4, 12, 12]
}

/// Format a subtotal line.
pub fn format_subtotal(subtotal: Money) -> String {
    style(subtotal.display()).bold().to_string()
}

/// Status badge for the persistence mode.
pub fn status_badge(status: PersistenceStatus) -> String {
    match status {
        PersistenceStatus::Durable => style("durable").green().to_string(),
        PersistenceStatus::MemoryOnly => style("memory only").yellow().to_string(),
    }
}
