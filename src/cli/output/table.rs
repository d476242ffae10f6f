//! Table output formatting for CLI commands
//!
//! Renders weights, convergences and catalog rankings using comfy-table.
//! Colors are skipped when NO_COLOR is set or the terminal is dumb.

use crate::domain::models::{DetectionResult, RankedItem, WeightVector};
use crate::services::AdjustmentRecord;
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format a weight vector, one row per axis
    pub fn format_weights(&self, weights: &WeightVector) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Axis").add_attribute(Attribute::Bold),
            Cell::new("Weight").add_attribute(Attribute::Bold),
        ]);

        for (axis, value) in weights.iter() {
            table.add_row(vec![
                Cell::new(axis.as_str()),
                self.level_cell(format!("{value:.2}"), value),
            ]);
        }

        table.to_string()
    }

    /// Format solver adjustments
    pub fn format_adjustments(&self, adjustments: &[AdjustmentRecord]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Adjustment").add_attribute(Attribute::Bold),
            Cell::new("Axis").add_attribute(Attribute::Bold),
            Cell::new("Before").add_attribute(Attribute::Bold),
            Cell::new("After").add_attribute(Attribute::Bold),
        ]);

        for record in adjustments {
            let kind = serde_json::to_value(record.kind)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            table.add_row(vec![
                Cell::new(kind),
                Cell::new(record.axis.as_str()),
                Cell::new(format!("{:.4}", record.before)),
                Cell::new(format!("{:.4}", record.after)),
            ]);
        }

        table.to_string()
    }

    /// Format detected convergences, strongest first
    pub fn format_convergences(&self, detection: &DetectionResult) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Keyword").add_attribute(Attribute::Bold),
            Cell::new("Axes").add_attribute(Attribute::Bold),
            Cell::new("Strength").add_attribute(Attribute::Bold),
            Cell::new("Boosted").add_attribute(Attribute::Bold),
        ]);

        for convergence in &detection.convergences {
            let axes: Vec<&str> = convergence.axes_present.iter().map(|a| a.as_str()).collect();
            let boosted = if convergence.boosted { "yes" } else { "-" };
            table.add_row(vec![
                Cell::new(truncate_text(&convergence.keyword, 30)),
                Cell::new(axes.join(", ")),
                self.level_cell(format!("{:.3}", convergence.strength), convergence.strength),
                Cell::new(boosted),
            ]);
        }

        table.to_string()
    }

    /// Format ranked catalog items
    pub fn format_ranking(&self, ranking: &[RankedItem]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Item").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Main reasons").add_attribute(Attribute::Bold),
            Cell::new("Evidence").add_attribute(Attribute::Bold),
        ]);

        for (rank, item) in ranking.iter().enumerate() {
            let reasons: Vec<&str> = item.result.main_reasons.iter().map(|a| a.as_str()).collect();
            let evidence = if item.result.evidences.is_empty() {
                "-".to_string()
            } else {
                item.result.evidences.join(", ")
            };
            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(truncate_text(&item.item_id, 40)),
                self.level_cell(format!("{:.2}", item.result.score), item.result.score),
                Cell::new(reasons.join(", ")),
                Cell::new(evidence),
            ]);
        }

        table.to_string()
    }

    /// Cell colored by a value in `[0, 1]`
    fn level_cell(&self, text: String, value: f64) -> Cell {
        let cell = Cell::new(text);
        if self.use_colors {
            cell.fg(level_color(value))
        } else {
            cell
        }
    }

    /// Create a base table with common settings
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

fn level_color(value: f64) -> Color {
    if value >= 0.7 {
        Color::Green
    } else if value >= 0.4 {
        Color::Yellow
    } else {
        Color::DarkGrey
    }
}

/// Truncate text to max length with ellipsis
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
