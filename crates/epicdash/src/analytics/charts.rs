//! Terminal bar charts for the analytics view

use colored::Colorize;
use epicdash_core::wcag::{completion_percentage, StandardBar, StatusCount};

use crate::style::format_status;

/// Width of the longest bar, in cells
pub const BAR_WIDTH: usize = 40;

const BLOCK: &str = "█";

/// Number of cells a value occupies relative to `max`
///
/// Non-zero values always get at least one cell so they stay visible.
pub fn bar_cells(value: usize, max: usize, width: usize) -> usize {
    if value == 0 || max == 0 {
        return 0;
    }

    let cells = (value as f64 / max as f64 * width as f64).round() as usize;
    cells.clamp(1, width)
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

fn pad(label: &str, width: usize) -> String {
    format!("{label:<width$}")
}

/// One line per status: bar, count and share of all issues
pub fn status_chart(distribution: &[StatusCount]) -> Vec<String> {
    let total: usize = distribution.iter().map(|s| s.count).sum();
    let max = distribution.iter().map(|s| s.count).max().unwrap_or(0);
    let width = label_width(distribution.iter().map(|s| s.status.as_str()));

    distribution
        .iter()
        .map(|s| {
            format!(
                "{}{} {} {} ({:.1}%)",
                format_status(&s.status),
                " ".repeat(width - s.status.chars().count()),
                BLOCK.repeat(bar_cells(s.count, max, BAR_WIDTH)).bright_blue(),
                s.count,
                completion_percentage(s.count, total)
            )
        })
        .collect()
}

/// Two lines per standard: total issues, then completed issues
pub fn standards_chart(bars: &[StandardBar]) -> Vec<String> {
    let max = bars.iter().map(|b| b.total).max().unwrap_or(0);
    let width = label_width(bars.iter().map(|b| b.standard.as_str()));

    bars.iter()
        .flat_map(|b| {
            [
                format!(
                    "{} {} {}",
                    pad(&b.standard, width).bold(),
                    BLOCK.repeat(bar_cells(b.total, max, BAR_WIDTH)).bright_blue(),
                    b.total
                ),
                format!(
                    "{} {} {}",
                    pad("", width),
                    BLOCK.repeat(bar_cells(b.completed, max, BAR_WIDTH)).bright_green(),
                    b.completed
                ),
            ]
        })
        .collect()
}
