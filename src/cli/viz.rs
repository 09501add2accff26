//! Terminal visualization - bar charts and the calendar month grid

use chrono::{Datelike, NaiveDate};

use crate::core::analytics::CountRow;

/// Render a horizontal bar chart, one row per (label, count), scaled to the
/// largest count.
///
/// # Example Output
/// ```text
///   Mechanics      3  ████████████████████████
///   Electricians   1  ████████
///   IT Support     0
/// ```
pub fn render_bar_chart(rows: &[CountRow], width: usize) -> String {
    if rows.is_empty() {
        return "  (no data)".to_string();
    }

    let max = rows.iter().map(|r| r.count).max().unwrap_or(0).max(1);
    let label_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|row| {
            let filled = row.count * width / max;
            format!(
                "  {:<label_width$}  {:>3}  {}",
                row.name,
                row.count,
                "█".repeat(filled),
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Month layout for the calendar view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    /// Empty cells before day 1, counting from Sunday
    pub leading_blanks: u32,
}

/// Compute the layout of a calendar month. `None` for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some(MonthGrid {
        year,
        month,
        days_in_month: next_month.signed_duration_since(first).num_days() as u32,
        leading_blanks: first.weekday().num_days_from_sunday(),
    })
}

/// Render a month as a Sunday-first grid. Days listed in `marked` get a `*`
/// (scheduled work); `today` is bracketed.
///
/// # Example Output
/// ```text
///   Sun  Mon  Tue  Wed  Thu  Fri  Sat
///                   1    2    3    4
///     5    6    7    8    9 [10]  11
///    12*  13   14   15   16   17   18
/// ```
pub fn render_month_grid(grid: &MonthGrid, marked: &[u32], today: Option<u32>) -> String {
    let mut lines = vec!["  Sun  Mon  Tue  Wed  Thu  Fri  Sat".to_string()];

    let mut line = String::new();
    for _ in 0..grid.leading_blanks {
        line.push_str("     ");
    }

    for day in 1..=grid.days_in_month {
        let cell = if today == Some(day) {
            format!(" [{:>2}]", day)
        } else if marked.contains(&day) {
            format!("  {:>2}*", day)
        } else {
            format!("  {:>2} ", day)
        };
        line.push_str(&cell);

        let column = (grid.leading_blanks + day) % 7;
        if column == 0 {
            lines.push(line.trim_end().to_string());
            line = String::new();
        }
    }
    if !line.trim().is_empty() {
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}
