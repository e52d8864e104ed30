//! Plain-text tables and value formatting shared by command handlers.

use chrono::DateTime;

use crate::grades::FinalGrade;

/// Renders rows under a header, padding every column to its widest cell.
///
/// Columns are separated by two spaces and the header is underlined with
/// dashes. Trailing padding is trimmed from each line.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.iter().map(|h| (*h).to_string()).collect()));
    out.push(line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    out.extend(rows.iter().map(|row| line(row.clone())));
    out.join("\n")
}

/// `YYYY-MM-DD` for a unix timestamp, or `-` when it is unset or out of range.
pub(crate) fn format_date(timestamp: i64) -> String {
    if timestamp == 0 {
        return "-".to_string();
    }
    DateTime::from_timestamp(timestamp, 0)
        .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

/// A number without a trailing `.0`, to two decimals otherwise.
pub(crate) fn format_points(value: f64) -> String {
    let rounded = format!("{value:.2}");
    rounded.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `score/max (pct%)`; a percentage that cannot be computed shows as `n/a`.
pub(crate) fn format_final(final_grade: &FinalGrade) -> String {
    let percentage = if final_grade.has_percentage() {
        format!("{:.1}%", final_grade.percentage)
    } else {
        "n/a".to_string()
    };
    format!(
        "{}/{} ({percentage})",
        format_points(final_grade.final_score),
        format_points(final_grade.max_total)
    )
}
