//! Plain-text rendering of tables and meta tags for the terminal.

use scrape_engine::{DataTable, MetaTag};

/// Render the table with padded columns, a header row and a separator.
pub fn render_table(table: &DataTable) -> String {
    if table.column_count() == 0 {
        return "(empty table)\n".to_string();
    }

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    render_row(&mut out, &table.columns, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    render_row(&mut out, &separator, &widths);
    for row in &table.rows {
        render_row(&mut out, row, &widths);
    }
    if table.rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            out.push_str("  ");
        }
        let cell = cells.get(idx).map(String::as_str).unwrap_or("");
        out.push_str(cell);
        for _ in cell.chars().count()..*width {
            out.push(' ');
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

/// One line per tag, attributes joined as `name="value"` pairs.
pub fn render_meta_tags(tags: &[MetaTag]) -> String {
    if tags.is_empty() {
        return "(no meta tags)\n".to_string();
    }
    let mut out = String::new();
    for tag in tags {
        let attrs: Vec<String> = tag
            .attrs
            .iter()
            .map(|(name, value)| format!("{name}=\"{value}\""))
            .collect();
        out.push_str(&attrs.join(" "));
        out.push('\n');
    }
    out
}
