//! Table output formatting
//!
//! Every listing renders through `format_table`, so an empty catalog or an
//! empty scanner page reads the same in every command.

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Printed in place of a table that has no rows
pub const NO_RESULTS: &str = "No results found.";

/// Render rows as a rounded table with centered headers, followed by a row count
pub fn format_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{}\n{}", table, row_count(rows.len()))
}

fn row_count(n: usize) -> String {
    match n {
        1 => "1 row".to_string(),
        n => format!("{} rows", n),
    }
}
