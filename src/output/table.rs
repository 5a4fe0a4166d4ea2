//! Table output formatting

use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::models::Placeholder;
use crate::models::display::DetailRow;

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Format a single record as a two-column table
pub fn format_details(rows: &[DetailRow]) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Format the message shown in place of an empty table
pub fn format_placeholder(placeholder: &Placeholder) -> String {
    format!("{}\n{}", placeholder.title.bold(), placeholder.message.dimmed())
}
