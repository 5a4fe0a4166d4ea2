//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::error::Result;
use crate::models::Placeholder;

pub mod json;
pub mod table;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format - human-readable, one row per record (default)
    #[default]
    Table,
    /// JSON format - structured for scripts
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{other}' (expected table or json)")),
        }
    }
}

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;

    /// Format and print to stdout
    fn print(&self, format: OutputFormat) -> Result<()> {
        println!("{}", self.format(format)?);
        Ok(())
    }
}

impl<T: Tabled + Serialize> Formattable for Vec<T> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(table::format_table(self)),
            OutputFormat::Json => Ok(json::format_json(self)?),
        }
    }
}

/// Render an empty view. JSON output carries `empty` as its data so
/// scripts still receive the envelope.
pub fn format_placeholder<E: Serialize>(
    placeholder: &Placeholder,
    empty: &E,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table::format_placeholder(placeholder)),
        OutputFormat::Json => Ok(json::format_json(empty)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled, Serialize)]
    struct Row {
        #[tabled(rename = "ID")]
        id: u32,
    }

    #[test]
    fn test_vec_formats_both_ways() {
        let rows = vec![Row { id: 7 }];
        assert!(rows.format(OutputFormat::Table).unwrap().contains('7'));

        let json = rows.format(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["data"][0]["id"], 7);
    }

    #[test]
    fn test_placeholder_json_keeps_envelope() {
        let placeholder = Placeholder::new("No Calls Yet", "Calls will appear here.");
        let json = format_placeholder(&placeholder, &Vec::<u32>::new(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["data"], serde_json::json!([]));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
