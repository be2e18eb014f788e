//! Output formatting for tabular tool results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use unicode_width::UnicodeWidthStr;

/// Output format for row previews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// ASCII table format (like MySQL CLI)
    Table,
    /// Markdown table format
    Markdown,
}

pub fn format_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell(row: &serde_json::Map<String, JsonValue>, column: &str) -> JsonValue {
    row.get(column).cloned().unwrap_or(JsonValue::Null)
}

pub fn format_as_table(
    columns: &[String],
    rows: &[serde_json::Map<String, JsonValue>],
    execution_time_ms: u64,
) -> String {
    if columns.is_empty() {
        return "Empty set".to_string();
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.width()).collect();
    for row in rows {
        for (i, col) in columns.iter().enumerate() {
            widths[i] = widths[i].max(format_value(&cell(row, col)).width());
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    // Padding is computed by display width so CJK names line up
    let pad = |text: &str, width: usize, right: bool| {
        let fill = " ".repeat(width.saturating_sub(text.width()));
        if right {
            format!("| {}{} ", fill, text)
        } else {
            format!("| {}{} ", text, fill)
        }
    };

    let mut output = String::new();
    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| pad(col, *w, false))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);
    output.push_str(&separator);

    for row in rows {
        let line: String = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| {
                let value = cell(row, col);
                pad(&format_value(&value), *w, value.is_number())
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&line);
    }
    output.push_str(&separator);

    let row_text = if rows.len() == 1 { "row" } else { "rows" };
    output.push_str(&format!(
        "{} {} in set ({:.2} sec)\n",
        rows.len(),
        row_text,
        execution_time_ms as f64 / 1000.0
    ));
    output
}

pub fn format_as_markdown(columns: &[String], rows: &[serde_json::Map<String, JsonValue>]) -> String {
    if columns.is_empty() {
        return "*Empty set*".to_string();
    }

    let mut output = String::new();
    let header: String = columns.iter().map(|c| format!("| {} ", c)).collect::<String>() + "|\n";
    output.push_str(&header);
    output.push_str(&(columns.iter().map(|_| "|---").collect::<String>() + "|\n"));

    for row in rows {
        let line: String = columns
            .iter()
            .map(|col| format!("| {} ", format_value(&cell(row, col)).replace('|', "\\|")))
            .collect::<String>()
            + "|\n";
        output.push_str(&line);
    }

    output.push_str(&format!("\n*{} rows*", rows.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<serde_json::Map<String, JsonValue>> {
        vec![
            json!({"name": "Kohli", "runs": 12000})
                .as_object()
                .cloned()
                .unwrap(),
            json!({"name": "Root", "runs": null}).as_object().cloned().unwrap(),
        ]
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&JsonValue::Null), "NULL");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_format_as_table() {
        let columns = vec!["name".to_string(), "runs".to_string()];
        let table = format_as_table(&columns, &rows(), 20);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "+-------+-------+");
        assert_eq!(lines[1], "| name  | runs  |");
        assert_eq!(lines[3], "| Kohli | 12000 |");
        assert_eq!(lines[4], "| Root  | NULL  |");
        assert!(table.ends_with("2 rows in set (0.02 sec)\n"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_as_table(&[], &[], 0), "Empty set");
        assert_eq!(format_as_markdown(&[], &[]), "*Empty set*");
    }

    #[test]
    fn test_format_as_markdown() {
        let columns = vec!["name".to_string(), "runs".to_string()];
        let md = format_as_markdown(&columns, &rows());
        assert!(md.starts_with("| name | runs |\n|---|---|\n"));
        assert!(md.contains("| Kohli | 12000 |"));
        assert!(md.contains("| Root | NULL |"));
        assert!(md.ends_with("*2 rows*"));
    }
}
