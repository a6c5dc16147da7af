//! Text rendering of result sets, schemas and metadata.

use comfy_table::{Cell, ContentArrangement, Table};

use dbkeeper_store::metadata::keys;
use dbkeeper_store::{ColumnInfo, Metadata, Rows, display_value};

use crate::vocabulary::{Vocabulary, capitalize};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Disabled)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// Formats a result set as a table.
pub fn rows_table(rows: &Rows) -> String {
    let mut table = new_table();
    if !rows.columns.is_empty() {
        table.set_header(rows.columns.iter().map(Cell::new));
    }
    for row in &rows.rows {
        table.add_row(row.iter().map(|v| Cell::new(display_value(v))));
    }
    table.to_string()
}

/// Formats a table schema using the menu's labels.
pub fn schema_table(columns: &[ColumnInfo], vocab: &Vocabulary) -> String {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(capitalize(vocab.column)),
        Cell::new("Type"),
        Cell::new("Required"),
        Cell::new("Key"),
        Cell::new("Default"),
    ]);
    for column in columns {
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(vocab.type_label(&column.declared_type)),
            Cell::new(if column.not_null { "YES" } else { "NO" }),
            Cell::new(if column.primary_key { "PK" } else { "" }),
            Cell::new(column.default_value.as_deref().unwrap_or("")),
        ]);
    }
    table.to_string()
}

/// Labelled metadata lines, `N/A` for missing keys.
pub fn metadata_lines(metadata: &Metadata) -> Vec<String> {
    let field = |key: &str| metadata.text(key).unwrap_or("N/A").to_owned();
    let mut lines = vec![
        format!("Description: {}", field(keys::DESCRIPTION)),
        format!("Purpose: {}", field(keys::PURPOSE)),
        format!("Owner: {}", field(keys::OWNER)),
        format!("Created: {}", field(keys::CREATED_DATE)),
        format!("Last Modified: {}", field(keys::LAST_MODIFIED)),
    ];
    if !metadata.tags().is_empty() {
        lines.push(format!("Tags: {}", metadata.tags().join(", ")));
    }
    lines
}

/// Numbered list, one entry per line.
pub fn numbered<S: AsRef<str>>(items: &[S], indent: &str) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{indent}{}. {}", i + 1, item.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use dbkeeper_store::Value;

    use super::*;
    use crate::vocabulary::{EXPLORER, TECHNICAL};

    fn column(name: &str, declared_type: &str, primary_key: bool) -> ColumnInfo {
        ColumnInfo {
            cid: 0,
            name: name.into(),
            declared_type: declared_type.into(),
            not_null: primary_key,
            default_value: None,
            primary_key,
        }
    }

    #[test]
    fn rows_table_contains_values() {
        let rows = Rows {
            columns: vec!["id".into(), "name".into()],
            rows: vec![vec![Value::Integer(1), Value::Text("Widget".into())]],
        };
        let out = rows_table(&rows);
        assert!(out.contains("name"));
        assert!(out.contains("Widget"));
    }

    #[test]
    fn schema_uses_vocabulary() {
        let columns = [column("id", "INTEGER", true), column("title", "TEXT", false)];

        let technical = schema_table(&columns, &TECHNICAL);
        assert!(technical.contains("Column"));
        assert!(technical.contains("INTEGER"));

        let explorer = schema_table(&columns, &EXPLORER);
        assert!(explorer.contains("Field"));
        assert!(explorer.contains("Text/Words"));
        assert!(!explorer.contains("INTEGER"));
    }

    #[test]
    fn missing_metadata_is_na() {
        let metadata = Metadata::new().with(keys::OWNER, "ops");
        let lines = metadata_lines(&metadata);
        assert!(lines.contains(&"Owner: ops".to_owned()));
        assert!(lines.contains(&"Description: N/A".to_owned()));
        assert!(!lines.iter().any(|l| l.starts_with("Tags")));
    }

    #[test]
    fn tags_are_joined() {
        let metadata = Metadata::new().with(keys::TAGS, vec!["a".to_owned(), "b".to_owned()]);
        assert!(metadata_lines(&metadata).contains(&"Tags: a, b".to_owned()));
    }

    #[test]
    fn numbered_from_one() {
        assert_eq!(numbered(&["x", "y"], "  "), ["  1. x", "  2. y"]);
    }
}
