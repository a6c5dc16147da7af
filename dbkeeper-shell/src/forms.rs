//! Parsing of the guided column form and `key=value` row entry.

use std::fmt;

/// Column types offered by guided table creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Real,
    Blob,
}

impl ColumnType {
    /// Map user input (including common aliases) to a column type.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "INTEGER" | "INT" => Some(Self::Integer),
            "TEXT" | "STRING" | "VARCHAR" | "CHAR" => Some(Self::Text),
            "REAL" | "FLOAT" | "DOUBLE" | "DECIMAL" => Some(Self::Real),
            "BLOB" | "BINARY" => Some(Self::Blob),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One column collected by the guided form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
    pub primary_key: bool,
    pub autoincrement: bool,
    pub not_null: bool,
    pub unique: bool,
    pub default: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_owned(),
            column_type,
            primary_key: false,
            autoincrement: false,
            not_null: false,
            unique: false,
            default: None,
        }
    }

    /// The automatic `id` column added by the explorer.
    pub fn auto_id() -> Self {
        Self {
            primary_key: true,
            autoincrement: true,
            ..Self::new("id", ColumnType::Integer)
        }
    }

    /// Column definition fragment, e.g. `name TEXT NOT NULL DEFAULT 'x'`.
    ///
    /// AUTOINCREMENT is only emitted for INTEGER primary keys. TEXT defaults
    /// are written as string literals, other defaults verbatim.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
            if self.autoincrement && self.column_type == ColumnType::Integer {
                sql.push_str(" AUTOINCREMENT");
            }
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = &self.default {
            if self.column_type == ColumnType::Text {
                sql.push_str(&format!(" DEFAULT '{}'", default.replace('\'', "''")));
            } else {
                sql.push_str(&format!(" DEFAULT {default}"));
            }
        }
        sql
    }
}

/// Join column fragments into the clause passed to table creation.
pub fn columns_clause(columns: &[ColumnSpec]) -> String {
    columns
        .iter()
        .map(ColumnSpec::to_sql)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remove one pair of matching surrounding quotes.
pub fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse a `column=value` line.
///
/// Splits at the first `=`, trims both sides and strips quotes from the
/// value. `None` if there is no `=` or the column is empty.
pub fn parse_pair(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_owned(), strip_quotes(value.trim()).to_owned()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("int", Some(ColumnType::Integer))]
    #[case("INTEGER", Some(ColumnType::Integer))]
    #[case("string", Some(ColumnType::Text))]
    #[case("VarChar", Some(ColumnType::Text))]
    #[case("char", Some(ColumnType::Text))]
    #[case("float", Some(ColumnType::Real))]
    #[case("DOUBLE", Some(ColumnType::Real))]
    #[case("decimal", Some(ColumnType::Real))]
    #[case("binary", Some(ColumnType::Blob))]
    #[case(" blob ", Some(ColumnType::Blob))]
    #[case("datetime", None)]
    #[case("", None)]
    fn column_type_aliases(#[case] input: &str, #[case] expected: Option<ColumnType>) {
        assert_eq!(ColumnType::parse(input), expected);
    }

    #[test]
    fn column_fragment_with_constraints() {
        let mut spec = ColumnSpec::new("username", ColumnType::Text);
        spec.not_null = true;
        spec.unique = true;
        spec.default = Some("o'brien".into());
        assert_eq!(
            spec.to_sql(),
            "username TEXT NOT NULL UNIQUE DEFAULT 'o''brien'"
        );
    }

    #[test]
    fn autoincrement_only_for_integer_keys() {
        assert_eq!(
            ColumnSpec::auto_id().to_sql(),
            "id INTEGER PRIMARY KEY AUTOINCREMENT"
        );

        let mut code = ColumnSpec::new("code", ColumnType::Text);
        code.primary_key = true;
        code.autoincrement = true;
        assert_eq!(code.to_sql(), "code TEXT PRIMARY KEY");
    }

    #[test]
    fn numeric_default_is_verbatim() {
        let mut spec = ColumnSpec::new("balance", ColumnType::Real);
        spec.default = Some("0.0".into());
        assert_eq!(spec.to_sql(), "balance REAL DEFAULT 0.0");
    }

    #[test]
    fn clause_joins_columns() {
        let columns = [
            ColumnSpec::auto_id(),
            ColumnSpec::new("name", ColumnType::Text),
        ];
        assert_eq!(
            columns_clause(&columns),
            "id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT"
        );
    }

    #[rstest]
    #[case("name=John Doe", Some(("name", "John Doe")))]
    #[case("  age = 25 ", Some(("age", "25")))]
    #[case("email=\"a@b.c\"", Some(("email", "a@b.c")))]
    #[case("note='hi there'", Some(("note", "hi there")))]
    #[case("note='mixed\"", Some(("note", "'mixed\"")))]
    #[case("expr=a=b", Some(("expr", "a=b")))]
    #[case("empty=", Some(("empty", "")))]
    #[case("no separator", None)]
    #[case("=value", None)]
    fn pair_parsing(#[case] line: &str, #[case] expected: Option<(&str, &str)>) {
        let expected = expected.map(|(k, v)| (k.to_owned(), v.to_owned()));
        assert_eq!(parse_pair(line), expected);
    }

    #[test]
    fn single_quote_char_is_kept() {
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("''"), "");
    }
}
