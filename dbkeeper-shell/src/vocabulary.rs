//! Labels used by the two menus.
//!
//! Both menus run the same operations; only the words differ.

/// The words a menu uses for tables, columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    pub table: &'static str,
    pub tables: &'static str,
    pub column: &'static str,
    pub columns: &'static str,
    pub row: &'static str,
    pub rows: &'static str,
    /// Show declared types in plain language
    pub friendly_types: bool,
    /// Add an automatic `id` column to new tables
    pub auto_id: bool,
}

/// Database terminology for the main menu.
pub const TECHNICAL: Vocabulary = Vocabulary {
    table: "table",
    tables: "tables",
    column: "column",
    columns: "columns",
    row: "row",
    rows: "rows",
    friendly_types: false,
    auto_id: false,
};

/// Everyday terminology for the explorer.
pub const EXPLORER: Vocabulary = Vocabulary {
    table: "storage space",
    tables: "storage spaces",
    column: "field",
    columns: "fields",
    row: "item",
    rows: "items",
    friendly_types: true,
    auto_id: true,
};

impl Vocabulary {
    /// How a declared column type is shown.
    pub fn type_label(&self, declared: &str) -> String {
        if !self.friendly_types {
            return declared.to_owned();
        }
        match declared.to_ascii_uppercase().as_str() {
            "INTEGER" | "INT" => "Numbers".to_owned(),
            "TEXT" => "Text/Words".to_owned(),
            "REAL" => "Decimal Numbers".to_owned(),
            "BLOB" => "Files/Binary".to_owned(),
            "" => "Anything".to_owned(),
            _ => declared.to_owned(),
        }
    }
}

/// Uppercase the first letter of a label.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technical_types_are_verbatim() {
        assert_eq!(TECHNICAL.type_label("INTEGER"), "INTEGER");
        assert_eq!(TECHNICAL.type_label("VARCHAR(20)"), "VARCHAR(20)");
    }

    #[test]
    fn explorer_types_are_friendly() {
        assert_eq!(EXPLORER.type_label("integer"), "Numbers");
        assert_eq!(EXPLORER.type_label("TEXT"), "Text/Words");
        assert_eq!(EXPLORER.type_label("REAL"), "Decimal Numbers");
        assert_eq!(EXPLORER.type_label("DATETIME"), "DATETIME");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("storage space"), "Storage space");
        assert_eq!(capitalize(""), "");
    }
}
