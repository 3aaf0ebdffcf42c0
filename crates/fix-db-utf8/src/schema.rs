//! Schema metadata types and the column qualification rule.
//!
//! Descriptors are re-fetched from the live schema on every run; nothing is
//! persisted between invocations.

use serde::{Deserialize, Serialize};

/// Metadata for one base table, as reported by INFORMATION_SCHEMA.TABLES.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,
    /// Storage engine (InnoDB, MyISAM, ...). NULL for broken tables.
    pub engine: Option<String>,
    /// Default collation of the table.
    pub collation: Option<String>,
    /// Estimated row count.
    pub row_count: i64,
}

/// Metadata for one column, as reported by INFORMATION_SCHEMA.COLUMNS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Full declared SQL type, e.g. `varchar(255)` or `mediumtext`.
    /// Preserved verbatim through every ALTER.
    pub column_type: String,
    /// Declared collation. None for non-character columns.
    pub collation: Option<String>,
}

impl ColumnDescriptor {
    /// Whether the declared type is in the character/text family.
    ///
    /// Matches `char` and `text` as substrings, which covers char, varchar,
    /// tinytext, text, mediumtext and longtext but not varbinary, blob,
    /// numeric or date types.
    pub fn is_text_family(&self) -> bool {
        let ty = self.column_type.to_ascii_lowercase();
        ty.contains("char") || ty.contains("text")
    }

    /// Whether the declared collation is already in the UTF-8 family
    /// (utf8, utf8mb3, utf8mb4 and their collations).
    pub fn is_utf8_family(&self) -> bool {
        self.collation
            .as_deref()
            .is_some_and(|c| c.to_ascii_lowercase().starts_with("utf8"))
    }

    /// The qualification rule: a column is converted only if it is a
    /// character/text column whose collation is not yet UTF-8-family.
    pub fn needs_conversion(&self) -> bool {
        self.is_text_family() && !self.is_utf8_family()
    }
}

/// Quote a MySQL identifier with backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(column_type: &str, collation: Option<&str>) -> ColumnDescriptor {
        ColumnDescriptor {
            name: "c".to_string(),
            column_type: column_type.to_string(),
            collation: collation.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_text_family_types_qualify() {
        assert!(col("varchar(255)", Some("latin1_swedish_ci")).needs_conversion());
        assert!(col("char(36)", Some("latin1_swedish_ci")).needs_conversion());
        assert!(col("text", Some("latin1_swedish_ci")).needs_conversion());
        assert!(col("mediumtext", Some("big5_chinese_ci")).needs_conversion());
        assert!(col("longtext", Some("cp1251_general_ci")).needs_conversion());
        assert!(col("VARCHAR(80)", Some("latin1_german1_ci")).needs_conversion());
    }

    #[test]
    fn test_utf8_family_never_qualifies() {
        assert!(!col("varchar(255)", Some("utf8_unicode_ci")).needs_conversion());
        assert!(!col("text", Some("utf8_general_ci")).needs_conversion());
        assert!(!col("longtext", Some("utf8mb4_unicode_ci")).needs_conversion());
        assert!(!col("char(2)", Some("utf8mb3_general_ci")).needs_conversion());
    }

    #[test]
    fn test_non_character_types_never_qualify() {
        assert!(!col("int(11)", None).needs_conversion());
        assert!(!col("bigint(20) unsigned", None).needs_conversion());
        assert!(!col("datetime", None).needs_conversion());
        assert!(!col("decimal(10,2)", None).needs_conversion());
        assert!(!col("blob", None).needs_conversion());
        assert!(!col("varbinary(255)", None).needs_conversion());
        assert!(!col("longblob", None).needs_conversion());
    }

    #[test]
    fn test_text_column_without_collation_qualifies() {
        // A text column reported with no collation cannot be UTF-8 yet.
        assert!(col("varchar(64)", None).needs_conversion());
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("tt_content"), "`tt_content`");
        assert_eq!(quote_ident("weird`name"), "`weird``name`");
    }
}
