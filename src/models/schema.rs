//! Schema-related data models.
//!
//! This module defines the records produced by schema discovery.

use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// Databases that never appear in a discovery result.
pub const EXCLUDED_DATABASES: [&str; 4] = ["information_schema", "performance_schema", "mysql", "sys"];

/// Whether a database name is one of the server's own system databases.
///
/// Names compare exactly; a user database called `Sys` is kept.
pub fn is_system_database(name: &str) -> bool {
    EXCLUDED_DATABASES.contains(&name)
}

/// Index role of a column, as reported in `COLUMN_KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    Primary,
    Unique,
    /// First column of a non-unique index
    Multiple,
    #[default]
    None,
}

impl KeyRole {
    /// Parse the catalog's `COLUMN_KEY` code (`PRI`, `UNI`, `MUL` or empty).
    pub fn from_column_key(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "PRI" => Self::Primary,
            "UNI" => Self::Unique,
            "MUL" => Self::Multiple,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ColumnInfo {
    pub name: String,
    /// e.g. "varchar", "int"
    pub declared_type: String,
    pub nullable: bool,
    pub key_role: KeyRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// e.g. "auto_increment"; empty when none
    pub extra: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: true,
            key_role: KeyRole::None,
            default_value: None,
            extra: String::new(),
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_key_role(mut self, key_role: KeyRole) -> Self {
        self.key_role = key_role;
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}

/// Views are listed by name only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ViewInfo {}

/// Placeholder for stored routines; never populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RoutineInfo {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DatabaseStructure {
    /// Columns in ordinal order
    pub tables: BTreeMap<String, Vec<ColumnInfo>>,
    pub views: BTreeMap<String, ViewInfo>,
    pub functions: BTreeMap<String, RoutineInfo>,
    pub procedures: BTreeMap<String, RoutineInfo>,
}

impl DatabaseStructure {
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}

/// Database name to structure.
pub type SchemaInfo = BTreeMap<String, DatabaseStructure>;

/// A database that discovery had to skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SchemaAccessFailure {
    pub database: String,
    pub reason: String,
}

/// Result of a full schema discovery.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct Discovery {
    pub schema: SchemaInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SchemaAccessFailure>,
}

impl Discovery {
    /// Database names in sorted order.
    pub fn database_names(&self) -> Vec<String> {
        self.schema.keys().cloned().collect()
    }

    /// Sorted table names of a database; empty when the database is unknown.
    pub fn table_names(&self, database: &str) -> Vec<String> {
        self.schema
            .get(database)
            .map(DatabaseStructure::table_names)
            .unwrap_or_default()
    }

    /// Ordered columns of a table; empty when the database or table is unknown.
    pub fn columns(&self, database: &str, table: &str) -> Vec<ColumnInfo> {
        self.schema
            .get(database)
            .and_then(|db| db.tables.get(table))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Discovery {
        let mut structure = DatabaseStructure::default();
        structure.tables.insert(
            "players".to_string(),
            vec![
                ColumnInfo::new("id", "int")
                    .with_nullable(false)
                    .with_key_role(KeyRole::Primary)
                    .with_extra("auto_increment"),
                ColumnInfo::new("name", "varchar"),
            ],
        );
        structure.tables.insert("matches".to_string(), Vec::new());
        structure.views.insert("top_scorers".to_string(), ViewInfo {});

        let mut schema = SchemaInfo::new();
        schema.insert("cricbuzz_data".to_string(), structure);
        Discovery {
            schema,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_key_role_from_column_key() {
        assert_eq!(KeyRole::from_column_key("PRI"), KeyRole::Primary);
        assert_eq!(KeyRole::from_column_key("UNI"), KeyRole::Unique);
        assert_eq!(KeyRole::from_column_key("mul"), KeyRole::Multiple);
        assert_eq!(KeyRole::from_column_key(""), KeyRole::None);
    }

    #[test]
    fn test_system_databases() {
        assert!(is_system_database("mysql"));
        assert!(is_system_database("information_schema"));
        assert!(!is_system_database("cricbuzz_data"));
        assert!(!is_system_database("Sys"));
        assert!(!is_system_database("MySQL"));
    }

    #[test]
    fn test_table_names_sorted() {
        let discovery = sample();
        assert_eq!(discovery.table_names("cricbuzz_data"), vec!["matches", "players"]);
        assert!(discovery.table_names("missing").is_empty());
    }

    #[test]
    fn test_columns_keep_order() {
        let discovery = sample();
        let names: Vec<_> = discovery
            .columns("cricbuzz_data", "players")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["id", "name"]);
        assert!(discovery.columns("cricbuzz_data", "missing").is_empty());
        assert!(discovery.columns("missing", "players").is_empty());
    }

    #[test]
    fn test_serialize_column() {
        let col = ColumnInfo::new("id", "int")
            .with_nullable(false)
            .with_key_role(KeyRole::Primary);
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["key_role"], "primary");
        assert!(json.get("default_value").is_none());
    }
}
