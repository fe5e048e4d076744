//! Point-in-time schema snapshots captured from a live database catalog.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DriftError;

/// One of the independent database environments the tool compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// All known environments, in precedence order.
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Test,
        Environment::Production,
    ];

    /// The lowercase name used in CLI arguments and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" => Ok(Environment::Production),
            other => Err(DriftError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// One column as seen in the database catalog.
///
/// `(table, column)` is unique within a snapshot; the catalog query
/// guarantees this and nothing in this crate synthesizes duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Table the column belongs to.
    pub table: String,
    /// Column name.
    pub column: String,
    /// Catalog data type (e.g. "integer", "character varying").
    pub data_type: String,
    /// Whether the column accepts NULL.
    pub is_nullable: bool,
    /// Default value expression, verbatim from the catalog.
    pub default_expression: Option<String>,
    /// 1-based position within the table.
    pub ordinal_position: i32,
}

/// A foreign key edge, kept so table creation can be dependency-ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referencing column.
    pub column: String,
    /// Table the foreign key points at.
    pub referenced_table: String,
}

/// All columns of one table, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnDescriptor>,
    /// Primary key column, when the table has a single-column key.
    pub primary_key: Option<String>,
    /// Outgoing foreign key references.
    pub foreign_keys: Vec<ForeignKeyRef>,
}

impl TableSchema {
    /// Create an empty table schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
        }
    }

    /// Append a column, preserving ordinal order.
    pub fn push_column(&mut self, column: ColumnDescriptor) {
        self.columns.push(column);
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.column == name)
    }

    /// Whether the table has a column with this exact name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// Naming normalization applied to both snapshots before diffing.
///
/// The canonical policy is `Exact`: database-to-database comparison with no
/// conversion. `SnakeCase` is an explicit opt-in for comparing against a
/// database populated from camelCase model definitions; it is never applied
/// implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Byte-for-byte, case-sensitive identifier comparison.
    #[default]
    Exact,
    /// Convert all table and column identifiers to snake_case first.
    SnakeCase,
}

impl NamingPolicy {
    /// Apply the policy to one identifier.
    pub fn apply(&self, ident: &str) -> String {
        match self {
            NamingPolicy::Exact => ident.to_string(),
            NamingPolicy::SnakeCase => to_snake_case(ident),
        }
    }
}

/// Convert a camelCase or PascalCase identifier to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// A point-in-time read of one environment's table/column structure.
///
/// Immutable once captured: the introspector builds it, the differ reads it,
/// nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Environment the snapshot was captured from.
    pub environment: Environment,
    /// Tables keyed by name, in catalog discovery order.
    pub tables: IndexMap<String, TableSchema>,
}

impl SchemaSnapshot {
    /// Create an empty snapshot for an environment.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            tables: IndexMap::new(),
        }
    }

    /// Insert a table, replacing any previous table of the same name.
    pub fn add_table(&mut self, table: TableSchema) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Number of tables in the snapshot.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.values().map(|t| t.columns.len()).sum()
    }

    /// Return a copy with the naming policy applied to every table and
    /// column identifier. `Exact` returns an unchanged clone.
    pub fn normalized(&self, policy: NamingPolicy) -> SchemaSnapshot {
        if policy == NamingPolicy::Exact {
            return self.clone();
        }

        let mut normalized = SchemaSnapshot::new(self.environment);
        for table in self.tables.values() {
            let name = policy.apply(&table.name);
            let columns = table
                .columns
                .iter()
                .map(|c| ColumnDescriptor {
                    table: name.clone(),
                    column: policy.apply(&c.column),
                    data_type: c.data_type.clone(),
                    is_nullable: c.is_nullable,
                    default_expression: c.default_expression.clone(),
                    ordinal_position: c.ordinal_position,
                })
                .collect();
            let foreign_keys = table
                .foreign_keys
                .iter()
                .map(|fk| ForeignKeyRef {
                    column: policy.apply(&fk.column),
                    referenced_table: policy.apply(&fk.referenced_table),
                })
                .collect();
            normalized.add_table(TableSchema {
                name,
                columns,
                primary_key: table.primary_key.as_deref().map(|pk| policy.apply(pk)),
                foreign_keys,
            });
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(table: &str, name: &str, position: i32) -> ColumnDescriptor {
        ColumnDescriptor {
            table: table.to_string(),
            column: name.to_string(),
            data_type: "text".to_string(),
            is_nullable: true,
            default_expression: None,
            ordinal_position: position,
        }
    }

    #[test]
    fn test_environment_round_trip() {
        for env in Environment::ALL {
            assert_eq!(env.as_str().parse::<Environment>().unwrap(), env);
        }
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("userProfile"), "user_profile");
        assert_eq!(to_snake_case("UserProfile"), "user_profile");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("id"), "id");
    }

    #[test]
    fn test_snapshot_lookup_preserves_order() {
        let mut snapshot = SchemaSnapshot::new(Environment::Development);
        let mut users = TableSchema::new("users");
        users.push_column(column("users", "id", 1));
        users.push_column(column("users", "email", 2));
        snapshot.add_table(users);
        snapshot.add_table(TableSchema::new("accounts"));

        assert_eq!(snapshot.table_count(), 2);
        assert_eq!(snapshot.column_count(), 2);
        assert!(snapshot.table("users").unwrap().has_column("email"));

        let names: Vec<&String> = snapshot.tables.keys().collect();
        assert_eq!(names, vec!["users", "accounts"]);
    }

    #[test]
    fn test_normalized_snake_case_renames_everything() {
        let mut snapshot = SchemaSnapshot::new(Environment::Development);
        let mut table = TableSchema::new("feeGroups");
        table.push_column(column("feeGroups", "groupName", 1));
        table.primary_key = Some("groupName".to_string());
        table.foreign_keys.push(ForeignKeyRef {
            column: "merchantId".to_string(),
            referenced_table: "merchantAccounts".to_string(),
        });
        snapshot.add_table(table);

        let normalized = snapshot.normalized(NamingPolicy::SnakeCase);
        let table = normalized.table("fee_groups").unwrap();
        assert!(table.has_column("group_name"));
        assert_eq!(table.columns[0].table, "fee_groups");
        assert_eq!(table.primary_key.as_deref(), Some("group_name"));
        assert_eq!(table.foreign_keys[0].referenced_table, "merchant_accounts");
    }

    #[test]
    fn test_normalized_exact_is_identity() {
        let mut snapshot = SchemaSnapshot::new(Environment::Test);
        snapshot.add_table(TableSchema::new("MixedCase"));
        assert_eq!(snapshot.normalized(NamingPolicy::Exact), snapshot);
    }
}
