//! Identifier value types for tables and columns.
//!
//! Every table and column reference in the engine goes through these types
//! instead of ad hoc string splitting. Each has a single canonical string
//! rendering (`schema.table` and `schema.table.column`) which is also its
//! serialized form, so persisted query documents stay readable.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Schema used when an identifier string carries no schema qualifier.
pub const DEFAULT_SCHEMA: &str = "public";

/// Errors from parsing identifier strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentError {
    #[error("column id '{0}' must have at least table and column segments")]
    MalformedColumnId(String),

    #[error("column reference '{0}' must be 'schema.table.column' or 'table.column'")]
    MalformedReference(String),
}

// =============================================================================
// Table identifier
// =============================================================================

/// A table identifier: schema plus table name.
///
/// Canonically rendered as `schema.table`. Unique within a schema model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId {
    schema: String,
    name: String,
}

impl TableId {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Parse from `schema.table` or bare `table` (defaults to `public`).
    pub fn parse(s: &str) -> Self {
        match s.split_once('.') {
            Some((schema, name)) => Self::new(schema, name),
            None => Self::new(DEFAULT_SCHEMA, s),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualify a column name with this table.
    pub fn column(&self, name: impl Into<String>) -> ColumnId {
        ColumnId {
            table: self.clone(),
            column: name.into(),
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

impl Serialize for TableId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TableId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TableId::parse(&s))
    }
}

// =============================================================================
// Fully-qualified column identifier
// =============================================================================

/// A fully-qualified column identifier: table plus column name.
///
/// Canonically rendered as `schema.table.column`. This is the sole column
/// identifier used throughout a query state, so same-named columns on
/// different tables never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId {
    table: TableId,
    column: String,
}

impl ColumnId {
    pub fn new(table: TableId, column: impl Into<String>) -> Self {
        Self {
            table,
            column: column.into(),
        }
    }

    /// Parse from `schema.table.column` or legacy `table.column`
    /// (defaults the schema to `public`).
    pub fn parse(s: &str) -> Result<Self, IdentError> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [table, column] => Ok(TableId::new(DEFAULT_SCHEMA, *table).column(*column)),
            [schema, table @ .., column] if !table.is_empty() => {
                Ok(TableId::new(*schema, table.join(".")).column(*column))
            }
            _ => Err(IdentError::MalformedColumnId(s.to_string())),
        }
    }

    pub fn table(&self) -> &TableId {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.column
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

impl Serialize for ColumnId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ColumnId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ColumnId::parse(&s).map_err(de::Error::custom)
    }
}

// =============================================================================
// Foreign-key reference target
// =============================================================================

/// The target of a foreign-key column's `references` attribute.
///
/// Connectors emit either the preferred three-part form
/// (`schema.table.column`, exact match) or a legacy two-part form
/// (`table.column`, matched on table name alone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTarget {
    /// `schema.table.column` - matches on schema and table.
    Qualified { table: TableId, column: String },
    /// `table.column` - matches on table name, any schema.
    Legacy { table: String, column: String },
}

impl ColumnTarget {
    pub fn parse(s: &str) -> Result<Self, IdentError> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [schema, table, column] => Ok(ColumnTarget::Qualified {
                table: TableId::new(*schema, *table),
                column: (*column).to_string(),
            }),
            [table, column] => Ok(ColumnTarget::Legacy {
                table: (*table).to_string(),
                column: (*column).to_string(),
            }),
            _ => Err(IdentError::MalformedReference(s.to_string())),
        }
    }

    /// The referenced column name, if this target resolves to `table`.
    pub fn column_for(&self, table: &TableId) -> Option<&str> {
        match self {
            ColumnTarget::Qualified { table: t, column } if t == table => Some(column),
            ColumnTarget::Legacy { table: t, column } if t == table.name() => Some(column),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTarget::Qualified { table, column } => write!(f, "{}.{}", table, column),
            ColumnTarget::Legacy { table, column } => write!(f, "{}.{}", table, column),
        }
    }
}

impl Serialize for ColumnTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ColumnTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ColumnTarget::parse(&s).map_err(de::Error::custom)
    }
}
