//! Schema model - immutable description of tables and columns.
//!
//! Supplied by an external connector or schema generator and read-only for
//! the lifetime of a query-building session. The compiler uses it to expand
//! whole-row selections and the inference engine reads its key metadata;
//! nothing in the engine ever mutates it.

pub mod ident;

use serde::{Deserialize, Serialize};

pub use ident::{ColumnId, ColumnTarget, IdentError, TableId, DEFAULT_SCHEMA};

/// Errors from schema construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate table id '{0}' in schema")]
    DuplicateTable(TableId),
}

/// A column description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Declared type as reported by the source database (free-form string).
    pub data_type: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    /// Foreign-key target, when the connector reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnTarget>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_foreign_key: false,
            references: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn foreign_key(mut self, target: ColumnTarget) -> Self {
        self.is_foreign_key = true;
        self.references = Some(target);
        self
    }
}

/// A table description: identifier plus columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(id: TableId, columns: Vec<Column>) -> Self {
        Self { id, columns }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// The full schema model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    /// Build a schema, rejecting duplicate table ids.
    pub fn new(tables: Vec<Table>) -> Result<Self, SchemaError> {
        let schema = Self { tables };
        schema.validate()?;
        Ok(schema)
    }

    /// Check table-id uniqueness. Deserialized schemas should be validated
    /// before use; the constructor does this automatically.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, table) in self.tables.iter().enumerate() {
            if self.tables[..i].iter().any(|t| t.id == table.id) {
                return Err(SchemaError::DuplicateTable(table.id.clone()));
            }
        }
        Ok(())
    }

    pub fn table(&self, id: &TableId) -> Option<&Table> {
        self.tables.iter().find(|t| &t.id == id)
    }
}
