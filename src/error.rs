//! Compilation error taxonomy.
//!
//! Structural errors are dangling references to unselected entities;
//! consistency errors are rule violations among otherwise well-formed
//! references. Messages always name the offending table or column so the
//! caller can surface an actionable diagnostic, never a generic failure.

use crate::schema::ident::{ColumnId, TableId};

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors (and the one warning condition) raised by the SQL compiler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// No tables selected at all - the only input yielding no SQL.
    #[error("no tables selected")]
    EmptySelection,

    /// A selected table is missing from the schema model.
    #[error("table '{table}' is not present in the schema")]
    UnknownTable { table: TableId },

    /// A column reference points at a table outside the selection.
    #[error("column '{column}' references a table that is not selected")]
    UnselectedColumnTable { column: ColumnId },

    /// A join endpoint points at a table outside the selection.
    #[error("join references table '{table}', which is not selected")]
    UnselectedJoinTable { table: TableId },

    /// A selected plain column is missing from GROUP BY while grouping is
    /// in effect.
    #[error("column '{column}' must be in GROUP BY clause or wrapped in aggregate")]
    UngroupedColumn { column: ColumnId },

    /// A selected table is connected to nothing and falls back to a cross
    /// join. Reported as a warning alongside the generated SQL.
    #[error("table '{table}' is not joined to the rest of the query (cross join emitted)")]
    UnjoinedTable { table: TableId },

    /// Non-positive row limit on the strict generate path.
    #[error("row limit must be positive (got {limit})")]
    NonPositiveLimit { limit: i64 },
}

/// Coarse classification used by callers to route diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Consistency,
    EmptySelection,
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::EmptySelection => ErrorKind::EmptySelection,
            CompileError::UnknownTable { .. }
            | CompileError::UnselectedColumnTable { .. }
            | CompileError::UnselectedJoinTable { .. } => ErrorKind::Structural,
            CompileError::UngroupedColumn { .. }
            | CompileError::UnjoinedTable { .. }
            | CompileError::NonPositiveLimit { .. } => ErrorKind::Consistency,
        }
    }
}
