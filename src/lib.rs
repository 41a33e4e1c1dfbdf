//! # Quill
//!
//! The query compilation engine of an interactive SQL composer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Schema Model (read-only)                    │
//! │        (tables, columns, keys, FK references)            │
//! └─────────────────────────────────────────────────────────┘
//!            │                                │
//!            ▼ [inference]                    │
//! ┌──────────────────────────┐                │
//! │ Join proposals           │                │
//! │ (advisory, accept/skip)  │                │
//! └──────────────────────────┘                │
//!            │ accepted joins                 │
//!            ▼                                ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │        Query State (immutable, snapshot per edit)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compiler]
//! ┌─────────────────────────────────────────────────────────┐
//! │        SQL text (strict) / preview text (lenient)        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every edit produces a new [`state::QueryState`]; the compiler re-renders
//! the full SQL from scratch on each one. Compilation is pure and
//! synchronous - the cost is bounded by the size of the query description,
//! not the database.

pub mod error;
pub mod inference;
pub mod schema;
pub mod sql;
pub mod state;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::error::{CompileError, CompileResult, ErrorKind};
    pub use crate::inference::{infer_join, JoinProposal};
    pub use crate::schema::{Column, ColumnId, ColumnTarget, Schema, Table, TableId};
    pub use crate::sql::{compile, preview, CompileOutput};
    pub use crate::state::{
        AggregateFunc, CalculatedColumn, ExplicitJoin, Filter, FilterOperator, JoinKind,
        QueryState, SortDir, SortKey,
    };
}

// Also export the main entry points at the crate root
pub use error::{CompileError, CompileResult};
pub use inference::{infer_join, JoinProposal};
pub use schema::{Column, ColumnId, Schema, Table, TableId};
pub use sql::{compile, preview, CompileOutput};
pub use state::QueryState;
