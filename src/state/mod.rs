//! Query state - the serializable description of a query under construction.
//!
//! The state is an immutable value: every mutation in [`mutation`] returns a
//! complete new state satisfying the structural invariants, so an external
//! history manager can keep exact snapshots. The only invariant left for the
//! compiler is aggregate/group-by consistency, which needs the schema model
//! to resolve implicit whole-row selection.

pub mod expr_validation;
pub mod mutation;
pub mod types;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::ident::{ColumnId, TableId};

pub use expr_validation::{sanitize_alias, validate_expression, ExpressionError};
pub use types::{
    AggregateFunc, CalculatedColumn, ExplicitJoin, Filter, FilterOperator, JoinKind, SortDir,
    SortKey,
};

/// Row cap applied to freshly created states.
pub const DEFAULT_LIMIT: i64 = 100;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// The complete description of an in-progress query.
///
/// Fields are private: the mutation layer in [`mutation`] is the only way to
/// reach a new state, which is what keeps the document structurally
/// consistent. Serialization round-trips the document verbatim for the
/// external persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    /// Insertion order is significant: the first table is the FROM base.
    #[serde(default)]
    selected_tables: Vec<TableId>,
    #[serde(default)]
    selected_columns: Vec<ColumnId>,
    /// Aggregated columns. Absence of an entry means no aggregation.
    #[serde(default)]
    aggregations: BTreeMap<ColumnId, AggregateFunc>,
    #[serde(default)]
    joins: Vec<ExplicitJoin>,
    #[serde(default)]
    filters: Vec<Filter>,
    #[serde(default)]
    group_by: Vec<ColumnId>,
    #[serde(default)]
    order_by: Vec<SortKey>,
    #[serde(default)]
    calculated_columns: Vec<CalculatedColumn>,
    #[serde(default = "default_limit")]
    limit: i64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            selected_tables: Vec::new(),
            selected_columns: Vec::new(),
            aggregations: BTreeMap::new(),
            joins: Vec::new(),
            filters: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            calculated_columns: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryState {
    /// An empty state, as created when a schema is loaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_tables(&self) -> &[TableId] {
        &self.selected_tables
    }

    pub fn selected_columns(&self) -> &[ColumnId] {
        &self.selected_columns
    }

    pub fn aggregations(&self) -> &BTreeMap<ColumnId, AggregateFunc> {
        &self.aggregations
    }

    /// Aggregate function for a column, if one is set.
    pub fn aggregation(&self, column: &ColumnId) -> Option<AggregateFunc> {
        self.aggregations.get(column).copied()
    }

    pub fn joins(&self) -> &[ExplicitJoin] {
        &self.joins
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn group_by(&self) -> &[ColumnId] {
        &self.group_by
    }

    pub fn order_by(&self) -> &[SortKey] {
        &self.order_by
    }

    pub fn calculated_columns(&self) -> &[CalculatedColumn] {
        &self.calculated_columns
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn is_selected(&self, table: &TableId) -> bool {
        self.selected_tables.contains(table)
    }

    /// Whether any aggregation or grouping is in effect.
    pub fn has_grouping(&self) -> bool {
        !self.aggregations.is_empty() || !self.group_by.is_empty()
    }
}
