// src/state/types.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::ident::{ColumnId, TableId};

/// Aggregate function applied to a selected column.
///
/// "No aggregation" is the absence of an entry in the aggregation map, so
/// an impossible `None`-like variant never needs representing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    /// SQL keyword for this function.
    pub fn keyword(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
        }
    }

    /// Suffix used when deriving a deterministic output alias,
    /// e.g. `amount` + `Sum` -> `amount_sum`.
    pub fn alias_suffix(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "count",
            AggregateFunc::Sum => "sum",
            AggregateFunc::Avg => "avg",
            AggregateFunc::Min => "min",
            AggregateFunc::Max => "max",
        }
    }
}

/// Type of an explicit join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    /// SQL keyword for this join type.
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
        }
    }
}

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "ILIKE")]
    ILike,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "IS NULL")]
    IsNull,
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
}

impl FilterOperator {
    /// Unary operators take no right-hand value.
    pub fn is_unary(&self) -> bool {
        matches!(self, FilterOperator::IsNull | FilterOperator::IsNotNull)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// An explicit join between two selected tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitJoin {
    pub id: Uuid,
    pub from_table: TableId,
    pub from_column: String,
    pub kind: JoinKind,
    pub to_table: TableId,
    pub to_column: String,
}

impl ExplicitJoin {
    /// Build a join between two qualified columns, assigning a fresh id.
    pub fn between(from: ColumnId, kind: JoinKind, to: ColumnId) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_table: from.table().clone(),
            from_column: from.name().to_string(),
            kind,
            to_table: to.table().clone(),
            to_column: to.name().to_string(),
        }
    }

    /// Whether either endpoint is `table`.
    pub fn mentions(&self, table: &TableId) -> bool {
        &self.from_table == table || &self.to_table == table
    }
}

/// A WHERE-clause condition. Conditions are always conjunctive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub id: Uuid,
    pub column: ColumnId,
    pub operator: FilterOperator,
    /// Ignored for unary operators; comma-separated list for `IN`.
    #[serde(default)]
    pub value: String,
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub id: Uuid,
    pub column: ColumnId,
    pub direction: SortDir,
}

/// A user-authored SELECT expression with an alias.
///
/// The expression is an opaque SQL fragment, validated for shape at
/// authoring time and inserted verbatim at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedColumn {
    pub id: Uuid,
    pub alias: String,
    pub expression: String,
}
