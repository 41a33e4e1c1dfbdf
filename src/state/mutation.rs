//! Query state transitions.
//!
//! Every public mutation takes the current state plus parameters and returns
//! a new, invariant-satisfying state; the input is never modified. Referring
//! to a table that is not yet selected implicitly selects it, and removing a
//! table cascades through every field that mentions it - all cascade logic
//! lives in [`QueryState::remove_table_cascade`].

use uuid::Uuid;

use crate::inference::JoinProposal;
use crate::schema::ident::{ColumnId, TableId};

use super::expr_validation::{sanitize_alias, validate_expression, ExpressionError};
use super::types::{
    AggregateFunc, CalculatedColumn, ExplicitJoin, Filter, FilterOperator, JoinKind, SortDir,
    SortKey,
};
use super::QueryState;

impl QueryState {
    // =========================================================================
    // Tables and columns
    // =========================================================================

    /// Select a table, or deselect it with full cascade if already selected.
    pub fn toggle_table(&self, table: &TableId) -> QueryState {
        let mut next = self.clone();
        if next.selected_tables.contains(table) {
            next.remove_table_cascade(table);
        } else {
            next.selected_tables.push(table.clone());
        }
        next
    }

    /// Select or deselect a column. Selecting a column of an unselected
    /// table selects the table as well; deselecting drops any aggregation
    /// set on the column.
    pub fn toggle_column(&self, column: &ColumnId) -> QueryState {
        let mut next = self.clone();
        if let Some(pos) = next.selected_columns.iter().position(|c| c == column) {
            next.selected_columns.remove(pos);
            next.aggregations.remove(column);
        } else {
            next.ensure_table(column.table());
            next.selected_columns.push(column.clone());
        }
        next
    }

    /// Set or clear the aggregate function for a column. Setting one
    /// implicitly selects the column (and its table).
    pub fn set_aggregation(
        &self,
        column: &ColumnId,
        func: Option<AggregateFunc>,
    ) -> QueryState {
        let mut next = self.clone();
        match func {
            None => {
                next.aggregations.remove(column);
            }
            Some(func) => {
                next.ensure_table(column.table());
                if !next.selected_columns.contains(column) {
                    next.selected_columns.push(column.clone());
                }
                next.aggregations.insert(column.clone(), func);
            }
        }
        next
    }

    // =========================================================================
    // Joins
    // =========================================================================

    /// Add an explicit join between two qualified columns. Both endpoint
    /// tables are selected if they are not already.
    pub fn add_join(&self, from: ColumnId, kind: JoinKind, to: ColumnId) -> QueryState {
        let mut next = self.clone();
        next.ensure_table(from.table());
        next.ensure_table(to.table());
        next.joins.push(ExplicitJoin::between(from, kind, to));
        next
    }

    /// Accept an inference proposal as an ordinary join addition.
    pub fn accept_proposal(&self, proposal: &JoinProposal) -> QueryState {
        self.add_join(
            proposal.from_table.column(&proposal.from_column),
            proposal.kind,
            proposal.to_table.column(&proposal.to_column),
        )
    }

    /// Replace the endpoints and type of an existing join. Unknown ids are
    /// ignored (the state is returned unchanged).
    pub fn update_join(
        &self,
        id: Uuid,
        from: ColumnId,
        kind: JoinKind,
        to: ColumnId,
    ) -> QueryState {
        let mut next = self.clone();
        if let Some(join) = next.joins.iter_mut().find(|j| j.id == id) {
            *join = ExplicitJoin {
                id,
                from_table: from.table().clone(),
                from_column: from.name().to_string(),
                kind,
                to_table: to.table().clone(),
                to_column: to.name().to_string(),
            };
            next.ensure_table(from.table());
            next.ensure_table(to.table());
        }
        next
    }

    pub fn remove_join(&self, id: Uuid) -> QueryState {
        let mut next = self.clone();
        next.joins.retain(|j| j.id != id);
        next
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Add a filter condition. The filtered table is selected if absent.
    pub fn add_filter(
        &self,
        column: ColumnId,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> QueryState {
        let mut next = self.clone();
        next.ensure_table(column.table());
        next.filters.push(Filter {
            id: Uuid::new_v4(),
            column,
            operator,
            value: value.into(),
        });
        next
    }

    /// Rewrite an existing filter in place. Unknown ids are ignored.
    pub fn update_filter(
        &self,
        id: Uuid,
        column: ColumnId,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> QueryState {
        let mut next = self.clone();
        if let Some(filter) = next.filters.iter_mut().find(|f| f.id == id) {
            filter.column = column.clone();
            filter.operator = operator;
            filter.value = value.into();
            next.ensure_table(column.table());
        }
        next
    }

    pub fn remove_filter(&self, id: Uuid) -> QueryState {
        let mut next = self.clone();
        next.filters.retain(|f| f.id != id);
        next
    }

    // =========================================================================
    // Grouping and ordering
    // =========================================================================

    pub fn toggle_group_by(&self, column: &ColumnId) -> QueryState {
        let mut next = self.clone();
        if let Some(pos) = next.group_by.iter().position(|c| c == column) {
            next.group_by.remove(pos);
        } else {
            next.ensure_table(column.table());
            next.group_by.push(column.clone());
        }
        next
    }

    pub fn add_sort(&self, column: ColumnId, direction: SortDir) -> QueryState {
        let mut next = self.clone();
        next.ensure_table(column.table());
        next.order_by.push(SortKey {
            id: Uuid::new_v4(),
            column,
            direction,
        });
        next
    }

    /// Change the direction of an existing sort key. Unknown ids are ignored.
    pub fn update_sort(&self, id: Uuid, direction: SortDir) -> QueryState {
        let mut next = self.clone();
        if let Some(sort) = next.order_by.iter_mut().find(|s| s.id == id) {
            sort.direction = direction;
        }
        next
    }

    pub fn remove_sort(&self, id: Uuid) -> QueryState {
        let mut next = self.clone();
        next.order_by.retain(|s| s.id != id);
        next
    }

    // =========================================================================
    // Calculated columns and limit
    // =========================================================================

    /// Validate and add a calculated column. The alias is sanitized before
    /// the uniqueness check, so `"Total Amount"` and `"total_amount"`
    /// collide.
    pub fn add_calculated_column(
        &self,
        alias: &str,
        expression: &str,
    ) -> Result<QueryState, ExpressionError> {
        let alias = sanitize_alias(alias);
        validate_expression(&alias, expression)?;
        if self.calculated_columns.iter().any(|c| c.alias == alias) {
            return Err(ExpressionError::DuplicateAlias { alias });
        }

        let mut next = self.clone();
        next.calculated_columns.push(CalculatedColumn {
            id: Uuid::new_v4(),
            alias,
            expression: expression.to_string(),
        });
        Ok(next)
    }

    pub fn remove_calculated_column(&self, id: Uuid) -> QueryState {
        let mut next = self.clone();
        next.calculated_columns.retain(|c| c.id != id);
        next
    }

    pub fn set_limit(&self, limit: i64) -> QueryState {
        let mut next = self.clone();
        next.limit = limit;
        next
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_table(&mut self, table: &TableId) {
        if !self.selected_tables.contains(table) {
            self.selected_tables.push(table.clone());
        }
    }

    /// Cascade removal of a table through every field that mentions it.
    fn remove_table_cascade(&mut self, table: &TableId) {
        self.selected_tables.retain(|t| t != table);
        self.selected_columns.retain(|c| c.table() != table);
        self.aggregations.retain(|c, _| c.table() != table);
        self.joins.retain(|j| !j.mentions(table));
        self.filters.retain(|f| f.column.table() != table);
        self.group_by.retain(|c| c.table() != table);
        self.order_by.retain(|s| s.column.table() != table);
    }
}
