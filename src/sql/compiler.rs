//! State-to-SQL compiler.
//!
//! A pure function from (schema, query state) to SQL text, re-run in full
//! on every state change. Clauses are emitted in fixed order through a
//! token stream; there is no incremental patching. Two entry points share
//! the one implementation and differ only in failure policy: [`compile`]
//! is strict and returns the specific violated invariant, [`preview`]
//! never fails and renders any error as a SQL comment so a live panel
//! always has something to show.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CompileError, CompileResult};
use crate::schema::ident::{ColumnId, TableId};
use crate::schema::Schema;
use crate::state::types::{AggregateFunc, CalculatedColumn, Filter, FilterOperator, JoinKind, SortDir};
use crate::state::QueryState;

use super::token::{Token, TokenStream};

/// Result of a successful compilation.
///
/// Warnings carry the non-fatal diagnostics (currently only the
/// unjoined-table condition); the SQL is complete and executable either way.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOutput {
    pub sql: String,
    pub warnings: Vec<CompileError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Strict,
    Preview,
}

/// Compile a query state, failing on any violated invariant.
///
/// This is the "generate/run" path: callers present the error to the user.
pub fn compile(schema: &Schema, state: &QueryState) -> CompileResult<CompileOutput> {
    render(schema, state, Mode::Strict)
}

/// Compile for live preview. Never fails: errors render as a `--` comment.
pub fn preview(schema: &Schema, state: &QueryState) -> String {
    match render(schema, state, Mode::Preview) {
        Ok(output) => output.sql,
        Err(err) => format!("-- {}", err),
    }
}

fn render(schema: &Schema, state: &QueryState, mode: Mode) -> CompileResult<CompileOutput> {
    if state.selected_tables().is_empty() {
        return Err(CompileError::EmptySelection);
    }
    validate_references(schema, state)?;

    let items = select_items(schema, state)?;
    let mut warnings = Vec::new();
    let mut ts = TokenStream::new();

    // SELECT
    ts.push(Token::Select).space();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        emit_select_item(&mut ts, item);
    }

    // FROM / JOIN
    let base = &state.selected_tables()[0];
    ts.space()
        .push(Token::From)
        .space()
        .push(Token::TableIdent(base.clone()));
    for join in state.joins() {
        emit_join(&mut ts, join.kind, &join.from_table.column(&join.from_column), &join.to_table.column(&join.to_column));
    }
    for table in unjoined_tables(state) {
        ts.comma().space().push(Token::TableIdent(table.clone()));
        warnings.push(CompileError::UnjoinedTable {
            table: table.clone(),
        });
    }

    // WHERE
    if !state.filters().is_empty() {
        ts.space().push(Token::Where).space();
        for (i, filter) in state.filters().iter().enumerate() {
            if i > 0 {
                ts.space().push(Token::And).space();
            }
            emit_filter(&mut ts, filter);
        }
    }

    // GROUP BY
    if !state.group_by().is_empty() {
        ts.space().push(Token::GroupBy).space();
        for (i, column) in state.group_by().iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::ColumnIdent(column.clone()));
        }
    }

    // ORDER BY
    if !state.order_by().is_empty() {
        ts.space().push(Token::OrderBy).space();
        for (i, sort) in state.order_by().iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::ColumnIdent(sort.column.clone())).space();
            ts.push(match sort.direction {
                SortDir::Asc => Token::Asc,
                SortDir::Desc => Token::Desc,
            });
        }
    }

    // LIMIT
    if state.limit() > 0 {
        ts.space()
            .push(Token::Limit)
            .space()
            .push(Token::LitInt(state.limit()));
    } else if mode == Mode::Strict {
        return Err(CompileError::NonPositiveLimit {
            limit: state.limit(),
        });
    }

    let sql = ts.serialize();
    tracing::debug!(%sql, warnings = warnings.len(), "compiled query state");
    Ok(CompileOutput { sql, warnings })
}

// =============================================================================
// Structural validation
// =============================================================================

/// Check that every reference in the state points at a selected table and
/// that every selected table exists in the schema. The mutation layer
/// guarantees this for states it produced; deserialized or externally
/// generated documents get checked here.
fn validate_references(schema: &Schema, state: &QueryState) -> CompileResult<()> {
    for table in state.selected_tables() {
        if schema.table(table).is_none() {
            return Err(CompileError::UnknownTable {
                table: table.clone(),
            });
        }
    }

    let column_refs = state
        .selected_columns()
        .iter()
        .chain(state.aggregations().keys())
        .chain(state.filters().iter().map(|f| &f.column))
        .chain(state.group_by().iter())
        .chain(state.order_by().iter().map(|s| &s.column));
    for column in column_refs {
        if !state.is_selected(column.table()) {
            return Err(CompileError::UnselectedColumnTable {
                column: column.clone(),
            });
        }
    }

    for join in state.joins() {
        for table in [&join.from_table, &join.to_table] {
            if !state.is_selected(table) {
                return Err(CompileError::UnselectedJoinTable {
                    table: table.clone(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// SELECT list
// =============================================================================

enum SelectItem {
    /// Bare `*`, the degenerate baseline.
    Star,
    /// `table.*` whole-row selection.
    Wildcard(TableId),
    Plain(ColumnId),
    Aggregate(ColumnId, AggregateFunc),
    Calculated(CalculatedColumn),
}

/// Build the SELECT list, verifying the grouping rule: once any aggregation
/// or grouping is in effect, every plain selected column - including the
/// columns implicitly selected by an empty `selected_columns` - must appear
/// in GROUP BY.
fn select_items(schema: &Schema, state: &QueryState) -> CompileResult<Vec<SelectItem>> {
    let grouping = state.has_grouping();
    let mut items = Vec::new();

    for table in state.selected_tables() {
        let explicit: Vec<ColumnId> = state
            .selected_columns()
            .iter()
            .filter(|c| c.table() == table)
            .cloned()
            .collect();

        if !grouping {
            if explicit.is_empty() {
                if state.calculated_columns().is_empty() {
                    items.push(SelectItem::Wildcard(table.clone()));
                }
            } else {
                items.extend(explicit.into_iter().map(SelectItem::Plain));
            }
            continue;
        }

        // Grouping in effect: an empty selection means whole-row, so the
        // wildcard expands to the table's schema columns before the rule
        // is applied.
        let mut effective = if state.selected_columns().is_empty() {
            let Some(model) = schema.table(table) else {
                return Err(CompileError::UnknownTable {
                    table: table.clone(),
                });
            };
            model
                .columns
                .iter()
                .map(|c| table.column(&c.name))
                .collect()
        } else {
            explicit
        };

        for column in state.aggregations().keys() {
            if column.table() == table && !effective.contains(column) {
                effective.push(column.clone());
            }
        }

        for column in effective {
            match state.aggregation(&column) {
                Some(func) => items.push(SelectItem::Aggregate(column, func)),
                None if state.group_by().contains(&column) => {
                    items.push(SelectItem::Plain(column))
                }
                None => return Err(CompileError::UngroupedColumn { column }),
            }
        }
    }

    for calc in state.calculated_columns() {
        items.push(SelectItem::Calculated(calc.clone()));
    }

    if items.is_empty() {
        items.push(SelectItem::Star);
    }
    Ok(items)
}

fn emit_select_item(ts: &mut TokenStream, item: &SelectItem) {
    match item {
        SelectItem::Star => {
            ts.push(Token::Star);
        }
        SelectItem::Wildcard(table) => {
            ts.push(Token::TableIdent(table.clone()))
                .push(Token::Dot)
                .push(Token::Star);
        }
        SelectItem::Plain(column) => {
            ts.push(Token::ColumnIdent(column.clone()));
        }
        SelectItem::Aggregate(column, func) => {
            // Alias derived from column plus function so two aggregates of
            // the same column never collide.
            let alias = format!("{}_{}", column.name(), func.alias_suffix());
            ts.push(Token::FunctionName(func.keyword().to_string()))
                .lparen()
                .push(Token::ColumnIdent(column.clone()))
                .rparen()
                .space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias));
        }
        SelectItem::Calculated(calc) => {
            ts.lparen()
                .push(Token::Raw(calc.expression.clone()))
                .rparen()
                .space()
                .push(Token::As)
                .space()
                .push(Token::Ident(calc.alias.clone()));
        }
    }
}

// =============================================================================
// FROM / JOIN
// =============================================================================

fn emit_join(ts: &mut TokenStream, kind: JoinKind, from: &ColumnId, to: &ColumnId) {
    ts.space();
    ts.push(match kind {
        JoinKind::Inner => Token::Inner,
        JoinKind::Left => Token::Left,
        JoinKind::Right => Token::Right,
        JoinKind::Full => Token::Full,
    });
    ts.space()
        .push(Token::Join)
        .space()
        .push(Token::TableIdent(to.table().clone()))
        .space()
        .push(Token::On)
        .space()
        .push(Token::ColumnIdent(from.clone()))
        .space()
        .push(Token::Eq)
        .space()
        .push(Token::ColumnIdent(to.clone()));
}

/// Selected tables that are neither the base table nor an endpoint of any
/// explicit join. They fall back to a comma cross-join and a warning.
fn unjoined_tables(state: &QueryState) -> Vec<&TableId> {
    state
        .selected_tables()
        .iter()
        .skip(1)
        .filter(|table| !state.joins().iter().any(|j| j.mentions(table)))
        .collect()
}

// =============================================================================
// WHERE
// =============================================================================

static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid regex"));

fn emit_filter(ts: &mut TokenStream, filter: &Filter) {
    ts.push(Token::ColumnIdent(filter.column.clone()));
    ts.space().push(match filter.operator {
        FilterOperator::Eq => Token::Eq,
        FilterOperator::Ne => Token::Ne,
        FilterOperator::Gt => Token::Gt,
        FilterOperator::Lt => Token::Lt,
        FilterOperator::Gte => Token::Gte,
        FilterOperator::Lte => Token::Lte,
        FilterOperator::Like => Token::Like,
        FilterOperator::ILike => Token::ILike,
        FilterOperator::In => Token::In,
        FilterOperator::IsNull => Token::IsNull,
        FilterOperator::IsNotNull => Token::IsNotNull,
    });

    if filter.operator.is_unary() {
        return;
    }
    ts.space();

    if filter.operator == FilterOperator::In {
        ts.lparen();
        let values: Vec<&str> = filter
            .value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(literal_token(value));
        }
        ts.rparen();
    } else {
        ts.push(literal_token(filter.value.trim()));
    }
}

/// Render a filter value: named parameters (`:p`) and numeric-looking text
/// pass through verbatim, everything else becomes a quoted string literal.
fn literal_token(value: &str) -> Token {
    if value.starts_with(':') || NUMERIC.is_match(value) {
        Token::Raw(value.to_string())
    } else {
        Token::LitString(value.to_string())
    }
}
