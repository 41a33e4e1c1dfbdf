//! The inference rules, tried in order with first match winning.

use crate::schema::ident::TableId;
use crate::schema::{Schema, Table};
use crate::state::types::JoinKind;

use super::JoinProposal;

/// Propose a join describing how `a` and `b` relate, or `None` when no
/// reliable signal exists. Pure and deterministic.
///
/// Rules, in order:
/// 1. a foreign key on `a` referencing `b` (LEFT join, `a` driving);
/// 2. a foreign key on `b` referencing `a` (LEFT join, `b` driving);
/// 3. identical table names in different schemas sharing a key column
///    (INNER join) - the replicated-table convenience case.
pub fn infer_join(schema: &Schema, a: &TableId, b: &TableId) -> Option<JoinProposal> {
    if a == b {
        return None;
    }
    let table_a = schema.table(a)?;
    let table_b = schema.table(b)?;

    let proposal = foreign_key_join(table_a, table_b)
        .or_else(|| foreign_key_join(table_b, table_a))
        .or_else(|| shared_key_join(table_a, table_b));

    match &proposal {
        Some(p) => tracing::debug!(
            from = %p.from_table, to = %p.to_table, column = %p.from_column,
            "inferred relationship"
        ),
        None => tracing::trace!(%a, %b, "no relationship found"),
    }
    proposal
}

/// Rule 1/2: a foreign-key column on `from` whose reference resolves to
/// `to`. LEFT is the conservative default so rows of the driving table are
/// never excluded by a missing match.
fn foreign_key_join(from: &Table, to: &Table) -> Option<JoinProposal> {
    for column in &from.columns {
        if !column.is_foreign_key {
            continue;
        }
        let Some(target) = &column.references else {
            continue;
        };
        if let Some(to_column) = target.column_for(&to.id) {
            return Some(JoinProposal {
                from_table: from.id.clone(),
                from_column: column.name.clone(),
                kind: JoinKind::Left,
                to_table: to.id.clone(),
                to_column: to_column.to_string(),
            });
        }
    }
    None
}

/// Rule 3: the same table name replicated across schemas, joined on a
/// shared key column. Requires an exact name collision plus a matching key
/// (named `id`, or primary-key-flagged on either side, with the same name
/// and declared type on both sides) to keep false positives rare.
fn shared_key_join(a: &Table, b: &Table) -> Option<JoinProposal> {
    if a.id.name() != b.id.name() || a.id.schema() == b.id.schema() {
        return None;
    }

    for column in &a.columns {
        let Some(counterpart) = b.column(&column.name) else {
            continue;
        };
        if counterpart.data_type != column.data_type {
            continue;
        }
        let is_key = column.name == "id" || column.is_primary_key || counterpart.is_primary_key;
        if is_key {
            return Some(JoinProposal {
                from_table: a.id.clone(),
                from_column: column.name.clone(),
                kind: JoinKind::Inner,
                to_table: b.id.clone(),
                to_column: counterpart.name.clone(),
            });
        }
    }
    None
}
