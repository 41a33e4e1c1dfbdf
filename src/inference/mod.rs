//! Relationship inference - propose a join between two tables.
//!
//! Foreign-key metadata is the authoritative signal; a narrow cross-schema
//! naming heuristic is the last resort. Absence of a match is a normal
//! outcome, never an error, and a proposal is advisory only: acceptance is
//! an explicit external action that re-enters the core as an ordinary
//! add-join mutation.

mod engine;

use serde::{Deserialize, Serialize};

use crate::schema::ident::TableId;
use crate::state::types::JoinKind;

pub use engine::infer_join;

/// A proposed join between two tables.
///
/// Carries no record id; the mutation layer assigns one if the proposal is
/// accepted. Proposals for the same schema and table pair are identical,
/// which keeps inference deterministic and repeatable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinProposal {
    pub from_table: TableId,
    pub from_column: String,
    pub kind: JoinKind,
    pub to_table: TableId,
    pub to_column: String,
}
