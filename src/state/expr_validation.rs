//! Calculated-column validation.
//!
//! Deliberately shallow: this is not a SQL parser. It catches the common
//! authoring mistakes (empty alias, empty formula, unbalanced parentheses)
//! before they corrupt compiled SQL; anything balanced but nonsensical is
//! left for the downstream SQL engine to reject.

use once_cell::sync::Lazy;
use regex::Regex;

/// Validation errors for calculated columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    #[error("calculated column alias must not be empty")]
    EmptyAlias,

    #[error("expression for '{alias}' must not be empty")]
    EmptyExpression { alias: String },

    #[error("unbalanced parentheses in expression for '{alias}': {open} opening vs {close} closing")]
    UnbalancedParens {
        alias: String,
        open: usize,
        close: usize,
    },

    #[error("calculated column alias '{alias}' is already in use")]
    DuplicateAlias { alias: String },
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize a user-entered alias: trimmed, lowercased, whitespace runs
/// collapsed to a single underscore.
pub fn sanitize_alias(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), "_").to_lowercase()
}

/// Check a calculated-column formula before it enters a query state.
pub fn validate_expression(alias: &str, expression: &str) -> Result<(), ExpressionError> {
    if alias.is_empty() {
        return Err(ExpressionError::EmptyAlias);
    }
    if expression.trim().is_empty() {
        return Err(ExpressionError::EmptyExpression {
            alias: alias.to_string(),
        });
    }

    let open = expression.matches('(').count();
    let close = expression.matches(')').count();
    if open != close {
        return Err(ExpressionError::UnbalancedParens {
            alias: alias.to_string(),
            open,
            close,
        });
    }

    Ok(())
}
