//! SQL tokens - the atomic units of SQL output.
//!
//! The compiler never concatenates clause strings directly; it emits a
//! token stream and serializes it left to right. Adding a variant forces
//! every emission site to handle it (exhaustive matching).

use crate::schema::ident::{ColumnId, TableId};

/// Every element the compiler can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    As,
    On,
    Join,
    Inner,
    Left,
    Right,
    Full,
    GroupBy,
    OrderBy,
    Asc,
    Desc,
    Limit,
    In,
    Like,
    ILike,
    IsNull,
    IsNotNull,

    // === Punctuation ===
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,

    // === Whitespace ===
    Space,

    // === Dynamic content ===
    /// Canonical `schema.table` identifier.
    TableIdent(TableId),
    /// Canonical `schema.table.column` identifier.
    ColumnIdent(ColumnId),
    /// Bare identifier (an output alias).
    Ident(String),
    /// Aggregate or scalar function name.
    FunctionName(String),
    /// Integer literal.
    LitInt(i64),
    /// String literal, quoted with `''` escaping.
    LitString(String),

    // === Escape hatch ===
    /// Raw SQL passed to output without escaping.
    ///
    /// Only used for named parameters (`:p`), numeric filter text that
    /// already passed the literal check, and calculated-column expressions
    /// accepted by the expression validator. Never route other user input
    /// through this variant.
    Raw(String),
}

impl Token {
    /// Serialize this token to its SQL text.
    pub fn serialize(&self) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),
            Token::Join => "JOIN".into(),
            Token::Inner => "INNER".into(),
            Token::Left => "LEFT".into(),
            Token::Right => "RIGHT".into(),
            Token::Full => "FULL".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::Limit => "LIMIT".into(),
            Token::In => "IN".into(),
            Token::Like => "LIKE".into(),
            Token::ILike => "ILIKE".into(),
            Token::IsNull => "IS NULL".into(),
            Token::IsNotNull => "IS NOT NULL".into(),

            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Eq => "=".into(),
            Token::Ne => "!=".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),

            Token::Space => " ".into(),

            Token::TableIdent(table) => table.to_string(),
            Token::ColumnIdent(column) => column.to_string(),
            Token::Ident(name) => name.clone(),
            Token::FunctionName(name) => name.to_uppercase(),
            Token::LitInt(n) => n.to_string(),
            Token::LitString(s) => format!("'{}'", s.replace('\'', "''")),

            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that serializes to SQL text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(Token::serialize).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
