//! SQL Tokens - the atomic units of SQL output.
//!
//! Statements never concatenate strings; they push typed tokens into a
//! [`TokenStream`], and the stream is rendered once, at the very end, for a
//! specific dialect. Quoting, escaping, boolean formatting and parameter
//! placeholders are all decided at that point.

use super::dialect::{Dialect, SqlDialect};

/// SQL Token - every possible element in a SQL statement.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Query Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    As,
    On,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    GroupBy,
    Having,
    OrderBy,
    Asc,
    Desc,
    NullsFirst,
    NullsLast,
    Limit,
    Offset,
    Fetch,
    Next,
    Rows,
    Only,
    Case,
    When,
    Then,
    Else,
    End,
    In,
    Between,
    Like,
    IsNull,
    IsNotNull,
    Distinct,
    All,
    Union,
    Null,
    True,
    False,

    // === DDL Keywords ===
    Create,
    Drop,
    Table,
    Index,
    View,
    Constraint,
    Primary,
    Key,
    Foreign,
    References,
    Unique,
    Default,
    Cascade,
    Restrict,
    NoAction,
    SetNull,
    SetDefault,
    If,
    Exists,
    Unsigned,

    // === DML Keywords ===
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,

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
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Concat,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Simple identifier (table, column, alias)
    Ident(String),
    /// Dotted identifier; every part is quoted separately.
    QualifiedIdent(Vec<String>),
    /// Integer literal
    LitInt(i64),
    /// Float literal
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// Boolean literal
    LitBool(bool),
    /// NULL literal
    LitNull,
    /// Named parameter; its placeholder is chosen by the dialect at render time.
    Param(String),
    /// Dialect-supplied keyword (type names, `SCHEMA`/`DATABASE`, identity markers).
    Keyword(&'static str),

    // === Function Names ===
    /// Function name, remapped per dialect on output.
    FunctionName(String),

    // === Nesting ===
    /// A sub-stream rendered in place.
    Stream(TokenStream),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// # Security Warning
    ///
    /// **Never pass user input to this variant.** Raw SQL is not sanitized
    /// and can lead to SQL injection vulnerabilities. Only use with:
    /// - Trusted, static SQL fragments
    /// - Stored column defaults and view definitions from the schema
    ///
    /// For user-provided values, use `Token::LitString`, `Token::Param`, etc.
    Raw(String),
}

/// Placeholder positions, assigned by first textual appearance.
#[derive(Debug, Default)]
struct Placeholders {
    names: Vec<String>,
}

impl Placeholders {
    fn position(&mut self, name: &str) -> usize {
        match self.names.iter().position(|n| n == name) {
            Some(i) => i + 1,
            None => {
                self.names.push(name.to_string());
                self.names.len()
            }
        }
    }
}

impl Token {
    /// Text of tokens that render the same in every dialect.
    ///
    /// `None` for identifiers, literals, parameters and every other token
    /// whose output depends on the dialect or on its payload.
    pub fn fixed_text(&self) -> Option<&'static str> {
        let text = match self {
            Token::Select => "SELECT",
            Token::From => "FROM",
            Token::Where => "WHERE",
            Token::And => "AND",
            Token::Or => "OR",
            Token::Not => "NOT",
            Token::As => "AS",
            Token::On => "ON",
            Token::Join => "JOIN",
            Token::Inner => "INNER",
            Token::Left => "LEFT",
            Token::Right => "RIGHT",
            Token::Full => "FULL",
            Token::Outer => "OUTER",
            Token::Cross => "CROSS",
            Token::GroupBy => "GROUP BY",
            Token::Having => "HAVING",
            Token::OrderBy => "ORDER BY",
            Token::Asc => "ASC",
            Token::Desc => "DESC",
            Token::NullsFirst => "NULLS FIRST",
            Token::NullsLast => "NULLS LAST",
            Token::Limit => "LIMIT",
            Token::Offset => "OFFSET",
            Token::Fetch => "FETCH",
            Token::Next => "NEXT",
            Token::Rows => "ROWS",
            Token::Only => "ONLY",
            Token::Case => "CASE",
            Token::When => "WHEN",
            Token::Then => "THEN",
            Token::Else => "ELSE",
            Token::End => "END",
            Token::In => "IN",
            Token::Between => "BETWEEN",
            Token::Like => "LIKE",
            Token::IsNull => "IS NULL",
            Token::IsNotNull => "IS NOT NULL",
            Token::Distinct => "DISTINCT",
            Token::All => "ALL",
            Token::Union => "UNION",
            Token::Null | Token::LitNull => "NULL",
            Token::True => "TRUE",
            Token::False => "FALSE",

            Token::Create => "CREATE",
            Token::Drop => "DROP",
            Token::Table => "TABLE",
            Token::Index => "INDEX",
            Token::View => "VIEW",
            Token::Constraint => "CONSTRAINT",
            Token::Primary => "PRIMARY",
            Token::Key => "KEY",
            Token::Foreign => "FOREIGN",
            Token::References => "REFERENCES",
            Token::Unique => "UNIQUE",
            Token::Default => "DEFAULT",
            Token::Cascade => "CASCADE",
            Token::Restrict => "RESTRICT",
            Token::NoAction => "NO ACTION",
            Token::SetNull => "SET NULL",
            Token::SetDefault => "SET DEFAULT",
            Token::If => "IF",
            Token::Exists => "EXISTS",
            Token::Unsigned => "UNSIGNED",

            Token::Insert => "INSERT",
            Token::Into => "INTO",
            Token::Values => "VALUES",
            Token::Update => "UPDATE",
            Token::Set => "SET",
            Token::Delete => "DELETE",

            Token::Comma => ",",
            Token::Dot => ".",
            Token::Star | Token::Mul => "*",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Eq => "=",
            Token::Ne => "<>",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Div => "/",
            Token::Mod => "%",

            Token::Space => " ",
            Token::Newline => "\n",
            Token::Keyword(k) => *k,

            Token::Concat
            | Token::Indent(_)
            | Token::Ident(_)
            | Token::QualifiedIdent(_)
            | Token::LitInt(_)
            | Token::LitFloat(_)
            | Token::LitString(_)
            | Token::LitBool(_)
            | Token::Param(_)
            | Token::FunctionName(_)
            | Token::Stream(_)
            | Token::Raw(_) => return None,
        };
        Some(text)
    }

    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write(&mut out, dialect, &mut Placeholders::default());
        out
    }

    fn write(&self, out: &mut String, dialect: Dialect, placeholders: &mut Placeholders) {
        if let Some(text) = self.fixed_text() {
            out.push_str(text);
            return;
        }
        match self {
            Token::Concat => out.push_str(dialect.concat_operator()),
            Token::Indent(n) => out.extend(std::iter::repeat("  ").take(*n)),
            Token::Ident(name) => out.push_str(&dialect.quote_identifier(name)),
            Token::QualifiedIdent(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(&dialect.quote_identifier(part));
                }
            }
            Token::LitInt(n) => out.push_str(&n.to_string()),
            Token::LitFloat(f) => {
                let mut buffer = ryu::Buffer::new();
                out.push_str(buffer.format(*f));
            }
            Token::LitString(s) => out.push_str(&dialect.quote_string(s)),
            Token::LitBool(b) => out.push_str(dialect.format_bool(*b)),
            Token::Param(name) => {
                let position = placeholders.position(name);
                out.push_str(&dialect.format_parameter(name, position));
            }
            Token::FunctionName(name) => {
                let name = dialect.remap_function(name).unwrap_or(name.as_str());
                out.push_str(&name.to_uppercase());
            }
            Token::Stream(inner) => inner.write(out, dialect, placeholders),
            Token::Raw(s) => out.push_str(s),
            // Everything else has fixed text.
            _ => {}
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Embed another stream as a single nested token.
    pub fn embed(&mut self, other: TokenStream) -> &mut Self {
        self.push(Token::Stream(other))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write(&mut out, dialect, &mut Placeholders::default());
        out
    }

    fn write(&self, out: &mut String, dialect: Dialect, placeholders: &mut Placeholders) {
        for token in &self.tokens {
            token.write(out, dialect, placeholders);
        }
    }

    /// Parameter names in textual order, one entry per occurrence.
    pub fn parameter_occurrences(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_parameters(&mut names);
        names
    }

    /// Distinct parameter names, ordered by first appearance.
    pub fn parameters(&self) -> Vec<String> {
        let mut seen = Placeholders::default();
        for name in self.parameter_occurrences() {
            seen.position(&name);
        }
        seen.names
    }

    fn collect_parameters(&self, names: &mut Vec<String>) {
        for token in &self.tokens {
            match token {
                Token::Param(name) => names.push(name.clone()),
                Token::Stream(inner) => inner.collect_parameters(names),
                _ => {}
            }
        }
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
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
    pub fn ident(&mut self, name: &str) -> &mut Self {
        self.push(Token::Ident(name.to_string()))
    }

    /// Parenthesized, comma-separated identifier list: `(a, b)`.
    pub fn ident_list<S: AsRef<str>>(&mut self, names: &[S]) -> &mut Self {
        self.lparen();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.ident(name.as_ref());
        }
        self.rparen()
    }
}
