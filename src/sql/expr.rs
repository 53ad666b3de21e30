//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for SQL expressions
//! with exhaustive pattern matching enforced by the compiler.
//!
//! Column and table references are dotted paths; they are resolved against
//! the schema only when the expression is rendered, through the
//! [`RenderContext`]'s resolver.

use super::context::RenderContext;
use super::dialect::SqlDialect;
use super::query::{Select, SelectItem};
use super::token::{Token, TokenStream};
use super::types::DataType;
use crate::error::{Error, Result};
use crate::resolve::{AliasTarget, Resolver};
use crate::schema::NodeId;

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `render()` and `children()` - the
/// compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal values
    Literal(Literal),

    /// Named parameter with an optional declared type.
    Param {
        name: String,
        data_type: Option<DataType>,
    },

    /// Bare SQL keyword (CURRENT_TIMESTAMP, DEFAULT, ...)
    Keyword(SqlKeyword),

    /// Column reference by dotted path: `column`, `t.column`, `ns.t.column`
    Column(String),

    /// Table reference by dotted path: `table`, `ns.table`, or an alias
    Table(String),

    /// Wildcard: * or table.*
    Star { table: Option<String> },

    /// Unary operation: op expr
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expr>,
        data_type: Option<DataType>,
    },

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
        data_type: Option<DataType>,
    },

    /// Function call: name(args...)
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
        data_type: Option<DataType>,
    },

    /// CASE [operand] WHEN... THEN... ELSE... END
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },

    /// Parenthesized, comma-separated list: (a, b, c)
    List(Vec<Expr>),

    /// BETWEEN: expr BETWEEN low AND high
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    /// IN subquery: expr IN (SELECT ...)
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<Select>,
        negated: bool,
    },

    /// Scalar subquery: (SELECT ...)
    Subquery(Box<Select>),

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// Raw SQL expression passed directly to output without escaping.
    ///
    /// # Security Warning
    ///
    /// **Never pass user input to this variant.** Raw SQL is not sanitized
    /// and can lead to SQL injection vulnerabilities. Only use with:
    /// - Trusted, static SQL fragments
    /// - Dialect-specific syntax not covered by structured expressions
    ///
    /// For user-provided values, use `Expr::Literal` or `Expr::Param`.
    Raw(String),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Keywords usable in value position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlKeyword {
    CurrentTimestamp,
    CurrentDate,
    CurrentTime,
    /// `DEFAULT` inside INSERT VALUES or UPDATE SET
    Default,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    // String
    Concat,
    Like,
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter.
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::Lte
            | BinaryOperator::Gte
            | BinaryOperator::Like => 4,
            BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Concat => 5,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 6,
        }
    }

    fn is_associative(self) -> bool {
        matches!(
            self,
            BinaryOperator::And
                | BinaryOperator::Or
                | BinaryOperator::Plus
                | BinaryOperator::Mul
                | BinaryOperator::Concat
        )
    }

    /// Comparison and logical operators always yield a boolean.
    pub fn is_predicate(self) -> bool {
        self.precedence() <= 4
    }

    fn token(self) -> Token {
        match self {
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Ne => Token::Ne,
            BinaryOperator::Lt => Token::Lt,
            BinaryOperator::Gt => Token::Gt,
            BinaryOperator::Lte => Token::Lte,
            BinaryOperator::Gte => Token::Gte,
            BinaryOperator::And => Token::And,
            BinaryOperator::Or => Token::Or,
            BinaryOperator::Plus => Token::Plus,
            BinaryOperator::Minus => Token::Minus,
            BinaryOperator::Mul => Token::Mul,
            BinaryOperator::Div => Token::Div,
            BinaryOperator::Mod => Token::Mod,
            BinaryOperator::Concat => Token::Concat,
            BinaryOperator::Like => Token::Like,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

const PREC_NOT: u8 = 3;
const PREC_PREDICATE: u8 = 4;
const PREC_NEGATE: u8 = 7;
const PREC_ATOM: u8 = 8;

// =============================================================================
// Data types
// =============================================================================

impl Expr {
    /// Advisory type computed from the expression alone; column references
    /// are unknown here. Never fails.
    pub fn data_type(&self) -> Option<DataType> {
        self.type_with(&mut |_| None)
    }

    /// Like [`Expr::data_type`], but column references are looked up through
    /// `resolver`. Resolution failures yield `None`.
    pub fn infer_type(&self, resolver: &mut Resolver<'_>) -> Option<DataType> {
        self.type_with(&mut |path| column_type(resolver, path))
    }

    fn type_with(&self, columns: &mut dyn FnMut(&str) -> Option<DataType>) -> Option<DataType> {
        match self {
            Expr::Literal(lit) => match lit {
                Literal::Int(_) => Some(DataType::BigInt),
                Literal::Float(_) => Some(DataType::Double),
                Literal::String(_) => Some(DataType::Text),
                Literal::Bool(_) => Some(DataType::Bool),
                Literal::Null => None,
            },
            Expr::Param { data_type, .. } => *data_type,
            Expr::Keyword(kw) => match kw {
                SqlKeyword::CurrentTimestamp => Some(DataType::Timestamp),
                SqlKeyword::CurrentDate => Some(DataType::Date),
                SqlKeyword::CurrentTime => Some(DataType::Time),
                SqlKeyword::Default => None,
            },
            Expr::Column(path) => columns(path),
            Expr::Table(_) | Expr::Star { .. } | Expr::Raw(_) | Expr::Subquery(_) => None,
            Expr::UnaryOp {
                op,
                expr,
                data_type,
            } => data_type.or(match op {
                UnaryOperator::Not => Some(DataType::Bool),
                UnaryOperator::Minus => expr.type_with(columns),
            }),
            Expr::BinaryOp {
                left,
                op,
                right,
                data_type,
            } => {
                if data_type.is_some() {
                    return *data_type;
                }
                // Comparisons and AND/OR yield Bool whatever the operand types.
                if op.is_predicate() {
                    return Some(DataType::Bool);
                }
                left.type_with(columns).or_else(|| right.type_with(columns))
            }
            Expr::Function {
                name,
                args,
                data_type,
                ..
            } => {
                if data_type.is_some() {
                    return *data_type;
                }
                match name.to_uppercase().as_str() {
                    "COUNT" => Some(DataType::BigInt),
                    "SUM" | "MIN" | "MAX" | "COALESCE" => {
                        args.first().and_then(|a| a.type_with(columns))
                    }
                    _ => None,
                }
            }
            Expr::Case {
                when_clauses,
                else_clause,
                ..
            } => {
                let branches = when_clauses
                    .iter()
                    .map(|(_, then)| then)
                    .chain(else_clause.as_deref());
                let mut common: Option<DataType> = None;
                for branch in branches {
                    if matches!(branch, Expr::Literal(Literal::Null)) {
                        continue;
                    }
                    let t = branch.type_with(columns)?;
                    common = match common {
                        None => Some(t),
                        Some(c) => Some(c.common_type(t)?),
                    };
                }
                common
            }
            Expr::List(items) => {
                let mut common: Option<DataType> = None;
                for item in items {
                    let t = item.type_with(columns)?;
                    common = match common {
                        None => Some(t),
                        Some(c) => Some(c.common_type(t)?),
                    };
                }
                common
            }
            Expr::Between { .. } | Expr::In { .. } | Expr::InSubquery { .. } | Expr::IsNull { .. } => {
                Some(DataType::Bool)
            }
            Expr::Paren(inner) => inner.type_with(columns),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::BinaryOp { op, .. } => op.precedence(),
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                ..
            } => PREC_NOT,
            Expr::UnaryOp {
                op: UnaryOperator::Minus,
                ..
            } => PREC_NEGATE,
            Expr::Between { .. } | Expr::In { .. } | Expr::InSubquery { .. } | Expr::IsNull { .. } => {
                PREC_PREDICATE
            }
            _ => PREC_ATOM,
        }
    }

    /// Top-level OR, which needs parentheses when AND-ed with siblings.
    pub fn is_disjunction(&self) -> bool {
        matches!(
            self,
            Expr::BinaryOp {
                op: BinaryOperator::Or,
                ..
            }
        )
    }
}

fn column_type(resolver: &mut Resolver<'_>, path: &str) -> Option<DataType> {
    if let Some(AliasTarget::Derived(t)) = resolver.alias(path).copied() {
        return t;
    }
    let id = resolver.find_column(path).ok()?;
    resolver.schema().column(id).map(|c| c.data_type)
}

// =============================================================================
// Rendering
// =============================================================================

impl Expr {
    /// Append this expression's tokens, resolving every embedded path.
    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        self.render_hinted(ts, ctx, None)
    }

    /// `hint` is the type an untyped parameter takes from its context.
    pub(crate) fn render_hinted(
        &self,
        ts: &mut TokenStream,
        ctx: &mut RenderContext<'_>,
        hint: Option<DataType>,
    ) -> Result<()> {
        match self {
            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::Float(f) => {
                        if !f.is_finite() {
                            return Err(Error::InvalidLiteral(format!(
                                "{} has no SQL representation",
                                f
                            )));
                        }
                        Token::LitFloat(*f)
                    }
                    Literal::String(s) => Token::LitString(s.clone()),
                    Literal::Bool(b) => Token::LitBool(*b),
                    Literal::Null => Token::LitNull,
                });
            }

            Expr::Param { name, data_type } => {
                ctx.declare_parameter(name, data_type.or(hint));
                ts.push(Token::Param(name.clone()));
            }

            Expr::Keyword(kw) => {
                ts.push(match kw {
                    SqlKeyword::CurrentTimestamp => Token::Keyword("CURRENT_TIMESTAMP"),
                    SqlKeyword::CurrentDate => Token::Keyword("CURRENT_DATE"),
                    SqlKeyword::CurrentTime => Token::Keyword("CURRENT_TIME"),
                    SqlKeyword::Default => Token::Default,
                });
            }

            Expr::Column(path) => render_column(path, ts, ctx)?,

            Expr::Table(path) => {
                let token = table_reference(path, ctx)?;
                ts.push(token);
            }

            Expr::Star { table } => {
                if let Some(path) = table {
                    let token = table_reference(path, ctx)?;
                    ts.push(token).push(Token::Dot);
                }
                ts.push(Token::Star);
            }

            Expr::UnaryOp { op, expr, .. } => {
                match op {
                    UnaryOperator::Not => ts.push(Token::Not).space(),
                    UnaryOperator::Minus => ts.push(Token::Minus),
                };
                render_operand(expr, self.precedence(), false, ts, ctx, hint)?;
            }

            Expr::BinaryOp {
                left, op, right, ..
            } => {
                let left_type = left.infer_type(ctx.resolver_mut());
                let right_type = right.infer_type(ctx.resolver_mut());

                // CONCAT() for dialects without a usable || operator
                if *op == BinaryOperator::Concat && !ctx.dialect().supports_concat_operator() {
                    ts.push(Token::FunctionName("CONCAT".into())).lparen();
                    left.render_hinted(ts, ctx, right_type)?;
                    ts.comma().space();
                    right.render_hinted(ts, ctx, left_type)?;
                    ts.rparen();
                    return Ok(());
                }

                let prec = op.precedence();
                render_operand(left, prec, false, ts, ctx, right_type)?;
                ts.space().push(op.token()).space();
                render_operand(right, prec, !op.is_associative(), ts, ctx, left_type)?;
            }

            Expr::Function {
                name,
                args,
                distinct,
                ..
            } => {
                ts.push(Token::FunctionName(name.clone())).lparen();
                if *distinct {
                    ts.push(Token::Distinct).space();
                }
                render_list(args, ts, ctx, None)?;
                ts.rparen();
            }

            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                let operand_type = operand
                    .as_ref()
                    .and_then(|o| o.infer_type(ctx.resolver_mut()));
                let result_type = self.infer_type(ctx.resolver_mut());

                ts.push(Token::Case);
                if let Some(op) = operand {
                    ts.space();
                    op.render(ts, ctx)?;
                }
                for (when, then) in when_clauses {
                    ts.space().push(Token::When).space();
                    when.render_hinted(ts, ctx, operand_type)?;
                    ts.space().push(Token::Then).space();
                    then.render_hinted(ts, ctx, result_type)?;
                }
                if let Some(else_expr) = else_clause {
                    ts.space().push(Token::Else).space();
                    else_expr.render_hinted(ts, ctx, result_type)?;
                }
                ts.space().push(Token::End);
            }

            Expr::List(items) => {
                ts.lparen();
                render_list(items, ts, ctx, hint)?;
                ts.rparen();
            }

            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let subject = expr.infer_type(ctx.resolver_mut());
                render_operand(expr, PREC_PREDICATE, true, ts, ctx, None)?;
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space().push(Token::Between).space();
                render_operand(low, PREC_PREDICATE, true, ts, ctx, subject)?;
                ts.space().push(Token::And).space();
                render_operand(high, PREC_PREDICATE, true, ts, ctx, subject)?;
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                // "x IN ()" is invalid SQL: it is always false, NOT IN always true
                if values.is_empty() {
                    ts.push(Token::LitInt(1))
                        .space()
                        .push(Token::Eq)
                        .space()
                        .push(Token::LitInt(if *negated { 1 } else { 0 }));
                    return Ok(());
                }
                let subject = expr.infer_type(ctx.resolver_mut());
                render_operand(expr, PREC_PREDICATE, true, ts, ctx, None)?;
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space().push(Token::In).space().lparen();
                render_list(values, ts, ctx, subject)?;
                ts.rparen();
            }

            Expr::InSubquery {
                expr,
                subquery,
                negated,
            } => {
                render_operand(expr, PREC_PREDICATE, true, ts, ctx, None)?;
                if *negated {
                    ts.space().push(Token::Not);
                }
                ts.space().push(Token::In).space().lparen();
                let mut inner = TokenStream::new();
                subquery.render(&mut inner, ctx)?;
                ts.embed(inner).rparen();
            }

            Expr::Subquery(subquery) => {
                let mut inner = TokenStream::new();
                subquery.render(&mut inner, ctx)?;
                ts.lparen().embed(inner).rparen();
            }

            Expr::IsNull { expr, negated } => {
                render_operand(expr, PREC_PREDICATE, true, ts, ctx, None)?;
                ts.space().push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }

            Expr::Paren(inner) => {
                ts.lparen();
                inner.render_hinted(ts, ctx, hint)?;
                ts.rparen();
            }

            Expr::Raw(sql) => {
                ts.push(Token::Raw(sql.clone()));
            }
        }
        Ok(())
    }
}

/// Render a child operand, parenthesized when it binds looser than its parent.
fn render_operand(
    expr: &Expr,
    parent_prec: u8,
    strict: bool,
    ts: &mut TokenStream,
    ctx: &mut RenderContext<'_>,
    hint: Option<DataType>,
) -> Result<()> {
    let child = expr.precedence();
    if child < parent_prec || (strict && child == parent_prec) {
        ts.lparen();
        expr.render_hinted(ts, ctx, hint)?;
        ts.rparen();
        Ok(())
    } else {
        expr.render_hinted(ts, ctx, hint)
    }
}

/// Comma-separated, in the order supplied.
fn render_list(
    items: &[Expr],
    ts: &mut TokenStream,
    ctx: &mut RenderContext<'_>,
    hint: Option<DataType>,
) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        item.render_hinted(ts, ctx, hint)?;
    }
    Ok(())
}

/// Emit a column path.
///
/// A path whose first segment is an alias is emitted verbatim (after checking
/// it resolves); a bare result alias is emitted as-is; anything else is
/// resolved and qualified by its table's alias or identifier.
fn render_column(path: &str, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();

    if segments.len() > 1 {
        match ctx.resolver().alias(segments[0]).copied() {
            Some(AliasTarget::Element(_)) => {
                ctx.resolver_mut().find_column(path)?;
                ts.push(Token::QualifiedIdent(
                    segments.iter().map(|s| s.to_string()).collect(),
                ));
                return Ok(());
            }
            Some(AliasTarget::Derived(_)) => {
                return Err(Error::NotFound {
                    kind: crate::schema::ElementKind::Column,
                    path: path.to_string(),
                });
            }
            None => {}
        }
    } else if let Some(AliasTarget::Derived(_)) = ctx.resolver().alias(path).copied() {
        ts.ident(path);
        return Ok(());
    }

    let column = ctx.resolver_mut().find_column(path)?;
    ctx.column_tokens(column, ts);
    Ok(())
}

/// Token naming a table: the alias itself, or the resolved table identifier.
fn table_reference(path: &str, ctx: &mut RenderContext<'_>) -> Result<Token> {
    if let Some(AliasTarget::Element(_)) = ctx.resolver().alias(path).copied() {
        return Ok(Token::Ident(path.to_string()));
    }
    let table = ctx.resolver_mut().find_table(path)?;
    Ok(ctx.relation_qualifier(table))
}

// =============================================================================
// Traversal
// =============================================================================

/// Visitor called for every expression node in pre-order.
pub trait ExprVisitor {
    fn visit(&mut self, expr: &Expr, resolver: &mut Resolver<'_>) -> Result<()>;
}

impl Expr {
    /// Direct child expressions in declaration order. Subquery bodies are not
    /// children; [`Expr::traverse`] enters them in their own scope.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal(_)
            | Expr::Param { .. }
            | Expr::Keyword(_)
            | Expr::Column(_)
            | Expr::Table(_)
            | Expr::Star { .. }
            | Expr::Subquery(_)
            | Expr::Raw(_) => vec![],
            Expr::UnaryOp { expr, .. } => vec![expr],
            Expr::BinaryOp { left, right, .. } => vec![left, right],
            Expr::Function { args, .. } => args.iter().collect(),
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                let mut out: Vec<&Expr> = operand.iter().map(|o| &**o).collect();
                for (when, then) in when_clauses {
                    out.push(when);
                    out.push(then);
                }
                out.extend(else_clause.as_deref());
                out
            }
            Expr::List(items) => items.iter().collect(),
            Expr::Between { expr, low, high, .. } => vec![expr, low, high],
            Expr::In { expr, values, .. } => {
                let mut out = vec![&**expr];
                out.extend(values.iter());
                out
            }
            Expr::InSubquery { expr, .. } => vec![expr],
            Expr::IsNull { expr, .. } => vec![expr],
            Expr::Paren(inner) => vec![inner],
        }
    }

    /// Visit this node, then each child in declaration order.
    pub fn traverse<V: ExprVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        resolver: &mut Resolver<'_>,
    ) -> Result<()> {
        visitor.visit(self, resolver)?;
        for child in self.children() {
            child.traverse(visitor, resolver)?;
        }
        match self {
            Expr::Subquery(select) | Expr::InSubquery { subquery: select, .. } => {
                select.traverse(visitor, resolver)
            }
            _ => Ok(()),
        }
    }
}

/// Collects parameters in visit order, one entry per name.
#[derive(Debug, Default)]
pub struct ParameterCollector {
    pub parameters: Vec<(String, Option<DataType>)>,
}

impl ExprVisitor for ParameterCollector {
    fn visit(&mut self, expr: &Expr, _resolver: &mut Resolver<'_>) -> Result<()> {
        if let Expr::Param { name, data_type } = expr {
            match self.parameters.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => {
                    if existing.is_none() {
                        *existing = *data_type;
                    }
                }
                None => self.parameters.push((name.clone(), *data_type)),
            }
        }
        Ok(())
    }
}

/// Resolves every column path to its schema node.
///
/// Result aliases are skipped; any other unresolvable path fails the traversal.
#[derive(Debug, Default)]
pub struct ColumnCollector {
    pub columns: Vec<NodeId>,
}

impl ExprVisitor for ColumnCollector {
    fn visit(&mut self, expr: &Expr, resolver: &mut Resolver<'_>) -> Result<()> {
        if let Expr::Column(path) = expr {
            if let Some(AliasTarget::Derived(_)) = resolver.alias(path).copied() {
                return Ok(());
            }
            let id = resolver.find_column(path)?;
            if !self.columns.contains(&id) {
                self.columns.push(id);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference from a dotted path.
pub fn col(path: &str) -> Expr {
    Expr::Column(path.into())
}

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column(format!("{}.{}", table, column))
}

/// Create a table reference.
pub fn table(path: &str) -> Expr {
    Expr::Table(path.into())
}

/// Named parameter; its type is inferred from the expression it is compared to.
pub fn param(name: &str) -> Expr {
    Expr::Param {
        name: name.into(),
        data_type: None,
    }
}

/// Named parameter with a declared type.
pub fn typed_param(name: &str, data_type: DataType) -> Expr {
    Expr::Param {
        name: name.into(),
        data_type: Some(data_type),
    }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a float literal.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Create a boolean literal.
pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

/// Create a NULL literal.
pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

pub fn current_timestamp() -> Expr {
    Expr::Keyword(SqlKeyword::CurrentTimestamp)
}

/// `DEFAULT` in value position.
pub fn default_value() -> Expr {
    Expr::Keyword(SqlKeyword::Default)
}

/// Create a star (*) expression.
pub fn star() -> Expr {
    Expr::Star { table: None }
}

/// Create a qualified star (table.*) expression.
pub fn table_star(table: &str) -> Expr {
    Expr::Star {
        table: Some(table.into()),
    }
}

/// Parenthesized list of values.
pub fn list(items: Vec<Expr>) -> Expr {
    Expr::List(items)
}

/// Explicit parentheses.
pub fn paren(expr: Expr) -> Expr {
    Expr::Paren(Box::new(expr))
}

/// Scalar subquery.
pub fn subquery(select: Select) -> Expr {
    Expr::Subquery(Box::new(select))
}

/// Raw SQL expression (pass-through, no parsing).
///
/// # Security Warning
///
/// **Never pass user input to this function.** The SQL is not sanitized
/// and can lead to SQL injection vulnerabilities.
pub fn raw_sql(sql: &str) -> Expr {
    Expr::Raw(sql.into())
}

// =============================================================================
// Functions
// =============================================================================

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
        distinct: false,
        data_type: None,
    }
}

/// COUNT(expr)
pub fn count(expr: Expr) -> Expr {
    func("COUNT", vec![expr])
}

/// COUNT(*)
pub fn count_star() -> Expr {
    func("COUNT", vec![star()])
}

/// COUNT(DISTINCT expr)
pub fn count_distinct(expr: Expr) -> Expr {
    Expr::Function {
        name: "COUNT".into(),
        args: vec![expr],
        distinct: true,
        data_type: None,
    }
}

/// SUM(expr)
pub fn sum(expr: Expr) -> Expr {
    func("SUM", vec![expr])
}

/// AVG(expr)
pub fn avg(expr: Expr) -> Expr {
    func("AVG", vec![expr])
}

/// MIN(expr)
pub fn min(expr: Expr) -> Expr {
    func("MIN", vec![expr])
}

/// MAX(expr)
pub fn max(expr: Expr) -> Expr {
    func("MAX", vec![expr])
}

/// COALESCE(args...)
pub fn coalesce(args: Vec<Expr>) -> Expr {
    func("COALESCE", args)
}

// =============================================================================
// CASE Builder
// =============================================================================

/// Builder for CASE expressions.
#[derive(Debug, Clone)]
#[must_use = "CaseBuilder has no effect until end() is called"]
pub struct CaseBuilder {
    operand: Option<Box<Expr>>,
    when_clauses: Vec<(Expr, Expr)>,
}

/// Searched CASE: `CASE WHEN cond THEN ... END`.
pub fn case_when(condition: impl Into<Expr>, then: impl Into<Expr>) -> CaseBuilder {
    CaseBuilder {
        operand: None,
        when_clauses: vec![(condition.into(), then.into())],
    }
}

/// Simple CASE: `CASE operand WHEN value THEN ... END`.
pub fn case_of(operand: impl Into<Expr>) -> CaseBuilder {
    CaseBuilder {
        operand: Some(Box::new(operand.into())),
        when_clauses: vec![],
    }
}

impl CaseBuilder {
    pub fn when(mut self, condition: impl Into<Expr>, then: impl Into<Expr>) -> Self {
        self.when_clauses.push((condition.into(), then.into()));
        self
    }

    /// Finish with an ELSE branch.
    pub fn otherwise(self, value: impl Into<Expr>) -> Expr {
        Expr::Case {
            operand: self.operand,
            when_clauses: self.when_clauses,
            else_clause: Some(Box::new(value.into())),
        }
    }

    /// Finish without ELSE.
    pub fn end(self) -> Expr {
        Expr::Case {
            operand: self.operand,
            when_clauses: self.when_clauses,
            else_clause: None,
        }
    }
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
        data_type: None,
    }
}

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Ne, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gte, other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lt, other.into())
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lte, other.into())
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Or, other.into())
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
            data_type: None,
        }
    }

    fn neg(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(self.into_expr()),
            data_type: None,
        }
    }

    // Arithmetic operators
    fn add(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Plus, other.into())
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Minus, other.into())
    }

    fn mul(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Mul, other.into())
    }

    fn div(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Div, other.into())
    }

    fn modulo(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Mod, other.into())
    }

    // String operators
    fn like(self, pattern: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Like, pattern.into())
    }

    fn concat(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Concat, other.into())
    }

    // NULL checks
    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    // IN operator
    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: true,
        }
    }

    fn in_subquery(self, select: Select) -> Expr {
        Expr::InSubquery {
            expr: Box::new(self.into_expr()),
            subquery: Box::new(select),
            negated: false,
        }
    }

    fn not_in_subquery(self, select: Select) -> Expr {
        Expr::InSubquery {
            expr: Box::new(self.into_expr()),
            subquery: Box::new(select),
            negated: true,
        }
    }

    // BETWEEN operator
    fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    fn not_between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: true,
        }
    }

    /// Override the advisory type of an operator, function or parameter.
    /// Other expressions are returned unchanged.
    fn typed(self, data_type: DataType) -> Expr {
        let mut expr = self.into_expr();
        match &mut expr {
            Expr::UnaryOp { data_type: t, .. }
            | Expr::BinaryOp { data_type: t, .. }
            | Expr::Function { data_type: t, .. }
            | Expr::Param { data_type: t, .. } => *t = Some(data_type),
            _ => {}
        }
        expr
    }

    /// Alias this expression (for SELECT list).
    fn alias(self, name: &str) -> SelectItem {
        SelectItem {
            expr: self.into_expr(),
            alias: Some(name.into()),
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n as i64)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}
