//! Query builder - construct SELECT statements with a fluent API.
//!
//! A [`Select`] holds unresolved dotted paths; every table and column is
//! looked up against the schema while the statement is rendered.

use super::conditions::Conditions;
use super::context::RenderContext;
use super::dialect::SqlDialect;
use super::expr::{col, Expr, ExprExt, ExprVisitor};
use super::statement::{CompiledStatement, Statement};
use super::token::{Token, TokenStream};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::resolve::{AliasTarget, Resolver};
use crate::schema::{NodeId, Schema};

// =============================================================================
// Select Item (expression with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }
}

impl From<Expr> for SelectItem {
    fn from(expr: Expr) -> Self {
        SelectItem::new(expr)
    }
}

impl From<&str> for SelectItem {
    fn from(path: &str) -> Self {
        SelectItem::new(col(path))
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A table reference by dotted path, with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub path: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: &str, alias: &str) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    fn render(&self, table: NodeId, ts: &mut TokenStream, ctx: &RenderContext<'_>) {
        ts.push(ctx.table_token(table));
        if let Some(alias) = &self.alias {
            ts.space().push(Token::As).space().ident(alias);
        }
    }
}

impl From<&str> for TableRef {
    fn from(path: &str) -> Self {
        TableRef::new(path)
    }
}

// =============================================================================
// Joins
// =============================================================================

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Conditions,
}

impl Join {
    fn render(&self, table: NodeId, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        match self.join_type {
            JoinType::Inner => ts.push(Token::Inner),
            JoinType::Left => ts.push(Token::Left),
            JoinType::Right => ts.push(Token::Right),
            JoinType::Full => {
                if !ctx.dialect().supports_full_outer_join() {
                    return Err(ctx.unsupported("FULL OUTER JOIN"));
                }
                ts.push(Token::Full).space().push(Token::Outer)
            }
            JoinType::Cross => ts.push(Token::Cross),
        };
        ts.space().push(Token::Join).space();
        self.table.render(table, ts, ctx);

        if !self.on.is_empty() {
            ts.space().push(Token::On).space();
            self.on.render(ts, ctx)?;
        }
        Ok(())
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// NULLS ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: Option<SortDir>,
    pub nulls: Option<NullsOrder>,
}

impl OrderByExpr {
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            dir: Some(SortDir::Asc),
            nulls: None,
        }
    }

    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            dir: Some(SortDir::Desc),
            nulls: None,
        }
    }

    #[must_use]
    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    #[must_use]
    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }

    /// NULLS FIRST/LAST is skipped for dialects that don't support it.
    fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        self.expr.render(ts, ctx)?;

        if let Some(dir) = &self.dir {
            ts.space().push(match dir {
                SortDir::Asc => Token::Asc,
                SortDir::Desc => Token::Desc,
            });
        }

        if let Some(nulls) = &self.nulls {
            if ctx.dialect().supports_nulls_ordering() {
                ts.space().push(match nulls {
                    NullsOrder::First => Token::NullsFirst,
                    NullsOrder::Last => Token::NullsLast,
                });
            }
        }
        Ok(())
    }
}

impl From<Expr> for OrderByExpr {
    fn from(expr: Expr) -> Self {
        Self {
            expr,
            dir: None,
            nulls: None,
        }
    }
}

impl From<&str> for OrderByExpr {
    fn from(path: &str) -> Self {
        OrderByExpr::from(col(path))
    }
}

// =============================================================================
// Select Builder
// =============================================================================

/// A UNION part.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionPart {
    pub all: bool,
    pub select: Select,
}

/// A SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Select has no effect until compiled"]
pub struct Select {
    pub items: Vec<SelectItem>,
    pub distinct: bool,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub filter: Conditions,
    pub group_by: Vec<Expr>,
    pub having: Conditions,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub unions: Vec<UnionPart>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the FROM table.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Set the FROM table with an alias.
    pub fn from_as(self, path: &str, alias: &str) -> Self {
        self.from(TableRef::aliased(path, alias))
    }

    /// Append column paths to the SELECT list.
    pub fn columns(mut self, paths: &[&str]) -> Self {
        self.items.extend(paths.iter().map(|p| SelectItem::from(*p)));
        self
    }

    /// Append one item to the SELECT list.
    pub fn column(mut self, item: impl Into<SelectItem>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Append an aliased expression to the SELECT list.
    pub fn column_as(self, expr: impl Into<Expr>, alias: &str) -> Self {
        self.column(expr.into().alias(alias))
    }

    /// Replace the SELECT list.
    pub fn select(mut self, items: Vec<impl Into<SelectItem>>) -> Self {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Add DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add a JOIN with its ON constraints.
    pub fn join(mut self, join_type: JoinType, table: impl Into<TableRef>, on: Vec<Expr>) -> Self {
        let mut conditions = Conditions::new();
        conditions.add(on);
        self.joins.push(Join {
            join_type,
            table: table.into(),
            on: conditions,
        });
        self
    }

    /// Add an INNER JOIN.
    pub fn inner_join(self, table: impl Into<TableRef>, on: Expr) -> Self {
        self.join(JoinType::Inner, table, vec![on])
    }

    /// Add a LEFT JOIN.
    pub fn left_join(self, table: impl Into<TableRef>, on: Expr) -> Self {
        self.join(JoinType::Left, table, vec![on])
    }

    /// Add a RIGHT JOIN.
    pub fn right_join(self, table: impl Into<TableRef>, on: Expr) -> Self {
        self.join(JoinType::Right, table, vec![on])
    }

    /// Add a FULL OUTER JOIN.
    pub fn full_join(self, table: impl Into<TableRef>, on: Expr) -> Self {
        self.join(JoinType::Full, table, vec![on])
    }

    /// Add a CROSS JOIN.
    pub fn cross_join(self, table: impl Into<TableRef>) -> Self {
        self.join(JoinType::Cross, table, vec![])
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filter.add([condition]);
        self
    }

    /// Add a batch of WHERE conditions.
    pub fn filter_all(mut self, conditions: Vec<Expr>) -> Self {
        self.filter.add(conditions);
        self
    }

    /// Add `path = value` equality conditions as one batch.
    pub fn filter_eq<'a, V: Into<Expr>>(
        mut self,
        pairs: impl IntoIterator<Item = (&'a str, V)>,
    ) -> Self {
        self.filter
            .add(pairs.into_iter().map(|(path, value)| col(path).eq(value)));
        self
    }

    /// Append GROUP BY expressions.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by.extend(exprs);
        self
    }

    /// Add a HAVING condition (ANDed with existing conditions).
    pub fn having(mut self, condition: Expr) -> Self {
        self.having.add([condition]);
        self
    }

    /// Append an ORDER BY expression.
    pub fn order_by(mut self, order: impl Into<OrderByExpr>) -> Self {
        self.order_by.push(order.into());
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Combine with another query using UNION.
    pub fn union(mut self, other: Select) -> Self {
        self.unions.push(UnionPart {
            all: false,
            select: other,
        });
        self
    }

    /// Combine with another query using UNION ALL.
    pub fn union_all(mut self, other: Select) -> Self {
        self.unions.push(UnionPart {
            all: true,
            select: other,
        });
        self
    }

    pub fn compile(self, schema: &Schema, settings: &Settings) -> Result<CompiledStatement> {
        Statement::from(self).compile(schema, settings)
    }

    pub fn to_sql(self, schema: &Schema, settings: &Settings) -> Result<String> {
        Ok(self.compile(schema, settings)?.into_sql())
    }

    fn has_paging_or_order(&self) -> bool {
        self.limit.is_some() || self.offset.is_some() || !self.order_by.is_empty()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Append this query's tokens. Only the outermost query records result columns.
    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        if self.unions.iter().any(|u| u.select.has_paging_or_order()) {
            return Err(Error::UnionWithLimitOrOrder);
        }
        let record = !ctx.is_nested();

        // Tables are resolved in the enclosing scope.
        let from = match &self.from {
            Some(table) => Some(ctx.resolver_mut().find_table(&table.path)?),
            None => None,
        };
        let mut joined = Vec::with_capacity(self.joins.len());
        for join in &self.joins {
            joined.push(ctx.resolver_mut().find_table(&join.table.path)?);
        }
        let pivot = from.unwrap_or_else(|| ctx.resolver().pivot());

        ctx.with_scope(pivot, |ctx| {
            if let (Some(table), Some(id)) = (&self.from, from) {
                ctx.resolver_mut().add_relation(id);
                if let Some(alias) = &table.alias {
                    ctx.resolver_mut().set_alias(alias.clone(), id);
                }
            }
            for (join, id) in self.joins.iter().zip(&joined) {
                ctx.resolver_mut().add_relation(*id);
                if let Some(alias) = &join.table.alias {
                    ctx.resolver_mut().set_alias(alias.clone(), *id);
                }
            }

            let relations: Vec<NodeId> = from.iter().chain(&joined).copied().collect();

            // Result aliases are visible to FROM/JOIN/WHERE only when the
            // dialect resolves them early.
            let (list, body) = if ctx.dialect().extended_alias_resolution() {
                let list = self.render_list(&relations, record, ctx)?;
                let body = self.render_body(from, &joined, ctx)?;
                (list, body)
            } else {
                let body = self.render_body(from, &joined, ctx)?;
                let list = self.render_list(&relations, record, ctx)?;
                (list, body)
            };

            ts.push(Token::Select);
            if self.distinct {
                ts.space().push(Token::Distinct);
            }
            ts.space().append(&list).append(&body);

            for part in &self.unions {
                ts.space().push(Token::Union);
                if part.all {
                    ts.space().push(Token::All);
                }
                ts.space();
                part.select.render(ts, ctx)?;
            }

            self.render_tail(ts, ctx)
        })
    }

    /// SELECT list; registers result aliases once rendered.
    fn render_list(
        &self,
        relations: &[NodeId],
        record: bool,
        ctx: &mut RenderContext<'_>,
    ) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        let star = SelectItem::new(super::expr::star());
        let items: &[SelectItem] = if self.items.is_empty() {
            std::slice::from_ref(&star)
        } else {
            &self.items
        };

        let mut derived = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            let mut item_ts = TokenStream::new();
            item.expr.render(&mut item_ts, ctx)?;
            ts.append(&item_ts);

            let data_type = item.expr.infer_type(ctx.resolver_mut());
            if let Some(alias) = &item.alias {
                ts.space().push(Token::As).space().ident(alias);
                derived.push((alias.clone(), data_type));
            }

            if record {
                record_item(item, &item_ts, relations, ctx)?;
            }
        }

        for (alias, data_type) in derived {
            ctx.resolver_mut().set_derived_alias(alias, data_type);
        }
        Ok(ts)
    }

    /// FROM, JOIN, WHERE, GROUP BY and HAVING.
    fn render_body(
        &self,
        from: Option<NodeId>,
        joined: &[NodeId],
        ctx: &mut RenderContext<'_>,
    ) -> Result<TokenStream> {
        let mut ts = TokenStream::new();

        if let (Some(table), Some(id)) = (&self.from, from) {
            ts.space().push(Token::From).space();
            table.render(id, &mut ts, ctx);
        }

        for (join, id) in self.joins.iter().zip(joined) {
            ts.space();
            join.render(*id, &mut ts, ctx)?;
        }

        if !self.filter.is_empty() {
            ts.space().push(Token::Where).space();
            self.filter.render(&mut ts, ctx)?;
        }

        if !self.group_by.is_empty() {
            ts.space().push(Token::GroupBy).space();
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                expr.render(&mut ts, ctx)?;
            }
        }

        if !self.having.is_empty() {
            ts.space().push(Token::Having).space();
            self.having.render(&mut ts, ctx)?;
        }

        Ok(ts)
    }

    /// ORDER BY and pagination.
    fn render_tail(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let paged = self.limit.is_some() || self.offset.is_some();

        if !self.order_by.is_empty() {
            ts.space().push(Token::OrderBy).space();
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                order.render(ts, ctx)?;
            }
        } else if paged && ctx.dialect().requires_order_by_for_offset() {
            // OFFSET/FETCH is only valid after ORDER BY; row order stays unspecified.
            ts.space()
                .push(Token::OrderBy)
                .space()
                .lparen()
                .push(Token::Select)
                .space()
                .push(Token::Null)
                .rparen();
        }

        if paged {
            let paging = ctx.dialect().emit_limit_offset(self.limit, self.offset);
            if !paging.is_empty() {
                ts.space().append(&paging);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Visit every expression of this query in clause order, inside the
    /// query's own resolver scope.
    pub fn traverse<V: ExprVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        resolver: &mut Resolver<'_>,
    ) -> Result<()> {
        let from = match &self.from {
            Some(table) => Some(resolver.find_table(&table.path)?),
            None => None,
        };
        let mut joined = Vec::with_capacity(self.joins.len());
        for join in &self.joins {
            joined.push(resolver.find_table(&join.table.path)?);
        }
        let pivot = from.unwrap_or_else(|| resolver.pivot());

        resolver.scoped(pivot, |resolver| {
            if let (Some(table), Some(id)) = (&self.from, from) {
                resolver.add_relation(id);
                if let Some(alias) = &table.alias {
                    resolver.set_alias(alias.clone(), id);
                }
            }
            for (join, id) in self.joins.iter().zip(&joined) {
                resolver.add_relation(*id);
                if let Some(alias) = &join.table.alias {
                    resolver.set_alias(alias.clone(), *id);
                }
            }

            for item in &self.items {
                item.expr.traverse(visitor, resolver)?;
            }
            for item in &self.items {
                if let Some(alias) = &item.alias {
                    let data_type = item.expr.infer_type(resolver);
                    resolver.set_derived_alias(alias.clone(), data_type);
                }
            }
            for join in &self.joins {
                join.on.traverse(visitor, resolver)?;
            }
            self.filter.traverse(visitor, resolver)?;
            for expr in &self.group_by {
                expr.traverse(visitor, resolver)?;
            }
            self.having.traverse(visitor, resolver)?;
            for part in &self.unions {
                part.select.traverse(visitor, resolver)?;
            }
            for order in &self.order_by {
                order.expr.traverse(visitor, resolver)?;
            }
            Ok(())
        })
    }
}

/// Record the result column(s) produced by one SELECT item.
fn record_item(
    item: &SelectItem,
    item_ts: &TokenStream,
    relations: &[NodeId],
    ctx: &mut RenderContext<'_>,
) -> Result<()> {
    let schema = ctx.schema();
    match &item.expr {
        Expr::Star { table } => {
            let sources = match table {
                Some(path) => match ctx.resolver().alias(path).copied() {
                    Some(AliasTarget::Element(id)) => vec![id],
                    _ => vec![ctx.resolver_mut().find_table(path)?],
                },
                None => relations.to_vec(),
            };
            for relation in sources {
                for column in schema.columns_of(relation) {
                    let data_type = schema.column(column).map(|c| c.data_type);
                    ctx.push_result_column(schema.name(column).to_string(), Some(column), data_type);
                }
            }
        }
        Expr::Column(path) => {
            let data_type = item.expr.infer_type(ctx.resolver_mut());
            let column = match ctx.resolver().alias(path).copied() {
                Some(AliasTarget::Derived(_)) => None,
                _ => Some(ctx.resolver_mut().find_column(path)?),
            };
            let name = match (&item.alias, column) {
                (Some(alias), _) => alias.clone(),
                (None, Some(id)) => schema.name(id).to_string(),
                (None, None) => path.clone(),
            };
            ctx.push_result_column(name, column, data_type);
        }
        expr => {
            let data_type = expr.infer_type(ctx.resolver_mut());
            let name = match &item.alias {
                Some(alias) => alias.clone(),
                None => item_ts.serialize(ctx.dialect()),
            };
            ctx.push_result_column(name, None, data_type);
        }
    }
    Ok(())
}
