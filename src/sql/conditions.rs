//! Accumulated WHERE / HAVING / ON constraints.

use super::context::RenderContext;
use super::expr::{Expr, ExprExt, ExprVisitor};
use super::token::{Token, TokenStream};
use crate::error::Result;
use crate::resolve::Resolver;

/// An AND-joined list of constraints built up over several calls.
///
/// Adding a batch to a non-empty list first folds the existing entries into a
/// single AND-chain, so later batches always AND with the whole earlier group
/// rather than with its last expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    entries: Vec<Expr>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of constraints, in the order supplied.
    pub fn add(&mut self, batch: impl IntoIterator<Item = Expr>) {
        if self.entries.len() > 1 {
            let mut existing = std::mem::take(&mut self.entries);
            if let Some(mut group) = existing.pop() {
                while let Some(prev) = existing.pop() {
                    group = prev.and(group);
                }
                self.entries.push(group);
            }
        }
        self.entries.extend(batch);
    }

    pub fn entries(&self) -> &[Expr] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries joined with AND; a top-level OR entry is parenthesized when it
    /// has siblings.
    pub fn render(&self, ts: &mut TokenStream, ctx: &mut RenderContext<'_>) -> Result<()> {
        let wrap = self.entries.len() > 1;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                ts.space().push(Token::And).space();
            }
            if wrap && entry.is_disjunction() {
                ts.lparen();
                entry.render(ts, ctx)?;
                ts.rparen();
            } else {
                entry.render(ts, ctx)?;
            }
        }
        Ok(())
    }

    pub fn traverse<V: ExprVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        resolver: &mut Resolver<'_>,
    ) -> Result<()> {
        for entry in &self.entries {
            entry.traverse(visitor, resolver)?;
        }
        Ok(())
    }
}
