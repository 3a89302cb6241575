//! Fan-out/fan-in adapter that runs one strategy over a list of items.

use anyhow::Result;

use super::node::{Action, Node};

/// Per-item strategy for a batched pipeline step.
///
/// `prep` produces an ordered list of independent items and `exec_one`
/// processes a single item with no access to the context, so items stay
/// individually repeatable. `post` receives the items and their results in
/// the same order `prep` produced them.
pub trait BatchNode<C> {
    /// One independent batch input.
    type Item;
    /// Result of processing one item.
    type Out;

    /// Short stable name used in progress and error reporting.
    fn name(&self) -> &str;

    /// Produce the ordered batch inputs.
    fn prep(&self, ctx: &C) -> Result<Vec<Self::Item>>;

    /// Process a single item.
    fn exec_one(&self, item: &Self::Item) -> Result<Self::Out>;

    /// Apply aggregate side effects once the whole batch has run.
    ///
    /// Runs even for an empty batch, so "zero items" is an observable
    /// outcome rather than a skipped step.
    fn post(&self, ctx: &mut C, items: Vec<Self::Item>, outs: Vec<Self::Out>) -> Result<Action>;
}

/// Adapts a [`BatchNode`] strategy into the plain [`Node`] contract.
pub struct Batch<B>(pub B);

impl<C, B: BatchNode<C>> Node<C> for Batch<B> {
    type Prep = Vec<B::Item>;
    type Out = Vec<B::Out>;

    fn name(&self) -> &str {
        self.0.name()
    }

    fn prep(&self, ctx: &C) -> Result<Self::Prep> {
        self.0.prep(ctx)
    }

    fn exec(&self, items: &Self::Prep) -> Result<Self::Out> {
        // Results are collected in input order; items run one after another
        // so completion order never differs from it.
        items.iter().map(|item| self.0.exec_one(item)).collect()
    }

    fn post(&self, ctx: &mut C, items: Self::Prep, outs: Self::Out) -> Result<Action> {
        self.0.post(ctx, items, outs)
    }
}
