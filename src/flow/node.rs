//! The three-phase node contract executed by the flow driver.

use anyhow::Result;

/// Outcome label returned by a node's `post` phase.
///
/// The driver follows the edge registered for the returned label; a label
/// with no registered successor ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Hand control to the registered successor.
    Continue,
}

/// A unit of work in a flow.
///
/// The lifecycle is strict: `prep` reads the context (and durable
/// artifacts) without mutating anything, `exec` performs the work as a pure
/// function of the prep result, and `post` is the only phase allowed to
/// mutate the context or write artifacts. Keeping `exec` away from the
/// context makes it independently testable and safely repeatable per item
/// when wrapped in a [`super::Batch`].
pub trait Node<C> {
    /// Value produced by `prep` and consumed by `exec` and `post`.
    type Prep;
    /// Value produced by `exec` and consumed by `post`.
    type Out;

    /// Short stable name used in progress and error reporting.
    fn name(&self) -> &str;

    /// Read whatever `exec` needs from the context.
    fn prep(&self, ctx: &C) -> Result<Self::Prep>;

    /// Perform the unit of work.
    fn exec(&self, prep: &Self::Prep) -> Result<Self::Out>;

    /// Apply side effects and choose the next action.
    fn post(&self, ctx: &mut C, prep: Self::Prep, out: Self::Out) -> Result<Action>;
}

/// Object-safe view of a [`Node`] so the driver can hold a heterogeneous
/// chain. `step` runs one full prep/exec/post cycle.
pub(crate) trait AnyNode<C> {
    fn name(&self) -> &str;
    fn step(&self, ctx: &mut C) -> Result<Action>;
}

impl<C, N: Node<C>> AnyNode<C> for N {
    fn name(&self) -> &str {
        Node::name(self)
    }

    fn step(&self, ctx: &mut C) -> Result<Action> {
        let prep = self.prep(ctx)?;
        let out = self.exec(&prep)?;
        self.post(ctx, prep, out)
    }
}
