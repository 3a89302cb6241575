//! Minimal workflow engine: nodes with a prep/exec/post lifecycle, chained
//! into a straight-line flow by action labels.
//!
//! The engine knows nothing about stories or language models. Stages carry
//! their own collaborators, and the context type threaded through a run is
//! supplied by the caller.

mod batch;
mod driver;
mod node;

pub use batch::{Batch, BatchNode};
pub use driver::{Flow, FlowBuilder};
pub use node::{Action, Node};
