//! Flow driver: a straight-line state machine over boxed nodes.

use std::collections::HashMap;

use anyhow::{Context, Result};

use super::node::{Action, AnyNode, Node};

/// Index of a node within its flow.
type NodeId = usize;

/// A directed chain of nodes with an explicit transition table.
///
/// Transitions map `(node, action)` to the successor node and are fixed at
/// construction time by the [`FlowBuilder`]; the run ends at the first
/// action with no registered edge.
pub struct Flow<C> {
    nodes: Vec<Box<dyn AnyNode<C>>>,
    edges: HashMap<(NodeId, Action), NodeId>,
    start: NodeId,
}

/// Builds a linear chain: every `then` wires the previous tail to the new
/// node on [`Action::Continue`].
pub struct FlowBuilder<C> {
    nodes: Vec<Box<dyn AnyNode<C>>>,
    edges: HashMap<(NodeId, Action), NodeId>,
    tail: NodeId,
}

impl<C> Flow<C> {
    /// Begin a chain at `node`.
    pub fn start<N>(node: N) -> FlowBuilder<C>
    where
        N: Node<C> + 'static,
    {
        FlowBuilder {
            nodes: vec![Box::new(node)],
            edges: HashMap::new(),
            tail: 0,
        }
    }

    /// Drive the chain to completion against `ctx`.
    ///
    /// Each node runs prep, exec, and post exactly once before control
    /// moves on; any phase error aborts the run immediately and carries the
    /// failing stage's name.
    pub fn run(&self, ctx: &mut C) -> Result<()> {
        let mut current = self.start;
        loop {
            let node = &self.nodes[current];
            tracing::debug!(stage = node.name(), "stage start");
            let action = node
                .step(ctx)
                .with_context(|| format!("stage {} failed", node.name()))?;
            match self.successor(current, action) {
                Some(next) => current = next,
                None => return Ok(()),
            }
        }
    }

    fn successor(&self, node: NodeId, action: Action) -> Option<NodeId> {
        self.edges.get(&(node, action)).copied()
    }
}

impl<C> FlowBuilder<C> {
    /// Append `node` to the chain.
    pub fn then<N>(mut self, node: N) -> Self
    where
        N: Node<C> + 'static,
    {
        let id = self.nodes.len();
        self.nodes.push(Box::new(node));
        self.edges.insert((self.tail, Action::Continue), id);
        self.tail = id;
        self
    }

    /// Finish the chain.
    pub fn build(self) -> Flow<C> {
        Flow {
            nodes: self.nodes,
            edges: self.edges,
            start: 0,
        }
    }
}
