//! Observer surface for use-edge emission.

use crossgraph::{CrossGraph, NodeKey};

/// Why the walker is emitting a use edge.
///
/// The builder currently reports [`UseContext::NoCtx`] everywhere; the other
/// variants are reserved for walkers that track finer contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseContext {
    /// No particular context
    NoCtx,
    /// The use is a call argument
    CallArg,
    /// The use is the right-hand side of an assignment
    AssignRhs,
}

/// Observer invoked after each use edge is added to the graph.
///
/// Arguments: context, whether the use occurs on either side of an assignment,
/// edge source, edge target, and the graph (already containing the new edge).
pub type UseHookFn = dyn FnMut(UseContext, bool, &NodeKey, &NodeKey, &CrossGraph);
