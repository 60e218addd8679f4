//! Graph-backed spider diagrams and the rewrite rules that act on them.
//!
//! Diagrams are represented as an undirected, unweighted multigraph stored as
//! a flat list of [`Wire`]s over an arena of [`Spider`]s. Spiders removed in
//! the middle of a rewrite are tombstoned in place and only dropped when the
//! diagram is [compacted][Diagram::compact], so node IDs stay stable for the
//! duration of a single pass. See [`spider_diagram!`][crate::spider_diagram]
//! for example usage and abbreviated syntax.

use thiserror::Error;

/// Errors for fallible operations on graph-backed diagrams.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Returned when a spider does not exist under a given ID.
    #[error("missing spider {0}")]
    MissingNode(NodeId),

    /// Returned when a wire references a spider index that is out of range or
    /// has been removed.
    ///
    /// Fields are the position of the offending wire followed by its two
    /// endpoints.
    #[error("invariant violation: wire {0} ({1}, {2}) references a missing spider")]
    InvariantViolation(usize, NodeId, NodeId),

    /// Returned when same-color fusion is attempted while a Hadamard spider is
    /// still present in the diagram.
    #[error("cannot fuse spiders: Hadamard spider {0} is unresolved")]
    UnresolvedHadamard(NodeId),

    /// Returned when a Graphviz graph cannot be assembled.
    #[error("graphviz error: {0}")]
    Graphviz(String),

    /// I/O error when writing a diagram to a file.
    #[error("{0}")]
    IOError(#[from] std::io::Error),
}
pub type GraphResult<T> = Result<T, GraphError>;

pub(crate) mod spider;
pub use spider::*;

pub(crate) mod diagram;
pub use diagram::*;

pub mod rules;

pub(crate) mod render;

/// Identifies a spider in a diagram.
pub type NodeId = usize;
