use thiserror::Error;

use crate::network::NodeId;

/// Reasons for a rejected network mutation
///
/// A mutation returning an error leaves the network exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// The name is already used in the relevant namespace
    #[error("name {0:?} is already in use")]
    NameCollision(String),

    /// The node does not belong to this network, or has been deleted
    #[error("node {0} does not belong to this network")]
    ForeignNode(NodeId),

    /// The node is not of the kind required by the operation
    #[error("node {node} is not {expected}")]
    WrongKind {
        /// Node given to the operation
        node: NodeId,
        /// Kind of node that was expected
        expected: &'static str,
    },

    /// The change would make a node depend on itself
    #[error("connecting {fanin} to {node} would create a combinational cycle")]
    Cycle {
        /// Node being modified
        node: NodeId,
        /// Offending fanin
        fanin: NodeId,
    },

    /// The expression uses more variables than there are fanins
    #[error("expression uses {vars} variables but only {fanins} fanins are given")]
    ArityMismatch {
        /// Number of variables in the expression
        vars: usize,
        /// Number of fanins
        fanins: usize,
    },

    /// Deleting the node would leave dangling edges
    #[error("node {0} still has fanouts")]
    StillHasFanouts(NodeId),

    /// The output or latch has no driver to resolve
    #[error("node {0} has no driver")]
    Undriven(NodeId),

    /// No node with this name
    #[error("no node named {0:?}")]
    UnknownNode(String),
}

/// Result type of network mutations
pub type Result<T> = std::result::Result<T, NetError>;
