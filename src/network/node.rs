use std::fmt;

use crate::lexp::LogExpr;
use crate::network::BNetwork;

/// Identifier of a node
///
/// The identifier records the network the node belongs to, so that nodes of another
/// network are rejected by mutations. The slot id is reused after the node is deleted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    net: u32,
    id: u32,
}

impl NodeId {
    pub(crate) fn new(net: u32, id: usize) -> NodeId {
        NodeId { net, id: id as u32 }
    }

    /// Index of the node in its network, suitable for per-node tables
    pub fn id(&self) -> usize {
        self.id as usize
    }

    /// Identity of the owning network
    pub fn net(&self) -> u32 {
        self.net
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.id)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}@{}", self.id, self.net)
    }
}

/// Role of a node in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Primary input
    Input,
    /// Primary output, driven by its single fanin
    Output,
    /// Combinational logic node, defined by an expression of its fanins
    Logic,
    /// Flip-flop, with a single fanin for its next state
    Latch,
}

impl NodeKind {
    /// Description used in diagnostics
    pub fn describe(self) -> &'static str {
        match self {
            NodeKind::Input => "an input",
            NodeKind::Output => "an output",
            NodeKind::Logic => "a logic node",
            NodeKind::Latch => "a latch",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Initial value of a latch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResetValue {
    /// Reset to zero
    Zero,
    /// Reset to one
    One,
    /// No reset, or unknown initial value
    #[default]
    Unknown,
}

impl ResetValue {
    /// Parse from the usual single-character notation: 0, 1, or anything else for unknown
    pub fn from_char(c: char) -> ResetValue {
        match c {
            '0' => ResetValue::Zero,
            '1' => ResetValue::One,
            _ => ResetValue::Unknown,
        }
    }

    /// Single-character notation
    pub fn to_char(self) -> char {
        match self {
            ResetValue::Zero => '0',
            ResetValue::One => '1',
            ResetValue::Unknown => 'X',
        }
    }
}

impl From<bool> for ResetValue {
    fn from(b: bool) -> ResetValue {
        if b {
            ResetValue::One
        } else {
            ResetValue::Zero
        }
    }
}

/// Connection from a node to one of the fanin positions of another node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) pos: usize,
}

impl Edge {
    /// Source node
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Sink node
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Fanin position in the sink node
    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// A node of a [`BNetwork`]
///
/// Nodes are only modified through [`BNetManip`](crate::network::BNetManip).
#[derive(Debug, Clone)]
pub struct BNode {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) name: String,
    pub(crate) fanins: Vec<NodeId>,
    pub(crate) fanouts: Vec<Edge>,
    pub(crate) func: LogExpr,
    pub(crate) reset: ResetValue,
}

impl BNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> BNode {
        BNode {
            id,
            kind,
            name: String::new(),
            fanins: Vec::new(),
            fanouts: Vec::new(),
            func: LogExpr::Zero,
            reset: ResetValue::Unknown,
        }
    }

    /// Identifier of the node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Role of the node
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns true for a primary input
    pub fn is_input(&self) -> bool {
        self.kind == NodeKind::Input
    }

    /// Returns true for a primary output
    pub fn is_output(&self) -> bool {
        self.kind == NodeKind::Output
    }

    /// Returns true for a logic node
    pub fn is_logic(&self) -> bool {
        self.kind == NodeKind::Logic
    }

    /// Returns true for a latch
    pub fn is_latch(&self) -> bool {
        self.kind == NodeKind::Latch
    }

    /// Name of the node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fanins of the node, in variable order for logic nodes
    pub fn fanins(&self) -> &[NodeId] {
        &self.fanins
    }

    /// Fanin at position `pos`
    pub fn fanin(&self, pos: usize) -> NodeId {
        self.fanins[pos]
    }

    /// Number of fanins
    pub fn fanin_num(&self) -> usize {
        self.fanins.len()
    }

    /// Driver of an output or latch, if connected
    pub fn driver(&self) -> Option<NodeId> {
        self.fanins.first().copied()
    }

    /// Fanout edges, in no particular order
    pub fn fanouts(&self) -> &[Edge] {
        &self.fanouts
    }

    /// Number of fanout edges
    pub fn fanout_num(&self) -> usize {
        self.fanouts.len()
    }

    /// Returns true if one of the fanouts is a primary output
    pub fn pomark(&self, net: &BNetwork) -> bool {
        self.fanouts.iter().any(|e| net.node(e.to).is_output())
    }

    /// Function of a logic node; variable `i` is the fanin at position `i`
    pub fn func(&self) -> &LogExpr {
        &self.func
    }

    /// Number of literals of the function
    pub fn litnum(&self) -> usize {
        self.func.litnum()
    }

    /// Reset value of a latch
    pub fn reset_value(&self) -> ResetValue {
        self.reset
    }
}
