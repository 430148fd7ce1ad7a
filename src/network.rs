//! Representation and handling of Boolean networks
//!
//! A [`BNetwork`] holds primary inputs, primary outputs, latches and logic nodes.
//! Each logic node carries a factored-form [`LogExpr`](crate::lexp::LogExpr) over its
//! fanins. All modifications go through [`BNetManip`], which keeps fanin and fanout
//! lists consistent and rejects changes that would create a combinational cycle.

pub mod arena;
mod error;
pub mod generators;
mod list;
mod manip;
mod name_map;
#[allow(clippy::module_inception)]
mod network;
mod node;
pub mod stats;
mod sweep;

pub use arena::{IdPool, NameGen};
pub use error::{NetError, Result};
pub use manip::BNetManip;
pub use name_map::NameMap;
pub use network::{BNetwork, NetChange};
pub use node::{BNode, Edge, NodeId, NodeKind, ResetValue};
