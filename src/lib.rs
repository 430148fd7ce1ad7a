//! Boolean networks and multi-level logic optimization
//!
//! This crate provides a Boolean network representation for logic synthesis, together with
//! the classical restructuring passes used before technology mapping.
//!
//! # Usage
//!
//! Bnet reads and writes [BLIF](https://course.ece.cmu.edu/~ee760/760docs/blif.pdf) and
//! ISCAS .bench files, and runs optimization scripts on them:
//!
//! ```bash
//! # Show available commands
//! bnet help
//! # Show statistics on a design
//! bnet show mydesign.blif
//! # Optimize the logic, then decompose it into two-input gates
//! bnet opt mydesign.blif -o optimized.bench --script "sweep; eliminate 0; decomp --max-fanin 2"
//! # Check equivalence between the two
//! bnet equiv mydesign.blif optimized.bench
//! ```
//!
//! # Development
//!
//! ## Datastructures
//!
//! [`BNetwork`] is a multi-level Boolean network: primary inputs, primary outputs, latches
//! and logic nodes. Each logic node has an ordered list of fanins and a function, a
//! factored-form [`LogExpr`] whose variable `i` is the `i`-th fanin.
//! Contrary to an And-Inverter-Graph, a node may implement any function, and inversions are
//! part of the expressions.
//!
//! The network is a directed acyclic graph once latches are cut. Every modification goes
//! through [`BNetManip`], which maintains fanouts, merges duplicate fanins and can reject
//! a change that would create a combinational cycle.
//!
//! For example, here is a full adder circuit, decomposed into two-input gates:
//! ```
//! # use bnet::network::{BNetManip, BNetwork};
//! # use bnet::optim::decomp_balanced;
//! let mut net = BNetwork::new();
//! let mut manip = BNetManip::new(&mut net);
//! let a = manip.new_input(Some("a")).unwrap();
//! let b = manip.new_input(Some("b")).unwrap();
//! let c = manip.new_input(Some("c")).unwrap();
//! let s = manip.make_xor(&[a, b, c], Some("s")).unwrap();
//! let ab = manip.make_and(&[a, b], None).unwrap();
//! let ac = manip.make_and(&[a, c], None).unwrap();
//! let bc = manip.make_and(&[b, c], None).unwrap();
//! let co = manip.make_or(&[ab, ac, bc], Some("co")).unwrap();
//! for (n, name) in [(s, "s"), (co, "co")] {
//!     let o = manip.new_output(Some(name)).unwrap();
//!     manip.change_output(o, n).unwrap();
//! }
//! decomp_balanced(&mut net, 2, false);
//! assert_eq!(net.logic_num(), 7);
//! ```
//!
//! ## Algorithms
//!
//! The [`optim`] module contains the decomposition passes (balanced or random trees,
//! restricted gate types, sum-of-products form) and node elimination. Simulation and
//! equivalence checking by exhaustive truth tables are in [`sim`].

#![warn(missing_docs)]

pub mod io;
pub mod lexp;
pub mod network;
pub mod optim;
pub mod sim;

pub use lexp::{LogExpr, Literal};
pub use network::{stats, BNetManip, BNetwork, NetError, NodeId};
