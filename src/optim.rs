//! Optimization of logic networks
//!
//! Decomposition passes rewrite the node functions into simpler gates:
//!   * [`decomp_balanced`] and [`decomp_random`] build trees of And, Or and Xor gates with
//!     a bounded number of operands;
//!   * [`gate_decomp_balanced`] and [`gate_decomp_random`] restrict them to a set of gate types;
//!   * [`sop_decomp`] puts every node in sum-of-products form.
//!
//! [`eliminate`] goes the other way, collapsing nodes into their fanouts.
//! [`BNetwork::sweep`] and [`BNetwork::clean_up`] remove trivial and unused nodes.

mod decomp;
mod eliminate;
mod gate_decomp;
mod sop_decomp;

pub use decomp::{decomp_balanced, decomp_random};
pub use eliminate::eliminate;
pub use gate_decomp::{gate_decomp_balanced, gate_decomp_random, GateMask};
pub use sop_decomp::sop_decomp;

use crate::network::BNetwork;

/// Number of logic levels between each node and the inputs and latches, indexed by node id
pub fn node_depths(net: &BNetwork) -> Vec<usize> {
    let mut depth = vec![0; net.max_node_id()];
    for n in net.tsort(false) {
        depth[n.id()] = 1 + net
            .node(n)
            .fanins()
            .iter()
            .map(|f| depth[f.id()])
            .max()
            .unwrap_or(0);
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::node_depths;
    use crate::network::{BNetManip, BNetwork};

    #[test]
    fn test_depths() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(None).unwrap();
        let b = manip.new_input(None).unwrap();
        let l = manip.new_latch(None).unwrap();
        let x = manip.make_and(&[a, b], None).unwrap();
        let y = manip.make_or(&[x, l], None).unwrap();
        let z = manip.make_xor(&[y, a], None).unwrap();
        let k = manip.make_const(true, None).unwrap();
        let depth = node_depths(&net);
        assert_eq!(depth[l.id()], 0);
        assert_eq!(depth[x.id()], 1);
        assert_eq!(depth[y.id()], 2);
        assert_eq!(depth[z.id()], 3);
        assert_eq!(depth[k.id()], 1);
    }
}
