//! Elimination of logic nodes into their fanouts
//!
//! Each node gets a value, an estimate of the literal count saved by keeping it. Nodes
//! whose value is below a threshold are collapsed into their fanouts, shallowest first.

use log::debug;

use crate::lexp::Literal;
use crate::network::{BNetManip, BNetwork, NodeId};
use crate::optim::node_depths;

/// Number of times the node appears as a literal in its logic fanouts
fn occurrences(net: &BNetwork, node: NodeId) -> usize {
    net.node(node)
        .fanouts()
        .iter()
        .filter(|e| net.node(e.to()).is_logic())
        .map(|e| net.node(e.to()).func().litnum_var(e.pos()))
        .sum()
}

/// Returns true if the node is used by an output or a latch
fn has_fixed_fanout(net: &BNetwork, node: NodeId) -> bool {
    net.node(node)
        .fanouts()
        .iter()
        .any(|e| !net.node(e.to()).is_logic())
}

/// Literals saved by keeping the node
///
/// A node used by an output or a latch stays in the network, so that nothing is saved
/// by its removal.
fn node_value(net: &BNetwork, node: NodeId) -> i64 {
    let lit = net.node(node).litnum() as i64;
    let occ = occurrences(net, node) as i64;
    if has_fixed_fanout(net, node) {
        occ * (lit - 1)
    } else {
        (lit - 1) * (occ - 1) - 1
    }
}

/// Returns true if no fanout would exceed `limit` cubes after elimination
fn fits_sop_limit(net: &BNetwork, node: NodeId, limit: usize) -> bool {
    let func = net.node(node).func();
    let cubes_pos = func.sop_cubenum();
    let cubes_neg = func.complement().sop_cubenum();
    net.node(node).fanouts().iter().all(|e| {
        let fo = net.node(e.to());
        if !fo.is_logic() {
            return true;
        }
        let f = fo.func();
        let np = f.sop_litnum_lit(Literal::posi(e.pos()));
        let nn = f.sop_litnum_lit(Literal::nega(e.pos()));
        let new_cubes =
            (f.sop_cubenum() + np * cubes_pos + nn * cubes_neg).saturating_sub(np + nn);
        new_cubes <= limit
    })
}

/// Returns true if eliminating the node changes the network
fn has_effect(net: &BNetwork, node: NodeId) -> bool {
    let n = net.node(node);
    if n.func().is_posi_literal() {
        n.fanout_num() != 0
    } else {
        n.fanouts().iter().any(|e| net.node(e.to()).is_logic())
    }
}

/// Cube limit for one pass
fn cube_limit(net: &BNetwork, sop_limit: usize, auto_limit: bool) -> Option<usize> {
    let auto = if auto_limit {
        let max_cubes = net
            .logic_nodes()
            .map(|n| net.node(n).func().sop_cubenum())
            .max()
            .unwrap_or(0);
        Some(2 * max_cubes)
    } else {
        None
    };
    match (sop_limit, auto) {
        (0, a) => a,
        (l, None) => Some(l),
        (l, Some(a)) => Some(l.min(a)),
    }
}

/// Collapse the nodes whose value does not exceed `threshold` into their fanouts
///
/// A `sop_limit` of 0 means no limit on the cube count of the fanouts. With `auto_limit`,
/// the limit is at most twice the largest cube count in the network. Passes are repeated
/// until nothing is eliminated; unused nodes are removed after each pass.
pub fn eliminate(net: &mut BNetwork, threshold: i64, sop_limit: usize, auto_limit: bool) {
    let mut pass = 0;
    loop {
        let limit = cube_limit(net, sop_limit, auto_limit);
        let depth = node_depths(net);
        let mut candidates: Vec<(usize, usize, NodeId)> = net
            .logic_nodes()
            .map(|n| (depth[n.id()], occurrences(net, n), n))
            .collect();
        candidates.sort();

        let nb_before = (net.logic_num(), net.litnum());
        let mut nb_eliminated = 0;
        for (_, _, node) in candidates {
            if node_value(net, node) > threshold || !has_effect(net, node) {
                continue;
            }
            if let Some(l) = limit {
                if !fits_sop_limit(net, node, l) {
                    continue;
                }
            }
            BNetManip::new(net)
                .eliminate_node(node)
                .expect("Elimination of a logic node cannot fail");
            nb_eliminated += 1;
        }
        net.clean_up();
        pass += 1;
        debug!(
            "Eliminate pass {}: {} nodes eliminated, {} nodes, {} literals -> {} nodes, {} literals",
            pass,
            nb_eliminated,
            nb_before.0,
            nb_before.1,
            net.logic_num(),
            net.litnum()
        );
        if nb_eliminated == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::{eliminate, node_value};
    use crate::network::generators::{adder, random, testcases};
    use crate::network::{BNetManip, BNetwork};
    use crate::sim::equivalent;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn buffer_chain(len: usize) -> BNetwork {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let mut x = manip.new_input(Some("i")).unwrap();
        for _ in 0..len {
            x = manip.make_buffer(x, None).unwrap();
        }
        let o = manip.new_output(Some("o")).unwrap();
        manip.change_output(o, x).unwrap();
        net
    }

    #[test]
    fn test_buffer_chain() {
        init_logging();
        for auto_limit in [false, true] {
            let mut net = buffer_chain(5);
            eliminate(&mut net, 0, 0, auto_limit);
            net.check();
            assert_eq!(net.logic_num(), 0);
            let o = net.find_output("o").unwrap();
            assert_eq!(net.node(o).driver(), net.find_node("i"));
        }
    }

    #[test]
    fn test_inverter_chain() {
        let mut net = testcases::inverter_chain(5);
        let reference = net.clone();
        eliminate(&mut net, 0, 0, true);
        net.check();
        assert_eq!(net.logic_num(), 1);
        assert!(equivalent(&net, &reference));
    }

    #[test]
    fn test_value() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(None).unwrap();
        let b = manip.new_input(None).unwrap();
        let c = manip.new_input(None).unwrap();
        let x = manip.make_and(&[a, b], None).unwrap();
        let y = manip.make_or(&[x, c], None).unwrap();
        let z = manip.make_xor(&[x, c], None).unwrap();
        let w = manip.make_and(&[y, z], None).unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, w).unwrap();
        let oz = manip.new_output(None).unwrap();
        manip.change_output(oz, z).unwrap();
        // (2 - 1) * (2 - 1) - 1
        assert_eq!(node_value(&net, x), 0);
        // Used once
        assert_eq!(node_value(&net, y), -1);
        // Used by an output: 1 * (2 - 1)
        assert_eq!(node_value(&net, z), 1);
    }

    #[test]
    fn test_threshold() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(Some("a")).unwrap();
        let b = manip.new_input(Some("b")).unwrap();
        let c = manip.new_input(Some("c")).unwrap();
        let d = manip.new_input(Some("d")).unwrap();
        let x = manip.make_and(&[a, b, c], None).unwrap();
        let y = manip.make_or(&[x, d], None).unwrap();
        let z = manip.make_xor(&[x, d], None).unwrap();
        let w = manip.make_and(&[x, c, d], None).unwrap();
        for (n, name) in [(y, "y"), (z, "z"), (w, "w")] {
            let o = manip.new_output(Some(name)).unwrap();
            manip.change_output(o, n).unwrap();
        }
        let reference = net.clone();

        // Value of x is (3 - 1) * (3 - 1) - 1 = 3
        let mut kept = net.clone();
        eliminate(&mut kept, 2, 0, false);
        assert_eq!(kept.logic_num(), 4);

        eliminate(&mut net, 3, 0, false);
        net.check();
        assert_eq!(net.logic_num(), 3);
        assert!(equivalent(&net, &reference));
    }

    #[test]
    fn test_sop_limit() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let inputs: Vec<_> = (0..6).map(|_| manip.new_input(None).unwrap()).collect();
        let x = manip.make_or(&inputs[0..3], None).unwrap();
        let y = manip.make_or(&inputs[3..6], None).unwrap();
        let z = manip.make_and(&[x, y], None).unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, z).unwrap();

        // Eliminating x then y gives 9 cubes
        let mut limited = net.clone();
        eliminate(&mut limited, 0, 4, false);
        assert_eq!(limited.logic_num(), 2);

        eliminate(&mut net, 0, 0, false);
        assert_eq!(net.logic_num(), 1);
    }

    #[test]
    fn test_random_networks() {
        init_logging();
        let mut rng = SmallRng::seed_from_u64(4);
        for threshold in [-1, 0, 2, 10] {
            let reference = random::random_network(&mut rng, 6, 15, 3, 3);
            let mut net = reference.clone();
            eliminate(&mut net, threshold, 0, true);
            net.check();
            assert!(equivalent(&net, &reference));
        }
        let reference = adder::ripple_carry(3);
        let mut net = reference.clone();
        eliminate(&mut net, 5, 0, false);
        net.check();
        assert!(equivalent(&net, &reference));
    }
}
