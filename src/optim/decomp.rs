//! Decomposition of logic nodes into trees of simple And, Or and Xor gates
//!
//! After decomposition, every logic node is a single And, Or or Xor of literals with
//! at most `max_fanin` operands. Literal polarities are kept on the operands.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fxhash::FxHashMap;
use log::debug;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::lexp::LogExpr;
use crate::network::{BNetManip, BNetwork, NodeId};

/// Operand of a gate being built: a node and the polarity it is used with
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Operand {
    node: NodeId,
    inv: bool,
}

/// Whether a node function must be decomposed for the given fanin bound
fn needs_decomp(expr: &LogExpr, max_fanin: usize, no_xor: bool) -> bool {
    !expr.is_simple() || expr.litnum() > max_fanin || (no_xor && expr.is_xor())
}

struct Decomposer<'a> {
    manip: BNetManip<'a>,
    /// Number of logic levels from the inputs and latches
    depth: FxHashMap<NodeId, usize>,
    no_xor: bool,
}

impl<'a> Decomposer<'a> {
    fn new(net: &'a mut BNetwork, no_xor: bool) -> Decomposer<'a> {
        let mut depth = FxHashMap::default();
        for n in net.inputs().chain(net.latches()) {
            depth.insert(n, 0);
        }
        Decomposer {
            manip: BNetManip::new(net),
            depth,
            no_xor,
        }
    }

    /// Compute and record the depth of a node whose fanins all have a depth
    fn calc_depth(&mut self, node: NodeId) -> usize {
        let d = 1 + self
            .manip
            .network()
            .node(node)
            .fanins()
            .iter()
            .map(|f| self.depth[f])
            .max()
            .unwrap_or(0);
        self.depth.insert(node, d);
        d
    }

    fn operand_bound(&self, expr: &LogExpr, max_fanin: usize) -> usize {
        if self.no_xor && expr.is_xor() {
            2
        } else if max_fanin < 2 {
            expr.child_num()
        } else {
            max_fanin
        }
    }

    /// Build one gate with the operator of `op` over the operands, in `root` or a new node
    fn gate(&mut self, op: &LogExpr, operands: &[Operand], root: Option<NodeId>) -> NodeId {
        let lits: Vec<LogExpr> = operands
            .iter()
            .enumerate()
            .map(|(i, o)| LogExpr::literal(i, o.inv))
            .collect();
        let mut fanins: Vec<NodeId> = operands.iter().map(|o| o.node).collect();
        let func = if op.is_and() {
            LogExpr::and(lits)
        } else if op.is_or() {
            LogExpr::or(lits)
        } else if op.is_xor() {
            if self.no_xor {
                assert_eq!(lits.len(), 2);
                let a = lits[0].clone();
                let b = lits[1].clone();
                let and1 = self
                    .manip
                    .make_logic(a.clone() & !b.clone(), &fanins, None)
                    .expect("Operands are distinct nodes");
                let and2 = self
                    .manip
                    .make_logic(!a & b, &fanins, None)
                    .expect("Operands are distinct nodes");
                self.calc_depth(and1);
                self.calc_depth(and2);
                fanins = vec![and1, and2];
                LogExpr::posi_literal(0) | LogExpr::posi_literal(1)
            } else {
                LogExpr::xor(lits)
            }
        } else {
            panic!("Only And, Or and Xor expressions can be decomposed");
        };
        let node = match root {
            Some(n) => n,
            None => self.manip.new_logic(None).expect("Automatic names are free"),
        };
        self.manip
            .change_logic(node, func, &fanins, false)
            .expect("A decomposed gate cannot create a cycle");
        self.calc_depth(node);
        node
    }

    /// Operand for a child expression, building a subtree for non-literals
    fn child_operand<F>(&mut self, child: &LogExpr, fanins: &[NodeId], mut build: F) -> Operand
    where
        F: FnMut(&mut Self, &LogExpr, NodeId),
    {
        assert!(!child.is_constant());
        match child.as_literal() {
            Some(lit) => Operand {
                node: fanins[lit.var()],
                inv: lit.is_inverted(),
            },
            None => {
                let n = self.manip.new_logic(None).expect("Automatic names are free");
                build(self, child, n);
                Operand {
                    node: n,
                    inv: false,
                }
            }
        }
    }

    /// Minimum-depth tree: repeatedly combine the shallowest operands
    fn balanced(&mut self, fanins: &[NodeId], max_fanin: usize, expr: &LogExpr, root: NodeId) {
        assert!(expr.is_op());
        let mut work = BinaryHeap::new();
        for (seq, child) in expr.children().iter().enumerate() {
            let op = self.child_operand(child, fanins, |d, e, n| {
                d.balanced(fanins, max_fanin, e, n)
            });
            work.push(Reverse((self.depth[&op.node], seq, op)));
        }
        let bound = self.operand_bound(expr, max_fanin);
        let mut seq = work.len();
        loop {
            let mut operands = Vec::with_capacity(bound);
            while operands.len() < bound {
                match work.pop() {
                    Some(Reverse((_, _, op))) => operands.push(op),
                    None => break,
                }
            }
            if work.is_empty() {
                self.gate(expr, &operands, Some(root));
                return;
            }
            let node = self.gate(expr, &operands, None);
            work.push(Reverse((
                self.depth[&node],
                seq,
                Operand { node, inv: false },
            )));
            seq += 1;
        }
    }

    /// Random tree: shuffle the operands, then split them evenly
    fn random<R: Rng>(
        &mut self,
        rng: &mut R,
        fanins: &[NodeId],
        max_fanin: usize,
        expr: &LogExpr,
        root: NodeId,
    ) {
        assert!(expr.is_op());
        let mut operands: Vec<Operand> = expr
            .children()
            .iter()
            .map(|child| {
                self.child_operand(child, fanins, |d, e, n| {
                    d.random(rng, fanins, max_fanin, e, n)
                })
            })
            .collect();
        let bound = self.operand_bound(expr, max_fanin);
        operands.shuffle(rng);
        self.build_tree(&operands, bound, expr, Some(root));
    }

    /// Tree of arity `max_fanin`; the first groups get one more operand when it does not divide
    fn build_tree(
        &mut self,
        operands: &[Operand],
        max_fanin: usize,
        expr: &LogExpr,
        root: Option<NodeId>,
    ) -> NodeId {
        let ni = operands.len();
        assert!(ni > 1 && max_fanin > 1);
        let size = ni / max_fanin;
        let nodd = ni % max_fanin;
        let mut inputs = Vec::with_capacity(max_fanin);
        let mut b = 0;
        for i in 0..ni.min(max_fanin) {
            let sz = if i < nodd { size + 1 } else { size };
            let group = &operands[b..b + sz];
            b += sz;
            if sz == 1 {
                inputs.push(group[0]);
            } else {
                let node = self.build_tree(group, max_fanin, expr, None);
                inputs.push(Operand { node, inv: false });
            }
        }
        self.gate(expr, &inputs, root)
    }
}

fn run<R: Rng>(net: &mut BNetwork, max_fanin: usize, no_xor: bool, mut rng: Option<&mut R>) {
    net.sweep();
    let order = net.tsort(false);
    let nb_before = net.logic_num();
    let mut dec = Decomposer::new(net, no_xor);
    let mut nb_decomposed = 0;
    for node in order {
        let n = dec.manip.network().node(node);
        let expr = n.func().clone();
        let fanins = n.fanins().to_vec();
        let bound = if max_fanin < 2 {
            fanins.len()
        } else {
            max_fanin
        };
        if !needs_decomp(&expr, bound, no_xor) {
            dec.calc_depth(node);
            continue;
        }
        match rng.as_deref_mut() {
            Some(r) => dec.random(r, &fanins, bound, &expr, node),
            None => dec.balanced(&fanins, bound, &expr, node),
        }
        nb_decomposed += 1;
    }
    debug!(
        "Decomposition: {} nodes decomposed, {} -> {} logic nodes",
        nb_decomposed,
        nb_before,
        dec.manip.network().logic_num()
    );
}

/// Decompose every logic node into a minimum-depth tree of simple gates
///
/// Each gate gets at most `max_fanin` operands; values below 2 mean no bound. With
/// `no_xor`, Xor gates are rewritten as an Or of two And gates. The network is swept first.
pub fn decomp_balanced(net: &mut BNetwork, max_fanin: usize, no_xor: bool) {
    run::<SmallRng>(net, max_fanin, no_xor, None);
}

/// Decompose every logic node into a randomly shaped tree of simple gates
///
/// Same as [`decomp_balanced`], but the operands are shuffled with `rng` and split into
/// groups of even size instead of being combined by depth.
pub fn decomp_random<R: Rng>(net: &mut BNetwork, max_fanin: usize, rng: &mut R, no_xor: bool) {
    run(net, max_fanin, no_xor, Some(rng));
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::{decomp_balanced, decomp_random};
    use crate::lexp::LogExpr;
    use crate::network::generators::{adder, random};
    use crate::network::{BNetManip, BNetwork};
    use crate::sim::equivalent;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn check_simple(net: &BNetwork, max_fanin: usize, no_xor: bool) {
        for n in net.logic_nodes() {
            let f = net.node(n).func();
            assert!(f.is_simple(), "{} is not simple: {}", n, f);
            assert!(net.node(n).fanin_num() <= max_fanin);
            if no_xor {
                assert!(!f.is_xor());
            }
        }
    }

    #[test]
    fn test_and3() {
        init_logging();
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(Some("a")).unwrap();
        let b = manip.new_input(Some("b")).unwrap();
        let c = manip.new_input(Some("c")).unwrap();
        let n = manip.make_and(&[a, b, c], None).unwrap();
        let o = manip.new_output(Some("o")).unwrap();
        manip.change_output(o, n).unwrap();
        let reference = net.clone();

        decomp_balanced(&mut net, 2, false);
        net.check();
        assert_eq!(net.logic_num(), 2);
        check_simple(&net, 2, false);
        assert!(net.logic_nodes().all(|n| net.node(n).func().is_simple_and()));
        assert!(equivalent(&net, &reference));
    }

    #[test]
    fn test_balanced_depth() {
        // An And of 8 inputs becomes a tree of depth 3
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let inputs: Vec<_> = (0..8).map(|_| manip.new_input(None).unwrap()).collect();
        let n = manip.make_and(&inputs, None).unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, n).unwrap();
        decomp_balanced(&mut net, 2, false);
        assert_eq!(net.logic_num(), 7);
        let order = net.tsort(false);
        let mut depth = vec![0; net.max_node_id()];
        for n in order {
            depth[n.id()] = 1 + net
                .node(n)
                .fanins()
                .iter()
                .map(|f| depth[f.id()])
                .max()
                .unwrap();
        }
        assert_eq!(depth.iter().max(), Some(&3));
    }

    #[test]
    fn test_no_xor() {
        init_logging();
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(Some("a")).unwrap();
        let b = manip.new_input(Some("b")).unwrap();
        let c = manip.new_input(Some("c")).unwrap();
        let n = manip
            .make_logic(
                LogExpr::nega_literal(0) ^ LogExpr::posi_literal(1) ^ LogExpr::posi_literal(2),
                &[a, b, c],
                None,
            )
            .unwrap();
        let o = manip.new_output(Some("o")).unwrap();
        manip.change_output(o, n).unwrap();
        let reference = net.clone();

        decomp_balanced(&mut net, 0, true);
        net.check();
        check_simple(&net, 2, true);
        assert!(equivalent(&net, &reference));
    }

    #[test]
    fn test_unbounded() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(None).unwrap();
        let b = manip.new_input(None).unwrap();
        let c = manip.new_input(None).unwrap();
        let d = manip.new_input(None).unwrap();
        let n = manip
            .make_logic(
                (LogExpr::posi_literal(0) & LogExpr::posi_literal(1))
                    | (LogExpr::posi_literal(2) & LogExpr::nega_literal(3)),
                &[a, b, c, d],
                None,
            )
            .unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, n).unwrap();
        decomp_balanced(&mut net, 1, false);
        assert_eq!(net.logic_num(), 3);
        assert!(net.node(n).func().is_simple_or());
    }

    #[test]
    fn test_adder() {
        init_logging();
        let mut net = adder::ripple_carry(4);
        let reference = net.clone();
        decomp_balanced(&mut net, 2, false);
        net.check();
        check_simple(&net, 2, false);
        assert!(equivalent(&net, &reference));
    }

    #[test]
    fn test_random_networks() {
        init_logging();
        let mut rng = SmallRng::seed_from_u64(1);
        for max_fanin in [2, 3] {
            for no_xor in [false, true] {
                let reference = random::random_network(&mut rng, 6, 15, 4, 5);
                let mut net = reference.clone();
                decomp_balanced(&mut net, max_fanin, no_xor);
                net.check();
                check_simple(&net, max_fanin, no_xor);
                assert!(equivalent(&net, &reference));

                let mut net = reference.clone();
                decomp_random(&mut net, max_fanin, &mut rng, no_xor);
                net.check();
                check_simple(&net, max_fanin, no_xor);
                assert!(equivalent(&net, &reference));
            }
        }
    }
}
