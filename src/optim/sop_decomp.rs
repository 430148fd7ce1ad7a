//! Two-level decomposition
//!
//! Every logic node is rewritten as a sum of products over its fanins and new nodes.
//! Operands that do not fit in two levels get a node of their own, which is itself in
//! sum-of-products form.

use log::debug;

use crate::lexp::LogExpr;
use crate::network::{BNetManip, BNetwork, NodeId};

struct SopDecomposer<'a> {
    manip: BNetManip<'a>,
    nb_created: usize,
}

/// Fanins of a node being built, deduplicated
struct Inputs {
    nodes: Vec<NodeId>,
}

impl Inputs {
    fn literal(&mut self, node: NodeId, inv: bool) -> LogExpr {
        let var = match self.nodes.iter().position(|n| *n == node) {
            Some(v) => v,
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        LogExpr::literal(var, inv)
    }
}

impl<'a> SopDecomposer<'a> {
    /// New node implementing `expr` over `fanins`
    fn make_node(&mut self, expr: &LogExpr, fanins: &[NodeId]) -> NodeId {
        let mut inputs = Inputs { nodes: Vec::new() };
        let func = self.sop(expr, fanins, &mut inputs);
        self.nb_created += 1;
        self.manip
            .make_logic(func, &inputs.nodes, None)
            .expect("New nodes only use existing fanins")
    }

    /// Literal for an operand; anything but a literal gets a new node
    fn operand(&mut self, expr: &LogExpr, fanins: &[NodeId], inputs: &mut Inputs) -> LogExpr {
        match expr.as_literal() {
            Some(lit) => inputs.literal(fanins[lit.var()], lit.is_inverted()),
            None => {
                let n = self.make_node(expr, fanins);
                inputs.literal(n, false)
            }
        }
    }

    /// Product term for an And: its literal operands plus one literal per other operand
    fn product(&mut self, expr: &LogExpr, fanins: &[NodeId], inputs: &mut Inputs) -> LogExpr {
        let lits: Vec<LogExpr> = expr
            .children()
            .iter()
            .map(|c| self.operand(c, fanins, inputs))
            .collect();
        LogExpr::and(lits)
    }

    /// Operand for a slice of Xor operands, building a node for more than one
    fn xor_operand(
        &mut self,
        operands: &[LogExpr],
        fanins: &[NodeId],
        inputs: &mut Inputs,
    ) -> LogExpr {
        if operands.len() == 1 {
            self.operand(&operands[0], fanins, inputs)
        } else {
            let n = self.make_node(&LogExpr::xor(operands.to_vec()), fanins);
            inputs.literal(n, false)
        }
    }

    /// Sum-of-products form of `expr`, over the nodes collected in `inputs`
    fn sop(&mut self, expr: &LogExpr, fanins: &[NodeId], inputs: &mut Inputs) -> LogExpr {
        if expr.is_constant() {
            return expr.clone();
        }
        if expr.is_literal() {
            return self.operand(expr, fanins, inputs);
        }
        if expr.is_and() {
            return self.product(expr, fanins, inputs);
        }
        if expr.is_or() {
            let terms: Vec<LogExpr> = expr
                .children()
                .iter()
                .map(|c| {
                    if c.is_and() {
                        self.product(c, fanins, inputs)
                    } else {
                        self.operand(c, fanins, inputs)
                    }
                })
                .collect();
            return LogExpr::or(terms);
        }
        // Binary tree of two-input Xor: a & !b | !a & b
        let operands = expr.children();
        let mid = operands.len() / 2;
        let a = self.xor_operand(&operands[..mid], fanins, inputs);
        let b = self.xor_operand(&operands[mid..], fanins, inputs);
        (a.clone() & !b.clone()) | (!a & b)
    }

    fn decomp_node(&mut self, node: NodeId) -> bool {
        let n = self.manip.network().node(node);
        if n.func().is_sop() {
            return false;
        }
        let expr = n.func().clone();
        let fanins = n.fanins().to_vec();
        let mut inputs = Inputs { nodes: Vec::new() };
        let func = self.sop(&expr, &fanins, &mut inputs);
        self.manip
            .change_logic(node, func, &inputs.nodes, false)
            .expect("New nodes are not in the fanout of the node");
        true
    }
}

/// Rewrite every logic node in sum-of-products form
pub fn sop_decomp(net: &mut BNetwork) {
    let order = net.tsort(false);
    let mut dec = SopDecomposer {
        manip: BNetManip::new(net),
        nb_created: 0,
    };
    let mut nb_changed = 0;
    for node in order {
        if dec.decomp_node(node) {
            nb_changed += 1;
        }
    }
    debug!(
        "SOP decomposition: {} nodes rewritten, {} nodes created",
        nb_changed, dec.nb_created
    );
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::sop_decomp;
    use crate::lexp::LogExpr;
    use crate::network::generators::random;
    use crate::network::{BNetManip, BNetwork};
    use crate::sim::equivalent;

    fn check_sop(net: &BNetwork) {
        for n in net.logic_nodes() {
            assert!(net.node(n).func().is_sop(), "{}", net.node(n).func());
        }
    }

    #[test]
    fn test_xor() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(Some("a")).unwrap();
        let b = manip.new_input(Some("b")).unwrap();
        let c = manip.new_input(Some("c")).unwrap();
        let n = manip.make_xnor(&[a, b, c], None).unwrap();
        let o = manip.new_output(Some("o")).unwrap();
        manip.change_output(o, n).unwrap();
        let reference = net.clone();
        sop_decomp(&mut net);
        net.check();
        check_sop(&net);
        assert_eq!(net.logic_num(), 2);
        assert!(equivalent(&net, &reference));
    }

    #[test]
    fn test_factored() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(Some("a")).unwrap();
        let b = manip.new_input(Some("b")).unwrap();
        let c = manip.new_input(Some("c")).unwrap();
        let d = manip.new_input(Some("d")).unwrap();
        let v = LogExpr::posi_literal;
        // (a | b) & (c | !d) | a & d
        let f = ((v(0) | v(1)) & (v(2) | !v(3))) | (v(0) & v(3));
        let n = manip.make_logic(f, &[a, b, c, d], None).unwrap();
        let o = manip.new_output(Some("o")).unwrap();
        manip.change_output(o, n).unwrap();
        let reference = net.clone();
        sop_decomp(&mut net);
        net.check();
        check_sop(&net);
        assert_eq!(net.logic_num(), 3);
        assert!(equivalent(&net, &reference));

        // Already in sum-of-products form
        net.enable_trace();
        sop_decomp(&mut net);
        assert!(net.take_changes().is_empty());
    }

    #[test]
    fn test_random_networks() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..5 {
            let reference = random::random_network(&mut rng, 6, 12, 3, 5);
            let mut net = reference.clone();
            sop_decomp(&mut net);
            net.check();
            check_sop(&net);
            assert!(equivalent(&net, &reference));
        }
    }
}
