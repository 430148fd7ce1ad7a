//! Removal of trivial and unused nodes

use log::debug;

use crate::network::{BNetManip, BNetwork, NetError, NodeId, Result};

impl BNetwork {
    /// Delete logic nodes and latches without fanouts, and the nodes only they were using
    pub fn clean_up(&mut self) {
        let mut to_delete: Vec<NodeId> = self
            .logic_nodes()
            .chain(self.latches())
            .filter(|n| self.node(*n).fanout_num() == 0)
            .collect();
        let mut nb_deleted = 0;
        while let Some(n) = to_delete.pop() {
            if !self.contains(n) {
                continue;
            }
            for f in self.node(n).fanins() {
                let src = self.node(*f);
                if (src.is_logic() || src.is_latch()) && src.fanout_num() == 1 {
                    to_delete.push(*f);
                }
            }
            self.remove_node(n);
            nb_deleted += 1;
        }
        if nb_deleted != 0 {
            debug!("Clean up removed {} nodes", nb_deleted);
        }
    }

    /// Eliminate logic nodes with zero or one fanin and remove unused logic, until nothing changes
    pub fn sweep(&mut self) {
        loop {
            let before = (self.node_num(), self.litnum());
            let order = self.tsort(false);
            let mut manip = BNetManip::new(self);
            for n in order {
                if manip.network().node(n).fanin_num() <= 1 {
                    manip
                        .eliminate_node(n)
                        .expect("Elimination of a logic node cannot fail");
                }
            }
            self.clean_up();
            let after = (self.node_num(), self.litnum());
            debug!(
                "Sweep: {} nodes, {} literals -> {} nodes, {} literals",
                before.0, before.1, after.0, after.1
            );
            if after == before {
                break;
            }
        }
    }

    /// Delete the primary inputs without fanouts
    pub fn delete_unused_input(&mut self) {
        let unused: Vec<NodeId> = self
            .inputs()
            .filter(|n| self.node(*n).fanout_num() == 0)
            .collect();
        for n in unused {
            self.remove_node(n);
        }
    }

    /// Simplify the expression of a single logic node
    ///
    /// Returns true if the expression changed.
    pub fn lexp_simplify_node(&mut self, node: NodeId) -> Result<bool> {
        let mut manip = BNetManip::new(self);
        let Some(old) = manip.network().get(node).map(|n| n.func().clone()) else {
            return Err(NetError::ForeignNode(node));
        };
        let func = old.simplify();
        if func.litnum() == old.litnum() {
            return Ok(false);
        }
        manip.change_logic_expr(node, func)?;
        Ok(true)
    }

    /// Simplify every logic expression, eliminating the nodes that become trivial
    pub fn lexp_simplify(&mut self) {
        self.sweep();
        let order = self.tsort(false);
        for n in order {
            self.lexp_simplify_node(n)
                .expect("Node from the topological order is a logic node");
            if self.node(n).fanin_num() <= 1 {
                BNetManip::new(self)
                    .eliminate_node(n)
                    .expect("Elimination of a logic node cannot fail");
            }
        }
        self.sweep();
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::lexp::LogExpr;
    use crate::network::generators::{random, testcases};
    use crate::network::{BNetManip, BNetwork};
    use crate::sim::equivalent;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_clean_up() {
        init_logging();
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(None).unwrap();
        let b = manip.new_input(None).unwrap();
        let n0 = manip.make_and(&[a, b], None).unwrap();
        let n1 = manip.make_inverter(n0, None).unwrap();
        let _dangling = manip.make_or(&[n1, a], None).unwrap();
        let used = manip.make_xor(&[a, b], None).unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, used).unwrap();
        net.clean_up();
        assert_eq!(net.logic_num(), 1);
        assert!(net.contains(used));
        net.check();
        net.enable_trace();
        net.clean_up();
        assert!(net.take_changes().is_empty());
    }

    #[test]
    fn test_sweep() {
        init_logging();
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(Some("a")).unwrap();
        let b = manip.new_input(Some("b")).unwrap();
        let inv = manip.make_inverter(a, None).unwrap();
        let buf = manip.make_buffer(inv, None).unwrap();
        let one = manip.make_const(true, None).unwrap();
        let n = manip
            .make_logic(
                (LogExpr::posi_literal(0) & LogExpr::posi_literal(1)) | LogExpr::nega_literal(2),
                &[buf, b, one],
                Some("n"),
            )
            .unwrap();
        let o = manip.new_output(Some("o")).unwrap();
        manip.change_output(o, n).unwrap();
        let reference = net.clone();

        net.sweep();
        net.check();
        assert_eq!(net.logic_num(), 1);
        assert_eq!(net.node(n).fanin_num(), 2);
        assert!(net.node(n).fanins().contains(&a));
        assert!(net.node(n).fanins().contains(&b));
        assert_eq!(net.node(n).litnum(), 2);
        assert!(net.node(n).func().is_simple_and());
        assert!(equivalent(&net, &reference));

        // Sweep is idempotent
        net.enable_trace();
        net.sweep();
        let changes = net.take_changes();
        assert!(changes.is_empty(), "{:?}", changes);
        assert_eq!(net.logic_num(), 1);
    }

    #[test]
    fn test_sweep_idempotent() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut nets: Vec<BNetwork> = (0..20)
            .map(|_| random::random_network(&mut rng, 5, 20, 3, 3))
            .collect();
        nets.push(testcases::toggle_chain(4));
        nets.push(testcases::inverter_chain(7));
        for mut net in nets {
            let reference = net.clone();
            net.sweep();
            net.enable_trace();
            net.sweep();
            assert!(net.take_changes().is_empty());
            assert!(equivalent(&net, &reference));
        }
    }

    #[test]
    fn test_output_buffer_chain() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(None).unwrap();
        let mut prev = a;
        for _ in 0..4 {
            prev = manip.make_buffer(prev, None).unwrap();
        }
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, prev).unwrap();
        net.sweep();
        assert_eq!(net.logic_num(), 0);
        assert_eq!(net.node(o).driver(), Some(a));
        net.check();
    }

    #[test]
    fn test_delete_unused_input() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(None).unwrap();
        let _b = manip.new_input(None).unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, a).unwrap();
        net.delete_unused_input();
        assert_eq!(net.inputs().collect::<Vec<_>>(), vec![a]);
        net.check();
    }

    #[test]
    fn test_lexp_simplify() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(None).unwrap();
        let b = manip.new_input(None).unwrap();
        let n = manip.make_and(&[a, b], None).unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, n).unwrap();
        assert!(!net.lexp_simplify_node(n).unwrap());
        net.lexp_simplify();
        assert_eq!(net.logic_num(), 1);
        net.check();
    }
}
