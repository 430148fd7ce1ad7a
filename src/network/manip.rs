use log::trace;

use crate::lexp::LogExpr;
use crate::network::{BNetwork, NetError, NodeId, NodeKind, ResetValue, Result};

/// Mutation interface of a [`BNetwork`]
///
/// Every structural change goes through this type. Mutations check their arguments
/// before touching the network: a call returning an error leaves it unchanged.
///
/// Changing the function of a logic node normalizes its fanins:
///   * a node given several times as fanin is merged into a single variable;
///   * fanins whose variable does not appear in the expression are dropped.
///
/// ```
/// # use bnet::network::{BNetwork, BNetManip};
/// let mut net = BNetwork::new();
/// let mut manip = BNetManip::new(&mut net);
/// let a = manip.new_input(Some("a")).unwrap();
/// let b = manip.new_input(Some("b")).unwrap();
/// let n = manip.make_and(&[a, b], Some("n")).unwrap();
/// let o = manip.new_output(Some("o")).unwrap();
/// manip.change_output(o, n).unwrap();
/// assert_eq!(net.logic_num(), 1);
/// ```
pub struct BNetManip<'a> {
    net: &'a mut BNetwork,
    /// Generation stamp of the last transitive fanout marking, per node
    marks: Vec<u32>,
    generation: u32,
}

impl<'a> BNetManip<'a> {
    /// Start modifying a network
    pub fn new(net: &'a mut BNetwork) -> BNetManip<'a> {
        BNetManip {
            net,
            marks: Vec::new(),
            generation: 0,
        }
    }

    /// Read access to the network being modified
    pub fn network(&self) -> &BNetwork {
        self.net
    }

    fn check_owned(&self, id: NodeId) -> Result<()> {
        if self.net.contains(id) {
            Ok(())
        } else {
            Err(NetError::ForeignNode(id))
        }
    }

    fn check_kind(&self, id: NodeId, kind: NodeKind) -> Result<()> {
        self.check_owned(id)?;
        if self.net.node(id).kind() != kind {
            return Err(NetError::WrongKind {
                node: id,
                expected: kind.describe(),
            });
        }
        Ok(())
    }

    /// Check a node used as a fanin. Outputs are resolved to their driver
    fn resolve_source(&self, id: NodeId) -> Result<NodeId> {
        self.check_owned(id)?;
        let n = self.net.node(id);
        if n.is_output() {
            n.driver().ok_or(NetError::Undriven(id))
        } else {
            Ok(id)
        }
    }

    /// Create a primary input; a missing or empty name is generated automatically
    pub fn new_input(&mut self, name: Option<&str>) -> Result<NodeId> {
        self.net.add_node(NodeKind::Input, name)
    }

    /// Create an unconnected primary output
    pub fn new_output(&mut self, name: Option<&str>) -> Result<NodeId> {
        self.net.add_node(NodeKind::Output, name)
    }

    /// Create a logic node, initially the constant zero
    pub fn new_logic(&mut self, name: Option<&str>) -> Result<NodeId> {
        self.net.add_node(NodeKind::Logic, name)
    }

    /// Create an unconnected latch with an unknown reset value
    pub fn new_latch(&mut self, name: Option<&str>) -> Result<NodeId> {
        self.net.add_node(NodeKind::Latch, name)
    }

    /// Delete a node. It must not have any fanout
    pub fn delete_node(&mut self, node: NodeId) -> Result<()> {
        self.check_owned(node)?;
        if self.net.node(node).fanout_num() != 0 {
            return Err(NetError::StillHasFanouts(node));
        }
        self.net.remove_node(node);
        Ok(())
    }

    /// Rename a node. An empty name is replaced by a generated one
    pub fn rename_node(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.check_owned(node)?;
        self.net.set_name(node, Some(name))
    }

    /// Connect an output to its driver
    ///
    /// If the driver is itself an output, the output is connected to its driver.
    pub fn change_output(&mut self, onode: NodeId, src: NodeId) -> Result<()> {
        self.check_kind(onode, NodeKind::Output)?;
        let src = self.resolve_source(src)?;
        self.net.set_fanins(onode, vec![src]);
        Ok(())
    }

    /// Change the function and fanins of a logic node
    ///
    /// Variable `i` of `expr` refers to `fanins[i]`. Duplicate fanins are merged and
    /// unused fanins are dropped. With `tfo_check`, the change is rejected if a fanin
    /// is in the transitive fanout of the node, since it would create a cycle.
    pub fn change_logic(
        &mut self,
        node: NodeId,
        expr: LogExpr,
        fanins: &[NodeId],
        tfo_check: bool,
    ) -> Result<()> {
        self.check_kind(node, NodeKind::Logic)?;
        for f in fanins {
            self.check_owned(*f)?;
            if self.net.node(*f).is_output() {
                return Err(NetError::WrongKind {
                    node: *f,
                    expected: "a node with fanouts",
                });
            }
        }
        let vars = expr.input_size();
        if vars > fanins.len() {
            return Err(NetError::ArityMismatch {
                vars,
                fanins: fanins.len(),
            });
        }

        // Merge duplicate fanins
        let mut uniq: Vec<NodeId> = Vec::with_capacity(fanins.len());
        let mut remap = Vec::with_capacity(fanins.len());
        for f in fanins {
            match uniq.iter().position(|u| u == f) {
                Some(i) => remap.push(i),
                None => {
                    remap.push(uniq.len());
                    uniq.push(*f);
                }
            }
        }
        let mut expr = if uniq.len() != fanins.len() {
            expr.remap_var(|v| remap[v])
        } else {
            expr
        };

        // Drop unused fanins
        let used: Vec<bool> = (0..uniq.len()).map(|v| expr.litnum_var(v) > 0).collect();
        if used.contains(&false) {
            let mut new_index = vec![0; uniq.len()];
            let mut next = 0;
            for (v, u) in used.iter().enumerate() {
                new_index[v] = next;
                if *u {
                    next += 1;
                }
            }
            expr = expr.remap_var(|v| new_index[v]);
            uniq = uniq
                .into_iter()
                .zip(used.iter())
                .filter(|(_, u)| **u)
                .map(|(f, _)| f)
                .collect();
        }

        if tfo_check {
            self.mark_tfo(node);
            if let Some(f) = uniq.iter().find(|f| self.is_marked(**f)) {
                trace!("Rejected fanin {} for {}: it is in its transitive fanout", f, node);
                return Err(NetError::Cycle { node, fanin: *f });
            }
        }

        self.net.set_func(node, expr);
        self.net.set_fanins(node, uniq);
        Ok(())
    }

    /// Change the function of a logic node, keeping its fanins
    pub fn change_logic_expr(&mut self, node: NodeId, expr: LogExpr) -> Result<()> {
        self.check_kind(node, NodeKind::Logic)?;
        let fanins = self.net.node(node).fanins().to_vec();
        self.change_logic(node, expr, &fanins, false)
    }

    /// Connect a latch to its next-state node and set its reset value
    ///
    /// A logic node given here is turned into a latch.
    pub fn change_latch(&mut self, node: NodeId, fanin: NodeId, reset: ResetValue) -> Result<()> {
        self.check_owned(node)?;
        let kind = self.net.node(node).kind();
        if kind != NodeKind::Latch && kind != NodeKind::Logic {
            return Err(NetError::WrongKind {
                node,
                expected: "a latch or a logic node",
            });
        }
        let fanin = self.resolve_source(fanin)?;
        if kind == NodeKind::Logic {
            self.net.set_func(node, LogExpr::Zero);
            self.net.set_kind(node, NodeKind::Latch);
        }
        self.net.set_fanins(node, vec![fanin]);
        self.net.set_reset(node, reset);
        Ok(())
    }

    /// Change the reset value of a latch
    pub fn set_reset_value(&mut self, node: NodeId, reset: ResetValue) -> Result<()> {
        self.check_kind(node, NodeKind::Latch)?;
        self.net.set_reset(node, reset);
        Ok(())
    }

    /// Turn a logic node into a constant
    pub fn change_to_const(&mut self, node: NodeId, val: bool) -> Result<()> {
        self.change_logic(node, LogExpr::constant(val), &[], true)
    }

    /// Turn a logic node into a buffer of `src`
    pub fn change_to_buffer(&mut self, node: NodeId, src: NodeId) -> Result<()> {
        self.change_logic(node, LogExpr::posi_literal(0), &[src], true)
    }

    /// Turn a logic node into an inverter of `src`
    pub fn change_to_inverter(&mut self, node: NodeId, src: NodeId) -> Result<()> {
        self.change_logic(node, LogExpr::nega_literal(0), &[src], true)
    }

    /// Turn a logic node into an And of `fanins`
    pub fn change_to_and(&mut self, node: NodeId, fanins: &[NodeId]) -> Result<()> {
        self.change_logic(node, LogExpr::and_n(fanins.len()), fanins, true)
    }

    /// Turn a logic node into a Nand of `fanins`
    pub fn change_to_nand(&mut self, node: NodeId, fanins: &[NodeId]) -> Result<()> {
        self.change_logic(node, !LogExpr::and_n(fanins.len()), fanins, true)
    }

    /// Turn a logic node into an Or of `fanins`
    pub fn change_to_or(&mut self, node: NodeId, fanins: &[NodeId]) -> Result<()> {
        self.change_logic(node, LogExpr::or_n(fanins.len()), fanins, true)
    }

    /// Turn a logic node into a Nor of `fanins`
    pub fn change_to_nor(&mut self, node: NodeId, fanins: &[NodeId]) -> Result<()> {
        self.change_logic(node, !LogExpr::or_n(fanins.len()), fanins, true)
    }

    /// Turn a logic node into a Xor of `fanins`
    pub fn change_to_xor(&mut self, node: NodeId, fanins: &[NodeId]) -> Result<()> {
        self.change_logic(node, LogExpr::xor_n(fanins.len()), fanins, true)
    }

    /// Turn a logic node into a Xnor of `fanins`
    pub fn change_to_xnor(&mut self, node: NodeId, fanins: &[NodeId]) -> Result<()> {
        self.change_logic(node, !LogExpr::xor_n(fanins.len()), fanins, true)
    }

    /// Create a logic node and apply `change` to it; the node is deleted if the change fails
    fn make_with<F>(&mut self, name: Option<&str>, change: F) -> Result<NodeId>
    where
        F: FnOnce(&mut Self, NodeId) -> Result<()>,
    {
        let node = self.new_logic(name)?;
        if let Err(e) = change(self, node) {
            self.net.remove_node(node);
            return Err(e);
        }
        Ok(node)
    }

    /// Create a logic node with the given function and fanins
    pub fn make_logic(
        &mut self,
        expr: LogExpr,
        fanins: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_logic(n, expr, fanins, false))
    }

    /// Create a constant node
    pub fn make_const(&mut self, val: bool, name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_const(n, val))
    }

    /// Create a buffer of `src`
    pub fn make_buffer(&mut self, src: NodeId, name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_buffer(n, src))
    }

    /// Create an inverter of `src`
    pub fn make_inverter(&mut self, src: NodeId, name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_inverter(n, src))
    }

    /// Create an And of `fanins`
    pub fn make_and(&mut self, fanins: &[NodeId], name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_and(n, fanins))
    }

    /// Create a Nand of `fanins`
    pub fn make_nand(&mut self, fanins: &[NodeId], name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_nand(n, fanins))
    }

    /// Create an Or of `fanins`
    pub fn make_or(&mut self, fanins: &[NodeId], name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_or(n, fanins))
    }

    /// Create a Nor of `fanins`
    pub fn make_nor(&mut self, fanins: &[NodeId], name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_nor(n, fanins))
    }

    /// Create a Xor of `fanins`
    pub fn make_xor(&mut self, fanins: &[NodeId], name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_xor(n, fanins))
    }

    /// Create a Xnor of `fanins`
    pub fn make_xnor(&mut self, fanins: &[NodeId], name: Option<&str>) -> Result<NodeId> {
        self.make_with(name, |m, n| m.change_to_xnor(n, fanins))
    }

    /// Redirect every fanout of `old` to `new`
    ///
    /// `old` is left without fanouts but is not deleted. If `new` is an output, its
    /// driver is used. A sink that already uses `new` gets its two fanins merged.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        self.check_owned(old)?;
        let new = self.resolve_source(new)?;
        if old == new {
            return Ok(());
        }
        let edges = self.net.node(old).fanouts().to_vec();
        for e in edges {
            let sink = self.net.node(e.to());
            if sink.is_logic() && sink.fanins().contains(&new) {
                let mut fanins = sink.fanins().to_vec();
                fanins[e.pos()] = new;
                let func = sink.func().clone();
                self.change_logic(e.to(), func, &fanins, false)?;
            } else {
                self.net.set_fanin(e.to(), e.pos(), new);
            }
        }
        Ok(())
    }

    /// Substitute the function of a logic node into its logic fanouts
    ///
    /// A positive buffer is bypassed entirely, outputs and latches included. Otherwise
    /// outputs and latches keep using the node. The node itself is never deleted.
    pub fn eliminate_node(&mut self, node: NodeId) -> Result<()> {
        self.check_kind(node, NodeKind::Logic)?;
        let n = self.net.node(node);
        if n.func().is_posi_literal() {
            let src = n.fanin(0);
            return self.replace_node(node, src);
        }
        let func = n.func().clone();
        let fanins = n.fanins().to_vec();
        let edges = n.fanouts().to_vec();
        for e in edges {
            let fo = self.net.node(e.to());
            if !fo.is_logic() {
                continue;
            }
            let offset = fo.fanin_num();
            let sub = func.remap_var(|v| v + offset);
            let new_func = fo.func().compose(e.pos(), &sub);
            let mut new_fanins = fo.fanins().to_vec();
            new_fanins.extend_from_slice(&fanins);
            self.change_logic(e.to(), new_func, &new_fanins, false)?;
        }
        Ok(())
    }

    /// Mark the node and its transitive fanout through logic nodes
    fn mark_tfo(&mut self, root: NodeId) {
        self.new_generation();
        let mut to_visit = vec![root];
        while let Some(n) = to_visit.pop() {
            if self.marks[n.id()] == self.generation {
                continue;
            }
            self.marks[n.id()] = self.generation;
            for e in self.net.node(n).fanouts() {
                if self.net.node(e.to()).is_logic() {
                    to_visit.push(e.to());
                }
            }
        }
    }

    fn is_marked(&self, id: NodeId) -> bool {
        self.marks[id.id()] == self.generation
    }

    /// Start a new marking; stamps are only cleared when the counter wraps
    fn new_generation(&mut self) {
        let n = self.net.max_node_id();
        if self.marks.len() < n {
            self.marks.resize(n, 0);
        }
        if self.generation == u32::MAX {
            self.marks.fill(0);
            self.generation = 0;
        }
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::lexp::LogExpr;
    use crate::network::{BNetManip, BNetwork, NetError, NodeId, ResetValue};
    use crate::sim::node_functions;

    fn three_inputs(net: &mut BNetwork) -> (NodeId, NodeId, NodeId) {
        let mut manip = BNetManip::new(net);
        let a = manip.new_input(Some("a")).unwrap();
        let b = manip.new_input(Some("b")).unwrap();
        let c = manip.new_input(Some("c")).unwrap();
        (a, b, c)
    }

    #[test]
    fn test_duplicate_fanins() {
        let mut net = BNetwork::new();
        let (a, b, _) = three_inputs(&mut net);
        let mut manip = BNetManip::new(&mut net);
        let n = manip.new_logic(None).unwrap();
        // v0 and v2 are the same node
        manip
            .change_logic(n, LogExpr::and_n(3), &[a, b, a], true)
            .unwrap();
        assert_eq!(net.node(n).fanins(), &[a, b]);
        assert_eq!(*net.node(n).func(), LogExpr::and_n(2));
        // Merging makes v0 disappear from the Xor
        let mut manip = BNetManip::new(&mut net);
        manip
            .change_logic(n, LogExpr::xor_n(3), &[a, b, a], true)
            .unwrap();
        assert_eq!(net.node(n).fanins(), &[b]);
        assert_eq!(*net.node(n).func(), LogExpr::posi_literal(0));
        assert_eq!(net.node(a).fanout_num(), 0);
        net.check();
    }

    #[test]
    fn test_unused_fanins() {
        let mut net = BNetwork::new();
        let (a, b, c) = three_inputs(&mut net);
        let mut manip = BNetManip::new(&mut net);
        let n = manip.new_logic(None).unwrap();
        let e = LogExpr::posi_literal(0) ^ LogExpr::nega_literal(2);
        manip.change_logic(n, e, &[a, b, c], true).unwrap();
        assert_eq!(net.node(n).fanins(), &[a, c]);
        assert_eq!(
            *net.node(n).func(),
            LogExpr::posi_literal(0) ^ LogExpr::nega_literal(1)
        );
        assert_eq!(net.node(b).fanout_num(), 0);
        net.check();
    }

    #[test]
    fn test_largest_numbered_name() {
        let max = format!("[{}]", usize::MAX);
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(Some(&max)).unwrap();
        let b = manip.new_input(None).unwrap();
        manip.rename_node(a, "a").unwrap();
        manip.rename_node(b, &max).unwrap();
        manip.delete_node(b).unwrap();
        let c = manip.new_logic(Some(&max)).unwrap();
        manip.delete_node(c).unwrap();
        assert_eq!(net.find_node(&max), None);
        assert_eq!(net.find_node("a"), Some(a));
        net.check();
    }

    #[test]
    fn test_rejections_leave_no_trace() {
        let mut net = BNetwork::new();
        let (a, b, _) = three_inputs(&mut net);
        let mut other = BNetwork::new();
        let foreign = BNetManip::new(&mut other).new_input(None).unwrap();

        let mut manip = BNetManip::new(&mut net);
        let n = manip.make_and(&[a, b], Some("n")).unwrap();
        assert_eq!(
            manip.change_to_or(n, &[a, foreign]),
            Err(NetError::ForeignNode(foreign))
        );
        assert!(matches!(
            manip.change_logic(n, LogExpr::and_n(3), &[a, b], true),
            Err(NetError::ArityMismatch { vars: 3, fanins: 2 })
        ));
        assert!(matches!(
            manip.change_to_and(a, &[b]),
            Err(NetError::WrongKind { .. })
        ));
        assert_eq!(*net.node(n).func(), LogExpr::and_n(2));
        assert_eq!(net.node(n).fanins(), &[a, b]);

        // A failed creation does not leave a node behind
        let count = net.node_num();
        let mut manip = BNetManip::new(&mut net);
        assert!(manip.make_or(&[a, foreign], Some("m")).is_err());
        assert_eq!(net.node_num(), count);
        assert_eq!(net.find_node("m"), None);
        net.check();
    }

    #[test]
    fn test_delete() {
        let mut net = BNetwork::new();
        let (a, b, _) = three_inputs(&mut net);
        let mut manip = BNetManip::new(&mut net);
        let n = manip.make_and(&[a, b], None).unwrap();
        assert_eq!(manip.delete_node(a), Err(NetError::StillHasFanouts(a)));
        manip.delete_node(n).unwrap();
        assert_eq!(manip.delete_node(n), Err(NetError::ForeignNode(n)));
        manip.delete_node(a).unwrap();
        assert_eq!(net.input_num(), 2);
        assert_eq!(net.node(b).fanout_num(), 0);
        net.check();
    }

    #[test]
    fn test_latch() {
        let mut net = BNetwork::new();
        let (a, b, _) = three_inputs(&mut net);
        let mut other = BNetwork::new();
        let foreign = BNetManip::new(&mut other).new_input(None).unwrap();

        let mut manip = BNetManip::new(&mut net);
        let l = manip.new_latch(Some("l")).unwrap();
        manip.change_latch(l, a, ResetValue::One).unwrap();
        assert_eq!(net.node(l).reset_value(), ResetValue::One);
        let mut manip = BNetManip::new(&mut net);
        assert_eq!(
            manip.change_latch(l, foreign, ResetValue::Zero),
            Err(NetError::ForeignNode(foreign))
        );
        assert_eq!(net.node(l).driver(), Some(a));
        assert_eq!(net.node(l).reset_value(), ResetValue::One);

        // Logic nodes become latches
        let mut manip = BNetManip::new(&mut net);
        let n = manip.make_inverter(b, None).unwrap();
        manip.change_latch(n, l, ResetValue::Unknown).unwrap();
        assert!(net.node(n).is_latch());
        assert_eq!(net.latch_num(), 2);
        assert_eq!(net.logic_num(), 0);
        assert_eq!(net.node(b).fanout_num(), 0);
        net.check();
    }

    #[test]
    fn test_change_output() {
        let mut net = BNetwork::new();
        let (a, b, _) = three_inputs(&mut net);
        let mut manip = BNetManip::new(&mut net);
        let o1 = manip.new_output(Some("o1")).unwrap();
        let o2 = manip.new_output(Some("o2")).unwrap();
        assert_eq!(manip.change_output(o2, o1), Err(NetError::Undriven(o1)));
        manip.change_output(o1, a).unwrap();
        manip.change_output(o2, o1).unwrap();
        assert_eq!(net.node(o2).driver(), Some(a));
        let mut manip = BNetManip::new(&mut net);
        manip.change_output(o1, b).unwrap();
        assert!(manip.change_output(a, b).is_err());
        assert_eq!(net.node(a).fanout_num(), 1);
        net.check();
    }

    #[test]
    fn test_replace() {
        let mut net = BNetwork::new();
        let (a, b, c) = three_inputs(&mut net);
        let mut manip = BNetManip::new(&mut net);
        let n0 = manip.make_and(&[a, b], None).unwrap();
        let n1 = manip.make_or(&[n0, c], None).unwrap();
        let n2 = manip.make_xor(&[n0, a], None).unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, n0).unwrap();
        manip.replace_node(n0, a).unwrap();
        assert_eq!(net.node(n0).fanout_num(), 0);
        assert_eq!(net.node(n1).fanins(), &[a, c]);
        assert_eq!(net.node(o).driver(), Some(a));
        // a ^ a collapses to a constant
        assert_eq!(net.node(n2).fanin_num(), 0);
        assert_eq!(*net.node(n2).func(), LogExpr::Zero);
        net.check();
    }

    #[test]
    fn test_eliminate_node() {
        let mut net = BNetwork::new();
        let (a, b, c) = three_inputs(&mut net);
        let mut manip = BNetManip::new(&mut net);
        let n0 = manip.make_nand(&[a, b], None).unwrap();
        let n1 = manip.make_or(&[n0, c], None).unwrap();
        let n2 = manip.make_and(&[a, n0], None).unwrap();
        let o1 = manip.new_output(None).unwrap();
        manip.change_output(o1, n1).unwrap();
        let o2 = manip.new_output(None).unwrap();
        manip.change_output(o2, n2).unwrap();
        let before = node_functions(&net);
        let mut manip = BNetManip::new(&mut net);
        manip.eliminate_node(n0).unwrap();
        assert_eq!(net.node(n0).fanout_num(), 0);
        assert_eq!(net.node(n1).fanins(), &[c, a, b]);
        assert_eq!(net.node(n2).fanins(), &[a, b]);
        let after = node_functions(&net);
        assert_eq!(before[n1.id()], after[n1.id()]);
        assert_eq!(before[n2.id()], after[n2.id()]);
        net.check();
    }

    #[test]
    fn test_eliminate_buffer() {
        let mut net = BNetwork::new();
        let (a, _, _) = three_inputs(&mut net);
        let mut manip = BNetManip::new(&mut net);
        let n = manip.make_buffer(a, None).unwrap();
        let o = manip.new_output(None).unwrap();
        manip.change_output(o, n).unwrap();
        manip.eliminate_node(n).unwrap();
        assert_eq!(net.node(o).driver(), Some(a));
        assert_eq!(net.node(n).fanout_num(), 0);
    }
}
