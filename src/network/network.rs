use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::lexp::LogExpr;
use crate::network::arena::{IdPool, NameGen};
use crate::network::list::NodeList;
use crate::network::name_map::NameMap;
use crate::network::{BNetManip, BNode, Edge, NetError, NodeId, NodeKind, ResetValue, Result};

/// Identity given to the next network created
static NEXT_NET_ID: AtomicU32 = AtomicU32::new(0);

/// Structural change recorded in the journal of a [`BNetwork`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetChange {
    /// Every node was removed
    AllClear,
    /// A node was created
    NodeAdd(NodeId),
    /// A node was deleted
    NodeDelete(NodeId),
    /// The fanins of a node changed
    NodeFanin(NodeId),
    /// The function, kind or reset value of a node changed
    NodeFunc(NodeId),
    /// A node was renamed
    NodeName(NodeId),
}

/// Representation of a Boolean network
///
/// The network is a directed graph of primary inputs, primary outputs, logic nodes
/// and latches. Each logic node carries a [`LogExpr`] whose variable `i` is its
/// `i`-th fanin. Edges are kept consistent in both directions: every fanin of a node
/// appears as an [`Edge`] in the fanouts of its source.
///
/// Outputs have their own namespace, separate from the other nodes, so that an output
/// may carry the same name as its driver.
///
/// All modifications go through [`BNetManip`].
pub struct BNetwork {
    net_id: u32,
    model_name: String,
    nodes: Vec<Option<BNode>>,
    ids: IdPool,
    inputs: NodeList,
    outputs: NodeList,
    logic: NodeList,
    latches: NodeList,
    all: NodeList,
    name_map: NameMap,
    po_map: NameMap,
    names: NameGen,
    version: u64,
    journal: Option<Vec<NetChange>>,
    sorted: RefCell<Option<(u64, Vec<NodeId>)>>,
}

impl Default for BNetwork {
    fn default() -> Self {
        BNetwork::new()
    }
}

impl BNetwork {
    /// Create a new, empty network
    pub fn new() -> BNetwork {
        BNetwork {
            net_id: NEXT_NET_ID.fetch_add(1, Ordering::Relaxed),
            model_name: String::new(),
            nodes: Vec::new(),
            ids: IdPool::new(),
            inputs: NodeList::default(),
            outputs: NodeList::default(),
            logic: NodeList::default(),
            latches: NodeList::default(),
            all: NodeList::default(),
            name_map: NameMap::default(),
            po_map: NameMap::default(),
            names: NameGen::default(),
            version: 0,
            journal: None,
            sorted: RefCell::new(None),
        }
    }

    /// Name of the model
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Set the name of the model
    pub fn set_model_name(&mut self, name: &str) {
        self.model_name = name.to_owned();
    }

    /// Return the number of primary inputs
    pub fn input_num(&self) -> usize {
        self.inputs.len()
    }

    /// Return the number of primary outputs
    pub fn output_num(&self) -> usize {
        self.outputs.len()
    }

    /// Return the number of logic nodes
    pub fn logic_num(&self) -> usize {
        self.logic.len()
    }

    /// Return the number of latches
    pub fn latch_num(&self) -> usize {
        self.latches.len()
    }

    /// Return the total number of nodes
    pub fn node_num(&self) -> usize {
        self.all.len()
    }

    /// One more than the largest node id in use; size for tables indexed by [`NodeId::id`]
    pub fn max_node_id(&self) -> usize {
        self.ids.bound()
    }

    fn slot_id(&self, slot: usize) -> NodeId {
        NodeId::new(self.net_id, slot)
    }

    /// Primary inputs, in creation order
    pub fn inputs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inputs.iter().map(|i| self.slot_id(i))
    }

    /// Primary outputs, in creation order
    pub fn outputs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outputs.iter().map(|i| self.slot_id(i))
    }

    /// Logic nodes, in creation order
    pub fn logic_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.logic.iter().map(|i| self.slot_id(i))
    }

    /// Latches, in creation order
    pub fn latches(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.latches.iter().map(|i| self.slot_id(i))
    }

    /// All nodes, in creation order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.all.iter().map(|i| self.slot_id(i))
    }

    /// Returns true if the node is alive and belongs to this network
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Access a node, if it is alive and belongs to this network
    pub fn get(&self, id: NodeId) -> Option<&BNode> {
        if id.net() != self.net_id {
            return None;
        }
        self.nodes.get(id.id())?.as_ref()
    }

    /// Access a node
    ///
    /// Panics if the node does not belong to this network.
    pub fn node(&self, id: NodeId) -> &BNode {
        match self.get(id) {
            Some(n) => n,
            None => panic!("Node {:?} does not belong to this network", id),
        }
    }

    /// Name of a node
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).name()
    }

    /// Find an input, logic node or latch by name
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.name_map.find(name)
    }

    /// Find an output by name
    pub fn find_output(&self, name: &str) -> Option<NodeId> {
        self.po_map.find(name)
    }

    /// Structure version, incremented by every change that can affect the topological order
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total number of literals in the logic nodes
    pub fn litnum(&self) -> usize {
        self.logic_nodes().map(|n| self.node(n).litnum()).sum()
    }

    /// Total number of literals once every logic node is expanded to sum-of-products
    pub fn sop_litnum(&self) -> usize {
        self.logic_nodes()
            .map(|n| self.node(n).func().sop_litnum())
            .sum()
    }

    /// Start recording changes in the journal
    pub fn enable_trace(&mut self) {
        if self.journal.is_none() {
            self.journal = Some(Vec::new());
        }
    }

    /// Stop recording changes and drop the journal
    pub fn disable_trace(&mut self) {
        self.journal = None;
    }

    /// Retrieve the changes recorded since the last call
    pub fn take_changes(&mut self) -> Vec<NetChange> {
        match &mut self.journal {
            Some(j) => std::mem::take(j),
            None => Vec::new(),
        }
    }

    fn record(&mut self, change: NetChange) {
        if let Some(j) = &mut self.journal {
            j.push(change);
        }
    }

    fn structure_changed(&mut self) {
        self.version += 1;
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.model_name.clear();
        self.nodes.clear();
        self.ids.clear();
        self.inputs.clear();
        self.outputs.clear();
        self.logic.clear();
        self.latches.clear();
        self.all.clear();
        self.name_map.clear();
        self.po_map.clear();
        self.names.clear();
        self.structure_changed();
        self.record(NetChange::AllClear);
    }

    /// Change the pattern of automatically generated names
    ///
    /// Existing names are kept, and registered again so that future names avoid them.
    pub fn change_name_rule(&mut self, prefix: &str, suffix: &str) {
        self.names.change_rule(prefix, suffix);
        for slot in self.all.iter() {
            if let Some(n) = &self.nodes[slot] {
                self.names.add(&n.name);
            }
        }
    }

    /// Topological order of the logic nodes, from inputs to outputs
    ///
    /// Inputs and latches are the sources. With `reverse`, the order goes from outputs
    /// to inputs. Panics if the network has a combinational cycle.
    pub fn tsort(&self, reverse: bool) -> Vec<NodeId> {
        let mut order = self.sorted_logic();
        assert_eq!(
            order.len(),
            self.logic_num(),
            "The network contains a combinational cycle"
        );
        if reverse {
            order.reverse();
        }
        order
    }

    /// Returns true if the logic nodes admit a topological order
    pub fn acyclic_check(&self) -> bool {
        self.sorted_logic().len() == self.logic_num()
    }

    /// Topological order of the logic nodes, possibly incomplete, cached by version
    fn sorted_logic(&self) -> Vec<NodeId> {
        if let Some((v, order)) = &*self.sorted.borrow() {
            if *v == self.version {
                return order.clone();
            }
        }
        let order = self.compute_order();
        *self.sorted.borrow_mut() = Some((self.version, order.clone()));
        order
    }

    /// Depth-first propagation of the "ready" mark from the sources
    ///
    /// A logic node is visited once all its fanins are ready; nodes on a cycle are
    /// never visited and are missing from the result.
    fn compute_order(&self) -> Vec<NodeId> {
        let mut ready = vec![false; self.max_node_id()];
        for n in self.inputs().chain(self.latches()) {
            ready[n.id()] = true;
        }
        let mut order = Vec::with_capacity(self.logic_num());
        let mut to_visit = Vec::new();
        for root in self.logic_nodes() {
            to_visit.push(root);
            while let Some(id) = to_visit.pop() {
                let node = self.node(id);
                if ready[id.id()] || !node.is_logic() {
                    continue;
                }
                if node.fanins.iter().any(|f| !ready[f.id()]) {
                    continue;
                }
                ready[id.id()] = true;
                order.push(id);
                to_visit.extend(node.fanouts.iter().rev().map(|e| e.to));
            }
        }
        order
    }

    /// Deep copy, along with the translation from the nodes of `self` to the copy
    ///
    /// The table is indexed by [`NodeId::id`]. Nodes are created first and connected in a
    /// second pass, so that latches may refer to nodes created after them.
    pub fn copy_with_map(&self) -> (BNetwork, Vec<Option<NodeId>>) {
        let mut dst = BNetwork::new();
        dst.model_name = self.model_name.clone();
        dst.names
            .change_rule(self.names.prefix(), self.names.suffix());
        let mut map = vec![None; self.max_node_id()];
        {
            let mut manip = BNetManip::new(&mut dst);
            for id in self.nodes() {
                let n = self.node(id);
                let name = Some(n.name());
                let new_id = match n.kind {
                    NodeKind::Input => manip.new_input(name),
                    NodeKind::Output => manip.new_output(name),
                    NodeKind::Logic => manip.new_logic(name),
                    NodeKind::Latch => manip.new_latch(name),
                }
                .expect("Names are unique in the source network");
                map[id.id()] = Some(new_id);
            }
            let tr = |id: NodeId| map[id.id()].expect("Every node has been copied");
            for id in self.nodes() {
                let n = self.node(id);
                let new_id = tr(id);
                let res = match n.kind {
                    NodeKind::Input => Ok(()),
                    NodeKind::Output => match n.driver() {
                        Some(d) => manip.change_output(new_id, tr(d)),
                        None => Ok(()),
                    },
                    NodeKind::Logic => {
                        let fanins: Vec<NodeId> = n.fanins.iter().map(|f| tr(*f)).collect();
                        manip.change_logic(new_id, n.func.clone(), &fanins, false)
                    }
                    NodeKind::Latch => match n.driver() {
                        Some(d) => manip.change_latch(new_id, tr(d), n.reset),
                        None => manip.set_reset_value(new_id, n.reset),
                    },
                };
                res.expect("The source network is consistent");
            }
        }
        (dst, map)
    }

    /// Check the consistency of the datastructure
    pub fn check(&self) {
        let mut counts = [0usize; 4];
        for id in self.nodes() {
            let n = self.node(id);
            assert_eq!(n.id, id);
            let list = match n.kind {
                NodeKind::Input => &self.inputs,
                NodeKind::Output => &self.outputs,
                NodeKind::Logic => &self.logic,
                NodeKind::Latch => &self.latches,
            };
            assert!(list.contains(id.id()), "{} is missing from its role list", id);
            counts[n.kind as usize] += 1;
            assert!(self.ids.is_used(id.id()));

            let names = if n.is_output() {
                &self.po_map
            } else {
                &self.name_map
            };
            assert_eq!(names.find(&n.name), Some(id), "Name of {} is not indexed", id);

            for (pos, f) in n.fanins.iter().enumerate() {
                assert!(self.contains(*f), "Fanin {:?} of {} is not alive", f, id);
                let src = self.node(*f);
                assert!(!src.is_output(), "Output {} is used as a fanin", f);
                let e = Edge {
                    from: *f,
                    to: id,
                    pos,
                };
                assert_eq!(
                    src.fanouts.iter().filter(|x| **x == e).count(),
                    1,
                    "Edge {:?} is not registered in its source",
                    e
                );
            }
            for e in n.fanouts.iter() {
                assert_eq!(e.from, id);
                assert!(self.contains(e.to));
                assert_eq!(self.node(e.to).fanins.get(e.pos), Some(&id));
            }
            for (i, f) in n.fanins.iter().enumerate() {
                assert!(!n.fanins[..i].contains(f), "Duplicate fanin {} in {}", f, id);
            }

            match n.kind {
                NodeKind::Input => assert_eq!(n.fanin_num(), 0),
                NodeKind::Output => {
                    assert!(n.fanin_num() <= 1);
                    assert_eq!(n.fanout_num(), 0, "Output {} has fanouts", id);
                }
                NodeKind::Latch => assert!(n.fanin_num() <= 1),
                NodeKind::Logic => {
                    assert!(n.func.input_size() <= n.fanin_num());
                    for v in 0..n.fanin_num() {
                        assert!(
                            n.func.litnum_var(v) > 0,
                            "Fanin {} of {} is not used by its function",
                            v,
                            id
                        );
                    }
                }
            }
        }
        assert_eq!(counts[NodeKind::Input as usize], self.input_num());
        assert_eq!(counts[NodeKind::Output as usize], self.output_num());
        assert_eq!(counts[NodeKind::Logic as usize], self.logic_num());
        assert_eq!(counts[NodeKind::Latch as usize], self.latch_num());
    }
}

/// Low-level primitives, used by [`BNetManip`]. They maintain the edge and list
/// invariants but do not validate their arguments.
impl BNetwork {
    pub(crate) fn net_id(&self) -> u32 {
        self.net_id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut BNode {
        assert_eq!(id.net(), self.net_id);
        match self.nodes.get_mut(id.id()) {
            Some(Some(n)) => n,
            _ => panic!("Node {:?} is not alive", id),
        }
    }

    fn list_mut(&mut self, kind: NodeKind) -> &mut NodeList {
        match kind {
            NodeKind::Input => &mut self.inputs,
            NodeKind::Output => &mut self.outputs,
            NodeKind::Logic => &mut self.logic,
            NodeKind::Latch => &mut self.latches,
        }
    }

    fn name_space(&self, kind: NodeKind) -> &NameMap {
        if kind == NodeKind::Output {
            &self.po_map
        } else {
            &self.name_map
        }
    }

    fn name_space_mut(&mut self, kind: NodeKind) -> &mut NameMap {
        if kind == NodeKind::Output {
            &mut self.po_map
        } else {
            &mut self.name_map
        }
    }

    /// Returns true if the name can be given to a node of this kind
    pub(crate) fn name_available(&self, kind: NodeKind, name: &str) -> bool {
        !self.name_space(kind).contains(name)
    }

    /// Create a node; an empty or missing name is replaced by a generated one
    pub(crate) fn add_node(&mut self, kind: NodeKind, name: Option<&str>) -> Result<NodeId> {
        let name = match name {
            Some(s) if !s.is_empty() => {
                if !self.name_available(kind, s) {
                    return Err(NetError::NameCollision(s.to_owned()));
                }
                s.to_owned()
            }
            _ => self.fresh_name(kind),
        };
        let slot = self.ids.alloc();
        let id = self.slot_id(slot);
        if slot >= self.nodes.len() {
            self.nodes.resize_with(slot + 1, || None);
        }
        let mut node = BNode::new(id, kind);
        node.name = name;
        self.names.add(&node.name);
        let ok = self.name_space_mut(kind).reg_name(&node.name, id);
        assert!(ok);
        self.nodes[slot] = Some(node);
        self.list_mut(kind).push_back(slot);
        self.all.push_back(slot);
        self.structure_changed();
        self.record(NetChange::NodeAdd(id));
        Ok(id)
    }

    fn fresh_name(&mut self, kind: NodeKind) -> String {
        loop {
            let s = self.names.new_name();
            if self.name_available(kind, &s) {
                return s;
            }
        }
    }

    fn release_name(&mut self, kind: NodeKind, name: &str) {
        self.name_space_mut(kind).del_name(name);
        if !self.name_map.contains(name) && !self.po_map.contains(name) {
            self.names.erase(name);
        }
    }

    /// Delete a node without fanouts
    pub(crate) fn remove_node(&mut self, id: NodeId) {
        assert_eq!(self.node(id).fanout_num(), 0, "{} still has fanouts", id);
        self.set_fanins(id, Vec::new());
        let node = self.nodes[id.id()]
            .take()
            .expect("Node is alive");
        self.release_name(node.kind, &node.name);
        self.list_mut(node.kind).remove(id.id());
        self.all.remove(id.id());
        self.ids.free(id.id());
        self.structure_changed();
        self.record(NetChange::NodeDelete(id));
    }

    /// Rename a node; an empty or missing name is replaced by a generated one
    pub(crate) fn set_name(&mut self, id: NodeId, name: Option<&str>) -> Result<()> {
        let kind = self.node(id).kind;
        if let Some(s) = name {
            if s == self.node(id).name {
                return Ok(());
            }
            if !s.is_empty() && !self.name_available(kind, s) {
                return Err(NetError::NameCollision(s.to_owned()));
            }
        }
        let old = std::mem::take(&mut self.node_mut(id).name);
        self.release_name(kind, &old);
        let new_name = match name {
            Some(s) if !s.is_empty() => s.to_owned(),
            _ => self.fresh_name(kind),
        };
        self.names.add(&new_name);
        let ok = self.name_space_mut(kind).reg_name(&new_name, id);
        assert!(ok);
        self.node_mut(id).name = new_name;
        self.record(NetChange::NodeName(id));
        Ok(())
    }

    /// Replace the fanins of a node, keeping the fanout edges of the sources consistent
    pub(crate) fn set_fanins(&mut self, id: NodeId, fanins: Vec<NodeId>) {
        let old = std::mem::take(&mut self.node_mut(id).fanins);
        for (pos, f) in old.iter().enumerate() {
            let src = self.node_mut(*f);
            let i = src
                .fanouts
                .iter()
                .position(|e| e.to == id && e.pos == pos)
                .expect("Fanin edge is registered in its source");
            src.fanouts.swap_remove(i);
        }
        for (pos, f) in fanins.iter().enumerate() {
            self.node_mut(*f).fanouts.push(Edge {
                from: *f,
                to: id,
                pos,
            });
        }
        self.node_mut(id).fanins = fanins;
        self.structure_changed();
        self.record(NetChange::NodeFanin(id));
    }

    /// Redirect a single fanin edge to another source
    pub(crate) fn set_fanin(&mut self, id: NodeId, pos: usize, src: NodeId) {
        let mut fanins = self.node(id).fanins.clone();
        fanins[pos] = src;
        self.set_fanins(id, fanins);
    }

    pub(crate) fn set_func(&mut self, id: NodeId, func: LogExpr) {
        self.node_mut(id).func = func;
        self.record(NetChange::NodeFunc(id));
    }

    pub(crate) fn set_reset(&mut self, id: NodeId, reset: ResetValue) {
        self.node_mut(id).reset = reset;
        self.record(NetChange::NodeFunc(id));
    }

    /// Change the role of a node; the name namespace must stay the same
    pub(crate) fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        let old = self.node(id).kind;
        if old == kind {
            return;
        }
        assert!(old != NodeKind::Output && kind != NodeKind::Output);
        self.list_mut(old).remove(id.id());
        self.list_mut(kind).push_back(id.id());
        self.node_mut(id).kind = kind;
        self.structure_changed();
        self.record(NetChange::NodeFunc(id));
    }
}

impl Clone for BNetwork {
    fn clone(&self) -> Self {
        self.copy_with_map().0
    }
}

impl fmt::Debug for BNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for BNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_list = |it: &mut dyn Iterator<Item = NodeId>| -> String {
            it.map(|n| self.name(n).to_owned())
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(
            f,
            "Network {} with {} inputs, {} outputs, {} latches, {} logic nodes:",
            self.model_name,
            self.input_num(),
            self.output_num(),
            self.latch_num(),
            self.logic_num()
        )?;
        writeln!(f, "\tinputs: {}", name_list(&mut self.inputs()))?;
        writeln!(f, "\toutputs: {}", name_list(&mut self.outputs()))?;
        for n in self.logic_nodes() {
            let node = self.node(n);
            let fanins = name_list(&mut node.fanins.iter().copied());
            writeln!(f, "\t{} = {} [{}]", node.name, node.func, fanins)?;
        }
        for n in self.latches() {
            let node = self.node(n);
            let d = node.driver().map_or("-", |d| self.name(d));
            writeln!(
                f,
                "\t{} = latch({}, {})",
                node.name,
                d,
                node.reset.to_char()
            )?;
        }
        for n in self.outputs() {
            let node = self.node(n);
            let d = node.driver().map_or("-", |d| self.name(d));
            writeln!(f, "\t{} <- {}", node.name, d)?;
        }
        Ok(())
    }
}
