//! Decomposition restricted to a set of gate types
//!
//! The network is first decomposed into simple gates, then each gate is retyped to one of
//! the allowed types, choosing the type that needs the fewest new inverters.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use log::debug;
use rand::Rng;

use crate::lexp::LogExpr;
use crate::network::{BNetManip, BNetwork, NodeId};
use crate::optim::{decomp_balanced, decomp_random};

/// Set of gate types allowed after decomposition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GateMask(u32);

impl GateMask {
    /// And gate
    pub const AND: GateMask = GateMask(1);
    /// Nand gate
    pub const NAND: GateMask = GateMask(2);
    /// Or gate
    pub const OR: GateMask = GateMask(4);
    /// Nor gate
    pub const NOR: GateMask = GateMask(8);
    /// Xor gate
    pub const XOR: GateMask = GateMask(16);
    /// Xnor gate
    pub const XNOR: GateMask = GateMask(32);
    /// Gates that can implement And and Or functions; at least one is required
    pub const BASE: GateMask = GateMask(15);
    /// Every gate type
    pub const ALL: GateMask = GateMask(63);

    const NAMES: [(GateMask, &'static str); 6] = [
        (GateMask::AND, "and"),
        (GateMask::NAND, "nand"),
        (GateMask::OR, "or"),
        (GateMask::NOR, "nor"),
        (GateMask::XOR, "xor"),
        (GateMask::XNOR, "xnor"),
    ];

    /// The empty set
    pub fn empty() -> GateMask {
        GateMask(0)
    }

    /// Returns true if no gate type is allowed
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every type of `other` is allowed
    pub fn contains(self, other: GateMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if some type of `other` is allowed
    pub fn intersects(self, other: GateMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Gate type from its name, case-insensitive
    pub fn from_name(name: &str) -> Option<GateMask> {
        let name = name.to_lowercase();
        match name.as_str() {
            "base" => Some(GateMask::BASE),
            "all" => Some(GateMask::ALL),
            _ => GateMask::NAMES
                .iter()
                .find(|(_, n)| *n == name)
                .map(|(m, _)| *m),
        }
    }
}

impl BitOr for GateMask {
    type Output = GateMask;

    fn bitor(self, rhs: GateMask) -> GateMask {
        GateMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for GateMask {
    fn bitor_assign(&mut self, rhs: GateMask) {
        self.0 |= rhs.0;
    }
}

impl FromStr for GateMask {
    type Err = String;

    /// Parse a list of gate names separated by commas or spaces
    fn from_str(s: &str) -> Result<GateMask, String> {
        let mut ret = GateMask::empty();
        for name in s.split(|c: char| c == ',' || c.is_whitespace()) {
            if name.is_empty() {
                continue;
            }
            ret |= GateMask::from_name(name).ok_or_else(|| format!("Unknown gate type {}", name))?;
        }
        Ok(ret)
    }
}

impl fmt::Display for GateMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = GateMask::NAMES
            .iter()
            .filter(|(m, _)| self.contains(*m))
            .map(|(_, n)| n)
            .join(",");
        write!(f, "{}", names)
    }
}

/// Retyping options for And and Or functions: gate, input phase, output inversion
///
/// With a phase of true, the positive literals need an inverted input.
const AND_CHOICES: [(GateMask, bool, bool); 4] = [
    (GateMask::AND, false, false),
    (GateMask::NAND, false, true),
    (GateMask::OR, true, true),
    (GateMask::NOR, true, false),
];

const OR_CHOICES: [(GateMask, bool, bool); 4] = [
    (GateMask::AND, true, true),
    (GateMask::NAND, true, false),
    (GateMask::OR, false, false),
    (GateMask::NOR, false, true),
];

/// Chosen implementation of a node
struct Choice {
    gate: GateMask,
    cost: usize,
    iinv: Vec<bool>,
    oinv: bool,
}

/// Gate choices for every node of a topological order, and the inverters they need
struct Plan {
    mask: GateMask,
    choices: Vec<Option<Choice>>,
    /// Inverters created
    nb_inverters: usize,
    /// Inverters left after removal of the unused nodes
    nb_used_inverters: usize,
}

/// Greedy choice of gate types, without modifying the network
struct Planner {
    mask: GateMask,
    /// (node, inverted) pairs already implemented by some node
    available: FxHashSet<(NodeId, bool)>,
}

impl Planner {
    /// Number of inputs needing a new inverter, and which inputs are inverted
    fn count_inv(&self, expr: &LogExpr, fanins: &[NodeId], phase: bool) -> (usize, Vec<bool>) {
        let mut iinv = vec![false; fanins.len()];
        let mut cost = 0;
        for child in expr.children() {
            let lit = child
                .as_literal()
                .expect("Decomposed gates only have literal operands");
            let inv = if phase {
                lit.is_positive()
            } else {
                lit.is_inverted()
            };
            iinv[lit.var()] = inv;
            if !self.available.contains(&(fanins[lit.var()], inv)) {
                cost += 1;
            }
        }
        (cost, iinv)
    }

    fn choose_and_or(&self, expr: &LogExpr, fanins: &[NodeId]) -> Option<Choice> {
        let choices = if expr.is_and() {
            &AND_CHOICES
        } else {
            &OR_CHOICES
        };
        let mut best: Option<Choice> = None;
        for (gate, phase, oinv) in choices.iter() {
            if !self.mask.contains(*gate) {
                continue;
            }
            let (cost, iinv) = self.count_inv(expr, fanins, *phase);
            let cost = cost + *oinv as usize;
            if best.as_ref().map_or(true, |b| cost < b.cost) {
                best = Some(Choice {
                    gate: *gate,
                    cost,
                    iinv,
                    oinv: *oinv,
                });
            }
        }
        best
    }

    /// Xor and Xnor only depend on the parity of the inverted operands
    fn choose_xor(&self, expr: &LogExpr, fanins: &[NodeId]) -> Option<Choice> {
        let ni = fanins.len();
        let parity = expr
            .children()
            .iter()
            .filter(|c| c.is_nega_literal())
            .count()
            % 2
            == 1;
        let inv_available = fanins
            .iter()
            .position(|f| self.available.contains(&(*f, true)));
        let mut best: Option<Choice> = None;
        for (gate, gate_parity) in [(GateMask::XOR, false), (GateMask::XNOR, true)] {
            if !self.mask.contains(gate) || best.as_ref().is_some_and(|b| b.cost == 0) {
                continue;
            }
            let choice = if parity == gate_parity {
                Choice {
                    gate,
                    cost: 0,
                    iinv: vec![false; ni],
                    oinv: false,
                }
            } else if let Some(pos) = inv_available {
                Choice {
                    gate,
                    cost: 0,
                    iinv: (0..ni).map(|i| i == pos).collect(),
                    oinv: false,
                }
            } else {
                Choice {
                    gate,
                    cost: 1,
                    iinv: vec![false; ni],
                    oinv: true,
                }
            };
            if best.as_ref().map_or(true, |b| choice.cost < b.cost) {
                best = Some(choice);
            }
        }
        best
    }

    /// Choose the gate of every node in order, recording the inverters created on the way
    fn plan(net: &BNetwork, order: &[NodeId], mask: GateMask) -> Plan {
        let mut planner = Planner {
            mask,
            available: net.inputs().chain(net.latches()).map(|n| (n, false)).collect(),
        };
        let mut choices = Vec::with_capacity(order.len());
        let mut nb_inverters = 0;
        // Resulting graph on (node, inverted) signals, to count the inverters actually used
        let mut deps: FxHashMap<(NodeId, bool), Vec<(NodeId, bool)>> = FxHashMap::default();
        let mut inverters: FxHashSet<(NodeId, bool)> = FxHashSet::default();
        for &node in order {
            let n = net.node(node);
            let expr = n.func();
            let fanins = n.fanins();
            if expr.is_literal() || expr.is_constant() {
                if expr.is_nega_literal() {
                    inverters.insert((node, false));
                }
                deps.insert((node, false), fanins.iter().map(|f| (*f, false)).collect());
                choices.push(None);
            } else {
                assert_eq!(expr.child_num(), fanins.len());
                let choice = if expr.is_xor() {
                    planner.choose_xor(expr, fanins)
                } else {
                    planner.choose_and_or(expr, fanins)
                }
                .expect("No allowed gate type for this node");
                let mut inputs = Vec::with_capacity(fanins.len());
                for (f, inv) in fanins.iter().zip(choice.iinv.iter()) {
                    if *inv && planner.available.insert((*f, true)) {
                        inverters.insert((*f, true));
                        deps.insert((*f, true), vec![(*f, false)]);
                        nb_inverters += 1;
                    }
                    inputs.push((*f, *inv));
                }
                if choice.oinv {
                    planner.available.insert((node, true));
                    inverters.insert((node, false));
                    deps.insert((node, true), inputs);
                    deps.insert((node, false), vec![(node, true)]);
                    nb_inverters += 1;
                } else {
                    deps.insert((node, false), inputs);
                }
                choices.push(Some(choice));
            }
            planner.available.insert((node, false));
        }

        let mut visited: FxHashSet<(NodeId, bool)> = net
            .outputs()
            .chain(net.latches())
            .filter_map(|n| net.node(n).driver())
            .map(|d| (d, false))
            .collect();
        let mut to_visit: Vec<(NodeId, bool)> = visited.iter().copied().collect();
        while let Some(sig) = to_visit.pop() {
            for d in deps.get(&sig).into_iter().flatten() {
                if visited.insert(*d) {
                    to_visit.push(*d);
                }
            }
        }
        let nb_used_inverters = visited.iter().filter(|s| inverters.contains(*s)).count();
        Plan {
            mask,
            choices,
            nb_inverters,
            nb_used_inverters,
        }
    }
}

/// Rewriting of the nodes according to a plan
struct GateDecomposer<'a> {
    manip: BNetManip<'a>,
    /// Node implementing each (node, inverted) pair
    node_map: FxHashMap<(NodeId, bool), NodeId>,
    nb_inverters: usize,
}

impl<'a> GateDecomposer<'a> {
    /// Node implementing `node` with the given polarity, creating an inverter if needed
    fn source(&mut self, node: NodeId, inv: bool) -> NodeId {
        if let Some(n) = self.node_map.get(&(node, inv)) {
            return *n;
        }
        assert!(inv, "Positive polarity of {} is not available", node);
        let pos = self.node_map[&(node, false)];
        let n = self
            .manip
            .make_inverter(pos, None)
            .expect("Automatic names are free");
        self.node_map.insert((node, true), n);
        self.nb_inverters += 1;
        n
    }

    fn retype(&mut self, node: NodeId, choice: Option<Choice>) {
        let Some(choice) = choice else {
            self.node_map.insert((node, false), node);
            return;
        };
        let fanins = self.manip.network().node(node).fanins().to_vec();
        let new_fanins: Vec<NodeId> = fanins
            .iter()
            .zip(choice.iinv.iter())
            .map(|(f, inv)| self.source(*f, *inv))
            .collect();
        let ni = new_fanins.len();
        let new_expr = match choice.gate {
            GateMask::AND => LogExpr::and_n(ni),
            GateMask::NAND => !LogExpr::and_n(ni),
            GateMask::OR => LogExpr::or_n(ni),
            GateMask::NOR => !LogExpr::or_n(ni),
            GateMask::XOR => LogExpr::xor_n(ni),
            GateMask::XNOR => !LogExpr::xor_n(ni),
            _ => unreachable!(),
        };
        if choice.oinv {
            let gate = self
                .manip
                .make_logic(new_expr, &new_fanins, None)
                .expect("A retyped gate cannot create a cycle");
            self.node_map.insert((node, true), gate);
            self.manip
                .change_to_inverter(node, gate)
                .expect("A new gate is not in the fanout of the node");
            self.nb_inverters += 1;
        } else {
            self.manip
                .change_logic(node, new_expr, &new_fanins, false)
                .expect("A retyped gate cannot create a cycle");
        }
        self.node_map.insert((node, false), node);
    }
}

/// Retype the simple gates of a decomposed network
///
/// The greedy choice is compared with the use of a single And/Or gate type of the mask,
/// and the solution with the fewest inverters is kept.
fn retype_gates(net: &mut BNetwork, mask: GateMask) {
    net.clean_up();
    let order = net.tsort(false);
    let xor_types = GateMask(mask.0 & (GateMask::XOR | GateMask::XNOR).0);
    let mut plan = Planner::plan(net, &order, mask);
    for gate in [GateMask::AND, GateMask::NAND, GateMask::OR, GateMask::NOR] {
        let single = gate | xor_types;
        if !mask.contains(gate) || single == mask {
            continue;
        }
        let other = Planner::plan(net, &order, single);
        if other.nb_used_inverters < plan.nb_used_inverters {
            plan = other;
        }
    }

    let mut node_map = FxHashMap::default();
    for n in net.inputs().chain(net.latches()) {
        node_map.insert((n, false), n);
    }
    let mut dec = GateDecomposer {
        manip: BNetManip::new(net),
        node_map,
        nb_inverters: 0,
    };
    for (node, choice) in order.into_iter().zip(plan.choices) {
        dec.retype(node, choice);
    }
    assert_eq!(dec.nb_inverters, plan.nb_inverters);
    debug!(
        "Gate decomposition with {}: {} inverters added, {} used",
        plan.mask, dec.nb_inverters, plan.nb_used_inverters
    );
    net.clean_up();
}

fn check_mask(mask: GateMask) {
    assert!(
        mask.intersects(GateMask::BASE),
        "At least one of And, Nand, Or, Nor must be allowed"
    );
}

fn no_xor(mask: GateMask) -> bool {
    !mask.intersects(GateMask::XOR | GateMask::XNOR)
}

/// Decompose into minimum-depth trees using only the gate types in `mask`, plus inverters
///
/// Panics if `mask` allows none of And, Nand, Or and Nor.
pub fn gate_decomp_balanced(net: &mut BNetwork, mask: GateMask, max_fanin: usize) {
    check_mask(mask);
    decomp_balanced(net, max_fanin, no_xor(mask));
    retype_gates(net, mask);
}

/// Decompose into random trees using only the gate types in `mask`, plus inverters
///
/// Panics if `mask` allows none of And, Nand, Or and Nor.
pub fn gate_decomp_random<R: Rng>(
    net: &mut BNetwork,
    mask: GateMask,
    max_fanin: usize,
    rng: &mut R,
) {
    check_mask(mask);
    decomp_random(net, max_fanin, rng, no_xor(mask));
    retype_gates(net, mask);
}
