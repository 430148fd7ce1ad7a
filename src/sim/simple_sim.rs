use crate::network::{BNetwork, NodeId, ResetValue};

/// Structure for simulation based directly on the network representation
///
/// Values are 64-bit words, one bit per pattern. Sources are the primary inputs
/// followed by the latches, in list order.
pub struct SimpleSimulator<'a> {
    net: &'a BNetwork,
    order: Vec<NodeId>,
    inputs: Vec<NodeId>,
    latches: Vec<NodeId>,
    outputs: Vec<NodeId>,
    node_values: Vec<u64>,
}

fn reset_to_word(r: ResetValue) -> u64 {
    match r {
        ResetValue::One => !0,
        _ => 0,
    }
}

impl<'a> SimpleSimulator<'a> {
    pub fn from_network(net: &'a BNetwork) -> SimpleSimulator<'a> {
        SimpleSimulator {
            net,
            order: net.tsort(false),
            inputs: net.inputs().collect(),
            latches: net.latches().collect(),
            outputs: net.outputs().collect(),
            node_values: vec![0; net.max_node_id()],
        }
    }

    /// Values of every node after the last run, indexed by node id
    pub fn node_values(&self) -> &[u64] {
        &self.node_values
    }

    /// Value of a single node after the last run
    pub fn value(&self, n: NodeId) -> u64 {
        self.node_values[n.id()]
    }

    /// Evaluate the combinational logic, with the latches as pseudo-inputs
    ///
    /// `source_values` holds the values of the inputs, then of the latches.
    pub fn run_comb(&mut self, source_values: &[u64]) {
        assert_eq!(source_values.len(), self.inputs.len() + self.latches.len());
        for (n, v) in self.inputs.iter().chain(self.latches.iter()).zip(source_values) {
            self.node_values[n.id()] = *v;
        }
        self.propagate();
    }

    fn propagate(&mut self) {
        let mut fanin_values = Vec::new();
        for n in self.order.iter() {
            let node = self.net.node(*n);
            fanin_values.clear();
            fanin_values.extend(node.fanins().iter().map(|f| self.node_values[f.id()]));
            self.node_values[n.id()] = node.func().eval(&fanin_values);
        }
        for o in self.outputs.iter() {
            self.node_values[o.id()] = match self.net.node(*o).driver() {
                Some(d) => self.node_values[d.id()],
                None => 0,
            };
        }
    }

    /// Values of the primary outputs, then of the latch inputs
    pub fn sink_values(&self) -> Vec<u64> {
        let mut ret: Vec<u64> = self.outputs.iter().map(|o| self.value(*o)).collect();
        for l in self.latches.iter() {
            ret.push(match self.net.node(*l).driver() {
                Some(d) => self.value(d),
                None => 0,
            });
        }
        ret
    }

    /// Sequential simulation, starting from the reset state of the latches
    ///
    /// Returns the values of the primary outputs at each timestep.
    pub fn run(&mut self, input_values: &[Vec<u64>]) -> Vec<Vec<u64>> {
        let mut state: Vec<u64> = self
            .latches
            .iter()
            .map(|l| reset_to_word(self.net.node(*l).reset_value()))
            .collect();
        let mut ret = Vec::new();
        for v in input_values {
            let mut sources = v.clone();
            sources.extend_from_slice(&state);
            self.run_comb(&sources);
            let sinks = self.sink_values();
            ret.push(sinks[..self.outputs.len()].to_vec());
            state = sinks[self.outputs.len()..].to_vec();
        }
        ret
    }
}
