//! Compute gate statistics
//!
//! ```
//! # use bnet::network::BNetwork;
//! # let net = BNetwork::new();
//! use bnet::network::stats::stats;
//! let stats = stats(&net);
//!
//! // Check that there is no Xor gate
//! assert_eq!(stats.nb_xor, 0);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::network::BNetwork;

/// Number of inputs, outputs and nodes in a network, by shape of their function
#[derive(Clone, Debug, Default)]
pub struct NetworkStats {
    /// Number of inputs
    pub nb_inputs: usize,
    /// Number of outputs
    pub nb_outputs: usize,
    /// Number of latches
    pub nb_latches: usize,
    /// Number of logic nodes
    pub nb_logic: usize,
    /// Number of literals in the factored forms
    pub nb_literals: usize,
    /// Number of literals once expanded to sum-of-products
    pub nb_sop_literals: usize,
    /// Number of constant nodes
    pub nb_const: usize,
    /// Number of positive buffers
    pub nb_buf: usize,
    /// Number of inverters
    pub nb_not: usize,
    /// Number of And of literals
    pub nb_and: usize,
    /// Arity of And gates
    pub and_arity: Vec<usize>,
    /// Number of Or of literals
    pub nb_or: usize,
    /// Arity of Or gates
    pub or_arity: Vec<usize>,
    /// Number of Xor of literals
    pub nb_xor: usize,
    /// Arity of Xor gates
    pub xor_arity: Vec<usize>,
    /// Number of nodes with a multi-level function
    pub nb_complex: usize,
    /// Largest number of fanins of a logic node
    pub max_fanin: usize,
}

fn record_arity(arity: &mut Vec<usize>, sz: usize) {
    if arity.len() <= sz {
        arity.resize(sz + 1, 0);
    }
    arity[sz] += 1;
}

fn write_arity(f: &mut fmt::Formatter<'_>, name: &str, nb: usize, arity: &[usize]) -> fmt::Result {
    if nb != 0 {
        writeln!(f, "  {}: {}", name, nb)?;
        for (i, nb) in arity.iter().enumerate() {
            if *nb != 0 {
                writeln!(f, "      {}: {}", i, nb)?;
            }
        }
    }
    Ok(())
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Outputs: {}", self.nb_outputs)?;
        if self.nb_latches != 0 {
            writeln!(f, "  Latches: {}", self.nb_latches)?;
        }
        writeln!(f, "  Logic nodes: {}", self.nb_logic)?;
        writeln!(f, "  Literals: {}", self.nb_literals)?;
        writeln!(f, "  SOP literals: {}", self.nb_sop_literals)?;
        writeln!(f, "  Max fanin: {}", self.max_fanin)?;
        write_arity(f, "And", self.nb_and, &self.and_arity)?;
        write_arity(f, "Or", self.nb_or, &self.or_arity)?;
        write_arity(f, "Xor", self.nb_xor, &self.xor_arity)?;
        if self.nb_complex != 0 {
            writeln!(f, "  Complex: {}", self.nb_complex)?;
        }
        if self.nb_not != 0 {
            writeln!(f, "  Not: {}", self.nb_not)?;
        }
        if self.nb_buf != 0 {
            writeln!(f, "  Buf: {}", self.nb_buf)?;
        }
        if self.nb_const != 0 {
            writeln!(f, "  Const: {}", self.nb_const)?;
        }
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the network
pub fn stats(net: &BNetwork) -> NetworkStats {
    let mut ret = NetworkStats {
        nb_inputs: net.input_num(),
        nb_outputs: net.output_num(),
        nb_latches: net.latch_num(),
        nb_logic: net.logic_num(),
        nb_literals: net.litnum(),
        nb_sop_literals: net.sop_litnum(),
        ..Default::default()
    };
    for n in net.logic_nodes() {
        let node = net.node(n);
        let func = node.func();
        let sz = func.child_num();
        ret.max_fanin = ret.max_fanin.max(node.fanin_num());
        if func.is_constant() {
            ret.nb_const += 1;
        } else if func.is_posi_literal() {
            ret.nb_buf += 1;
        } else if func.is_nega_literal() {
            ret.nb_not += 1;
        } else if func.is_simple_and() {
            ret.nb_and += 1;
            record_arity(&mut ret.and_arity, sz);
        } else if func.is_simple_or() {
            ret.nb_or += 1;
            record_arity(&mut ret.or_arity, sz);
        } else if func.is_simple_xor() {
            ret.nb_xor += 1;
            record_arity(&mut ret.xor_arity, sz);
        } else {
            ret.nb_complex += 1;
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::stats;
    use crate::network::{BNetManip, BNetwork};

    #[test]
    fn test_stats() {
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let a = manip.new_input(None).unwrap();
        let b = manip.new_input(None).unwrap();
        let c = manip.new_input(None).unwrap();
        let x = manip.make_and(&[a, b, c], None).unwrap();
        let y = manip.make_nor(&[a, x], None).unwrap();
        let z = manip.make_xnor(&[y, c], None).unwrap();
        manip.make_inverter(z, None).unwrap();
        let s = stats(&net);
        assert_eq!(s.nb_inputs, 3);
        assert_eq!(s.nb_logic, 4);
        assert_eq!(s.nb_and, 2);
        assert_eq!(s.and_arity[3], 1);
        assert_eq!(s.and_arity[2], 1);
        assert_eq!(s.nb_xor, 1);
        assert_eq!(s.nb_not, 1);
        assert_eq!(s.max_fanin, 3);
        assert!(format!("{}", s).contains("And: 2"));
    }
}
