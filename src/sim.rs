//! Bit-parallel simulation of a network, truth tables and equivalence by simulation

mod simple_sim;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use volute::Lut;

use crate::network::{BNetwork, NodeId};

pub use simple_sim::SimpleSimulator;

/// Largest number of sources for exhaustive truth tables
pub const MAX_TRUTH_TABLE_VARS: usize = 16;

/// Simple conversion to 64b format
fn bool_to_multi(values: &[Vec<bool>]) -> Vec<Vec<u64>> {
    values
        .iter()
        .map(|v| v.iter().map(|b| if *b { !0 } else { 0 }).collect())
        .collect()
}

/// Simple conversion from 64b format
fn multi_to_bool(values: &[Vec<u64>]) -> Vec<Vec<bool>> {
    values
        .iter()
        .map(|v| v.iter().map(|b| *b != 0).collect())
        .collect()
}

/// Simulate a network over multiple timesteps; return the output values
///
/// Latches start from their reset value, unknown values being taken as zero.
pub fn simulate(net: &BNetwork, input_values: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let multi_input = bool_to_multi(input_values);
    let mut sim = SimpleSimulator::from_network(net);
    let multi_ret = sim.run(&multi_input);
    multi_to_bool(&multi_ret)
}

/// Simulate the combinational part of a network with 64b values
///
/// `source_values` holds the inputs followed by the latch outputs. Returns the values
/// of the outputs followed by the latch inputs.
pub fn simulate_comb_multi(net: &BNetwork, source_values: &[u64]) -> Vec<u64> {
    let mut sim = SimpleSimulator::from_network(net);
    sim.run_comb(source_values);
    sim.sink_values()
}

/// Number of simulation sources: primary inputs and latches
pub fn nb_sources(net: &BNetwork) -> usize {
    net.input_num() + net.latch_num()
}

/// Value of a source for the exhaustive enumeration, for one 64b word
fn exhaustive_word(var: usize, word: usize) -> u64 {
    const PATTERNS: [u64; 6] = [
        0xaaaa_aaaa_aaaa_aaaa,
        0xcccc_cccc_cccc_cccc,
        0xf0f0_f0f0_f0f0_f0f0,
        0xff00_ff00_ff00_ff00,
        0xffff_0000_ffff_0000,
        0xffff_ffff_0000_0000,
    ];
    if var < 6 {
        PATTERNS[var]
    } else if (word >> (var - 6)) & 1 != 0 {
        !0
    } else {
        0
    }
}

/// Source values enumerating every combination; one vector per 64b word
fn exhaustive_patterns(nb_vars: usize) -> Vec<Vec<u64>> {
    let nb_words = 1usize << nb_vars.saturating_sub(6);
    (0..nb_words)
        .map(|w| (0..nb_vars).map(|v| exhaustive_word(v, w)).collect())
        .collect()
}

/// Function of every node over all combinations of the sources (6 sources at most)
///
/// The result is indexed by node id. Bit `m` of a word is the value of the node
/// when source `i` takes the value of bit `i` of `m`.
pub fn node_functions(net: &BNetwork) -> Vec<u64> {
    let n = nb_sources(net);
    assert!(n <= 6, "Too many sources for a single-word truth table");
    let mask = if n == 6 { !0 } else { (1u64 << (1 << n)) - 1 };
    let mut sim = SimpleSimulator::from_network(net);
    sim.run_comb(&exhaustive_patterns(n)[0]);
    sim.node_values().iter().map(|v| v & mask).collect()
}

/// Truth tables of the outputs, then of the latch inputs, over the inputs and latch outputs
pub fn truth_tables(net: &BNetwork) -> Vec<Lut> {
    let n = nb_sources(net);
    assert!(
        n <= MAX_TRUTH_TABLE_VARS,
        "Too many sources for exhaustive truth tables: {}",
        n
    );
    let nb_bits = 1usize << n;
    let mut sim = SimpleSimulator::from_network(net);
    let mut bits: Vec<Vec<bool>> = Vec::new();
    for pattern in exhaustive_patterns(n) {
        sim.run_comb(&pattern);
        let sinks = sim.sink_values();
        bits.resize(sinks.len(), Vec::new());
        for (b, v) in bits.iter_mut().zip(sinks) {
            for i in 0..64.min(nb_bits) {
                b.push((v >> i) & 1 != 0);
            }
        }
    }
    bits.iter().map(|b| lut_from_bits(n, b)).collect()
}

fn lut_from_bits(nb_vars: usize, bits: &[bool]) -> Lut {
    let nb_chars = (bits.len() / 4).max(1);
    let mut s = String::with_capacity(nb_chars);
    for c in (0..nb_chars).rev() {
        let mut nibble = 0u32;
        for k in 0..4 {
            if bits.get(4 * c + k).copied().unwrap_or(false) {
                nibble |= 1 << k;
            }
        }
        s.push(std::char::from_digit(nibble, 16).unwrap_or('0'));
    }
    Lut::from_hex_string(nb_vars, &s).expect("Hexadecimal string has the expected size")
}

/// Names of a sequence of nodes
fn names<I: Iterator<Item = NodeId>>(net: &BNetwork, it: I) -> Vec<&str> {
    it.map(|n| net.name(n)).collect()
}

/// Position of each name of `a` in `b`
fn match_names(what: &str, a: &[&str], b: &[&str]) -> Result<Vec<usize>, String> {
    if a.len() != b.len() {
        return Err(format!(
            "Different number of {}: {} vs {}",
            what,
            a.len(),
            b.len()
        ));
    }
    a.iter()
        .map(|name| {
            b.iter()
                .position(|x| x == name)
                .ok_or_else(|| format!("{} is missing from the second network", name))
        })
        .collect()
}

/// Compare two networks by simulation
///
/// Inputs, outputs and latches are matched by name, latches being compared as
/// pseudo-inputs and pseudo-outputs. Up to 16 sources, all combinations are
/// simulated and the result is exact; beyond that, random patterns are used.
pub fn check_equivalence(a: &BNetwork, b: &BNetwork) -> Result<(), String> {
    let input_map = match_names("inputs", &names(a, a.inputs()), &names(b, b.inputs()))?;
    let latch_names = names(a, a.latches());
    let latch_map = match_names("latches", &latch_names, &names(b, b.latches()))?;
    let output_names = names(a, a.outputs());
    let output_map = match_names("outputs", &output_names, &names(b, b.outputs()))?;

    // Sources are the inputs then the latches, sinks the outputs then the latches
    let src_map: Vec<usize> = input_map
        .iter()
        .copied()
        .chain(latch_map.iter().map(|j| j + b.input_num()))
        .collect();
    let sink_map: Vec<usize> = output_map
        .iter()
        .copied()
        .chain(latch_map.iter().map(|j| j + b.output_num()))
        .collect();
    let sink_a: Vec<&str> = output_names.iter().chain(latch_names.iter()).copied().collect();

    let n = src_map.len();
    let patterns: Vec<Vec<u64>> = if n <= MAX_TRUTH_TABLE_VARS {
        exhaustive_patterns(n)
    } else {
        let mut rng = SmallRng::seed_from_u64(1);
        (0..1024)
            .map(|_| (0..n).map(|_| rng.gen()).collect())
            .collect()
    };
    let mask = if n < 6 { (1u64 << (1 << n)) - 1 } else { !0 };

    let mut sim_a = SimpleSimulator::from_network(a);
    let mut sim_b = SimpleSimulator::from_network(b);
    let mut pattern_b = vec![0; n];
    for pattern in patterns {
        for (i, j) in src_map.iter().enumerate() {
            pattern_b[*j] = pattern[i];
        }
        sim_a.run_comb(&pattern);
        sim_b.run_comb(&pattern_b);
        let va = sim_a.sink_values();
        let vb = sim_b.sink_values();
        for (i, j) in sink_map.iter().enumerate() {
            if (va[i] ^ vb[*j]) & mask != 0 {
                return Err(format!("{} differs between the two networks", sink_a[i]));
            }
        }
    }
    Ok(())
}

/// Returns true if the two networks are equivalent, as per [`check_equivalence`]
pub fn equivalent(a: &BNetwork, b: &BNetwork) -> bool {
    check_equivalence(a, b).is_ok()
}

#[cfg(test)]
mod tests {
    use super::{equivalent, node_functions, simulate, truth_tables};
    use crate::network::{BNetManip, BNetwork, ResetValue};

    fn full_adder(net: &mut BNetwork, swap: bool) {
        let mut manip = BNetManip::new(net);
        let a = manip.new_input(Some("a")).unwrap();
        let b = manip.new_input(Some("b")).unwrap();
        let c = manip.new_input(Some("c")).unwrap();
        let s = manip.make_xor(&[a, b, c], None).unwrap();
        let ab = manip.make_and(&[a, b], None).unwrap();
        let bc = manip.make_and(&[b, c], None).unwrap();
        let ac = manip.make_and(&[a, c], None).unwrap();
        let co = manip.make_or(&[ab, bc, ac], None).unwrap();
        let (n0, n1) = if swap { ("co", "s") } else { ("s", "co") };
        let o0 = manip.new_output(Some(n0)).unwrap();
        let o1 = manip.new_output(Some(n1)).unwrap();
        let (d0, d1) = if swap { (co, s) } else { (s, co) };
        manip.change_output(o0, d0).unwrap();
        manip.change_output(o1, d1).unwrap();
    }

    #[test]
    fn test_node_functions() {
        let mut net = BNetwork::new();
        full_adder(&mut net, false);
        let f = node_functions(&net);
        let s = net.find_output("s").unwrap();
        let co = net.find_output("co").unwrap();
        assert_eq!(f[s.id()], 0b1001_0110);
        assert_eq!(f[co.id()], 0b1110_1000);
    }

    #[test]
    fn test_truth_tables() {
        let mut net = BNetwork::new();
        full_adder(&mut net, false);
        let tt = truth_tables(&net);
        assert_eq!(tt.len(), 2);
        assert_eq!(tt[0].num_vars(), 3);
        assert!(!tt[0].value(0));
        assert!(tt[0].value(1));
        assert!(tt[0].value(7));
        assert!(!tt[1].value(1));
        assert!(tt[1].value(3));
    }

    #[test]
    fn test_equivalent() {
        let mut a = BNetwork::new();
        full_adder(&mut a, false);
        let mut b = BNetwork::new();
        full_adder(&mut b, true);
        assert!(equivalent(&a, &b));

        let s = b.find_output("s").unwrap();
        let d = b.node(s).driver().unwrap();
        let fanins = b.node(d).fanins().to_vec();
        BNetManip::new(&mut b).change_to_xnor(d, &fanins).unwrap();
        assert!(!equivalent(&a, &b));
    }

    #[test]
    fn test_sequential() {
        // Toggle flip-flop: l' = l ^ t, output l
        let mut net = BNetwork::new();
        let mut manip = BNetManip::new(&mut net);
        let t = manip.new_input(Some("t")).unwrap();
        let l = manip.new_latch(Some("l")).unwrap();
        let x = manip.make_xor(&[l, t], None).unwrap();
        manip.change_latch(l, x, ResetValue::One).unwrap();
        let o = manip.new_output(Some("q")).unwrap();
        manip.change_output(o, l).unwrap();
        let res = simulate(
            &net,
            &[vec![true], vec![false], vec![true], vec![true]],
        );
        assert_eq!(
            res,
            vec![vec![true], vec![false], vec![false], vec![true]]
        );
    }
}
