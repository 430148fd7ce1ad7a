//! Network generators and templates

/// Adder generators
pub mod adder {
    use crate::network::{BNetManip, BNetwork};

    /// A simple and slow ripple-carry adder
    pub fn ripple_carry(len: usize) -> BNetwork {
        let mut ret = BNetwork::new();
        ret.set_model_name(&format!("adder{}", len));
        let mut manip = BNetManip::new(&mut ret);
        let mut c = manip.make_const(false, None).expect("Generated nodes belong to the network");
        for i in 0..len {
            let a = manip.new_input(Some(&format!("a{}", i))).expect("Generated names are unique");
            let b = manip.new_input(Some(&format!("b{}", i))).expect("Generated names are unique");
            let s = manip.make_xor(&[a, b, c], None)
                .expect("Generated nodes belong to the network");
            let ab = manip.make_and(&[a, b], None).expect("Generated nodes belong to the network");
            let bc = manip.make_and(&[b, c], None).expect("Generated nodes belong to the network");
            let ac = manip.make_and(&[a, c], None).expect("Generated nodes belong to the network");
            let next_c = manip.make_or(&[ab, bc, ac], None)
                .expect("Generated nodes belong to the network");
            let o = manip.new_output(Some(&format!("s{}", i))).expect("Generated names are unique");
            manip.change_output(o, s).expect("Generated nodes belong to the network");
            c = next_c;
        }
        let o = manip.new_output(Some("cout")).expect("Generated names are unique");
        manip.change_output(o, c).expect("Generated nodes belong to the network");
        ret.check();
        ret
    }
}

/// Randomly generated networks
pub mod random {
    use rand::seq::SliceRandom;
    use rand::Rng;

    use crate::lexp::LogExpr;
    use crate::network::{BNetManip, BNetwork, NodeId};

    /// Random multi-level expression over the variables `0..nb_vars`, using each of them once
    fn random_expr<R: Rng>(rng: &mut R, vars: &[usize]) -> LogExpr {
        if vars.len() == 1 {
            return LogExpr::literal(vars[0], rng.gen_bool(0.3));
        }
        let split = rng.gen_range(1..vars.len());
        let l = random_expr(rng, &vars[..split]);
        let r = random_expr(rng, &vars[split..]);
        let e = match rng.gen_range(0..3) {
            0 => l & r,
            1 => l | r,
            _ => l ^ r,
        };
        if rng.gen_bool(0.2) {
            !e
        } else {
            e
        }
    }

    /// A random acyclic network, each node using up to `max_fanin` previous nodes
    pub fn random_network<R: Rng>(
        rng: &mut R,
        nb_inputs: usize,
        nb_nodes: usize,
        nb_outputs: usize,
        max_fanin: usize,
    ) -> BNetwork {
        assert!(nb_inputs > 0 && max_fanin > 0);
        let mut ret = BNetwork::new();
        let mut manip = BNetManip::new(&mut ret);
        let mut signals: Vec<NodeId> = (0..nb_inputs)
            .map(|i| manip.new_input(Some(&format!("i{}", i))).expect("Generated names are unique"))
            .collect();
        for _ in 0..nb_nodes {
            let nb_fanins = rng.gen_range(1..=max_fanin.min(signals.len()));
            let fanins: Vec<NodeId> = signals
                .choose_multiple(rng, nb_fanins)
                .copied()
                .collect();
            let vars: Vec<usize> = (0..nb_fanins).collect();
            let expr = random_expr(rng, &vars);
            let n = manip
                .make_logic(expr, &fanins, None)
                .expect("Generated nodes belong to the network");
            signals.push(n);
        }
        for i in 0..nb_outputs {
            let src = signals[signals.len() - 1 - (i % signals.len())];
            let o = manip.new_output(Some(&format!("o{}", i))).expect("Generated names are unique");
            manip.change_output(o, src).expect("Generated nodes belong to the network");
        }
        ret.check();
        ret
    }
}

/// Simple generators to test functionality
pub mod testcases {
    use crate::network::{BNetManip, BNetwork, ResetValue};

    /// A chain of latches with a Xor with the input at the start; used to test topological sorting
    pub fn toggle_chain(len: usize) -> BNetwork {
        assert!(len > 0);
        let mut ret = BNetwork::new();
        let mut manip = BNetManip::new(&mut ret);
        let input = manip.new_input(Some("i")).expect("Generated names are unique");
        let latches: Vec<_> = (0..len)
            .map(|i| manip.new_latch(Some(&format!("l{}", i))).expect("Generated names are unique"))
            .collect();
        let x = manip.make_xor(&[latches[len - 1], input], None)
            .expect("Generated nodes belong to the network");
        manip.change_latch(latches[0], x, ResetValue::Zero)
            .expect("Generated nodes belong to the network");
        for i in 1..len {
            manip
                .change_latch(latches[i], latches[i - 1], ResetValue::Zero)
                .expect("Generated nodes belong to the network");
        }
        let o = manip.new_output(Some("o")).expect("Generated names are unique");
        manip.change_output(o, x).expect("Generated nodes belong to the network");
        ret.check();
        ret
    }

    /// A chain of buffers and inverters, ending in an output
    pub fn inverter_chain(len: usize) -> BNetwork {
        let mut ret = BNetwork::new();
        let mut manip = BNetManip::new(&mut ret);
        let mut x = manip.new_input(Some("i")).expect("Generated names are unique");
        for i in 0..len {
            x = if i % 2 == 0 {
                manip.make_inverter(x, None).expect("Generated nodes belong to the network")
            } else {
                manip.make_buffer(x, None).expect("Generated nodes belong to the network")
            };
        }
        let o = manip.new_output(Some("o")).expect("Generated names are unique");
        manip.change_output(o, x).expect("Generated nodes belong to the network");
        ret.check();
        ret
    }
}
