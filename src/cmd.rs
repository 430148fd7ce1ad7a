//! Command line interface

use std::path::PathBuf;

use bnet::io::{read_network_file, write_network_file};
use bnet::network::stats::stats;
use bnet::network::BNetwork;
use bnet::optim::{
    decomp_balanced, decomp_random, eliminate, gate_decomp_balanced, gate_decomp_random,
    sop_decomp, GateMask,
};
use bnet::sim::check_equivalence;
use clap::{Args, Parser, Subcommand};
use kdam::{tqdm, BarExt};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a logic network
    ///
    /// Will print statistics on the number of inputs, outputs and nodes in the network,
    /// and the kinds of gates they implement.
    #[clap()]
    Show(ShowArgs),

    /// Optimize a logic network
    ///
    /// The optimization script is a list of passes separated by semicolons, such as
    /// "sweep; eliminate 0; decomp --max-fanin 2". Available passes are:
    ///   * sweep: remove constant, buffer and unused nodes
    ///   * clean [--remove-inputs]: remove unused nodes
    ///   * simplify: simplify the node expressions
    ///   * eliminate THRESHOLD [--limit N] [--no-auto-limit]: collapse nodes into their fanouts
    ///   * decomp [--max-fanin N] [--xor] [--random] [--seed S]: decompose into simple gates
    ///   * gate-decomp TYPES... [--max-fanin N] [--random] [--seed S]: decompose into given gate types
    ///   * sop-decomp: put every node in sum-of-products form
    #[clap(alias = "opt")]
    Optimize(OptArgs),

    /// Check equivalence between two logic networks
    ///
    /// Inputs, outputs and latches are matched by name, and the networks are compared
    /// exhaustively. The command will fail if the two networks are not equivalent.
    #[clap(alias = "equiv")]
    CheckEquivalence(EquivArgs),
}

/// Command arguments for equivalence checking
#[derive(Args)]
pub struct EquivArgs {
    /// First network to compare
    file1: PathBuf,
    /// Second network to compare
    file2: PathBuf,
}

impl EquivArgs {
    pub fn run(&self) -> Result<(), String> {
        let net1 = read_network_file(&self.file1)?;
        let net2 = read_network_file(&self.file2)?;
        match check_equivalence(&net1, &net2) {
            Err(err) => {
                println!("Networks are not equivalent: {}", err);
                std::process::exit(1);
            }
            Ok(()) => {
                println!("Networks are equivalent");
                Ok(())
            }
        }
    }
}

/// Command arguments for optimization
#[derive(Args)]
pub struct OptArgs {
    /// Network to optimize
    file: PathBuf,

    /// Output file for optimized network
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Optimization script
    #[arg(short = 's', long, default_value = "sweep; eliminate 0; sweep")]
    script: String,
}

impl OptArgs {
    pub fn run(&self) -> Result<(), String> {
        let passes = parse_script(&self.script)?;
        let mut net = read_network_file(&self.file)?;
        let mut progress = tqdm!(total = passes.len());
        progress.set_description("Passes");
        progress
            .write(format!(
                "Optimizing network with {} inputs, {} outputs, {} nodes and {} literals",
                net.input_num(),
                net.output_num(),
                net.logic_num(),
                net.litnum()
            ))
            .map_err(|e| e.to_string())?;
        for pass in &passes {
            pass.run(&mut net)?;
            progress.set_postfix(format!("nodes={}, literals={}", net.logic_num(), net.litnum()));
            progress.update(1).map_err(|e| e.to_string())?;
        }
        write_network_file(&self.output, &net)
    }
}

/// Command arguments for network informations
#[derive(Args)]
pub struct ShowArgs {
    /// Network to show
    file: PathBuf,
}

impl ShowArgs {
    pub fn run(&self) -> Result<(), String> {
        let net = read_network_file(&self.file)?;
        if !net.model_name().is_empty() {
            println!("Model {}", net.model_name());
        }
        println!("Network stats:\n{}\n", stats(&net));
        Ok(())
    }
}

/// A pass of an optimization script
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
enum Pass {
    /// Remove constant, buffer and unused nodes
    Sweep,
    /// Remove unused nodes
    Clean(CleanArgs),
    /// Simplify the node expressions
    Simplify,
    /// Collapse nodes into their fanouts
    Eliminate(EliminateArgs),
    /// Decompose into And, Or and Xor gates
    Decomp(DecompArgs),
    /// Decompose into the given gate types
    GateDecomp(GateDecompArgs),
    /// Put every node in sum-of-products form
    SopDecomp,
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Remove the inputs without fanouts as well
    #[arg(long)]
    remove_inputs: bool,
}

#[derive(Args, Debug)]
struct EliminateArgs {
    /// Nodes whose value is at most the threshold are eliminated
    #[arg(allow_negative_numbers = true)]
    threshold: i64,

    /// Maximum number of cubes of a node after elimination; 0 for no limit
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Do not limit the cube count to twice the largest in the network
    #[arg(long)]
    no_auto_limit: bool,
}

#[derive(Args, Debug)]
struct DecompArgs {
    /// Maximum number of inputs of a gate; below 2 for no limit
    #[arg(long, default_value_t = 2)]
    max_fanin: usize,

    /// Keep Xor gates instead of decomposing them into And and Or gates
    #[arg(long)]
    xor: bool,

    /// Build random trees instead of balanced ones
    #[arg(long)]
    random: bool,

    /// Seed for the random trees
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

#[derive(Args, Debug)]
struct GateDecompArgs {
    /// Allowed gate types, among and, nand, or, nor, xor and xnor
    #[arg(required = true)]
    types: Vec<GateMask>,

    /// Maximum number of inputs of a gate; below 2 for no limit
    #[arg(long, default_value_t = 2)]
    max_fanin: usize,

    /// Build random trees instead of balanced ones
    #[arg(long)]
    random: bool,

    /// Seed for the random trees
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

impl Pass {
    fn run(&self, net: &mut BNetwork) -> Result<(), String> {
        match self {
            Pass::Sweep => net.sweep(),
            Pass::Clean(args) => {
                net.clean_up();
                if args.remove_inputs {
                    net.delete_unused_input();
                }
            }
            Pass::Simplify => net.lexp_simplify(),
            Pass::Eliminate(args) => eliminate(net, args.threshold, args.limit, !args.no_auto_limit),
            Pass::Decomp(args) => {
                if args.random {
                    let mut rng = SmallRng::seed_from_u64(args.seed);
                    decomp_random(net, args.max_fanin, &mut rng, !args.xor);
                } else {
                    decomp_balanced(net, args.max_fanin, !args.xor);
                }
            }
            Pass::GateDecomp(args) => {
                let mask = args
                    .types
                    .iter()
                    .fold(GateMask::empty(), |acc, m| acc | *m);
                if !mask.intersects(GateMask::BASE) {
                    return Err(format!(
                        "Gate types {} need at least one of and, nand, or, nor",
                        mask
                    ));
                }
                if args.random {
                    let mut rng = SmallRng::seed_from_u64(args.seed);
                    gate_decomp_random(net, mask, args.max_fanin, &mut rng);
                } else {
                    gate_decomp_balanced(net, mask, args.max_fanin);
                }
            }
            Pass::SopDecomp => sop_decomp(net),
        }
        Ok(())
    }
}

/// Parse a script of passes separated by semicolons
fn parse_script(script: &str) -> Result<Vec<Pass>, String> {
    script
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            Pass::try_parse_from(s.split_whitespace())
                .map_err(|e| format!("Invalid pass \"{}\": {}", s, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use bnet::network::generators::{adder, random};
    use bnet::optim::GateMask;
    use bnet::sim::equivalent;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::{parse_script, Pass};

    #[test]
    fn test_parse_script() {
        let passes = parse_script(
            "sweep; eliminate -1 --limit 10;; decomp --max-fanin 3 --xor;\
             gate-decomp and,nor xor --random --seed 3; sop-decomp; clean --remove-inputs; simplify",
        )
        .unwrap();
        assert_eq!(passes.len(), 7);
        assert!(matches!(passes[0], Pass::Sweep));
        match &passes[1] {
            Pass::Eliminate(args) => {
                assert_eq!(args.threshold, -1);
                assert_eq!(args.limit, 10);
                assert!(!args.no_auto_limit);
            }
            p => panic!("Unexpected pass {:?}", p),
        }
        match &passes[2] {
            Pass::Decomp(args) => {
                assert_eq!(args.max_fanin, 3);
                assert!(args.xor);
                assert!(!args.random);
            }
            p => panic!("Unexpected pass {:?}", p),
        }
        match &passes[3] {
            Pass::GateDecomp(args) => {
                assert_eq!(args.types, vec![GateMask::AND | GateMask::NOR, GateMask::XOR]);
                assert!(args.random);
                assert_eq!(args.seed, 3);
            }
            p => panic!("Unexpected pass {:?}", p),
        }
        assert!(matches!(passes[4], Pass::SopDecomp));
        assert!(matches!(&passes[5], Pass::Clean(args) if args.remove_inputs));
        assert!(matches!(passes[6], Pass::Simplify));
    }

    #[test]
    fn test_parse_errors() {
        for script in ["foo", "eliminate", "decomp --max-fanin", "gate-decomp", "gate-decomp mux"] {
            assert!(parse_script(script).is_err(), "{}", script);
        }
    }

    #[test]
    fn test_run_script() {
        let script = "sweep; eliminate 2; sop-decomp; simplify; decomp --max-fanin 2 --random; \
                      eliminate 0 --no-auto-limit; gate-decomp nand --max-fanin 3; clean";
        let passes = parse_script(script).unwrap();
        let mut rng = SmallRng::seed_from_u64(6);
        let mut nets = vec![adder::ripple_carry(3)];
        nets.push(random::random_network(&mut rng, 6, 12, 3, 4));
        for reference in nets {
            let mut net = reference.clone();
            for pass in &passes {
                pass.run(&mut net).unwrap();
                net.check();
            }
            assert!(equivalent(&net, &reference));
        }
    }

    #[test]
    fn test_run_errors() {
        let passes = parse_script("gate-decomp xor,xnor").unwrap();
        let mut net = adder::ripple_carry(2);
        assert!(passes[0].run(&mut net).is_err());
    }
}
