//! IO for .bench (ISCAS) files

use std::io::{BufRead, BufReader, Read, Write};

use fxhash::{FxHashMap, FxHashSet};
use volute::Lut;

use crate::lexp::LogExpr;
use crate::network::{BNetManip, BNetwork, NodeId, ResetValue};

use super::utils::fresh_name;

/// Function of a LUT gate, as a sum of minterms
fn lut_function(nb_inputs: usize, hex: &str) -> Result<LogExpr, String> {
    let lut = Lut::from_hex_string(nb_inputs, hex)
        .map_err(|_| format!("Invalid LUT 0x{} with {} inputs", hex, nb_inputs))?;
    let minterms = (0..1usize << nb_inputs)
        .filter(|m| lut.value(*m))
        .map(|m| LogExpr::and((0..nb_inputs).map(|i| LogExpr::literal(i, (m >> i) & 1 == 0))));
    Ok(LogExpr::or(minterms))
}

/// Function of a gate over its inputs, in order
fn gate_function(gate: &str, nb_inputs: usize) -> Result<LogExpr, String> {
    let expect = |n: usize| {
        if nb_inputs == n {
            Ok(())
        } else {
            Err(format!("{} gate with {} inputs, expected {}", gate, nb_inputs, n))
        }
    };
    let nary = || {
        if nb_inputs == 0 {
            Err(format!("{} gate with no input", gate))
        } else {
            Ok(())
        }
    };
    let v = LogExpr::posi_literal;
    let ret = match gate.to_uppercase().as_str() {
        "BUF" | "BUFF" => {
            expect(1)?;
            v(0)
        }
        "NOT" => {
            expect(1)?;
            !v(0)
        }
        "VDD" => {
            expect(0)?;
            LogExpr::one()
        }
        "VSS" | "GND" => {
            expect(0)?;
            LogExpr::zero()
        }
        "AND" => {
            nary()?;
            LogExpr::and_n(nb_inputs)
        }
        "NAND" => {
            nary()?;
            !LogExpr::and_n(nb_inputs)
        }
        "OR" => {
            nary()?;
            LogExpr::or_n(nb_inputs)
        }
        "NOR" => {
            nary()?;
            !LogExpr::or_n(nb_inputs)
        }
        "XOR" => {
            nary()?;
            LogExpr::xor_n(nb_inputs)
        }
        "XNOR" => {
            nary()?;
            !LogExpr::xor_n(nb_inputs)
        }
        "MUX" => {
            expect(3)?;
            (v(0) & v(1)) | (!v(0) & v(2))
        }
        "MAJ" => {
            expect(3)?;
            (v(0) & v(1)) | (v(0) & v(2)) | (v(1) & v(2))
        }
        _ => match gate.strip_prefix("LUT 0x") {
            Some(hex) => lut_function(nb_inputs, hex.trim())?,
            None => return Err(format!("Unknown gate type {}", gate)),
        },
    };
    Ok(ret)
}

/// Node for a gate input; vdd and gnd are created on first use if not defined
fn source(
    manip: &mut BNetManip,
    name_to_node: &mut FxHashMap<String, NodeId>,
    name: &str,
) -> Result<NodeId, String> {
    if let Some(n) = name_to_node.get(name) {
        return Ok(*n);
    }
    // ABC-style naming for constant signals
    let val = match name {
        "vdd" => true,
        "gnd" => false,
        _ => return Err(format!("Gate input {} is not generated anywhere", name)),
    };
    let n = manip
        .make_const(val, Some(name))
        .map_err(|e| e.to_string())?;
    name_to_node.insert(name.to_owned(), n);
    Ok(n)
}

fn network_from_statements(
    statements: &[Vec<String>],
    inputs: &[String],
    outputs: &[String],
) -> Result<BNetwork, String> {
    let mut ret = BNetwork::new();
    let mut manip = BNetManip::new(&mut ret);
    let mut name_to_node = FxHashMap::default();

    for name in inputs {
        let n = manip
            .new_input(Some(name))
            .map_err(|_| format!("{} is defined twice", name))?;
        name_to_node.insert(name.clone(), n);
    }
    for s in statements {
        let n = if s[1].eq_ignore_ascii_case("DFF") {
            manip.new_latch(Some(&s[0]))
        } else {
            manip.new_logic(Some(&s[0]))
        }
        .map_err(|_| format!("{} is defined twice", s[0]))?;
        name_to_node.insert(s[0].clone(), n);
    }

    for s in statements {
        let node = name_to_node[&s[0]];
        let fanins = s[2..]
            .iter()
            .map(|n| source(&mut manip, &mut name_to_node, n))
            .collect::<Result<Vec<_>, _>>()?;
        if s[1].eq_ignore_ascii_case("DFF") {
            if fanins.len() != 1 {
                return Err(format!("DFF gate with {} inputs, expected 1", fanins.len()));
            }
            manip
                .change_latch(node, fanins[0], ResetValue::Zero)
                .map_err(|e| e.to_string())?;
        } else {
            let func = gate_function(&s[1], fanins.len())?;
            manip
                .change_logic(node, func, &fanins, true)
                .map_err(|e| e.to_string())?;
        }
    }

    for name in outputs {
        let src = source(&mut manip, &mut name_to_node, name)?;
        let o = manip
            .new_output(Some(name))
            .map_err(|_| format!("Output {} is defined twice", name))?;
        manip.change_output(o, src).map_err(|e| e.to_string())?;
    }
    Ok(ret)
}

/// Read a network in .bench format, as used by the ISCAS benchmarks
///
/// These files describe the design with simple statements like:
/// ```text
///     # This is a comment
///     INPUT(i0)
///     INPUT(i1)
///     x0 = AND(i0, i1)
///     x1 = NAND(x0, i1)
///     x2 = OR(x0, i0)
///     x3 = NOR(i0, x1)
///     x4 = XOR(x3, x2)
///     x5 = BUF(x4)
///     x6 = NOT(x5)
///     x7 = gnd
///     x8 = vdd
///     x9 = DFF(x6)
///     OUTPUT(x0)
/// ```
/// MUX, MAJ and `LUT 0x..` gates are accepted as well. Flip-flops reset to zero.
pub fn read_bench<R: Read>(r: R) -> Result<BNetwork, String> {
    let mut statements = Vec::new();
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for l in BufReader::new(r).lines() {
        let s = l.map_err(|e| format!("Error during file IO: {}", e))?;
        let t = s.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        if !t.contains('=') {
            let parts: Vec<_> = t
                .split(&['(', ')'])
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() != 2 {
                return Err(format!("Invalid statement: {}", t));
            }
            if ["INPUT", "PINPUT"].contains(&parts[0]) {
                inputs.push(parts[1].to_owned());
            } else if ["OUTPUT", "POUTPUT"].contains(&parts[0]) {
                outputs.push(parts[1].to_owned());
            } else {
                return Err(format!("Unknown keyword {}", parts[0]));
            }
        } else {
            let parts: Vec<_> = t
                .split(&['=', '(', ',', ')'])
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() < 2 {
                return Err(format!("Invalid statement: {}", t));
            }
            statements.push(parts);
        }
    }
    network_from_statements(&statements, &inputs, &outputs)
}

struct BenchWriter<'a, W: Write> {
    w: &'a mut W,
    net: &'a BNetwork,
    used: FxHashSet<String>,
    inverted: FxHashMap<NodeId, String>,
}

impl<'a, W: Write> BenchWriter<'a, W> {
    /// Name of the inverted signal of a node, created on first use
    fn inverted(&mut self, node: NodeId) -> std::io::Result<String> {
        if let Some(name) = self.inverted.get(&node) {
            return Ok(name.clone());
        }
        let base = format!("{}_n", self.net.name(node));
        let name = fresh_name(self.net, &mut self.used, &base);
        writeln!(self.w, "{} = NOT({})", name, self.net.name(node))?;
        self.inverted.insert(node, name.clone());
        Ok(name)
    }

    fn constant(&mut self, val: bool) -> std::io::Result<String> {
        let name = if val { "vdd" } else { "gnd" };
        if self.net.find_node(name).is_none() {
            return Ok(name.to_owned());
        }
        let fresh = fresh_name(self.net, &mut self.used, name);
        writeln!(self.w, "{} = {}", fresh, name)?;
        Ok(fresh)
    }

    /// Signal for an operand; operands that are not literals get their own line
    fn operand(&mut self, expr: &LogExpr, fanins: &[NodeId], base: &str) -> std::io::Result<String> {
        if let Some(lit) = expr.as_literal() {
            let f = fanins[lit.var()];
            return if lit.is_inverted() {
                self.inverted(f)
            } else {
                Ok(self.net.name(f).to_owned())
            };
        }
        if expr.is_constant() {
            return self.constant(expr.is_one());
        }
        let name = fresh_name(self.net, &mut self.used, &format!("{}_t", base));
        let rhs = self.gate(expr, fanins, base)?;
        writeln!(self.w, "{} = {}", name, rhs)?;
        Ok(name)
    }

    /// Right-hand side of the statement defining `expr`
    fn gate(&mut self, expr: &LogExpr, fanins: &[NodeId], base: &str) -> std::io::Result<String> {
        if expr.is_constant() {
            return Ok(if expr.is_one() { "vdd" } else { "gnd" }.to_owned());
        }
        if let Some(lit) = expr.as_literal() {
            let tp = if lit.is_inverted() { "NOT" } else { "BUF" };
            return Ok(format!("{}({})", tp, self.net.name(fanins[lit.var()])));
        }
        let children = expr.children();
        let nb_inv = children.iter().filter(|c| c.is_nega_literal()).count();
        let tp = if expr.is_xor() {
            if nb_inv % 2 == 1 {
                "XNOR"
            } else {
                "XOR"
            }
        } else if nb_inv == children.len() {
            if expr.is_and() {
                "NOR"
            } else {
                "NAND"
            }
        } else if expr.is_and() {
            "AND"
        } else {
            "OR"
        };
        let strip_inversions = expr.is_xor() || nb_inv == children.len();
        let mut args = Vec::with_capacity(children.len());
        for c in children {
            match c.as_literal() {
                Some(lit) if strip_inversions => args.push(self.net.name(fanins[lit.var()]).to_owned()),
                _ => args.push(self.operand(c, fanins, base)?),
            }
        }
        Ok(format!("{}({})", tp, args.join(", ")))
    }
}

/// Write a network in .bench format, as used by the ISCAS benchmarks
///
/// Each logic node becomes a gate when its function allows it; other functions are
/// written with intermediate gates. Inverted fanins are written as NOT gates with a
/// `_n` suffix. Latches become DFF gates, whose reset value is not represented.
pub fn write_bench<W: Write>(w: &mut W, net: &BNetwork) -> std::io::Result<()> {
    writeln!(w, "# .bench (ISCAS) file")?;
    writeln!(w, "# Generated by bnet")?;
    for n in net.inputs() {
        writeln!(w, "INPUT({})", net.name(n))?;
    }
    writeln!(w)?;
    for n in net.outputs() {
        writeln!(w, "OUTPUT({})", net.name(n))?;
    }
    writeln!(w)?;

    let mut writer = BenchWriter {
        w,
        net,
        used: FxHashSet::default(),
        inverted: FxHashMap::default(),
    };
    for n in net.latches() {
        let d = match net.node(n).driver() {
            Some(d) => net.name(d).to_owned(),
            None => writer.constant(false)?,
        };
        writeln!(writer.w, "{} = DFF({})", net.name(n), d)?;
    }
    for n in net.logic_nodes() {
        let node = net.node(n);
        let rhs = writer.gate(node.func(), node.fanins(), node.name())?;
        writeln!(writer.w, "{} = {}", node.name(), rhs)?;
    }
    for n in net.outputs() {
        let node = net.node(n);
        match node.driver() {
            Some(d) if net.name(d) == node.name() => (),
            Some(d) => writeln!(writer.w, "{} = BUF({})", node.name(), net.name(d))?,
            None => writeln!(writer.w, "{} = gnd", node.name())?,
        }
    }
    Ok(())
}
