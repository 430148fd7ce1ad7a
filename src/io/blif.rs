//! IO for .blif files

use std::io::{BufRead, BufReader, Read, Write};

use fxhash::{FxHashMap, FxHashSet};

use crate::lexp::LogExpr;
use crate::network::{BNetManip, BNetwork, NetError, NodeId, NodeKind, ResetValue};

use super::utils::fresh_name;

enum Statement {
    Model(String),
    End,
    Exdc,
    Inputs(Vec<String>),
    Outputs(Vec<String>),
    Latch {
        input: String,
        output: String,
        init: ResetValue,
    },
    Names(Vec<String>),
    Cube(String),
}

fn read_single_statement(tokens: Vec<&str>) -> Result<Statement, String> {
    let owned = |t: &[&str]| t.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>();
    match tokens[0] {
        ".model" => Ok(Statement::Model(
            tokens.get(1).map(|s| (*s).to_owned()).unwrap_or_default(),
        )),
        ".inputs" => Ok(Statement::Inputs(owned(&tokens[1..]))),
        ".outputs" => Ok(Statement::Outputs(owned(&tokens[1..]))),
        ".latch" => {
            if tokens.len() < 3 {
                return Err(format!("Invalid latch: {}", tokens.join(" ")));
            }
            // .latch input output [type control] [init]
            let init = match tokens.len() {
                4 | 6 => tokens[tokens.len() - 1]
                    .chars()
                    .next()
                    .map(ResetValue::from_char)
                    .unwrap_or_default(),
                _ => ResetValue::Unknown,
            };
            Ok(Statement::Latch {
                input: tokens[1].to_owned(),
                output: tokens[2].to_owned(),
                init,
            })
        }
        ".names" => Ok(Statement::Names(owned(&tokens[1..]))),
        ".end" => Ok(Statement::End),
        ".exdc" => Ok(Statement::Exdc),
        _ => {
            if tokens[0].starts_with('.') {
                Err(format!("{} construct is not supported", tokens[0]))
            } else {
                Ok(Statement::Cube(tokens.join(" ")))
            }
        }
    }
}

fn read_statements<R: Read>(r: R) -> Result<Vec<Statement>, String> {
    let mut ret: Vec<Statement> = Vec::new();

    // Buffer for multi-line statements
    let mut ss = String::new();

    for l in BufReader::new(r).lines() {
        let s = l.map_err(|e| format!("Error during file IO: {}", e))?;
        let comment_pos = s.find('#');

        ss += " ";
        ss += &s[0..comment_pos.unwrap_or(s.len())];

        let is_continuation = comment_pos.is_none() && ss.ends_with('\\');
        if is_continuation {
            ss.pop();
            continue;
        }

        let tokens: Vec<_> = ss.split_whitespace().collect();
        if !tokens.is_empty() {
            ret.push(read_single_statement(tokens)?);
        }
        ss.clear();
    }

    // Line continuation at the end of the file
    let tokens: Vec<_> = ss.split_whitespace().collect();
    if !tokens.is_empty() {
        ret.push(read_single_statement(tokens)?);
    }
    Ok(ret)
}

/// Function of a .names cover, over the variables in the order of the inputs
fn cover_to_expr(cubes: &[&String], nb_inputs: usize) -> Result<LogExpr, String> {
    let mut terms = Vec::new();
    let mut polarity = None;
    for s in cubes {
        let t = s.split_whitespace().collect::<Vec<_>>();
        let (cube_inputs, cube_pol) = match t.len() {
            2 => (t[0], t[1]),
            1 if nb_inputs == 0 => ("", t[0]),
            _ => return Err(format!("Invalid cube: {}", s)),
        };
        if cube_inputs.len() != nb_inputs {
            return Err(format!(
                "Invalid cube: {} has {} inputs, expected {}",
                s,
                cube_inputs.len(),
                nb_inputs
            ));
        }
        let mut lits = Vec::new();
        for (i, c) in cube_inputs.chars().enumerate() {
            match c {
                '0' => lits.push(LogExpr::nega_literal(i)),
                '1' => lits.push(LogExpr::posi_literal(i)),
                '-' => (),
                _ => return Err(format!("Invalid cube: {}", s)),
            }
        }
        let pol = match cube_pol {
            "0" => false,
            "1" => true,
            _ => return Err(format!("Invalid cube: {}", s)),
        };
        if *polarity.get_or_insert(pol) != pol {
            return Err("Inconsistent polarities in cubes".to_owned());
        }
        terms.push(LogExpr::and(lits));
    }
    let cover = LogExpr::or(terms);
    Ok(match polarity {
        Some(false) => !cover,
        _ => cover,
    })
}

fn lookup(name_to_node: &FxHashMap<&str, NodeId>, name: &str) -> Result<NodeId, String> {
    name_to_node
        .get(name)
        .copied()
        .ok_or_else(|| NetError::UnknownNode(name.to_owned()).to_string())
}

fn build_network(statements: &[Statement]) -> Result<BNetwork, String> {
    let mut ret = BNetwork::new();
    let mut manip = BNetManip::new(&mut ret);
    let mut name_to_node: FxHashMap<&str, NodeId> = FxHashMap::default();
    let mut found_model = false;
    let mut model_name = None;

    // Create all nodes first, so that they can be referenced before their definition
    let mut nb_statements = statements.len();
    for (i, statement) in statements.iter().enumerate() {
        let (names, kind): (&[String], NodeKind) = match statement {
            Statement::Model(name) => {
                if found_model {
                    return Err("Multiple models in the same file are not supported".to_owned());
                }
                found_model = true;
                model_name = Some(name.clone());
                continue;
            }
            Statement::Exdc => {
                nb_statements = i;
                break;
            }
            Statement::Inputs(inputs) => (inputs.as_slice(), NodeKind::Input),
            Statement::Latch { output, .. } => (std::slice::from_ref(output), NodeKind::Latch),
            Statement::Names(names) => {
                if names.is_empty() {
                    return Err(".names statement with no output".to_owned());
                }
                (&names[names.len() - 1..], NodeKind::Logic)
            }
            _ => continue,
        };
        for name in names {
            let node = match kind {
                NodeKind::Input => manip.new_input(Some(name)),
                NodeKind::Latch => manip.new_latch(Some(name)),
                _ => manip.new_logic(Some(name)),
            }
            .map_err(|_| format!("{} is defined twice", name))?;
            name_to_node.insert(name, node);
        }
    }

    // Then connect them
    for (i, statement) in statements[..nb_statements].iter().enumerate() {
        match statement {
            Statement::Outputs(outputs) => {
                for name in outputs {
                    let src = lookup(&name_to_node, name)?;
                    let o = manip
                        .new_output(Some(name))
                        .map_err(|_| format!("Output {} is defined twice", name))?;
                    manip.change_output(o, src).map_err(|e| e.to_string())?;
                }
            }
            Statement::Latch {
                input,
                output,
                init,
            } => {
                let src = lookup(&name_to_node, input)?;
                manip
                    .change_latch(name_to_node[output.as_str()], src, *init)
                    .map_err(|e| e.to_string())?;
            }
            Statement::Names(names) => {
                let node = name_to_node[names[names.len() - 1].as_str()];
                let fanins = names[..names.len() - 1]
                    .iter()
                    .map(|n| lookup(&name_to_node, n))
                    .collect::<Result<Vec<_>, _>>()?;
                let cubes: Vec<&String> = statements[i + 1..]
                    .iter()
                    .map_while(|s| match s {
                        Statement::Cube(c) => Some(c),
                        _ => None,
                    })
                    .collect();
                let func = cover_to_expr(&cubes, fanins.len())?;
                manip
                    .change_logic(node, func, &fanins, true)
                    .map_err(|e| e.to_string())?;
            }
            Statement::Cube(_) => {
                if i == 0 || !matches!(statements[i - 1], Statement::Names(_) | Statement::Cube(_))
                {
                    return Err("Cube outside of a .names statement".to_owned());
                }
            }
            Statement::End => {
                if !found_model {
                    return Err("End statement before the start of the model".to_owned());
                }
            }
            _ => (),
        }
    }
    if let Some(name) = model_name {
        ret.set_model_name(&name);
    }
    Ok(ret)
}

/// Read a network in .blif format
///
/// The format specification is available [here](https://course.ece.cmu.edu/~ee760/760docs/blif.pdf).
/// A single model is supported, with .inputs, .outputs, .names and .latch statements.
/// Covers with output value 0 give the complement of the listed cubes.
pub fn read_blif<R: Read>(r: R) -> Result<BNetwork, String> {
    let statements = read_statements(r)?;
    build_network(&statements)
}

/// Write one line of a cover, with a character per fanin
fn write_cube<W: Write>(w: &mut W, cube: &[(usize, bool)], nb_vars: usize) -> std::io::Result<()> {
    if nb_vars == 0 {
        return writeln!(w, "1");
    }
    let mut line = vec!['-'; nb_vars];
    for (var, inv) in cube {
        line[*var] = if *inv { '0' } else { '1' };
    }
    writeln!(w, "{} 1", line.into_iter().collect::<String>())
}

/// Write a network in .blif format
///
/// Logic nodes are written as covers of their sum-of-products expansion. An output whose
/// name differs from its driver gets a buffer.
pub fn write_blif<W: Write>(w: &mut W, net: &BNetwork) -> std::io::Result<()> {
    let mut used = FxHashSet::default();
    writeln!(w, "# .blif file")?;
    writeln!(w, "# Generated by bnet")?;
    writeln!(w)?;
    let model = if net.model_name().is_empty() {
        "bnet"
    } else {
        net.model_name()
    };
    writeln!(w, ".model {}", model)?;

    write!(w, ".inputs")?;
    for n in net.inputs() {
        write!(w, " {}", net.name(n))?;
    }
    writeln!(w)?;

    write!(w, ".outputs")?;
    for n in net.outputs() {
        write!(w, " {}", net.name(n))?;
    }
    writeln!(w)?;
    writeln!(w)?;

    for n in net.latches() {
        let node = net.node(n);
        let init = match node.reset_value() {
            ResetValue::Unknown => '3',
            r => r.to_char(),
        };
        match node.driver() {
            Some(d) => writeln!(w, ".latch {} {} {}", net.name(d), node.name(), init)?,
            None => {
                let d = fresh_name(net, &mut used, &format!("{}_undriven", node.name()));
                writeln!(w, ".names {}", d)?;
                writeln!(w, ".latch {} {} {}", d, node.name(), init)?;
            }
        }
    }
    writeln!(w)?;

    for n in net.logic_nodes() {
        let node = net.node(n);
        write!(w, ".names")?;
        for f in node.fanins() {
            write!(w, " {}", net.name(*f))?;
        }
        writeln!(w, " {}", node.name())?;
        for cube in node.func().to_cubes() {
            let cube: Vec<(usize, bool)> =
                cube.iter().map(|l| (l.var(), l.is_inverted())).collect();
            write_cube(w, &cube, node.fanin_num())?;
        }
    }

    for n in net.outputs() {
        let node = net.node(n);
        match node.driver() {
            Some(d) if net.name(d) == node.name() => (),
            Some(d) => {
                writeln!(w, ".names {} {}", net.name(d), node.name())?;
                writeln!(w, "1 1")?;
            }
            None => writeln!(w, ".names {}", node.name())?,
        }
    }
    writeln!(w, ".end")
}

#[cfg(test)]
mod tests {
    use super::{read_blif, write_blif};
    use crate::network::ResetValue;
    use crate::sim::{equivalent, truth_tables};

    const FULL_ADDER: &str = "# .blif file
  .model full_adder # Comment
 .inputs a b \\
  c
 .outputs s co

 .names a b c s
 100 1
 010 1
 001 1
 111 1

 .names a b c co  # Comment
 11- 1
 1-1 1
 -11 1
 .end
";

    #[test]
    fn test_read() {
        let net = read_blif(FULL_ADDER.as_bytes()).unwrap();
        net.check();
        assert_eq!(net.model_name(), "full_adder");
        assert_eq!(net.input_num(), 3);
        assert_eq!(net.output_num(), 2);
        assert_eq!(net.logic_num(), 2);
        let tt = truth_tables(&net);
        for m in 0..8usize {
            assert_eq!(tt[0].value(m), m.count_ones() % 2 == 1);
            assert_eq!(tt[1].value(m), m.count_ones() >= 2);
        }
    }

    #[test]
    fn test_roundtrip() {
        let net = read_blif(FULL_ADDER.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_blif(&mut buf, &net).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let net2 = read_blif(text.as_bytes()).unwrap();
        assert!(equivalent(&net, &net2));
    }

    #[test]
    fn test_latch_and_complement() {
        let example = ".model seq
.inputs a b
.outputs q n
.latch d q 1
.names a b d
11 0
.names q n
0 1
.names unused
.end
";
        let net = read_blif(example.as_bytes()).unwrap();
        net.check();
        assert_eq!(net.latch_num(), 1);
        let q = net.find_node("q").unwrap();
        assert_eq!(net.node(q).reset_value(), ResetValue::One);
        let d = net.find_node("d").unwrap();
        // Nand of a and b
        assert_eq!(net.node(d).func().to_cubes().len(), 2);
        let c = net.find_node("unused").unwrap();
        assert!(net.node(c).func().is_zero());

        let mut buf = Vec::new();
        write_blif(&mut buf, &net).unwrap();
        let net2 = read_blif(buf.as_slice()).unwrap();
        assert_eq!(net2.latch_num(), 1);
        assert!(equivalent(&net, &net2));
    }

    #[test]
    fn test_errors() {
        assert!(read_blif(".model a\n.inputs a a\n".as_bytes()).is_err());
        assert!(read_blif(".model a\n.outputs b\n".as_bytes()).is_err());
        assert!(read_blif(".model a\n.inputs a\n.names a b\n1 1 1\n".as_bytes()).is_err());
        assert!(read_blif(".model a\n.subckt foo\n".as_bytes()).is_err());
        // Combinational loop
        let cycle = ".model a\n.inputs i\n.names i y x\n11 1\n.names x y\n1 1\n";
        assert!(read_blif(cycle.as_bytes()).is_err());
    }
}
