//! Read and write logic networks to files

mod bench;
mod blif;
mod utils;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub use bench::{read_bench, write_bench};
pub use blif::{read_blif, write_blif};

use crate::network::BNetwork;

fn extension(path: &Path) -> Result<String, String> {
    match path.extension() {
        None => Err(format!("No extension given for {}", path.display())),
        Some(s) => Ok(s.to_string_lossy().to_lowercase()),
    }
}

/// Read a logic network from a file
///
/// Following extensions are supported: .bench, .blif
pub fn read_network_file(path: &Path) -> Result<BNetwork, String> {
    let ext = extension(path)?;
    let f = File::open(path).map_err(|e| format!("Cannot open {}: {}", path.display(), e))?;
    match ext.as_str() {
        "bench" => read_bench(f),
        "blif" => read_blif(f),
        _ => Err(format!("Unknown extension {}", ext)),
    }
}

/// Write a logic network to a file
///
/// Following extensions are supported: .bench, .blif
pub fn write_network_file(path: &Path, net: &BNetwork) -> Result<(), String> {
    let ext = extension(path)?;
    if ext != "bench" && ext != "blif" {
        return Err(format!("Unknown extension {}", ext));
    }
    let f = File::create(path).map_err(|e| format!("Cannot create {}: {}", path.display(), e))?;
    let mut w = BufWriter::new(f);
    let res = if ext == "bench" {
        write_bench(&mut w, net)
    } else {
        write_blif(&mut w, net)
    };
    res.map_err(|e| format!("Error while writing {}: {}", path.display(), e))
}
