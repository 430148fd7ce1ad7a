use fxhash::FxHashSet;

use crate::network::BNetwork;

/// Name not used by any node of the network nor already given out
pub fn fresh_name(net: &BNetwork, used: &mut FxHashSet<String>, base: &str) -> String {
    let mut name = base.to_owned();
    let mut i = 0;
    while net.find_node(&name).is_some() || net.find_output(&name).is_some() || used.contains(&name)
    {
        name = format!("{}_{}", base, i);
        i += 1;
    }
    used.insert(name.clone());
    name
}
