use crate::diagnosis::{Diagnosis, RepairSet};
use crate::Network;

impl Diagnosis {
    /// A human-readable description of the repairs of this diagnosis.
    ///
    /// If `print_all` is false, only the first repair set of every node is listed.
    pub fn to_report(&self, network: &Network, print_all: bool) -> String {
        let mut out = format!(
            "### Found solution with {} repair operations.\n",
            self.n_repair_operations
        );
        for node in self.inconsistent_nodes() {
            out.push_str(&format!(
                "\tInconsistent node {}.\n",
                network.get_node_name(node.get_id())
            ));
            for (i, repair) in node.get_repair_sets().iter().enumerate() {
                if print_all {
                    out.push_str(&format!("\t\tRepair #{}:\n", i + 1));
                }
                for line in repair.describe(network) {
                    out.push_str(&format!("\t\t\t{}\n", line));
                }
                if !print_all {
                    break;
                }
            }
        }
        out
    }

    /// A compact machine-readable description of the repairs of this diagnosis.
    ///
    /// The flat format (`nested == false`) looks like `b@E,a,b:F,a || c/c@...`, the nested
    /// one like `[b:{{E:(a,b);F:a || c}};c:{...}]`.
    pub fn to_parsable_string(&self, network: &Network, nested: bool) -> String {
        let (node_sep, item_sep) = if nested { (";", ";") } else { ("/", ":") };
        let nodes: Vec<String> = self
            .inconsistent_nodes()
            .map(|node| {
                let repairs: Vec<String> = node
                    .get_repair_sets()
                    .iter()
                    .map(|repair| {
                        let items = parsable_items(network, repair, nested).join(item_sep);
                        if nested {
                            format!("{{{}}}", items)
                        } else {
                            items
                        }
                    })
                    .collect();
                let name = network.get_node_name(node.get_id());
                if nested {
                    format!("{}:{{{}}}", name, repairs.join(item_sep))
                } else {
                    format!("{}@{}", name, repairs.join(item_sep))
                }
            })
            .collect();
        if nested {
            format!("[{}]", nodes.join(node_sep))
        } else {
            nodes.join(node_sep)
        }
    }

    /// A short summary of the inconsistent nodes and profiles (without repairs).
    pub fn to_inconsistency_summary(&self, network: &Network) -> String {
        let nodes: Vec<String> = self
            .inconsistent_nodes()
            .map(|n| format!("\"{}\"", network.get_node_name(n.get_id())))
            .collect();
        let profiles: Vec<String> = self
            .get_inconsistent_profiles()
            .keys()
            .map(|p| format!("\"{}\"", p))
            .collect();
        format!(
            "\"nodes\": [{}],\n\"profiles\": [{}]",
            nodes.join(","),
            profiles.join(",")
        )
    }
}

/// **(internal)** Individual operations of a repair set in the parsable format.
fn parsable_items(network: &Network, repair: &RepairSet, nested: bool) -> Vec<String> {
    let mut items = Vec::new();
    for e in repair.get_added_edges() {
        let start = network.get_node_name(e.get_start());
        let end = network.get_node_name(e.get_end());
        let sign = e.get_sign().to_bit();
        items.push(if nested {
            format!("A:({},{},{})", start, end, sign)
        } else {
            format!("A,{},{},{}", start, end, sign)
        });
    }
    for (tag, edges) in [("R", repair.get_removed_edges()), ("E", repair.get_flipped_edges())] {
        for e in edges {
            let start = network.get_node_name(e.get_start());
            let end = network.get_node_name(e.get_end());
            items.push(if nested {
                format!("{}:({},{})", tag, start, end)
            } else {
                format!("{},{},{}", tag, start, end)
            });
        }
    }
    for f in repair.get_repaired_functions() {
        let function = f.to_string(network);
        items.push(if nested {
            format!("F:{}", function)
        } else {
            format!("F,{}", function)
        });
    }
    items
}
