use crate::diagnosis::Diagnosis;
use crate::repair::_impl_combinations::combinations;
use crate::repair::{NetworkTrial, NodeSearch, SearchConfig};
use crate::Monotonicity::Activation;
use crate::{Edge, Function, Network, NodeId};
use std::rc::Rc;
use tracing::{debug, warn};

/// Search for minimal repairs of a single inconsistent `node` of the `diagnosis`.
///
/// Topologies are explored by an increasing number of edge additions and removals. Only
/// non-fixed edges used by the current function can be removed, and an activating edge can
/// be added from any node that is not yet a regulator (including the node itself). The
/// search stops at the first number of operations which yields a repair.
///
/// Every found repair is attached to the diagnosis. If there is none, the diagnosis is
/// marked as impossible. The `network` is restored before returning.
pub fn repair_node(
    network: &mut Network,
    diagnosis: &mut Diagnosis,
    node: NodeId,
    config: &SearchConfig,
) {
    let original = network.get_function(node).clone();
    let removable: Vec<Edge> = original
        .get_regulators()
        .iter()
        .filter_map(|r| network.find_edge(*r, node))
        .filter(|e| !e.is_fixed())
        .cloned()
        .collect();
    let addable: Vec<Edge> = network
        .nodes()
        .filter(|v| !original.get_regulators().contains(v))
        .filter(|v| network.find_edge(*v, node).is_none())
        .map(|v| Edge::new(v, node, Activation))
        .collect();
    let (max_remove, max_add) = (removable.len(), addable.len());

    let mut search = NodeSearch {
        diagnosis,
        node,
        config,
    };
    let mut found = false;
    'operations: for n_operations in 0..=(max_remove + max_add) {
        for n_add in 0..=n_operations.min(max_add) {
            let n_remove = n_operations - n_add;
            if n_remove > max_remove {
                continue;
            }
            debug!(
                node = network.get_node_name(node),
                n_add, n_remove, "Trying topology changes."
            );
            for added in combinations(&addable, n_add) {
                for removed in combinations(&removable, n_remove) {
                    let mut trial = NetworkTrial::new(network);
                    for edge in &removed {
                        trial.remove_edge(edge.get_start(), edge.get_end());
                    }
                    for edge in &added {
                        trial.add_edge(edge.clone());
                    }
                    if n_operations > 0 {
                        let regulators: Vec<NodeId> = original
                            .get_regulators()
                            .iter()
                            .filter(|r| !removed.iter().any(|e| e.get_start() == **r))
                            .cloned()
                            .chain(added.iter().map(|e| e.get_start()))
                            .collect();
                        let rebuilt = Function::mk_disjunction(node, &regulators);
                        trial.set_function(node, Rc::new(rebuilt));
                    }
                    if search.try_flips(&mut trial, &added, &removed) {
                        found = true;
                        if !config.all_opt {
                            break 'operations;
                        }
                    }
                }
            }
        }
        if found {
            break;
        }
    }

    if !found {
        warn!(node = network.get_node_name(node), "No repair found.");
        search.diagnosis.set_impossibility(true);
    }
}
