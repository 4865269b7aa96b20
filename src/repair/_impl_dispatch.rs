use crate::classifier::{classify_all, Classification};
use crate::diagnosis::{InconsistentNode, RepairType};
use crate::lattice::MAX_ARITY;
use crate::repair::{NodeSearch, TopologyEdits};
use crate::{Function, Network};
use tracing::{debug, warn};

impl NodeSearch<'_> {
    /// The record of the searched node, if it already has at least one repair.
    pub(super) fn repaired_node(&self) -> Option<&InconsistentNode> {
        self.diagnosis
            .get_inconsistent_node(self.node)
            .filter(|n| n.is_repaired())
    }

    /// Classify `function` against the observations of the diagnosis.
    pub(super) fn classify(&self, network: &Network, function: &Function) -> Classification {
        classify_all(network, function, self.diagnosis.get_profiles())
    }

    /// Record a repair consisting of the given edits and (optionally) a new function.
    pub(super) fn record(&mut self, edits: TopologyEdits, function: Option<Function>) -> bool {
        let mut repair = edits.to_repair_set();
        if let Some(function) = function {
            repair = repair.with_function(function);
        }
        self.diagnosis.add_repair_set(self.node, repair)
    }

    /// Decide whether the topology edits alone repair the node, and if not, search for a
    /// replacement function.
    ///
    /// A node with a topological error can only be repaired by changing its topology.
    pub(super) fn dispatch(&mut self, network: &Network, edits: TopologyEdits) -> bool {
        let function = network.get_function(self.node).clone();
        let node_name = network.get_node_name(self.node);

        let classification = if edits.is_empty() {
            let Some(inconsistent) = self.diagnosis.get_inconsistent_node(self.node) else {
                return false;
            };
            if inconsistent.has_topological_error() {
                return false;
            }
            match inconsistent.get_repair_type() {
                RepairType::Generalize => Classification::SingleGeneralize,
                RepairType::Particularize => Classification::SingleParticularize,
                RepairType::Double => Classification::Double,
                RepairType::Topological => self.classify(network, &function),
            }
        } else {
            let classification = self.classify(network, &function);
            if classification.is_consistent() {
                debug!(node = node_name, "Consistent with topology changes only.");
                let rebuilt = (edits.n_add_remove() > 0).then(|| (*function).clone());
                self.record(edits, rebuilt);
                return true;
            }
            classification
        };

        if classification.is_consistent() {
            warn!(node = node_name, "Node is consistent before any repair.");
            return false;
        }

        if let Some(repaired) = self.repaired_node() {
            let n_add_remove = repaired.n_add_remove_operations();
            let n_flips = repaired.n_flip_operations();
            if n_add_remove == edits.n_add_remove()
                && n_flips == edits.flipped.len()
                && repaired.n_repair_operations() == n_add_remove + n_flips
            {
                debug!(node = node_name, "Better repair already known, no function search.");
                return false;
            }
        }

        if function.num_regulators() > MAX_ARITY {
            warn!(
                node = node_name,
                regulators = function.num_regulators(),
                "Too many regulators for a function search."
            );
            return false;
        }

        if classification == Classification::Double {
            // Topology changes reset the function, which leaves no monotone way to fix
            // a double inconsistency.
            if edits.n_add_remove() > 0 {
                return false;
            }
            self.search_non_comparable(network, &function, edits)
        } else {
            let generalize = classification == Classification::SingleGeneralize;
            self.search_comparable(network, &function, edits, generalize)
        }
    }
}
