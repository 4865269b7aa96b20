use crate::diagnosis::RepairSet;
use crate::{Edge, Function, Network};

impl RepairSet {
    /// A repair set consisting of the given topology changes and no function replacement.
    pub fn new(flipped: &[Edge], removed: &[Edge], added: &[Edge]) -> RepairSet {
        RepairSet {
            repaired_functions: Vec::new(),
            flipped_edges: flipped.to_vec(),
            removed_edges: removed.to_vec(),
            added_edges: added.to_vec(),
        }
    }

    /// Extend this repair set with a replacement function.
    pub fn with_function(mut self, function: Function) -> RepairSet {
        self.repaired_functions.push(function);
        self
    }

    pub fn get_repaired_functions(&self) -> &[Function] {
        &self.repaired_functions
    }

    pub fn get_flipped_edges(&self) -> &[Edge] {
        &self.flipped_edges
    }

    pub fn get_removed_edges(&self) -> &[Edge] {
        &self.removed_edges
    }

    pub fn get_added_edges(&self) -> &[Edge] {
        &self.added_edges
    }

    /// Flips, additions and removals.
    pub fn n_topology_changes(&self) -> usize {
        self.flipped_edges.len() + self.removed_edges.len() + self.added_edges.len()
    }

    /// Topology changes and function replacements.
    pub fn n_repair_operations(&self) -> usize {
        self.n_topology_changes() + self.repaired_functions.len()
    }

    pub fn n_add_remove_operations(&self) -> usize {
        self.removed_edges.len() + self.added_edges.len()
    }

    pub fn n_flip_operations(&self) -> usize {
        self.flipped_edges.len()
    }

    /// **(internal)** Ranking key of this repair set: additions and removals, then flips,
    /// then all operations. Smaller is better.
    pub(crate) fn rank(&self) -> (usize, usize, usize) {
        (
            self.n_add_remove_operations(),
            self.n_flip_operations(),
            self.n_repair_operations(),
        )
    }

    /// Structural equality: the same functions (up to term ordering) and the same edges
    /// (with the same signs) in every category.
    pub fn is_equal(&self, other: &RepairSet) -> bool {
        fn same_edges(a: &[Edge], b: &[Edge]) -> bool {
            a.len() == b.len()
                && a.iter().all(|x| {
                    b.iter()
                        .any(|y| x.same_pair(y) && x.get_sign() == y.get_sign())
                })
        }
        self.repaired_functions.len() == other.repaired_functions.len()
            && self
                .repaired_functions
                .iter()
                .all(|f| other.repaired_functions.iter().any(|g| f.is_equal(g)))
            && same_edges(&self.flipped_edges, &other.flipped_edges)
            && same_edges(&self.removed_edges, &other.removed_edges)
            && same_edges(&self.added_edges, &other.added_edges)
    }

    /// Human-readable list of the operations, one per line.
    pub fn describe(&self, network: &Network) -> Vec<String> {
        let mut lines = Vec::new();
        for function in &self.repaired_functions {
            lines.push(format!(
                "Change function of {} to {}.",
                network.get_node_name(function.get_target()),
                function.to_string(network)
            ));
        }
        for edge in &self.flipped_edges {
            lines.push(format!("Flip sign of edge {}.", edge.to_string(network)));
        }
        for edge in &self.removed_edges {
            lines.push(format!("Remove edge {}.", edge.to_string(network)));
        }
        for edge in &self.added_edges {
            lines.push(format!(
                "Add edge {} with sign {}.",
                edge.to_string(network),
                edge.get_sign().to_bit()
            ));
        }
        lines
    }
}
