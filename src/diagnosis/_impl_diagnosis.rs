use crate::diagnosis::{Diagnosis, InconsistentNode, Profile, RepairSet, RepairType};
use crate::NodeId;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Methods for building a `Diagnosis` (used by consistency oracles).
impl Diagnosis {
    /// A diagnosis with no inconsistent nodes over the given completed profiles.
    pub fn new(profiles: Vec<Profile>) -> Diagnosis {
        Diagnosis {
            nodes: BTreeMap::new(),
            profiles,
            inconsistent_profiles: BTreeMap::new(),
            has_impossibility: false,
            n_topology_changes: 0,
            n_add_remove_operations: 0,
            n_flip_operations: 0,
            n_repair_operations: 0,
        }
    }

    /// Mark `node` as requiring a generalization.
    pub fn add_generalization(&mut self, node: NodeId) {
        self.add_repair_type(node, RepairType::Generalize);
    }

    /// Mark `node` as requiring a particularization.
    pub fn add_particularization(&mut self, node: NodeId) {
        self.add_repair_type(node, RepairType::Particularize);
    }

    /// Mark `node` as having a topological error.
    pub fn add_topological_error(&mut self, node: NodeId) {
        self.nodes
            .entry(node)
            .or_insert_with(|| InconsistentNode::new(node, RepairType::Topological))
            .set_topological_error(true);
    }

    /// **(internal)** Create or update the required repair direction of a node.
    fn add_repair_type(&mut self, node: NodeId, repair_type: RepairType) {
        match self.nodes.get_mut(&node) {
            Some(inconsistent) => {
                let merged = inconsistent.get_repair_type().merge(repair_type);
                inconsistent.set_repair_type(merged);
            }
            None => {
                self.nodes
                    .insert(node, InconsistentNode::new(node, repair_type));
            }
        }
    }

    /// Record that `node` is inconsistent with the profile of the given name.
    pub fn add_inconsistent_profile(&mut self, profile: &str, node: NodeId) {
        let nodes = self
            .inconsistent_profiles
            .entry(profile.to_string())
            .or_default();
        if !nodes.contains(&node) {
            nodes.push(node);
        }
    }
}

/// Methods for inspecting and extending a `Diagnosis`.
impl Diagnosis {
    /// Inconsistent nodes ordered by their id.
    pub fn inconsistent_nodes(&self) -> impl Iterator<Item = &InconsistentNode> {
        self.nodes.values()
    }

    /// Ids of all inconsistent nodes.
    pub fn inconsistent_node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    pub fn get_inconsistent_node(&self, node: NodeId) -> Option<&InconsistentNode> {
        self.nodes.get(&node)
    }

    pub fn num_inconsistent_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The completed observations of this diagnosis.
    pub fn get_profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Names of inconsistent profiles together with the nodes inconsistent in them.
    pub fn get_inconsistent_profiles(&self) -> &BTreeMap<String, Vec<NodeId>> {
        &self.inconsistent_profiles
    }

    pub fn has_impossibility(&self) -> bool {
        self.has_impossibility
    }

    pub fn set_impossibility(&mut self, value: bool) {
        self.has_impossibility = value;
    }

    pub fn n_topology_changes(&self) -> usize {
        self.n_topology_changes
    }

    pub fn n_add_remove_operations(&self) -> usize {
        self.n_add_remove_operations
    }

    pub fn n_flip_operations(&self) -> usize {
        self.n_flip_operations
    }

    pub fn n_repair_operations(&self) -> usize {
        self.n_repair_operations
    }

    /// Attach a repair set to an inconsistent node and update the operation counters.
    ///
    /// The counters always reflect the best repair set of every node. Returns `true` if
    /// the node kept the repair set (see `InconsistentNode::add_repair_set`).
    pub fn add_repair_set(&mut self, node: NodeId, repair: RepairSet) -> bool {
        let Some(target) = self.nodes.get_mut(&node) else {
            return false;
        };
        if !target.is_repaired() {
            self.n_topology_changes += repair.n_topology_changes();
            self.n_add_remove_operations += repair.n_add_remove_operations();
            self.n_flip_operations += repair.n_flip_operations();
            self.n_repair_operations += repair.n_repair_operations();
        } else if target.is_worse(&repair) {
            return false;
        } else if target.is_better(&repair) {
            self.n_topology_changes =
                self.n_topology_changes - target.n_topology_changes() + repair.n_topology_changes();
            self.n_add_remove_operations = self.n_add_remove_operations
                - target.n_add_remove_operations()
                + repair.n_add_remove_operations();
            self.n_flip_operations =
                self.n_flip_operations - target.n_flip_operations() + repair.n_flip_operations();
            self.n_repair_operations = self.n_repair_operations - target.n_repair_operations()
                + repair.n_repair_operations();
        }
        target.add_repair_set(repair)
    }

    /// Rank two diagnoses by their operation counters.
    ///
    /// The counters are compared lexicographically: additions and removals first, then
    /// flips, then all operations. A diagnosis with fewer operations is `Greater`.
    pub fn compare_repairs(&self, other: &Diagnosis) -> Ordering {
        other.rank().cmp(&self.rank())
    }

    /// **(internal)** The counters in the order in which they are ranked.
    fn rank(&self) -> (usize, usize, usize) {
        (
            self.n_add_remove_operations,
            self.n_flip_operations,
            self.n_repair_operations,
        )
    }
}
