use crate::diagnosis::{InconsistentNode, RepairSet, RepairType};
use crate::NodeId;

impl RepairType {
    /// Combine two required directions. Opposite directions result in `Double`.
    pub fn merge(self, other: RepairType) -> RepairType {
        match (self, other) {
            (RepairType::Topological, x) | (x, RepairType::Topological) => x,
            (x, y) if x == y => x,
            _ => RepairType::Double,
        }
    }
}

impl InconsistentNode {
    pub fn new(id: NodeId, repair_type: RepairType) -> InconsistentNode {
        InconsistentNode {
            id,
            repair_type,
            topological_error: false,
            repaired: false,
            repair_sets: Vec::new(),
            n_topology_changes: 0,
            n_repair_operations: 0,
            n_add_remove_operations: 0,
            n_flip_operations: 0,
        }
    }

    pub fn get_id(&self) -> NodeId {
        self.id
    }

    pub fn get_repair_type(&self) -> RepairType {
        self.repair_type
    }

    pub(crate) fn set_repair_type(&mut self, repair_type: RepairType) {
        self.repair_type = repair_type;
    }

    pub fn has_topological_error(&self) -> bool {
        self.topological_error
    }

    pub(crate) fn set_topological_error(&mut self, value: bool) {
        self.topological_error = value;
    }

    /// True once at least one repair set was accepted.
    pub fn is_repaired(&self) -> bool {
        self.repaired
    }

    /// The best repair sets found so far (all of equal quality).
    pub fn get_repair_sets(&self) -> &[RepairSet] {
        &self.repair_sets
    }

    pub fn n_topology_changes(&self) -> usize {
        self.n_topology_changes
    }

    pub fn n_repair_operations(&self) -> usize {
        self.n_repair_operations
    }

    pub fn n_add_remove_operations(&self) -> usize {
        self.n_add_remove_operations
    }

    pub fn n_flip_operations(&self) -> usize {
        self.n_flip_operations
    }

    /// **(internal)** Ranking key of the best repair set recorded for this node.
    pub(crate) fn rank(&self) -> (usize, usize, usize) {
        (
            self.n_add_remove_operations,
            self.n_flip_operations,
            self.n_repair_operations,
        )
    }

    /// True if the given repair set is worse than the best one recorded for this node,
    /// i.e. it needs more additions and removals, or as many but more flips, or as many of
    /// both but more operations in total.
    pub fn is_worse(&self, repair: &RepairSet) -> bool {
        self.repaired && repair.rank() > self.rank()
    }

    /// True if the given repair set is strictly better than every recorded one (always
    /// true for a node without repairs).
    pub fn is_better(&self, repair: &RepairSet) -> bool {
        !self.repaired || repair.rank() < self.rank()
    }

    /// Record a new repair set.
    ///
    /// A worse repair set is ignored. A strictly better one replaces all stored ones,
    /// otherwise it is added next to them (unless an equal one is already stored).
    /// Returns `true` if the repair set was kept.
    pub fn add_repair_set(&mut self, repair: RepairSet) -> bool {
        if self.is_worse(&repair) {
            return false;
        }
        if self.is_better(&repair) {
            self.repaired = true;
            self.repair_sets.clear();
            self.n_topology_changes = repair.n_topology_changes();
            self.n_repair_operations = repair.n_repair_operations();
            self.n_add_remove_operations = repair.n_add_remove_operations();
            self.n_flip_operations = repair.n_flip_operations();
        }
        if self.repair_sets.iter().any(|r| r.is_equal(&repair)) {
            return false;
        }
        self.repair_sets.push(repair);
        true
    }
}
