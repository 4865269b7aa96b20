//! Observations, inconsistency diagnoses and repair sets.
//!
//! A `Diagnosis` is produced by a consistency oracle for one optimal explanation of the
//! inconsistency between a `Network` and its observations. It names the inconsistent
//! nodes, carries the completed observations (`Profile`s) and is extended in place by the
//! repair search with `RepairSet`s for every inconsistent node.

use crate::{Edge, Function, NodeId};
use std::collections::{BTreeMap, HashMap};

/// **(internal)** Bookkeeping of `Diagnosis` and the repair aggregation rules.
mod _impl_diagnosis;
/// **(internal)** Human-readable and parsable reports of a `Diagnosis`.
mod _impl_diagnosis_report;
/// **(internal)** Repair replacement policy of `InconsistentNode`.
mod _impl_inconsistent_node;
/// **(internal)** Utility methods for `Profile`.
mod _impl_profile;
/// **(internal)** Utility methods for `RepairSet`.
mod _impl_repair_set;

/// One experiment: either a single steady-state labeling, or a time series of labelings.
///
/// Values which were not observed are simply missing from the labeling. A profile
/// returned by an oracle inside a `Diagnosis` is complete and also records which nodes
/// were updated in every transition `t -> t + 1` (this is only relevant for the
/// asynchronous disciplines).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Profile {
    name: String,
    steady_state: bool,
    states: Vec<HashMap<NodeId, bool>>,
    updates: Vec<Vec<NodeId>>,
}

/// The direction in which the function of an inconsistent node must be repaired.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RepairType {
    /// Only a topological error was found, the function direction is unknown.
    Topological,
    Generalize,
    Particularize,
    /// The function must be generalized in one context and particularized in another.
    Double,
}

/// A single candidate repair of one node.
///
/// A repair set is a combination of flipped, removed and added edges, together with
/// the replacement functions of the node (if any).
#[derive(Clone, Debug, Default)]
pub struct RepairSet {
    repaired_functions: Vec<Function>,
    flipped_edges: Vec<Edge>,
    removed_edges: Vec<Edge>,
    added_edges: Vec<Edge>,
}

/// A node named in a `Diagnosis`, together with the best repair sets found so far.
#[derive(Clone, Debug)]
pub struct InconsistentNode {
    id: NodeId,
    repair_type: RepairType,
    topological_error: bool,
    repaired: bool,
    repair_sets: Vec<RepairSet>,
    n_topology_changes: usize,
    n_repair_operations: usize,
    n_add_remove_operations: usize,
    n_flip_operations: usize,
}

/// One optimal explanation of the inconsistency of a network with its observations.
///
/// The operation counters aggregate the best repair set of every repaired node and are
/// used to rank diagnoses against each other.
#[derive(Clone, Debug)]
pub struct Diagnosis {
    nodes: BTreeMap<NodeId, InconsistentNode>,
    profiles: Vec<Profile>,
    inconsistent_profiles: BTreeMap<String, Vec<NodeId>>,
    has_impossibility: bool,
    n_topology_changes: usize,
    n_add_remove_operations: usize,
    n_flip_operations: usize,
    n_repair_operations: usize,
}
