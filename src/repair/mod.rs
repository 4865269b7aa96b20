//! Search for minimal repairs of the inconsistent nodes of a `Diagnosis`.
//!
//! The search for a single node is an escalation ladder. First, the topology of the node
//! is changed by adding and removing incoming edges (fewest changes first). For every such
//! topology, subsets of incoming edges are flipped (again fewest first). Finally, if the
//! node is still inconsistent, its function is replaced by the closest consistent monotone
//! function: a comparable one (a pure generalization or particularization) for a single
//! inconsistency, a non-comparable one otherwise.
//!
//! All hypothetical changes go through a `NetworkTrial`, so the network is restored
//! exactly once the search of a node is over.

use crate::diagnosis::{Diagnosis, RepairSet};
use crate::{Edge, Network, NodeId};
use tracing::{debug, warn};

/// **(internal)** Generic enumeration of k-element subsets.
mod _impl_combinations;
/// **(internal)** Comparable function search (walking the lattice in one direction).
mod _impl_comparable;
/// **(internal)** Decide between a pure topology repair and a function search.
mod _impl_dispatch;
/// **(internal)** Edge-flip search.
mod _impl_flips;
/// **(internal)** The scoped mutation guard `NetworkTrial`.
mod _impl_network_trial;
/// **(internal)** Non-comparable function search (ranked by lattice level).
mod _impl_non_comparable;
/// **(internal)** Topology repair search (edge additions and removals).
mod _impl_topology;

pub use _impl_network_trial::NetworkTrial;
pub use _impl_topology::repair_node;

/// Options of the repair search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchConfig {
    /// Compute all optimal repairs instead of stopping at the first one.
    pub all_opt: bool,
    /// Fall back to a non-comparable function search when a comparable one fails.
    pub force_optimum: bool,
    /// Report every consistent comparable function at the minimal distance, not only the
    /// first one.
    pub show_all_functions: bool,
    /// Rank non-comparable functions by their lattice level relative to the original.
    pub compare_level_function: bool,
    /// Decide the half of the lattice of a function by counting its true points exactly
    /// (instead of comparing its level with the middle level).
    pub exact_middle_determination: bool,
    /// Also report sub-optimal diagnoses.
    pub show_sub_optimal: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            all_opt: true,
            force_optimum: false,
            show_all_functions: false,
            compare_level_function: true,
            exact_middle_determination: true,
            show_sub_optimal: false,
        }
    }
}

impl SearchConfig {
    pub fn with_all_opt(mut self, value: bool) -> SearchConfig {
        self.all_opt = value;
        self
    }

    pub fn with_force_optimum(mut self, value: bool) -> SearchConfig {
        self.force_optimum = value;
        self
    }

    pub fn with_show_all_functions(mut self, value: bool) -> SearchConfig {
        self.show_all_functions = value;
        self
    }

    pub fn with_compare_level_function(mut self, value: bool) -> SearchConfig {
        self.compare_level_function = value;
        self
    }

    pub fn with_exact_middle_determination(mut self, value: bool) -> SearchConfig {
        self.exact_middle_determination = value;
        self
    }

    pub fn with_show_sub_optimal(mut self, value: bool) -> SearchConfig {
        self.show_sub_optimal = value;
        self
    }
}

/// Repair every inconsistent node of the `diagnosis`, attaching the found repair sets to it.
///
/// Stops at the first node that cannot be repaired (the diagnosis is then marked as
/// impossible). The `network` is left unchanged.
pub fn repair_inconsistencies(network: &mut Network, diagnosis: &mut Diagnosis, config: &SearchConfig) {
    for node in diagnosis.inconsistent_node_ids() {
        debug!(node = network.get_node_name(node), "Repairing node.");
        repair_node(network, diagnosis, node, config);
        if diagnosis.has_impossibility() {
            warn!(
                node = network.get_node_name(node),
                "Node cannot be repaired, giving up on this diagnosis."
            );
            return;
        }
    }
}

/// **(internal)** The topology changes applied to a node before a function search.
#[derive(Clone, Copy)]
struct TopologyEdits<'e> {
    flipped: &'e [Edge],
    added: &'e [Edge],
    removed: &'e [Edge],
}

impl TopologyEdits<'_> {
    fn is_empty(&self) -> bool {
        self.flipped.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    fn n_add_remove(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// A repair set with these edits and no function replacement.
    fn to_repair_set(self) -> RepairSet {
        RepairSet::new(self.flipped, self.removed, self.added)
    }
}

/// **(internal)** Mutable state of the repair search of a single node.
struct NodeSearch<'a> {
    diagnosis: &'a mut Diagnosis,
    node: NodeId,
    config: &'a SearchConfig,
}

#[cfg(test)]
mod tests {
    use crate::classifier::classify_all;
    use crate::diagnosis::{Diagnosis, Profile};
    use crate::repair::{
        repair_inconsistencies, repair_node, NodeSearch, SearchConfig, TopologyEdits,
    };
    use crate::Monotonicity::Activation;
    use crate::{Edge, Function, Network, NodeId};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Nodes `a, b` and `a -> b` with the function `b = a`.
    fn two_nodes() -> (Network, NodeId, NodeId) {
        let mut network = Network::new(vec!["a".to_string(), "b".to_string()]);
        let a = network.find_node("a").unwrap();
        let b = network.find_node("b").unwrap();
        network.add_edge(a, b, Activation, false).unwrap();
        network
            .set_function(Function::from_terms(b, vec![vec![a]]))
            .unwrap();
        (network, a, b)
    }

    fn edges(network: &Network) -> Vec<Edge> {
        network.edges().cloned().collect()
    }

    #[test]
    fn search_config_builders() {
        let config = SearchConfig::default()
            .with_all_opt(false)
            .with_force_optimum(true)
            .with_compare_level_function(false);
        assert!(!config.all_opt);
        assert!(config.force_optimum);
        assert!(!config.compare_level_function);
        assert!(config.exact_middle_determination);
        assert!(!SearchConfig::default().show_sub_optimal);
    }

    #[test]
    fn single_regulator_is_repaired_by_a_flip() {
        let (mut network, a, b) = two_nodes();
        let profile = Profile::new_steady_state("p", HashMap::from([(a, false), (b, true)]));
        let mut diagnosis = Diagnosis::new(vec![profile]);
        diagnosis.add_generalization(b);
        let before = edges(&network);

        repair_inconsistencies(&mut network, &mut diagnosis, &SearchConfig::default());

        assert_eq!(before, edges(&network));
        assert!(!diagnosis.has_impossibility());
        let node = diagnosis.get_inconsistent_node(b).unwrap();
        assert_eq!(1, node.get_repair_sets().len());
        let repair = &node.get_repair_sets()[0];
        assert_eq!(1, repair.n_flip_operations());
        assert_eq!(0, repair.n_add_remove_operations());
        assert!(repair.get_repaired_functions().is_empty());
        assert_eq!(1, diagnosis.n_repair_operations());
    }

    #[test]
    fn conflicting_observations_are_impossible() {
        // Two synchronous transitions leave the same state but reach different values of b,
        // so no function of any regulators can explain both.
        let (mut network, a, b) = two_nodes();
        network.set_fixed(a, b).unwrap();
        let state = |vb| HashMap::from([(a, true), (b, vb)]);
        let profiles = vec![
            Profile::new_time_series("p1", vec![state(false), state(true)]),
            Profile::new_time_series("p2", vec![state(false), state(false)]),
        ];
        let mut diagnosis = Diagnosis::new(profiles);
        diagnosis.add_particularization(b);
        let before = edges(&network);

        repair_node(&mut network, &mut diagnosis, b, &SearchConfig::default());

        assert!(diagnosis.has_impossibility());
        let node = diagnosis.get_inconsistent_node(b).unwrap();
        assert!(node.get_repair_sets().is_empty());
        assert_eq!(before, edges(&network));
    }

    #[test]
    fn double_inconsistency_uses_non_comparable_functions() {
        // t has three activators and the function a || (b && c).
        let names = ["a", "b", "c", "t"];
        let mut network = Network::new(names.iter().map(|s| s.to_string()).collect());
        let ids: Vec<NodeId> = names.iter().map(|n| network.find_node(n).unwrap()).collect();
        let (a, b, c, t) = (ids[0], ids[1], ids[2], ids[3]);
        for r in [a, b, c] {
            network.add_edge(r, t, Activation, true).unwrap();
        }
        network
            .set_function(Function::from_terms(t, vec![vec![a], vec![b, c]]))
            .unwrap();

        let state = |va, vb, vc, vt| HashMap::from([(a, va), (b, vb), (c, vc), (t, vt)]);
        let profiles = vec![
            // Too permissive: a alone must not activate t.
            Profile::new_steady_state("p1", state(true, false, false, false)),
            // Too restrictive: b alone must activate t.
            Profile::new_steady_state("p2", state(false, true, false, true)),
        ];
        assert_eq!(
            crate::classifier::Classification::Double,
            classify_all(&network, network.get_function(t), &profiles)
        );
        let mut diagnosis = Diagnosis::new(profiles.clone());
        diagnosis.add_generalization(t);
        diagnosis.add_particularization(t);

        repair_node(&mut network, &mut diagnosis, t, &SearchConfig::default());

        assert!(!diagnosis.has_impossibility());
        let node = diagnosis.get_inconsistent_node(t).unwrap();
        assert!(!node.get_repair_sets().is_empty());
        for repair in node.get_repair_sets() {
            assert_eq!(0, repair.n_topology_changes());
            assert_eq!(1, repair.get_repaired_functions().len());
            let function = &repair.get_repaired_functions()[0];
            assert!(classify_all(&network, function, &profiles).is_consistent());
        }
    }

    /// Nodes `a, b, c, t` with fixed activations of `t` by `a, b, c` and by itself (so no
    /// topology change is possible), and the given function of `t`.
    fn fixed_target(terms: &[&[usize]]) -> (Network, Vec<NodeId>) {
        let names = ["a", "b", "c", "t"];
        let mut network = Network::new(names.iter().map(|s| s.to_string()).collect());
        let ids: Vec<NodeId> = names.iter().map(|n| network.find_node(n).unwrap()).collect();
        for r in &ids {
            network.add_edge(*r, ids[3], Activation, true).unwrap();
        }
        let terms = terms
            .iter()
            .map(|term| term.iter().map(|i| ids[*i]).collect())
            .collect();
        network
            .set_function(Function::from_terms(ids[3], terms))
            .unwrap();
        (network, ids)
    }

    /// A steady state of `a, b, c, t`.
    fn steady(ids: &[NodeId], values: [bool; 4]) -> HashMap<NodeId, bool> {
        ids.iter().cloned().zip(values).collect()
    }

    fn repaired_functions(diagnosis: &Diagnosis, node: NodeId) -> Vec<Function> {
        diagnosis
            .get_inconsistent_node(node)
            .unwrap()
            .get_repair_sets()
            .iter()
            .flat_map(|r| r.get_repaired_functions().iter().cloned())
            .collect()
    }

    #[test]
    fn comparable_search_on_one_regulator_fails() {
        let (network, a, b) = two_nodes();
        let profile = Profile::new_steady_state("p", HashMap::from([(a, false), (b, true)]));
        let mut diagnosis = Diagnosis::new(vec![profile]);
        diagnosis.add_generalization(b);
        let config = SearchConfig::default().with_force_optimum(true);
        let mut search = NodeSearch {
            diagnosis: &mut diagnosis,
            node: b,
            config: &config,
        };
        let edits = TopologyEdits {
            flipped: &[],
            added: &[],
            removed: &[],
        };
        let function = network.get_function(b).clone();
        assert!(!search.search_comparable(&network, &function, edits, true));
        assert!(!diagnosis.get_inconsistent_node(b).unwrap().is_repaired());
    }

    #[test]
    fn comparable_search_in_both_directions() {
        let mut network = Network::new(vec!["a".to_string(), "b".to_string(), "t".to_string()]);
        let a = network.find_node("a").unwrap();
        let b = network.find_node("b").unwrap();
        let t = network.find_node("t").unwrap();
        network.add_edge(a, t, Activation, true).unwrap();
        network.add_edge(b, t, Activation, true).unwrap();
        network.add_edge(t, t, Activation, true).unwrap();
        let conjunction = Function::mk_conjunction(t, &[a, b]);
        let disjunction = Function::mk_disjunction(t, &[a, b]);

        // a && b is too strict when a alone activates t.
        network.set_function(conjunction.clone()).unwrap();
        let original = network.get_function(t).clone();
        let state = HashMap::from([(a, true), (b, false), (t, true)]);
        let mut diagnosis = Diagnosis::new(vec![Profile::new_steady_state("p", state)]);
        diagnosis.add_generalization(t);
        repair_node(&mut network, &mut diagnosis, t, &SearchConfig::default());
        assert!(!diagnosis.has_impossibility());
        assert_eq!(vec![disjunction.clone()], repaired_functions(&diagnosis, t));
        assert_eq!(0, diagnosis.n_topology_changes());
        assert!(Rc::ptr_eq(&original, network.get_function(t)));

        // a || b is too permissive when a alone does not activate t.
        network.set_function(disjunction).unwrap();
        let state = HashMap::from([(a, true), (b, false), (t, false)]);
        let mut diagnosis = Diagnosis::new(vec![Profile::new_steady_state("p", state)]);
        diagnosis.add_particularization(t);
        repair_node(&mut network, &mut diagnosis, t, &SearchConfig::default());
        assert_eq!(vec![conjunction], repaired_functions(&diagnosis, t));
    }

    #[test]
    fn show_all_functions_at_minimal_distance() {
        // From a && b && c, both a && (b || c) and b && (a || c) are one step up and
        // accept a = b = 1, c = 0.
        let (mut network, ids) = fixed_target(&[&[0, 1, 2]]);
        let t = ids[3];
        let profiles = vec![Profile::new_steady_state(
            "p",
            steady(&ids, [true, true, false, true]),
        )];
        let run = |network: &mut Network, config: &SearchConfig| {
            let mut diagnosis = Diagnosis::new(profiles.clone());
            diagnosis.add_generalization(t);
            repair_node(network, &mut diagnosis, t, config);
            repaired_functions(&diagnosis, t)
        };

        let first = run(&mut network, &SearchConfig::default());
        assert_eq!(1, first.len());

        let all = run(&mut network, &SearchConfig::default().with_show_all_functions(true));
        assert_eq!(2, all.len());
        assert!(all.contains(&first[0]));
        for function in &all {
            assert_eq!(1, function.get_distance());
            assert!(classify_all(&network, function, &profiles).is_consistent());
        }
    }

    #[test]
    fn force_optimum_falls_back_to_non_comparable_functions() {
        // t = (a && b) || c must accept a alone and reject b alone. The only generalization
        // is a || b || c which accepts b, so only a || (b && c) (not comparable) works.
        let (mut network, ids) = fixed_target(&[&[0, 1], &[2]]);
        let (a, b, c, t) = (ids[0], ids[1], ids[2], ids[3]);
        let profiles = vec![
            Profile::new_steady_state("p1", steady(&ids, [true, false, false, true])),
            Profile::new_steady_state("p2", steady(&ids, [false, true, false, false])),
        ];
        let expected = Function::from_terms(t, vec![vec![a], vec![b, c]]);
        let run = |network: &mut Network, config: &SearchConfig| {
            let mut diagnosis = Diagnosis::new(profiles.clone());
            diagnosis.add_generalization(t);
            repair_node(network, &mut diagnosis, t, config);
            diagnosis
        };

        let comparable_only = run(&mut network, &SearchConfig::default());
        assert!(comparable_only.has_impossibility());

        let forced = SearchConfig::default().with_force_optimum(true);
        let configs = [
            forced.clone(),
            forced.clone().with_exact_middle_determination(false),
            forced.with_compare_level_function(false),
        ];
        for config in &configs {
            let diagnosis = run(&mut network, config);
            assert!(!diagnosis.has_impossibility());
            assert_eq!(0, diagnosis.n_topology_changes());
            assert_eq!(vec![expected.clone()], repaired_functions(&diagnosis, t));
        }
    }

    #[test]
    fn missing_regulator_is_added() {
        let mut network = Network::new(vec!["a".to_string(), "b".to_string()]);
        let a = network.find_node("a").unwrap();
        let b = network.find_node("b").unwrap();
        let original = network.get_function(b).clone();
        let profile = Profile::new_steady_state("p", HashMap::from([(a, true), (b, true)]));
        let run = |network: &mut Network, config: &SearchConfig| {
            let mut diagnosis = Diagnosis::new(vec![profile.clone()]);
            diagnosis.add_generalization(b);
            repair_node(network, &mut diagnosis, b, config);
            diagnosis
        };

        // Both a -> b and the self-loop b -> b work, adding both is never considered.
        let diagnosis = run(&mut network, &SearchConfig::default());
        assert!(!diagnosis.has_impossibility());
        let repairs = diagnosis.get_inconsistent_node(b).unwrap().get_repair_sets();
        assert_eq!(2, repairs.len());
        for repair in repairs {
            assert_eq!(1, repair.n_add_remove_operations());
            assert_eq!(1, repair.n_topology_changes());
            assert_eq!(1, repair.get_repaired_functions().len());
        }
        assert_eq!(&[Edge::new(a, b, Activation)], repairs[0].get_added_edges());
        assert_eq!(
            vec![Function::mk_disjunction(b, &[a])],
            repairs[0].get_repaired_functions()
        );
        assert_eq!(0, network.num_edges());
        assert!(Rc::ptr_eq(&original, network.get_function(b)));

        // Without all optimal repairs, the search stops at the first one.
        let diagnosis = run(&mut network, &SearchConfig::default().with_all_opt(false));
        let repairs = diagnosis.get_inconsistent_node(b).unwrap().get_repair_sets();
        assert_eq!(1, repairs.len());
        assert_eq!(&[Edge::new(a, b, Activation)], repairs[0].get_added_edges());
        assert_eq!(0, network.num_edges());
    }
}
