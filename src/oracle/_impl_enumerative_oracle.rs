use crate::classifier::{classify_profile, Classification};
use crate::diagnosis::{Diagnosis, Profile, RepairType};
use crate::oracle::{ConsistencyCheck, ConsistencyOracle, EnumerativeOracle, Optimization};
use crate::{Function, Network, NodeId, RevisionError, UpdateDiscipline};
use fxhash::FxHashSet;
use std::collections::HashMap;
use tracing::debug;

/// Default bound on the number of unknown observed values.
const DEFAULT_MAX_UNKNOWN_VALUES: usize = 12;

/// Completions are enumerated as the bits of a `u64`.
const LIMIT_MAX_UNKNOWN_VALUES: usize = 63;

/// **(internal)** Cost of a completion: topological errors, repaired nodes, repair marks.
type Cost = (usize, usize, usize);

/// **(internal)** The part of a diagnosis which identifies it among other diagnoses.
type Signature = Vec<(NodeId, RepairType, bool)>;

impl Default for EnumerativeOracle {
    fn default() -> Self {
        EnumerativeOracle::new(DEFAULT_MAX_UNKNOWN_VALUES)
    }
}

impl EnumerativeOracle {
    /// An oracle which gives up when the observations have more than `max_unknown_values`
    /// unknown values in total. The bound is capped at 63.
    pub fn new(max_unknown_values: usize) -> EnumerativeOracle {
        EnumerativeOracle {
            max_unknown_values: max_unknown_values.min(LIMIT_MAX_UNKNOWN_VALUES),
        }
    }

    pub fn get_max_unknown_values(&self) -> usize {
        self.max_unknown_values
    }
}

impl ConsistencyOracle for EnumerativeOracle {
    /// Enumerate all completions of the unknown values and keep the diagnoses of the
    /// cheapest ones.
    ///
    /// A completion is infeasible if some asynchronous step does not change exactly one
    /// node. If no completion is feasible, the observations are unsatisfiable.
    fn check_consistency(
        &self,
        network: &Network,
        profiles: &[Profile],
    ) -> Result<ConsistencyCheck, RevisionError> {
        let unknowns: Vec<(usize, usize, NodeId)> = profiles
            .iter()
            .enumerate()
            .flat_map(|(p, profile)| {
                profile
                    .unknown_values(network)
                    .into_iter()
                    .map(move |(t, n)| (p, t, n))
            })
            .collect();
        if unknowns.len() > self.max_unknown_values {
            return Err(RevisionError::TooManyUnknowns {
                unknown: unknowns.len(),
                limit: self.max_unknown_values,
            });
        }
        debug!(unknown = unknowns.len(), "Enumerating observation completions.");

        let mut best: Option<Cost> = None;
        let mut diagnoses: Vec<Diagnosis> = Vec::new();
        let mut signatures: FxHashSet<Signature> = FxHashSet::default();
        for assignment in 0..(1u64 << unknowns.len()) {
            let mut completed = profiles.to_vec();
            for (i, (p, t, n)) in unknowns.iter().enumerate() {
                completed[*p].set_value(*t, *n, (assignment >> i) & 1 == 1);
            }
            if !assign_updates(network, &mut completed) {
                continue;
            }
            let (diagnosis, cost) = diagnose(network, completed);
            match best {
                Some(current) if cost > current => continue,
                Some(current) if cost == current => {}
                _ => {
                    best = Some(cost);
                    diagnoses.clear();
                    signatures.clear();
                }
            }
            if signatures.insert(signature(&diagnosis)) {
                diagnoses.push(diagnosis);
            }
        }

        let optimization = match best {
            None => Optimization::Unsatisfiable,
            Some((_, repaired, _)) => Optimization::from_repairs(repaired),
        };
        Ok(ConsistencyCheck {
            diagnoses,
            optimization,
        })
    }
}

/// **(internal)** Derive the update traces of completed time series. Returns `false` if
/// some asynchronous step does not change exactly one node.
fn assign_updates(network: &Network, profiles: &mut [Profile]) -> bool {
    for profile in profiles.iter_mut() {
        if profile.is_steady_state() {
            continue;
        }
        let discipline = network.discipline_for(profile);
        for time in 0..profile.num_time_points().saturating_sub(1) {
            let changed: Vec<NodeId> = network
                .nodes()
                .filter(|n| profile.get_value(time, *n) != profile.get_value(time + 1, *n))
                .collect();
            let updated = match discipline {
                UpdateDiscipline::Asynchronous if changed.len() != 1 => return false,
                UpdateDiscipline::Asynchronous | UpdateDiscipline::MultiAsynchronous => changed,
                UpdateDiscipline::Synchronous | UpdateDiscipline::SteadyState => {
                    network.nodes().collect()
                }
            };
            profile.set_updates(time, updated);
        }
    }
    true
}

/// **(internal)** Build the diagnosis of a single completion and compute its cost.
fn diagnose(network: &Network, profiles: Vec<Profile>) -> (Diagnosis, Cost) {
    let mut diagnosis = Diagnosis::new(profiles);
    let (mut topological, mut marks) = (0, 0);
    for node in network.nodes() {
        let function = network.get_function(node);
        if has_topological_error(network, function, diagnosis.get_profiles()) {
            topological += 1;
            diagnosis.add_topological_error(node);
            continue;
        }
        let mut inconsistent_in = Vec::new();
        let mut result = Classification::Consistent;
        for profile in diagnosis.get_profiles() {
            // Input nodes are unconstrained in a steady state.
            if function.num_terms() == 0 && profile.is_steady_state() {
                continue;
            }
            let discipline = network.discipline_for(profile);
            let classification = classify_profile(network, function, profile, discipline);
            if !classification.is_consistent() {
                inconsistent_in.push(profile.get_name().to_string());
                result = result.merge(classification);
            }
        }
        match result {
            Classification::Consistent => continue,
            Classification::SingleGeneralize => {
                marks += 1;
                diagnosis.add_generalization(node);
            }
            Classification::SingleParticularize => {
                marks += 1;
                diagnosis.add_particularization(node);
            }
            Classification::Double => {
                marks += 2;
                diagnosis.add_generalization(node);
                diagnosis.add_particularization(node);
            }
        }
        for profile in inconsistent_in {
            diagnosis.add_inconsistent_profile(&profile, node);
        }
    }
    let repaired = diagnosis.num_inconsistent_nodes();
    (diagnosis, (topological, repaired, marks))
}

/// **(internal)** True if two different transitions which update the target of `function`
/// agree on all its regulators, yet lead to different values of the target.
///
/// Only time series under disciplines which detect topological errors are considered.
fn has_topological_error(network: &Network, function: &Function, profiles: &[Profile]) -> bool {
    if function.num_terms() == 0 {
        return false;
    }
    let target = function.get_target();
    let mut outcomes: HashMap<Vec<Option<bool>>, bool> = HashMap::new();
    for profile in profiles.iter().filter(|p| !p.is_steady_state()) {
        let discipline = network.discipline_for(profile);
        if !discipline.detects_topological_errors() {
            continue;
        }
        for time in 0..profile.num_time_points().saturating_sub(1) {
            if !discipline.is_active(profile, time, target) {
                continue;
            }
            let Some(next) = profile.get_value(time + 1, target) else {
                continue;
            };
            let inputs: Vec<Option<bool>> = function
                .get_regulators()
                .iter()
                .map(|r| profile.get_value(time, *r))
                .collect();
            if *outcomes.entry(inputs).or_insert(next) != next {
                return true;
            }
        }
    }
    false
}

/// **(internal)** Inconsistent nodes of a diagnosis with their repair types.
fn signature(diagnosis: &Diagnosis) -> Signature {
    diagnosis
        .inconsistent_nodes()
        .map(|n| (n.get_id(), n.get_repair_type(), n.has_topological_error()))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::diagnosis::{Profile, RepairType};
    use crate::oracle::{ConsistencyOracle, EnumerativeOracle, Optimization};
    use crate::Monotonicity::Activation;
    use crate::UpdateDiscipline::{Asynchronous, Synchronous};
    use crate::{Function, Network, NodeId, RevisionError};
    use std::collections::HashMap;

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

    #[test]
    fn consistent_steady_state() {
        let (network, a, b) = two_nodes();
        let profile = Profile::new_steady_state("p", HashMap::from([(a, true), (b, true)]));
        let result = EnumerativeOracle::default()
            .check_consistency(&network, &[profile])
            .unwrap();
        assert_eq!(Optimization::Consistent, result.optimization);
        assert_eq!(1, result.diagnoses.len());
        assert_eq!(0, result.diagnoses[0].num_inconsistent_nodes());
    }

    #[test]
    fn inconsistent_steady_state() {
        let (network, a, b) = two_nodes();
        let profile = Profile::new_steady_state("p", HashMap::from([(a, false), (b, true)]));
        let result = EnumerativeOracle::default()
            .check_consistency(&network, &[profile])
            .unwrap();
        assert_eq!(Optimization::Repairs(1), result.optimization);
        let diagnosis = &result.diagnoses[0];
        let node = diagnosis.get_inconsistent_node(b).unwrap();
        assert_eq!(RepairType::Generalize, node.get_repair_type());
        assert_eq!(vec![b], diagnosis.get_inconsistent_profiles()["p"]);
    }

    #[test]
    fn unknown_values_are_completed() {
        // With `b` unknown, the completion `b = a` is consistent.
        let (network, a, _) = two_nodes();
        let profile = Profile::new_steady_state("p", HashMap::from([(a, false)]));
        let oracle = EnumerativeOracle::default();
        let result = oracle.check_consistency(&network, &[profile.clone()]).unwrap();
        assert_eq!(Optimization::Consistent, result.optimization);
        let b = network.find_node("b").unwrap();
        assert_eq!(Some(false), result.diagnoses[0].get_profiles()[0].get_value(0, b));

        assert_eq!(
            Err(RevisionError::TooManyUnknowns { unknown: 1, limit: 0 }),
            EnumerativeOracle::new(0)
                .check_consistency(&network, &[profile])
                .map(|r| r.optimization)
        );
    }

    #[test]
    fn unknown_value_limit_is_capped() {
        assert_eq!(63, EnumerativeOracle::new(64).get_max_unknown_values());
        assert_eq!(63, EnumerativeOracle::new(usize::MAX).get_max_unknown_values());
        assert_eq!(5, EnumerativeOracle::new(5).get_max_unknown_values());

        // 64 unknown values are rejected instead of overflowing the enumeration.
        let names: Vec<String> = (0..64).map(|i| format!("x{}", i)).collect();
        let network = Network::new(names);
        let profile = Profile::new_steady_state("p", HashMap::new());
        assert_eq!(
            Err(RevisionError::TooManyUnknowns { unknown: 64, limit: 63 }),
            EnumerativeOracle::new(100)
                .check_consistency(&network, &[profile])
                .map(|r| r.optimization)
        );
    }

    #[test]
    fn synchronous_topological_error() {
        let (mut network, a, b) = two_nodes();
        network.add_update_discipline(Synchronous).unwrap();
        let state = |vb| HashMap::from([(a, true), (b, vb)]);
        let profiles = vec![
            Profile::new_time_series("p1", vec![state(false), state(true)]),
            Profile::new_time_series("p2", vec![state(false), state(false)]),
        ];
        let result = EnumerativeOracle::default()
            .check_consistency(&network, &profiles)
            .unwrap();
        assert_eq!(Optimization::Repairs(1), result.optimization);
        let node = result.diagnoses[0].get_inconsistent_node(b).unwrap();
        assert!(node.has_topological_error());
        assert_eq!(RepairType::Topological, node.get_repair_type());
    }

    #[test]
    fn asynchronous_steps_change_one_node() {
        let (mut network, a, b) = two_nodes();
        network.add_update_discipline(Asynchronous).unwrap();
        let state = |va, vb| HashMap::from([(a, va), (b, vb)]);
        let feasible = Profile::new_time_series("p", vec![state(true, false), state(true, true)]);
        let result = EnumerativeOracle::default()
            .check_consistency(&network, &[feasible])
            .unwrap();
        assert_eq!(Optimization::Consistent, result.optimization);
        assert_eq!(&[b], result.diagnoses[0].get_profiles()[0].get_updates(0));

        let stutter = Profile::new_time_series("p", vec![state(true, true), state(true, true)]);
        let result = EnumerativeOracle::default()
            .check_consistency(&network, &[stutter])
            .unwrap();
        assert_eq!(Optimization::Unsatisfiable, result.optimization);
        assert!(result.diagnoses.is_empty());
    }
}
