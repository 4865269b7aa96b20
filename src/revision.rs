//! The complete model revision pipeline: consistency check, repair of every diagnosis and
//! selection of the best repairs.

use crate::diagnosis::{Diagnosis, Profile};
use crate::oracle::{check_consistency, ConsistencyOracle, Optimization};
use crate::repair::{repair_inconsistencies, SearchConfig};
use crate::Network;
use std::cmp::Ordering;
use tracing::debug;

/// The outcome of `model_revision`.
#[derive(Clone, Debug)]
pub struct RevisionResult {
    optimization: Optimization,
    diagnoses: Vec<Diagnosis>,
    best: Option<usize>,
    reported: Vec<usize>,
}

impl RevisionResult {
    pub fn get_optimization(&self) -> Optimization {
        self.optimization
    }

    /// True if the network is consistent with the observations as it is.
    pub fn is_consistent(&self) -> bool {
        self.optimization == Optimization::Consistent
    }

    /// True if the observations cannot be explained by any network (or the check failed).
    pub fn is_unrepairable(&self) -> bool {
        matches!(
            self.optimization,
            Optimization::Unsatisfiable | Optimization::NotComputed
        )
    }

    /// All diagnoses of the consistency check, with the repairs attached to them.
    pub fn get_diagnoses(&self) -> &[Diagnosis] {
        &self.diagnoses
    }

    /// The best repaired diagnosis, `None` if no diagnosis could be repaired.
    pub fn get_best(&self) -> Option<&Diagnosis> {
        self.best.map(|i| &self.diagnoses[i])
    }

    /// Diagnoses selected for reporting, each with a flag telling whether it is optimal.
    pub fn reported(&self) -> impl Iterator<Item = (&Diagnosis, bool)> {
        let best = self.get_best();
        self.reported.iter().map(move |i| {
            let diagnosis = &self.diagnoses[*i];
            let optimal = best
                .map(|b| diagnosis.compare_repairs(b) != Ordering::Less)
                .unwrap_or(false);
            (diagnosis, optimal)
        })
    }
}

/// Check the `network` against `profiles` and repair every optimal diagnosis.
///
/// Diagnoses with an impossibility are skipped. Without `all_opt`, the search stops at the
/// first diagnosis repaired without any topology change. The best diagnoses are then
/// selected using `Diagnosis::compare_repairs`: with `all_opt`, all diagnoses which are as
/// good as the best one (and the sub-optimal ones with `show_sub_optimal`), otherwise just
/// the best one.
///
/// The `network` is left unchanged.
pub fn model_revision<O: ConsistencyOracle + ?Sized>(
    network: &mut Network,
    oracle: &O,
    profiles: &[Profile],
    config: &SearchConfig,
) -> RevisionResult {
    let check = check_consistency(network, oracle, profiles);
    let mut result = RevisionResult {
        optimization: check.optimization,
        diagnoses: check.diagnoses,
        best: None,
        reported: Vec::new(),
    };
    if result.optimization.value() <= 0 {
        return result;
    }

    debug!(
        diagnoses = result.diagnoses.len(),
        "Network is inconsistent, starting the repair."
    );
    for i in 0..result.diagnoses.len() {
        repair_inconsistencies(network, &mut result.diagnoses[i], config);
        let diagnosis = &result.diagnoses[i];
        if diagnosis.has_impossibility() {
            debug!(diagnosis = i, "Reached an impossibility.");
            continue;
        }
        let improves = match result.best {
            None => true,
            Some(best) => diagnosis.compare_repairs(&result.diagnoses[best]) == Ordering::Greater,
        };
        if improves {
            result.best = Some(i);
            let changes = result.diagnoses[i].n_topology_changes();
            debug!(diagnosis = i, changes, "Found a better solution.");
            if changes == 0 && !config.all_opt {
                break;
            }
        }
    }

    let Some(best) = result.best else {
        return result;
    };
    if config.all_opt {
        let best = &result.diagnoses[best];
        result.reported = result
            .diagnoses
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.has_impossibility())
            .filter(|(_, d)| config.show_sub_optimal || d.compare_repairs(best) != Ordering::Less)
            .map(|(i, _)| i)
            .collect();
    } else {
        result.reported = vec![best];
    }
    result
}

#[cfg(test)]
mod tests {
    use crate::diagnosis::{Profile, RepairType};
    use crate::oracle::{EnumerativeOracle, Optimization};
    use crate::repair::SearchConfig;
    use crate::revision::{model_revision, RevisionResult};
    use crate::Monotonicity::Activation;
    use crate::UpdateDiscipline::{SteadyState, Synchronous};
    use crate::Network;
    use pretty_assertions::assert_eq;

    const MODEL: &str = "
        vertex(a). vertex(b).
        edge(a,b,1).
        functionOr(b,1). functionAnd(b,1,a).
    ";

    fn revise(model: &str, observations: &str, config: &SearchConfig) -> (Network, RevisionResult) {
        let mut network = Network::from_facts(model).unwrap();
        let profiles = Profile::from_facts(&mut network, observations, SteadyState).unwrap();
        let oracle = EnumerativeOracle::default();
        let result = model_revision(&mut network, &oracle, &profiles, config);
        (network, result)
    }

    #[test]
    fn consistent_network_is_not_repaired() {
        let observations = "exp(p). obs_vlabel(p,a,1). obs_vlabel(p,b,1).";
        let (_, result) = revise(MODEL, observations, &SearchConfig::default());
        assert!(result.is_consistent());
        assert_eq!(0, result.get_optimization().value());
        assert!(result.get_best().is_none());
        assert_eq!(0, result.reported().count());
    }

    #[test]
    fn generalization_is_repaired_by_a_flip() {
        let observations = "exp(p). obs_vlabel(p,a,0). obs_vlabel(p,b,1).";
        let (network, result) = revise(MODEL, observations, &SearchConfig::default());
        assert_eq!(Optimization::Repairs(1), result.get_optimization());

        let best = result.get_best().unwrap();
        let b = network.find_node("b").unwrap();
        let node = best.get_inconsistent_node(b).unwrap();
        assert_eq!(RepairType::Generalize, node.get_repair_type());
        assert_eq!("b@E,a,b", best.to_parsable_string(&network, false));
        // The network itself is not modified.
        let a = network.find_node("a").unwrap();
        assert_eq!(Activation, network.find_edge(a, b).unwrap().get_sign());

        let reported: Vec<bool> = result.reported().map(|(_, optimal)| optimal).collect();
        assert_eq!(vec![true], reported);
    }

    #[test]
    fn double_inconsistency_is_repaired_by_a_function() {
        let model = "
            vertex(a). vertex(b). vertex(c). vertex(t).
            edge(a,t,1). edge(b,t,1). edge(c,t,1).
            fixed(a,t). fixed(b,t). fixed(c,t).
            functionOr(t,1..2).
            functionAnd(t,1,a). functionAnd(t,2,b). functionAnd(t,2,c).
        ";
        let observations = "
            exp(p1). obs_vlabel(p1,a,1). obs_vlabel(p1,b,0). obs_vlabel(p1,c,0). obs_vlabel(p1,t,0).
            exp(p2). obs_vlabel(p2,a,0). obs_vlabel(p2,b,1). obs_vlabel(p2,c,0). obs_vlabel(p2,t,1).
        ";
        let (network, result) = revise(model, observations, &SearchConfig::default());
        let best = result.get_best().unwrap();
        let t = network.find_node("t").unwrap();
        let node = best.get_inconsistent_node(t).unwrap();
        assert_eq!(RepairType::Double, node.get_repair_type());
        assert!(!node.get_repair_sets().is_empty());
        for repair in node.get_repair_sets() {
            assert_eq!(0, repair.n_topology_changes());
            let function = &repair.get_repaired_functions()[0];
            let classification =
                crate::classifier::classify_all(&network, function, best.get_profiles());
            assert!(classification.is_consistent());
        }
    }

    #[test]
    fn contradicting_time_series_cannot_be_repaired() {
        let model = "
            vertex(a). vertex(b).
            edge(a,b,1). fixed(a,b).
            functionOr(b,1). functionAnd(b,1,a).
        ";
        let observations = "
            exp(p1). obs_vlabel(p1,0,a,1). obs_vlabel(p1,0,b,0).
            obs_vlabel(p1,1,a,1). obs_vlabel(p1,1,b,1).
            exp(p2). obs_vlabel(p2,0,a,1). obs_vlabel(p2,0,b,0).
            obs_vlabel(p2,1,a,1). obs_vlabel(p2,1,b,0).
        ";
        let mut network = Network::from_facts(model).unwrap();
        let profiles = Profile::from_facts(&mut network, observations, Synchronous).unwrap();
        let result = model_revision(
            &mut network,
            &EnumerativeOracle::default(),
            &profiles,
            &SearchConfig::default(),
        );
        assert_eq!(Optimization::Repairs(1), result.get_optimization());
        assert!(result.get_best().is_none());
        assert!(result.get_diagnoses().iter().all(|d| d.has_impossibility()));
    }

    #[test]
    fn oracle_errors_stop_the_revision() {
        let mut network = Network::from_facts(MODEL).unwrap();
        let profiles = Profile::from_facts(&mut network, "exp(p).", SteadyState).unwrap();
        let result = model_revision(
            &mut network,
            &EnumerativeOracle::new(1),
            &profiles,
            &SearchConfig::default(),
        );
        assert_eq!(Optimization::NotComputed, result.get_optimization());
        assert!(result.is_unrepairable());
        assert!(result.get_diagnoses().is_empty());
    }
}
