//! Classification of a single node function against completed observations.
//!
//! The classifier answers whether a function reproduces every observed value of its
//! target node, and if not, in which direction it must move in the lattice of monotone
//! functions: a function that is too restrictive must be generalized, a function that is
//! too permissive must be particularized. A function that fails in both directions cannot
//! be fixed by a single monotone move and is classified as `Double`.

use crate::diagnosis::Profile;
use crate::{Function, Network, UpdateDiscipline};
use tracing::warn;

/// The outcome of checking a function against observations.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Classification {
    Consistent,
    /// The function outputs zero where one is observed.
    SingleGeneralize,
    /// The function outputs one where zero is observed.
    SingleParticularize,
    Double,
}

impl Classification {
    /// Combine two partial results. Two different inconsistencies escalate to `Double`.
    pub fn merge(self, other: Classification) -> Classification {
        match (self, other) {
            (Classification::Consistent, x) => x,
            (x, Classification::Consistent) => x,
            (x, y) if x == y => x,
            _ => Classification::Double,
        }
    }

    pub fn is_consistent(&self) -> bool {
        *self == Classification::Consistent
    }
}

/// Classify `function` against all given profiles, each under the discipline that the
/// network assigns to it.
///
/// Evaluation stops as soon as the result becomes `Double`.
pub fn classify_all(network: &Network, function: &Function, profiles: &[Profile]) -> Classification {
    let mut result = Classification::Consistent;
    for profile in profiles {
        let discipline = network.discipline_for(profile);
        result = result.merge(classify_profile(network, function, profile, discipline));
        if result == Classification::Double {
            break;
        }
    }
    result
}

/// Classify `function` against a single profile.
///
/// For a steady state, the function must reproduce the observed value of its target.
/// For a time series, the value computed at time `t` must match the observed value at
/// `t + 1` in every step where the target is updated. A function without terms holds the
/// previous value of its target, and since there is no monotone direction to move such a
/// function in, any mismatch is `Double`.
///
/// Missing edges or labels are reported and make the profile `Double`.
pub fn classify_profile(
    network: &Network,
    function: &Function,
    profile: &Profile,
    discipline: UpdateDiscipline,
) -> Classification {
    let target = function.get_target();
    let fail_closed = |message: String| {
        warn!(
            node = network.get_node_name(target),
            profile = profile.get_name(),
            "{}",
            message
        );
        Classification::Double
    };

    if profile.is_steady_state() || !discipline.is_dynamic() {
        if profile.num_time_points() == 0 {
            return Classification::Consistent;
        }
        let Some(observed) = profile.get_value(0, target) else {
            return fail_closed(format!("Missing value of {}.", network.get_node_name(target)));
        };
        return match function.evaluate(network, profile.get_state(0)) {
            Ok(value) => mismatch(value, observed),
            Err(message) => fail_closed(message),
        };
    }

    let mut result = Classification::Consistent;
    for time in 0..profile.num_time_points().saturating_sub(1) {
        if !discipline.is_active(profile, time, target) {
            continue;
        }
        let Some(next) = profile.get_value(time + 1, target) else {
            return fail_closed(format!("Missing value of {}.", network.get_node_name(target)));
        };
        let step = if function.num_terms() == 0 {
            match profile.get_value(time, target) {
                Some(current) if current == next => Classification::Consistent,
                Some(_) => Classification::Double,
                None => {
                    return fail_closed(format!(
                        "Missing value of {}.",
                        network.get_node_name(target)
                    ))
                }
            }
        } else {
            match function.evaluate(network, profile.get_state(time)) {
                Ok(value) => mismatch(value, next),
                Err(message) => return fail_closed(message),
            }
        };
        result = result.merge(step);
        if result == Classification::Double {
            break;
        }
    }
    result
}

/// **(internal)** Classify a single computed value against the expected one.
fn mismatch(computed: bool, expected: bool) -> Classification {
    match (computed, expected) {
        (false, true) => Classification::SingleGeneralize,
        (true, false) => Classification::SingleParticularize,
        _ => Classification::Consistent,
    }
}
