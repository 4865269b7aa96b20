//! Consistency checking: the collaborator which explains why a network is inconsistent
//! with its observations.
//!
//! A `ConsistencyOracle` completes the (partial) observations, decides which nodes must be
//! repaired and in which direction, and returns every optimal explanation as a `Diagnosis`.
//! The crate ships a small exhaustive oracle, the `EnumerativeOracle`, but any other
//! implementation (e.g. backed by an ASP solver) can be plugged in.

use crate::diagnosis::{Diagnosis, Profile};
use crate::{Network, RevisionError};
use std::fmt::{Display, Formatter};
use tracing::warn;

/// **(internal)** Implementation of the built-in `EnumerativeOracle`.
mod _impl_enumerative_oracle;

/// Anything that can compute the inconsistency diagnoses of a network.
pub trait ConsistencyOracle {
    /// Check the `network` against `profiles`, returning all optimal diagnoses.
    fn check_consistency(
        &self,
        network: &Network,
        profiles: &[Profile],
    ) -> Result<ConsistencyCheck, RevisionError>;
}

/// The outcome of an optimal consistency check.
///
/// The integer view of the optimization value follows the usual convention of ASP based
/// tools: `-2` not computed, `-1` unsatisfiable, `0` consistent and `n > 0` for the number
/// of nodes that need a repair.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Optimization {
    NotComputed,
    Unsatisfiable,
    Consistent,
    Repairs(usize),
}

/// All optimal diagnoses together with the optimization value.
#[derive(Clone, Debug)]
pub struct ConsistencyCheck {
    pub diagnoses: Vec<Diagnosis>,
    pub optimization: Optimization,
}

/// An exhaustive oracle which enumerates every completion of the unknown observed values.
///
/// The number of completions is exponential in the number of unknown values, hence it is
/// bounded by `max_unknown_values`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumerativeOracle {
    max_unknown_values: usize,
}

impl Optimization {
    /// The integer view of this value.
    pub fn value(&self) -> i64 {
        match self {
            Optimization::NotComputed => -2,
            Optimization::Unsatisfiable => -1,
            Optimization::Consistent => 0,
            Optimization::Repairs(n) => *n as i64,
        }
    }

    /// Build an optimization value from the number of repaired nodes.
    pub fn from_repairs(repairs: usize) -> Optimization {
        if repairs == 0 {
            Optimization::Consistent
        } else {
            Optimization::Repairs(repairs)
        }
    }
}

impl From<Optimization> for i64 {
    fn from(value: Optimization) -> Self {
        value.value()
    }
}

impl Display for Optimization {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl ConsistencyCheck {
    /// A result without diagnoses (used when the oracle failed).
    pub fn not_computed() -> ConsistencyCheck {
        ConsistencyCheck {
            diagnoses: Vec::new(),
            optimization: Optimization::NotComputed,
        }
    }
}

/// Run the `oracle`, turning its failures into an empty, not computed result.
pub fn check_consistency<O: ConsistencyOracle + ?Sized>(
    network: &Network,
    oracle: &O,
    profiles: &[Profile],
) -> ConsistencyCheck {
    match oracle.check_consistency(network, profiles) {
        Ok(result) => result,
        Err(error) => {
            warn!("Failed to check consistency: {}", error);
            ConsistencyCheck::not_computed()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnosis::Profile;
    use crate::oracle::{check_consistency, ConsistencyCheck, ConsistencyOracle, Optimization};
    use crate::{Network, RevisionError};

    struct FailingOracle;

    impl ConsistencyOracle for FailingOracle {
        fn check_consistency(
            &self,
            _network: &Network,
            _profiles: &[Profile],
        ) -> Result<ConsistencyCheck, RevisionError> {
            Err(RevisionError::Oracle("solver crashed".to_string()))
        }
    }

    #[test]
    fn optimization_values() {
        assert_eq!(-2i64, Optimization::NotComputed.into());
        assert_eq!(-1, Optimization::Unsatisfiable.value());
        assert_eq!(Optimization::Consistent, Optimization::from_repairs(0));
        assert_eq!(Optimization::Repairs(3), Optimization::from_repairs(3));
        assert_eq!("3", Optimization::Repairs(3).to_string());
    }

    #[test]
    fn oracle_failure_is_not_computed() {
        let network = Network::new(vec!["a".to_string()]);
        let result = check_consistency(&network, &FailingOracle, &[]);
        assert!(result.diagnoses.is_empty());
        assert_eq!(Optimization::NotComputed, result.optimization);
    }
}
