//! A library for revising Boolean regulatory network models.
//!
//! Given a signed regulatory graph with monotone update functions (in disjunctive normal form)
//! and a collection of steady-state or time-series observations, the library determines
//! whether the model can reproduce the observations and, if not, searches for a minimal set
//! of repair operations (sign flips, edge additions and removals, function replacements)
//! that make it consistent.
//!
//! The main entry points are:
//!  - `Network::from_facts` and `Profile::from_facts` for loading the model and observations,
//!  - `oracle::check_consistency` for computing the inconsistency diagnoses,
//!  - `repair::repair_inconsistencies` for repairing a single diagnosis, and
//!  - `revision::model_revision` which runs the whole pipeline.

use crate::lattice::MonotoneFunction;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

pub mod classifier;
pub mod diagnosis;
pub mod lattice;
pub mod oracle;
pub mod repair;
pub mod revision;

/// **(internal)** Utility methods for `Edge`.
mod _impl_edge;
/// **(internal)** Construction, evaluation and lattice conversion of `Function`.
mod _impl_function;
/// **(internal)** Utility methods for `Monotonicity`.
mod _impl_monotonicity;
/// **(internal)** Construction, inspection and in-place mutation of `Network`.
mod _impl_network;
/// **(internal)** Utility methods for `NodeId`.
mod _impl_node_id;
/// **(internal)** Discipline specific rules of `UpdateDiscipline`.
mod _impl_update_discipline;
/// **(internal)** Parser of the logic-program fact format used for models and observations.
mod _lp_parser;

/// A type-safe index of a `Node` inside a `Network`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

/// Possible monotonous effects of an `Edge` in a `Network`.
///
/// Activation corresponds to sign `1` and inhibition to sign `0` of the fact format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Monotonicity {
    Activation,
    Inhibition,
}

/// A signed influence from `start` to `end`.
///
/// A `fixed` edge is never flipped or removed during repair.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    start: NodeId,
    end: NodeId,
    sign: Monotonicity,
    fixed: bool,
}

/// A node of a `Network` together with its active regulatory `Function`.
///
/// The function is shared through an `Rc`, so that a hypothetical replacement can be
/// undone by swapping the pointer back.
#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    function: Rc<Function>,
}

/// A monotone regulatory function of a single node in disjunctive normal form.
///
/// The function is a disjunction of `terms`, each term being a conjunction of regulators.
/// A regulator "satisfies" its place in a term when its value agrees with the sign of its
/// edge into the target (one for activation, zero for inhibition).
///
/// The `regulators` are kept in discovery order. This order also fixes the variable
/// indices of the associated lattice representation, which is built lazily on first use.
/// Functions produced by the repair search also remember their lattice `distance` from the
/// function they were derived from.
#[derive(Clone, Debug)]
pub struct Function {
    target: NodeId,
    regulators: Vec<NodeId>,
    terms: Vec<Vec<NodeId>>,
    distance: usize,
    son_consistent: bool,
    lattice: OnceCell<MonotoneFunction>,
}

/// A canonical structural representation of a `Function`: its target, sorted regulators and
/// the sorted antichain of its terms. Two functions with equal keys are interchangeable.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FunctionKey {
    target: NodeId,
    regulators: Vec<NodeId>,
    terms: Vec<Vec<NodeId>>,
}

/// The rule which decides which nodes are updated between two consecutive observations.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UpdateDiscipline {
    /// Observations are fixed points, there is no time dimension.
    SteadyState,
    /// All nodes are updated in every step.
    Synchronous,
    /// Exactly one node is updated in every step.
    Asynchronous,
    /// Any subset of nodes is updated in every step.
    MultiAsynchronous,
}

/// A regulatory network: nodes, signed edges and the update disciplines of the observations.
///
/// Edges are stored in a forward adjacency indexed by the start node, with a reverse
/// index of regulators kept in sync with it. There is at most one edge per ordered pair.
#[derive(Clone, Debug)]
pub struct Network {
    nodes: Vec<Node>,
    node_to_index: HashMap<String, NodeId>,
    edges: Vec<Vec<Edge>>,
    regulators: Vec<Vec<NodeId>>,
    has_steady_state: bool,
    has_time_series: bool,
    dynamic_discipline: Option<UpdateDiscipline>,
}

/// Errors which can occur while setting up or running a model revision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RevisionError {
    #[error("conflicting update disciplines {0:?} and {1:?}")]
    ConflictingUpdaters(UpdateDiscipline, UpdateDiscipline),
    #[error("unknown update discipline `{0}`")]
    UnknownUpdater(String),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unknown node `{0}`")]
    UnknownNode(String),
    #[error("consistency oracle failed: {0}")]
    Oracle(String),
    #[error("observations contain {unknown} unknown values, the limit is {limit}")]
    TooManyUnknowns { unknown: usize, limit: usize },
}
