//! A small implementation of the lattice of monotone Boolean functions.
//!
//! A monotone function of `n` variables is represented by its minimal true points, i.e.
//! an antichain of clauses where each clause is a subset of variables stored as a `u64`
//! bit mask (so the arity is limited by `MAX_ARITY`). The function is the disjunction of
//! its clauses, each clause being a conjunction of its variables.
//!
//! The search only moves among *non-degenerate* functions: every variable must appear in
//! some clause, there must be at least one clause and no clause can be empty (the constants
//! are excluded). The immediate neighbours returned by `parents` and `children` are the covers
//! within this restricted poset, obtained by walking the covers of the full distributive
//! lattice through degenerate functions until non-degenerate ones are reached.
//!
//! Every function also has a `level` which is a linear extension of the implication order:
//! if `f` implies `g` (and `f != g`), then `f.level() < g.level()`.

/// **(internal)** Construction, inspection and ordering of monotone functions.
mod _impl_monotone_function;
/// **(internal)** Covers of a monotone function in the lattice.
mod _impl_neighbours;
/// **(internal)** Exact and approximate position of a function within the lattice.
mod _impl_state_table;

/// The largest supported number of variables of a `MonotoneFunction`.
pub const MAX_ARITY: usize = 63;

/// A monotone Boolean function given by an antichain of clauses.
///
/// The clauses are kept sorted (by size, then by value), which makes the derived equality
/// and hashing structural.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MonotoneFunction {
    arity: usize,
    clauses: Vec<u64>,
}
