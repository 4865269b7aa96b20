use crate::lattice::MonotoneFunction;
use biodivine_lib_bdd::{Bdd, BddVariableSet};
use num_bigint::BigUint;
use num_traits::One;

impl MonotoneFunction {
    /// Build a `Bdd` of this function, with variable `i` of the function mapped to the `i`-th
    /// variable of `ctx`.
    ///
    /// *Panics:* `ctx` must have at least `arity` variables.
    pub fn to_bdd(&self, ctx: &BddVariableSet) -> Bdd {
        let variables = ctx.variables();
        let mut result = ctx.mk_false();
        for clause in &self.clauses {
            let mut term = ctx.mk_true();
            for (i, var) in variables.iter().enumerate().take(self.arity) {
                if clause & (1u64 << i) != 0 {
                    term = term.and(&ctx.mk_literal(*var, true));
                }
            }
            result = result.or(&term);
        }
        result
    }

    /// The exact number of inputs for which this function is true.
    pub fn count_true_points(&self) -> BigUint {
        let ctx = BddVariableSet::new_anonymous(self.arity as u16);
        self.to_bdd(&ctx).exact_cardinality()
    }

    /// True if the function is false in strictly more than half of its inputs.
    pub fn is_in_bottom_half(&self) -> bool {
        let entries = BigUint::one() << self.arity;
        let zeros = &entries - self.count_true_points();
        zeros > (entries >> 1)
    }

    /// Approximation of `is_in_bottom_half` which compares the level of this function
    /// with the level `[n/2, ..., n/2]`.
    pub fn is_below_middle_level(&self) -> bool {
        let middle = vec![self.arity / 2; self.arity];
        self.compare_level_with(&middle).is_lt()
    }
}
