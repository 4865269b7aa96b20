use crate::lattice::{MonotoneFunction, MAX_ARITY};
use std::cmp::Ordering;

impl MonotoneFunction {
    /// Create a new function of the given arity from a list of clauses.
    ///
    /// The clauses do not have to form an antichain, non-minimal and duplicate clauses are
    /// removed. Bits outside of the arity are ignored.
    ///
    /// *Panics:* `arity` must be at most `MAX_ARITY`.
    pub fn new(arity: usize, clauses: Vec<u64>) -> MonotoneFunction {
        assert!(arity <= MAX_ARITY, "Arity {} is not supported.", arity);
        let full = full_mask(arity);
        let clauses = clauses.into_iter().map(|c| c & full).collect();
        MonotoneFunction {
            arity,
            clauses: minimize(clauses),
        }
    }

    /// The conjunction of all variables (the least non-degenerate function).
    pub fn mk_bottom(arity: usize) -> MonotoneFunction {
        MonotoneFunction::new(arity, vec![full_mask(arity)])
    }

    /// The disjunction of all variables (the greatest non-degenerate function).
    pub fn mk_top(arity: usize) -> MonotoneFunction {
        MonotoneFunction::new(arity, (0..arity).map(|i| 1u64 << i).collect())
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The sorted antichain of clauses of this function.
    pub fn clauses(&self) -> &[u64] {
        &self.clauses
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// True if every variable appears, there is at least one clause and no clause is empty.
    pub fn is_non_degenerate(&self) -> bool {
        let support = self.clauses.iter().fold(0u64, |a, c| a | c);
        !self.clauses.is_empty()
            && self.clauses.iter().all(|c| *c != 0)
            && support == full_mask(self.arity)
    }

    /// Evaluate the function in the given input (bit `i` is the value of variable `i`).
    pub fn eval(&self, input: u64) -> bool {
        self.clauses.iter().any(|c| c & input == *c)
    }

    /// True if `self` implies `other`, i.e. `self <= other` in the lattice.
    pub fn implies(&self, other: &MonotoneFunction) -> bool {
        self.clauses
            .iter()
            .all(|c| other.clauses.iter().any(|o| c & o == *o))
    }

    /// The clause-size profile of this function. Item `k` is the number of clauses with
    /// `k + 1` variables.
    pub fn level(&self) -> Vec<usize> {
        let mut level = vec![0; self.arity];
        for clause in &self.clauses {
            let size = clause.count_ones() as usize;
            if size > 0 {
                level[size - 1] += 1;
            }
        }
        level
    }

    /// Compare the levels of two functions. `Greater` means `other` is lower in the lattice.
    pub fn compare_level(&self, other: &MonotoneFunction) -> Ordering {
        self.level().cmp(&other.level())
    }

    /// Compare the level of this function with an explicit level vector.
    pub fn compare_level_with(&self, level: &[usize]) -> Ordering {
        self.level().as_slice().cmp(level)
    }
}

/// **(internal)** A mask with the lowest `arity` bits set.
pub(super) fn full_mask(arity: usize) -> u64 {
    if arity >= 64 {
        u64::MAX
    } else {
        (1u64 << arity) - 1
    }
}

/// **(internal)** Remove duplicate and non-minimal sets and sort the rest by size and value.
pub(super) fn minimize(mut sets: Vec<u64>) -> Vec<u64> {
    sets.sort_by_key(|s| (s.count_ones(), *s));
    sets.dedup();
    let mut result: Vec<u64> = Vec::with_capacity(sets.len());
    for set in sets {
        // Sets are sorted by size, so only an earlier set can be a subset.
        if !result.iter().any(|r| set & r == *r) {
            result.push(set);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use crate::lattice::MonotoneFunction;
    use std::cmp::Ordering;

    #[test]
    fn monotone_function_normalization() {
        // a || (a && b) || b || b == a || b
        let f = MonotoneFunction::new(2, vec![0b01, 0b11, 0b10, 0b10]);
        assert_eq!(vec![0b01, 0b10], f.clauses().to_vec());
        assert_eq!(MonotoneFunction::mk_top(2), f);
        assert!(f.is_non_degenerate());

        let g = MonotoneFunction::new(3, vec![0b011]);
        assert!(!g.is_non_degenerate());
        assert!(!MonotoneFunction::new(2, vec![]).is_non_degenerate());
        assert!(!MonotoneFunction::new(2, vec![0, 0b11]).is_non_degenerate());
    }

    #[test]
    fn monotone_function_order_and_level() {
        let bottom = MonotoneFunction::mk_bottom(3);
        let top = MonotoneFunction::mk_top(3);
        // a || (b && c)
        let f = MonotoneFunction::new(3, vec![0b001, 0b110]);
        assert!(bottom.implies(&f));
        assert!(f.implies(&top));
        assert!(!top.implies(&f));

        assert_eq!(vec![0, 0, 1], bottom.level());
        assert_eq!(vec![1, 1, 0], f.level());
        assert_eq!(vec![3, 0, 0], top.level());
        assert_eq!(Ordering::Less, bottom.compare_level(&f));
        assert_eq!(Ordering::Greater, top.compare_level(&f));
        assert_eq!(Ordering::Equal, f.compare_level(&f.clone()));
        assert_eq!(Ordering::Less, bottom.compare_level_with(&[1, 1, 1]));
    }

    #[test]
    fn monotone_function_eval() {
        let f = MonotoneFunction::new(3, vec![0b001, 0b110]);
        assert!(f.eval(0b001));
        assert!(f.eval(0b110));
        assert!(!f.eval(0b010));
        assert!(!f.eval(0b000));
    }
}
