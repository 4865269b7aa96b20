use crate::lattice::_impl_monotone_function::{full_mask, minimize};
use crate::lattice::MonotoneFunction;
use fxhash::FxHashSet;

impl MonotoneFunction {
    /// The immediate generalizations of this function among non-degenerate functions.
    pub fn parents(&self) -> Vec<MonotoneFunction> {
        let candidates = self.non_degenerate_frontier(MonotoneFunction::free_parents);
        // Keep only the minimal ones, the rest is reachable through them.
        candidates
            .iter()
            .filter(|g| !candidates.iter().any(|h| h != *g && h.implies(g)))
            .cloned()
            .collect()
    }

    /// The immediate specializations of this function among non-degenerate functions.
    pub fn children(&self) -> Vec<MonotoneFunction> {
        let candidates = self.non_degenerate_frontier(MonotoneFunction::free_children);
        candidates
            .iter()
            .filter(|g| !candidates.iter().any(|h| h != *g && g.implies(h)))
            .cloned()
            .collect()
    }

    /// Neighbours in the given direction: parents if `generalize`, children otherwise.
    pub fn replacements(&self, generalize: bool) -> Vec<MonotoneFunction> {
        if generalize {
            self.parents()
        } else {
            self.children()
        }
    }

    /// **(internal)** Follow the given cover relation through degenerate functions and collect
    /// the first non-degenerate functions on every path (in discovery order).
    fn non_degenerate_frontier<F>(&self, step: F) -> Vec<MonotoneFunction>
    where
        F: Fn(&MonotoneFunction) -> Vec<MonotoneFunction>,
    {
        let mut frontier = Vec::new();
        let mut visited: FxHashSet<MonotoneFunction> = FxHashSet::default();
        let mut stack = step(self);
        while let Some(next) = stack.pop() {
            if !visited.insert(next.clone()) {
                continue;
            }
            if next.is_non_degenerate() {
                frontier.push(next);
            } else {
                stack.extend(step(&next));
            }
        }
        frontier.sort_by(|a, b| a.compare_level(b).then_with(|| a.clauses.cmp(&b.clauses)));
        frontier
    }

    /// Covers of this function in the lattice of all monotone functions (going up).
    ///
    /// Each cover adds one maximal false point as a new clause.
    pub fn free_parents(&self) -> Vec<MonotoneFunction> {
        self.maximal_false_points()
            .into_iter()
            .map(|point| {
                let mut clauses: Vec<u64> = self
                    .clauses
                    .iter()
                    .filter(|c| *c & point != point)
                    .cloned()
                    .collect();
                clauses.push(point);
                MonotoneFunction::new(self.arity, clauses)
            })
            .collect()
    }

    /// Covers of this function in the lattice of all monotone functions (going down).
    ///
    /// Each cover removes one clause and replaces it with its one-variable extensions.
    pub fn free_children(&self) -> Vec<MonotoneFunction> {
        let full = full_mask(self.arity);
        let mut result = Vec::with_capacity(self.clauses.len());
        for (i, removed) in self.clauses.iter().enumerate() {
            let mut clauses: Vec<u64> = self
                .clauses
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, c)| *c)
                .collect();
            for bit in bits(full & !removed) {
                clauses.push(removed | bit);
            }
            result.push(MonotoneFunction::new(self.arity, clauses));
        }
        result
    }

    /// Maximal inputs on which this function is false.
    ///
    /// These are exactly the complements of the minimal transversals of the clauses.
    pub fn maximal_false_points(&self) -> Vec<u64> {
        let full = full_mask(self.arity);
        self.minimal_transversals()
            .into_iter()
            .map(|t| full & !t)
            .collect()
    }

    /// Minimal sets of variables which intersect every clause (Berge's algorithm).
    pub fn minimal_transversals(&self) -> Vec<u64> {
        let mut transversals = vec![0u64];
        for clause in &self.clauses {
            let mut next = Vec::new();
            for t in &transversals {
                if t & clause != 0 {
                    next.push(*t);
                } else {
                    next.extend(bits(*clause).map(|bit| t | bit));
                }
            }
            transversals = minimize(next);
        }
        transversals
    }
}

/// **(internal)** Iterate over the individual set bits of a mask.
fn bits(mask: u64) -> impl Iterator<Item = u64> {
    (0..64).map(|i| 1u64 << i).filter(move |bit| mask & bit != 0)
}

#[cfg(test)]
mod tests {
    use crate::lattice::MonotoneFunction;
    use pretty_assertions::assert_eq;

    fn f(arity: usize, clauses: &[u64]) -> MonotoneFunction {
        MonotoneFunction::new(arity, clauses.to_vec())
    }

    #[test]
    fn transversals_and_false_points() {
        // (a && b) || c
        let g = f(3, &[0b011, 0b100]);
        assert_eq!(vec![0b101, 0b110], g.minimal_transversals());
        assert_eq!(vec![0b010, 0b001], g.maximal_false_points());
        for point in g.maximal_false_points() {
            assert!(!g.eval(point));
        }
    }

    #[test]
    fn two_variable_lattice() {
        let bottom = MonotoneFunction::mk_bottom(2);
        let top = MonotoneFunction::mk_top(2);
        assert_eq!(vec![top.clone()], bottom.parents());
        assert_eq!(vec![bottom.clone()], top.children());
        assert!(top.parents().is_empty());
        assert!(bottom.children().is_empty());
    }

    #[test]
    fn three_variable_neighbours() {
        let bottom = MonotoneFunction::mk_bottom(3);
        // From a && b && c the first non-degenerate functions are (x && y) || (x && z).
        let parents = bottom.parents();
        assert_eq!(3, parents.len());
        for parent in &parents {
            assert!(parent.is_non_degenerate());
            assert!(bottom.implies(parent));
            assert_eq!(vec![0, 2, 0], parent.level());
        }
        // a || (b && c) is only covered by the top, a || b and a || c are degenerate.
        let g = f(3, &[0b001, 0b110]);
        assert_eq!(vec![MonotoneFunction::mk_top(3)], g.parents());
        // Below it is the majority function, a && (b || c) is further down.
        let majority = f(3, &[0b011, 0b101, 0b110]);
        assert_eq!(vec![majority.clone()], g.children());
        assert!(majority.implies(&g));
        assert!(g.compare_level(&majority).is_gt());
    }

    #[test]
    fn covers_are_minimal() {
        let top = MonotoneFunction::mk_top(3);
        let children = top.children();
        // a || (b && c), b || (a && c) and c || (a && b)
        assert_eq!(3, children.len());
        for x in &children {
            for y in &children {
                assert!(x == y || !x.implies(y));
            }
        }
    }
}
