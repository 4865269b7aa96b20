use crate::classifier::Classification;
use crate::repair::_impl_comparable::enqueue_unseen;
use crate::repair::{NodeSearch, TopologyEdits};
use crate::{Function, FunctionKey, Network};
use fxhash::FxHashSet;
use std::cmp::Ordering;
use std::collections::VecDeque;
use tracing::debug;

/// **(internal)** Consistent functions found by the non-comparable search, bucketed by their
/// lattice level relative to the original function.
#[derive(Default)]
struct LevelBuckets {
    consistent: Vec<Function>,
    equal: Vec<Function>,
    best_below: Vec<Function>,
    best_above: Vec<Function>,
}

impl LevelBuckets {
    /// Keep `candidate` among the best functions below the original, i.e. the highest ones.
    fn offer_below(&mut self, candidate: &Function) {
        match self.best_below.first().map(|best| best.compare_level(candidate)) {
            None | Some(Ordering::Equal) => self.best_below.push(candidate.clone()),
            Some(Ordering::Less) => self.best_below = vec![candidate.clone()],
            Some(Ordering::Greater) => {}
        }
    }

    /// Keep `candidate` among the best functions above the original, i.e. the lowest ones.
    fn offer_above(&mut self, candidate: &Function) {
        match self.best_above.first().map(|best| best.compare_level(candidate)) {
            None | Some(Ordering::Equal) => self.best_above.push(candidate.clone()),
            Some(Ordering::Greater) => self.best_above = vec![candidate.clone()],
            Some(Ordering::Less) => {}
        }
    }

    /// The functions to report: functions of the original level if there are any, the
    /// closest ones from both sides otherwise.
    fn into_ranked(self) -> Vec<Function> {
        if self.equal.is_empty() {
            self.best_below.into_iter().chain(self.best_above).collect()
        } else {
            self.equal
        }
    }
}

impl NodeSearch<'_> {
    /// Search for consistent functions over the regulators of `original` which are not
    /// necessarily comparable with it.
    ///
    /// The search sweeps the lattice in one direction, starting from its bottom (the
    /// conjunction of all regulators) when `original` lies in the bottom half, or from its top
    /// (the disjunction) otherwise. With `compare_level_function`, only the consistent
    /// functions closest to the level of `original` are reported, otherwise all of them.
    pub(super) fn search_non_comparable(
        &mut self,
        network: &Network,
        original: &Function,
        edits: TopologyEdits,
    ) -> bool {
        if original.num_regulators() < 2 {
            return false;
        }
        let level_compare = self.config.compare_level_function;
        let generalize = if !level_compare {
            true
        } else if self.config.exact_middle_determination {
            original.lattice().is_in_bottom_half()
        } else {
            original.lattice().is_below_middle_level()
        };
        debug!(
            node = network.get_node_name(self.node),
            regulators = original.num_regulators(),
            generalize,
            "Searching for non-comparable functions."
        );

        let target = original.get_target();
        let seed = if generalize {
            Function::mk_conjunction(target, original.get_regulators())
        } else {
            Function::mk_disjunction(target, original.get_regulators())
        };
        let mut seen: FxHashSet<FunctionKey> = FxHashSet::default();
        seen.insert(seed.structural_key());
        let mut queue = VecDeque::from([seed]);
        let mut buckets = LevelBuckets::default();
        let mut visited = 0usize;

        while let Some(candidate) = queue.pop_front() {
            visited += 1;
            let classification = self.classify(network, &candidate);
            let is_consistent = classification.is_consistent();
            if is_consistent {
                buckets.consistent.push(candidate.clone());
                if level_compare {
                    let cmp = original.compare_level(&candidate);
                    let has_equal = !buckets.equal.is_empty();
                    if cmp == Ordering::Equal {
                        buckets.equal.push(candidate);
                        continue;
                    }
                    if has_equal
                        && ((generalize && cmp == Ordering::Less)
                            || (!generalize && cmp == Ordering::Greater))
                    {
                        continue;
                    }
                    if cmp == Ordering::Greater && !has_equal {
                        buckets.offer_below(&candidate);
                        if !generalize {
                            continue;
                        }
                    }
                    if cmp == Ordering::Less && !has_equal {
                        buckets.offer_above(&candidate);
                        if generalize {
                            continue;
                        }
                    }
                }
            } else if self.is_pruned(original, &candidate, classification, generalize, &buckets) {
                continue;
            }

            let mut next = candidate.replacements(generalize);
            for function in next.iter_mut() {
                function.set_son_consistent(is_consistent);
            }
            enqueue_unseen(&mut queue, &mut seen, next);
        }

        let found = !buckets.consistent.is_empty();
        debug!(
            visited,
            consistent = buckets.consistent.len(),
            "Non-comparable search finished."
        );
        let repairs = if level_compare {
            buckets.into_ranked()
        } else {
            buckets.consistent
        };
        for function in repairs {
            self.record(edits, Some(function));
        }
        found
    }

    /// **(internal)** True if the descendants of an inconsistent `candidate` cannot lead to
    /// a better repair.
    fn is_pruned(
        &self,
        original: &Function,
        candidate: &Function,
        classification: Classification,
        generalize: bool,
        buckets: &LevelBuckets,
    ) -> bool {
        if candidate.is_son_consistent() {
            return true;
        }
        let wrong_direction = match classification {
            Classification::Double => true,
            Classification::SingleParticularize => generalize,
            Classification::SingleGeneralize => !generalize,
            Classification::Consistent => false,
        };
        if wrong_direction || !self.config.compare_level_function {
            return wrong_direction;
        }
        let has_equal = !buckets.equal.is_empty();
        let cmp = candidate.compare_level(original);
        if has_equal && generalize && cmp == Ordering::Greater {
            return true;
        }
        if has_equal && !generalize && cmp == Ordering::Less {
            return true;
        }
        if generalize {
            if let Some(best) = buckets.best_above.first() {
                if best.compare_level(candidate) == Ordering::Less {
                    return true;
                }
            }
        } else if let Some(best) = buckets.best_below.first() {
            if best.compare_level(candidate) == Ordering::Greater {
                return true;
            }
        }
        false
    }
}
