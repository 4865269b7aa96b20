use crate::repair::{NodeSearch, TopologyEdits};
use crate::{Function, FunctionKey, Network};
use fxhash::FxHashSet;
use std::collections::VecDeque;
use tracing::debug;

impl NodeSearch<'_> {
    /// Breadth-first search for the closest consistent generalization (or particularization)
    /// of `original`.
    ///
    /// Only candidates at the distance of the first found repair are considered. Unless
    /// `show_all_functions` is set, the search stops at the first repair. With
    /// `force_optimum`, a failed search continues as a non-comparable search.
    pub(super) fn search_comparable(
        &mut self,
        network: &Network,
        original: &Function,
        edits: TopologyEdits,
        generalize: bool,
    ) -> bool {
        if original.num_regulators() < 2 {
            return false;
        }
        debug!(
            node = network.get_node_name(self.node),
            regulators = original.num_regulators(),
            generalize,
            "Searching for comparable functions."
        );

        let mut queue: VecDeque<Function> = VecDeque::new();
        let mut seen: FxHashSet<FunctionKey> = FxHashSet::default();
        enqueue_unseen(&mut queue, &mut seen, original.replacements(generalize));

        let mut repaired_distance: Option<usize> = None;
        while let Some(candidate) = queue.pop_front() {
            if let Some(distance) = repaired_distance {
                if candidate.get_distance() > distance {
                    continue;
                }
            }
            if self.classify(network, &candidate).is_consistent() {
                debug!(
                    function = candidate.to_string(network),
                    distance = candidate.get_distance(),
                    "Found consistent function."
                );
                repaired_distance = Some(candidate.get_distance());
                self.record(edits, Some(candidate));
                if !self.config.show_all_functions {
                    break;
                }
                // Neighbours of a repair are farther away than the repair itself.
            } else {
                enqueue_unseen(&mut queue, &mut seen, candidate.replacements(generalize));
            }
        }

        let found = repaired_distance.is_some();
        if !found && self.config.force_optimum {
            return self.search_non_comparable(network, original, edits);
        }
        found
    }
}

/// **(internal)** Append functions that were not seen yet to the end of the queue.
pub(super) fn enqueue_unseen(
    queue: &mut VecDeque<Function>,
    seen: &mut FxHashSet<FunctionKey>,
    candidates: Vec<Function>,
) {
    for candidate in candidates {
        if seen.insert(candidate.structural_key()) {
            queue.push_back(candidate);
        }
    }
}
