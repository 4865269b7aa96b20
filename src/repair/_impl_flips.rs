use crate::repair::_impl_combinations::combinations;
use crate::repair::{NetworkTrial, NodeSearch, TopologyEdits};
use crate::Edge;
use tracing::debug;

impl NodeSearch<'_> {
    /// Try flipping an increasing number of non-fixed incoming edges of the current
    /// function, dispatching every resulting topology to the function repair.
    ///
    /// If the node already has a repair, no more flips than it uses are tried. Stops at the
    /// first number of flips which yields a repair.
    pub(super) fn try_flips(
        &mut self,
        trial: &mut NetworkTrial,
        added: &[Edge],
        removed: &[Edge],
    ) -> bool {
        let function = trial.get_function(self.node).clone();
        let candidates: Vec<Edge> = function
            .get_regulators()
            .iter()
            .filter_map(|r| trial.find_edge(*r, self.node))
            .filter(|e| !e.is_fixed())
            .cloned()
            .collect();
        let mut max_flips = candidates.len();
        if let Some(repaired) = self.repaired_node() {
            max_flips = max_flips.min(repaired.n_flip_operations());
        }

        let mut found = false;
        for n_flips in 0..=max_flips {
            debug!(n_flips, "Trying edge flips.");
            for flipped in combinations(&candidates, n_flips) {
                let mut flip_trial = trial.nested();
                for edge in &flipped {
                    flip_trial.flip_edge(edge.get_start(), edge.get_end());
                }
                let edits = TopologyEdits {
                    flipped: &flipped,
                    added,
                    removed,
                };
                if self.dispatch(&flip_trial, edits) {
                    found = true;
                    if !self.config.all_opt {
                        return true;
                    }
                }
            }
            if found {
                break;
            }
        }
        found
    }
}
