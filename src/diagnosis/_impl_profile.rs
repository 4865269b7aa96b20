use crate::diagnosis::Profile;
use crate::{Network, NodeId};
use std::collections::HashMap;

impl Profile {
    /// A steady-state profile with a single labeling.
    pub fn new_steady_state(name: &str, state: HashMap<NodeId, bool>) -> Profile {
        Profile {
            name: name.to_string(),
            steady_state: true,
            states: vec![state],
            updates: Vec::new(),
        }
    }

    /// A time-series profile with one labeling per time point.
    pub fn new_time_series(name: &str, states: Vec<HashMap<NodeId, bool>>) -> Profile {
        let transitions = states.len().saturating_sub(1);
        Profile {
            name: name.to_string(),
            steady_state: false,
            states,
            updates: vec![Vec::new(); transitions],
        }
    }

    /// **(internal)** Build a profile from `(time, node, value)` observations. A steady
    /// state ignores the time component.
    pub(crate) fn from_values(
        name: &str,
        steady_state: bool,
        values: Vec<(usize, NodeId, bool)>,
    ) -> Profile {
        let mut profile = if steady_state {
            Profile::new_steady_state(name, HashMap::new())
        } else {
            Profile::new_time_series(name, Vec::new())
        };
        for (time, node, value) in values {
            let time = if steady_state { 0 } else { time };
            profile.set_value(time, node, value);
        }
        profile
    }

    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_steady_state(&self) -> bool {
        self.steady_state
    }

    /// Number of observed time points (one for a steady state).
    pub fn num_time_points(&self) -> usize {
        self.states.len()
    }

    /// The labeling at time point `time`.
    pub fn get_state(&self, time: usize) -> &HashMap<NodeId, bool> {
        &self.states[time]
    }

    /// Observed value of `node` at `time`, if any.
    pub fn get_value(&self, time: usize, node: NodeId) -> Option<bool> {
        self.states.get(time).and_then(|s| s.get(&node).cloned())
    }

    /// Set the value of `node` at `time`, extending the time series when necessary.
    pub fn set_value(&mut self, time: usize, node: NodeId, value: bool) {
        while self.states.len() <= time {
            self.states.push(HashMap::new());
            if self.states.len() > 1 {
                self.updates.push(Vec::new());
            }
        }
        self.states[time].insert(node, value);
    }

    /// Nodes updated in the transition from `time` to `time + 1`.
    pub fn get_updates(&self, time: usize) -> &[NodeId] {
        self.updates.get(time).map(|u| u.as_slice()).unwrap_or(&[])
    }

    /// Record the nodes updated in the transition from `time` to `time + 1`.
    pub fn set_updates(&mut self, time: usize, nodes: Vec<NodeId>) {
        if time < self.updates.len() {
            self.updates[time] = nodes;
        }
    }

    /// True if `node` was updated in the transition from `time` to `time + 1`.
    pub fn is_updated(&self, time: usize, node: NodeId) -> bool {
        self.get_updates(time).contains(&node)
    }

    /// All `(time, node)` cells of the given network which have no observed value.
    pub fn unknown_values(&self, network: &Network) -> Vec<(usize, NodeId)> {
        let mut result = Vec::new();
        for (time, state) in self.states.iter().enumerate() {
            for node in network.nodes() {
                if !state.contains_key(&node) {
                    result.push((time, node));
                }
            }
        }
        result
    }
}
