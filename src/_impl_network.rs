use crate::diagnosis::Profile;
use crate::{
    Edge, Function, Monotonicity, Network, Node, NodeId, RevisionError,
    UpdateDiscipline,
};
use std::collections::HashMap;
use std::ops::Index;
use std::rc::Rc;

/// Methods for safely constructing new instances of `Network`s.
impl Network {
    /// Create a new `Network` with nodes using the given names, no edges and empty
    /// functions.
    ///
    /// The ordering of the nodes is preserved. A repeated name refers to the node created
    /// by its first occurrence.
    pub fn new(names: Vec<String>) -> Network {
        let mut network = Network {
            nodes: Vec::new(),
            node_to_index: HashMap::new(),
            edges: Vec::new(),
            regulators: Vec::new(),
            has_steady_state: false,
            has_time_series: false,
            dynamic_discipline: None,
        };
        for name in &names {
            network.ensure_node(name);
        }
        network
    }

    /// Find a node with the given name, or create it if it does not exist yet.
    pub fn ensure_node(&mut self, name: &str) -> NodeId {
        if let Some(id) = self.find_node(name) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.node_to_index.insert(name.to_string(), id);
        self.push_node(name.to_string(), id);
        id
    }

    /// **(internal)** Append a node with an empty function to all node-indexed structures.
    fn push_node(&mut self, name: String, id: NodeId) {
        self.nodes.push(Node {
            name,
            function: Rc::new(Function::new(id)),
        });
        self.edges.push(Vec::new());
        self.regulators.push(Vec::new());
    }

    /// Add a new `Edge` to this `Network`.
    ///
    /// Returns `Err` when an edge between the two nodes already exists.
    pub fn add_edge(
        &mut self,
        start: NodeId,
        end: NodeId,
        sign: Monotonicity,
        fixed: bool,
    ) -> Result<(), String> {
        if self.find_edge(start, end).is_some() {
            return Err(format!(
                "Invalid edge: {} already regulates {}.",
                self.get_node_name(start),
                self.get_node_name(end)
            ));
        }
        let mut edge = Edge::new(start, end, sign);
        edge.fixed = fixed;
        self.insert_edge(edge);
        Ok(())
    }

    /// Mark an existing edge as fixed (immutable during repair).
    pub fn set_fixed(&mut self, start: NodeId, end: NodeId) -> Result<(), String> {
        match self.find_edge_mut(start, end) {
            Some(edge) => {
                edge.fixed = true;
                Ok(())
            }
            None => Err(format!(
                "Cannot fix edge ({},{}): edge does not exist.",
                self.get_node_name(start),
                self.get_node_name(end)
            )),
        }
    }

    /// Replace the function of a node.
    ///
    /// Returns `Err` if the function belongs to a different node or references a regulator
    /// which has no edge into the node.
    pub fn set_function(&mut self, function: Function) -> Result<(), String> {
        let target = function.get_target();
        if target.0 >= self.nodes.len() {
            return Err(format!("Unknown function target {}.", target));
        }
        for regulator in function.get_regulators() {
            if self.find_edge(*regulator, target).is_none() {
                return Err(format!(
                    "Function of {} uses {} which does not regulate it.",
                    self.get_node_name(target),
                    self.get_node_name(*regulator)
                ));
            }
        }
        self.nodes[target.0].function = Rc::new(function);
        Ok(())
    }

    /// Register the update discipline of a set of observations.
    ///
    /// Steady state can be combined with any dynamic discipline, but at most one dynamic
    /// discipline can be used in a single `Network`.
    pub fn add_update_discipline(
        &mut self,
        discipline: UpdateDiscipline,
    ) -> Result<(), RevisionError> {
        if discipline == UpdateDiscipline::SteadyState {
            self.has_steady_state = true;
            return Ok(());
        }
        match self.dynamic_discipline {
            Some(current) if current != discipline => {
                Err(RevisionError::ConflictingUpdaters(current, discipline))
            }
            _ => {
                self.dynamic_discipline = Some(discipline);
                self.has_time_series = true;
                Ok(())
            }
        }
    }
}

/// Some basic utility methods for inspecting the `Network`.
impl Network {
    /// The number of nodes in this `Network`.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all node ids of this `Network`.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Find a `NodeId` for the given name, or `None` if the node does not exist.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.node_to_index.get(name).cloned()
    }

    /// Return a `Node` corresponding to the given `NodeId`.
    pub fn get_node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Shorthand for `self.get_node(id).get_name()`.
    pub fn get_node_name(&self, id: NodeId) -> &str {
        self.nodes[id.0].name.as_str()
    }

    /// The currently active function of the given node.
    pub fn get_function(&self, id: NodeId) -> &Rc<Function> {
        &self.nodes[id.0].function
    }

    /// Find an `Edge` between two nodes if it exists, `None` otherwise.
    pub fn find_edge(&self, start: NodeId, end: NodeId) -> Option<&Edge> {
        self.edges[start.0].iter().find(|e| e.end == end)
    }

    /// **(internal)** Mutable variant of `find_edge`.
    fn find_edge_mut(&mut self, start: NodeId, end: NodeId) -> Option<&mut Edge> {
        self.edges[start.0].iter_mut().find(|e| e.end == end)
    }

    /// Iterate over all edges of this `Network`, ordered by start and then end node.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().flatten()
    }

    /// The number of edges in this `Network`.
    pub fn num_edges(&self) -> usize {
        self.edges.iter().map(|e| e.len()).sum()
    }

    /// Return the sorted list of nodes with an edge into `target`.
    pub fn regulators(&self, target: NodeId) -> &[NodeId] {
        &self.regulators[target.0]
    }

    pub fn has_steady_state(&self) -> bool {
        self.has_steady_state
    }

    pub fn has_time_series(&self) -> bool {
        self.has_time_series
    }

    /// The dynamic update discipline used by time-series observations (if any).
    pub fn dynamic_discipline(&self) -> Option<UpdateDiscipline> {
        self.dynamic_discipline
    }

    /// The discipline under which the given profile must be evaluated.
    ///
    /// Steady-state profiles use `SteadyState` semantics. Time series use the registered
    /// dynamic discipline, or synchronous updates if none was registered.
    pub fn discipline_for(&self, profile: &Profile) -> UpdateDiscipline {
        if profile.is_steady_state() {
            UpdateDiscipline::SteadyState
        } else {
            self.dynamic_discipline.unwrap_or(UpdateDiscipline::Synchronous)
        }
    }
}

/// **(internal)** Raw mutation primitives. These do not validate anything and are only
/// used through the scoped `NetworkTrial` guard, which restores every change.
impl Network {
    /// Insert an edge, keeping both indices sorted.
    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        let (start, end) = (edge.start, edge.end);
        let forward = &mut self.edges[start.0];
        let position = forward.partition_point(|e| e.end < end);
        forward.insert(position, edge);
        let reverse = &mut self.regulators[end.0];
        if let Err(position) = reverse.binary_search(&start) {
            reverse.insert(position, start);
        }
    }

    /// Remove an edge and return it, `None` if it does not exist.
    pub(crate) fn remove_edge(&mut self, start: NodeId, end: NodeId) -> Option<Edge> {
        let forward = &mut self.edges[start.0];
        let position = forward.iter().position(|e| e.end == end)?;
        let edge = forward.remove(position);
        self.regulators[end.0].retain(|r| *r != start);
        Some(edge)
    }

    /// Flip the sign of an edge. Returns `false` if the edge does not exist.
    pub(crate) fn flip_edge(&mut self, start: NodeId, end: NodeId) -> bool {
        if let Some(edge) = self.find_edge_mut(start, end) {
            edge.sign = edge.sign.flipped();
            true
        } else {
            false
        }
    }

    /// Swap the function of a node, returning the previous one.
    pub(crate) fn swap_function(&mut self, id: NodeId, function: Rc<Function>) -> Rc<Function> {
        std::mem::replace(&mut self.nodes[id.0].function, function)
    }
}

impl Index<NodeId> for Network {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output {
        self.get_node(index)
    }
}

impl Node {
    /// Human-readable name of this node.
    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    /// The active regulatory function of this node.
    pub fn get_function(&self) -> &Rc<Function> {
        &self.function
    }
}

#[cfg(test)]
mod tests {
    use crate::Monotonicity::{Activation, Inhibition};
    use crate::UpdateDiscipline::{Asynchronous, SteadyState, Synchronous};
    use crate::{Network, RevisionError};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn network_nodes_and_edges() {
        let mut network = Network::new(names(&["a", "b"]));
        let a = network.find_node("a").unwrap();
        let b = network.find_node("b").unwrap();
        let c = network.ensure_node("c");
        assert_eq!(c, network.ensure_node("c"));
        assert_eq!(3, network.num_nodes());
        assert_eq!("c", network[c].get_name());

        network.add_edge(c, b, Activation, false).unwrap();
        network.add_edge(a, b, Inhibition, false).unwrap();
        assert!(network.add_edge(a, b, Activation, false).is_err());
        assert_eq!(&[a, c], network.regulators(b));
        assert_eq!(2, network.num_edges());

        network.set_fixed(a, b).unwrap();
        assert!(network.find_edge(a, b).unwrap().is_fixed());
        assert!(network.set_fixed(b, a).is_err());
    }

    #[test]
    fn repeated_names_share_a_node() {
        let network = Network::new(names(&["a", "b", "a"]));
        assert_eq!(2, network.num_nodes());
        assert_eq!(0, network.find_node("a").unwrap().to_index());
        assert_eq!(1, network.find_node("b").unwrap().to_index());
        assert_eq!(2, network.nodes().count());
    }

    #[test]
    fn network_raw_mutation() {
        let mut network = Network::new(names(&["a", "b", "c"]));
        let a = network.find_node("a").unwrap();
        let b = network.find_node("b").unwrap();
        let c = network.find_node("c").unwrap();
        network.add_edge(a, c, Activation, false).unwrap();
        network.add_edge(b, c, Activation, false).unwrap();

        let removed = network.remove_edge(a, c).unwrap();
        assert_eq!(&[b], network.regulators(c));
        assert!(network.remove_edge(a, c).is_none());
        network.insert_edge(removed);
        assert_eq!(&[a, b], network.regulators(c));

        assert!(network.flip_edge(b, c));
        assert_eq!(Inhibition, network.find_edge(b, c).unwrap().get_sign());
        assert!(!network.flip_edge(c, b));
    }

    #[test]
    fn network_update_disciplines() {
        let mut network = Network::new(names(&["a"]));
        network.add_update_discipline(SteadyState).unwrap();
        network.add_update_discipline(Synchronous).unwrap();
        network.add_update_discipline(Synchronous).unwrap();
        assert!(network.has_steady_state());
        assert!(network.has_time_series());
        assert_eq!(
            Err(RevisionError::ConflictingUpdaters(Synchronous, Asynchronous)),
            network.add_update_discipline(Asynchronous)
        );
        assert_eq!(Some(Synchronous), network.dynamic_discipline());
    }
}
