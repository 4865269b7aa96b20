use crate::{Edge, Function, Network, NodeId};
use std::ops::Deref;
use std::rc::Rc;

/// **(internal)** A single reversible change applied through a `NetworkTrial`.
enum Undo {
    Flipped(NodeId, NodeId),
    Removed(Edge),
    Added(NodeId, NodeId),
    Function(NodeId, Rc<Function>),
}

/// A scope of hypothetical changes to a `Network`.
///
/// Every change made through the trial is logged, and all of them are reverted (in reverse
/// order) when the trial is dropped. Since the network keeps its edges sorted, the restored
/// network is structurally identical to the original one, and replaced functions are
/// restored by swapping the original `Rc` back in.
///
/// Trials can be nested: the changes of a nested trial are reverted first.
pub struct NetworkTrial<'a> {
    network: &'a mut Network,
    undo: Vec<Undo>,
}

impl<'a> NetworkTrial<'a> {
    pub fn new(network: &'a mut Network) -> NetworkTrial<'a> {
        NetworkTrial {
            network,
            undo: Vec::new(),
        }
    }

    /// Open a nested trial whose changes are reverted before the changes of this one.
    pub fn nested(&mut self) -> NetworkTrial<'_> {
        NetworkTrial::new(self.network)
    }

    /// Flip the sign of an existing edge. Returns `false` if there is no such edge.
    pub fn flip_edge(&mut self, start: NodeId, end: NodeId) -> bool {
        let flipped = self.network.flip_edge(start, end);
        if flipped {
            self.undo.push(Undo::Flipped(start, end));
        }
        flipped
    }

    /// Remove an existing edge. Returns `false` if there is no such edge.
    pub fn remove_edge(&mut self, start: NodeId, end: NodeId) -> bool {
        match self.network.remove_edge(start, end) {
            Some(edge) => {
                self.undo.push(Undo::Removed(edge));
                true
            }
            None => false,
        }
    }

    /// Add a new edge. Returns `false` if the two nodes are already connected.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.network.find_edge(edge.get_start(), edge.get_end()).is_some() {
            return false;
        }
        self.undo.push(Undo::Added(edge.get_start(), edge.get_end()));
        self.network.insert_edge(edge);
        true
    }

    /// Replace the function of a node.
    pub fn set_function(&mut self, id: NodeId, function: Rc<Function>) {
        let previous = self.network.swap_function(id, function);
        self.undo.push(Undo::Function(id, previous));
    }
}

impl Deref for NetworkTrial<'_> {
    type Target = Network;

    fn deref(&self) -> &Self::Target {
        self.network
    }
}

impl Drop for NetworkTrial<'_> {
    fn drop(&mut self) {
        while let Some(change) = self.undo.pop() {
            match change {
                Undo::Flipped(start, end) => {
                    self.network.flip_edge(start, end);
                }
                Undo::Removed(edge) => self.network.insert_edge(edge),
                Undo::Added(start, end) => {
                    self.network.remove_edge(start, end);
                }
                Undo::Function(id, function) => {
                    self.network.swap_function(id, function);
                }
            }
        }
    }
}
