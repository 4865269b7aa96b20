use crate::{Edge, Monotonicity, Network, NodeId};

impl Edge {
    /// **(internal)** Create a new non-fixed edge. Only a `Network` (or the repair search, for
    /// hypothetical edges) should construct edges.
    pub(crate) fn new(start: NodeId, end: NodeId, sign: Monotonicity) -> Edge {
        Edge {
            start,
            end,
            sign,
            fixed: false,
        }
    }

    pub fn get_start(&self) -> NodeId {
        self.start
    }

    pub fn get_end(&self) -> NodeId {
        self.end
    }

    pub fn get_sign(&self) -> Monotonicity {
        self.sign
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// True if both edges connect the same ordered pair of nodes (regardless of sign).
    pub fn same_pair(&self, other: &Edge) -> bool {
        self.start == other.start && self.end == other.end
    }

    /// Render the edge as `(start,end)` using node names of the given `Network`.
    pub fn to_string(&self, network: &Network) -> String {
        format!(
            "({},{})",
            network.get_node_name(self.start),
            network.get_node_name(self.end)
        )
    }
}
