use crate::lattice::MonotoneFunction;
use crate::{Function, FunctionKey, Network, NodeId};
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Methods for constructing `Function`s.
impl Function {
    /// Create an empty function (no regulators, no terms) of the given node.
    pub fn new(target: NodeId) -> Function {
        Function {
            target,
            regulators: Vec::new(),
            terms: Vec::new(),
            distance: 0,
            son_consistent: false,
            lattice: OnceCell::new(),
        }
    }

    /// Create a function from a list of terms. Regulators are ordered by their first
    /// appearance.
    pub fn from_terms(target: NodeId, terms: Vec<Vec<NodeId>>) -> Function {
        let mut function = Function::new(target);
        for (i, term) in terms.into_iter().enumerate() {
            // Make sure empty terms are kept as well.
            function.ensure_term(i + 1);
            for regulator in term {
                function.add_regulator_to_term(i + 1, regulator);
            }
        }
        function
    }

    /// A function with one single-regulator term for every given regulator (a disjunction).
    pub fn mk_disjunction(target: NodeId, regulators: &[NodeId]) -> Function {
        Function::from_terms(target, regulators.iter().map(|r| vec![*r]).collect())
    }

    /// A function with a single term containing all given regulators (a conjunction).
    pub fn mk_conjunction(target: NodeId, regulators: &[NodeId]) -> Function {
        Function::from_terms(target, vec![regulators.to_vec()])
    }

    /// Add a regulator into the term with the given (one-based) id, creating the term
    /// if necessary.
    pub fn add_regulator_to_term(&mut self, term: usize, regulator: NodeId) {
        assert!(term > 0, "Term ids start at one.");
        self.ensure_term(term);
        if !self.regulators.contains(&regulator) {
            self.regulators.push(regulator);
        }
        let term = &mut self.terms[term - 1];
        if !term.contains(&regulator) {
            term.push(regulator);
        }
        // The lattice representation is no longer valid.
        self.lattice = OnceCell::new();
    }

    /// **(internal)** Make sure there are at least `count` terms.
    pub(crate) fn ensure_term(&mut self, count: usize) {
        while self.terms.len() < count {
            self.terms.push(Vec::new());
        }
    }

    /// Create a function from a lattice element whose variable `i` is `regulators[i]`.
    pub fn from_lattice(
        target: NodeId,
        regulators: &[NodeId],
        function: MonotoneFunction,
        distance: usize,
    ) -> Function {
        let terms: Vec<Vec<NodeId>> = function
            .clauses()
            .iter()
            .map(|clause| {
                regulators
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| clause & (1u64 << i) != 0)
                    .map(|(_, r)| *r)
                    .collect()
            })
            .collect();
        Function {
            target,
            regulators: regulators.to_vec(),
            terms,
            distance,
            son_consistent: false,
            lattice: OnceCell::from(function),
        }
    }
}

/// Methods for inspecting `Function`s.
impl Function {
    /// The node whose value this function computes.
    pub fn get_target(&self) -> NodeId {
        self.target
    }

    /// Regulators of this function in discovery order.
    pub fn get_regulators(&self) -> &[NodeId] {
        &self.regulators
    }

    pub fn num_regulators(&self) -> usize {
        self.regulators.len()
    }

    /// Terms of this function. Term with id `k` is at index `k - 1`.
    pub fn get_terms(&self) -> &[Vec<NodeId>] {
        &self.terms
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of lattice steps between this function and the function it was derived from.
    pub fn get_distance(&self) -> usize {
        self.distance
    }

    /// True if this function was derived from an already consistent function.
    pub fn is_son_consistent(&self) -> bool {
        self.son_consistent
    }

    pub(crate) fn set_son_consistent(&mut self, value: bool) {
        self.son_consistent = value;
    }

    /// Evaluate the function in the given state.
    ///
    /// A term is satisfied when every regulator has the value required by the sign of its
    /// edge into the target. A function without terms evaluates to `false`.
    ///
    /// Returns `Err` when a regulator has no edge into the target or a regulator value is
    /// missing from the state.
    pub fn evaluate(
        &self,
        network: &Network,
        state: &HashMap<NodeId, bool>,
    ) -> Result<bool, String> {
        for term in &self.terms {
            let mut satisfied = true;
            for regulator in term {
                let edge = network.find_edge(*regulator, self.target).ok_or_else(|| {
                    format!(
                        "Missing edge from {} to {}.",
                        network.get_node_name(*regulator),
                        network.get_node_name(self.target)
                    )
                })?;
                let value = state.get(regulator).ok_or_else(|| {
                    format!("Missing value of {}.", network.get_node_name(*regulator))
                })?;
                if *value != edge.get_sign().satisfied_by() {
                    satisfied = false;
                    break;
                }
            }
            if satisfied {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The lattice representation of this function (built on first use).
    ///
    /// *Panics:* the function must have at most `lattice::MAX_ARITY` regulators.
    pub fn lattice(&self) -> &MonotoneFunction {
        self.lattice.get_or_init(|| {
            let clauses = self
                .terms
                .iter()
                .map(|term| {
                    term.iter()
                        .filter_map(|r| self.regulators.iter().position(|x| x == r))
                        .fold(0u64, |mask, i| mask | (1u64 << i))
                })
                .collect();
            MonotoneFunction::new(self.regulators.len(), clauses)
        })
    }

    /// Immediate neighbours of this function in the lattice: generalizations if `generalize`,
    /// specializations otherwise. Their distance is one more than the distance of `self`.
    pub fn replacements(&self, generalize: bool) -> Vec<Function> {
        self.lattice()
            .replacements(generalize)
            .into_iter()
            .map(|f| Function::from_lattice(self.target, &self.regulators, f, self.distance + 1))
            .collect()
    }

    /// Compare lattice levels. `Greater` means `other` is lower than `self`.
    pub fn compare_level(&self, other: &Function) -> Ordering {
        self.lattice().compare_level(other.lattice())
    }

    /// The canonical structural key of this function.
    ///
    /// Terms are sorted, and duplicate or absorbed terms (supersets of another term) are
    /// dropped. Works for any number of regulators.
    pub fn structural_key(&self) -> FunctionKey {
        let mut regulators = self.regulators.clone();
        regulators.sort();
        let mut terms: Vec<Vec<NodeId>> = self
            .terms
            .iter()
            .map(|term| {
                let mut term = term.clone();
                term.sort();
                term.dedup();
                term
            })
            .collect();
        terms.sort_by_key(|term| term.len());
        terms.dedup();
        let mut minimal: Vec<Vec<NodeId>> = Vec::with_capacity(terms.len());
        for term in terms {
            // Shorter terms come first, so only they can absorb this one.
            if !minimal.iter().any(|m| m.iter().all(|r| term.contains(r))) {
                minimal.push(term);
            }
        }
        minimal.sort();
        FunctionKey {
            target: self.target,
            regulators,
            terms: minimal,
        }
    }

    /// Structural equality of two functions (same regulators, same terms up to ordering
    /// and absorption).
    pub fn is_equal(&self, other: &Function) -> bool {
        self.structural_key() == other.structural_key()
    }

    /// Render the function using node names, e.g. `(a && b) || c`. A function without
    /// terms is rendered as `0`.
    pub fn to_string(&self, network: &Network) -> String {
        if self.terms.is_empty() {
            return "0".to_string();
        }
        self.terms
            .iter()
            .map(|term| {
                let names: Vec<&str> = term.iter().map(|r| network.get_node_name(*r)).collect();
                if names.len() == 1 {
                    names[0].to_string()
                } else {
                    format!("({})", names.join(" && "))
                }
            })
            .collect::<Vec<_>>()
            .join(" || ")
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for Function {}
