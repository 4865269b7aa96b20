use crate::diagnosis::Profile;
use crate::{Function, Monotonicity, Network, NodeId, RevisionError, UpdateDiscipline};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

lazy_static! {
    /// Matches a single fact `name(arguments).`
    static ref FACT: Regex =
        Regex::new(r"(?P<name>[a-zA-Z_][a-zA-Z0-9_]*)\s*\((?P<args>[^()]*)\)\s*\.").unwrap();

    /// Matches a term range `1..K` used by `functionOr`.
    static ref RANGE: Regex = Regex::new(r"^(?P<from>\d+)\s*\.\.\s*(?P<to>\d+)$").unwrap();
}

/// **(internal)** A single fact together with the line it was found on.
struct Fact {
    line: usize,
    name: String,
    args: Vec<String>,
}

/// **(internal)** Split the input into facts. `%` starts a comment which spans the rest of
/// the line. Anything which is not a fact is reported as an error.
fn read_facts(input: &str) -> Result<Vec<Fact>, RevisionError> {
    let mut facts = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = match line.find('%') {
            Some(comment) => &line[..comment],
            None => line,
        };
        let rest = FACT.replace_all(line, "");
        if !rest.trim().is_empty() {
            return Err(parse_error(i + 1, format!("Unexpected `{}`.", rest.trim())));
        }
        for capture in FACT.captures_iter(line) {
            let args = capture["args"]
                .split(',')
                .map(|arg| arg.trim().trim_matches('"').to_string())
                .collect();
            facts.push(Fact {
                line: i + 1,
                name: capture["name"].to_string(),
                args,
            });
        }
    }
    Ok(facts)
}

fn parse_error(line: usize, message: String) -> RevisionError {
    RevisionError::Parse { line, message }
}

impl Fact {
    /// Fail unless the fact has exactly `count` arguments.
    fn expect_args(&self, count: usize) -> Result<(), RevisionError> {
        if self.args.len() == count {
            Ok(())
        } else {
            Err(parse_error(
                self.line,
                format!(
                    "`{}` expects {} arguments, found {}.",
                    self.name,
                    count,
                    self.args.len()
                ),
            ))
        }
    }

    /// Parse the argument at `index` as a number.
    fn number(&self, index: usize) -> Result<usize, RevisionError> {
        self.args[index].parse::<usize>().map_err(|_| {
            parse_error(
                self.line,
                format!("Expected a number, found `{}`.", self.args[index]),
            )
        })
    }

    /// Parse the argument at `index` as a Boolean value (`0` or `1`).
    fn bit(&self, index: usize) -> Result<bool, RevisionError> {
        match self.args[index].as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(parse_error(
                self.line,
                format!("Expected 0 or 1, found `{}`.", other),
            )),
        }
    }
}

impl Network {
    /// Read a network from logic-program facts.
    ///
    /// The supported facts are `vertex(v).`, `edge(u,v,S).` (`S` is `1` for activation and
    /// `0` for inhibition), `fixed(u,v).`, `functionOr(v,K).` or `functionOr(v,1..K).`
    /// (the function of `v` has `K` terms) and `functionAnd(v,K,u).` (`u` appears in term
    /// `K` of the function of `v`). Nodes are created in the order of their first mention.
    pub fn from_facts(input: &str) -> Result<Network, RevisionError> {
        let facts = read_facts(input)?;
        let mut network = Network::new(Vec::new());
        let mut fixed: Vec<(usize, NodeId, NodeId)> = Vec::new();
        let mut terms: HashMap<NodeId, (usize, usize)> = HashMap::new();
        let mut regulators: Vec<(usize, NodeId, usize, NodeId)> = Vec::new();

        for fact in &facts {
            match fact.name.as_str() {
                "vertex" => {
                    fact.expect_args(1)?;
                    network.ensure_node(&fact.args[0]);
                }
                "edge" => {
                    fact.expect_args(3)?;
                    let start = network.ensure_node(&fact.args[0]);
                    let end = network.ensure_node(&fact.args[1]);
                    let sign = fact.number(2).ok().and_then(|s| u8::try_from(s).ok());
                    let Some(sign) = sign.and_then(Monotonicity::try_from_bit) else {
                        return Err(parse_error(
                            fact.line,
                            format!("Invalid edge sign `{}`.", fact.args[2]),
                        ));
                    };
                    network
                        .add_edge(start, end, sign, false)
                        .map_err(|e| parse_error(fact.line, e))?;
                }
                "fixed" => {
                    fact.expect_args(2)?;
                    let start = network.ensure_node(&fact.args[0]);
                    let end = network.ensure_node(&fact.args[1]);
                    fixed.push((fact.line, start, end));
                }
                "functionOr" => {
                    fact.expect_args(2)?;
                    let target = network.ensure_node(&fact.args[0]);
                    let count = match RANGE.captures(&fact.args[1]) {
                        Some(range) => range["to"].parse::<usize>().map_err(|_| {
                            parse_error(fact.line, format!("Invalid range `{}`.", fact.args[1]))
                        })?,
                        None => fact.number(1)?,
                    };
                    let entry = terms.entry(target).or_insert((fact.line, 0));
                    entry.1 = entry.1.max(count);
                }
                "functionAnd" => {
                    fact.expect_args(3)?;
                    let target = network.ensure_node(&fact.args[0]);
                    let term = fact.number(1)?;
                    if term == 0 {
                        return Err(parse_error(fact.line, "Term ids start at 1.".to_string()));
                    }
                    let regulator = network.ensure_node(&fact.args[2]);
                    regulators.push((fact.line, target, term, regulator));
                }
                other => {
                    warn!(line = fact.line, fact = other, "Ignoring unknown fact.");
                }
            }
        }

        for (line, start, end) in fixed {
            network
                .set_fixed(start, end)
                .map_err(|e| parse_error(line, e))?;
        }

        let mut functions: HashMap<NodeId, (usize, Function)> = HashMap::new();
        for (target, (line, count)) in &terms {
            let mut function = Function::new(*target);
            for term in 1..=*count {
                function.ensure_term(term);
            }
            functions.insert(*target, (*line, function));
        }
        for (line, target, term, regulator) in regulators {
            if network.find_edge(regulator, target).is_none() {
                return Err(parse_error(
                    line,
                    format!(
                        "{} is used in the function of {}, but there is no such edge.",
                        network.get_node_name(regulator),
                        network.get_node_name(target)
                    ),
                ));
            }
            let (_, function) = functions
                .entry(target)
                .or_insert_with(|| (line, Function::new(target)));
            function.add_regulator_to_term(term, regulator);
        }
        let mut functions: Vec<(usize, Function)> = functions.into_values().collect();
        functions.sort_by_key(|(_, f)| f.get_target());
        for (line, function) in functions {
            network
                .set_function(function)
                .map_err(|e| parse_error(line, e))?;
        }
        Ok(network)
    }
}

/// **(internal)** Observation facts of a single profile.
#[derive(Default)]
struct ProfileFacts {
    steady_state: Option<bool>,
    values: Vec<(usize, NodeId, bool)>,
}

impl Profile {
    /// Read observations from logic-program facts.
    ///
    /// Every `exp(p).` declares a profile. Its values are given either as
    /// `obs_vlabel(p,v,S).` (a steady state) or `obs_vlabel(p,t,v,S).` (a time series).
    /// The `discipline` of the observations is registered in the `network`, which fails
    /// if it conflicts with a previously registered one.
    pub fn from_facts(
        network: &mut Network,
        input: &str,
        discipline: UpdateDiscipline,
    ) -> Result<Vec<Profile>, RevisionError> {
        network.add_update_discipline(discipline)?;
        let facts = read_facts(input)?;
        let mut names: Vec<String> = Vec::new();
        let mut profiles: HashMap<String, ProfileFacts> = HashMap::new();

        for fact in &facts {
            match fact.name.as_str() {
                "exp" => {
                    fact.expect_args(1)?;
                    if !profiles.contains_key(&fact.args[0]) {
                        names.push(fact.args[0].clone());
                        profiles.insert(fact.args[0].clone(), ProfileFacts::default());
                    }
                }
                "obs_vlabel" => {
                    let steady_state = match fact.args.len() {
                        3 => true,
                        4 => false,
                        _ => {
                            return Err(parse_error(
                                fact.line,
                                "`obs_vlabel` expects 3 or 4 arguments.".to_string(),
                            ))
                        }
                    };
                    if !steady_state && !discipline.is_dynamic() {
                        return Err(parse_error(
                            fact.line,
                            "Time series observation under a steady state discipline.".to_string(),
                        ));
                    }
                    let (time, node_index) = if steady_state {
                        (0, 1)
                    } else {
                        (fact.number(1)?, 2)
                    };
                    let node = network
                        .find_node(&fact.args[node_index])
                        .ok_or_else(|| RevisionError::UnknownNode(fact.args[node_index].clone()))?;
                    let value = fact.bit(node_index + 1)?;

                    let name = &fact.args[0];
                    if !profiles.contains_key(name) {
                        names.push(name.clone());
                    }
                    let profile = profiles.entry(name.clone()).or_default();
                    if *profile.steady_state.get_or_insert(steady_state) != steady_state {
                        return Err(parse_error(
                            fact.line,
                            format!("Profile `{}` mixes steady state and time series.", name),
                        ));
                    }
                    profile.values.push((time, node, value));
                }
                other => {
                    warn!(line = fact.line, fact = other, "Ignoring unknown fact.");
                }
            }
        }

        let mut result = Vec::with_capacity(names.len());
        for name in names {
            let Some(facts) = profiles.remove(&name) else {
                continue;
            };
            let steady_state = facts.steady_state.unwrap_or(!discipline.is_dynamic());
            if steady_state && discipline.is_dynamic() {
                network.add_update_discipline(UpdateDiscipline::SteadyState)?;
            }
            result.push(Profile::from_values(&name, steady_state, facts.values));
        }
        Ok(result)
    }
}
