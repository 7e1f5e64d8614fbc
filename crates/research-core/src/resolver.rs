//! State derivation and cascading recomputation.
//!
//! A node's state is never assigned directly. [`derive_state`] computes it
//! from three facts: whether the node was completed, whether every bound
//! condition holds, and whether every prerequisite is researched.
//! [`StateResolver::cascade`] re-derives a set of seed nodes and then every
//! dependent whose input changed.

use std::collections::BTreeSet;

use crate::condition::ConditionBoard;
use crate::error::ResearchError;
use crate::graph::ResearchGraph;
use crate::id::ResearchId;
use crate::state::ResearchState;

/// The derivation rule. Completion wins, then conditions, then prerequisites.
pub fn derive_state(
    completed: bool,
    conditions_met: bool,
    prerequisites_met: bool,
) -> ResearchState {
    if completed {
        ResearchState::Researched
    } else if !conditions_met {
        ResearchState::Locked
    } else if prerequisites_met {
        ResearchState::Researchable
    } else {
        ResearchState::Unavailable
    }
}

/// A state change produced by a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub id: ResearchId,
    pub from: ResearchState,
    pub to: ResearchState,
}

/// Recomputes node states over a [`ResearchGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StateResolver;

impl StateResolver {
    /// The state `id` should be in right now. Does not mutate the graph.
    pub fn resolve(
        graph: &ResearchGraph,
        conditions: &ConditionBoard,
        id: ResearchId,
    ) -> Result<ResearchState, ResearchError> {
        let node = graph.get(id)?;
        let def = node.definition();

        let conditions_met = conditions.all_satisfied(&def.conditions);
        let prerequisites_met = def.prerequisites.iter().all(|prereq| {
            graph
                .get(*prereq)
                .is_ok_and(|p| p.state() == ResearchState::Researched)
        });

        Ok(derive_state(
            node.is_completed(),
            conditions_met,
            prerequisites_met,
        ))
    }

    /// Re-derive every seed, then every dependent of a node whose state
    /// changed, transitively.
    ///
    /// The worklist is ordered by topological rank, so each node is resolved
    /// at most once per call and only after all of its affected
    /// prerequisites. Unknown seeds are skipped. Returns the transitions in
    /// the order they were applied.
    pub fn cascade(
        graph: &mut ResearchGraph,
        conditions: &ConditionBoard,
        seeds: impl IntoIterator<Item = ResearchId>,
    ) -> Vec<Transition> {
        let mut worklist: BTreeSet<(u32, ResearchId)> = BTreeSet::new();
        let mut visited: BTreeSet<ResearchId> = BTreeSet::new();
        let mut transitions = Vec::new();

        for id in seeds {
            if let Ok(rank) = graph.rank(id) {
                worklist.insert((rank, id));
            }
        }

        while let Some((_, id)) = worklist.pop_first() {
            if !visited.insert(id) {
                continue;
            }

            let Ok(next) = Self::resolve(graph, conditions, id) else {
                continue;
            };
            let Ok(node) = graph.get_mut(id) else {
                continue;
            };
            let prev = node.state();
            if prev == next {
                continue;
            }
            node.set_state(next);

            tracing::debug!(research = ?id, from = ?prev, to = ?next, "Research state changed");
            transitions.push(Transition {
                id,
                from: prev,
                to: next,
            });

            if let Ok(dependents) = graph.dependents_of(id) {
                for dependent in dependents {
                    if visited.contains(dependent) {
                        continue;
                    }
                    if let Ok(rank) = graph.rank(*dependent) {
                        worklist.insert((rank, *dependent));
                    }
                }
            }
        }

        tracing::trace!(
            resolved = visited.len(),
            changed = transitions.len(),
            "Cascade finished"
        );
        transitions
    }

    /// Resolve every node in the graph, in topological order.
    pub fn resolve_all(graph: &mut ResearchGraph, conditions: &ConditionBoard) -> Vec<Transition> {
        let order = graph.topological_order();
        Self::cascade(graph, conditions, order)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
