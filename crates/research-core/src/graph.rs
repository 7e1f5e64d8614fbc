//! The research graph: nodes, prerequisite edges, and condition bindings.
//!
//! Edges point from a node to its prerequisites. The reverse index
//! (`dependents`) and the condition bindings are maintained on insertion so
//! cascades never have to scan the whole graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::definition::ResearchDefinition;
use crate::error::ResearchError;
use crate::id::{ConditionId, ResearchId};
use crate::state::ResearchState;

// ---------------------------------------------------------------------------
// ResearchNode
// ---------------------------------------------------------------------------

/// Runtime wrapper around a definition: the definition plus derived state.
#[derive(Debug, Clone)]
pub struct ResearchNode {
    definition: ResearchDefinition,
    state: ResearchState,
    completed: bool,
    rank: u32,
}

impl ResearchNode {
    pub fn id(&self) -> ResearchId {
        self.definition.id
    }

    pub fn definition(&self) -> &ResearchDefinition {
        &self.definition
    }

    pub fn state(&self) -> ResearchState {
        self.state
    }

    /// Whether research on this node has ever been finished. Never reverts.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Topological depth: 0 for nodes without prerequisites.
    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub(crate) fn set_state(&mut self, state: ResearchState) {
        self.state = state;
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }
}

// ---------------------------------------------------------------------------
// ResearchGraph
// ---------------------------------------------------------------------------

/// Owns every research node, indexed by id.
///
/// Node states are placeholders until the graph is handed to a
/// [`ResearchSystem`](crate::system::ResearchSystem), which resolves them.
#[derive(Debug, Clone, Default)]
pub struct ResearchGraph {
    nodes: BTreeMap<ResearchId, ResearchNode>,

    /// Reverse prerequisite edges: node -> nodes that list it as a prerequisite.
    dependents: BTreeMap<ResearchId, BTreeSet<ResearchId>>,

    /// Condition -> nodes gated by it.
    bindings: BTreeMap<ConditionId, BTreeSet<ResearchId>>,
}

impl ResearchGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from definitions given in any order.
    ///
    /// Fails on the first duplicate id or unknown prerequisite. If the
    /// prerequisites contain a cycle, `CycleDetected` lists every node that
    /// sits on a cycle or depends on one.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ResearchDefinition>,
    ) -> Result<Self, ResearchError> {
        let mut pending: BTreeMap<ResearchId, ResearchDefinition> = BTreeMap::new();
        for def in definitions {
            if pending.contains_key(&def.id) {
                return Err(ResearchError::DuplicateId(def.id));
            }
            pending.insert(def.id, def);
        }

        // Validate references before ordering.
        let mut in_degree: BTreeMap<ResearchId, usize> = BTreeMap::new();
        let mut waiting_on: BTreeMap<ResearchId, Vec<ResearchId>> = BTreeMap::new();
        for def in pending.values() {
            for prereq in &def.prerequisites {
                if !pending.contains_key(prereq) {
                    return Err(ResearchError::UnknownPrerequisite {
                        research: def.id,
                        prerequisite: *prereq,
                    });
                }
                waiting_on.entry(*prereq).or_default().push(def.id);
            }
            in_degree.insert(def.id, def.prerequisites.len());
        }

        // Kahn's algorithm: insert nodes once all their prerequisites are in.
        let mut ready: VecDeque<ResearchId> = in_degree
            .iter()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut graph = Self::new();
        while let Some(id) = ready.pop_front() {
            let Some(def) = pending.remove(&id) else {
                continue;
            };
            graph.add(def)?;

            for dependent in waiting_on.get(&id).into_iter().flatten() {
                if let Some(deg) = in_degree.get_mut(dependent) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push_back(*dependent);
                    }
                }
            }
        }

        if !pending.is_empty() {
            return Err(ResearchError::CycleDetected {
                involved: pending.into_keys().collect(),
            });
        }

        Ok(graph)
    }

    /// Add a definition. Every prerequisite must already be in the graph,
    /// which keeps the graph acyclic.
    pub fn add(&mut self, definition: ResearchDefinition) -> Result<(), ResearchError> {
        let id = definition.id;

        if self.nodes.contains_key(&id) {
            return Err(ResearchError::DuplicateId(id));
        }
        if definition.prerequisites.contains(&id) {
            return Err(ResearchError::CycleDetected { involved: vec![id] });
        }

        let mut rank = 0;
        for prereq in &definition.prerequisites {
            let node = self
                .nodes
                .get(prereq)
                .ok_or(ResearchError::UnknownPrerequisite {
                    research: id,
                    prerequisite: *prereq,
                })?;
            rank = rank.max(node.rank + 1);
        }

        for prereq in &definition.prerequisites {
            self.dependents.entry(*prereq).or_default().insert(id);
        }
        for condition in &definition.conditions {
            self.bindings.entry(*condition).or_default().insert(id);
        }
        self.dependents.entry(id).or_default();

        let completed = definition.granted;
        self.nodes.insert(
            id,
            ResearchNode {
                definition,
                state: ResearchState::Unavailable,
                completed,
                rank,
            },
        );
        Ok(())
    }

    // -- Query API --

    pub fn get(&self, id: ResearchId) -> Result<&ResearchNode, ResearchError> {
        self.nodes.get(&id).ok_or(ResearchError::UnknownId(id))
    }

    pub(crate) fn get_mut(&mut self, id: ResearchId) -> Result<&mut ResearchNode, ResearchError> {
        self.nodes.get_mut(&id).ok_or(ResearchError::UnknownId(id))
    }

    pub fn contains(&self, id: ResearchId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn prerequisites_of(&self, id: ResearchId) -> Result<&BTreeSet<ResearchId>, ResearchError> {
        self.get(id).map(|node| &node.definition.prerequisites)
    }

    /// Nodes that list `id` as a prerequisite.
    pub fn dependents_of(&self, id: ResearchId) -> Result<&BTreeSet<ResearchId>, ResearchError> {
        self.dependents.get(&id).ok_or(ResearchError::UnknownId(id))
    }

    /// Nodes gated by `condition`. Empty for unbound conditions.
    pub fn bound_to(&self, condition: ConditionId) -> impl Iterator<Item = ResearchId> + '_ {
        self.bindings.get(&condition).into_iter().flatten().copied()
    }

    pub fn rank(&self, id: ResearchId) -> Result<u32, ResearchError> {
        self.get(id).map(|node| node.rank)
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &ResearchNode> {
        self.nodes.values()
    }

    /// All ids ordered so that every node comes after its prerequisites.
    pub fn topological_order(&self) -> Vec<ResearchId> {
        let mut ids: Vec<(u32, ResearchId)> =
            self.nodes.values().map(|n| (n.rank, n.id())).collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: u32) -> ResearchDefinition {
        ResearchDefinition::new(ResearchId(id), format!("Research {id}"))
    }

    /// 0 -> 1 -> 2, 0 -> 3 (edges point at dependents).
    fn setup_tree() -> ResearchGraph {
        ResearchGraph::from_definitions([
            def(0),
            def(1).with_prerequisite(ResearchId(0)),
            def(2).with_prerequisite(ResearchId(1)),
            def(3)
                .with_prerequisite(ResearchId(0))
                .with_condition(ConditionId(7)),
        ])
        .unwrap()
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut graph = ResearchGraph::new();
        graph.add(def(0)).unwrap();
        let result = graph.add(def(0));
        assert_eq!(result, Err(ResearchError::DuplicateId(ResearchId(0))));
    }

    #[test]
    fn add_rejects_unknown_prerequisite() {
        let mut graph = ResearchGraph::new();
        let result = graph.add(def(1).with_prerequisite(ResearchId(0)));
        assert!(matches!(
            result,
            Err(ResearchError::UnknownPrerequisite {
                research: ResearchId(1),
                prerequisite: ResearchId(0)
            })
        ));
        assert!(graph.is_empty());
    }

    #[test]
    fn add_rejects_self_prerequisite() {
        let mut graph = ResearchGraph::new();
        let result = graph.add(def(4).with_prerequisite(ResearchId(4)));
        assert!(matches!(result, Err(ResearchError::CycleDetected { .. })));
    }

    #[test]
    fn from_definitions_accepts_any_order() {
        let graph = ResearchGraph::from_definitions([
            def(2).with_prerequisite(ResearchId(1)),
            def(1).with_prerequisite(ResearchId(0)),
            def(0),
        ])
        .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.rank(ResearchId(2)).unwrap(), 2);
        assert_eq!(
            graph.topological_order(),
            vec![ResearchId(0), ResearchId(1), ResearchId(2)]
        );
    }

    #[test]
    fn from_definitions_detects_cycle() {
        let result = ResearchGraph::from_definitions([
            def(0),
            def(1)
                .with_prerequisite(ResearchId(0))
                .with_prerequisite(ResearchId(2)),
            def(2).with_prerequisite(ResearchId(1)),
            def(3).with_prerequisite(ResearchId(2)),
        ]);

        match result {
            Err(ResearchError::CycleDetected { involved }) => {
                assert_eq!(involved, vec![ResearchId(1), ResearchId(2), ResearchId(3)]);
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn from_definitions_detects_duplicate() {
        let result = ResearchGraph::from_definitions([def(0), def(1), def(0)]);
        assert!(matches!(result, Err(ResearchError::DuplicateId(ResearchId(0)))));
    }

    #[test]
    fn from_definitions_detects_dangling_prerequisite() {
        let result = ResearchGraph::from_definitions([def(1).with_prerequisite(ResearchId(9))]);
        assert!(matches!(
            result,
            Err(ResearchError::UnknownPrerequisite { .. })
        ));
    }

    #[test]
    fn dependents_index_is_reverse_of_prerequisites() {
        let graph = setup_tree();

        let deps: Vec<_> = graph
            .dependents_of(ResearchId(0))
            .unwrap()
            .iter()
            .copied()
            .collect();
        assert_eq!(deps, vec![ResearchId(1), ResearchId(3)]);
        assert!(graph.dependents_of(ResearchId(2)).unwrap().is_empty());
        assert!(
            graph
                .prerequisites_of(ResearchId(2))
                .unwrap()
                .contains(&ResearchId(1))
        );
    }

    #[test]
    fn condition_bindings_are_indexed() {
        let graph = setup_tree();
        let bound: Vec<_> = graph.bound_to(ConditionId(7)).collect();
        assert_eq!(bound, vec![ResearchId(3)]);
        assert_eq!(graph.bound_to(ConditionId(8)).count(), 0);
    }

    #[test]
    fn unknown_id_queries_fail() {
        let graph = setup_tree();
        assert!(matches!(
            graph.get(ResearchId(42)),
            Err(ResearchError::UnknownId(ResearchId(42)))
        ));
        assert!(graph.dependents_of(ResearchId(42)).is_err());
        assert!(graph.prerequisites_of(ResearchId(42)).is_err());
    }

    #[test]
    fn granted_definitions_start_completed() {
        let mut graph = ResearchGraph::new();
        graph.add(def(0).granted()).unwrap();
        assert!(graph.get(ResearchId(0)).unwrap().is_completed());
    }
}
