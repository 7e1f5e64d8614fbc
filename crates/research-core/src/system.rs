//! The research façade: owns the graph and condition bindings, drives the
//! resolver and the effect applier.

use crate::condition::{ConditionBoard, ConditionSource};
use crate::definition::ResearchDefinition;
use crate::effect::{EffectApplier, EffectTargets};
use crate::error::ResearchError;
use crate::event::ResearchEvent;
use crate::graph::ResearchGraph;
use crate::id::{ConditionId, ResearchId};
use crate::resolver::{StateResolver, Transition};
use crate::state::{ResearchProgress, ResearchState};

/// Single entry point for research gameplay.
///
/// All operations run to completion before returning. Callers in a
/// multi-threaded host must serialize access (the system is `!Send`).
#[derive(Debug)]
pub struct ResearchSystem {
    graph: ResearchGraph,
    conditions: ConditionBoard,

    /// Events emitted since last drain.
    events: Vec<ResearchEvent>,
}

impl ResearchSystem {
    /// Take ownership of a graph and resolve every node's initial state.
    /// No condition sources are bound yet, so conditioned nodes start locked.
    pub fn new(graph: ResearchGraph) -> Self {
        Self::with_conditions(graph, ConditionBoard::new())
    }

    /// Like [`new`](Self::new), with condition sources already bound.
    pub fn with_conditions(mut graph: ResearchGraph, conditions: ConditionBoard) -> Self {
        let initial = StateResolver::resolve_all(&mut graph, &conditions);
        tracing::debug!(
            nodes = graph.len(),
            resolved = initial.len(),
            "Research graph initialized"
        );

        Self {
            graph,
            conditions,
            events: Vec::new(),
        }
    }

    // -- Condition API --

    /// Bind a condition source and re-resolve the nodes it gates.
    pub fn register_condition(&mut self, id: ConditionId, source: impl ConditionSource + 'static) {
        self.conditions.register(id, source);
        self.on_condition_changed(id);
    }

    /// Drop the source bound to `id`; the condition reads false from now on
    /// and the nodes it gates are re-resolved. Returns whether a source was
    /// bound.
    pub fn unregister_condition(&mut self, id: ConditionId) -> bool {
        let removed = self.conditions.unregister(id);
        if removed {
            self.on_condition_changed(id);
        }
        removed
    }

    /// Called by external subsystems after a condition value may have
    /// changed. Conditions that gate nothing are ignored.
    pub fn on_condition_changed(&mut self, condition: ConditionId) {
        let seeds: Vec<ResearchId> = self.graph.bound_to(condition).collect();
        if seeds.is_empty() {
            tracing::trace!(condition = ?condition, "Condition gates no research, ignoring");
            return;
        }

        let transitions = StateResolver::cascade(&mut self.graph, &self.conditions, seeds);
        self.record(transitions);
    }

    // -- Research actions --

    /// Complete research on `id` and apply its effects.
    ///
    /// Fails with `NotResearchable` (and changes nothing) unless the node is
    /// currently researchable. Once completion is committed it is never
    /// undone: if an effect is rejected the node stays researched,
    /// dependents are still updated, and the failure is returned as
    /// `EffectApplicationFailed`.
    pub fn research<T: EffectTargets + ?Sized>(
        &mut self,
        id: ResearchId,
        targets: &mut T,
    ) -> Result<(), ResearchError> {
        let state = self.graph.get(id)?.state();
        if state != ResearchState::Researchable {
            return Err(ResearchError::NotResearchable { id, state });
        }

        self.graph.get_mut(id)?.mark_completed();
        tracing::info!(research = ?id, "Research completed");

        let effects = &self.graph.get(id)?.definition().effects;
        let applied = EffectApplier::apply(effects, targets);

        let transitions = StateResolver::cascade(&mut self.graph, &self.conditions, [id]);
        self.record(transitions);
        self.events.push(ResearchEvent::Completed { id });

        applied.map_err(|failure| {
            tracing::warn!(
                research = ?id,
                effect_index = failure.effect_index,
                error = %failure.source,
                "Research effect failed"
            );
            self.events.push(ResearchEvent::EffectFailed {
                id,
                effect_index: failure.effect_index,
                error: failure.source.clone(),
            });
            ResearchError::EffectApplicationFailed {
                id,
                effect_index: failure.effect_index,
                source: failure.source,
            }
        })
    }

    // -- Query API --

    pub fn state_of(&self, id: ResearchId) -> Result<ResearchState, ResearchError> {
        self.graph.get(id).map(|node| node.state())
    }

    pub fn is_researched(&self, id: ResearchId) -> Result<bool, ResearchError> {
        self.graph.get(id).map(|node| node.is_completed())
    }

    pub fn definition(&self, id: ResearchId) -> Result<&ResearchDefinition, ResearchError> {
        self.graph.get(id).map(|node| node.definition())
    }

    /// Every node with its current state, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (&ResearchDefinition, ResearchState)> {
        self.graph
            .nodes()
            .map(|node| (node.definition(), node.state()))
    }

    /// Ids of every node that can be researched right now.
    pub fn researchable(&self) -> Vec<ResearchId> {
        self.graph
            .nodes()
            .filter(|node| node.state() == ResearchState::Researchable)
            .map(|node| node.id())
            .collect()
    }

    pub fn progress(&self) -> ResearchProgress {
        self.graph.nodes().map(|node| node.state()).collect()
    }

    pub fn graph(&self) -> &ResearchGraph {
        &self.graph
    }

    pub fn conditions(&self) -> &ConditionBoard {
        &self.conditions
    }

    // -- Event API --

    /// Drain all pending events. Returns events and clears the internal list.
    pub fn drain_events(&mut self) -> Vec<ResearchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get a read-only view of pending events.
    pub fn pending_events(&self) -> &[ResearchEvent] {
        &self.events
    }

    fn record(&mut self, transitions: Vec<Transition>) {
        self.events
            .extend(transitions.into_iter().map(ResearchEvent::from));
    }
}

// ===========================================================================
// Tests
// ===========================================================================
