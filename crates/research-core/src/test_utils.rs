//! Shared test helpers for integration and property tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::definition::ResearchDefinition;
use crate::fixed::Fixed64;
use crate::graph::ResearchGraph;
use crate::id::ResearchId;
use crate::resolver::derive_state;
use crate::state::ResearchState;
use crate::system::ResearchSystem;

// ===========================================================================
// Constructors
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

pub fn research(id: u32) -> ResearchDefinition {
    ResearchDefinition::new(ResearchId(id), format!("Research {id}"))
}

/// `0 <- 1 <- 2 <- ... <- n-1`: each node needs the one before it.
pub fn linear_chain(n: u32) -> ResearchGraph {
    let defs = (0..n).map(|i| {
        let def = research(i);
        if i == 0 {
            def
        } else {
            def.with_prerequisite(ResearchId(i - 1))
        }
    });
    // A chain has no duplicates and no cycles.
    match ResearchGraph::from_definitions(defs) {
        Ok(graph) => graph,
        Err(e) => panic!("linear chain rejected: {e}"),
    }
}

// ===========================================================================
// Invariant checks
// ===========================================================================

/// Re-derive the state of `id` from scratch, ignoring the stored state of
/// the node itself. Uses stored states of its prerequisites.
pub fn expected_state(system: &ResearchSystem, id: ResearchId) -> ResearchState {
    let graph = system.graph();
    let Ok(node) = graph.get(id) else {
        panic!("unknown research {id:?}");
    };
    let def = node.definition();
    let conditions_met = system.conditions().all_satisfied(&def.conditions);
    let prerequisites_met = def
        .prerequisites
        .iter()
        .all(|p| graph.get(*p).is_ok_and(|n| n.is_completed()));
    derive_state(node.is_completed(), conditions_met, prerequisites_met)
}

/// Every node's stored state equals its derived state.
pub fn assert_fully_resolved(system: &ResearchSystem) {
    for node in system.graph().nodes() {
        assert_eq!(
            node.state(),
            expected_state(system, node.id()),
            "stale state on {:?}",
            node.id()
        );
    }
}
