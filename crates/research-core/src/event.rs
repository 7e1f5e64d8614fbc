use crate::effect::TargetError;
use crate::id::ResearchId;
use crate::resolver::Transition;
use crate::state::ResearchState;

/// Events emitted by the research system, drained by game code (UI refresh,
/// notifications, audio).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResearchEvent {
    /// A node's derived state changed.
    StateChanged {
        id: ResearchId,
        from: ResearchState,
        to: ResearchState,
    },

    /// A node was researched. Emitted once per node per session.
    Completed { id: ResearchId },

    /// A completed node's effect was rejected by its target. Effects before
    /// `effect_index` were applied; the rest were skipped.
    EffectFailed {
        id: ResearchId,
        effect_index: usize,
        error: TargetError,
    },
}

impl From<Transition> for ResearchEvent {
    fn from(t: Transition) -> Self {
        ResearchEvent::StateChanged {
            id: t.id,
            from: t.from,
            to: t.to,
        }
    }
}
