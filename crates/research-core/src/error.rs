use crate::effect::TargetError;
use crate::id::ResearchId;
use crate::state::ResearchState;

/// Errors that can occur while building the research graph or driving it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResearchError {
    #[error("duplicate research id: {0:?}")]
    DuplicateId(ResearchId),

    #[error("prerequisite {prerequisite:?} for research {research:?} does not exist")]
    UnknownPrerequisite {
        research: ResearchId,
        prerequisite: ResearchId,
    },

    #[error("prerequisite cycle through {involved:?}")]
    CycleDetected { involved: Vec<ResearchId> },

    #[error("research not found: {0:?}")]
    UnknownId(ResearchId),

    #[error("research {id:?} is {state:?}, not researchable")]
    NotResearchable { id: ResearchId, state: ResearchState },

    /// The research was completed but one of its effects was rejected.
    /// Effects before `effect_index` stay applied.
    #[error("research {id:?} completed but effect #{effect_index} failed: {source}")]
    EffectApplicationFailed {
        id: ResearchId,
        effect_index: usize,
        #[source]
        source: TargetError,
    },
}

impl ResearchError {
    /// Catalog errors are fatal to the load that produced them.
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            ResearchError::DuplicateId(_)
                | ResearchError::UnknownPrerequisite { .. }
                | ResearchError::CycleDetected { .. }
        )
    }
}
