use serde::{Deserialize, Serialize};

/// The derived availability of a research item.
///
/// Ordered by distance from completion. The order is for display and
/// progress reporting only: a node may move between any two states except
/// out of `Researched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResearchState {
    /// An external condition currently blocks the item.
    Locked,

    /// Not every prerequisite has been researched yet.
    Unavailable,

    /// Can be researched now.
    Researchable,

    /// Completed. Terminal.
    Researched,
}

impl ResearchState {
    pub fn is_researched(self) -> bool {
        self == ResearchState::Researched
    }
}

/// Number of nodes in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchProgress {
    pub locked: usize,
    pub unavailable: usize,
    pub researchable: usize,
    pub researched: usize,
}

impl ResearchProgress {
    pub fn record(&mut self, state: ResearchState) {
        match state {
            ResearchState::Locked => self.locked += 1,
            ResearchState::Unavailable => self.unavailable += 1,
            ResearchState::Researchable => self.researchable += 1,
            ResearchState::Researched => self.researched += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.locked + self.unavailable + self.researchable + self.researched
    }
}

impl FromIterator<ResearchState> for ResearchProgress {
    fn from_iter<I: IntoIterator<Item = ResearchState>>(iter: I) -> Self {
        let mut progress = ResearchProgress::default();
        for state in iter {
            progress.record(state);
        }
        progress
    }
}
