use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::fixed::Ticks;
use crate::id::{ConditionId, ResearchId};

/// A research item in the catalog. Created once at catalog load; immutable
/// after it is added to a [`ResearchGraph`](crate::graph::ResearchGraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchDefinition {
    /// Unique identifier.
    pub id: ResearchId,

    /// Human-readable name.
    pub name: String,

    /// Flavor text shown by the presentation layer.
    pub description: String,

    /// Price paid through the game economy. Opaque to the engine.
    pub cost: u32,

    /// Time the research takes once started. Opaque to the engine.
    pub duration: Ticks,

    /// Research items that must be researched before this one is reachable.
    pub prerequisites: BTreeSet<ResearchId>,

    /// External conditions that must all currently hold for this item to be
    /// reachable, independent of its prerequisites.
    pub conditions: BTreeSet<ConditionId>,

    /// Effects applied, in order, the moment this item is researched.
    pub effects: Vec<Effect>,

    /// Display lines summarizing what the item does ("Coffee: Output 6 > 7").
    pub specifications: Vec<String>,

    /// Whether the item counts as researched from the start of the session.
    /// Effects of granted items are never applied.
    pub granted: bool,
}

impl ResearchDefinition {
    pub fn new(id: ResearchId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            cost: 0,
            duration: 0,
            prerequisites: BTreeSet::new(),
            conditions: BTreeSet::new(),
            effects: Vec::new(),
            specifications: Vec::new(),
            granted: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_duration(mut self, duration: Ticks) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_prerequisite(mut self, prerequisite: ResearchId) -> Self {
        self.prerequisites.insert(prerequisite);
        self
    }

    pub fn with_condition(mut self, condition: ConditionId) -> Self {
        self.conditions.insert(condition);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_specification(mut self, line: impl Into<String>) -> Self {
        self.specifications.push(line.into());
        self
    }

    /// Mark the item as researched from the start.
    pub fn granted(mut self) -> Self {
        self.granted = true;
        self
    }

    /// A root has no prerequisites and no conditions; unless granted it
    /// starts out researchable.
    pub fn is_root(&self) -> bool {
        self.prerequisites.is_empty() && self.conditions.is_empty()
    }
}
