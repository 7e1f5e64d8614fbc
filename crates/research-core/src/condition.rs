//! External boolean gates on research availability.
//!
//! Other subsystems (military aid, diplomacy, ...) own the logic behind a
//! condition. The research engine only asks for the current value through
//! [`ConditionSource`] and is told about changes through
//! [`ResearchSystem::on_condition_changed`](crate::system::ResearchSystem::on_condition_changed).

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::id::ConditionId;

/// Anything that can be asked for a boolean gate value on demand.
pub trait ConditionSource {
    fn current_value(&self) -> bool;
}

/// A shared boolean flag. One handle stays with the owning subsystem, a
/// clone is registered with the research system.
///
/// Single-threaded by construction (`Rc`), matching the engine.
#[derive(Debug, Clone, Default)]
pub struct ConditionFlag(Rc<Cell<bool>>);

impl ConditionFlag {
    pub fn new(initial: bool) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }

    /// Store `value`. Returns `true` if the stored value actually changed.
    pub fn set(&self, value: bool) -> bool {
        self.0.replace(value) != value
    }
}

impl ConditionSource for ConditionFlag {
    fn current_value(&self) -> bool {
        self.get()
    }
}

/// Registered condition sources, keyed by id.
///
/// An id without a registered source reads as unsatisfied.
#[derive(Default)]
pub struct ConditionBoard {
    sources: BTreeMap<ConditionId, Box<dyn ConditionSource>>,
}

impl ConditionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a source to `id`, replacing any previous binding.
    pub fn register(&mut self, id: ConditionId, source: impl ConditionSource + 'static) {
        self.sources.insert(id, Box::new(source));
    }

    /// Remove the binding for `id`. Returns whether one existed.
    pub fn unregister(&mut self, id: ConditionId) -> bool {
        self.sources.remove(&id).is_some()
    }

    pub fn is_registered(&self, id: ConditionId) -> bool {
        self.sources.contains_key(&id)
    }

    pub fn is_satisfied(&self, id: ConditionId) -> bool {
        self.sources
            .get(&id)
            .is_some_and(|source| source.current_value())
    }

    pub fn all_satisfied<'a>(&self, ids: impl IntoIterator<Item = &'a ConditionId>) -> bool {
        ids.into_iter().all(|id| self.is_satisfied(*id))
    }
}

impl fmt::Debug for ConditionBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: BTreeMap<_, _> = self
            .sources
            .iter()
            .map(|(id, source)| (*id, source.current_value()))
            .collect();
        f.debug_struct("ConditionBoard")
            .field("sources", &values)
            .finish()
    }
}
