//! Research dependency resolution for colony-management games.
//!
//! A research item's availability is derived, never assigned: it follows
//! from whether the item was completed, whether every external condition
//! gating it holds, and whether every prerequisite has been researched.
//!
//! # Overview
//!
//! Definitions are loaded into a [`graph::ResearchGraph`], which rejects
//! duplicate ids and prerequisite cycles. The graph is then handed to a
//! [`system::ResearchSystem`], which resolves every node's initial state.
//!
//! At runtime two kinds of event drive the system:
//!
//! - the player finishes a research item ([`system::ResearchSystem::research`]),
//!   which commits completion, applies the item's effects to external
//!   configuration objects, and cascades to dependents;
//! - an external subsystem reports that a condition may have flipped
//!   ([`system::ResearchSystem::on_condition_changed`]), which re-derives
//!   every gated node and cascades.
//!
//! # State derivation
//!
//! | completed | all conditions hold | all prerequisites researched | state |
//! |-----------|---------------------|------------------------------|-------|
//! | yes       | -                   | -                            | `Researched` |
//! | no        | no                  | -                            | `Locked` |
//! | no        | yes                 | yes                          | `Researchable` |
//! | no        | yes                 | no                           | `Unavailable` |
//!
//! Completion is sticky, so `Researched` is the only terminal state.
//!
//! # Key Types
//!
//! - [`definition::ResearchDefinition`] -- immutable catalog entry.
//! - [`condition::ConditionSource`] -- external boolean gate.
//! - [`effect::EffectTarget`] -- configuration object mutated by effects.
//! - [`resolver::StateResolver`] -- derivation and cascade.
//! - [`event::ResearchEvent`] -- state changes and completions for game code.

pub mod condition;
pub mod definition;
pub mod effect;
pub mod error;
pub mod event;
pub mod fixed;
pub mod graph;
pub mod id;
pub mod resolver;
pub mod state;
pub mod system;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::ResearchError;
