//! Research effects and the configuration objects they mutate.
//!
//! A completed research item carries an ordered list of [`Effect`]s. Each
//! effect names a target configuration object by [`TargetId`], a field on
//! that object, and a [`FieldOp`]. The engine never sees the concrete shape
//! of a target: it only talks to the narrow [`EffectTarget`] capability.
//!
//! [`ConfigTable`] is a ready-made target holding named fixed-point fields
//! with optional bounds. Games with richer configuration structs implement
//! [`EffectTarget`] themselves.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fixed::Fixed64;
use crate::id::TargetId;

// ---------------------------------------------------------------------------
// Effect descriptors
// ---------------------------------------------------------------------------

/// A mutation applied to one numeric field of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldOp {
    /// Increment the field by a (possibly negative) delta.
    Add(Fixed64),

    /// Replace the field value.
    Set(Fixed64),
}

/// One entry in a research item's effect list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub target: TargetId,
    pub field: String,
    pub op: FieldOp,
}

impl Effect {
    pub fn add(target: TargetId, field: impl Into<String>, delta: Fixed64) -> Self {
        Self {
            target,
            field: field.into(),
            op: FieldOp::Add(delta),
        }
    }

    pub fn set(target: TargetId, field: impl Into<String>, value: Fixed64) -> Self {
        Self {
            target,
            field: field.into(),
            op: FieldOp::Set(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a target refused (or could not receive) an effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("no effect target registered under {0:?}")]
    UnknownTarget(TargetId),

    #[error("target has no field named '{field}'")]
    UnknownField { field: String },

    #[error("value {value} for field '{field}' is outside [{min:?}, {max:?}]")]
    OutOfRange {
        field: String,
        value: Fixed64,
        min: Option<Fixed64>,
        max: Option<Fixed64>,
    },

    #[error("arithmetic overflow on field '{field}'")]
    Overflow { field: String },

    #[error("effect rejected: {0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// Target capabilities
// ---------------------------------------------------------------------------

/// A configuration object that accepts named-field effect applications.
///
/// Validation of the resulting value is the target's responsibility. A
/// target that returns an error must leave the field unchanged.
pub trait EffectTarget {
    /// Apply `op` to `field`.
    fn apply(&mut self, field: &str, op: FieldOp) -> Result<(), TargetError>;

    /// Read a field's current value, if the target exposes it.
    fn field(&self, name: &str) -> Option<Fixed64>;
}

/// Lookup of effect targets by id.
pub trait EffectTargets {
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn EffectTarget>;
}

/// Owns a set of boxed effect targets keyed by [`TargetId`].
#[derive(Default)]
pub struct TargetRegistry {
    targets: BTreeMap<TargetId, Box<dyn EffectTarget>>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target, returning the one it replaced (if any).
    pub fn register(
        &mut self,
        id: TargetId,
        target: impl EffectTarget + 'static,
    ) -> Option<Box<dyn EffectTarget>> {
        self.targets.insert(id, Box::new(target))
    }

    pub fn get(&self, id: TargetId) -> Option<&dyn EffectTarget> {
        self.targets.get(&id).map(|t| t.as_ref())
    }

    /// Convenience read of a single field on a registered target.
    pub fn field(&self, id: TargetId, name: &str) -> Option<Fixed64> {
        self.get(id).and_then(|t| t.field(name))
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl EffectTargets for TargetRegistry {
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn EffectTarget> {
        match self.targets.get_mut(&id) {
            Some(target) => Some(target.as_mut() as &mut dyn EffectTarget),
            None => None,
        }
    }
}

impl fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("targets", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ConfigTable
// ---------------------------------------------------------------------------

/// A numeric field with optional inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigField {
    pub value: Fixed64,
    #[serde(default)]
    pub min: Option<Fixed64>,
    #[serde(default)]
    pub max: Option<Fixed64>,
}

impl ConfigField {
    /// Whether `value` lies within the field's bounds.
    pub fn admits(&self, value: Fixed64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// The bounds are ordered and the current value lies within them.
    pub fn is_consistent(&self) -> bool {
        let ordered = match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        ordered && self.admits(self.value)
    }
}

/// A flat table of named fixed-point fields. The simplest [`EffectTarget`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigTable {
    fields: BTreeMap<String, ConfigField>,
}

impl ConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unbounded field.
    pub fn with_field(mut self, name: impl Into<String>, value: Fixed64) -> Self {
        self.insert(
            name,
            ConfigField {
                value,
                min: None,
                max: None,
            },
        );
        self
    }

    /// Add a field whose value must stay within `[min, max]`.
    pub fn with_bounded_field(
        mut self,
        name: impl Into<String>,
        value: Fixed64,
        min: Fixed64,
        max: Fixed64,
    ) -> Self {
        self.insert(
            name,
            ConfigField {
                value,
                min: Some(min),
                max: Some(max),
            },
        );
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field: ConfigField) {
        self.fields.insert(name.into(), field);
    }

    pub fn get(&self, name: &str) -> Option<Fixed64> {
        self.fields.get(name).map(|f| f.value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &ConfigField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }
}

impl EffectTarget for ConfigTable {
    fn apply(&mut self, field: &str, op: FieldOp) -> Result<(), TargetError> {
        let entry = self
            .fields
            .get_mut(field)
            .ok_or_else(|| TargetError::UnknownField {
                field: field.to_string(),
            })?;

        let next = match op {
            FieldOp::Add(delta) => {
                entry
                    .value
                    .checked_add(delta)
                    .ok_or_else(|| TargetError::Overflow {
                        field: field.to_string(),
                    })?
            }
            FieldOp::Set(value) => value,
        };

        if !entry.admits(next) {
            return Err(TargetError::OutOfRange {
                field: field.to_string(),
                value: next,
                min: entry.min,
                max: entry.max,
            });
        }

        entry.value = next;
        Ok(())
    }

    fn field(&self, name: &str) -> Option<Fixed64> {
        self.get(name)
    }
}

// ---------------------------------------------------------------------------
// EffectApplier
// ---------------------------------------------------------------------------

/// Where an effect list stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectFailure {
    /// Index into the effect list of the effect that failed. Effects before
    /// it have already been applied.
    pub effect_index: usize,
    pub source: TargetError,
}

/// Applies effect lists to targets, in order, stopping at the first failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectApplier;

impl EffectApplier {
    /// Apply every effect in `effects` to the targets it names.
    ///
    /// There is no rollback: if effect `n` fails, effects `0..n` remain
    /// applied and effects after `n` are skipped.
    pub fn apply<T: EffectTargets + ?Sized>(
        effects: &[Effect],
        targets: &mut T,
    ) -> Result<(), EffectFailure> {
        for (effect_index, effect) in effects.iter().enumerate() {
            let Some(target) = targets.target_mut(effect.target) else {
                return Err(EffectFailure {
                    effect_index,
                    source: TargetError::UnknownTarget(effect.target),
                });
            };

            target
                .apply(&effect.field, effect.op)
                .map_err(|source| EffectFailure {
                    effect_index,
                    source,
                })?;

            tracing::trace!(
                target_id = ?effect.target,
                field = %effect.field,
                op = ?effect.op,
                "Applied research effect"
            );
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
