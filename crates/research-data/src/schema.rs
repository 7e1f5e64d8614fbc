//! Serde data file structs for research catalogs.
//!
//! These structs define the on-disk format for research items and effect
//! targets. They are deserialized from RON, JSON, or TOML data files and
//! then resolved into engine types by [`crate::catalog`]. Cross-references
//! (prerequisites, conditions, effect targets) are by name.

use serde::Deserialize;

// ===========================================================================
// Research
// ===========================================================================

/// A research item in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchData {
    /// Unique key other entries refer to.
    pub name: String,
    /// Display name. Defaults to `name`.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub effects: Vec<EffectData>,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub granted: bool,
}

/// An effect applied when the research completes.
#[derive(Debug, Clone, Deserialize)]
pub struct EffectData {
    pub target: String,
    pub field: String,
    pub op: FieldOpData,
}

/// How the effect changes the field.
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum FieldOpData {
    Add(f64),
    Set(f64),
}

// ===========================================================================
// Effect targets
// ===========================================================================

/// A configuration object that effects can mutate.
///
/// An `external` target only reserves a name and id; game code registers
/// its own implementation under that id. Otherwise a config table is built
/// from `fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetData {
    pub name: String,
    #[serde(default)]
    pub external: bool,
    #[serde(default)]
    pub fields: Vec<FieldData>,
}

/// A numeric field on a config table target.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldData {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

// ===========================================================================
// TOML wrappers (TOML does not support top-level arrays)
// ===========================================================================

/// Wrapper for a list of research items in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlResearch {
    pub research: Vec<ResearchData>,
}

/// Wrapper for a list of effect targets in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlTargets {
    pub targets: Vec<TargetData>,
}

// ===========================================================================
// Tests
// ===========================================================================
