//! Resolution pipeline: reads catalog files, resolves name references, and
//! builds the research graph and effect targets.
//!
//! Ids are assigned in file order: research items by position in the
//! research file, targets by position in the targets file, conditions by
//! first mention.

use research_core::definition::ResearchDefinition;
use research_core::effect::{ConfigField, ConfigTable, Effect, FieldOp, TargetRegistry};
use research_core::fixed::{Fixed64, checked_f64_to_fixed64};
use research_core::graph::ResearchGraph;
use research_core::id::{ConditionId, ResearchId, TargetId};
use std::collections::HashMap;
use std::path::Path;

use crate::loader::{CatalogFile, DataLoadError, NameTable};
use crate::schema::{EffectData, FieldOpData, ResearchData, TargetData};

/// Everything loaded from a catalog directory.
#[derive(Debug)]
pub struct GameData {
    pub graph: ResearchGraph,
    /// Config-table targets built from the targets file. External targets
    /// are named in `target_names` but not registered here.
    pub targets: TargetRegistry,
    pub research_names: HashMap<String, ResearchId>,
    pub condition_names: HashMap<String, ConditionId>,
    pub target_names: HashMap<String, TargetId>,
}

/// Load a catalog directory.
///
/// Requires `research.{ron,toml,json}`; `targets.{ron,toml,json}` is
/// optional.
pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    let (targets, target_names) = match CatalogFile::find(dir, "targets")? {
        Some(file) => {
            let data: Vec<TargetData> = file.read_list("targets")?;
            build_targets(data, &file.path)?
        }
        None => (TargetRegistry::new(), NameTable::new("target", dir)),
    };

    let research_file = CatalogFile::require(dir, "research")?;
    let data: Vec<ResearchData> = research_file.read_list("research")?;
    let resolved = resolve_research(data, &target_names, &research_file.path)?;
    let graph = ResearchGraph::from_definitions(resolved.definitions)?;

    tracing::info!(
        research = graph.len(),
        conditions = resolved.condition_names.len(),
        targets = target_names.len(),
        dir = %dir.display(),
        "Loaded research catalog"
    );

    Ok(GameData {
        graph,
        targets,
        research_names: resolved.research_names,
        condition_names: resolved.condition_names,
        target_names: target_names.into_map(),
    })
}

/// Research definitions with their name tables.
#[derive(Debug)]
pub struct ResolvedResearch {
    pub definitions: Vec<ResearchDefinition>,
    pub research_names: HashMap<String, ResearchId>,
    pub condition_names: HashMap<String, ConditionId>,
}

/// Resolve research entries into definitions. Prerequisites may refer to
/// entries later in the file.
pub fn resolve_research(
    data: Vec<ResearchData>,
    target_names: &NameTable<TargetId>,
    file: &Path,
) -> Result<ResolvedResearch, DataLoadError> {
    let mut research_names = NameTable::new("research", file);
    for (index, entry) in data.iter().enumerate() {
        research_names.define(&entry.name, ResearchId(index as u32))?;
    }

    let mut condition_names = NameTable::new("condition", file);
    let mut definitions = Vec::with_capacity(data.len());

    for (index, entry) in data.into_iter().enumerate() {
        let mut def = ResearchDefinition::new(
            ResearchId(index as u32),
            entry.title.unwrap_or_else(|| entry.name.clone()),
        )
        .with_description(entry.description)
        .with_cost(entry.cost)
        .with_duration(entry.duration);

        for prereq in &entry.prerequisites {
            def = def.with_prerequisite(research_names.resolve(prereq, file)?);
        }

        for condition in &entry.conditions {
            def = def.with_condition(condition_names.intern(condition, ConditionId));
        }

        for effect in &entry.effects {
            def = def.with_effect(resolve_effect(effect, target_names, file)?);
        }

        def.specifications = entry.specifications;
        def.granted = entry.granted;
        definitions.push(def);
    }

    Ok(ResolvedResearch {
        definitions,
        research_names: research_names.into_map(),
        condition_names: condition_names.into_map(),
    })
}

fn resolve_effect(
    data: &EffectData,
    target_names: &NameTable<TargetId>,
    file: &Path,
) -> Result<Effect, DataLoadError> {
    let target = target_names.resolve(&data.target, file)?;
    let op = match data.op {
        FieldOpData::Add(delta) => FieldOp::Add(number(delta, &data.field, file)?),
        FieldOpData::Set(value) => FieldOp::Set(number(value, &data.field, file)?),
    };
    Ok(Effect {
        target,
        field: data.field.clone(),
        op,
    })
}

/// Convert a numeric value read from `file`. `name` identifies the field it
/// belongs to in the error.
fn number(value: f64, name: &str, file: &Path) -> Result<Fixed64, DataLoadError> {
    checked_f64_to_fixed64(value).ok_or_else(|| DataLoadError::InvalidNumber {
        file: file.to_path_buf(),
        name: name.to_string(),
        value,
    })
}

/// Build config-table targets and the target name table.
///
/// Every config field must start within its own bounds.
pub fn build_targets(
    data: Vec<TargetData>,
    file: &Path,
) -> Result<(TargetRegistry, NameTable<TargetId>), DataLoadError> {
    let mut registry = TargetRegistry::new();
    let mut names = NameTable::new("target", file);

    for (index, entry) in data.into_iter().enumerate() {
        let id = TargetId(index as u32);
        names.define(&entry.name, id)?;

        if entry.external {
            continue;
        }

        let mut table = ConfigTable::new();
        for field in entry.fields {
            let config = ConfigField {
                value: number(field.value, &field.name, file)?,
                min: field.min.map(|v| number(v, &field.name, file)).transpose()?,
                max: field.max.map(|v| number(v, &field.name, file)).transpose()?,
            };
            if !config.is_consistent() {
                return Err(DataLoadError::InvalidBounds {
                    file: file.to_path_buf(),
                    target: entry.name,
                    field: field.name,
                    value: field.value,
                    min: field.min,
                    max: field.max,
                });
            }
            table.insert(field.name, config);
        }
        registry.register(id, table);
    }

    Ok((registry, names))
}

// ===========================================================================
// Tests
// ===========================================================================
