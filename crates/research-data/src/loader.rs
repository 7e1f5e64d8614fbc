//! Locating, reading and cross-referencing catalog files.
//!
//! A catalog directory holds one file per base name (`research`, `targets`)
//! in exactly one of RON, TOML or JSON. [`CatalogFile`] finds and parses
//! such a file; [`NameTable`] turns the names entries use to refer to each
//! other into engine ids, reporting the offending file on failure.

use research_core::ResearchError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a catalog directory.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("no '{base_name}' catalog file (.ron, .toml or .json) in {dir}")]
    MissingRequired { base_name: String, dir: PathBuf },

    #[error("{file} is not a .ron, .toml or .json file")]
    UnsupportedFormat { file: PathBuf },

    /// Two files share a base name, so it is unclear which one to load.
    #[error("both {a} and {b} exist; keep only one")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("could not parse {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("{file} refers to unknown {kind} '{name}'")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        kind: &'static str,
    },

    #[error("{file} defines {kind} '{name}' more than once")]
    DuplicateName {
        file: PathBuf,
        name: String,
        kind: &'static str,
    },

    /// NaN, or a magnitude that does not fit the engine's fixed-point range.
    #[error("{file}: '{name}' has unrepresentable value {value}")]
    InvalidNumber {
        file: PathBuf,
        name: String,
        value: f64,
    },

    /// A field's initial value lies outside its bounds, or `min > max`.
    #[error(
        "{file}: field '{field}' of target '{target}' has value {value} outside [{min:?}, {max:?}]"
    )]
    InvalidBounds {
        file: PathBuf,
        target: String,
        field: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    /// Names resolved, but the definitions do not form a valid graph.
    #[error("invalid research catalog: {0}")]
    Catalog(#[from] ResearchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Formats
// ===========================================================================

/// On-disk encodings a catalog file may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Probe order when looking for a base name.
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DataLoadError> {
        let ext = path.extension().and_then(|e| e.to_str());
        Self::ALL
            .into_iter()
            .find(|format| Some(format.extension()) == ext)
            .ok_or_else(|| DataLoadError::UnsupportedFormat {
                file: path.to_path_buf(),
            })
    }
}

// ===========================================================================
// CatalogFile
// ===========================================================================

/// A catalog file whose format is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub path: PathBuf,
    pub format: Format,
}

impl CatalogFile {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DataLoadError> {
        let path = path.into();
        let format = Format::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Look for `{base_name}.{ron,toml,json}` in `dir`.
    ///
    /// `Ok(None)` when absent; `ConflictingFormats` when more than one
    /// encoding is present.
    pub fn find(dir: &Path, base_name: &str) -> Result<Option<Self>, DataLoadError> {
        let mut found: Option<Self> = None;
        for format in Format::ALL {
            let path = dir.join(format!("{base_name}.{}", format.extension()));
            if !path.is_file() {
                continue;
            }
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.path,
                    b: path,
                });
            }
            found = Some(Self { path, format });
        }
        Ok(found)
    }

    /// Like [`find`](Self::find), but absence is an error.
    pub fn require(dir: &Path, base_name: &str) -> Result<Self, DataLoadError> {
        Self::find(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
            base_name: base_name.to_string(),
            dir: dir.to_path_buf(),
        })
    }

    /// Parse the whole file as a `T`.
    pub fn read<T: DeserializeOwned>(&self) -> Result<T, DataLoadError> {
        let text = std::fs::read_to_string(&self.path)?;
        match self.format {
            Format::Ron => ron::from_str(&text).map_err(|e| self.parse_error(e)),
            Format::Json => serde_json::from_str(&text).map_err(|e| self.parse_error(e)),
            Format::Toml => toml::from_str(&text).map_err(|e| self.parse_error(e)),
        }
    }

    /// Parse a list of entries.
    ///
    /// RON and JSON files hold the list at top level. TOML has no top-level
    /// arrays, so the list lives under `toml_key` (`[[research]]` tables).
    pub fn read_list<T: DeserializeOwned>(&self, toml_key: &str) -> Result<Vec<T>, DataLoadError> {
        if self.format != Format::Toml {
            return self.read();
        }

        let mut table: toml::Table = self.read()?;
        let entries = table
            .remove(toml_key)
            .ok_or_else(|| self.parse_error(format!("expected a top-level `{toml_key}` array")))?;
        entries
            .try_into()
            .map_err(|e: toml::de::Error| self.parse_error(e))
    }

    fn parse_error(&self, detail: impl std::fmt::Display) -> DataLoadError {
        DataLoadError::Parse {
            file: self.path.clone(),
            detail: detail.to_string(),
        }
    }
}

// ===========================================================================
// NameTable
// ===========================================================================

/// Name -> id lookup for one kind of catalog entry.
///
/// Errors name the file the table was built from and the entry kind.
#[derive(Debug, Clone)]
pub struct NameTable<Id> {
    kind: &'static str,
    file: PathBuf,
    ids: HashMap<String, Id>,
}

impl<Id: Copy> NameTable<Id> {
    pub fn new(kind: &'static str, file: &Path) -> Self {
        Self {
            kind,
            file: file.to_path_buf(),
            ids: HashMap::new(),
        }
    }

    /// Record a definition. A name may be defined once.
    pub fn define(&mut self, name: &str, id: Id) -> Result<(), DataLoadError> {
        if self.ids.contains_key(name) {
            return Err(DataLoadError::DuplicateName {
                file: self.file.clone(),
                name: name.to_string(),
                kind: self.kind,
            });
        }
        self.ids.insert(name.to_string(), id);
        Ok(())
    }

    /// Id of a previously defined name, as referenced from `file`.
    pub fn resolve(&self, name: &str, file: &Path) -> Result<Id, DataLoadError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| DataLoadError::UnresolvedRef {
                file: file.to_path_buf(),
                name: name.to_string(),
                kind: self.kind,
            })
    }

    /// Id for `name`, assigning `make_id(len)` on first mention.
    pub fn intern(&mut self, name: &str, make_id: impl FnOnce(u32) -> Id) -> Id {
        let next = make_id(self.ids.len() as u32);
        *self.ids.entry(name.to_string()).or_insert(next)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_map(self) -> HashMap<String, Id> {
        self.ids
    }
}

// ===========================================================================
// Tests
// ===========================================================================
