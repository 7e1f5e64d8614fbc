//! Data-driven research catalogs.
//!
//! Loads research items and effect targets from RON, TOML, or JSON files
//! and resolves their name references into [`research_core`] types.

pub mod catalog;
pub mod loader;
pub mod schema;

pub use catalog::{GameData, load_game_data};
pub use loader::DataLoadError;
