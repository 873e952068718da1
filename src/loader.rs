//! World loading and validation.
//!
//! Worlds are plain JSON files (see `data/world.json`). Loading is
//! best-effort on content problems that only degrade play (a dangling exit
//! is logged, not fatal) and strict on problems that break the core
//! contracts (no rooms, duplicate ids, missing start room).

use crate::world::WorldDef;
use anyhow::{Context, Result};
use log::{info, warn};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Cached path to the directory containing the engine's runtime data files.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Structural problems that make a world unplayable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("world definition contains no rooms")]
    Empty,
    #[error("duplicate room id '{0}' in world definition")]
    DuplicateRoom(String),
    #[error("start room '{0}' not present in world definition")]
    MissingStartRoom(String),
}

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Resolve the most likely location of the runtime data directory.
fn detect_data_root() -> PathBuf {
    let mut candidates = vec![PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("data"));
        }
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Load and validate a world definition from a JSON file.
///
/// # Errors
/// - file IO or JSON parse failures, with the offending path in context
/// - any [`WorldError`] found during validation
pub fn load_world(path: &Path) -> Result<WorldDef> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading world file {}", path.display()))?;
    let world: WorldDef =
        serde_json::from_str(&raw).with_context(|| format!("parsing world file {}", path.display()))?;
    validate_world(&world)?;
    info!(
        "world '{}' loaded: {} rooms, start at {}",
        world.title,
        world.rooms.len(),
        world.start_room
    );
    Ok(world)
}

/// Check the structural contracts of a world definition.
///
/// Dangling exits (a direction pointing at an unknown room id) are warned
/// about but allowed; the move handler refuses them at play time.
///
/// # Errors
/// Returns the first [`WorldError`] encountered.
pub fn validate_world(world: &WorldDef) -> Result<(), WorldError> {
    if world.rooms.is_empty() {
        return Err(WorldError::Empty);
    }

    let mut seen = HashSet::new();
    for room in &world.rooms {
        if !seen.insert(room.id.as_str()) {
            return Err(WorldError::DuplicateRoom(room.id.clone()));
        }
    }

    if !seen.contains(world.start_room.as_str()) {
        return Err(WorldError::MissingStartRoom(world.start_room.clone()));
    }

    for room in &world.rooms {
        for (direction, dest) in &room.exits {
            if !seen.contains(dest.as_str()) {
                warn!("room {} has dangling {direction} exit to unknown room {dest}", room.id);
            }
        }
    }

    Ok(())
}
