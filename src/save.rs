//! Save-slot discovery and serialization.
//!
//! A save is the whole [`Game`] aggregate serialized to JSON, one file per
//! named slot, carrying the engine version so stale saves are flagged
//! instead of silently misbehaving. Layout and status reporting follow the
//! `<slot>-gorstan-<version>.json` naming scheme.

use crate::{GORSTAN_VERSION, Game};
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Directory name used when no explicit save directory is given.
pub const SAVE_DIR: &str = "saved_games";

/// A discovered save file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    pub slot: String,
    pub version: String,
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<SystemTime>,
}

/// Whether a save file is usable as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Ready,
    VersionMismatch { save_version: String, current_version: String },
    Corrupted { message: String },
}

/// Default save directory: the platform data dir if available, else a
/// `saved_games` folder next to the working directory.
pub fn default_save_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from(SAVE_DIR), |base| base.join("gorstan").join(SAVE_DIR))
}

/// Path a slot would be written to inside `dir`.
pub fn slot_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{slot}-gorstan-{GORSTAN_VERSION}.json"))
}

/// Serialize the game into a named slot, creating the directory if needed.
///
/// # Errors
/// Returns an error if serialization or any filesystem step fails.
pub fn save_game(game: &Game, dir: &Path, slot: &str) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(game).context("serializing game state")?;
    fs::create_dir_all(dir).with_context(|| format!("creating save directory {}", dir.display()))?;
    let path = slot_path(dir, slot);
    fs::write(&path, json).with_context(|| format!("writing save file {}", path.display()))?;
    info!("game saved to slot '{slot}' at {}", path.display());
    Ok(path)
}

/// Load a save file from disk and deserialize its game state.
///
/// # Errors
/// Returns an error if the file cannot be read or deserialized.
pub fn load_game(path: &Path) -> Result<Game> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading save file {}", path.display()))?;
    serde_json::from_str::<Game>(&raw).with_context(|| format!("parsing save file {}", path.display()))
}

/// Inspect a save file without committing to loading it.
pub fn slot_status(path: &Path) -> SaveStatus {
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<Game>(&raw) {
            Ok(game) if game.version == GORSTAN_VERSION => SaveStatus::Ready,
            Ok(game) => SaveStatus::VersionMismatch {
                save_version: game.version,
                current_version: GORSTAN_VERSION.to_string(),
            },
            Err(err) => {
                warn!("failed to parse save {}: {err}", path.display());
                SaveStatus::Corrupted {
                    message: format!("parse error: {err}"),
                }
            },
        },
        Err(err) => {
            warn!("failed to read save {}: {err}", path.display());
            SaveStatus::Corrupted {
                message: format!("read error: {err}"),
            }
        },
    }
}

/// Discover save slot files stored in `dir`, newest first.
///
/// # Errors
/// Returns an error if the directory contents cannot be enumerated.
pub fn collect_save_slots(dir: &Path) -> Result<Vec<SaveSlot>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("enumerating {}", dir.display()))?;
        if let Some(slot) = slot_from_entry(&entry) {
            slots.push(slot);
        }
    }
    slots.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.slot.cmp(&b.slot)));
    Ok(slots)
}

/// Find the most recent save file for a particular slot name.
///
/// # Errors
/// Returns an error if the directory contents cannot be enumerated.
pub fn find_slot(dir: &Path, slot: &str) -> Result<Option<SaveSlot>> {
    Ok(collect_save_slots(dir)?.into_iter().find(|s| s.slot == slot))
}

fn slot_from_entry(entry: &fs::DirEntry) -> Option<SaveSlot> {
    let path = entry.path();
    if !path.is_file() {
        return None;
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return None;
    }
    let file_name = path.file_name().and_then(|name| name.to_str())?.to_string();
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    let (slot, version) = stem.rsplit_once("-gorstan-")?;
    if slot.is_empty() {
        return None;
    }
    let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
    Some(SaveSlot {
        slot: slot.to_string(),
        version: version.to_string(),
        path,
        file_name,
        modified,
    })
}
