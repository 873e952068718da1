//! Room traps.
//!
//! Traps are room-attached hazards resolved whenever the player enters the
//! room. Resolution is a pure query: a trap is never consumed by firing, so
//! re-entering a trapped room triggers it again. The only way to clear traps
//! is [`TrapRegistry::disarm_all`], which clears the whole registry.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single armed hazard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    pub id: String,
    pub room_id: String,
    pub description: String,
    pub lethal: bool,
}

/// What happened when the player stepped into a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub death: bool,
    /// Description of the trap that fired, if any.
    pub cause: Option<String>,
    /// Id of the trap that fired, if any.
    pub trap_id: Option<String>,
}

impl EntryOutcome {
    fn safe() -> EntryOutcome {
        EntryOutcome {
            death: false,
            cause: None,
            trap_id: None,
        }
    }
}

/// Registry of armed traps, keyed by the room that owns them.
///
/// A room may hold many traps, in insertion order; duplicate trap ids are
/// not rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapRegistry {
    by_room: HashMap<String, Vec<Trap>>,
}

impl TrapRegistry {
    pub fn new() -> TrapRegistry {
        TrapRegistry::default()
    }

    /// Arm a trap in its owning room.
    pub fn arm(&mut self, trap: Trap) {
        info!(
            "trap '{}' armed in {} (lethal: {})",
            trap.id, trap.room_id, trap.lethal
        );
        self.by_room.entry(trap.room_id.clone()).or_default().push(trap);
    }

    /// Convenience form of [`TrapRegistry::arm`].
    pub fn arm_trap(&mut self, id: &str, room_id: &str, description: &str, lethal: bool) {
        self.arm(Trap {
            id: id.to_string(),
            room_id: room_id.to_string(),
            description: description.to_string(),
            lethal,
        });
    }

    /// Clear every trap in every room.
    pub fn disarm_all(&mut self) {
        let count: usize = self.by_room.values().map(Vec::len).sum();
        info!("disarming all traps ({count} cleared)");
        self.by_room.clear();
    }

    /// Traps currently armed in `room_id`, in insertion order.
    pub fn room_traps(&self, room_id: &str) -> &[Trap] {
        self.by_room.get(room_id).map_or(&[], Vec::as_slice)
    }

    /// Total number of armed traps across all rooms.
    pub fn armed_count(&self) -> usize {
        self.by_room.values().map(Vec::len).sum()
    }

    /// Resolve what a room entry does to the player.
    ///
    /// If any armed trap in the room is lethal, the result is death with the
    /// *first-armed* lethal trap as cause. Otherwise the first trap (if any)
    /// fires non-lethally. An untrapped room resolves to a safe entry.
    pub fn resolve_entry(&self, room_id: &str) -> EntryOutcome {
        let traps = self.room_traps(room_id);
        if let Some(lethal) = traps.iter().find(|t| t.lethal) {
            return EntryOutcome {
                death: true,
                cause: Some(lethal.description.clone()),
                trap_id: Some(lethal.id.clone()),
            };
        }
        if let Some(first) = traps.first() {
            return EntryOutcome {
                death: false,
                cause: Some(first.description.clone()),
                trap_id: Some(first.id.clone()),
            };
        }
        EntryOutcome::safe()
    }
}

/// Fires a death notification at most once per room change.
///
/// Wraps [`TrapRegistry::resolve_entry`] the way the UI's `onDeath` hook did:
/// repeated checks for the same room are quiet until the room id changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathWatch {
    last_room: Option<String>,
}

impl DeathWatch {
    pub fn new() -> DeathWatch {
        DeathWatch::default()
    }

    /// Check `room_id` against the registry; returns the death cause only on
    /// the first check after the watched room changes.
    pub fn on_enter(&mut self, registry: &TrapRegistry, room_id: &str) -> Option<String> {
        if self.last_room.as_deref() == Some(room_id) {
            return None;
        }
        self.last_room = Some(room_id.to_string());
        let outcome = registry.resolve_entry(room_id);
        if outcome.death { outcome.cause } else { None }
    }
}
