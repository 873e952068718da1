//! Per-room objectives.
//!
//! Each room may carry a list of objectives seeded from the world definition.
//! Objectives are never deleted; completion only moves forward. Completion
//! reports an explicit [`MarkOutcome`] so callers can tell "marked" from
//! "no such objective" instead of a silent no-op.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A task attached to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Objective {
    pub fn new(id: &str, description: &str) -> Objective {
        Objective {
            id: id.to_string(),
            description: description.to_string(),
            completed: false,
        }
    }
}

/// Result of a completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Found and newly marked complete.
    Marked,
    /// Found but already complete; nothing changed.
    AlreadyMarked,
    /// No objective with that id in that room; nothing changed.
    NotFound,
}

/// Room-keyed objective lists with completion tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveBook {
    by_room: HashMap<String, Vec<Objective>>,
}

impl ObjectiveBook {
    pub fn new() -> ObjectiveBook {
        ObjectiveBook::default()
    }

    /// Append an objective to a room's list, creating the list if absent.
    /// Duplicate ids are not rejected.
    pub fn add(&mut self, room_id: &str, objective: Objective) {
        self.by_room.entry(room_id.to_string()).or_default().push(objective);
    }

    /// Objectives for a room, or an empty slice if it has none.
    pub fn objectives(&self, room_id: &str) -> &[Objective] {
        self.by_room.get(room_id).map_or(&[], Vec::as_slice)
    }

    /// Mark an objective complete by id within a room.
    ///
    /// Never panics and never mutates on a miss; the outcome says which of
    /// the three cases happened. A miss is also logged, since an objective
    /// that never completes is otherwise invisible.
    pub fn mark_completed(&mut self, room_id: &str, objective_id: &str) -> MarkOutcome {
        let Some(list) = self.by_room.get_mut(room_id) else {
            warn!("mark_completed: no objectives recorded for {room_id}");
            return MarkOutcome::NotFound;
        };
        match list.iter_mut().find(|o| o.id == objective_id) {
            Some(objective) if objective.completed => MarkOutcome::AlreadyMarked,
            Some(objective) => {
                objective.completed = true;
                MarkOutcome::Marked
            },
            None => {
                warn!("mark_completed: objective '{objective_id}' not found in {room_id}");
                MarkOutcome::NotFound
            },
        }
    }

    /// (completed, total) objective counts for a room.
    pub fn progress(&self, room_id: &str) -> (usize, usize) {
        let list = self.objectives(room_id);
        (list.iter().filter(|o| o.completed).count(), list.len())
    }
}
