//! Game state snapshot.
//!
//! [`GameState`] is the single record every transition produces a new copy of.
//! It carries the player's identity and position, the inventory, narrative
//! flags, the bounded command/log buffers, and the cross-reset counters.
//! Mutation happens only through [`crate::action::reduce`] or the composite
//! operations on [`crate::game::Game`].

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use time::OffsetDateTime;

/// Most recent commands retained in the history buffer.
pub const HISTORY_CAP: usize = 100;
/// Most recent entries retained in the game log.
pub const LOG_CAP: usize = 500;
/// Health ceiling; health is clamped into `0..=MAX_HEALTH`.
pub const MAX_HEALTH: u32 = 100;

/// A narrative flag value. Flags gate story branches and may hold a toggle,
/// a counter, or a short piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl FlagValue {
    /// Treat the flag as a gate: `Bool(false)` is unset, everything else set.
    pub fn is_set(&self) -> bool {
        !matches!(self, FlagValue::Bool(false))
    }
}

/// Complete player/game state for one session.
///
/// Created once at startup from the world's start room, then replaced
/// wholesale by each reducer step. `Reset` rebuilds the default record but
/// keeps `total_play_time` and bumps `reset_count` -- the only state that
/// survives a death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player_name: String,
    pub current_room: String,
    /// Room the player respawns in; fixed at creation.
    pub start_room: String,
    /// Ordered, duplicate-free list of held item ids.
    pub inventory: Vec<String>,
    pub flags: HashMap<String, FlagValue>,
    /// Append-only, duplicate-free visit record.
    pub visited_rooms: Vec<String>,
    pub command_history: VecDeque<String>,
    pub game_log: VecDeque<String>,
    pub health: u32,
    pub score: u64,
    pub level: u32,
    pub reset_count: u32,
    pub npc_relationships: HashMap<String, i64>,
    pub achievements: HashSet<String>,
    /// Set while a scripted room transition is in flight; cleared on arrival.
    pub transitioning: bool,
    /// Ids of traps that have fired on this player.
    pub triggered_traps: HashSet<String>,
    /// Ids of objectives marked complete, mirrored from the objective book
    /// so a serialized snapshot is self-contained.
    pub completed_objectives: HashSet<String>,
    /// Unix timestamp of session start.
    pub session_start: i64,
    /// Cumulative play time in seconds, across resets.
    pub total_play_time: u64,
}

impl GameState {
    /// Build the initial state for a fresh session.
    pub fn new(player_name: &str, start_room: &str) -> GameState {
        GameState {
            player_name: player_name.to_string(),
            current_room: start_room.to_string(),
            start_room: start_room.to_string(),
            inventory: Vec::new(),
            flags: HashMap::new(),
            visited_rooms: vec![start_room.to_string()],
            command_history: VecDeque::new(),
            game_log: VecDeque::new(),
            health: MAX_HEALTH,
            score: 0,
            level: 1,
            reset_count: 0,
            npc_relationships: HashMap::new(),
            achievements: HashSet::new(),
            transitioning: false,
            triggered_traps: HashSet::new(),
            completed_objectives: HashSet::new(),
            session_start: OffsetDateTime::now_utc().unix_timestamp(),
            total_play_time: 0,
        }
    }

    /// Append to the command history, evicting the oldest entry past the cap.
    pub fn push_command(&mut self, command: String) {
        self.command_history.push_back(command);
        while self.command_history.len() > HISTORY_CAP {
            self.command_history.pop_front();
        }
    }

    /// Append to the game log, evicting the oldest entry past the cap.
    pub fn push_log(&mut self, entry: String) {
        self.game_log.push_back(entry);
        while self.game_log.len() > LOG_CAP {
            self.game_log.pop_front();
        }
    }

    /// Record a room visit unless already recorded.
    pub fn mark_visited(&mut self, room_id: &str) {
        if !self.visited_rooms.iter().any(|r| r == room_id) {
            self.visited_rooms.push(room_id.to_string());
        }
    }

    /// True if the player has been in `room_id` before.
    pub fn has_visited(&self, room_id: &str) -> bool {
        self.visited_rooms.iter().any(|r| r == room_id)
    }

    pub fn holds_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|i| i == item_id)
    }

    /// Seconds elapsed since this session began.
    pub fn session_elapsed(&self) -> u64 {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        now.saturating_sub(self.session_start).max(0).unsigned_abs()
    }
}

impl Default for GameState {
    fn default() -> GameState {
        GameState::new("the Dreamer", "room:control:nexus")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_at_start_room_with_it_visited() {
        let state = GameState::new("Dale", "room:hub");
        assert_eq!(state.current_room, "room:hub");
        assert_eq!(state.visited_rooms, vec!["room:hub".to_string()]);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.score, 0);
        assert_eq!(state.reset_count, 0);
        assert!(!state.transitioning);
    }

    #[test]
    fn push_command_evicts_oldest_past_cap() {
        let mut state = GameState::default();
        for n in 0..HISTORY_CAP + 10 {
            state.push_command(format!("cmd-{n}"));
        }
        assert_eq!(state.command_history.len(), HISTORY_CAP);
        assert_eq!(state.command_history.front().unwrap(), "cmd-10");
        assert_eq!(
            state.command_history.back().unwrap(),
            &format!("cmd-{}", HISTORY_CAP + 9)
        );
    }

    #[test]
    fn push_log_evicts_oldest_past_cap() {
        let mut state = GameState::default();
        for n in 0..LOG_CAP + 3 {
            state.push_log(format!("entry-{n}"));
        }
        assert_eq!(state.game_log.len(), LOG_CAP);
        assert_eq!(state.game_log.front().unwrap(), "entry-3");
    }

    #[test]
    fn mark_visited_is_append_only_and_duplicate_free() {
        let mut state = GameState::new("Dale", "room:hub");
        state.mark_visited("room:maze:echo");
        state.mark_visited("room:maze:echo");
        state.mark_visited("room:hub");
        assert_eq!(state.visited_rooms, vec!["room:hub", "room:maze:echo"]);
    }

    #[test]
    fn flag_value_is_set_semantics() {
        assert!(FlagValue::Bool(true).is_set());
        assert!(!FlagValue::Bool(false).is_set());
        assert!(FlagValue::Number(0).is_set());
        assert!(FlagValue::Text("lattice".into()).is_set());
    }

    #[test]
    fn flag_value_untagged_serde() {
        let parsed: FlagValue = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, FlagValue::Bool(true));
        let parsed: FlagValue = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, FlagValue::Number(7));
        let parsed: FlagValue = serde_json::from_str("\"seen\"").unwrap();
        assert_eq!(parsed, FlagValue::Text("seen".into()));
    }
}
