//! State transitions.
//!
//! All player/game state changes flow through [`reduce`]: a pure function
//! from a prior [`GameState`] and an [`Action`] to a fresh snapshot. The
//! action set is closed, so there is no "unknown action" branch here -- input
//! that fails to parse never becomes an `Action` at all (see
//! [`crate::command::Command::Unknown`]).

use crate::state::{FlagValue, GameState, MAX_HEALTH};

/// Every state transition the engine supports.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the whole snapshot (used when loading a saved game).
    Set(Box<GameState>),
    /// Return to the default state, preserving cumulative play time and
    /// incrementing the reset counter.
    Reset,
    SetPlayerName(String),
    SetCurrentRoom(String),
    AddToInventory(String),
    RemoveFromInventory(String),
    SetFlag { name: String, value: FlagValue },
    /// Signed health delta; result is clamped into `0..=100`.
    UpdateHealth(i64),
    /// Signed score delta; score saturates at zero.
    UpdateScore(i64),
    AddVisitedRoom(String),
    AddCommandToHistory(String),
    AddToLog(String),
    SetTransitioning(bool),
    UpdateNpcRelationship { npc: String, delta: i64 },
    AddAchievement(String),
    /// Add seconds of play to the cumulative total.
    UpdatePlayTime(u64),
}

/// Apply one action to a state snapshot, producing the next snapshot.
///
/// Total over the action set: every arm either changes the copy or leaves it
/// as-is (idempotent adds, no-op removes). Nothing here panics, so there is
/// no defensive catch wrapping the match.
pub fn reduce(state: &GameState, action: Action) -> GameState {
    let mut next = state.clone();
    match action {
        Action::Set(snapshot) => next = *snapshot,
        Action::Reset => {
            let mut fresh = GameState::new(&state.player_name, &state.start_room);
            fresh.session_start = state.session_start;
            fresh.total_play_time = state.total_play_time;
            fresh.reset_count = state.reset_count + 1;
            next = fresh;
        },
        Action::SetPlayerName(name) => next.player_name = name,
        Action::SetCurrentRoom(room_id) => {
            next.mark_visited(&room_id);
            next.current_room = room_id;
            // arrival ends any in-flight scripted transition
            next.transitioning = false;
        },
        Action::AddToInventory(item_id) => {
            if !next.holds_item(&item_id) {
                next.inventory.push(item_id);
            }
        },
        Action::RemoveFromInventory(item_id) => {
            next.inventory.retain(|i| i != &item_id);
        },
        Action::SetFlag { name, value } => {
            next.flags.insert(name, value);
        },
        Action::UpdateHealth(delta) => {
            let hp = i64::from(next.health).saturating_add(delta);
            next.health = u32::try_from(hp.clamp(0, i64::from(MAX_HEALTH))).unwrap_or(0);
        },
        Action::UpdateScore(delta) => {
            next.score = next.score.saturating_add_signed(delta);
        },
        Action::AddVisitedRoom(room_id) => next.mark_visited(&room_id),
        Action::AddCommandToHistory(command) => next.push_command(command),
        Action::AddToLog(entry) => next.push_log(entry),
        Action::SetTransitioning(flag) => next.transitioning = flag,
        Action::UpdateNpcRelationship { npc, delta } => {
            let standing = next.npc_relationships.entry(npc).or_insert(0);
            *standing = standing.saturating_add(delta);
        },
        Action::AddAchievement(name) => {
            next.achievements.insert(name);
        },
        Action::UpdatePlayTime(seconds) => {
            next.total_play_time = next.total_play_time.saturating_add(seconds);
        },
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HISTORY_CAP;

    fn base() -> GameState {
        GameState::new("Dale", "room:control:nexus")
    }

    #[test]
    fn add_to_inventory_is_idempotent() {
        let state = base();
        let once = reduce(&state, Action::AddToInventory("item:coffee".into()));
        let twice = reduce(&once, Action::AddToInventory("item:coffee".into()));
        assert_eq!(twice.inventory, vec!["item:coffee".to_string()]);
    }

    #[test]
    fn remove_from_inventory_absent_item_is_noop() {
        let state = base();
        let next = reduce(&state, Action::RemoveFromInventory("item:ghost".into()));
        assert_eq!(next, state);
    }

    #[test]
    fn remove_from_inventory_removes_present_item() {
        let state = reduce(&base(), Action::AddToInventory("item:coffee".into()));
        let next = reduce(&state, Action::RemoveFromInventory("item:coffee".into()));
        assert!(next.inventory.is_empty());
    }

    #[test]
    fn set_current_room_records_visit_and_clears_transition() {
        let state = reduce(&base(), Action::SetTransitioning(true));
        let next = reduce(&state, Action::SetCurrentRoom("room:maze:echo".into()));
        assert_eq!(next.current_room, "room:maze:echo");
        assert!(next.has_visited("room:maze:echo"));
        assert!(!next.transitioning);
    }

    #[test]
    fn set_current_room_does_not_duplicate_visits() {
        let state = reduce(&base(), Action::SetCurrentRoom("room:maze:echo".into()));
        let back = reduce(&state, Action::SetCurrentRoom("room:control:nexus".into()));
        let again = reduce(&back, Action::SetCurrentRoom("room:maze:echo".into()));
        assert_eq!(
            again.visited_rooms,
            vec!["room:control:nexus".to_string(), "room:maze:echo".to_string()]
        );
    }

    #[test]
    fn reset_preserves_play_time_and_increments_reset_count() {
        let mut state = base();
        state.total_play_time = 1234;
        state.score = 50;
        state.inventory.push("item:coffee".into());
        let next = reduce(&state, Action::Reset);
        assert_eq!(next.total_play_time, 1234);
        assert_eq!(next.reset_count, 1);
        assert_eq!(next.score, 0);
        assert!(next.inventory.is_empty());
        assert_eq!(next.current_room, "room:control:nexus");
        assert_eq!(next.player_name, "Dale");

        let third = reduce(&next, Action::Reset);
        assert_eq!(third.reset_count, 2);
        assert_eq!(third.total_play_time, 1234);
    }

    #[test]
    fn health_clamps_into_bounds() {
        let hurt = reduce(&base(), Action::UpdateHealth(-250));
        assert_eq!(hurt.health, 0);
        let healed = reduce(&hurt, Action::UpdateHealth(9999));
        assert_eq!(healed.health, MAX_HEALTH);
    }

    #[test]
    fn score_saturates_at_zero() {
        let state = reduce(&base(), Action::UpdateScore(10));
        assert_eq!(state.score, 10);
        let next = reduce(&state, Action::UpdateScore(-25));
        assert_eq!(next.score, 0);
    }

    #[test]
    fn history_cap_evicts_fifo() {
        let mut state = base();
        for n in 0..HISTORY_CAP + 5 {
            state = reduce(&state, Action::AddCommandToHistory(format!("go north {n}")));
        }
        assert_eq!(state.command_history.len(), HISTORY_CAP);
        assert_eq!(state.command_history.front().unwrap(), "go north 5");
    }

    #[test]
    fn npc_relationship_accumulates() {
        let state = reduce(
            &base(),
            Action::UpdateNpcRelationship {
                npc: "ayla".into(),
                delta: 2,
            },
        );
        let next = reduce(
            &state,
            Action::UpdateNpcRelationship {
                npc: "ayla".into(),
                delta: -5,
            },
        );
        assert_eq!(next.npc_relationships["ayla"], -3);
    }

    #[test]
    fn set_replaces_whole_snapshot() {
        let other = GameState::new("Ayla", "room:lattice");
        let next = reduce(&base(), Action::Set(Box::new(other.clone())));
        assert_eq!(next, other);
    }

    #[test]
    fn update_play_time_accumulates() {
        let state = reduce(&base(), Action::UpdatePlayTime(60));
        let next = reduce(&state, Action::UpdatePlayTime(30));
        assert_eq!(next.total_play_time, 90);
    }

    #[test]
    fn set_flag_overwrites_existing_value() {
        let state = reduce(
            &base(),
            Action::SetFlag {
                name: "lattice_open".into(),
                value: FlagValue::Bool(false),
            },
        );
        let next = reduce(
            &state,
            Action::SetFlag {
                name: "lattice_open".into(),
                value: FlagValue::Bool(true),
            },
        );
        assert_eq!(next.flags["lattice_open"], FlagValue::Bool(true));
    }
}
