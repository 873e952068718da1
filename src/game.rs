//! The game aggregate.
//!
//! [`Game`] owns everything: the room definitions, the [`GameState`]
//! snapshot, the trap registry, and the objective book. It is constructed
//! once from a [`WorldDef`] and passed down explicitly -- there are no
//! singletons, and every mutation goes through a method here (reducer
//! dispatch for plain state transitions, composite operations for anything
//! touching more than one store). The whole aggregate serializes as one
//! record, so a save file is a single source of truth.

use crate::GORSTAN_VERSION;
use crate::action::{Action, reduce};
use crate::objective::{MarkOutcome, Objective, ObjectiveBook};
use crate::state::GameState;
use crate::trap::{DeathWatch, EntryOutcome, Trap, TrapRegistry};
use crate::world::{RoomDef, WorldDef};
use anyhow::{Result, anyhow};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score awarded for reaching a room for the first time.
const NEW_ROOM_SCORE: i64 = 1;
/// Score awarded for completing an objective.
const OBJECTIVE_SCORE: i64 = 5;

/// Result of a directional move attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// No exit matched the requested direction.
    NoExit,
    /// The player entered a room; the outcome carries any trap resolution.
    Entered {
        room_id: String,
        first_visit: bool,
        outcome: EntryOutcome,
    },
}

/// Complete state of a running Gorstan session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub title: String,
    pub start_room: String,
    pub rooms: HashMap<String, RoomDef>,
    /// Items currently lying in each room; starts from the definitions and
    /// changes as the player takes and drops things.
    room_items: HashMap<String, Vec<String>>,
    pub state: GameState,
    pub traps: TrapRegistry,
    pub objectives: ObjectiveBook,
    death_watch: DeathWatch,
    pub version: String,
}

impl Game {
    /// Build a game from a validated world definition.
    ///
    /// Seeds the trap registry and objective book from the room definitions
    /// and places the player in the start room. The start room's traps are
    /// not resolved here; call [`Game::enter_room`] for that.
    pub fn from_world(world: WorldDef, player_name: &str) -> Game {
        let mut traps = TrapRegistry::new();
        let mut objectives = ObjectiveBook::new();
        let mut room_items = HashMap::new();
        let mut rooms = HashMap::new();

        for room in world.rooms {
            for trap in &room.traps {
                traps.arm(Trap {
                    id: trap.id.clone(),
                    room_id: room.id.clone(),
                    description: trap.description.clone(),
                    lethal: trap.lethal,
                });
            }
            for objective in &room.objectives {
                objectives.add(&room.id, Objective::new(&objective.id, &objective.description));
            }
            room_items.insert(room.id.clone(), room.items.clone());
            rooms.insert(room.id.clone(), room);
        }

        info!(
            "game '{}' created: {} rooms, {} traps armed",
            world.title,
            rooms.len(),
            traps.armed_count()
        );

        Game {
            title: world.title,
            start_room: world.start_room.clone(),
            rooms,
            room_items,
            state: GameState::new(player_name, &world.start_room),
            traps,
            objectives,
            death_watch: DeathWatch::new(),
            version: GORSTAN_VERSION.to_string(),
        }
    }

    /// Run one action through the reducer, replacing the state snapshot.
    pub fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, action);
    }

    /// The room definition the player currently occupies.
    ///
    /// # Errors
    /// - if the current room id is not in the world (corrupt save or bug)
    pub fn current_room(&self) -> Result<&RoomDef> {
        self.rooms
            .get(&self.state.current_room)
            .ok_or_else(|| anyhow!("current room '{}' not found in world", self.state.current_room))
    }

    /// Items currently lying in a room.
    pub fn items_in(&self, room_id: &str) -> &[String] {
        self.room_items.get(room_id).map_or(&[], Vec::as_slice)
    }

    /// Move the player into a room and resolve its traps.
    ///
    /// First visits score a point and set the room's narrative flags. A trap
    /// that fires (lethal or not) is recorded in the triggered-trap set and
    /// the game log; acting on a death outcome is the caller's decision.
    ///
    /// # Errors
    /// - if `room_id` does not exist (the unconditional overwrite the old
    ///   bookkeeping allowed is an error here)
    pub fn enter_room(&mut self, room_id: &str) -> Result<EntryOutcome> {
        let room = self
            .rooms
            .get(room_id)
            .ok_or_else(|| anyhow!("cannot enter unknown room '{room_id}'"))?;
        let room_flags: Vec<_> = room.flags.clone().into_iter().collect();
        let first_visit = !self.state.has_visited(room_id);

        self.dispatch(Action::SetCurrentRoom(room_id.to_string()));
        if first_visit {
            self.dispatch(Action::UpdateScore(NEW_ROOM_SCORE));
            for (name, value) in room_flags {
                self.dispatch(Action::SetFlag { name, value });
            }
        }

        let outcome = self.traps.resolve_entry(room_id);
        if let Some(trap_id) = &outcome.trap_id {
            self.trigger_trap(trap_id);
            if let Some(cause) = &outcome.cause {
                self.dispatch(Action::AddToLog(cause.clone()));
            }
        }
        Ok(outcome)
    }

    /// Move the player through an exit of the current room.
    ///
    /// Direction matching is forgiving: the first exit whose direction word
    /// contains the input (case-insensitive) wins. Exits that point at rooms
    /// missing from the world are refused as if they were not there.
    ///
    /// # Errors
    /// - if the current room cannot be resolved
    pub fn move_player(&mut self, direction: &str) -> Result<MoveResult> {
        let wanted = direction.to_lowercase();
        let destination = {
            let room = self.current_room()?;
            room.exits
                .iter()
                .find(|(dir, _)| dir.to_lowercase().contains(&wanted))
                .map(|(_, dest)| dest.clone())
        };

        let Some(dest_id) = destination else {
            return Ok(MoveResult::NoExit);
        };
        if !self.rooms.contains_key(&dest_id) {
            info!("refused move through dangling exit to '{dest_id}'");
            return Ok(MoveResult::NoExit);
        }

        let first_visit = !self.state.has_visited(&dest_id);
        let outcome = self.enter_room(&dest_id)?;
        info!("{} moved to {dest_id}", self.state.player_name);
        Ok(MoveResult::Entered {
            room_id: dest_id,
            first_visit,
            outcome,
        })
    }

    /// Record a fired trap. Idempotent; unknown ids are accepted.
    pub fn trigger_trap(&mut self, trap_id: &str) {
        if self.state.triggered_traps.insert(trap_id.to_string()) {
            info!("trap '{trap_id}' triggered on {}", self.state.player_name);
        }
    }

    /// Complete an objective in a room, mirroring the id into the state
    /// snapshot and scoring it. `NotFound` and `AlreadyMarked` change
    /// nothing beyond the objective book's own logging.
    pub fn complete_objective(&mut self, room_id: &str, objective_id: &str) -> MarkOutcome {
        let outcome = self.objectives.mark_completed(room_id, objective_id);
        if outcome == MarkOutcome::Marked {
            self.state.completed_objectives.insert(objective_id.to_string());
            self.dispatch(Action::UpdateScore(OBJECTIVE_SCORE));
            self.dispatch(Action::AddToLog(format!("Objective complete: {objective_id}")));
        }
        outcome
    }

    /// Take an item lying in the current room into the inventory.
    /// Matching is case-insensitive containment. Returns the item id taken.
    pub fn take_item(&mut self, name: &str) -> Option<String> {
        let wanted = name.to_lowercase();
        let room_id = self.state.current_room.clone();
        let here = self.room_items.get_mut(&room_id)?;
        let idx = here.iter().position(|i| i.to_lowercase().contains(&wanted))?;
        let item_id = here.remove(idx);
        self.dispatch(Action::AddToInventory(item_id.clone()));
        Some(item_id)
    }

    /// Drop a held item into the current room. Returns the item id dropped.
    pub fn drop_item(&mut self, name: &str) -> Option<String> {
        let wanted = name.to_lowercase();
        let item_id = self
            .state
            .inventory
            .iter()
            .find(|i| i.to_lowercase().contains(&wanted))?
            .clone();
        self.dispatch(Action::RemoveFromInventory(item_id.clone()));
        self.room_items
            .entry(self.state.current_room.clone())
            .or_default()
            .push(item_id.clone());
        Some(item_id)
    }

    /// Reset after a death: rebuild the default state (play time preserved,
    /// reset counter bumped) and return the world's items to their original
    /// places. Traps stay armed and objective progress is kept.
    pub fn reset(&mut self) {
        self.dispatch(Action::Reset);
        for (room_id, room) in &self.rooms {
            self.room_items.insert(room_id.clone(), room.items.clone());
        }
        info!(
            "game reset #{} for {}",
            self.state.reset_count, self.state.player_name
        );
    }

    /// Death watcher for the REPL: reports a lethal cause at most once per
    /// room change.
    pub fn check_death(&mut self) -> Option<String> {
        let room_id = self.state.current_room.clone();
        self.death_watch.on_enter(&self.traps, &room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ObjectiveDef, TrapDef};
    use std::collections::BTreeMap;

    fn test_world() -> WorldDef {
        serde_json::from_value(serde_json::json!({
            "title": "Gorstan (test)",
            "start_room": "room:control:nexus",
            "rooms": [
                {
                    "id": "room:control:nexus",
                    "name": "Control Nexus",
                    "description": "Banks of humming panels.",
                    "exits": { "north": "room:maze:echo", "east": "room:hub" },
                    "items": ["item:coffee"]
                },
                {
                    "id": "room:maze:echo",
                    "name": "Echo Maze",
                    "description": "Your footsteps answer themselves.",
                    "exits": { "south": "room:control:nexus" },
                    "traps": [
                        { "id": "pit", "description": "You fall into a pit.", "lethal": true }
                    ],
                    "flags": { "maze_entered": true }
                },
                {
                    "id": "room:hub",
                    "name": "The Hub",
                    "description": "A quiet crossroads.",
                    "exits": { "west": "room:control:nexus" },
                    "objectives": [
                        { "id": "find-key", "description": "Find the brass key." }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    fn test_game() -> Game {
        Game::from_world(test_world(), "Dale")
    }

    #[test]
    fn from_world_seeds_traps_and_objectives() {
        let game = test_game();
        assert_eq!(game.traps.armed_count(), 1);
        assert_eq!(game.objectives.objectives("room:hub").len(), 1);
        assert_eq!(game.items_in("room:control:nexus"), ["item:coffee"]);
        assert_eq!(game.state.current_room, "room:control:nexus");
    }

    #[test]
    fn enter_unknown_room_is_an_error() {
        let mut game = test_game();
        assert!(game.enter_room("room:nowhere").is_err());
        assert_eq!(game.state.current_room, "room:control:nexus");
    }

    #[test]
    fn first_visit_scores_and_sets_room_flags() {
        let mut game = test_game();
        let outcome = game.enter_room("room:maze:echo").unwrap();
        assert!(outcome.death);
        assert_eq!(game.state.score, 1);
        assert!(game.state.flags["maze_entered"].is_set());
        assert!(game.state.triggered_traps.contains("pit"));

        // second entry: no extra score, trap fires again
        let again = game.enter_room("room:maze:echo").unwrap();
        assert!(again.death);
        assert_eq!(game.state.score, 1);
    }

    #[test]
    fn move_player_matches_direction_loosely() {
        let mut game = test_game();
        let result = game.move_player("N").unwrap();
        assert!(matches!(result, MoveResult::Entered { ref room_id, .. } if room_id == "room:maze:echo"));
    }

    #[test]
    fn move_player_without_exit_stays_put() {
        let mut game = test_game();
        let result = game.move_player("up").unwrap();
        assert_eq!(result, MoveResult::NoExit);
        assert_eq!(game.state.current_room, "room:control:nexus");
    }

    #[test]
    fn move_player_refuses_dangling_exit() {
        let mut game = test_game();
        game.rooms
            .get_mut("room:control:nexus")
            .unwrap()
            .exits
            .insert("down".into(), "room:unbuilt".into());
        assert_eq!(game.move_player("down").unwrap(), MoveResult::NoExit);
    }

    #[test]
    fn take_and_drop_move_items_between_room_and_inventory() {
        let mut game = test_game();
        assert_eq!(game.take_item("coffee").as_deref(), Some("item:coffee"));
        assert!(game.state.holds_item("item:coffee"));
        assert!(game.items_in("room:control:nexus").is_empty());
        assert!(game.take_item("coffee").is_none());

        game.enter_room("room:hub").unwrap();
        assert_eq!(game.drop_item("coffee").as_deref(), Some("item:coffee"));
        assert!(!game.state.holds_item("item:coffee"));
        assert_eq!(game.items_in("room:hub"), ["item:coffee"]);
    }

    #[test]
    fn complete_objective_scores_and_mirrors_into_state() {
        let mut game = test_game();
        assert_eq!(game.complete_objective("room:hub", "find-key"), MarkOutcome::Marked);
        assert!(game.state.completed_objectives.contains("find-key"));
        assert_eq!(game.state.score, 5);

        assert_eq!(
            game.complete_objective("room:hub", "find-key"),
            MarkOutcome::AlreadyMarked
        );
        assert_eq!(game.state.score, 5);

        assert_eq!(
            game.complete_objective("room:hub", "nonexistent-id"),
            MarkOutcome::NotFound
        );
        assert_eq!(game.state.score, 5);
    }

    #[test]
    fn reset_restores_items_and_keeps_traps_armed() {
        let mut game = test_game();
        game.take_item("coffee");
        game.enter_room("room:maze:echo").unwrap();
        let play_time = game.state.total_play_time;

        game.reset();
        assert_eq!(game.state.reset_count, 1);
        assert_eq!(game.state.total_play_time, play_time);
        assert_eq!(game.state.current_room, "room:control:nexus");
        assert_eq!(game.items_in("room:control:nexus"), ["item:coffee"]);
        assert_eq!(game.traps.armed_count(), 1);
    }

    #[test]
    fn game_snapshot_round_trips_through_json() {
        let mut game = test_game();
        game.take_item("coffee");
        game.enter_room("room:hub").unwrap();

        let json = serde_json::to_string(&game).unwrap();
        let restored: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn defs_parse_into_expected_shapes() {
        let world = test_world();
        let maze = world.room("room:maze:echo").unwrap();
        assert_eq!(
            maze.traps,
            vec![TrapDef {
                id: "pit".into(),
                description: "You fall into a pit.".into(),
                lethal: true
            }]
        );
        let hub = world.room("room:hub").unwrap();
        assert_eq!(
            hub.objectives,
            vec![ObjectiveDef {
                id: "find-key".into(),
                description: "Find the brass key.".into()
            }]
        );
        assert_eq!(
            world.room("room:control:nexus").unwrap().exits,
            BTreeMap::from([
                ("east".to_string(), "room:hub".to_string()),
                ("north".to_string(), "room:maze:echo".to_string()),
            ])
        );
    }
}
