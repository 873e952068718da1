//! World definition types.
//!
//! A Gorstan world is a flat collection of room definitions plus a start
//! room, deserialized from JSON. Room definitions seed the trap registry and
//! objective book when a [`crate::game::Game`] is built; the remaining fields
//! are static content the REPL renders.

use crate::state::FlagValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Trap seed carried by a room definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapDef {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub lethal: bool,
}

/// Objective seed carried by a room definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveDef {
    pub id: String,
    pub description: String,
}

/// One room of the world.
///
/// `exits` maps a direction word to a destination room id. `flags` are set
/// into game state the first time the player enters the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDef {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub exits: BTreeMap<String, String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub npcs: Vec<String>,
    #[serde(default)]
    pub traps: Vec<TrapDef>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveDef>,
    #[serde(default)]
    pub flags: HashMap<String, FlagValue>,
}

/// A complete, loadable world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDef {
    pub title: String,
    pub start_room: String,
    pub rooms: Vec<RoomDef>,
}

impl WorldDef {
    /// Find a room definition by id.
    pub fn room(&self, room_id: &str) -> Option<&RoomDef> {
        self.rooms.iter().find(|r| r.id == room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_def_deserializes_with_defaults() {
        let json = r#"{
            "id": "room:hub",
            "name": "The Hub",
            "description": "A quiet crossroads between worlds."
        }"#;
        let room: RoomDef = serde_json::from_str(json).unwrap();
        assert_eq!(room.id, "room:hub");
        assert!(room.exits.is_empty());
        assert!(room.traps.is_empty());
        assert!(room.objectives.is_empty());
        assert!(room.flags.is_empty());
    }

    #[test]
    fn trap_def_lethal_defaults_false() {
        let json = r#"{ "id": "alarm", "description": "A loud alarm sounds." }"#;
        let trap: TrapDef = serde_json::from_str(json).unwrap();
        assert!(!trap.lethal);
    }

    #[test]
    fn world_def_room_lookup() {
        let world = WorldDef {
            title: "Test".into(),
            start_room: "room:hub".into(),
            rooms: vec![RoomDef {
                id: "room:hub".into(),
                name: "The Hub".into(),
                description: String::new(),
                exits: BTreeMap::new(),
                items: Vec::new(),
                npcs: Vec::new(),
                traps: Vec::new(),
                objectives: Vec::new(),
                flags: HashMap::new(),
            }],
        };
        assert!(world.room("room:hub").is_some());
        assert!(world.room("room:nowhere").is_none());
    }
}
