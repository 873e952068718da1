//! Command module
//!
//! Describes possible commands used during gameplay.

/// Commands that can be executed by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Complete(String),
    Drop(String),
    Go(String),
    Help,
    History,
    Inventory,
    Load(String),
    Look,
    Objectives,
    Quit,
    Save(String),
    Score,
    Take(String),
    Unknown,
}

/// Parses an input string and returns a corresponding `Command` if recognized.
///
/// Anything unrecognized becomes [`Command::Unknown`]; the REPL warns and
/// leaves state untouched for those.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    match words.as_slice() {
        ["look"] | ["l"] => Command::Look,
        ["go" | "move" | "walk" | "enter", "to", dir] | ["go" | "move" | "walk" | "enter", dir] => {
            Command::Go((*dir).to_string())
        },
        ["take" | "get" | "grab", thing @ ..] if !thing.is_empty() => Command::Take(thing.join(" ")),
        ["drop" | "discard", thing @ ..] if !thing.is_empty() => Command::Drop(thing.join(" ")),
        ["inventory" | "inv" | "i"] => Command::Inventory,
        ["score" | "stats" | "status"] => Command::Score,
        ["objectives" | "tasks" | "goals"] => Command::Objectives,
        ["history"] => Command::History,
        ["complete" | "do" | "finish", id] => Command::Complete((*id).to_string()),
        ["save", slot] => Command::Save((*slot).to_string()),
        ["load", slot] => Command::Load((*slot).to_string()),
        ["help" | "?"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        _ => Command::Unknown,
    }
}
