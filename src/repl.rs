//! REPL and command handling.
//!
//! The game runs in a read-eval-print loop. Every parsed command is routed
//! through [`handle_command`], which is the single writer over the
//! [`Game`] aggregate -- the UI layer cannot reach around it to poke state.
//! Death checking runs once per loop iteration, after the command, so a
//! lethal room kills the player exactly once per entry.

use crate::command::{Command, parse_command};
use crate::game::{Game, MoveResult};
use crate::save::{SaveStatus, default_save_dir, find_slot, load_game, save_game, slot_status};
use crate::state::HISTORY_CAP;
use crate::style::GameStyle;
use crate::{Action, MarkOutcome};

use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::{Path, PathBuf};

/// Control flow signal used by handlers to exit the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run the main read-eval-print loop until the user quits.
///
/// # Errors
/// - Propagates failures from handlers, such as a missing room for the player.
pub fn run_repl(game: &mut Game) -> Result<()> {
    let save_dir = default_save_dir();
    let history_path = input_history_path();

    let mut editor = DefaultEditor::new().context("initializing line editor")?;
    if editor.load_history(&history_path).is_err() {
        info!("no prior input history at {}", history_path.display());
    }

    look_handler(game)?;
    if let Some(cause) = game.check_death() {
        death_handler(game, &cause)?;
    }

    loop {
        let prompt = format!(
            "\n[{} | Score: {} | HP: {}]>> ",
            room_name(game),
            game.state.score,
            game.state.health
        )
        .prompt_style()
        .to_string();

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Command canceled.".prompt_style());
                continue;
            },
            Err(ReadlineError::Eof) => "quit".to_string(),
            Err(err) => {
                warn!("input error: {err}");
                println!("{}", "Failed to read input. Try again.".error_style());
                continue;
            },
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);
        game.dispatch(Action::AddCommandToHistory(trimmed.to_string()));

        let command = parse_command(trimmed);
        if let ReplControl::Quit = handle_command(game, &command, &save_dir)? {
            break;
        }

        if let Some(cause) = game.check_death() {
            death_handler(game, &cause)?;
        }
    }

    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(err) = editor.save_history(&history_path) {
        warn!("could not save input history: {err}");
    }
    Ok(())
}

/// Dispatch one parsed command against the game.
///
/// [`Command::Unknown`] logs a warning and changes nothing -- the old
/// "unknown action type" reducer fallback, surfaced at the parse boundary.
///
/// # Errors
/// - Propagates handler failures (unresolvable current room, save IO).
pub fn handle_command(game: &mut Game, command: &Command, save_dir: &Path) -> Result<ReplControl> {
    match command {
        Command::Look => look_handler(game)?,
        Command::Go(direction) => go_handler(game, direction)?,
        Command::Take(thing) => take_handler(game, thing),
        Command::Drop(thing) => drop_handler(game, thing),
        Command::Inventory => inventory_handler(game),
        Command::Score => score_handler(game),
        Command::Objectives => objectives_handler(game),
        Command::Complete(id) => {
            let room_id = game.state.current_room.clone();
            complete_objective_handler(game, &room_id, id);
        },
        Command::History => history_handler(game),
        Command::Save(slot) => save_handler(game, save_dir, slot)?,
        Command::Load(slot) => load_handler(game, save_dir, slot),
        Command::Help => help_handler(),
        Command::Quit => return Ok(quit_handler(game)),
        Command::Unknown => {
            warn!("unrecognized command left state untouched");
            println!("{}", "Didn't quite catch that. Try 'help'.".error_style());
        },
    }
    Ok(ReplControl::Continue)
}

fn room_name(game: &Game) -> String {
    game.current_room().map_or_else(|_| "<unknown>".to_string(), |room| room.name.clone())
}

/// Show the current room: description, items, NPCs, exits, objectives.
fn look_handler(game: &Game) -> Result<()> {
    let room = game.current_room()?;
    let width = textwrap::termwidth().min(84);

    println!("\n{}", room.name.room_style());
    println!("{}", textwrap::fill(&room.description, width).description_style());

    let items = game.items_in(&room.id);
    if !items.is_empty() {
        let names: Vec<_> = items.iter().map(|i| display_name(i)).collect();
        println!("You see: {}", names.join(", ").item_style());
    }
    for npc in &room.npcs {
        println!("{} is here.", npc.npc_style());
    }

    if room.exits.is_empty() {
        println!("There are no obvious exits.");
    } else {
        for (direction, dest) in &room.exits {
            let marker = if game.state.has_visited(dest) { "" } else { " (unexplored)" };
            println!("  {} -> {}{marker}", direction.exit_style(), dest);
        }
    }

    let (done, total) = game.objectives.progress(&room.id);
    if total > 0 {
        println!("Objectives here: {done}/{total} complete (see 'objectives').");
    }
    Ok(())
}

/// Move the player and report what the destination did to them.
fn go_handler(game: &mut Game, direction: &str) -> Result<()> {
    match game.move_player(direction)? {
        MoveResult::NoExit => {
            println!("Which way is {}? You stay put.", direction.error_style());
        },
        MoveResult::Entered { outcome, .. } => {
            look_handler(game)?;
            // a non-lethal trap narrates here; a lethal one is handled by
            // the death check after the command completes
            if let Some(cause) = &outcome.cause
                && !outcome.death
            {
                println!("\n{}", cause.clone().italic());
            }
        },
    }
    Ok(())
}

/// Kill the player and restart the run, keeping play time and reset count.
fn death_handler(game: &mut Game, cause: &str) -> Result<()> {
    info!("{} died: {cause}", game.state.player_name);
    println!("\n{}", cause.death_style());
    println!("{}", "Everything folds to white.".description_style());
    game.reset();
    println!(
        "\nThe Lattice reassembles you at the beginning. (Reset #{})",
        game.state.reset_count
    );
    look_handler(game)
}

fn take_handler(game: &mut Game, thing: &str) {
    match game.take_item(thing) {
        Some(item_id) => println!("Taken: {}", display_name(&item_id).item_style()),
        None => println!("There's no {} here to take.", thing.error_style()),
    }
}

fn drop_handler(game: &mut Game, thing: &str) {
    match game.drop_item(thing) {
        Some(item_id) => println!("Dropped: {}", display_name(&item_id).item_style()),
        None => println!("You aren't carrying any {}.", thing.error_style()),
    }
}

fn inventory_handler(game: &Game) {
    if game.state.inventory.is_empty() {
        println!("You are carrying nothing.");
        return;
    }
    println!("{}", "You are carrying:".heading_style());
    for item_id in &game.state.inventory {
        println!("  - {}", display_name(item_id).item_style());
    }
}

fn score_handler(game: &Game) {
    let state = &game.state;
    println!("{}", format!("{}, level {}", state.player_name, state.level).heading_style());
    println!("  Score:  {}", state.score);
    println!("  Health: {}/100", state.health);
    println!("  Rooms:  {} visited", state.visited_rooms.len());
    println!("  Resets: {}", state.reset_count);
    let minutes = (state.total_play_time + state.session_elapsed()) / 60;
    println!("  Played: {minutes} min");
}

fn objectives_handler(game: &Game) {
    let room_id = &game.state.current_room;
    let objectives = game.objectives.objectives(room_id);
    if objectives.is_empty() {
        println!("Nothing to accomplish here.");
        return;
    }
    println!("{}", "Objectives in this room:".heading_style());
    for objective in objectives {
        if objective.completed {
            println!("  [x] {}", objective.description.objective_done_style());
        } else {
            println!("  [ ] {}", objective.description.objective_style());
        }
    }
}

fn history_handler(game: &Game) {
    println!(
        "{}",
        format!("Last {} commands (cap {HISTORY_CAP}):", game.state.command_history.len()).heading_style()
    );
    for command in &game.state.command_history {
        println!("  {command}");
    }
}

/// Save the whole aggregate to a named slot.
fn save_handler(game: &mut Game, save_dir: &Path, slot: &str) -> Result<()> {
    // fold the session so far into the cumulative total before writing
    let elapsed = game.state.session_elapsed();
    game.dispatch(Action::UpdatePlayTime(elapsed));
    game.state.session_start += i64::try_from(elapsed).unwrap_or(0);

    let path = save_game(game, save_dir, slot)?;
    println!("Game saved as {} ({}).", slot.underline(), path.display());
    Ok(())
}

/// Load a named slot, replacing the running game on success.
fn load_handler(game: &mut Game, save_dir: &Path, slot: &str) {
    let found = match find_slot(save_dir, slot) {
        Ok(Some(found)) => found,
        Ok(None) => {
            println!("No save named {} found.", slot.error_style());
            return;
        },
        Err(err) => {
            warn!("save discovery failed: {err}");
            println!("Couldn't look for saved games: {err}");
            return;
        },
    };

    if let SaveStatus::VersionMismatch {
        save_version,
        current_version,
    } = slot_status(&found.path)
    {
        println!(
            "{}: save '{slot}' is from engine v{save_version}; current is v{current_version}.",
            "WARNING".bold().yellow()
        );
    }

    match load_game(&found.path) {
        Ok(loaded) => {
            *game = loaded;
            info!("game reloaded from slot '{slot}'");
            println!("Saved game {} loaded. Carry on.", slot.underline());
        },
        Err(err) => {
            warn!("failed to load slot '{slot}': {err:#}");
            println!("Unable to load {}: the file is unreadable or stale.", slot.error_style());
        },
    }
}

fn help_handler() {
    println!("{}", "Commands:".heading_style());
    println!("  look                 describe the current room");
    println!("  go <direction>       move through an exit");
    println!("  take / drop <item>   pick up or put down an item");
    println!("  inventory            list what you carry");
    println!("  objectives           tasks in the current room");
    println!("  complete <id>        mark an objective here as done");
    println!("  score                session stats");
    println!("  history              recent commands");
    println!("  save / load <slot>   persist or restore the whole game");
    println!("  quit                 leave Gorstan");
}

/// Quit: fold in play time, log the ending state, print a farewell.
fn quit_handler(game: &mut Game) -> ReplControl {
    let elapsed = game.state.session_elapsed();
    game.dispatch(Action::UpdatePlayTime(elapsed));
    info!(
        "{} quit with score {} after {} resets",
        game.state.player_name, game.state.score, game.state.reset_count
    );
    println!(
        "\nYou step out of the story. Score: {}, rooms visited: {}.",
        game.state.score,
        game.state.visited_rooms.len()
    );
    ReplControl::Quit
}

/// Mark an objective and narrate the outcome, including the miss cases the
/// old bookkeeping swallowed silently.
pub fn complete_objective_handler(game: &mut Game, room_id: &str, objective_id: &str) {
    match game.complete_objective(room_id, objective_id) {
        MarkOutcome::Marked => println!("Objective complete: {}", objective_id.objective_style()),
        MarkOutcome::AlreadyMarked => println!("Already done."),
        MarkOutcome::NotFound => {
            println!("No objective {} here.", objective_id.error_style());
        },
    }
}

fn display_name(item_id: &str) -> String {
    item_id.strip_prefix("item:").unwrap_or(item_id).replace('-', " ")
}

fn input_history_path() -> PathBuf {
    dirs::data_local_dir().map_or_else(
        || PathBuf::from(".gorstan_history"),
        |base| base.join("gorstan").join("history.txt"),
    )
}
