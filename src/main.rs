#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Gorstan **
//! Narrative adventure engine / REPL

use gorstan_engine::loader::data_path;
use gorstan_engine::{Game, load_world, run_repl};

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::env;
use std::path::PathBuf;

const DEFAULT_PLAYER: &str = "the Dreamer";

fn main() -> Result<()> {
    env_logger::init();

    let world_path = env::args().nth(1).map_or_else(|| data_path("world.json"), PathBuf::from);
    info!("Start: loading Gorstan world from {}", world_path.display());
    let world = load_world(&world_path).context("while loading Gorstan world")?;
    info!("world loaded successfully");

    let player_name = env::var("GORSTAN_PLAYER").unwrap_or_else(|_| DEFAULT_PLAYER.to_string());
    let mut game = Game::from_world(world, &player_name);

    println!("{:^84}", game.title.to_uppercase().bright_yellow().underline());
    println!(
        "\nYou are {}, a long way from waking up.\n",
        game.state.player_name.bold().bright_blue()
    );
    info!("Starting the game!");

    run_repl(&mut game)
}
