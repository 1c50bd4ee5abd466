//! Tengen: a Go board-state engine speaking GTP.
//!
//! ## Usage
//!
//! - `tengen gtp` - run the GTP loop on stdin/stdout
//! - `tengen gtp --seed 42` - same, with reproducible move generation
//! - `tengen demo` - play a short scripted sequence and print the board

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tengen::board::Color;
use tengen::constants::DEFAULT_KOMI;
use tengen::game::Game;
use tengen::generator::{MoveGenerator, Proposal, RandomLegal};
use tengen::gtp::{format_vertex, GtpEngine};
use tengen::topology::Topology;

/// Tengen: a Go board-state engine speaking GTP
#[derive(Parser)]
#[command(name = "tengen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the GTP command loop for use with controllers and GUIs
    Gtp {
        /// Seed for the random move generator
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play a short scripted demo
    Demo,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp { seed }) => {
            let mut engine = match seed {
                Some(seed) => GtpEngine::with_seed(seed),
                None => GtpEngine::new(),
            };
            engine.run()?;
        }
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Tengen: Go board-state engine\n");

    let topology = Arc::new(Topology::new(9));
    let mut game = Game::new(Arc::clone(&topology), DEFAULT_KOMI);

    // A corner capture: White's stone runs out of liberties.
    let moves = [
        (Color::White, 0, 0),
        (Color::Black, 1, 0),
        (Color::Black, 0, 1),
    ];
    for (color, x, y) in moves {
        let pt = game.board().point(x, y);
        game.play(color, pt)?;
    }

    println!("{}", game.board());
    println!("Black captures: {}", game.captures(Color::Black));

    let mut generator = RandomLegal::with_seed(1);
    match generator.propose(&game, Color::White) {
        Proposal::Vertex(pt) => {
            let vertex = format_vertex(game.board().x(pt), game.board().y(pt));
            println!("Suggested reply for White: {vertex}");
        }
        Proposal::Pass => println!("Suggested reply for White: pass"),
    }
    Ok(())
}
