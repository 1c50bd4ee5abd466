//! Tengen: a Go board-state engine speaking the Go Text Protocol.
//!
//! The crate keeps stone groups and their liberties incrementally
//! up to date as moves are played, resolves captures, enforces the
//! suicide and simple-ko rules, and drives it all from a line-oriented
//! GTP command loop.
//!
//! ## Modules
//!
//! - [`constants`] - board-size bounds and protocol constants
//! - [`board`] - cell grid and coordinate arithmetic
//! - [`topology`] - precomputed adjacency, shared per board size
//! - [`groups`] - incremental group and liberty maintenance
//! - [`game`] - session state, capture resolution, move legality
//! - [`generator`] - move proposal strategies and the model boundary
//! - [`gtp`] - the protocol state machine
//! - [`error`] - engine error kinds
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tengen::board::Color;
//! use tengen::game::Game;
//! use tengen::topology::Topology;
//!
//! let topology = Arc::new(Topology::new(9));
//! let mut game = Game::new(Arc::clone(&topology), 7.5);
//!
//! let center = game.board().point(4, 4);
//! game.play(Color::Black, center).unwrap();
//! assert_eq!(game.liberties_at(center), Some(4));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod generator;
pub mod groups;
pub mod gtp;
pub mod topology;
