//! Error types for the engine.
//!
//! Every variant is recovered at the protocol boundary and turned into
//! a GTP failure response; none of them mutate session state.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Malformed line, unknown command, or bad argument
    #[error("syntax error: {0}")]
    Parse(String),

    /// Coordinate outside the board
    #[error("vertex out of bounds")]
    OutOfBounds,

    /// Point is not empty
    #[error("illegal move: point not empty")]
    Occupied,

    /// Move would leave its own group without liberties after captures
    #[error("illegal move: suicide")]
    Suicide,

    /// Move retakes a ko
    #[error("illegal move: retakes ko")]
    KoViolation,

    /// Move generator proposed a vertex that fails validation
    #[error("generator proposed an illegal vertex")]
    IllegalProposal,
}

pub type GameResult<T> = Result<T, GameError>;
