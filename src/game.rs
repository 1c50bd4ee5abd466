//! Session state and move legality.
//!
//! A [`Game`] owns the board, the group tracker, the move history, and
//! the per-color capture counters for one session. Mutating entry
//! points validate through a simulate-then-commit pipeline: the
//! candidate move runs against a scratch copy of the board and tracker,
//! and only a fully legal result is swapped into the real state. A
//! rejected move leaves the session untouched.
//!
//! Legality checks run in order, first failure wins: bounds, occupancy,
//! suicide (after opponent captures resolve), then simple ko.

use std::sync::Arc;

use crate::board::{Board, Color, Point};
use crate::error::{GameError, GameResult};
use crate::groups::GroupTracker;
use crate::topology::Topology;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Play(Point),
    Pass,
    Resign,
}

#[derive(Clone, Debug)]
pub struct MoveRecord {
    pub color: Color,
    pub action: Action,
    /// Stones removed from the board by this move.
    pub captured: Vec<Point>,
}

/// Outcome of a legal simulated placement, ready to commit.
struct Simulated {
    board: Board,
    tracker: GroupTracker,
    captured: Vec<Point>,
}

pub struct Game {
    topology: Arc<Topology>,
    board: Board,
    tracker: GroupTracker,
    komi: f32,
    history: Vec<MoveRecord>,
    captures_black: usize,
    captures_white: usize,
    /// Position before the last move, compared against for simple ko.
    previous_board: Option<Board>,
    /// Set once a player resigns; the opponent wins.
    winner: Option<Color>,
}

impl Game {
    pub fn new(topology: Arc<Topology>, komi: f32) -> Self {
        let board = Board::new(topology.size());
        let tracker = GroupTracker::new(Arc::clone(&topology));
        Self {
            topology,
            board,
            tracker,
            komi,
            history: Vec::new(),
            captures_black: 0,
            captures_white: 0,
            previous_board: None,
            winner: None,
        }
    }

    /// Reset to an empty board of the same size. The shared topology is
    /// kept; komi is kept.
    pub fn clear(&mut self) {
        self.board = Board::new(self.topology.size());
        self.tracker = GroupTracker::new(Arc::clone(&self.topology));
        self.history.clear();
        self.captures_black = 0;
        self.captures_white = 0;
        self.previous_board = None;
        self.winner = None;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tracker(&self) -> &GroupTracker {
        &self.tracker
    }

    pub fn size(&self) -> usize {
        self.board.size
    }

    pub fn komi(&self) -> f32 {
        self.komi
    }

    pub fn set_komi(&mut self, komi: f32) {
        self.komi = komi;
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn captures(&self, color: Color) -> usize {
        match color {
            Color::Black => self.captures_black,
            Color::White => self.captures_white,
        }
    }

    /// Liberties of the group occupying `pt`, if any.
    pub fn liberties_at(&self, pt: Point) -> Option<usize> {
        self.tracker
            .group_at(pt)
            .map(|id| self.tracker.liberty_count(id))
    }

    /// Play a stone for `color` at `pt`.
    ///
    /// # Errors
    /// - [`GameError::OutOfBounds`] if `pt` is not on the board
    /// - [`GameError::Occupied`] if the point already holds a stone
    /// - [`GameError::Suicide`] if the group would end without liberties
    /// - [`GameError::KoViolation`] if the move retakes a ko
    pub fn play(&mut self, color: Color, pt: Point) -> GameResult<()> {
        let sim = self.simulate(color, pt)?;
        let prev = std::mem::replace(&mut self.board, sim.board);
        self.previous_board = Some(prev);
        self.tracker = sim.tracker;
        if !sim.captured.is_empty() {
            log::debug!("{:?} captures {} stone(s)", color, sim.captured.len());
            match color {
                Color::Black => self.captures_black += sim.captured.len(),
                Color::White => self.captures_white += sim.captured.len(),
            }
        }
        self.history.push(MoveRecord {
            color,
            action: Action::Play(pt),
            captured: sim.captured,
        });
        Ok(())
    }

    /// Record a pass. The board does not change.
    pub fn pass(&mut self, color: Color) {
        self.previous_board = Some(self.board.clone());
        self.history.push(MoveRecord {
            color,
            action: Action::Pass,
            captured: Vec::new(),
        });
    }

    /// Record a resignation in favor of the opponent. The board does
    /// not change and later commands are still accepted.
    pub fn resign(&mut self, color: Color) {
        log::info!("{color:?} resigns");
        self.winner = Some(color.opponent());
        self.history.push(MoveRecord {
            color,
            action: Action::Resign,
            captured: Vec::new(),
        });
    }

    pub fn is_legal(&self, color: Color, pt: Point) -> bool {
        self.simulate(color, pt).is_ok()
    }

    /// All points where `color` may legally play right now.
    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.board
            .empty_points()
            .filter(|&pt| self.simulate(color, pt).is_ok())
            .collect()
    }

    /// Run the full legality pipeline on a scratch copy of the state.
    fn simulate(&self, color: Color, pt: Point) -> GameResult<Simulated> {
        if pt >= self.board.area() {
            return Err(GameError::OutOfBounds);
        }
        if self.board.get(pt).is_some() {
            return Err(GameError::Occupied);
        }

        let mut board = self.board.clone();
        let mut tracker = self.tracker.clone();
        board.set(pt, color);
        let (group, starved) = tracker.place(&board, color, pt);

        let mut captured = Vec::new();
        for id in starved {
            captured.extend(tracker.remove_group(&mut board, id));
        }

        // Captures resolve first: a move that captures enough to free a
        // liberty for its own group is legal.
        if tracker.liberty_count(group) == 0 {
            return Err(GameError::Suicide);
        }
        if self.retakes_ko(pt, &captured, &board) {
            return Err(GameError::KoViolation);
        }
        Ok(Simulated {
            board,
            tracker,
            captured,
        })
    }

    /// Simple ko: the previous move captured exactly one stone, this
    /// move captures exactly one stone at the previously played point
    /// while sitting on the previously captured point, and the result
    /// repeats the position of two moves prior.
    fn retakes_ko(&self, pt: Point, captured: &[Point], result: &Board) -> bool {
        if captured.len() != 1 {
            return false;
        }
        let Some(last) = self.history.last() else {
            return false;
        };
        let Action::Play(last_pt) = last.action else {
            return false;
        };
        if last.captured.len() != 1 || last.captured[0] != pt || captured[0] != last_pt {
            return false;
        }
        match &self.previous_board {
            Some(prev) => result == prev,
            None => false,
        }
    }
}
