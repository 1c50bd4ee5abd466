//! Move proposal strategies.
//!
//! A [`MoveGenerator`] proposes a vertex (or a pass) for the color to
//! move. Proposals are advisory: the protocol layer re-validates every
//! vertex before committing it, whatever the strategy.
//!
//! [`RandomLegal`] is the built-in fallback, choosing uniformly among
//! the points that pass full validation - occupancy, suicide, and ko,
//! not merely unoccupied cells. [`PolicyBacked`] is the seam for an
//! external learned model: it feeds the model a feature-plane encoding
//! of the board and turns the returned score distribution into a
//! proposal.

use crate::board::{Color, Point};
use crate::game::Game;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Proposal {
    Vertex(Point),
    Pass,
}

pub trait MoveGenerator {
    fn propose(&mut self, game: &Game, color: Color) -> Proposal;
}

/// Uniform choice among the currently legal points.
pub struct RandomLegal {
    rng: fastrand::Rng,
}

impl RandomLegal {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Seeded variant; identical seeds reproduce identical move
    /// sequences from identical positions.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomLegal {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator for RandomLegal {
    fn propose(&mut self, game: &Game, color: Color) -> Proposal {
        let legal = game.legal_moves(color);
        if legal.is_empty() {
            Proposal::Pass
        } else {
            Proposal::Vertex(legal[self.rng.usize(..legal.len())])
        }
    }
}

/// Feature planes fed to a policy model: own stones, opponent stones,
/// empty points.
pub const FEATURE_PLANES: usize = 3;

/// One-hot planes for the position from `to_move`'s perspective,
/// laid out plane-major: `planes[plane * area + point]`.
pub fn encode_features(game: &Game, to_move: Color) -> Vec<f32> {
    let area = game.board().area();
    let mut planes = vec![0.0; FEATURE_PLANES * area];
    for pt in 0..area {
        let plane = match game.board().get(pt) {
            Some(c) if c == to_move => 0,
            Some(_) => 1,
            None => 2,
        };
        planes[plane * area + pt] = 1.0;
    }
    planes
}

/// Scores returned by a policy model: one per point, plus a pass score.
pub struct PolicyOutput {
    pub point_scores: Vec<f32>,
    pub pass_score: f32,
}

/// The external-model contract. Implementations receive the encoded
/// feature planes and the board size and return a score distribution.
pub trait PolicyModel {
    fn evaluate(&mut self, features: &[f32], size: usize) -> PolicyOutput;
}

/// Proposes the best-scoring point from an external policy model.
pub struct PolicyBacked<M> {
    model: M,
}

impl<M> PolicyBacked<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}

impl<M: PolicyModel> MoveGenerator for PolicyBacked<M> {
    fn propose(&mut self, game: &Game, color: Color) -> Proposal {
        let features = encode_features(game, color);
        let output = self.model.evaluate(&features, game.size());

        // Occupied points are skipped here as a cheap pre-filter; the
        // protocol layer still runs the full validation.
        let mut best: Option<(Point, f32)> = None;
        for (pt, &score) in output.point_scores.iter().enumerate() {
            if game.board().get(pt).is_some() {
                continue;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((pt, score));
            }
        }
        match best {
            Some((pt, score)) if score >= output.pass_score => Proposal::Vertex(pt),
            _ => Proposal::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::topology::Topology;

    fn game(size: usize) -> Game {
        Game::new(Arc::new(Topology::new(size)), 7.5)
    }

    #[test]
    fn random_legal_proposes_a_legal_point() {
        let mut g = game(5);
        g.play(Color::Black, g.board().point(2, 2)).expect("legal move");
        let mut generator = RandomLegal::with_seed(42);
        for _ in 0..20 {
            match generator.propose(&g, Color::White) {
                Proposal::Vertex(pt) => assert!(g.is_legal(Color::White, pt)),
                Proposal::Pass => panic!("open board must yield a vertex"),
            }
        }
    }

    #[test]
    fn random_legal_is_reproducible() {
        let g = game(9);
        let mut a = RandomLegal::with_seed(7);
        let mut b = RandomLegal::with_seed(7);
        for _ in 0..5 {
            assert_eq!(a.propose(&g, Color::Black), b.propose(&g, Color::Black));
        }
    }

    #[test]
    fn random_legal_passes_with_no_legal_point() {
        let mut g = game(3);
        // Black owns the full ring; the center would be suicide for Black.
        for &(x, y) in &[(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)] {
            g.play(Color::Black, g.board().point(x, y)).expect("legal move");
        }
        let mut generator = RandomLegal::with_seed(1);
        assert_eq!(generator.propose(&g, Color::Black), Proposal::Pass);
    }

    #[test]
    fn feature_planes_are_one_hot() {
        let mut g = game(3);
        g.play(Color::Black, g.board().point(0, 0)).expect("legal move");
        g.play(Color::White, g.board().point(1, 1)).expect("legal move");
        let planes = encode_features(&g, Color::White);
        let area = 9;
        assert_eq!(planes.len(), FEATURE_PLANES * area);
        // (1,1) is "own" from White's perspective, (0,0) is "opponent".
        assert_eq!(planes[g.board().point(1, 1)], 1.0);
        assert_eq!(planes[area + g.board().point(0, 0)], 1.0);
        for pt in 0..area {
            let sum: f32 = (0..FEATURE_PLANES).map(|p| planes[p * area + pt]).sum();
            assert_eq!(sum, 1.0);
        }
    }

    struct FixedPolicy {
        favorite: Point,
    }

    impl PolicyModel for FixedPolicy {
        fn evaluate(&mut self, features: &[f32], size: usize) -> PolicyOutput {
            assert_eq!(features.len(), FEATURE_PLANES * size * size);
            let mut point_scores = vec![0.0; size * size];
            point_scores[self.favorite] = 1.0;
            PolicyOutput {
                point_scores,
                pass_score: 0.5,
            }
        }
    }

    #[test]
    fn policy_backed_follows_the_model() {
        let g = game(5);
        let favorite = g.board().point(3, 1);
        let mut generator = PolicyBacked::new(FixedPolicy { favorite });
        assert_eq!(generator.propose(&g, Color::Black), Proposal::Vertex(favorite));
    }

    #[test]
    fn policy_backed_passes_when_pass_outscores_points() {
        let mut g = game(5);
        let favorite = g.board().point(3, 1);
        // Occupying the favorite drops every remaining score below pass.
        g.play(Color::White, favorite).expect("legal move");
        let mut generator = PolicyBacked::new(FixedPolicy { favorite });
        assert_eq!(generator.propose(&g, Color::Black), Proposal::Pass);
    }
}
