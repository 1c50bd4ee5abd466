//! Board-size bounds and protocol constants.

/// Default board size (standard full-size game).
pub const DEFAULT_SIZE: usize = 19;

/// Smallest accepted board size. A 1x1 board has no legal first move
/// under the suicide rule, so 2 is the floor.
pub const MIN_SIZE: usize = 2;

/// Largest accepted board size, bounded by the coordinate alphabet.
pub const MAX_SIZE: usize = 25;

/// Default komi.
pub const DEFAULT_KOMI: f32 = 7.5;

/// GTP column letters in order. 'I' is skipped to avoid confusion
/// with 'J'; the 25 letters cover every supported board size.
pub const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";
