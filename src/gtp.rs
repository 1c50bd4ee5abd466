//! Go Text Protocol (GTP) front end.
//!
//! One command per input line; every command is answered, including
//! failures: `= payload` on success, `? message` on failure, each
//! terminated by a blank line. An optional numeric command id is
//! echoed back. The engine stays in the `Active` state until `quit`.
//!
//! ## Supported commands
//!
//! - `protocol_version` / `name` / `version` - static info
//! - `list_commands` / `known_command <cmd>` - introspection
//! - `boardsize <n>` - new session with an n x n board (2..=25)
//! - `clear_board` - new session, same size
//! - `komi <value>` - store komi
//! - `play <color> <vertex>` - vertex, `pass`, or `resign`
//! - `genmove <color>` - propose, validate, commit, answer the vertex
//! - `showboard` - ASCII board dump
//! - `quit` - flush and stop reading

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::board::{Color, Point};
use crate::constants::{COLUMN_LETTERS, DEFAULT_KOMI, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
use crate::error::{GameError, GameResult};
use crate::game::Game;
use crate::generator::{MoveGenerator, Proposal, RandomLegal};
use crate::topology::Topology;

/// The list of known GTP commands.
pub const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineState {
    Active,
    Terminated,
}

/// GTP engine state: one session plus the move-generation strategy.
pub struct GtpEngine {
    topology: Arc<Topology>,
    game: Game,
    komi: f32,
    generator: Box<dyn MoveGenerator>,
    fallback: RandomLegal,
    state: EngineState,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GtpEngine {
    /// Engine with the built-in random-legal generator.
    pub fn new() -> Self {
        Self::with_generator(Box::new(RandomLegal::new()))
    }

    /// Engine with a seeded random-legal generator, for reproducible
    /// move sequences.
    pub fn with_seed(seed: u64) -> Self {
        let mut engine = Self::with_generator(Box::new(RandomLegal::with_seed(seed)));
        engine.fallback = RandomLegal::with_seed(seed);
        engine
    }

    /// Engine with a custom move-generation strategy. The strategy is
    /// advisory; every proposal is validated before it is committed.
    pub fn with_generator(generator: Box<dyn MoveGenerator>) -> Self {
        let topology = Arc::new(Topology::new(DEFAULT_SIZE));
        let game = Game::new(Arc::clone(&topology), DEFAULT_KOMI);
        Self {
            topology,
            game,
            komi: DEFAULT_KOMI,
            generator,
            fallback: RandomLegal::new(),
            state: EngineState::Active,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin/stdout until `quit` or EOF.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.serve(stdin.lock(), &mut stdout)
    }

    /// Run the command loop on arbitrary streams.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            log::debug!("<<< {line}");

            let (id, command_line) = parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((&command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (ok, message) = self.execute(&command, args);
            let prefix = if ok { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            log::debug!(">>> {prefix}{id_str} {message}");
            if message.is_empty() {
                write!(output, "{prefix}{id_str}\n\n")?;
            } else {
                write!(output, "{prefix}{id_str} {message}\n\n")?;
            }
            output.flush()?;

            if self.state == EngineState::Terminated {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command; `(true, payload)` on success, `(false,
    /// message)` on failure. Errors never leave session state changed.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match self.dispatch(command, args) {
            Ok(payload) => (true, payload),
            Err(err) => (false, err.to_string()),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> GameResult<String> {
        match command {
            "name" => {
                arity(args, 0)?;
                Ok("tengen".to_string())
            }
            "version" => {
                arity(args, 0)?;
                Ok(env!("CARGO_PKG_VERSION").to_string())
            }
            "protocol_version" => {
                arity(args, 0)?;
                Ok("2".to_string())
            }
            "list_commands" => {
                arity(args, 0)?;
                Ok(KNOWN_COMMANDS.join("\n"))
            }
            "known_command" => {
                arity(args, 1)?;
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                Ok(if known { "true" } else { "false" }.to_string())
            }
            "quit" => {
                arity(args, 0)?;
                self.state = EngineState::Terminated;
                Ok(String::new())
            }
            "boardsize" => {
                arity(args, 1)?;
                let size: usize = args[0]
                    .parse()
                    .map_err(|_| GameError::Parse(format!("invalid size: {}", args[0])))?;
                if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
                    return Err(GameError::Parse(format!(
                        "unacceptable size, supported range is {MIN_SIZE}..{MAX_SIZE}"
                    )));
                }
                self.topology = Arc::new(Topology::new(size));
                self.game = Game::new(Arc::clone(&self.topology), self.komi);
                Ok(String::new())
            }
            "clear_board" => {
                arity(args, 0)?;
                self.game.clear();
                Ok(String::new())
            }
            "komi" => {
                arity(args, 1)?;
                let komi: f32 = args[0]
                    .parse()
                    .map_err(|_| GameError::Parse(format!("invalid komi: {}", args[0])))?;
                self.komi = komi;
                self.game.set_komi(komi);
                Ok(String::new())
            }
            "play" => {
                arity(args, 2)?;
                self.cmd_play(args[0], args[1])
            }
            "genmove" => {
                arity(args, 1)?;
                let color = parse_color(args[0])?;
                Ok(self.generate(color))
            }
            "showboard" => {
                arity(args, 0)?;
                Ok(self.game.board().to_string().trim_end().to_string())
            }
            _ => Err(GameError::Parse(format!("unknown command: {command}"))),
        }
    }

    fn cmd_play(&mut self, color_arg: &str, vertex_arg: &str) -> GameResult<String> {
        let color = parse_color(color_arg)?;
        match parse_move(vertex_arg, self.game.size())? {
            MoveArg::Pass => self.game.pass(color),
            MoveArg::Resign => self.game.resign(color),
            MoveArg::Vertex(x, y) => {
                let pt = self.game.board().point(x, y);
                self.game.play(color, pt)?;
            }
        }
        Ok(String::new())
    }

    /// Generate, validate, and commit a move for `color`; the answer is
    /// the vertex played, or `pass`.
    fn generate(&mut self, color: Color) -> String {
        let proposal = self.generator.propose(&self.game, color);
        let pt = match self.validate_proposal(color, proposal) {
            Ok(pt) => pt,
            Err(err) => {
                log::debug!("falling back to a random legal move: {err}");
                self.random_fallback(color)
            }
        };
        let Some(pt) = pt else {
            self.game.pass(color);
            return "pass".to_string();
        };
        if self.game.play(color, pt).is_err() {
            self.game.pass(color);
            return "pass".to_string();
        }
        format_vertex(self.game.board().x(pt), self.game.board().y(pt))
    }

    fn validate_proposal(&self, color: Color, proposal: Proposal) -> GameResult<Option<Point>> {
        match proposal {
            Proposal::Vertex(pt) if self.game.is_legal(color, pt) => Ok(Some(pt)),
            Proposal::Vertex(_) => Err(GameError::IllegalProposal),
            Proposal::Pass => Ok(None),
        }
    }

    fn random_fallback(&mut self, color: Color) -> Option<Point> {
        match self.fallback.propose(&self.game, color) {
            Proposal::Vertex(pt) => Some(pt),
            Proposal::Pass => None,
        }
    }
}

/// Exact argument count; anything else is a parse error.
fn arity(args: &[&str], expected: usize) -> GameResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(GameError::Parse(format!(
            "expected {expected} argument(s), got {}",
            args.len()
        )))
    }
}

/// Parse an optional numeric command id from the beginning of the line.
fn parse_id(line: &str) -> (Option<u32>, &str) {
    let trimmed = line.trim();
    let mut chars = trimmed.char_indices();

    if let Some((_, c)) = chars.next() {
        if c.is_ascii_digit() {
            let end = chars
                .find(|(_, c)| !c.is_ascii_digit())
                .map(|(i, _)| i)
                .unwrap_or(trimmed.len());

            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
    }

    (None, trimmed)
}

enum MoveArg {
    Vertex(usize, usize),
    Pass,
    Resign,
}

fn parse_move(s: &str, size: usize) -> GameResult<MoveArg> {
    if s.eq_ignore_ascii_case("pass") {
        return Ok(MoveArg::Pass);
    }
    if s.eq_ignore_ascii_case("resign") {
        return Ok(MoveArg::Resign);
    }
    let (x, y) = parse_vertex(s, size)?;
    Ok(MoveArg::Vertex(x, y))
}

/// Parse a vertex like `D4` into 0-indexed `(column, row)`.
///
/// Column letters skip `I`; rows are 1-based from the bottom edge.
pub fn parse_vertex(s: &str, size: usize) -> GameResult<(usize, usize)> {
    if !s.is_ascii() || s.len() < 2 {
        return Err(GameError::Parse(format!("invalid vertex: {s}")));
    }
    let letter = s.as_bytes()[0].to_ascii_uppercase();
    let col = COLUMN_LETTERS
        .iter()
        .position(|&c| c == letter)
        .ok_or_else(|| GameError::Parse(format!("invalid vertex: {s}")))?;
    let row: usize = s[1..]
        .parse()
        .map_err(|_| GameError::Parse(format!("invalid vertex: {s}")))?;
    if col >= size || row == 0 || row > size {
        return Err(GameError::OutOfBounds);
    }
    Ok((col, row - 1))
}

/// Format 0-indexed `(column, row)` as a vertex like `D4`.
pub fn format_vertex(x: usize, y: usize) -> String {
    format!("{}{}", COLUMN_LETTERS[x] as char, y + 1)
}

/// Map a color argument by its first character, case-insensitive.
pub fn parse_color(s: &str) -> GameResult<Color> {
    match s.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('b') => Ok(Color::Black),
        Some('w') => Ok(Color::White),
        _ => Err(GameError::Parse(format!("invalid color: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_with_id() {
        let (id, cmd) = parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn parse_id_without_id() {
        let (id, cmd) = parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn vertex_roundtrip_skips_i() {
        assert_eq!(parse_vertex("A1", 19).expect("valid"), (0, 0));
        assert_eq!(parse_vertex("H8", 19).expect("valid"), (7, 7));
        // J is the 9th column because I is skipped
        assert_eq!(parse_vertex("J1", 19).expect("valid"), (8, 0));
        assert_eq!(parse_vertex("t19", 19).expect("valid"), (18, 18));
        assert_eq!(format_vertex(8, 0), "J1");
        for x in 0..19 {
            for y in 0..19 {
                let v = format_vertex(x, y);
                assert_eq!(parse_vertex(&v, 19).expect("roundtrip"), (x, y));
            }
        }
    }

    #[test]
    fn vertex_errors() {
        assert_eq!(parse_vertex("T1", 9), Err(GameError::OutOfBounds));
        assert_eq!(parse_vertex("A0", 9), Err(GameError::OutOfBounds));
        assert_eq!(parse_vertex("A10", 9), Err(GameError::OutOfBounds));
        assert!(matches!(parse_vertex("I5", 19), Err(GameError::Parse(_))));
        assert!(matches!(parse_vertex("4D", 19), Err(GameError::Parse(_))));
        assert!(matches!(parse_vertex("D", 19), Err(GameError::Parse(_))));
    }

    #[test]
    fn color_codes() {
        assert_eq!(parse_color("b").expect("valid"), Color::Black);
        assert_eq!(parse_color("BLACK").expect("valid"), Color::Black);
        assert_eq!(parse_color("White").expect("valid"), Color::White);
        assert!(parse_color("green").is_err());
    }

    #[test]
    fn static_info_commands() {
        let mut engine = GtpEngine::new();
        assert_eq!(engine.execute("name", &[]), (true, "tengen".to_string()));
        assert_eq!(engine.execute("protocol_version", &[]), (true, "2".to_string()));
        let (ok, commands) = engine.execute("list_commands", &[]);
        assert!(ok);
        assert_eq!(commands.lines().count(), KNOWN_COMMANDS.len());
    }

    #[test]
    fn known_command_membership() {
        let mut engine = GtpEngine::new();
        assert_eq!(engine.execute("known_command", &["play"]), (true, "true".to_string()));
        assert_eq!(
            engine.execute("known_command", &["tsumego"]),
            (true, "false".to_string())
        );
    }

    #[test]
    fn strict_argument_counts() {
        let mut engine = GtpEngine::new();
        assert!(!engine.execute("name", &["x"]).0);
        assert!(!engine.execute("play", &["black"]).0);
        assert!(!engine.execute("play", &["black", "D4", "extra"]).0);
        assert!(!engine.execute("boardsize", &[]).0);
        // none of the failures touched the board
        assert_eq!(engine.game().board().stone_count(), 0);
    }

    #[test]
    fn boardsize_bounds() {
        let mut engine = GtpEngine::new();
        assert!(engine.execute("boardsize", &["9"]).0);
        assert_eq!(engine.game().size(), 9);
        assert!(!engine.execute("boardsize", &["1"]).0);
        assert!(!engine.execute("boardsize", &["26"]).0);
        assert!(!engine.execute("boardsize", &["nineteen"]).0);
        // failed changes keep the last accepted size
        assert_eq!(engine.game().size(), 9);
    }

    #[test]
    fn play_and_illegal_play() {
        let mut engine = GtpEngine::new();
        assert!(engine.execute("play", &["black", "D4"]).0);
        let (ok, message) = engine.execute("play", &["white", "D4"]);
        assert!(!ok);
        assert!(message.contains("not empty"));
        // unknown commands fail but answer
        let (ok, message) = engine.execute("tsumego", &[]);
        assert!(!ok);
        assert!(message.contains("unknown command"));
    }

    #[test]
    fn play_pass_and_resign() {
        let mut engine = GtpEngine::new();
        assert!(engine.execute("play", &["black", "pass"]).0);
        assert!(engine.execute("play", &["white", "resign"]).0);
        assert_eq!(engine.game().winner(), Some(Color::Black));
        assert_eq!(engine.game().board().stone_count(), 0);
    }

    #[test]
    fn genmove_answers_a_legal_vertex() {
        let mut engine = GtpEngine::with_seed(11);
        let (ok, vertex) = engine.execute("genmove", &["b"]);
        assert!(ok);
        let (x, y) = parse_vertex(&vertex, engine.game().size()).expect("legal vertex");
        let pt = engine.game().board().point(x, y);
        assert_eq!(engine.game().board().get(pt), Some(Color::Black));
    }

    #[test]
    fn genmove_passes_on_a_dead_board() {
        let mut engine = GtpEngine::with_seed(3);
        assert!(engine.execute("boardsize", &["3"]).0);
        for vertex in ["A1", "B1", "C1", "A2", "C2", "A3", "B3", "C3"] {
            assert!(engine.execute("play", &["black", vertex]).0);
        }
        assert_eq!(engine.execute("genmove", &["black"]), (true, "pass".to_string()));
    }

    #[test]
    fn quit_terminates() {
        let mut engine = GtpEngine::new();
        assert!(engine.execute("quit", &[]).0);
        assert_eq!(engine.state(), EngineState::Terminated);
    }

    #[test]
    fn serve_frames_every_response() {
        let mut engine = GtpEngine::new();
        let input = b"name\nbogus\n7 protocol_version\nquit\nname\n" as &[u8];
        let mut output = Vec::new();
        engine.serve(input, &mut output).expect("serve");
        let text = String::from_utf8(output).expect("utf8");
        assert_eq!(
            text,
            "= tengen\n\n? syntax error: unknown command: bogus\n\n=7 2\n\n=\n\n"
        );
    }
}
