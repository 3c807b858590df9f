//! The engine puts all pieces together: it keeps the game record, configures
//! the agent and talks to the client (a tournament runner, GUI or a human at
//! the terminal) over a line-oriented text protocol in the spirit of the
//! [Universal Chess Interface].
//!
//! [`Engine::protocol_loop`] is the "main loop" of the engine which
//! communicates with the environment and executes commands from the input
//! stream.
//!
//! [Universal Chess Interface]: https://www.chessprogramming.org/UCI

use std::io::{BufRead, Write};
use std::time::Duration;

use itertools::Itertools;
use tracing::{debug, info};

use crate::agent::{Agent, AgentConfig, EngineKind};
use crate::engine::protocol::{Command, EngineOption};
use crate::hex::board::Board;
use crate::hex::core::{Colour, Move, BOARD_WIDTH, MAX_BOARD_WIDTH};
use crate::hex::game::Game;
use crate::search::{Limits, SearchError, SelectionPolicy};

mod protocol;

/// The Engine connects everything together and handles commands sent by the
/// client, including I/O.
pub struct Engine<'a, R: BufRead, W: Write> {
    game: Game,
    config: AgentConfig,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine with an empty standard board and
    /// provided I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self::with_config(AgentConfig::default(), input, output)
    }

    /// Same as [`Engine::new`] with a custom agent configuration.
    #[must_use]
    pub fn with_config(config: AgentConfig, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game: Game::new(BOARD_WIDTH),
            config,
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes the commands until
    /// `quit` is sent or the input is closed.
    ///
    /// Malformed or unsupported commands are reported as `info string` lines
    /// and skipped, they never stop the loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the output fails.
    pub fn protocol_loop(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let command = Command::parse(&line);
            debug!(?command, "received");
            let result = match command {
                Command::Hex => self.handle_hex(),
                Command::IsReady => self.handle_isready(),
                Command::SetOption { option, value } => self.handle_setoption(option, &value),
                Command::NewGame { size } => self.handle_newgame(size),
                Command::SetPosition { board, moves } => {
                    self.handle_position(board.as_deref(), &moves)
                },
                Command::Go {
                    colour,
                    movetime,
                    depth,
                    iterations,
                } => self.handle_go(colour, movetime, depth, iterations),
                Command::Show => self.handle_show(),
                Command::Quit => break,
                Command::Unknown(command) if command.trim().is_empty() => Ok(()),
                Command::Unknown(command) => {
                    writeln!(self.output, "info string Unsupported command: {command}")?;
                    Ok(())
                },
            };
            if let Err(e) = result {
                writeln!(self.output, "info string {e:#}")?;
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Responds to the `hex` handshake command by identifying the engine and
    /// listing the supported options.
    fn handle_hex(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(
            self.output,
            "option name Engine type combo default {} var mcts var minimax",
            self.config.engine
        )?;
        writeln!(
            self.output,
            "option name Depth type spin default {} min 1 max 8",
            self.config.minimax.depth
        )?;
        writeln!(
            self.output,
            "option name MoveTime type spin default {} min 0",
            self.config.mcts.movetime.as_millis()
        )?;
        writeln!(self.output, "option name Iterations type string default none")?;
        writeln!(
            self.output,
            "option name Exploration type string default {}",
            self.config.mcts.exploration
        )?;
        writeln!(
            self.output,
            "option name Policy type combo default {} var max var robust var max-robust var secure",
            self.config.mcts.policy
        )?;
        writeln!(self.output, "option name Seed type string default none")?;
        writeln!(self.output, "hexok")?;
        Ok(())
    }

    /// Syncs with the client by responding with `readyok`.
    fn handle_isready(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "readyok")?;
        Ok(())
    }

    /// Changes the agent configuration used by the following searches.
    fn handle_setoption(&mut self, option: EngineOption, value: &str) -> anyhow::Result<()> {
        match option {
            EngineOption::Engine => self.config.engine = EngineKind::try_from(value)?,
            EngineOption::Depth => {
                let depth: u8 = value.parse()?;
                anyhow::ensure!(depth > 0, "depth should be positive");
                self.config.minimax.depth = depth;
            },
            EngineOption::Iterations => {
                self.config.limits.iterations = match value {
                    "none" => None,
                    _ => Some(value.parse::<u32>()?),
                };
            },
            EngineOption::MoveTime => {
                self.config.mcts.movetime = Duration::from_millis(value.parse()?);
            },
            EngineOption::Seed => {
                self.config.seed = match value {
                    "none" => None,
                    _ => Some(value.parse::<u64>()?),
                };
            },
            EngineOption::Exploration => {
                let exploration: f64 = value.parse()?;
                anyhow::ensure!(
                    exploration.is_finite() && exploration >= 0.0,
                    "exploration should be a non-negative number, got {value}"
                );
                self.config.mcts.exploration = exploration;
            },
            EngineOption::Policy => self.config.mcts.policy = SelectionPolicy::try_from(value)?,
        }
        info!(?option, value, "option set");
        Ok(())
    }

    /// Starts a new game on an empty board, keeping the board size unless a
    /// new one is given.
    fn handle_newgame(&mut self, size: Option<u8>) -> anyhow::Result<()> {
        let size = size.unwrap_or_else(|| self.game.board().size());
        anyhow::ensure!(
            (1..=MAX_BOARD_WIDTH).contains(&size),
            "board size should be within 1..={MAX_BOARD_WIDTH}, got {size}"
        );
        self.game = Game::new(size);
        Ok(())
    }

    /// Sets up the game the search will start from: either an empty board of
    /// the current size or the given one, followed by the moves.
    ///
    /// The game is left untouched if the board or any of the moves is
    /// invalid.
    fn handle_position(&mut self, board: Option<&str>, moves: &[String]) -> anyhow::Result<()> {
        let mut game = match board {
            Some(rows) => Game::from_board(Board::from_rows(rows)?)?,
            None => Game::new(self.game.board().size()),
        };
        for next_move in moves {
            game.make_move(Move::try_from(next_move.as_str())?)?;
        }
        self.game = game;
        Ok(())
    }

    /// Runs the search for the side to move (or the requested colour) and
    /// reports the chosen move.
    fn handle_go(
        &mut self,
        colour: Option<Colour>,
        movetime: Option<u64>,
        depth: Option<u8>,
        iterations: Option<u32>,
    ) -> anyhow::Result<()> {
        if let Some(winner) = self.game.winner() {
            writeln!(self.output, "info string The game is over, {winner} has won")?;
            writeln!(self.output, "bestmove none")?;
            return Ok(());
        }
        let config = AgentConfig {
            limits: Limits {
                time: movetime.map(Duration::from_millis).or(self.config.limits.time),
                depth: depth.or(self.config.limits.depth),
                iterations: iterations.or(self.config.limits.iterations),
            },
            ..self.config.clone()
        };
        let colour = colour.unwrap_or_else(|| self.game.to_move());
        let mut agent = Agent::new(colour, &config);
        match agent.make_move(self.game.turn(), self.game.board(), self.game.last_move()) {
            Ok(best_move) => {
                if let Some(stats) = agent.last_stats() {
                    writeln!(self.output, "info {stats}")?;
                }
                writeln!(self.output, "bestmove {best_move}")?;
            },
            Err(SearchError::NoLegalMoves) => writeln!(self.output, "bestmove none")?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Prints the board together with the game state.
    fn handle_show(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "{}", self.game.board())?;
        writeln!(self.output, "board {}", self.game.board().rows())?;
        writeln!(
            self.output,
            "turn {} to move {}{}",
            self.game.turn(),
            self.game.to_move(),
            if self.game.swapped() { " (swapped)" } else { "" }
        )?;
        if !self.game.history().is_empty() {
            writeln!(self.output, "moves {}", self.game.history().iter().join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run(input: &str) -> String {
        let mut input = Cursor::new(input.as_bytes());
        let mut output = Vec::new();
        Engine::new(&mut input, &mut output).protocol_loop().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn handshake() {
        let output = run("hex\nisready\n");
        assert!(output.starts_with("id name hexen"));
        assert!(output.contains("option name Engine"));
        assert!(output.contains("hexok\nreadyok\n"));
    }

    #[test]
    fn quit_stops_the_loop() {
        assert_eq!(run("quit\nisready\n"), "");
    }

    #[test]
    fn unsupported_commands() {
        let output = run("\nuci\nsetoption name Hash value 1\nisready\n");
        assert!(output.contains("info string Unsupported command: uci\n"));
        assert!(output.ends_with("readyok\n"));
    }

    #[test]
    fn go_plays_legal_move() {
        let output = run("setoption name Seed value 1\nnewgame 5\n\
                          position moves 2,2 0,1\ngo iterations 100\n");
        let best = output
            .lines()
            .find_map(|line| line.strip_prefix("bestmove "))
            .unwrap();
        let cell = crate::hex::core::Cell::try_from(best).unwrap();
        assert!(cell.x() < 5 && cell.y() < 5);
        assert_ne!(best, "2,2");
        assert_ne!(best, "0,1");
        assert!(output.contains("info nodes"));
    }

    #[test]
    fn minimax_takes_the_win() {
        let output = run("setoption name Engine value minimax\n\
                          position board R..../R..../.BBBB/R..../R....\n\
                          go depth 2\n");
        assert!(output.contains("score win"));
        assert!(output.ends_with("bestmove 2,0\n"));
    }

    #[test]
    fn finished_and_full_boards() {
        assert!(run("position board RB/R.\ngo\n").ends_with("bestmove none\n"));
        assert!(run("position board RB/BR\ngo\n").ends_with("bestmove none\n"));
    }

    #[test]
    fn invalid_input_keeps_the_game() {
        let output = run("newgame 3\nposition moves 1,1\n\
                          position moves 0,0 0,0\nposition board RR/..\n\
                          setoption name Depth value 0\nnewgame 30\nd\n");
        assert!(output.contains("info string 0,0 is already occupied"));
        assert!(output.contains("info string expected Red"));
        assert!(output.contains("info string depth should be positive"));
        assert!(output.contains("info string board size should be within"));
        assert!(output.contains("board .../.R./..."));
        assert!(output.contains("turn 2 to move blue"));
    }

    #[test]
    fn swap_on_second_turn() {
        let output = run("newgame 5\nposition moves 2,2 swap\nd\n");
        assert!(output.contains("turn 3 to move blue (swapped)"));
        assert!(output.contains("moves 2,2 swap"));
        let output = run("position moves 2,2 1,1 swap\n");
        assert!(output.contains("info string swap is only allowed once on turn 2"));
    }
}
