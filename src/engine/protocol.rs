//! Parsing of the line-oriented text protocol. Every line is turned into a
//! [`Command`] without looking at the engine state; semantic validation (board
//! notation, move legality, option values) happens when the command is
//! executed.

use crate::hex::core::Colour;

#[derive(Debug, PartialEq)]
pub(super) enum Command {
    Hex,
    IsReady,
    SetOption {
        option: EngineOption,
        value: String,
    },
    NewGame {
        size: Option<u8>,
    },
    SetPosition {
        board: Option<String>,
        moves: Vec<String>,
    },
    Go {
        colour: Option<Colour>,
        movetime: Option<u64>,
        depth: Option<u8>,
        iterations: Option<u32>,
    },
    Show,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(super) enum EngineOption {
    Engine,
    Depth,
    Iterations,
    MoveTime,
    Seed,
    Exploration,
    Policy,
}

fn parse_go(parts: &[&str]) -> Command {
    let mut colour = None;
    let mut movetime = None;
    let mut depth = None;
    let mut iterations = None;

    let mut i = 1;

    while i < parts.len() {
        match parts[i] {
            "colour" | "color" if i + 1 < parts.len() => {
                colour = Colour::try_from(parts[i + 1]).ok();
            },
            "movetime" if i + 1 < parts.len() => movetime = parts[i + 1].parse().ok(),
            "depth" if i + 1 < parts.len() => depth = parts[i + 1].parse().ok(),
            "iterations" if i + 1 < parts.len() => iterations = parts[i + 1].parse().ok(),
            _ => {},
        }
        i += 2;
    }

    Command::Go {
        colour,
        movetime,
        depth,
        iterations,
    }
}

fn parse_setoption(parts: &[&str]) -> Command {
    if parts.len() > 3 && parts[1] == "name" {
        let name_end = parts
            .iter()
            .position(|&x| x == "value")
            .unwrap_or(parts.len());
        let option = match parts[2..name_end].join(" ").as_str() {
            "Engine" => EngineOption::Engine,
            "Depth" => EngineOption::Depth,
            "Iterations" => EngineOption::Iterations,
            "MoveTime" => EngineOption::MoveTime,
            "Seed" => EngineOption::Seed,
            "Exploration" => EngineOption::Exploration,
            "Policy" => EngineOption::Policy,
            _ => return Command::Unknown(parts.join(" ")),
        };
        if name_end + 1 < parts.len() {
            Command::SetOption {
                option,
                value: parts[name_end + 1..].join(" "),
            }
        } else {
            Command::Unknown(parts.join(" "))
        }
    } else {
        Command::Unknown(parts.join(" "))
    }
}

fn parse_setposition(parts: &[&str]) -> Command {
    let board_index = parts.iter().position(|&x| x == "board");
    let moves_index = parts.iter().position(|&x| x == "moves");
    let board = board_index.map(|index| parts[index + 1..moves_index.unwrap_or(parts.len())].join(""));
    let moves = if let Some(moves_index) = moves_index {
        parts[moves_index + 1..]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    } else {
        vec![]
    };
    Command::SetPosition { board, moves }
}

fn parse_newgame(parts: &[&str]) -> Command {
    match parts.get(1) {
        None => Command::NewGame { size: None },
        Some(size) => match size.parse() {
            Ok(size) => Command::NewGame { size: Some(size) },
            Err(_) => Command::Unknown(parts.join(" ")),
        },
    }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            return Self::Unknown(input.to_string());
        }

        match parts[0] {
            "hex" => Self::Hex,
            "isready" => Self::IsReady,
            "setoption" => parse_setoption(&parts),
            "position" => parse_setposition(&parts),
            "newgame" => parse_newgame(&parts),
            "go" => parse_go(&parts),
            "d" => Self::Show,
            "quit" => Self::Quit,
            _ => Self::Unknown(input.trim().to_string()),
        }
    }
}
