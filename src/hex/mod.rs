//! Implementation of the Hex board, its rules and specifics.

pub mod board;
pub mod connectivity;
pub mod core;
pub mod game;
pub mod movegen;
