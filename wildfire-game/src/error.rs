//! Errors raised before a game can start.

use thiserror::Error;

use crate::constants::{MAX_PLAYERS, MIN_PLAYERS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error(
        "need between {min} and {max} players, got {count}",
        min = MIN_PLAYERS,
        max = MAX_PLAYERS
    )]
    InvalidPlayerCount { count: usize },
    #[error("no players were seated")]
    NoPlayers,
    #[error("player name '{name}' is already taken")]
    DuplicatePlayerName { name: String },
    #[error("{requested} characters requested but only {available} profiles exist")]
    TooManyCharacters { requested: usize, available: usize },
    #[error("{seats} seats need pinned characters but only {given} were given")]
    MissingCharacters { seats: usize, given: usize },
    #[error("character '{name}' was assigned to more than one player")]
    DuplicateCharacter { name: &'static str },
    #[error(transparent)]
    InvalidRules(#[from] RuleSetError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("prep_rounds must be at least 1")]
    NoPrepRounds,
    #[error("spark_from_round {spark_from_round} is beyond prep_rounds {prep_rounds}")]
    SparkAfterPrep {
        spark_from_round: u8,
        prep_rounds: u8,
    },
    #[error("max_disaster_rounds must be at least 1")]
    NoDisasterRounds,
}
