//! Roster validation and character dealing.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::Character;
use crate::constants::{MAX_PLAYERS, MIN_PLAYERS};
use crate::error::SetupError;
use crate::player::{Player, PlayerId};

/// Seat list for a new game.
///
/// Names are trimmed; blank names become `Player{n}` (1-based). Characters
/// are dealt from a shuffled stack unless fixed with
/// [`GameSetup::with_characters`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    names: Vec<String>,
    characters: Option<Vec<Character>>,
}

impl GameSetup {
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            characters: None,
        }
    }

    /// `count` seats with default names.
    #[must_use]
    pub fn anonymous(count: usize) -> Self {
        Self::new(std::iter::repeat_n(String::new(), count))
    }

    /// Pin characters by seat instead of dealing them.
    #[must_use]
    pub fn with_characters(mut self, characters: Vec<Character>) -> Self {
        self.characters = Some(characters);
        self
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.names.len()
    }

    /// Resolved names, with blanks replaced.
    ///
    /// # Errors
    ///
    /// Fails on an empty roster, a count outside the allowed range, or two
    /// seats resolving to the same name.
    pub fn resolved_names(&self) -> Result<Vec<String>, SetupError> {
        let count = self.names.len();
        if count == 0 {
            return Err(SetupError::NoPlayers);
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(SetupError::InvalidPlayerCount { count });
        }

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(count);
        for (idx, raw) in self.names.iter().enumerate() {
            let trimmed = raw.trim();
            let name = if trimmed.is_empty() {
                format!("Player{}", idx + 1)
            } else {
                trimmed.to_string()
            };
            if !seen.insert(name.to_lowercase()) {
                return Err(SetupError::DuplicatePlayerName { name });
            }
            resolved.push(name);
        }
        Ok(resolved)
    }

    /// Validate the roster and create seated players.
    ///
    /// # Errors
    ///
    /// Returns any roster error from [`Self::resolved_names`], plus
    /// character errors when characters were pinned.
    pub fn seat_players<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Player>, SetupError> {
        let names = self.resolved_names()?;
        let characters = match &self.characters {
            Some(fixed) => validate_fixed(fixed, names.len())?,
            None => deal_characters(names.len(), rng)?,
        };

        Ok(names
            .into_iter()
            .zip(characters)
            .enumerate()
            .map(|(seat, (name, character))| {
                let seat = u8::try_from(seat).unwrap_or(u8::MAX);
                Player::new(PlayerId(seat), name, character)
            })
            .collect())
    }
}

/// Shuffle the profile stack and pop one per player.
///
/// # Errors
///
/// Returns [`SetupError::TooManyCharacters`] when more profiles are needed
/// than exist.
pub fn deal_characters<R: Rng + ?Sized>(
    count: usize,
    rng: &mut R,
) -> Result<Vec<Character>, SetupError> {
    if count > Character::ALL.len() {
        return Err(SetupError::TooManyCharacters {
            requested: count,
            available: Character::ALL.len(),
        });
    }
    let mut stack = Character::ALL.to_vec();
    stack.shuffle(rng);
    Ok((0..count).filter_map(|_| stack.pop()).collect())
}

fn validate_fixed(fixed: &[Character], seats: usize) -> Result<Vec<Character>, SetupError> {
    if fixed.len() < seats {
        return Err(SetupError::MissingCharacters {
            seats,
            given: fixed.len(),
        });
    }
    let mut seen = HashSet::new();
    for character in &fixed[..seats] {
        if !seen.insert(*character) {
            return Err(SetupError::DuplicateCharacter {
                name: character.name(),
            });
        }
    }
    Ok(fixed[..seats].to_vec())
}
