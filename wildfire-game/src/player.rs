//! Player state as mutated by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::{CharacterCard, ResourceCard};
use crate::catalog::{Character, Resource};
use crate::constants::{NO_LOCATION, SAFE_ZONE_INDEX};
use crate::scoring::{ScoreBreakdown, score_hand};

/// Seat index of a player, fixed for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: PlayerId,
    pub name: String,
    pub character: CharacterCard,
    /// Held cards in draw order. Only the last card matters for discards.
    pub inventory: Vec<ResourceCard>,
    pub tokens: u32,
    pub position: u8,
    pub skipped_turns: u8,
    pub one_space_only: bool,
    pub reached_safe_zone: bool,
    pub bonus_points: i32,
    pub last_location: String,
}

impl Player {
    #[must_use]
    pub fn new(seat: PlayerId, name: impl Into<String>, character: Character) -> Self {
        Self {
            seat,
            name: name.into(),
            character: CharacterCard::new(character),
            inventory: Vec::new(),
            tokens: 0,
            position: 0,
            skipped_turns: 0,
            one_space_only: false,
            reached_safe_zone: false,
            bonus_points: 0,
            last_location: NO_LOCATION.to_string(),
        }
    }

    #[must_use]
    pub const fn character(&self) -> Character {
        self.character.character
    }

    pub fn add_card(&mut self, card: ResourceCard) {
        self.inventory.push(card);
    }

    #[must_use]
    pub fn has_card(&self, resource: Resource) -> bool {
        self.inventory.iter().any(|card| card.resource == resource)
    }

    #[must_use]
    pub fn count_of(&self, resource: Resource) -> usize {
        self.inventory
            .iter()
            .filter(|card| card.resource == resource)
            .count()
    }

    /// Remove the first held copy of `resource`.
    pub fn take_card(&mut self, resource: Resource) -> Option<ResourceCard> {
        let idx = self
            .inventory
            .iter()
            .position(|card| card.resource == resource)?;
        Some(self.inventory.remove(idx))
    }

    /// Pop the most recently gained card.
    pub fn discard_last(&mut self) -> Option<ResourceCard> {
        self.inventory.pop()
    }

    /// Move forward, clamped at the Safe Zone. Returns the new position.
    pub fn advance(&mut self, spaces: u8) -> u8 {
        self.position = self.position.saturating_add(spaces).min(SAFE_ZONE_INDEX);
        self.position
    }

    /// Move backward, floored at the start square.
    pub fn backtrack(&mut self, spaces: u8) -> u8 {
        self.position = self.position.saturating_sub(spaces);
        self.position
    }

    #[must_use]
    pub const fn at_safe_zone(&self) -> bool {
        self.position >= SAFE_ZONE_INDEX
    }

    #[must_use]
    pub fn score_breakdown(&self) -> ScoreBreakdown {
        score_hand(
            &self.inventory,
            self.tokens,
            self.character(),
            self.bonus_points,
        )
    }

    #[must_use]
    pub fn total_points(&self) -> i32 {
        self.score_breakdown().total()
    }

    /// Card names in inventory order.
    #[must_use]
    pub fn inventory_names(&self) -> Vec<String> {
        self.inventory
            .iter()
            .map(|card| card.name().to_string())
            .collect()
    }
}
