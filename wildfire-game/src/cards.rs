//! Card entities: drawn resource cards, character cards and action cards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Character, Location, Multiplier, Resource};
use crate::constants::{ACTION_POINT_PENALTY, BAD_DIRECTIONS_SETBACK};

/// A resource card popped from a location deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceCard {
    pub resource: Resource,
    pub points: i32,
    pub origin: Location,
}

impl ResourceCard {
    #[must_use]
    pub const fn new(resource: Resource, origin: Location) -> Self {
        Self {
            resource,
            points: resource.points(),
            origin,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.resource.name()
    }
}

impl fmt::Display for ResourceCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} pts)", self.resource, self.points)
    }
}

/// Secret character card dealt to a player at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterCard {
    pub character: Character,
    pub plus_resource: Resource,
    pub multiplier: Multiplier,
}

impl CharacterCard {
    #[must_use]
    pub const fn new(character: Character) -> Self {
        Self {
            character,
            plus_resource: character.plus_resource(),
            multiplier: character.multiplier(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.character.name()
    }
}

impl From<Character> for CharacterCard {
    fn from(character: Character) -> Self {
        Self::new(character)
    }
}

/// Hazard drawn when a player lands on an action square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCard {
    FlatTire,
    RoadBlock,
    HeavySmoke,
    Blackout,
    BadDirections,
    Dehydration,
    MedicalEmergency,
    FoodSpoilage,
    /// Only dealt when the rule set enables it.
    CarTrouble,
}

/// Penalty applied by an action card when it is not blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionEffect {
    SkipTurns(u8),
    OneSpaceOnly,
    Backtrack(u8),
    LosePoints(i32),
    DiscardResource,
}

impl ActionCard {
    /// The fixed eight-card action deck.
    pub const BASE_DECK: [Self; 8] = [
        Self::FlatTire,
        Self::RoadBlock,
        Self::HeavySmoke,
        Self::Blackout,
        Self::BadDirections,
        Self::Dehydration,
        Self::MedicalEmergency,
        Self::FoodSpoilage,
    ];

    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::FlatTire => 1,
            Self::RoadBlock => 2,
            Self::HeavySmoke => 3,
            Self::Blackout => 4,
            Self::BadDirections => 5,
            Self::Dehydration => 6,
            Self::MedicalEmergency => 7,
            Self::FoodSpoilage => 8,
            Self::CarTrouble => 9,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FlatTire => "Flat Tire",
            Self::RoadBlock => "Road Block",
            Self::HeavySmoke => "Heavy Smoke",
            Self::Blackout => "Blackout",
            Self::BadDirections => "Bad Directions",
            Self::Dehydration => "Dehydration",
            Self::MedicalEmergency => "Medical Emergency",
            Self::FoodSpoilage => "Food Spoilage",
            Self::CarTrouble => "Car Trouble",
        }
    }

    /// Penalty text as printed on the card.
    #[must_use]
    pub const fn penalty(self) -> &'static str {
        match self {
            Self::FlatTire | Self::HeavySmoke => "Skip next turn",
            Self::RoadBlock => "Move only 1 space next turn",
            Self::Blackout => "Lose next turn's die roll",
            Self::BadDirections => "Backtrack 4 spaces",
            Self::Dehydration | Self::FoodSpoilage => "Lose 5 points",
            Self::MedicalEmergency => "Skip 2 turns",
            Self::CarTrouble => "Discard 1 resource card",
        }
    }

    /// Resource that lets the holder ignore this card.
    #[must_use]
    pub const fn blocker(self) -> Option<Resource> {
        Some(match self {
            Self::FlatTire => Resource::SpareTire,
            Self::RoadBlock => Resource::ImportantDocuments,
            Self::HeavySmoke => Resource::N95Respirator,
            Self::Blackout => Resource::Flashlight,
            Self::BadDirections => Resource::HandCrankRadio,
            Self::Dehydration => Resource::WaterBottle,
            Self::MedicalEmergency => Resource::FirstAidKit,
            Self::FoodSpoilage => Resource::CannedFood,
            Self::CarTrouble => Resource::PowerBank,
        })
    }

    #[must_use]
    pub const fn effect(self) -> ActionEffect {
        match self {
            Self::FlatTire | Self::HeavySmoke | Self::Blackout => ActionEffect::SkipTurns(1),
            Self::MedicalEmergency => ActionEffect::SkipTurns(2),
            Self::RoadBlock => ActionEffect::OneSpaceOnly,
            Self::BadDirections => ActionEffect::Backtrack(BAD_DIRECTIONS_SETBACK),
            Self::Dehydration | Self::FoodSpoilage => {
                ActionEffect::LosePoints(ACTION_POINT_PENALTY)
            }
            Self::CarTrouble => ActionEffect::DiscardResource,
        }
    }
}

impl fmt::Display for ActionCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ActionCard {
    type Err = ();

    /// Parse a printed title. Unknown titles are rejected so callers can
    /// treat them as a no-op.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::BASE_DECK
            .into_iter()
            .chain(std::iter::once(Self::CarTrouble))
            .find(|card| card.title().eq_ignore_ascii_case(trimmed))
            .ok_or(())
    }
}
