//! Static card data: locations and their decks, resources, characters,
//! action cards and combo bonuses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A location players can visit during the Preparation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Home,
    GroceryStore,
    Pharmacy,
    GasStation,
    ElectronicsStore,
}

impl Location {
    /// Locations in menu order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::GroceryStore,
        Self::Pharmacy,
        Self::GasStation,
        Self::ElectronicsStore,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::GroceryStore => "Grocery Store",
            Self::Pharmacy => "Pharmacy",
            Self::GasStation => "Gas Station",
            Self::ElectronicsStore => "Electronics Store",
        }
    }

    /// Stable key used for action tallies (`Visit_<key>`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::GroceryStore => "grocery_store",
            Self::Pharmacy => "pharmacy",
            Self::GasStation => "gas_station",
            Self::ElectronicsStore => "electronics_store",
        }
    }

    /// Deck composition as `(resource, copies)`.
    #[must_use]
    pub const fn deck_template(self) -> &'static [(Resource, usize)] {
        match self {
            Self::Home => &[
                (Resource::EmergencyBlanket, 3),
                (Resource::ImportantDocuments, 3),
                (Resource::ExtraClothes, 3),
            ],
            Self::GroceryStore => &[
                (Resource::WaterBottle, 3),
                (Resource::ExtraCash, 2),
                (Resource::CannedFood, 3),
            ],
            Self::Pharmacy => &[
                (Resource::N95Respirator, 2),
                (Resource::FirstAidKit, 3),
                (Resource::MonthOfMedication, 3),
            ],
            Self::GasStation => &[
                (Resource::GasCanister, 3),
                (Resource::Flashlight, 2),
                (Resource::SpareTire, 1),
            ],
            Self::ElectronicsStore => &[
                (Resource::Batteries, 3),
                (Resource::HandCrankRadio, 1),
                (Resource::PowerBank, 2),
            ],
        }
    }

    /// Total cards in a freshly built deck for this location.
    #[must_use]
    pub fn deck_size(self) -> usize {
        self.deck_template().iter().map(|(_, copies)| copies).sum()
    }

    /// Whether the location's full deck contains the given resource.
    #[must_use]
    pub fn stocks(self, resource: Resource) -> bool {
        self.deck_template().iter().any(|(r, _)| *r == resource)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Location {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|loc| loc.name().eq_ignore_ascii_case(trimmed) || loc.key() == trimmed)
            .ok_or(())
    }
}

/// Every distinct resource card name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    EmergencyBlanket,
    ImportantDocuments,
    ExtraClothes,
    WaterBottle,
    ExtraCash,
    CannedFood,
    N95Respirator,
    FirstAidKit,
    MonthOfMedication,
    GasCanister,
    Flashlight,
    SpareTire,
    Batteries,
    HandCrankRadio,
    PowerBank,
}

impl Resource {
    pub const ALL: [Self; 15] = [
        Self::EmergencyBlanket,
        Self::ImportantDocuments,
        Self::ExtraClothes,
        Self::WaterBottle,
        Self::ExtraCash,
        Self::CannedFood,
        Self::N95Respirator,
        Self::FirstAidKit,
        Self::MonthOfMedication,
        Self::GasCanister,
        Self::Flashlight,
        Self::SpareTire,
        Self::Batteries,
        Self::HandCrankRadio,
        Self::PowerBank,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EmergencyBlanket => "Emergency Blanket",
            Self::ImportantDocuments => "Important Documents",
            Self::ExtraClothes => "Extra Clothes",
            Self::WaterBottle => "Water Bottle",
            Self::ExtraCash => "Extra Cash",
            Self::CannedFood => "Canned Food",
            Self::N95Respirator => "N95 Respirator",
            Self::FirstAidKit => "First Aid Kit",
            Self::MonthOfMedication => "1 Month of Medication",
            Self::GasCanister => "Gas Canister",
            Self::Flashlight => "Flashlight",
            Self::SpareTire => "Spare Tire",
            Self::Batteries => "Batteries",
            Self::HandCrankRadio => "Hand Crank Radio",
            Self::PowerBank => "Power Bank",
        }
    }

    /// Printed point value of the card.
    #[must_use]
    pub const fn points(self) -> i32 {
        match self {
            Self::EmergencyBlanket
            | Self::ExtraClothes
            | Self::WaterBottle
            | Self::FirstAidKit
            | Self::GasCanister
            | Self::PowerBank => 1,
            Self::ImportantDocuments
            | Self::ExtraCash
            | Self::N95Respirator
            | Self::Flashlight
            | Self::Batteries => 2,
            Self::CannedFood
            | Self::MonthOfMedication
            | Self::SpareTire
            | Self::HandCrankRadio => 3,
        }
    }

    /// The location whose deck supplies this resource.
    #[must_use]
    pub fn origin(self) -> Location {
        Location::ALL
            .into_iter()
            .find(|loc| loc.stocks(self))
            .unwrap_or(Location::Home)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(trimmed))
            .ok_or(())
    }
}

/// The five secret character profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Character {
    Elderly,
    Student,
    Parent,
    PetOwner,
    CommunityLeader,
}

impl Character {
    pub const ALL: [Self; 5] = [
        Self::Elderly,
        Self::Student,
        Self::Parent,
        Self::PetOwner,
        Self::CommunityLeader,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Elderly => "Elderly",
            Self::Student => "Student",
            Self::Parent => "Parent",
            Self::PetOwner => "Pet Owner",
            Self::CommunityLeader => "Community Leader",
        }
    }

    /// Resource worth an extra `RESOURCE_POINTS` per copy.
    #[must_use]
    pub const fn plus_resource(self) -> Resource {
        match self {
            Self::Elderly => Resource::N95Respirator,
            Self::Student => Resource::WaterBottle,
            Self::Parent => Resource::ExtraClothes,
            Self::PetOwner => Resource::EmergencyBlanket,
            Self::CommunityLeader => Resource::HandCrankRadio,
        }
    }

    /// What this character scores double.
    #[must_use]
    pub const fn multiplier(self) -> Multiplier {
        match self {
            Self::Elderly => Multiplier::Resource(Resource::FirstAidKit),
            Self::Student => Multiplier::Resource(Resource::Batteries),
            Self::Parent => Multiplier::Resource(Resource::ExtraCash),
            Self::PetOwner => Multiplier::Resource(Resource::CannedFood),
            Self::CommunityLeader => Multiplier::NeighborlyToken,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Character {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or(())
    }
}

/// Double-scoring target of a character card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplier {
    Resource(Resource),
    /// Tokens are worth more instead of a resource scoring twice.
    NeighborlyToken,
}

impl Multiplier {
    #[must_use]
    pub const fn resource(self) -> Option<Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            Self::NeighborlyToken => None,
        }
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(resource) => f.write_str(resource.name()),
            Self::NeighborlyToken => f.write_str(crate::constants::NEIGHBORLY_TOKEN),
        }
    }
}

/// Combo bonus awarded when a player's inventory covers `required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboBonus {
    pub name: &'static str,
    pub required: &'static [Resource],
    pub points: i32,
    pub description: &'static str,
}

pub const COMBO_BONUSES: [ComboBonus; 2] = [
    ComboBonus {
        name: "Portable Go-Kit Bonus",
        required: &[
            Resource::WaterBottle,
            Resource::FirstAidKit,
            Resource::CannedFood,
        ],
        points: 3,
        description: "A portable Go-Kit: enough to carry you through 3 days away from home. Source: Red Cross",
    },
    ComboBonus {
        name: "Prepper Kit Bonus",
        required: &[
            Resource::WaterBottle,
            Resource::FirstAidKit,
            Resource::CannedFood,
            Resource::ImportantDocuments,
            Resource::MonthOfMedication,
        ],
        points: 6,
        description: "A portable Go-Kit plus a month of medication and important documents ready to go. Source: Red Cross",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_sizes_match_printed_cards() {
        let sizes: Vec<_> = Location::ALL.iter().map(|loc| loc.deck_size()).collect();
        assert_eq!(sizes, vec![9, 8, 8, 6, 6]);
    }

    #[test]
    fn every_resource_has_exactly_one_origin() {
        for resource in Resource::ALL {
            let homes = Location::ALL
                .iter()
                .filter(|loc| loc.stocks(resource))
                .count();
            assert_eq!(homes, 1, "{resource} stocked in {homes} locations");
        }
        assert_eq!(Resource::SpareTire.origin(), Location::GasStation);
        assert_eq!(Resource::MonthOfMedication.origin(), Location::Pharmacy);
    }

    #[test]
    fn names_parse_back_case_insensitively() {
        assert_eq!("grocery store".parse(), Ok(Location::GroceryStore));
        assert_eq!("gas_station".parse(), Ok(Location::GasStation));
        assert_eq!(" N95 respirator ".parse(), Ok(Resource::N95Respirator));
        assert_eq!("pet owner".parse(), Ok(Character::PetOwner));
        assert!("Mall".parse::<Location>().is_err());
        assert!("Neighborly Token".parse::<Resource>().is_err());
    }

    #[test]
    fn only_the_community_leader_doubles_tokens() {
        let token_chars: Vec<_> = Character::ALL
            .into_iter()
            .filter(|c| c.multiplier() == Multiplier::NeighborlyToken)
            .collect();
        assert_eq!(token_chars, vec![Character::CommunityLeader]);
        assert_eq!(Multiplier::NeighborlyToken.to_string(), "Neighborly Token");
    }

    #[test]
    fn prepper_kit_contains_go_kit() {
        let [go_kit, prepper] = COMBO_BONUSES;
        assert!(go_kit.required.iter().all(|r| prepper.required.contains(r)));
        assert!(prepper.points > go_kit.points);
    }
}
