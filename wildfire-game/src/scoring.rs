//! Score evaluation, combo detection and final standings.

use serde::{Deserialize, Serialize};

use crate::cards::ResourceCard;
use crate::catalog::{COMBO_BONUSES, Character, ComboBonus, Multiplier, Resource};
use crate::constants::{COMMUNITY_LEADER_NT_BONUS, NT_BONUS, RESOURCE_POINTS};
use crate::player::{Player, PlayerId};

/// Every term that feeds a player's final score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub base: i32,
    pub plus_bonus: i32,
    pub multiplier_bonus: i32,
    pub token_points: i32,
    pub bonus_points: i32,
    pub combo_points: i32,
    pub combo: Option<&'static str>,
}

impl ScoreBreakdown {
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.base
            + self.plus_bonus
            + self.multiplier_bonus
            + self.token_points
            + self.bonus_points
            + self.combo_points
    }
}

#[must_use]
pub const fn token_value(character: Character) -> i32 {
    match character {
        Character::CommunityLeader => COMMUNITY_LEADER_NT_BONUS,
        _ => NT_BONUS,
    }
}

/// Highest-point combo whose required cards are all held.
#[must_use]
pub fn best_combo(cards: &[ResourceCard]) -> Option<&'static ComboBonus> {
    COMBO_BONUSES
        .iter()
        .filter(|combo| {
            combo
                .required
                .iter()
                .all(|needed| cards.iter().any(|card| card.resource == *needed))
        })
        .max_by_key(|combo| combo.points)
}

/// Score a hand. Pure in its inputs and independent of card order.
#[must_use]
pub fn score_hand(
    cards: &[ResourceCard],
    tokens: u32,
    character: Character,
    bonus_points: i32,
) -> ScoreBreakdown {
    let plus = character.plus_resource();
    let doubled: Option<Resource> = match character.multiplier() {
        Multiplier::Resource(resource) => Some(resource),
        Multiplier::NeighborlyToken => None,
    };

    let base = cards.iter().map(|card| card.points).sum();
    let plus_bonus = cards
        .iter()
        .filter(|card| card.resource == plus)
        .map(|_| RESOURCE_POINTS)
        .sum();
    let multiplier_bonus = doubled.map_or(0, |resource| {
        cards
            .iter()
            .filter(|card| card.resource == resource)
            .map(|card| card.points)
            .sum()
    });
    let token_points = i32::try_from(tokens)
        .unwrap_or(i32::MAX)
        .saturating_mul(token_value(character));
    let combo = best_combo(cards);

    ScoreBreakdown {
        base,
        plus_bonus,
        multiplier_bonus,
        token_points,
        bonus_points,
        combo_points: combo.map_or(0, |c| c.points),
        combo: combo.map(|c| c.name),
    }
}

/// Seats ordered by total score, highest first. Ties keep seat order.
#[must_use]
pub fn rank_players(players: &[Player]) -> Vec<(PlayerId, i32)> {
    let mut ranked: Vec<_> = players
        .iter()
        .map(|player| (player.seat, player.total_points()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "seats")]
pub enum Standing {
    Winner(PlayerId),
    /// Two or more players tied for the top score.
    SharedVictory(Vec<PlayerId>),
}

impl Standing {
    /// Derive the standing from an already ranked list. Empty input yields
    /// an empty shared victory.
    #[must_use]
    pub fn from_ranking(ranking: &[(PlayerId, i32)]) -> Self {
        let Some(&(_, top)) = ranking.first() else {
            return Self::SharedVictory(Vec::new());
        };
        let leaders: Vec<PlayerId> = ranking
            .iter()
            .take_while(|(_, score)| *score == top)
            .map(|(seat, _)| *seat)
            .collect();
        match leaders.as_slice() {
            [only] => Self::Winner(*only),
            _ => Self::SharedVictory(leaders),
        }
    }

    #[must_use]
    pub fn is_winner(&self, seat: PlayerId) -> bool {
        match self {
            Self::Winner(winner) => *winner == seat,
            Self::SharedVictory(seats) => seats.contains(&seat),
        }
    }

    #[must_use]
    pub fn seats(&self) -> &[PlayerId] {
        match self {
            Self::Winner(winner) => std::slice::from_ref(winner),
            Self::SharedVictory(seats) => seats,
        }
    }
}
