//! The decision interface the engine calls at every choice point.
//!
//! A driver (a terminal prompt, a scripted policy, a test double) implements
//! [`DecisionMaker`]. The engine never trusts the answers blindly: invalid
//! preparation choices are journaled and consume the turn, and trade
//! proposals are validated before any card moves.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{Location, Resource};
use crate::deck::LocationDecks;
use crate::player::{Player, PlayerId};

/// Action picked for a preparation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepChoice {
    TakeToken,
    Visit(Location),
    /// Raw input that named nothing the engine understands.
    Unrecognized(String),
}

impl PrepChoice {
    /// Parse menu input: `0` takes a token, `1`-`5` pick a location in menu
    /// order, and a location name is accepted as-is.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return match index {
                0 => Self::TakeToken,
                n => Location::ALL
                    .get(n - 1)
                    .map_or_else(|| Self::Unrecognized(trimmed.to_string()), |l| Self::Visit(*l)),
            };
        }
        if trimmed.eq_ignore_ascii_case("token") || trimmed.eq_ignore_ascii_case("yard") {
            return Self::TakeToken;
        }
        trimmed
            .parse::<Location>()
            .map_or_else(|()| Self::Unrecognized(trimmed.to_string()), Self::Visit)
    }
}

impl fmt::Display for PrepChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TakeToken => f.write_str("take a Neighborly Token"),
            Self::Visit(location) => write!(f, "visit {location}"),
            Self::Unrecognized(raw) => write!(f, "unrecognized choice '{raw}'"),
        }
    }
}

/// A 1-for-1 card swap offered to another player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProposal {
    pub partner: PlayerId,
    /// Card the proposer hands over.
    pub give: Resource,
    /// Card the proposer wants back.
    pub take: Resource,
}

/// Read-only state handed to preparation decisions.
#[derive(Debug, Clone, Copy)]
pub struct PublicView<'a> {
    pub round: u8,
    pub players: &'a [Player],
    pub decks: &'a LocationDecks,
}

pub trait DecisionMaker {
    fn choose_prep_action(&mut self, player: &Player, view: &PublicView<'_>) -> PrepChoice;

    fn should_spend_token(&mut self, player: &Player) -> bool;

    fn should_gamble_shortcut(&mut self, player: &Player) -> bool;

    fn should_use_blocker(&mut self, player: &Player, blocker: Resource) -> bool;

    /// Offer a swap to one of `partners`, all of whom are still on the path
    /// and hold at least one card.
    fn propose_trade(&mut self, _player: &Player, _partners: &[&Player]) -> Option<TradeProposal> {
        None
    }

    /// Whether `partner` agrees to `proposal` made by `proposer`.
    fn accept_trade(
        &mut self,
        _partner: &Player,
        _proposer: &Player,
        _proposal: &TradeProposal,
    ) -> bool {
        true
    }
}
