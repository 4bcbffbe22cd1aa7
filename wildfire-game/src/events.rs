//! Typed journal of everything the engine did.
//!
//! Display layers render these; tests assert on them. The engine never
//! prints.

use serde::{Deserialize, Serialize};

use crate::cards::ActionCard;
use crate::catalog::{Location, Resource};
use crate::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Preparation,
    Disaster,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeRejection {
    /// Proposer or partner has already reached the Safe Zone, has no cards,
    /// or is the same seat.
    IneligiblePartner,
    ProposerLacksCard,
    PartnerLacksCard,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum GameEvent {
    StartingCard {
        seat: PlayerId,
        resource: Resource,
        origin: Location,
    },
    TokenTaken {
        seat: PlayerId,
        tokens: u32,
    },
    CardDrawn {
        seat: PlayerId,
        location: Location,
        resource: Resource,
    },
    EmptyDeck {
        seat: PlayerId,
        location: Location,
    },
    InvalidChoice {
        seat: PlayerId,
        input: String,
    },
    EarlySpark {
        round: u8,
        roll: u8,
    },
    PhaseChanged {
        phase: PhaseKind,
    },
    SkippedTurn {
        seat: PlayerId,
        remaining: u8,
    },
    Moved {
        seat: PlayerId,
        roll: u8,
        token_spent: bool,
        from: u8,
        to: u8,
    },
    ShortcutGamble {
        seat: PlayerId,
        roll: u8,
        success: bool,
        position: u8,
    },
    ActionCardDrawn {
        seat: PlayerId,
        card: ActionCard,
    },
    BlockerUsed {
        seat: PlayerId,
        card: ActionCard,
        blocker: Resource,
    },
    PenaltyApplied {
        seat: PlayerId,
        card: ActionCard,
    },
    CardDiscarded {
        seat: PlayerId,
        resource: Resource,
    },
    ReachedSafeZone {
        seat: PlayerId,
        first: bool,
    },
    TradeCompleted {
        proposer: PlayerId,
        partner: PlayerId,
        gave: Resource,
        received: Resource,
    },
    TradeRejected {
        proposer: PlayerId,
        partner: PlayerId,
        reason: TradeRejection,
    },
    Aborted {
        disaster_rounds: u32,
    },
}

impl GameEvent {
    /// Seat the event is about, if any.
    #[must_use]
    pub const fn seat(&self) -> Option<PlayerId> {
        match self {
            Self::StartingCard { seat, .. }
            | Self::TokenTaken { seat, .. }
            | Self::CardDrawn { seat, .. }
            | Self::EmptyDeck { seat, .. }
            | Self::InvalidChoice { seat, .. }
            | Self::SkippedTurn { seat, .. }
            | Self::Moved { seat, .. }
            | Self::ShortcutGamble { seat, .. }
            | Self::ActionCardDrawn { seat, .. }
            | Self::BlockerUsed { seat, .. }
            | Self::PenaltyApplied { seat, .. }
            | Self::CardDiscarded { seat, .. }
            | Self::ReachedSafeZone { seat, .. } => Some(*seat),
            Self::TradeCompleted { proposer, .. } | Self::TradeRejected { proposer, .. } => {
                Some(*proposer)
            }
            Self::EarlySpark { .. } | Self::PhaseChanged { .. } | Self::Aborted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_a_tag() {
        let event = GameEvent::EarlySpark { round: 5, roll: 6 };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event"], "early_spark");
        assert_eq!(json["round"], 5);
        assert_eq!(event.seat(), None);
    }

    #[test]
    fn trade_events_belong_to_the_proposer() {
        let event = GameEvent::TradeRejected {
            proposer: PlayerId(2),
            partner: PlayerId(0),
            reason: TradeRejection::Declined,
        };
        assert_eq!(event.seat(), Some(PlayerId(2)));
    }
}
