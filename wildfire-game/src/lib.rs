//! Wildfire Evacuation Game Engine
//!
//! Platform-agnostic rules engine for the Wildfire Evacuation family board
//! game: a Preparation phase spent gathering supplies, then a Disaster phase
//! racing along the evacuation route to the Safe Zone. Callers drive the game
//! through [`DecisionMaker`] and read results from [`GameSnapshot`].

pub mod cards;
pub mod catalog;
pub mod constants;
pub mod decision;
pub mod deck;
pub mod engine;
pub mod error;
pub mod events;
pub mod numbers;
pub mod player;
pub mod rules;
pub mod scoring;
pub mod setup;
pub mod snapshot;

// Re-export commonly used types
pub use cards::{ActionCard, ActionEffect, CharacterCard, ResourceCard};
pub use catalog::{COMBO_BONUSES, Character, ComboBonus, Location, Multiplier, Resource};
pub use decision::{DecisionMaker, PrepChoice, PublicView, TradeProposal};
pub use deck::{ActionDeck, ActionDrawPolicy, LocationDecks};
pub use engine::{Phase, WildfireGame};
pub use error::{RuleSetError, SetupError};
pub use events::{GameEvent, PhaseKind, TradeRejection};
pub use player::{Player, PlayerId};
pub use rules::{MovementDie, RuleSet, SparkTiming};
pub use scoring::{ScoreBreakdown, Standing, best_combo, rank_players, score_hand};
pub use setup::GameSetup;
pub use snapshot::{GameSnapshot, PlayerSnapshot};
