//! The two-phase game state machine.
//!
//! A [`WildfireGame`] owns every piece of mutable state (players, decks, the
//! discard pile and its RNG) and asks a [`DecisionMaker`] whenever a player
//! has a choice to make. Preparation runs for a fixed number of rounds unless
//! the early spark cuts it short; Disaster runs until every player reaches the
//! Safe Zone or the round cap trips.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{ActionCard, ActionEffect, ResourceCard};
use crate::catalog::Location;
use crate::constants::{
    SAFE_ZONE_POINTS, SHORTCUT_FAIL_SKIPS, SHORTCUT_JUMP, SHORTCUT_SUCCESS_MIN, TOKEN_MOVE_BONUS,
    YARD, is_red_space, is_shortcut_space,
};
use crate::decision::{DecisionMaker, PrepChoice, PublicView, TradeProposal};
use crate::deck::{ActionDeck, LocationDecks};
use crate::error::SetupError;
use crate::events::{GameEvent, PhaseKind, TradeRejection};
use crate::player::{Player, PlayerId};
use crate::rules::{RuleSet, SparkTiming, roll_d6};
use crate::scoring::{Standing, rank_players};
use crate::setup::GameSetup;
use crate::snapshot::{GameSnapshot, PlayerSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Preparation { round: u8 },
    Disaster { round: u32 },
    Finished,
}

impl Phase {
    #[must_use]
    pub const fn kind(self) -> PhaseKind {
        match self {
            Self::Preparation { .. } => PhaseKind::Preparation,
            Self::Disaster { .. } => PhaseKind::Disaster,
            Self::Finished => PhaseKind::Finished,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WildfireGame {
    rules: RuleSet,
    rng: ChaCha20Rng,
    players: Vec<Player>,
    decks: LocationDecks,
    action_deck: ActionDeck,
    discards: Vec<ResourceCard>,
    phase: Phase,
    prep_round: u8,
    disaster_round: u32,
    early_spark_round: Option<u8>,
    first_arrival: Option<PlayerId>,
    aborted: bool,
    events: Vec<GameEvent>,
}

impl WildfireGame {
    /// Seat the roster, shuffle the decks and deal starting cards.
    ///
    /// # Errors
    ///
    /// Returns an error when the rule set is invalid or the roster fails
    /// validation.
    pub fn new(setup: &GameSetup, rules: RuleSet, mut rng: ChaCha20Rng) -> Result<Self, SetupError> {
        rules.validate()?;
        let players = setup.seat_players(&mut rng)?;
        let decks = LocationDecks::new_shuffled(&mut rng);
        let action_deck = ActionDeck::new(rules.action_draw, rules.car_trouble);

        let mut game = Self {
            rules,
            rng,
            players,
            decks,
            action_deck,
            discards: Vec::new(),
            phase: Phase::Preparation { round: 1 },
            prep_round: 1,
            disaster_round: 0,
            early_spark_round: None,
            first_arrival: None,
            aborted: false,
            events: Vec::new(),
        };
        game.deal_starting_resources();
        info!(
            "New game: {} players, {:?} movement, {:?} action draw",
            game.players.len(),
            game.rules.movement,
            game.rules.action_draw
        );
        Ok(game)
    }

    /// Convenience constructor seeding a `ChaCha20Rng`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn with_seed(setup: &GameSetup, rules: RuleSet, seed: u64) -> Result<Self, SetupError> {
        Self::new(setup, rules, ChaCha20Rng::seed_from_u64(seed))
    }

    fn deal_starting_resources(&mut self) {
        for idx in 0..self.players.len() {
            for _ in 0..self.rules.starting_resources {
                let Some(&location) = Location::ALL.choose(&mut self.rng) else {
                    continue;
                };
                if let Some(card) = self.decks.draw(location) {
                    let seat = self.players[idx].seat;
                    self.players[idx].add_card(card);
                    self.events.push(GameEvent::StartingCard {
                        seat,
                        resource: card.resource,
                        origin: location,
                    });
                }
            }
        }
    }

    /// Play one preparation round. No-op outside the Preparation phase.
    pub fn play_prep_round(&mut self, decider: &mut dyn DecisionMaker) {
        let Phase::Preparation { round } = self.phase else {
            return;
        };
        self.prep_round = round;
        debug!("Preparation round {round}");

        for idx in 0..self.players.len() {
            let choice = {
                let view = PublicView {
                    round,
                    players: &self.players,
                    decks: &self.decks,
                };
                decider.choose_prep_action(&self.players[idx], &view)
            };
            self.apply_prep_choice(idx, choice);

            if self.rules.early_spark == Some(SparkTiming::AfterEachTurn) && self.spark_hits(round) {
                self.enter_disaster();
                return;
            }
        }

        if self.rules.early_spark == Some(SparkTiming::EndOfRound) && self.spark_hits(round) {
            self.enter_disaster();
            return;
        }

        if round >= self.rules.prep_rounds {
            self.enter_disaster();
        } else {
            self.phase = Phase::Preparation { round: round + 1 };
        }
    }

    /// Play preparation rounds until the Disaster begins.
    pub fn run_preparation(&mut self, decider: &mut dyn DecisionMaker) {
        while matches!(self.phase, Phase::Preparation { .. }) {
            self.play_prep_round(decider);
        }
    }

    fn apply_prep_choice(&mut self, idx: usize, choice: PrepChoice) {
        let player = &mut self.players[idx];
        let seat = player.seat;
        match choice {
            PrepChoice::TakeToken => {
                player.tokens += 1;
                player.last_location = YARD.to_string();
                debug!("{} takes a token ({} held)", player.name, player.tokens);
                self.events.push(GameEvent::TokenTaken {
                    seat,
                    tokens: player.tokens,
                });
            }
            PrepChoice::Visit(location) => {
                player.last_location = location.name().to_string();
                match self.decks.draw(location) {
                    Some(card) => {
                        player.add_card(card);
                        debug!("{} found {} at {location}", player.name, card);
                        self.events.push(GameEvent::CardDrawn {
                            seat,
                            location,
                            resource: card.resource,
                        });
                    }
                    None => {
                        debug!("{} found {location} empty", player.name);
                        self.events.push(GameEvent::EmptyDeck { seat, location });
                    }
                }
            }
            PrepChoice::Unrecognized(input) => {
                warn!("{} made an unrecognized choice '{input}'", player.name);
                self.events.push(GameEvent::InvalidChoice { seat, input });
            }
        }
    }

    fn spark_hits(&mut self, round: u8) -> bool {
        if round < self.rules.spark_from_round {
            return false;
        }
        let roll = roll_d6(&mut self.rng);
        if roll < self.rules.spark_face {
            return false;
        }
        info!("Early spark in preparation round {round}");
        self.early_spark_round = Some(round);
        self.events.push(GameEvent::EarlySpark { round, roll });
        true
    }

    /// Move straight to the Disaster phase. Every player restarts at square 0.
    pub fn enter_disaster(&mut self) {
        if !matches!(self.phase, Phase::Preparation { .. }) {
            return;
        }
        for player in &mut self.players {
            player.position = 0;
        }
        self.first_arrival = None;
        self.phase = Phase::Disaster { round: 1 };
        info!("Disaster phase begins");
        self.events.push(GameEvent::PhaseChanged {
            phase: PhaseKind::Disaster,
        });
    }

    /// Play one disaster round, then the trading window. No-op outside the
    /// Disaster phase.
    pub fn play_disaster_round(&mut self, decider: &mut dyn DecisionMaker) {
        let Phase::Disaster { round } = self.phase else {
            return;
        };
        self.disaster_round = round;

        for idx in 0..self.players.len() {
            self.take_disaster_turn(idx, decider);
        }

        if self.all_safe() {
            self.finish();
            return;
        }
        if self.rules.trading {
            self.trading_phase(decider);
        }
        if round >= self.rules.max_disaster_rounds {
            warn!("Disaster phase aborted after {round} rounds");
            self.aborted = true;
            self.events.push(GameEvent::Aborted {
                disaster_rounds: round,
            });
            self.finish();
            return;
        }
        self.phase = Phase::Disaster { round: round + 1 };
    }

    fn take_disaster_turn(&mut self, idx: usize, decider: &mut dyn DecisionMaker) {
        let player = &mut self.players[idx];
        let seat = player.seat;
        if player.reached_safe_zone {
            return;
        }
        if player.skipped_turns > 0 {
            player.skipped_turns -= 1;
            debug!("{} sits out ({} left)", player.name, player.skipped_turns);
            self.events.push(GameEvent::SkippedTurn {
                seat,
                remaining: player.skipped_turns,
            });
            return;
        }

        let roll = if player.one_space_only {
            player.one_space_only = false;
            1
        } else {
            self.rules.movement.roll(&mut self.rng)
        };

        let token_spent =
            self.players[idx].tokens > 0 && decider.should_spend_token(&self.players[idx]);
        let player = &mut self.players[idx];
        let mut spaces = roll;
        if token_spent {
            player.tokens -= 1;
            spaces = spaces.saturating_add(TOKEN_MOVE_BONUS);
        }
        let from = player.position;
        let to = player.advance(spaces);
        debug!("{} moves {from} -> {to} (roll {roll})", player.name);
        self.events.push(GameEvent::Moved {
            seat,
            roll,
            token_spent,
            from,
            to,
        });

        if is_shortcut_space(to)
            && !self.players[idx].at_safe_zone()
            && decider.should_gamble_shortcut(&self.players[idx])
        {
            self.shortcut_gamble(idx);
        }

        let position = self.players[idx].position;
        if is_red_space(position) && !self.players[idx].at_safe_zone() {
            if let Some(card) = self.action_deck.draw(&mut self.rng) {
                self.resolve_action_card(seat, card, decider);
            }
        }

        if self.players[idx].at_safe_zone() && !self.players[idx].reached_safe_zone {
            self.arrive(idx);
        }
    }

    fn shortcut_gamble(&mut self, idx: usize) {
        let roll = roll_d6(&mut self.rng);
        let player = &mut self.players[idx];
        let success = roll >= SHORTCUT_SUCCESS_MIN;
        if success {
            player.advance(SHORTCUT_JUMP);
        } else {
            player.skipped_turns = SHORTCUT_FAIL_SKIPS;
        }
        debug!(
            "{} gambles on a shortcut: roll {roll}, {}",
            player.name,
            if success { "made it" } else { "stuck" }
        );
        self.events.push(GameEvent::ShortcutGamble {
            seat: player.seat,
            roll,
            success,
            position: player.position,
        });
    }

    /// Resolve a drawn action card against `seat`, offering the blocker
    /// first. Unknown seats are ignored.
    pub fn resolve_action_card(
        &mut self,
        seat: PlayerId,
        card: ActionCard,
        decider: &mut dyn DecisionMaker,
    ) {
        let Some(player) = self.players.get(seat.index()) else {
            return;
        };
        self.events.push(GameEvent::ActionCardDrawn { seat, card });

        if let Some(blocker) = card.blocker()
            && player.has_card(blocker)
            && decider.should_use_blocker(player, blocker)
        {
            debug!("{} blocks {card} with {blocker}", player.name);
            self.events.push(GameEvent::BlockerUsed {
                seat,
                card,
                blocker,
            });
            return;
        }
        self.apply_penalty(seat, card);
    }

    /// Apply an action card's penalty with no chance to block it.
    pub fn apply_penalty(&mut self, seat: PlayerId, card: ActionCard) {
        let Some(player) = self.players.get_mut(seat.index()) else {
            return;
        };
        match card.effect() {
            ActionEffect::SkipTurns(turns) => {
                player.skipped_turns = player.skipped_turns.saturating_add(turns);
            }
            ActionEffect::OneSpaceOnly => player.one_space_only = true,
            ActionEffect::Backtrack(spaces) => {
                player.backtrack(spaces);
            }
            ActionEffect::LosePoints(points) => player.bonus_points -= points,
            ActionEffect::DiscardResource => {
                if let Some(discarded) = player.discard_last() {
                    self.discards.push(discarded);
                    self.events.push(GameEvent::CardDiscarded {
                        seat,
                        resource: discarded.resource,
                    });
                }
            }
        }
        debug!("{} suffers {card}: {}", player.name, card.penalty());
        self.events.push(GameEvent::PenaltyApplied { seat, card });
    }

    fn arrive(&mut self, idx: usize) {
        let player = &mut self.players[idx];
        player.reached_safe_zone = true;
        let first = self.first_arrival.is_none();
        if first {
            self.first_arrival = Some(player.seat);
            player.bonus_points += SAFE_ZONE_POINTS;
        }
        info!(
            "{} reached the Safe Zone{}",
            player.name,
            if first { " first" } else { "" }
        );
        self.events.push(GameEvent::ReachedSafeZone {
            seat: player.seat,
            first,
        });
    }

    fn is_trader(player: &Player) -> bool {
        !player.reached_safe_zone && !player.inventory.is_empty()
    }

    fn trading_phase(&mut self, decider: &mut dyn DecisionMaker) {
        for idx in 0..self.players.len() {
            let proposer = &self.players[idx];
            if !Self::is_trader(proposer) {
                continue;
            }
            let partners: Vec<&Player> = self
                .players
                .iter()
                .filter(|p| p.seat != proposer.seat && Self::is_trader(p))
                .collect();
            if partners.is_empty() {
                continue;
            }
            let Some(proposal) = decider.propose_trade(proposer, &partners) else {
                continue;
            };
            let seat = proposer.seat;

            if let Err(reason) = self.validate_trade(seat, &proposal) {
                self.reject_trade(seat, proposal.partner, reason);
                continue;
            }
            let partner = &self.players[proposal.partner.index()];
            if !decider.accept_trade(partner, &self.players[idx], &proposal) {
                self.reject_trade(seat, proposal.partner, TradeRejection::Declined);
                continue;
            }
            if let Err(reason) = self.swap_cards(seat, proposal) {
                self.reject_trade(seat, proposal.partner, reason);
            }
        }
    }

    /// Check a proposal without moving any card.
    ///
    /// # Errors
    ///
    /// Returns why the trade cannot happen.
    pub fn validate_trade(
        &self,
        proposer: PlayerId,
        proposal: &TradeProposal,
    ) -> Result<(), TradeRejection> {
        if proposer == proposal.partner {
            return Err(TradeRejection::IneligiblePartner);
        }
        let (Some(from), Some(to)) = (
            self.players.get(proposer.index()),
            self.players.get(proposal.partner.index()),
        ) else {
            return Err(TradeRejection::IneligiblePartner);
        };
        if !Self::is_trader(from) || !Self::is_trader(to) {
            return Err(TradeRejection::IneligiblePartner);
        }
        if !from.has_card(proposal.give) {
            return Err(TradeRejection::ProposerLacksCard);
        }
        if !to.has_card(proposal.take) {
            return Err(TradeRejection::PartnerLacksCard);
        }
        Ok(())
    }

    /// Swap one card each way. A failed trade leaves both inventories
    /// untouched and is journaled as rejected.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason when the proposal is not valid.
    pub fn execute_trade(
        &mut self,
        proposer: PlayerId,
        proposal: TradeProposal,
    ) -> Result<(), TradeRejection> {
        let result = self
            .validate_trade(proposer, &proposal)
            .and_then(|()| self.swap_cards(proposer, proposal));
        if let Err(reason) = result {
            self.reject_trade(proposer, proposal.partner, reason);
        }
        result
    }

    /// Move one card each way. Callers validate first; a card that has gone
    /// missing since then leaves both inventories as they were.
    fn swap_cards(
        &mut self,
        proposer: PlayerId,
        proposal: TradeProposal,
    ) -> Result<(), TradeRejection> {
        let (p, q) = (proposer.index(), proposal.partner.index());
        let Some(given) = self.players[p].take_card(proposal.give) else {
            return Err(TradeRejection::ProposerLacksCard);
        };
        let Some(received) = self.players[q].take_card(proposal.take) else {
            self.players[p].add_card(given);
            return Err(TradeRejection::PartnerLacksCard);
        };
        self.players[q].add_card(given);
        self.players[p].add_card(received);
        debug!(
            "{} traded {} for {} with {}",
            self.players[p].name, given, received, self.players[q].name
        );
        self.events.push(GameEvent::TradeCompleted {
            proposer,
            partner: proposal.partner,
            gave: given.resource,
            received: received.resource,
        });
        Ok(())
    }

    fn reject_trade(&mut self, proposer: PlayerId, partner: PlayerId, reason: TradeRejection) {
        debug!("Trade from {proposer} to {partner} rejected: {reason:?}");
        self.events.push(GameEvent::TradeRejected {
            proposer,
            partner,
            reason,
        });
    }

    fn all_safe(&self) -> bool {
        self.players.iter().all(|p| p.reached_safe_zone)
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.events.push(GameEvent::PhaseChanged {
            phase: PhaseKind::Finished,
        });
        info!("Game finished after {} disaster rounds", self.disaster_round);
    }

    /// Drive both phases to completion and return the final snapshot.
    pub fn play_to_end(&mut self, decider: &mut dyn DecisionMaker) -> GameSnapshot {
        loop {
            match self.phase {
                Phase::Preparation { .. } => self.play_prep_round(decider),
                Phase::Disaster { .. } => self.play_disaster_round(decider),
                Phase::Finished => break,
            }
        }
        self.snapshot()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let ranking = rank_players(&self.players);
        GameSnapshot {
            phase: self.phase.kind(),
            prep_round: self.prep_round,
            disaster_round: self.disaster_round,
            early_spark_round: self.early_spark_round,
            players: self.players.iter().map(PlayerSnapshot::from).collect(),
            standing: Standing::from_ranking(&ranking),
            ranking,
            first_arrival: self.first_arrival,
            aborted: self.aborted,
        }
    }

    #[must_use]
    pub fn public_view(&self) -> PublicView<'_> {
        PublicView {
            round: self.prep_round,
            players: &self.players,
            decks: &self.decks,
        }
    }

    /// Cards from `location` still in its deck, held by players, or
    /// discarded. Always equals the deck's initial size.
    #[must_use]
    pub fn accounted_cards(&self, location: Location) -> usize {
        let held = self
            .players
            .iter()
            .flat_map(|p| &p.inventory)
            .filter(|card| card.origin == location)
            .count();
        let discarded = self
            .discards
            .iter()
            .filter(|card| card.origin == location)
            .count();
        self.decks.remaining(location) + held + discarded
    }

    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, seat: PlayerId) -> Option<&Player> {
        self.players.get(seat.index())
    }

    /// Apply a closure to one player's state. Returns `None` for an unknown
    /// seat.
    pub fn with_player_mut<R>(
        &mut self,
        seat: PlayerId,
        f: impl FnOnce(&mut Player) -> R,
    ) -> Option<R> {
        self.players.get_mut(seat.index()).map(f)
    }

    #[must_use]
    pub const fn decks(&self) -> &LocationDecks {
        &self.decks
    }

    #[must_use]
    pub const fn action_deck(&self) -> &ActionDeck {
        &self.action_deck
    }

    #[must_use]
    pub fn discards(&self) -> &[ResourceCard] {
        &self.discards
    }

    #[must_use]
    pub const fn first_arrival(&self) -> Option<PlayerId> {
        self.first_arrival
    }

    #[must_use]
    pub const fn aborted(&self) -> bool {
        self.aborted
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain the journal, leaving it empty.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
