use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use wildfire_game::{
    COMBO_BONUSES, Location, Player, PrepChoice, PublicView, Resource, TradeProposal,
};

/// Policy interface for automated play. One instance drives one seat.
pub trait Policy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    fn choose_prep_action(&mut self, player: &Player, view: &PublicView<'_>) -> PrepChoice;

    fn spend_token(&mut self, player: &Player) -> bool;

    fn gamble_shortcut(&mut self, player: &Player) -> bool;

    fn use_blocker(&mut self, player: &Player, blocker: Resource) -> bool;

    fn propose_trade(&mut self, _player: &Player, _partners: &[&Player]) -> Option<TradeProposal> {
        None
    }

    fn accept_trade(&mut self, _player: &Player, _proposal: &TradeProposal) -> bool {
        true
    }
}

/// Probability knobs for [`RandomPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolicyKnobs {
    pub token_prob: f64,
    pub spend_token_prob: f64,
    pub shortcut_prob: f64,
    pub use_blocker_prob: f64,
    pub trade_prob: f64,
}

impl PolicyKnobs {
    /// Mix used by the per-action balance driver.
    pub const BALANCE: Self = Self {
        token_prob: 0.25,
        spend_token_prob: 0.5,
        shortcut_prob: 0.5,
        use_blocker_prob: 0.8,
        trade_prob: 0.3,
    };

    /// Baseline opponents in the strategy comparison.
    pub const STRATEGY: Self = Self {
        token_prob: 0.2,
        ..Self::BALANCE
    };
}

impl Default for PolicyKnobs {
    fn default() -> Self {
        Self::BALANCE
    }
}

fn chance(rng: &mut ChaCha20Rng, probability: f64) -> bool {
    rng.gen_bool(probability.clamp(0.0, 1.0))
}

/// Coin-flip play driven by [`PolicyKnobs`].
pub struct RandomPolicy {
    knobs: PolicyKnobs,
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    #[must_use]
    pub fn new(knobs: PolicyKnobs, seed: u64) -> Self {
        Self {
            knobs,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn random_visit(&mut self) -> PrepChoice {
        Location::ALL
            .choose(&mut self.rng)
            .map_or(PrepChoice::TakeToken, |location| PrepChoice::Visit(*location))
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn choose_prep_action(&mut self, _player: &Player, _view: &PublicView<'_>) -> PrepChoice {
        if chance(&mut self.rng, self.knobs.token_prob) {
            PrepChoice::TakeToken
        } else {
            self.random_visit()
        }
    }

    fn spend_token(&mut self, player: &Player) -> bool {
        player.tokens > 0 && chance(&mut self.rng, self.knobs.spend_token_prob)
    }

    fn gamble_shortcut(&mut self, _player: &Player) -> bool {
        chance(&mut self.rng, self.knobs.shortcut_prob)
    }

    fn use_blocker(&mut self, _player: &Player, _blocker: Resource) -> bool {
        chance(&mut self.rng, self.knobs.use_blocker_prob)
    }

    fn propose_trade(&mut self, player: &Player, partners: &[&Player]) -> Option<TradeProposal> {
        if !chance(&mut self.rng, self.knobs.trade_prob) {
            return None;
        }
        let partner = partners.choose(&mut self.rng)?;
        let give = player.inventory.choose(&mut self.rng)?.resource;
        let take = partner.inventory.choose(&mut self.rng)?.resource;
        (give != take).then_some(TradeProposal {
            partner: partner.seat,
            give,
            take,
        })
    }

    /// Accept swaps that do not lose printed points; otherwise flip a coin.
    fn accept_trade(&mut self, _player: &Player, proposal: &TradeProposal) -> bool {
        proposal.give.points() >= proposal.take.points() || self.rng.gen_bool(0.5)
    }
}

/// Opening strategies compared by the strategy driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Chase the Portable Go-Kit combo.
    GoKit,
    /// Chase the Prepper Kit combo.
    Prepper,
    /// Hoard Neighborly Tokens.
    Tokens,
    /// Secure the character's plus resource.
    Plus,
    /// Secure the character's doubled resource.
    Mult,
    /// Baseline coin-flip play.
    Random,
}

impl Strategy {
    pub const ALL: [Self; 6] = [
        Self::GoKit,
        Self::Prepper,
        Self::Tokens,
        Self::Plus,
        Self::Mult,
        Self::Random,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GoKit => "go-kit",
            Self::Prepper => "prepper",
            Self::Tokens => "tokens",
            Self::Plus => "plus",
            Self::Mult => "mult",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub fn create_policy(self, knobs: PolicyKnobs, seed: u64) -> Box<dyn Policy + Send> {
        let fallback = RandomPolicy::new(knobs, seed);
        match self {
            Self::Random => Box::new(fallback),
            strategy => Box::new(TargetPolicy { strategy, fallback }),
        }
    }

    /// Cards the strategy tries to collect for `player`, in priority order.
    #[must_use]
    pub fn wanted(self, player: &Player) -> Vec<Resource> {
        match self {
            Self::GoKit => COMBO_BONUSES[0].required.to_vec(),
            Self::Prepper => COMBO_BONUSES[1].required.to_vec(),
            Self::Plus => vec![player.character.plus_resource],
            Self::Mult => player.character.multiplier.resource().into_iter().collect(),
            Self::Tokens | Self::Random => Vec::new(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Target-seeking play that falls back to [`RandomPolicy`] once its wanted
/// cards are held or no longer available.
pub struct TargetPolicy {
    strategy: Strategy,
    fallback: RandomPolicy,
}

impl TargetPolicy {
    fn target_visit(&mut self, player: &Player, view: &PublicView<'_>) -> Option<PrepChoice> {
        let missing = self
            .strategy
            .wanted(player)
            .into_iter()
            .find(|resource| !player.has_card(*resource))?;
        let viable: Vec<Location> = Location::ALL
            .into_iter()
            .filter(|location| view.decks.contains(*location, missing))
            .collect();
        viable
            .choose(&mut self.fallback.rng)
            .map(|location| PrepChoice::Visit(*location))
    }
}

impl Policy for TargetPolicy {
    fn name(&self) -> &'static str {
        self.strategy.label()
    }

    fn choose_prep_action(&mut self, player: &Player, view: &PublicView<'_>) -> PrepChoice {
        if self.strategy == Strategy::Tokens {
            return PrepChoice::TakeToken;
        }
        match self.target_visit(player, view) {
            Some(choice) => choice,
            None => self.fallback.choose_prep_action(player, view),
        }
    }

    fn spend_token(&mut self, player: &Player) -> bool {
        self.fallback.spend_token(player)
    }

    fn gamble_shortcut(&mut self, player: &Player) -> bool {
        self.fallback.gamble_shortcut(player)
    }

    fn use_blocker(&mut self, player: &Player, blocker: Resource) -> bool {
        self.fallback.use_blocker(player, blocker)
    }

    fn propose_trade(&mut self, player: &Player, partners: &[&Player]) -> Option<TradeProposal> {
        let wanted = self.strategy.wanted(player);
        let missing = wanted.iter().find(|r| !player.has_card(**r))?;
        let partner = partners.iter().find(|p| p.has_card(*missing))?;
        let give = player
            .inventory
            .iter()
            .map(|card| card.resource)
            .find(|resource| !wanted.contains(resource))?;
        Some(TradeProposal {
            partner: partner.seat,
            give,
            take: *missing,
        })
    }

    /// Never give away a wanted card.
    fn accept_trade(&mut self, player: &Player, proposal: &TradeProposal) -> bool {
        !self.strategy.wanted(player).contains(&proposal.take)
            && self.fallback.accept_trade(player, proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildfire_game::{Character, LocationDecks, PlayerId, ResourceCard};

    fn player(character: Character) -> Player {
        Player::new(PlayerId(0), "Hero", character)
    }

    fn view<'a>(players: &'a [Player], decks: &'a LocationDecks) -> PublicView<'a> {
        PublicView {
            round: 1,
            players,
            decks,
        }
    }

    #[test]
    fn strategy_labels_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.label().parse(), Ok(strategy));
        }
        assert!("turtle".parse::<Strategy>().is_err());
    }

    #[test]
    fn tokens_strategy_always_takes_tokens() {
        let decks = LocationDecks::ordered();
        let hero = player(Character::Student);
        let mut policy = Strategy::Tokens.create_policy(PolicyKnobs::STRATEGY, 1);
        let players = [hero.clone()];
        for _ in 0..10 {
            assert_eq!(
                policy.choose_prep_action(&hero, &view(&players, &decks)),
                PrepChoice::TakeToken
            );
        }
    }

    #[test]
    fn go_kit_visits_a_location_stocking_the_first_missing_card() {
        let decks = LocationDecks::ordered();
        let mut hero = player(Character::Parent);
        hero.add_card(ResourceCard::new(Resource::WaterBottle, Location::GroceryStore));
        let players = [hero.clone()];
        let mut policy = Strategy::GoKit.create_policy(PolicyKnobs::STRATEGY, 2);
        // Water Bottle is held, so the next target is the First Aid Kit.
        assert_eq!(
            policy.choose_prep_action(&hero, &view(&players, &decks)),
            PrepChoice::Visit(Location::Pharmacy)
        );
    }

    #[test]
    fn mult_strategy_for_community_leader_falls_back() {
        let hero = player(Character::CommunityLeader);
        assert!(Strategy::Mult.wanted(&hero).is_empty());
        assert_eq!(Strategy::Plus.wanted(&hero), vec![Resource::HandCrankRadio]);
    }

    #[test]
    fn random_policy_respects_extreme_knobs() {
        let knobs = PolicyKnobs {
            token_prob: 1.0,
            spend_token_prob: 1.0,
            shortcut_prob: 0.0,
            use_blocker_prob: 0.0,
            trade_prob: 0.0,
        };
        let mut policy = RandomPolicy::new(knobs, 3);
        let decks = LocationDecks::ordered();
        let mut hero = player(Character::Elderly);
        let players = [hero.clone()];
        assert_eq!(
            policy.choose_prep_action(&hero, &view(&players, &decks)),
            PrepChoice::TakeToken
        );
        assert!(!policy.spend_token(&hero), "no tokens to spend");
        hero.tokens = 1;
        assert!(policy.spend_token(&hero));
        assert!(!policy.gamble_shortcut(&hero));
        assert!(!policy.use_blocker(&hero, Resource::SpareTire));
        assert!(policy.propose_trade(&hero, &[]).is_none());
    }

    #[test]
    fn target_policy_trades_for_missing_cards_only() {
        let mut hero = player(Character::Student);
        hero.add_card(ResourceCard::new(Resource::Batteries, Location::ElectronicsStore));
        let mut other = Player::new(PlayerId(1), "Other", Character::Parent);
        other.add_card(ResourceCard::new(Resource::WaterBottle, Location::GroceryStore));

        let mut policy = Strategy::Plus.create_policy(PolicyKnobs::STRATEGY, 4);
        let proposal = policy.propose_trade(&hero, &[&other]);
        assert_eq!(
            proposal,
            Some(TradeProposal {
                partner: PlayerId(1),
                give: Resource::Batteries,
                take: Resource::WaterBottle,
            })
        );

        let ask_for_water = TradeProposal {
            partner: PlayerId(0),
            give: Resource::Batteries,
            take: Resource::WaterBottle,
        };
        let mut holder = player(Character::Student);
        holder.add_card(ResourceCard::new(Resource::WaterBottle, Location::GroceryStore));
        assert!(!policy.accept_trade(&holder, &ask_for_water));
    }
}
