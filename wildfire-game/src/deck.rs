//! Location decks and the action-card deck.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cards::{ActionCard, ResourceCard};
use crate::catalog::{Location, Resource};

/// One shuffled, pop-only deck per location. Never refilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDecks {
    decks: BTreeMap<Location, Vec<ResourceCard>>,
    initial: BTreeMap<Location, usize>,
}

impl LocationDecks {
    /// Build every deck from its template, unshuffled.
    #[must_use]
    pub fn ordered() -> Self {
        let mut decks = BTreeMap::new();
        let mut initial = BTreeMap::new();
        for location in Location::ALL {
            let cards: Vec<ResourceCard> = location
                .deck_template()
                .iter()
                .flat_map(|&(resource, copies)| {
                    std::iter::repeat_n(ResourceCard::new(resource, location), copies)
                })
                .collect();
            initial.insert(location, cards.len());
            decks.insert(location, cards);
        }
        Self { decks, initial }
    }

    #[must_use]
    pub fn new_shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut decks = Self::ordered();
        for cards in decks.decks.values_mut() {
            cards.shuffle(rng);
        }
        decks
    }

    /// Pop the top (last) card of a location deck.
    pub fn draw(&mut self, location: Location) -> Option<ResourceCard> {
        self.decks.get_mut(&location).and_then(Vec::pop)
    }

    #[must_use]
    pub fn remaining(&self, location: Location) -> usize {
        self.decks.get(&location).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn initial_size(&self, location: Location) -> usize {
        self.initial.get(&location).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_remaining(&self) -> usize {
        self.decks.values().map(Vec::len).sum()
    }

    /// Whether any card of `resource` is still undealt at `location`.
    #[must_use]
    pub fn contains(&self, location: Location, resource: Resource) -> bool {
        self.decks
            .get(&location)
            .is_some_and(|cards| cards.iter().any(|card| card.resource == resource))
    }

    #[must_use]
    pub fn cards(&self, location: Location) -> &[ResourceCard] {
        self.decks.get(&location).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// How action cards are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionDrawPolicy {
    /// Shuffled pile, refilled and reshuffled once exhausted.
    #[default]
    Cyclic,
    /// Independent uniform pick from the full pool on every draw.
    WithReplacement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDeck {
    policy: ActionDrawPolicy,
    pool: Vec<ActionCard>,
    pile: Vec<ActionCard>,
}

impl ActionDeck {
    #[must_use]
    pub fn new(policy: ActionDrawPolicy, include_car_trouble: bool) -> Self {
        let mut pool = ActionCard::BASE_DECK.to_vec();
        if include_car_trouble {
            pool.push(ActionCard::CarTrouble);
        }
        Self {
            policy,
            pool,
            pile: Vec::new(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> ActionDrawPolicy {
        self.policy
    }

    #[must_use]
    pub fn pool(&self) -> &[ActionCard] {
        &self.pool
    }

    /// Cards left before the next reshuffle (cyclic only).
    #[must_use]
    pub fn pile_len(&self) -> usize {
        self.pile.len()
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ActionCard> {
        match self.policy {
            ActionDrawPolicy::WithReplacement => self.pool.choose(rng).copied(),
            ActionDrawPolicy::Cyclic => {
                if self.pile.is_empty() {
                    self.pile.clone_from(&self.pool);
                    self.pile.shuffle(rng);
                }
                self.pile.pop()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    #[test]
    fn shuffled_decks_keep_their_sizes() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let decks = LocationDecks::new_shuffled(&mut rng);
        for location in Location::ALL {
            assert_eq!(decks.remaining(location), location.deck_size());
            assert_eq!(decks.initial_size(location), location.deck_size());
        }
        assert_eq!(decks.total_remaining(), 37);
    }

    #[test]
    fn drawing_exhausts_a_deck() {
        let mut decks = LocationDecks::ordered();
        for _ in 0..Location::GasStation.deck_size() {
            let card = decks.draw(Location::GasStation);
            assert_eq!(card.map(|c| c.origin), Some(Location::GasStation));
        }
        assert!(decks.draw(Location::GasStation).is_none());
        assert!(!decks.contains(Location::GasStation, Resource::SpareTire));
        assert_eq!(decks.initial_size(Location::GasStation), 6);
    }

    #[test]
    fn cyclic_deck_deals_every_card_before_repeating() {
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        let mut deck = ActionDeck::new(ActionDrawPolicy::Cyclic, false);
        let first: HashSet<_> = (0..8).filter_map(|_| deck.draw(&mut rng)).collect();
        assert_eq!(first.len(), 8);
        assert_eq!(deck.pile_len(), 0);
        assert!(deck.draw(&mut rng).is_some());
        assert_eq!(deck.pile_len(), 7);
    }

    #[test]
    fn replacement_draws_stay_in_pool() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut deck = ActionDeck::new(ActionDrawPolicy::WithReplacement, true);
        assert_eq!(deck.pool().len(), 9);
        for _ in 0..50 {
            let card = deck.draw(&mut rng);
            assert!(card.is_some_and(|c| deck.pool().contains(&c)));
        }
        assert_eq!(deck.pile_len(), 0);
    }
}
