use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use wildfire_game::{
    DecisionMaker, GameEvent, GameSetup, Location, PhaseKind, Player, PrepChoice, PublicView,
    Resource, RuleSet, Standing, TradeProposal, WildfireGame, constants::SAFE_ZONE_INDEX,
};

/// Coin-flip decider that also offers random swaps.
struct Coin {
    rng: ChaCha20Rng,
}

impl Coin {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl DecisionMaker for Coin {
    fn choose_prep_action(&mut self, _: &Player, _: &PublicView<'_>) -> PrepChoice {
        if self.rng.gen_bool(0.25) {
            PrepChoice::TakeToken
        } else {
            Location::ALL
                .choose(&mut self.rng)
                .map_or(PrepChoice::TakeToken, |l| PrepChoice::Visit(*l))
        }
    }

    fn should_spend_token(&mut self, _: &Player) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn should_gamble_shortcut(&mut self, _: &Player) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn should_use_blocker(&mut self, _: &Player, _: Resource) -> bool {
        self.rng.gen_bool(0.8)
    }

    fn propose_trade(&mut self, player: &Player, partners: &[&Player]) -> Option<TradeProposal> {
        let partner = partners.choose(&mut self.rng)?;
        let give = player.inventory.choose(&mut self.rng)?.resource;
        // Sometimes ask for a card the partner may not hold.
        let take = if self.rng.gen_bool(0.8) {
            partner.inventory.choose(&mut self.rng)?.resource
        } else {
            *Resource::ALL.choose(&mut self.rng)?
        };
        Some(TradeProposal {
            partner: partner.seat,
            give,
            take,
        })
    }

    fn accept_trade(&mut self, _: &Player, _: &Player, _: &TradeProposal) -> bool {
        self.rng.gen_bool(0.7)
    }
}

fn play(seed: u64, players: usize, rules: RuleSet) -> WildfireGame {
    let mut game =
        WildfireGame::with_seed(&GameSetup::anonymous(players), rules, seed).expect("valid game");
    game.play_to_end(&mut Coin::new(seed ^ 0xA5A5));
    game
}

#[test]
fn games_finish_with_a_single_first_arrival() {
    for seed in 0..40 {
        for rules in [RuleSet::table(), RuleSet::balance()] {
            let game = play(seed, 2 + (seed as usize % 4), rules);
            let snapshot = game.snapshot();
            assert!(snapshot.is_finished());
            assert!(!snapshot.aborted, "seed {seed} hit the round cap");
            assert!(snapshot.players.iter().all(|p| p.reached_safe_zone));

            let firsts: Vec<_> = game
                .events()
                .iter()
                .filter_map(|e| match e {
                    GameEvent::ReachedSafeZone { seat, first: true } => Some(*seat),
                    _ => None,
                })
                .collect();
            assert_eq!(firsts.len(), 1);
            assert_eq!(snapshot.first_arrival, firsts.first().copied());
        }
    }
}

#[test]
fn positions_never_pass_the_safe_zone() {
    for seed in 100..130 {
        let game = play(seed, 5, RuleSet::table());
        for event in game.events() {
            match event {
                GameEvent::Moved { to, .. } => assert!(*to <= SAFE_ZONE_INDEX),
                GameEvent::ShortcutGamble { position, .. } => {
                    assert!(*position <= SAFE_ZONE_INDEX);
                }
                _ => {}
            }
        }
    }
}

#[test]
fn every_card_is_accounted_for() {
    for seed in 200..230 {
        let rules = RuleSet::table().with_car_trouble(seed % 2 == 0);
        let game = play(seed, 4, rules);
        for location in Location::ALL {
            assert_eq!(
                game.accounted_cards(location),
                location.deck_size(),
                "seed {seed} lost a card from {location}"
            );
        }
    }
}

#[test]
fn snapshot_scores_match_player_state() {
    let game = play(7, 5, RuleSet::balance());
    let snapshot = game.snapshot();
    for (player, view) in game.players().iter().zip(&snapshot.players) {
        assert_eq!(view.total, player.total_points());
        assert_eq!(view.total, view.score.total());
        assert_eq!(view.inventory.len(), player.inventory.len());
    }
    let top = snapshot.ranking.first().map(|(_, score)| *score);
    match &snapshot.standing {
        Standing::Winner(seat) => {
            assert_eq!(snapshot.player(*seat).map(|p| p.total), top);
        }
        Standing::SharedVictory(seats) => {
            assert!(seats.len() > 1);
            assert!(
                seats
                    .iter()
                    .all(|seat| snapshot.player(*seat).map(|p| p.total) == top)
            );
        }
    }
}

#[test]
fn same_seed_replays_identically() {
    let first = play(4242, 3, RuleSet::table());
    let second = play(4242, 3, RuleSet::table());
    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(first.events(), second.events());

    let other = play(4243, 3, RuleSet::table());
    assert_ne!(first.events(), other.events());
}

#[test]
fn early_spark_cuts_preparation_short_sometimes() {
    let sparked = (0..60)
        .map(|seed| play(seed, 3, RuleSet::balance()).snapshot())
        .filter(|s| s.early_spark_round.is_some())
        .inspect(|s| {
            let round = s.early_spark_round.unwrap_or_default();
            assert!((4..=7).contains(&round));
            assert_eq!(s.prep_round, round);
        })
        .count();
    assert!(sparked > 0);
}

#[test]
fn trading_is_journaled_only_when_enabled() {
    let with_trades = play(31, 5, RuleSet::table());
    let without = play(31, 5, RuleSet::table().with_trading(false));
    let count = |game: &WildfireGame| {
        game.events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::TradeCompleted { .. } | GameEvent::TradeRejected { .. }
                )
            })
            .count()
    };
    assert!(count(&with_trades) > 0);
    assert_eq!(count(&without), 0);
    assert!(without.events().iter().any(|e| matches!(
        e,
        GameEvent::PhaseChanged {
            phase: PhaseKind::Finished
        }
    )));
}
