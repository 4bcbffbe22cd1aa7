//! Strategy evaluation: one scripted hero against random opponents.

use anyhow::{Result, bail};
use log::info;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::Serialize;
use wildfire_game::constants::MAX_PLAYERS;
use wildfire_game::numbers::{mean, ratio, std_dev};
use wildfire_game::{Character, GameSetup, PlayerId, RuleSet};

use crate::logic::policy::{Policy, PolicyKnobs, RandomPolicy, Strategy};
use crate::logic::seeds::{derive_game_seed, derive_seat_seed};
use crate::logic::simulation::{SimulationConfig, SimulationSession};

const HERO: PlayerId = PlayerId(0);

#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// Games per (profile, strategy) cell.
    pub games: usize,
    pub players: usize,
    pub seed: u64,
    pub rules: RuleSet,
    pub knobs: PolicyKnobs,
    /// Strategies to evaluate. Always includes the random baseline.
    pub strategies: Vec<Strategy>,
}

impl StrategyConfig {
    #[must_use]
    pub fn new(games: usize, players: usize, seed: u64) -> Self {
        Self {
            games,
            players,
            seed,
            rules: RuleSet::balance(),
            knobs: PolicyKnobs::STRATEGY,
            strategies: Strategy::ALL.to_vec(),
        }
    }

    /// Restrict the run to `strategies`. An empty list keeps all of them.
    #[must_use]
    pub fn with_strategies(mut self, strategies: &[Strategy]) -> Self {
        if strategies.is_empty() {
            return self;
        }
        let mut chosen = strategies.to_vec();
        chosen.push(Strategy::Random);
        chosen.sort_unstable();
        chosen.dedup();
        self.strategies = chosen;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRow {
    pub profile: Character,
    pub strategy: Strategy,
    pub games: usize,
    pub avg_score: f64,
    pub std_dev: f64,
    pub win_rate: f64,
    pub delta_vs_random: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyReport {
    pub games: usize,
    pub players: usize,
    pub seed: u64,
    pub rows: Vec<StrategyRow>,
}

impl StrategyReport {
    /// Highest-scoring strategy for `profile`.
    #[must_use]
    pub fn best_for(&self, profile: Character) -> Option<&StrategyRow> {
        self.rows
            .iter()
            .filter(|row| row.profile == profile)
            .max_by(|a, b| a.avg_score.total_cmp(&b.avg_score))
    }
}

/// Hero profile in seat 0, the remaining profiles shuffled behind it.
fn table_characters(profile: Character, players: usize, game_seed: u64) -> Vec<Character> {
    let mut others: Vec<Character> = Character::ALL
        .into_iter()
        .filter(|c| *c != profile)
        .collect();
    others.shuffle(&mut ChaCha20Rng::seed_from_u64(game_seed));
    std::iter::once(profile)
        .chain(others)
        .take(players)
        .collect()
}

struct Outcome {
    score: i32,
    won: bool,
}

fn play_one(
    config: &StrategyConfig,
    profile: Character,
    strategy: Strategy,
    index: usize,
) -> Result<Outcome> {
    // Every cell replays the same seeds so strategies face the same decks.
    let game_seed = derive_game_seed(config.seed, index as u64);
    let policies: Vec<Box<dyn Policy + Send>> = (0..config.players)
        .map(|seat| {
            let seed = derive_seat_seed(game_seed, seat);
            if seat == HERO.index() {
                strategy.create_policy(config.knobs, seed)
            } else {
                Box::new(RandomPolicy::new(config.knobs, seed)) as Box<dyn Policy + Send>
            }
        })
        .collect();
    let setup = GameSetup::anonymous(config.players).with_characters(table_characters(
        profile,
        config.players,
        game_seed,
    ));
    let sim = SimulationConfig::new(config.rules.clone(), game_seed);
    let record = SimulationSession::new(&sim, &setup, policies)?.run();
    let score = record
        .snapshot
        .player(HERO)
        .map_or(0, |hero| hero.total);
    Ok(Outcome {
        score,
        won: record.snapshot.standing.is_winner(HERO),
    })
}

/// Evaluate every profile × strategy cell.
///
/// # Errors
///
/// Fails on an unsupported player count or a rule set the engine rejects.
pub fn run_strategies(config: &StrategyConfig) -> Result<StrategyReport> {
    if config.players > MAX_PLAYERS {
        bail!(
            "{} players requested but only {MAX_PLAYERS} profiles exist",
            config.players
        );
    }
    info!(
        "Running {} games per cell over {} cells",
        config.games,
        Character::ALL.len() * config.strategies.len()
    );

    let cells: Vec<(Character, Strategy)> = Character::ALL
        .into_iter()
        .flat_map(|profile| {
            config
                .strategies
                .iter()
                .map(move |strategy| (profile, *strategy))
        })
        .collect();

    let mut rows = cells
        .into_par_iter()
        .map(|(profile, strategy)| {
            let outcomes = (0..config.games)
                .map(|index| play_one(config, profile, strategy, index))
                .collect::<Result<Vec<_>>>()?;
            let scores: Vec<i32> = outcomes.iter().map(|o| o.score).collect();
            let wins = outcomes.iter().filter(|o| o.won).count();
            Ok(StrategyRow {
                profile,
                strategy,
                games: config.games,
                avg_score: mean(&scores),
                std_dev: std_dev(&scores),
                win_rate: ratio(wins, config.games),
                delta_vs_random: 0.0,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let baselines: Vec<(Character, f64)> = rows
        .iter()
        .filter(|row| row.strategy == Strategy::Random)
        .map(|row| (row.profile, row.avg_score))
        .collect();
    for row in &mut rows {
        if let Some((_, base)) = baselines.iter().find(|(p, _)| *p == row.profile) {
            row.delta_vs_random = row.avg_score - base;
        }
    }

    Ok(StrategyReport {
        games: config.games,
        players: config.players,
        seed: config.seed,
        rows,
    })
}
