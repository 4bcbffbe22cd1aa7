//! Per-profile action balance: how often each decision is taken and what it
//! is worth at the end of the game.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use wildfire_game::numbers::{mean, ratio};
use wildfire_game::{Character, GameSetup, RuleSet};

use crate::logic::policy::{Policy, PolicyKnobs, RandomPolicy};
use crate::logic::seeds::{derive_game_seed, derive_seat_seed};
use crate::logic::simulation::{GameRecord, SimulationConfig, SimulationSession};

#[derive(Debug, Clone)]
pub struct BalanceConfig {
    pub games: usize,
    pub players: usize,
    pub seed: u64,
    pub rules: RuleSet,
    pub knobs: PolicyKnobs,
}

impl BalanceConfig {
    #[must_use]
    pub fn new(games: usize, players: usize, seed: u64) -> Self {
        Self {
            games,
            players,
            seed,
            rules: RuleSet::balance(),
            knobs: PolicyKnobs::BALANCE,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }
}

/// One (profile, action) row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionStat {
    pub profile: Character,
    pub action: String,
    /// Observations: player-games where the action existed in that game.
    pub samples: usize,
    pub use_rate: f64,
    /// Mean number of uses among players who used it.
    pub avg_uses: f64,
    pub avg_points_if_used: Option<f64>,
    pub avg_points_if_not: Option<f64>,
    pub marginal_delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub profile: Character,
    pub games: usize,
    pub avg_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub games: usize,
    pub players: usize,
    pub seed: u64,
    pub aborted_games: usize,
    pub profiles: Vec<ProfileSummary>,
    pub actions: Vec<ActionStat>,
}

#[derive(Default)]
struct Observations {
    used_points: Vec<i32>,
    unused_points: Vec<i32>,
    uses: Vec<i32>,
}

fn play_one(config: &BalanceConfig, index: usize) -> Result<GameRecord> {
    let game_seed = derive_game_seed(config.seed, index as u64);
    let policies: Vec<Box<dyn Policy + Send>> = (0..config.players)
        .map(|seat| {
            Box::new(RandomPolicy::new(
                config.knobs,
                derive_seat_seed(game_seed, seat),
            )) as Box<dyn Policy + Send>
        })
        .collect();
    let sim = SimulationConfig::new(config.rules.clone(), game_seed);
    Ok(SimulationSession::new(&sim, &GameSetup::anonymous(config.players), policies)?.run())
}

/// Play `config.games` random-policy games and aggregate them.
///
/// # Errors
///
/// Fails when the engine rejects the player count or the rule set.
pub fn run_balance(config: &BalanceConfig) -> Result<BalanceReport> {
    info!(
        "Running {} balance games with {} players",
        config.games, config.players
    );
    let records = (0..config.games)
        .into_par_iter()
        .map(|index| play_one(config, index))
        .collect::<Result<Vec<_>>>()?;
    Ok(aggregate(config, &records))
}

fn aggregate(config: &BalanceConfig, records: &[GameRecord]) -> BalanceReport {
    let mut cells: BTreeMap<(Character, String), Observations> = BTreeMap::new();
    let mut profile_scores: BTreeMap<Character, Vec<i32>> = BTreeMap::new();

    for record in records {
        if record.snapshot.aborted {
            warn!("Game seed {} hit the disaster round cap", record.seed);
        }
        // Only actions somebody took in this game count as "not used" for
        // the others.
        let universe: BTreeSet<&String> = record
            .tallies
            .iter()
            .flat_map(|tally| tally.keys())
            .collect();

        for (player, tally) in record.snapshot.players.iter().zip(&record.tallies) {
            profile_scores
                .entry(player.character)
                .or_default()
                .push(player.total);

            for action in &universe {
                let cell = cells
                    .entry((player.character, (*action).clone()))
                    .or_default();
                match tally.get(*action) {
                    Some(count) => {
                        cell.used_points.push(player.total);
                        cell.uses.push(i32::try_from(*count).unwrap_or(i32::MAX));
                    }
                    None => cell.unused_points.push(player.total),
                }
            }
        }
    }

    let actions = cells
        .into_iter()
        .map(|((profile, action), obs)| {
            let samples = obs.used_points.len() + obs.unused_points.len();
            let if_used = (!obs.used_points.is_empty()).then(|| mean(&obs.used_points));
            let if_not = (!obs.unused_points.is_empty()).then(|| mean(&obs.unused_points));
            ActionStat {
                profile,
                action,
                samples,
                use_rate: ratio(obs.used_points.len(), samples),
                avg_uses: mean(&obs.uses),
                avg_points_if_used: if_used,
                avg_points_if_not: if_not,
                marginal_delta: if_used.zip(if_not).map(|(used, not)| used - not),
            }
        })
        .collect();

    let profiles = profile_scores
        .into_iter()
        .map(|(profile, scores)| ProfileSummary {
            profile,
            games: scores.len(),
            avg_score: mean(&scores),
        })
        .collect();

    BalanceReport {
        games: config.games,
        players: config.players,
        seed: config.seed,
        aborted_games: records.iter().filter(|r| r.snapshot.aborted).count(),
        profiles,
        actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::simulation::TAKE_TOKEN;

    #[test]
    fn balance_is_deterministic_for_a_seed() {
        let config = BalanceConfig::new(12, 4, 2024);
        let first = run_balance(&config).expect("balance run");
        let second = run_balance(&config).expect("balance run");
        assert_eq!(first, second);
    }

    #[test]
    fn rows_are_consistent() {
        let config = BalanceConfig::new(20, 5, 9);
        let report = run_balance(&config).expect("balance run");

        // Five seats deal every profile once per game.
        assert_eq!(report.profiles.len(), 5);
        assert!(report.profiles.iter().all(|p| p.games == 20));

        assert!(!report.actions.is_empty());
        for row in &report.actions {
            assert!((0.0..=1.0).contains(&row.use_rate));
            assert!(row.samples > 0);
            match (row.avg_points_if_used, row.avg_points_if_not) {
                (Some(used), Some(not)) => {
                    let delta = row.marginal_delta.expect("delta when both sides exist");
                    assert!((delta - (used - not)).abs() < 1e-9);
                }
                _ => assert!(row.marginal_delta.is_none()),
            }
        }
        assert!(report.actions.iter().any(|row| row.action == TAKE_TOKEN));
    }

    #[test]
    fn invalid_player_count_is_an_error() {
        assert!(run_balance(&BalanceConfig::new(1, 6, 1)).is_err());
    }
}
