//! Rule variants.
//!
//! The table game and the headless balance scripts disagree on a handful of
//! mechanics (movement die, action-card draw, spark timing, trading). Both
//! variants are expressed as a [`RuleSet`] so one engine plays either.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    EARLY_SPARK_FACE, EARLY_SPARK_FROM_ROUND, MAX_DISASTER_ROUNDS, PREP_ROUNDS, STARTING_RESOURCES,
};
use crate::deck::ActionDrawPolicy;
use crate::error::RuleSetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementDie {
    /// One three-sided die, doubled: 2, 4 or 6.
    #[default]
    TwoD3,
    /// One six-sided die, 1..=6.
    D6,
}

impl MovementDie {
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> u8 {
        match self {
            Self::TwoD3 => 2 * rng.gen_range(1..=3),
            Self::D6 => roll_d6(rng),
        }
    }

    #[must_use]
    pub const fn range(self) -> (u8, u8) {
        match self {
            Self::TwoD3 => (2, 6),
            Self::D6 => (1, 6),
        }
    }
}

/// When the early-spark die is rolled during preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SparkTiming {
    /// Once per round, after every player acted.
    EndOfRound,
    /// After each player's action, cutting the round short on a spark.
    AfterEachTurn,
}

pub fn roll_d6<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub movement: MovementDie,
    pub action_draw: ActionDrawPolicy,
    /// `None` disables the early spark entirely.
    pub early_spark: Option<SparkTiming>,
    pub trading: bool,
    pub starting_resources: u8,
    pub prep_rounds: u8,
    pub spark_from_round: u8,
    pub spark_face: u8,
    pub max_disaster_rounds: u32,
    pub car_trouble: bool,
}

impl RuleSet {
    /// Interactive table rules.
    #[must_use]
    pub const fn table() -> Self {
        Self {
            movement: MovementDie::TwoD3,
            action_draw: ActionDrawPolicy::Cyclic,
            early_spark: Some(SparkTiming::AfterEachTurn),
            trading: true,
            starting_resources: STARTING_RESOURCES,
            prep_rounds: PREP_ROUNDS,
            spark_from_round: EARLY_SPARK_FROM_ROUND,
            spark_face: EARLY_SPARK_FACE,
            max_disaster_rounds: MAX_DISASTER_ROUNDS,
            car_trouble: false,
        }
    }

    /// Headless rules used by the balance drivers.
    #[must_use]
    pub const fn balance() -> Self {
        Self {
            movement: MovementDie::D6,
            action_draw: ActionDrawPolicy::WithReplacement,
            early_spark: Some(SparkTiming::EndOfRound),
            trading: false,
            ..Self::table()
        }
    }

    #[must_use]
    pub const fn with_trading(mut self, trading: bool) -> Self {
        self.trading = trading;
        self
    }

    #[must_use]
    pub const fn with_early_spark(mut self, timing: Option<SparkTiming>) -> Self {
        self.early_spark = timing;
        self
    }

    #[must_use]
    pub const fn with_car_trouble(mut self, enabled: bool) -> Self {
        self.car_trouble = enabled;
        self
    }

    /// Validate value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error when a round count is zero or the spark round falls
    /// after the last preparation round.
    pub const fn validate(&self) -> Result<(), RuleSetError> {
        if self.prep_rounds == 0 {
            return Err(RuleSetError::NoPrepRounds);
        }
        if self.early_spark.is_some() && self.spark_from_round > self.prep_rounds {
            return Err(RuleSetError::SparkAfterPrep {
                spark_from_round: self.spark_from_round,
                prep_rounds: self.prep_rounds,
            });
        }
        if self.max_disaster_rounds == 0 {
            return Err(RuleSetError::NoDisasterRounds);
        }
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn presets_differ_where_the_variants_diverge() {
        let table = RuleSet::table();
        let balance = RuleSet::balance();
        assert_eq!(table, RuleSet::default());
        assert_eq!(table.movement, MovementDie::TwoD3);
        assert_eq!(balance.movement, MovementDie::D6);
        assert_eq!(balance.action_draw, ActionDrawPolicy::WithReplacement);
        assert_eq!(balance.early_spark, Some(SparkTiming::EndOfRound));
        assert!(table.trading && !balance.trading);
        assert_eq!(table.prep_rounds, balance.prep_rounds);
        assert!(!table.car_trouble && !balance.car_trouble);
    }

    #[test]
    fn rolls_stay_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        for die in [MovementDie::TwoD3, MovementDie::D6] {
            let (lo, hi) = die.range();
            for _ in 0..500 {
                let roll = die.roll(&mut rng);
                assert!((lo..=hi).contains(&roll), "{die:?} rolled {roll}");
            }
        }
    }

    #[test]
    fn table_movement_is_a_doubled_d3() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..3000 {
            let roll = MovementDie::TwoD3.roll(&mut rng);
            assert_eq!(roll % 2, 0, "doubled d3 rolled {roll}");
            seen.insert(roll);
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![2, 4, 6]);
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let mut rules = RuleSet::balance();
        assert!(rules.validate().is_ok());

        rules.spark_from_round = 9;
        assert!(matches!(
            rules.validate(),
            Err(RuleSetError::SparkAfterPrep { .. })
        ));
        assert!(rules.clone().with_early_spark(None).validate().is_ok());

        rules.spark_from_round = 4;
        rules.prep_rounds = 0;
        assert_eq!(rules.validate(), Err(RuleSetError::NoPrepRounds));

        let capped = RuleSet {
            max_disaster_rounds: 0,
            ..RuleSet::table()
        };
        assert_eq!(capped.validate(), Err(RuleSetError::NoDisasterRounds));
    }

    #[test]
    fn rule_sets_deserialize_with_defaults() {
        let rules: RuleSet = serde_json::from_str(r#"{"movement":"d6","trading":false}"#)
            .expect("partial rule set should parse");
        assert_eq!(rules.movement, MovementDie::D6);
        assert!(!rules.trading);
        assert_eq!(rules.action_draw, ActionDrawPolicy::Cyclic);
        assert_eq!(rules.prep_rounds, PREP_ROUNDS);
    }
}
