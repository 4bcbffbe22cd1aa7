//! Read-only views of a game for display and aggregation.

use serde::Serialize;

use crate::catalog::{Character, Resource};
use crate::events::PhaseKind;
use crate::player::{Player, PlayerId};
use crate::scoring::{ScoreBreakdown, Standing};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub seat: PlayerId,
    pub name: String,
    pub character: Character,
    pub plus_resource: Resource,
    pub multiplier: String,
    pub inventory: Vec<String>,
    pub tokens: u32,
    pub position: u8,
    pub reached_safe_zone: bool,
    pub bonus_points: i32,
    pub score: ScoreBreakdown,
    pub total: i32,
    pub combo: Option<&'static str>,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        let score = player.score_breakdown();
        Self {
            seat: player.seat,
            name: player.name.clone(),
            character: player.character(),
            plus_resource: player.character.plus_resource,
            multiplier: player.character.multiplier.to_string(),
            inventory: player.inventory_names(),
            tokens: player.tokens,
            position: player.position,
            reached_safe_zone: player.reached_safe_zone,
            bonus_points: player.bonus_points,
            score,
            total: score.total(),
            combo: score.combo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: PhaseKind,
    /// Last preparation round that started.
    pub prep_round: u8,
    pub disaster_round: u32,
    /// Preparation round in which the early spark hit, if it did.
    pub early_spark_round: Option<u8>,
    pub players: Vec<PlayerSnapshot>,
    pub ranking: Vec<(PlayerId, i32)>,
    pub standing: Standing,
    pub first_arrival: Option<PlayerId>,
    pub aborted: bool,
}

impl GameSnapshot {
    #[must_use]
    pub fn player(&self, seat: PlayerId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.seat == seat)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == PhaseKind::Finished
    }
}
