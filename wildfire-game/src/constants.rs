//! Centralized board, scoring and pacing constants for Wildfire Evacuation.
//!
//! These values define the deterministic math for the rules engine.
//! Keeping them together means balance changes only happen through
//! reviewed code, never through runtime assets.

// Board geometry -----------------------------------------------------------
/// Number of path squares (0-14). The Safe Zone sits just past the end.
pub const PATH_LENGTH: u8 = 15;
/// Index of the Safe Zone; positions are clamped here.
pub const SAFE_ZONE_INDEX: u8 = PATH_LENGTH;
/// Action ("red") squares, clustered near the end of the path.
pub const RED_SPACES: [u8; 5] = [4, 8, 10, 12, 13];
/// Optional shortcut squares.
pub const SHORTCUT_SPACES: [u8; 2] = [5, 9];

// Scoring ------------------------------------------------------------------
pub const NT_BONUS: i32 = 3;
pub const COMMUNITY_LEADER_NT_BONUS: i32 = 4;
pub const RESOURCE_POINTS: i32 = 2;
pub const SAFE_ZONE_POINTS: i32 = 5;
pub const ACTION_POINT_PENALTY: i32 = 5;

// Movement -----------------------------------------------------------------
pub const TOKEN_MOVE_BONUS: u8 = 5;
pub const SHORTCUT_JUMP: u8 = 3;
/// Lowest d6 face that wins a shortcut gamble.
pub const SHORTCUT_SUCCESS_MIN: u8 = 5;
pub const SHORTCUT_FAIL_SKIPS: u8 = 1;
pub const BAD_DIRECTIONS_SETBACK: u8 = 4;

// Pacing -------------------------------------------------------------------
pub const PREP_ROUNDS: u8 = 7;
pub const EARLY_SPARK_FROM_ROUND: u8 = 4;
pub const EARLY_SPARK_FACE: u8 = 6;
pub const STARTING_RESOURCES: u8 = 2;
pub const MAX_DISASTER_ROUNDS: u32 = 200;

// Roster -------------------------------------------------------------------
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;

// Location labels ----------------------------------------------------------
pub const YARD: &str = "Yard";
pub const NO_LOCATION: &str = "(none)";
pub const NEIGHBORLY_TOKEN: &str = "Neighborly Token";

#[must_use]
pub fn is_red_space(position: u8) -> bool {
    RED_SPACES.contains(&position)
}

#[must_use]
pub fn is_shortcut_space(position: u8) -> bool {
    SHORTCUT_SPACES.contains(&position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_squares_stay_on_the_path() {
        assert!(RED_SPACES.iter().all(|&sq| sq < SAFE_ZONE_INDEX));
        assert!(SHORTCUT_SPACES.iter().all(|&sq| sq < SAFE_ZONE_INDEX));
        assert!(
            RED_SPACES.iter().all(|sq| !SHORTCUT_SPACES.contains(sq)),
            "a square is either a shortcut or an action square"
        );
    }

    #[test]
    fn square_predicates_match_tables() {
        assert!(is_red_space(4));
        assert!(is_red_space(13));
        assert!(!is_red_space(5));
        assert!(is_shortcut_space(9));
        assert!(!is_shortcut_space(SAFE_ZONE_INDEX));
    }
}
