use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::scoring::{EngineState, MatchFormat, PlayerSlot, apply_point};

/// One rally's outcome. `set`, `game` and `point_index` are informational: engine state is
/// derived from list order and `winner` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: String,
    pub set: u32,
    pub game: u32,
    #[serde(alias = "point")]
    pub point_index: u32,
    pub server: PlayerSlot,
    pub winner: PlayerSlot,
    #[serde(default)]
    pub label: String,
    #[serde(alias = "atISO")]
    pub timestamp: DateTime<Utc>,
}

impl Point {
    /// Builds the point about to be played from `state`.
    pub fn at_state(
        id: impl Into<String>,
        state: &EngineState,
        winner: PlayerSlot,
        label: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Point {
            id: id.into(),
            set: state.set_number,
            game: state.games_in_set.total() + 1,
            point_index: state.points_in_game() + 1,
            server: state.next_server(),
            winner,
            label: label.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Display, Error, From)]
pub enum PointsError {
    #[display("malformed point feed: {_0}")]
    #[from]
    Json(serde_json::Error),
    #[display("duplicate point id {id}")]
    DuplicateId { id: String },
    #[display("point {id} has a zero set/game/point position")]
    ZeroPosition { id: String },
}

pub fn parse_points_json(raw: &str) -> Result<Vec<Point>, PointsError> {
    let points: Option<Vec<Point>> = serde_json::from_str(raw)?;
    let points = points.unwrap_or_default();
    validate_points(&points)?;
    Ok(points)
}

pub fn validate_points(points: &[Point]) -> Result<(), PointsError> {
    let mut seen = HashSet::new();
    for point in points {
        if point.set == 0 || point.game == 0 || point.point_index == 0 {
            return Err(PointsError::ZeroPosition {
                id: point.id.clone(),
            });
        }
        if !seen.insert(point.id.as_str()) {
            return Err(PointsError::DuplicateId {
                id: point.id.clone(),
            });
        }
    }
    Ok(())
}

/// Turns a winner sequence into a historical point list whose position and server fields agree
/// with the engine. Winners past the end of the match are dropped.
pub fn script_points(
    id_prefix: &str,
    server_seed: PlayerSlot,
    format: MatchFormat,
    winners: &[PlayerSlot],
    start: DateTime<Utc>,
    spacing: Duration,
) -> Vec<Point> {
    let mut state = EngineState::new(server_seed);
    let mut points = Vec::with_capacity(winners.len());
    let mut at = start;

    for (idx, winner) in winners.iter().copied().enumerate() {
        if state.is_match_done(format) {
            break;
        }
        let label = if winner == state.next_server() {
            "Serve +1 winner"
        } else {
            "Return winner"
        };
        points.push(Point::at_state(
            format!("{id_prefix}-{}", idx + 1),
            &state,
            winner,
            label,
            at,
        ));
        state = apply_point(&state, winner, format).0;
        at += spacing;
    }

    points
}

/// Expands `(game winner, points the loser takes)` pairs into a rally-by-rally winner list.
pub fn winners_for_games(games: &[(PlayerSlot, u32)]) -> Vec<PlayerSlot> {
    let mut out = Vec::new();
    for &(winner, loser_points) in games {
        let loser = winner.other();
        let needed = (loser_points + 2).max(4);
        for _ in 0..loser_points {
            out.push(loser);
            out.push(winner);
        }
        for _ in loser_points..needed {
            out.push(winner);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Tally;

    #[test]
    fn game_script_reaches_exact_game_scores() {
        let winners = winners_for_games(&[(PlayerSlot::P1, 0), (PlayerSlot::P2, 3)]);
        assert_eq!(winners.len(), 4 + 8);

        let mut state = EngineState::new(PlayerSlot::P1);
        for w in winners {
            state = apply_point(&state, w, MatchFormat::BestOf3).0;
        }
        assert_eq!(state.games_in_set, Tally::new(1, 1));
        assert_eq!(state.game_points, Tally::default());
    }
}
