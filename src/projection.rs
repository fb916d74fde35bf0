use std::fmt;

use serde::{Deserialize, Serialize};

use crate::points::Point;
use crate::scoring::{CompletedSet, EngineState, MatchFormat, PlayerSlot, Tally};

pub const DEFAULT_MOMENTUM_COUNT: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPlayers {
    pub p1: String,
    pub p2: String,
}

impl MatchPlayers {
    pub fn new(p1: impl Into<String>, p2: impl Into<String>) -> Self {
        Self {
            p1: p1.into(),
            p2: p2.into(),
        }
    }

    pub fn name(&self, slot: PlayerSlot) -> &str {
        match slot {
            PlayerSlot::P1 => &self.p1,
            PlayerSlot::P2 => &self.p2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCall {
    Deuce,
    Advantage(PlayerSlot),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameScore {
    pub p1: String,
    pub p2: String,
    pub call: Option<GameCall>,
    pub tiebreak: bool,
}

impl GameScore {
    pub fn get(&self, slot: PlayerSlot) -> &str {
        match slot {
            PlayerSlot::P1 => &self.p1,
            PlayerSlot::P2 => &self.p2,
        }
    }

    pub fn call_label(&self, players: &MatchPlayers) -> Option<String> {
        self.call.map(|call| match call {
            GameCall::Deuce => "Deuce".to_string(),
            GameCall::Advantage(slot) => format!("Ad {}", players.name(slot)),
        })
    }
}

pub fn game_score(state: &EngineState) -> GameScore {
    if state.in_tiebreak {
        return GameScore {
            p1: state.tiebreak_points.p1.to_string(),
            p2: state.tiebreak_points.p2.to_string(),
            call: None,
            tiebreak: true,
        };
    }

    let (p1, p2, call) = normal_game_labels(state.game_points);
    GameScore {
        p1: p1.to_string(),
        p2: p2.to_string(),
        call,
        tiebreak: false,
    }
}

fn normal_game_labels(points: Tally) -> (&'static str, &'static str, Option<GameCall>) {
    const LABELS: [&str; 4] = ["0", "15", "30", "40"];
    let (a, b) = (points.p1, points.p2);

    if a >= 3 && b >= 3 {
        return match points.leader() {
            None => ("40", "40", Some(GameCall::Deuce)),
            Some(PlayerSlot::P1) if a == b + 1 => {
                ("Ad", "40", Some(GameCall::Advantage(PlayerSlot::P1)))
            }
            Some(PlayerSlot::P2) if b == a + 1 => {
                ("40", "Ad", Some(GameCall::Advantage(PlayerSlot::P2)))
            }
            // Only reachable for a game that should already have been awarded.
            Some(_) => ("40", "40", None),
        };
    }

    let label = |n: u32| LABELS[n.min(3) as usize];
    (label(a), label(b), None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCell {
    Games { games: u32, tiebreak: Option<u32> },
    Pending,
}

impl fmt::Display for SetCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetCell::Games {
                games,
                tiebreak: Some(tb),
            } => write!(f, "{games}({tb})"),
            SetCell::Games {
                games,
                tiebreak: None,
            } => write!(f, "{games}"),
            SetCell::Pending => f.write_str("—"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetColumn {
    pub p1: SetCell,
    pub p2: SetCell,
    pub leader: Option<PlayerSlot>,
    pub completed: bool,
}

impl SetColumn {
    /// The tiebreak annotation goes on the set loser's cell only.
    pub fn from_completed(set: &CompletedSet) -> Self {
        let cell = |slot: PlayerSlot| SetCell::Games {
            games: set.games[slot],
            tiebreak: set
                .tiebreak
                .filter(|tb| tb.loser == slot)
                .map(|tb| tb.loser_points),
        };
        Self {
            p1: cell(PlayerSlot::P1),
            p2: cell(PlayerSlot::P2),
            leader: set.games.leader(),
            completed: true,
        }
    }

    fn in_progress(games: Tally) -> Self {
        Self {
            p1: SetCell::Games {
                games: games.p1,
                tiebreak: None,
            },
            p2: SetCell::Games {
                games: games.p2,
                tiebreak: None,
            },
            leader: games.leader(),
            completed: false,
        }
    }

    fn pending() -> Self {
        Self {
            p1: SetCell::Pending,
            p2: SetCell::Pending,
            leader: None,
            completed: false,
        }
    }

    pub fn get(&self, slot: PlayerSlot) -> SetCell {
        match slot {
            PlayerSlot::P1 => self.p1,
            PlayerSlot::P2 => self.p2,
        }
    }
}

pub fn set_columns(state: &EngineState, format: MatchFormat) -> Vec<SetColumn> {
    let done = state.is_match_done(format);
    (0..format.max_sets() as usize)
        .map(|idx| match state.completed_sets.get(idx) {
            Some(set) => SetColumn::from_completed(set),
            None if idx == state.completed_sets.len() && !done => {
                SetColumn::in_progress(state.games_in_set)
            }
            None => SetColumn::pending(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomentumDot {
    pub point_id: String,
    pub winner: PlayerSlot,
    pub server: PlayerSlot,
    pub label: String,
}

impl MomentumDot {
    pub fn served_by(&self, slot: PlayerSlot) -> bool {
        self.server == slot
    }

    pub fn won_on_serve(&self) -> bool {
        self.winner == self.server
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Momentum {
    /// Oldest first.
    pub dots: Vec<MomentumDot>,
    pub won: Tally,
}

pub fn momentum(points: &[Point], window: usize) -> Momentum {
    let start = points.len().saturating_sub(window);
    let mut won = Tally::default();
    let dots = points[start..]
        .iter()
        .map(|p| {
            won.bump(p.winner);
            MomentumDot {
                point_id: p.id.clone(),
                winner: p.winner,
                server: p.server,
                label: p.label.clone(),
            }
        })
        .collect();
    Momentum { dots, won }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub set_number: u32,
    pub game: GameScore,
    pub games: Tally,
    pub sets: Tally,
    pub server: PlayerSlot,
    pub columns: Vec<SetColumn>,
    pub match_winner: Option<PlayerSlot>,
    pub momentum: Momentum,
}

impl Scoreboard {
    pub fn result_label(&self, slot: PlayerSlot) -> &'static str {
        result_label(self.match_winner, slot)
    }

    pub fn winner_name<'a>(&self, players: &'a MatchPlayers) -> Option<&'a str> {
        self.match_winner.map(|slot| players.name(slot))
    }
}

/// Result column text for `slot` given the decided winner, if any.
pub fn result_label(winner: Option<PlayerSlot>, slot: PlayerSlot) -> &'static str {
    if winner == Some(slot) { "WINNER" } else { "—" }
}

pub fn project(
    state: &EngineState,
    points: &[Point],
    format: MatchFormat,
    momentum_count: usize,
) -> Scoreboard {
    Scoreboard {
        set_number: state.set_number,
        game: game_score(state),
        games: state.games_in_set,
        sets: state.sets_won,
        server: state.next_server(),
        columns: set_columns(state, format),
        match_winner: state.match_winner(format),
        momentum: momentum(points, momentum_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_before_forty() {
        assert_eq!(normal_game_labels(Tally::new(0, 0)), ("0", "0", None));
        assert_eq!(normal_game_labels(Tally::new(2, 1)), ("30", "15", None));
        assert_eq!(normal_game_labels(Tally::new(3, 2)), ("40", "30", None));
    }

    #[test]
    fn deuce_and_advantage() {
        assert_eq!(
            normal_game_labels(Tally::new(5, 5)),
            ("40", "40", Some(GameCall::Deuce))
        );
        assert_eq!(
            normal_game_labels(Tally::new(3, 4)),
            ("40", "Ad", Some(GameCall::Advantage(PlayerSlot::P2)))
        );
    }
}
