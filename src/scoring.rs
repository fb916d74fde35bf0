use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSlot {
    P1,
    P2,
}

impl PlayerSlot {
    pub const BOTH: [PlayerSlot; 2] = [PlayerSlot::P1, PlayerSlot::P2];

    pub fn other(self) -> Self {
        match self {
            PlayerSlot::P1 => PlayerSlot::P2,
            PlayerSlot::P2 => PlayerSlot::P1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerSlot::P1 => "P1",
            PlayerSlot::P2 => "P2",
        }
    }
}

/// A pair of counters, one per player slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    pub p1: u32,
    pub p2: u32,
}

impl Tally {
    pub const fn new(p1: u32, p2: u32) -> Self {
        Self { p1, p2 }
    }

    pub fn total(&self) -> u32 {
        self.p1 + self.p2
    }

    pub fn bump(&mut self, slot: PlayerSlot) {
        self[slot] += 1;
    }

    pub fn leader(&self) -> Option<PlayerSlot> {
        if self.p1 > self.p2 {
            Some(PlayerSlot::P1)
        } else if self.p2 > self.p1 {
            Some(PlayerSlot::P2)
        } else {
            None
        }
    }

    pub fn max(&self) -> u32 {
        self.p1.max(self.p2)
    }

    pub fn margin(&self) -> u32 {
        self.p1.abs_diff(self.p2)
    }
}

impl Index<PlayerSlot> for Tally {
    type Output = u32;

    fn index(&self, slot: PlayerSlot) -> &u32 {
        match slot {
            PlayerSlot::P1 => &self.p1,
            PlayerSlot::P2 => &self.p2,
        }
    }
}

impl IndexMut<PlayerSlot> for Tally {
    fn index_mut(&mut self, slot: PlayerSlot) -> &mut u32 {
        match slot {
            PlayerSlot::P1 => &mut self.p1,
            PlayerSlot::P2 => &mut self.p2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    #[default]
    BestOf3,
    BestOf5,
}

impl MatchFormat {
    pub fn from_best_of(best_of: u8) -> Option<Self> {
        match best_of {
            3 => Some(MatchFormat::BestOf3),
            5 => Some(MatchFormat::BestOf5),
            _ => None,
        }
    }

    pub fn required_sets(self) -> u32 {
        match self {
            MatchFormat::BestOf3 => 2,
            MatchFormat::BestOf5 => 3,
        }
    }

    pub fn max_sets(self) -> u32 {
        self.required_sets() * 2 - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TiebreakResult {
    pub loser: PlayerSlot,
    /// Points the set loser won in the tiebreak: the `5` in `7-6(5)`.
    pub loser_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletedSet {
    pub games: Tally,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak: Option<TiebreakResult>,
}

impl CompletedSet {
    pub fn winner(&self) -> Option<PlayerSlot> {
        self.games.leader()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineState {
    pub set_number: u32,
    pub games_in_set: Tally,
    pub sets_won: Tally,
    pub game_points: Tally,
    pub in_tiebreak: bool,
    pub tiebreak_points: Tally,
    pub tiebreak_start_server: PlayerSlot,
    pub completed_sets: Vec<CompletedSet>,
    /// Who serves the next point.
    pub server: PlayerSlot,
}

impl EngineState {
    pub fn new(server_seed: PlayerSlot) -> Self {
        Self {
            set_number: 1,
            games_in_set: Tally::default(),
            sets_won: Tally::default(),
            game_points: Tally::default(),
            in_tiebreak: false,
            tiebreak_points: Tally::default(),
            tiebreak_start_server: server_seed,
            completed_sets: Vec::new(),
            server: server_seed,
        }
    }

    pub fn is_match_done(&self, format: MatchFormat) -> bool {
        self.match_winner(format).is_some()
    }

    pub fn match_winner(&self, format: MatchFormat) -> Option<PlayerSlot> {
        let needed = format.required_sets();
        PlayerSlot::BOTH
            .into_iter()
            .find(|slot| self.sets_won[*slot] >= needed)
    }

    /// Server of the next point. Inside a tiebreak this is recomputed from the point tally
    /// rather than trusted from `server`.
    pub fn next_server(&self) -> PlayerSlot {
        if self.in_tiebreak {
            tiebreak_server_at(self.tiebreak_start_server, self.tiebreak_points.total())
        } else {
            self.server
        }
    }

    /// Points played so far in the live game or tiebreak.
    pub fn points_in_game(&self) -> u32 {
        if self.in_tiebreak {
            self.tiebreak_points.total()
        } else {
            self.game_points.total()
        }
    }

    fn score_tiebreak_point(&mut self, winner: PlayerSlot, format: MatchFormat) -> bool {
        let served_last = self.next_server();
        self.tiebreak_points.bump(winner);
        self.server = self.next_server();

        if !tiebreak_won(self.tiebreak_points) {
            return false;
        }

        let loser = winner.other();
        let mut games = Tally::default();
        games[winner] = 7;
        games[loser] = 6;
        self.completed_sets.push(CompletedSet {
            games,
            tiebreak: Some(TiebreakResult {
                loser,
                loser_points: self.tiebreak_points[loser],
            }),
        });
        self.sets_won.bump(winner);
        self.in_tiebreak = false;

        if !self.is_match_done(format) {
            self.start_next_set(served_last.other());
        }
        true
    }

    fn score_game_point(&mut self, winner: PlayerSlot, format: MatchFormat) -> bool {
        self.game_points.bump(winner);
        if !game_won(self.game_points) {
            return false;
        }

        self.games_in_set.bump(winner);
        self.game_points = Tally::default();
        self.server = self.server.other();

        if self.games_in_set == Tally::new(6, 6) {
            self.in_tiebreak = true;
            self.tiebreak_points = Tally::default();
            self.tiebreak_start_server = self.server;
            return false;
        }

        if !set_won(self.games_in_set) {
            return false;
        }

        self.completed_sets.push(CompletedSet {
            games: self.games_in_set,
            tiebreak: None,
        });
        self.sets_won.bump(winner);

        if !self.is_match_done(format) {
            self.start_next_set(self.server.other());
        }
        true
    }

    fn start_next_set(&mut self, server: PlayerSlot) {
        self.set_number += 1;
        self.games_in_set = Tally::default();
        self.game_points = Tally::default();
        self.in_tiebreak = false;
        self.tiebreak_points = Tally::default();
        self.server = server;
        self.tiebreak_start_server = server;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointOutcome {
    pub match_done: bool,
    pub set_won: bool,
}

/// Applies one point to `state` and returns the next snapshot.
///
/// Once either side holds the required number of sets the call is a no-op that reports
/// `match_done` and leaves the state untouched.
pub fn apply_point(
    state: &EngineState,
    winner: PlayerSlot,
    format: MatchFormat,
) -> (EngineState, PointOutcome) {
    if state.is_match_done(format) {
        return (
            state.clone(),
            PointOutcome {
                match_done: true,
                set_won: false,
            },
        );
    }

    let mut next = state.clone();
    let set_won = if next.in_tiebreak {
        next.score_tiebreak_point(winner, format)
    } else {
        next.score_game_point(winner, format)
    };
    let match_done = next.is_match_done(format);
    (next, PointOutcome { match_done, set_won })
}

/// Server of tiebreak point `index` (0-based): the starting server takes the first point
/// alone, then each player serves two in a row.
pub fn tiebreak_server_at(start: PlayerSlot, index: u32) -> PlayerSlot {
    if index == 0 {
        return start;
    }
    let block = (index - 1) / 2;
    if block % 2 == 0 { start.other() } else { start }
}

pub fn game_won(points: Tally) -> bool {
    points.max() >= 4 && points.margin() >= 2
}

pub fn tiebreak_won(points: Tally) -> bool {
    points.max() >= 7 && points.margin() >= 2
}

pub fn set_won(games: Tally) -> bool {
    games.max() >= 6 && games.margin() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_margin_and_leader() {
        let t = Tally::new(3, 5);
        assert_eq!(t.margin(), 2);
        assert_eq!(t.leader(), Some(PlayerSlot::P2));
        assert_eq!(Tally::new(2, 2).leader(), None);
    }

    #[test]
    fn game_rule_covers_deuce() {
        assert!(game_won(Tally::new(4, 0)));
        assert!(game_won(Tally::new(4, 2)));
        assert!(!game_won(Tally::new(4, 3)));
        assert!(!game_won(Tally::new(3, 3)));
        assert!(game_won(Tally::new(6, 8)));
    }

    #[test]
    fn set_rule_accepts_seven_five() {
        assert!(set_won(Tally::new(6, 4)));
        assert!(!set_won(Tally::new(6, 5)));
        assert!(set_won(Tally::new(7, 5)));
    }

    #[test]
    fn format_sets() {
        assert_eq!(MatchFormat::BestOf3.max_sets(), 3);
        assert_eq!(MatchFormat::BestOf5.max_sets(), 5);
        assert_eq!(MatchFormat::from_best_of(4), None);
    }
}
