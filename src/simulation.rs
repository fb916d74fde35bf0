use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::points::Point;
use crate::replay::{replay, server_seed};
use crate::scoring::{EngineState, MatchFormat, PlayerSlot, PointOutcome, apply_point};

pub const SERVER_WIN_PROBABILITY: f64 = 0.58;

pub const POINT_LABELS: [&str; 11] = [
    "Ace (T)",
    "Ace (wide)",
    "Double fault",
    "Forehand winner",
    "Backhand winner",
    "Unforced error",
    "Forced error",
    "Serve +1 winner",
    "Volley winner",
    "Return winner",
    "Long rally won",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub point: Point,
    pub outcome: PointOutcome,
}

/// Owns one match's point list. Every mutation re-derives `state` by replaying the full list.
#[derive(Debug, Clone)]
pub struct Simulation {
    initial: Vec<Point>,
    points: Vec<Point>,
    seed: PlayerSlot,
    format: MatchFormat,
    enabled: bool,
    state: EngineState,
}

impl Simulation {
    /// A decided match never starts enabled.
    pub fn new(initial: Vec<Point>, format: MatchFormat, enabled: bool) -> Self {
        let seed = server_seed(&initial);
        let state = replay(&initial, seed, format);
        let enabled = enabled && !state.is_match_done(format);
        Self {
            points: initial.clone(),
            initial,
            seed,
            format,
            enabled,
            state,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn format(&self) -> MatchFormat {
        self.format
    }

    pub fn server_seed(&self) -> PlayerSlot {
        self.seed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_match_done(self.format)
    }

    /// Returns false when the match is already decided.
    pub fn start(&mut self) -> bool {
        if self.is_finished() {
            self.enabled = false;
            return false;
        }
        self.enabled = true;
        true
    }

    pub fn stop(&mut self) {
        self.enabled = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.enabled {
            self.stop();
            false
        } else {
            self.start()
        }
    }

    /// Drops every simulated point and stops the simulation.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.points = self.initial.clone();
        self.state = replay(&self.points, self.seed, self.format);
    }

    /// Generates at most one point. Does nothing while disabled or once the match is over.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Option<TickOutcome> {
        if !self.enabled {
            return None;
        }
        let current = replay(&self.points, self.seed, self.format);
        if current.is_match_done(self.format) {
            self.state = current;
            self.enabled = false;
            return None;
        }

        let server = current.next_server();
        let winner = if rng.gen_bool(SERVER_WIN_PROBABILITY) {
            server
        } else {
            server.other()
        };
        let label = POINT_LABELS.choose(rng).copied().unwrap_or("Point");
        self.append_point(winner, label, now)
    }

    /// Appends a point won by `winner` regardless of the enabled flag.
    pub fn append_point(
        &mut self,
        winner: PlayerSlot,
        label: &str,
        now: DateTime<Utc>,
    ) -> Option<TickOutcome> {
        let current = replay(&self.points, self.seed, self.format);
        if current.is_match_done(self.format) {
            self.state = current;
            return None;
        }

        let id = format!("sim-{}-{}", now.timestamp_millis(), self.points.len() + 1);
        let point = Point::at_state(id, &current, winner, label, now);
        let (_, outcome) = apply_point(&current, winner, self.format);

        self.points.push(point.clone());
        self.state = replay(&self.points, self.seed, self.format);
        if outcome.match_done {
            self.enabled = false;
        }

        Some(TickOutcome { point, outcome })
    }
}
