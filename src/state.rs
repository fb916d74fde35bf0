use std::collections::VecDeque;

use crate::catalog::MatchInfo;
use crate::point_feed::{FeedRow, PointFilter, available_sets, feed_rows};
use crate::points::Point;
use crate::projection::{MatchPlayers, Scoreboard, project};
use crate::scoring::{EngineState, MatchFormat};
use crate::simulation::Simulation;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Matches,
    Match { match_id: String },
}

/// A fully replayed view of one match, published after every change to its point list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSnapshot {
    pub match_id: String,
    pub format: MatchFormat,
    pub points: Vec<Point>,
    pub engine: EngineState,
    pub running: bool,
}

impl LiveSnapshot {
    pub fn from_simulation(match_id: impl Into<String>, sim: &Simulation) -> Self {
        Self {
            match_id: match_id.into(),
            format: sim.format(),
            points: sim.points().to_vec(),
            engine: sim.state().clone(),
            running: sim.is_enabled(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_match_done(self.format)
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    Snapshot(LiveSnapshot),
    SimStatus { match_id: String, running: bool },
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    Start,
    Stop,
    Toggle,
    Reset,
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub matches: Vec<MatchInfo>,
    pub selected: usize,
    pub live: Option<LiveSnapshot>,
    pub feed_filter: PointFilter,
    pub auto_scroll: bool,
    pub feed_scroll: usize,
    pub momentum_count: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(matches: Vec<MatchInfo>, momentum_count: usize) -> Self {
        Self {
            screen: Screen::Matches,
            matches,
            selected: 0,
            live: None,
            feed_filter: PointFilter::All,
            auto_scroll: true,
            feed_scroll: 0,
            momentum_count,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn selected_match(&self) -> Option<&MatchInfo> {
        self.matches.get(self.selected)
    }

    pub fn match_by_id(&self, id: &str) -> Option<&MatchInfo> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// The match shown on the detail screen, if any.
    pub fn open_match(&self) -> Option<&MatchInfo> {
        match &self.screen {
            Screen::Match { match_id } => self.match_by_id(match_id),
            Screen::Matches => None,
        }
    }

    pub fn open_players(&self) -> Option<MatchPlayers> {
        self.open_match().map(MatchInfo::players)
    }

    pub fn select_next(&mut self) {
        if self.matches.is_empty() {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(self.matches.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn enter_match(&mut self, match_id: impl Into<String>) {
        self.screen = Screen::Match {
            match_id: match_id.into(),
        };
        self.live = None;
        self.feed_filter = PointFilter::All;
        self.feed_scroll = 0;
        self.auto_scroll = true;
    }

    pub fn leave_match(&mut self) {
        self.screen = Screen::Matches;
        self.live = None;
    }

    pub fn scoreboard(&self) -> Option<Scoreboard> {
        let live = self.live.as_ref()?;
        Some(project(
            &live.engine,
            &live.points,
            live.format,
            self.momentum_count,
        ))
    }

    pub fn feed_sets(&self) -> Vec<u32> {
        self.live
            .as_ref()
            .map(|live| available_sets(&live.points))
            .unwrap_or_default()
    }

    pub fn feed_rows(&self) -> Vec<FeedRow> {
        let (Some(live), Some(players)) = (self.live.as_ref(), self.open_players()) else {
            return Vec::new();
        };
        feed_rows(&live.points, self.feed_filter, &players)
    }

    pub fn cycle_feed_filter(&mut self) {
        let sets = self.feed_sets();
        self.feed_filter = self.feed_filter.cycle(&sets);
        self.feed_scroll = 0;
    }

    pub fn toggle_auto_scroll(&mut self) {
        self.auto_scroll = !self.auto_scroll;
    }

    pub fn scroll_feed_down(&mut self) {
        let total = self.feed_rows().len();
        self.auto_scroll = false;
        self.feed_scroll = (self.feed_scroll + 1).min(total.saturating_sub(1));
    }

    pub fn scroll_feed_up(&mut self) {
        self.auto_scroll = false;
        self.feed_scroll = self.feed_scroll.saturating_sub(1);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Snapshot(snapshot) => {
            // Snapshots from a feed for a match that is no longer open are stale.
            let open = matches!(&state.screen, Screen::Match { match_id } if *match_id == snapshot.match_id);
            if !open {
                return;
            }
            if let PointFilter::Set(set) = state.feed_filter
                && !snapshot.points.iter().any(|p| p.set == set)
            {
                state.feed_filter = PointFilter::All;
                state.feed_scroll = 0;
            }
            state.live = Some(snapshot);
        }
        Delta::SimStatus { match_id, running } => {
            if let Some(live) = state.live.as_mut()
                && live.match_id == match_id
            {
                live.running = running;
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
