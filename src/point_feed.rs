use std::collections::BTreeSet;

use crate::points::Point;
use crate::projection::MatchPlayers;
use crate::scoring::PlayerSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointFilter {
    #[default]
    All,
    Set(u32),
}

impl PointFilter {
    /// All -> first set -> ... -> last set -> All.
    pub fn cycle(self, sets: &[u32]) -> Self {
        match self {
            PointFilter::All => sets.first().map_or(PointFilter::All, |s| PointFilter::Set(*s)),
            PointFilter::Set(current) => sets
                .iter()
                .find(|s| **s > current)
                .map_or(PointFilter::All, |s| PointFilter::Set(*s)),
        }
    }

    pub fn matches(self, point: &Point) -> bool {
        match self {
            PointFilter::All => true,
            PointFilter::Set(set) => point.set == set,
        }
    }

    pub fn label(self) -> String {
        match self {
            PointFilter::All => "All sets".to_string(),
            PointFilter::Set(set) => format!("Set {set}"),
        }
    }
}

pub fn available_sets(points: &[Point]) -> Vec<u32> {
    points
        .iter()
        .map(|p| p.set)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn filter_points(points: &[Point], filter: PointFilter) -> Vec<&Point> {
    points.iter().filter(|p| filter.matches(p)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    pub id: String,
    pub position: String,
    pub winner: PlayerSlot,
    pub winner_name: String,
    pub server_name: String,
    pub label: String,
    pub time_utc: String,
}

pub fn feed_rows(points: &[Point], filter: PointFilter, players: &MatchPlayers) -> Vec<FeedRow> {
    filter_points(points, filter)
        .into_iter()
        .map(|p| FeedRow {
            id: p.id.clone(),
            position: format!("Set {} • Game {} • Pt {}", p.set, p.game, p.point_index),
            winner: p.winner,
            winner_name: players.name(p.winner).to_string(),
            server_name: players.name(p.server).to_string(),
            label: if p.label.is_empty() {
                "Point".to_string()
            } else {
                p.label.clone()
            },
            time_utc: p.timestamp.format("%H:%M:%S").to_string(),
        })
        .collect()
}
