use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::points::{Point, script_points, winners_for_games};
use crate::projection::MatchPlayers;
use crate::scoring::{MatchFormat, PlayerSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tour {
    Atp,
    Wta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub id: String,
    pub tour: Tour,
    pub tournament_id: String,
    pub tournament_name: String,
    pub round: String,
    #[serde(default)]
    pub court: Option<String>,
    pub status: MatchStatus,
    pub start_time: DateTime<Utc>,
    pub p1: PlayerRef,
    pub p2: PlayerRef,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub winner_id: Option<String>,
    pub format: MatchFormat,
    #[serde(default)]
    pub live_points: Vec<Point>,
}

impl MatchInfo {
    pub fn players(&self) -> MatchPlayers {
        MatchPlayers::new(self.p1.name.clone(), self.p2.name.clone())
    }

    pub fn winner_slot(&self) -> Option<PlayerSlot> {
        let winner = self.winner_id.as_deref()?;
        if winner == self.p1.id {
            Some(PlayerSlot::P1)
        } else if winner == self.p2.id {
            Some(PlayerSlot::P2)
        } else {
            None
        }
    }

    pub fn has_live_feed(&self) -> bool {
        self.status == MatchStatus::Live && !self.live_points.is_empty()
    }
}

pub fn tour_label(tour: Tour) -> &'static str {
    match tour {
        Tour::Atp => "ATP",
        Tour::Wta => "WTA",
    }
}

pub fn status_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Upcoming => "UPCOMING",
        MatchStatus::Live => "LIVE",
        MatchStatus::Finished => "FINISHED",
    }
}

pub fn sample_matches() -> Vec<MatchInfo> {
    vec![
        MatchInfo {
            id: "m1".to_string(),
            tour: Tour::Atp,
            tournament_id: "australian-open".to_string(),
            tournament_name: "Australian Open".to_string(),
            round: "R1".to_string(),
            court: Some("Rod Laver Arena".to_string()),
            status: MatchStatus::Upcoming,
            start_time: utc(2026, 1, 31, 13, 0),
            p1: player("novak-djokovic", "Novak Djokovic"),
            p2: player("carlos-alcaraz", "Carlos Alcaraz"),
            score: None,
            winner_id: None,
            format: MatchFormat::BestOf5,
            live_points: Vec::new(),
        },
        MatchInfo {
            id: "m2".to_string(),
            tour: Tour::Wta,
            tournament_id: "doha".to_string(),
            tournament_name: "Doha".to_string(),
            round: "QF".to_string(),
            court: None,
            status: MatchStatus::Finished,
            start_time: utc(2026, 1, 31, 8, 0),
            p1: player("iga-swiatek", "Iga Świątek"),
            p2: player("aryna-sabalenka", "Aryna Sabalenka"),
            score: Some("6-4 6-3".to_string()),
            winner_id: Some("iga-swiatek".to_string()),
            format: MatchFormat::BestOf3,
            live_points: Vec::new(),
        },
        MatchInfo {
            id: "m3".to_string(),
            tour: Tour::Atp,
            tournament_id: "australian-open".to_string(),
            tournament_name: "Australian Open".to_string(),
            round: "R1".to_string(),
            court: Some("Margaret Court Arena".to_string()),
            status: MatchStatus::Live,
            start_time: utc(2026, 1, 31, 12, 30),
            p1: player("novak-djokovic", "Novak Djokovic"),
            p2: player("carlos-alcaraz", "Carlos Alcaraz"),
            score: Some("6-4 2-3".to_string()),
            winner_id: None,
            format: MatchFormat::BestOf3,
            live_points: live_history(utc(2026, 1, 31, 12, 31)),
        },
        MatchInfo {
            id: "m4".to_string(),
            tour: Tour::Wta,
            tournament_id: "doha".to_string(),
            tournament_name: "Doha".to_string(),
            round: "SF".to_string(),
            court: None,
            status: MatchStatus::Upcoming,
            start_time: utc(2026, 1, 31, 15, 0),
            p1: player("iga-swiatek", "Iga Świątek"),
            p2: player("aryna-sabalenka", "Aryna Sabalenka"),
            score: None,
            winner_id: None,
            format: MatchFormat::BestOf3,
            live_points: Vec::new(),
        },
        MatchInfo {
            id: "m5".to_string(),
            tour: Tour::Atp,
            tournament_id: "australian-open".to_string(),
            tournament_name: "Australian Open".to_string(),
            round: "R2".to_string(),
            court: None,
            status: MatchStatus::Finished,
            start_time: utc(2026, 1, 29, 9, 0),
            p1: player("jannik-sinner", "Jannik Sinner"),
            p2: player("alexander-zverev", "Alexander Zverev"),
            score: Some("7-6(5) 6-4 6-2".to_string()),
            winner_id: Some("jannik-sinner".to_string()),
            format: MatchFormat::BestOf5,
            live_points: Vec::new(),
        },
    ]
}

/// Point history for the live sample: 6-4 to P1, then 2-3 in the second set.
fn live_history(start: DateTime<Utc>) -> Vec<Point> {
    use PlayerSlot::{P1, P2};

    let games = [
        (P1, 1),
        (P2, 2),
        (P1, 3),
        (P2, 0),
        (P1, 2),
        (P1, 4),
        (P2, 1),
        (P1, 0),
        (P2, 3),
        (P1, 2),
        // second set
        (P2, 1),
        (P1, 0),
        (P2, 2),
        (P1, 3),
        (P2, 1),
    ];
    script_points(
        "m3",
        P1,
        MatchFormat::BestOf3,
        &winners_for_games(&games),
        start,
        Duration::seconds(40),
    )
}

fn player(id: &str, name: &str) -> PlayerRef {
    PlayerRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
