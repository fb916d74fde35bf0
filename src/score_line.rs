use crate::scoring::{CompletedSet, Tally, TiebreakResult};

/// A match score string as shown on match cards, e.g. `7-6(5) 6-4 6-2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreDisplay {
    Sets(Vec<CompletedSet>),
    Unavailable { raw: Option<String> },
}

impl ScoreDisplay {
    pub fn from_score(score: Option<&str>) -> Self {
        match score.and_then(parse_score_line) {
            Some(sets) => ScoreDisplay::Sets(sets),
            None => ScoreDisplay::Unavailable {
                raw: score
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            },
        }
    }

    pub fn sets(&self) -> &[CompletedSet] {
        match self {
            ScoreDisplay::Sets(sets) => sets,
            ScoreDisplay::Unavailable { .. } => &[],
        }
    }
}

/// Parses space-separated sets. Returns `None` when any part is malformed. The parenthesised
/// tiebreak count belongs to the set loser; on a level set it is dropped.
pub fn parse_score_line(score: &str) -> Option<Vec<CompletedSet>> {
    let sets = score
        .split_whitespace()
        .map(parse_set)
        .collect::<Option<Vec<_>>>()?;
    if sets.is_empty() { None } else { Some(sets) }
}

fn parse_set(part: &str) -> Option<CompletedSet> {
    let (games_part, tiebreak_part) = match part.split_once('(') {
        Some((games, rest)) => (games, Some(rest.strip_suffix(')')?)),
        None => (part, None),
    };

    let (p1, p2) = games_part.split_once('-')?;
    let games = Tally::new(parse_count(p1)?, parse_count(p2)?);

    let tiebreak = match tiebreak_part {
        Some(raw) => {
            let loser_points = parse_count(raw)?;
            games.leader().map(|winner| TiebreakResult {
                loser: winner.other(),
                loser_points,
            })
        }
        None => None,
    };

    Some(CompletedSet { games, tiebreak })
}

fn parse_count(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

pub fn format_score_line(sets: &[CompletedSet]) -> String {
    sets.iter()
        .map(|set| match set.tiebreak {
            Some(tb) => format!("{}-{}({})", set.games.p1, set.games.p2, tb.loser_points),
            None => format!("{}-{}", set.games.p1, set.games.p2),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
