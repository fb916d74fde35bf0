use chrono::{Duration, TimeZone, Utc};
use tennis_tactics::points::{Point, script_points, winners_for_games};
use tennis_tactics::projection::{
    GameCall, MatchPlayers, SetCell, game_score, momentum, project, result_label,
};
use tennis_tactics::replay::replay_winners;
use tennis_tactics::scoring::{EngineState, MatchFormat, PlayerSlot, Tally};

use PlayerSlot::{P1, P2};

fn scripted(winners: &[PlayerSlot], format: MatchFormat) -> Vec<Point> {
    script_points(
        "pr",
        P1,
        format,
        winners,
        Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap(),
        Duration::seconds(30),
    )
}

fn level_games(n: usize) -> Vec<PlayerSlot> {
    let games: Vec<(PlayerSlot, u32)> = (0..n).flat_map(|_| [(P1, 0), (P2, 0)]).collect();
    winners_for_games(&games)
}

#[test]
fn fresh_match_projects_empty_board() {
    let state = EngineState::new(P1);
    let board = project(&state, &[], MatchFormat::BestOf3, 12);

    assert_eq!(board.set_number, 1);
    assert_eq!(board.game.get(P1), "0");
    assert_eq!(board.game.get(P2), "0");
    assert_eq!(board.server, P1);
    assert_eq!(board.match_winner, None);
    assert!(board.momentum.dots.is_empty());

    assert_eq!(board.columns.len(), 3);
    assert!(!board.columns[0].completed);
    assert_eq!(board.columns[0].get(P1).to_string(), "0");
    assert_eq!(board.columns[1].get(P1), SetCell::Pending);
    assert_eq!(board.columns[2].get(P2).to_string(), "—");
}

#[test]
fn best_of_five_shows_five_columns() {
    let state = EngineState::new(P2);
    let board = project(&state, &[], MatchFormat::BestOf5, 12);
    assert_eq!(board.columns.len(), 5);
}

#[test]
fn deuce_and_advantage_calls() {
    let players = MatchPlayers::new("Novak Djokovic", "Carlos Alcaraz");

    let state = replay_winners([P1, P2, P1, P2, P1, P2], P1, MatchFormat::BestOf3);
    let game = game_score(&state);
    assert_eq!((game.p1.as_str(), game.p2.as_str()), ("40", "40"));
    assert_eq!(game.call, Some(GameCall::Deuce));
    assert_eq!(game.call_label(&players).as_deref(), Some("Deuce"));

    let state = replay_winners([P1, P2, P1, P2, P1, P2, P2], P1, MatchFormat::BestOf3);
    let game = game_score(&state);
    assert_eq!((game.p1.as_str(), game.p2.as_str()), ("40", "Ad"));
    assert_eq!(
        game.call_label(&players).as_deref(),
        Some("Ad Carlos Alcaraz")
    );
}

#[test]
fn tiebreak_shows_raw_counts() {
    let mut winners = level_games(6);
    winners.extend([P1, P1, P2]);
    let state = replay_winners(winners, P1, MatchFormat::BestOf3);
    let board = project(&state, &[], MatchFormat::BestOf3, 12);

    assert!(board.game.tiebreak);
    assert_eq!(board.game.get(P1), "2");
    assert_eq!(board.game.get(P2), "1");
    assert_eq!(board.game.call, None);
    assert_eq!(board.games, Tally::new(6, 6));
    // P1 served point one, P2 serves points two and three, P1 serves next.
    assert_eq!(board.server, P1);
}

#[test]
fn finished_match_columns_and_result() {
    let mut winners = vec![P1; 24];
    winners.extend(level_games(6));
    winners.extend([P1, P2, P1, P2, P1, P2, P2, P2, P2, P2]);
    winners.extend(level_games(4));
    winners.extend(vec![P1; 8]);

    let state = replay_winners(winners, P1, MatchFormat::BestOf3);
    let board = project(&state, &[], MatchFormat::BestOf3, 12);
    let players = MatchPlayers::new("Jannik Sinner", "Alexander Zverev");

    assert_eq!(board.match_winner, Some(P1));
    assert_eq!(board.result_label(P1), "WINNER");
    assert_eq!(board.result_label(P2), "—");
    assert_eq!(board.winner_name(&players), Some("Jannik Sinner"));

    let cells: Vec<(String, String)> = board
        .columns
        .iter()
        .map(|c| (c.get(P1).to_string(), c.get(P2).to_string()))
        .collect();
    assert_eq!(
        cells,
        vec![
            ("6".to_string(), "0".to_string()),
            ("6(3)".to_string(), "7".to_string()),
            ("6".to_string(), "4".to_string()),
        ]
    );
    assert!(board.columns.iter().all(|c| c.completed));
    assert_eq!(board.columns[1].leader, Some(P2));
}

#[test]
fn straight_sets_leave_last_column_pending() {
    let state = replay_winners(vec![P2; 48], P1, MatchFormat::BestOf3);
    let board = project(&state, &[], MatchFormat::BestOf3, 12);
    assert_eq!(board.match_winner, Some(P2));
    assert!(board.columns[1].completed);
    assert_eq!(board.columns[2].get(P1), SetCell::Pending);
}

#[test]
fn momentum_keeps_most_recent_window() {
    let winners = winners_for_games(&[(P1, 2), (P2, 1), (P1, 0), (P2, 3)]);
    let points = scripted(&winners, MatchFormat::BestOf3);
    assert!(points.len() > 12);

    let m = momentum(&points, 12);
    assert_eq!(m.dots.len(), 12);
    assert_eq!(m.won.total(), 12);
    assert_eq!(
        m.dots.last().map(|d| d.point_id.as_str()),
        points.last().map(|p| p.id.as_str())
    );
    assert_eq!(m.dots[0].point_id, points[points.len() - 12].id);

    let short = momentum(&points[..3], 12);
    assert_eq!(short.dots.len(), 3);
}

#[test]
fn momentum_marks_points_won_on_serve() {
    let points = scripted(&[P1, P2, P1, P1, P1, P1], MatchFormat::BestOf3);
    let m = momentum(&points, 12);

    assert!(m.dots[0].served_by(P1));
    assert!(m.dots[0].won_on_serve());
    assert!(!m.dots[1].won_on_serve());
    // sixth point opens game two with P2 serving
    assert!(m.dots[4].served_by(P1));
    assert!(m.dots[5].served_by(P2));
    assert!(!m.dots[5].won_on_serve());
    assert_eq!(m.won, Tally::new(5, 1));
}

#[test]
fn result_label_marks_only_the_winner() {
    assert_eq!(result_label(Some(P2), P2), "WINNER");
    assert_eq!(result_label(Some(P2), P1), "—");
    assert_eq!(result_label(None, P1), "—");

    let board = project(&EngineState::new(P1), &[], MatchFormat::BestOf3, 12);
    assert_eq!(board.result_label(P1), result_label(None, P1));
}
