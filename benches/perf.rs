use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use tennis_tactics::points::{Point, script_points, winners_for_games};
use tennis_tactics::projection::project;
use tennis_tactics::replay::{replay, server_seed};
use tennis_tactics::scoring::{MatchFormat, PlayerSlot};

/// A five-set match where every set goes to a tiebreak: roughly 400 points.
fn long_match() -> Vec<Point> {
    use PlayerSlot::{P1, P2};

    let mut winners = Vec::new();
    for set in 0..5 {
        let games: Vec<(PlayerSlot, u32)> = (0..6).flat_map(|_| [(P1, 3), (P2, 2)]).collect();
        winners.extend(winners_for_games(&games));
        let set_winner = if set % 2 == 0 { P1 } else { P2 };
        for _ in 0..6 {
            winners.push(set_winner.other());
            winners.push(set_winner);
        }
        winners.extend([set_winner, set_winner]);
    }

    script_points(
        "bench",
        P1,
        MatchFormat::BestOf5,
        &winners,
        Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap(),
        Duration::seconds(35),
    )
}

fn bench_replay(c: &mut Criterion) {
    let points = long_match();
    let seed = server_seed(&points);
    c.bench_function("replay_five_set_match", |b| {
        b.iter(|| {
            let state = replay(black_box(&points), seed, MatchFormat::BestOf5);
            black_box(state.sets_won);
        })
    });
}

fn bench_project(c: &mut Criterion) {
    let points = long_match();
    let state = replay(&points, server_seed(&points), MatchFormat::BestOf5);
    c.bench_function("project_scoreboard", |b| {
        b.iter(|| {
            let board = project(black_box(&state), &points, MatchFormat::BestOf5, 12);
            black_box(board.columns.len());
        })
    });
}

criterion_group!(benches, bench_replay, bench_project);
criterion_main!(benches);
