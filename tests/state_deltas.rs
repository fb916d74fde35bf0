use tennis_tactics::catalog::sample_matches;
use tennis_tactics::point_feed::PointFilter;
use tennis_tactics::scoring::{MatchFormat, PlayerSlot, Tally};
use tennis_tactics::simulation::Simulation;
use tennis_tactics::state::{AppState, Delta, LiveSnapshot, Screen, apply_delta};

fn app() -> AppState {
    AppState::new(sample_matches(), 12)
}

fn live_snapshot(state: &AppState, id: &str) -> LiveSnapshot {
    let m = state.match_by_id(id).expect("sample match exists");
    let sim = Simulation::new(m.live_points.clone(), MatchFormat::BestOf3, false);
    LiveSnapshot::from_simulation(id, &sim)
}

#[test]
fn snapshot_for_closed_match_is_ignored() {
    let mut state = app();
    let snapshot = live_snapshot(&state, "m3");

    apply_delta(&mut state, Delta::Snapshot(snapshot.clone()));
    assert!(state.live.is_none());

    state.enter_match("m1");
    apply_delta(&mut state, Delta::Snapshot(snapshot));
    assert!(state.live.is_none());
}

#[test]
fn snapshot_for_open_match_drives_scoreboard() {
    let mut state = app();
    let snapshot = live_snapshot(&state, "m3");
    state.enter_match("m3");
    apply_delta(&mut state, Delta::Snapshot(snapshot));

    let board = state.scoreboard().expect("live match has a scoreboard");
    assert_eq!(board.sets, Tally::new(1, 0));
    assert_eq!(board.games, Tally::new(2, 3));
    assert_eq!(board.momentum.dots.len(), 12);
    assert_eq!(board.columns[0].get(PlayerSlot::P1).to_string(), "6");
}

#[test]
fn feed_rows_use_player_names() {
    let mut state = app();
    let snapshot = live_snapshot(&state, "m3");
    let total = snapshot.points.len();
    state.enter_match("m3");
    apply_delta(&mut state, Delta::Snapshot(snapshot));

    let rows = state.feed_rows();
    assert_eq!(rows.len(), total);
    assert_eq!(rows[0].position, "Set 1 • Game 1 • Pt 1");
    assert_eq!(rows[0].server_name, "Novak Djokovic");
    assert_eq!(rows[0].time_utc, "12:31:00");
}

#[test]
fn feed_filter_cycles_through_played_sets() {
    let mut state = app();
    let snapshot = live_snapshot(&state, "m3");
    state.enter_match("m3");
    apply_delta(&mut state, Delta::Snapshot(snapshot));

    assert_eq!(state.feed_sets(), vec![1, 2]);
    state.cycle_feed_filter();
    assert_eq!(state.feed_filter, PointFilter::Set(1));
    let set_one = state.feed_rows().len();
    state.cycle_feed_filter();
    assert_eq!(state.feed_filter, PointFilter::Set(2));
    assert_eq!(set_one + state.feed_rows().len(), state.live.as_ref().unwrap().points.len());
    state.cycle_feed_filter();
    assert_eq!(state.feed_filter, PointFilter::All);
}

#[test]
fn filter_resets_when_its_set_disappears() {
    let mut state = app();
    let mut snapshot = live_snapshot(&state, "m3");
    state.enter_match("m3");
    apply_delta(&mut state, Delta::Snapshot(snapshot.clone()));
    state.feed_filter = PointFilter::Set(2);

    snapshot.points.retain(|p| p.set == 1);
    apply_delta(&mut state, Delta::Snapshot(snapshot));
    assert_eq!(state.feed_filter, PointFilter::All);
}

#[test]
fn sim_status_updates_only_matching_match() {
    let mut state = app();
    let snapshot = live_snapshot(&state, "m3");
    state.enter_match("m3");
    apply_delta(&mut state, Delta::Snapshot(snapshot));
    assert!(!state.live.as_ref().unwrap().running);

    apply_delta(
        &mut state,
        Delta::SimStatus {
            match_id: "m1".to_string(),
            running: true,
        },
    );
    assert!(!state.live.as_ref().unwrap().running);

    apply_delta(
        &mut state,
        Delta::SimStatus {
            match_id: "m3".to_string(),
            running: true,
        },
    );
    assert!(state.live.as_ref().unwrap().running);
}

#[test]
fn logs_are_capped() {
    let mut state = app();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}

#[test]
fn navigation_enters_and_leaves_matches() {
    let mut state = app();
    state.select_prev();
    assert_eq!(state.selected, 0);
    for _ in 0..10 {
        state.select_next();
    }
    assert_eq!(state.selected, state.matches.len() - 1);

    state.enter_match("m3");
    assert_eq!(
        state.screen,
        Screen::Match {
            match_id: "m3".to_string()
        }
    );
    assert_eq!(state.open_match().map(|m| m.id.as_str()), Some("m3"));
    state.toggle_auto_scroll();
    assert!(!state.auto_scroll);

    state.leave_match();
    assert_eq!(state.screen, Screen::Matches);
    assert!(state.live.is_none());
    assert!(state.scoreboard().is_none());
    assert!(state.feed_rows().is_empty());
}

#[test]
fn scrolling_the_feed_disables_auto_scroll() {
    let mut state = app();
    let snapshot = live_snapshot(&state, "m3");
    state.enter_match("m3");
    apply_delta(&mut state, Delta::Snapshot(snapshot));

    state.scroll_feed_up();
    assert!(!state.auto_scroll);
    assert_eq!(state.feed_scroll, 0);
    state.scroll_feed_down();
    state.scroll_feed_down();
    assert_eq!(state.feed_scroll, 2);
}
