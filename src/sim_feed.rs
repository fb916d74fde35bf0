use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::scoring::{EngineState, MatchFormat};
use crate::simulation::{Simulation, TickOutcome};
use crate::state::{Delta, LiveSnapshot, SimCommand};

/// Runs the tick loop for one match on a dedicated thread. The thread is the only writer of the
/// point list; the UI receives complete snapshots over `tx`.
pub fn spawn_sim_feed(
    match_id: String,
    sim: Simulation,
    interval: Duration,
    tx: Sender<Delta>,
    cmd_rx: Receiver<SimCommand>,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("sim-{match_id}"))
        .spawn(move || run_feed(match_id, sim, interval, tx, cmd_rx))
        .context("simulation could not start")
}

fn run_feed(
    match_id: String,
    mut sim: Simulation,
    interval: Duration,
    tx: Sender<Delta>,
    cmd_rx: Receiver<SimCommand>,
) {
    let mut rng = rand::thread_rng();
    info!(%match_id, points = sim.points().len(), "simulation feed started");

    if tx
        .send(Delta::Snapshot(LiveSnapshot::from_simulation(&match_id, &sim)))
        .is_err()
    {
        return;
    }

    let mut last_tick = Instant::now();
    loop {
        let wait = interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        match cmd_rx.recv_timeout(wait) {
            Ok(SimCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(cmd) => {
                if !handle_command(&match_id, &mut sim, cmd, &tx) {
                    break;
                }
                continue;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        last_tick = Instant::now();
        if !sim.is_enabled() {
            continue;
        }

        let Some(tick) = sim.tick(&mut rng, Utc::now()) else {
            let _ = tx.send(Delta::SimStatus {
                match_id: match_id.clone(),
                running: false,
            });
            continue;
        };
        debug!(%match_id, id = %tick.point.id, winner = ?tick.point.winner, "simulated point");

        if tx
            .send(Delta::Snapshot(LiveSnapshot::from_simulation(&match_id, &sim)))
            .is_err()
        {
            break;
        }
        for line in tick_logs(&tick, sim.state(), sim.format()) {
            info!(%match_id, "{line}");
            let _ = tx.send(Delta::Log(line));
        }
    }

    info!(%match_id, "simulation feed stopped");
}

/// Returns false once the receiving side is gone.
fn handle_command(
    match_id: &str,
    sim: &mut Simulation,
    cmd: SimCommand,
    tx: &Sender<Delta>,
) -> bool {
    let log = match cmd {
        SimCommand::Start => {
            if sim.start() {
                "[INFO] Simulation started"
            } else {
                "[INFO] Match complete, simulation not started"
            }
        }
        SimCommand::Stop => {
            sim.stop();
            "[INFO] Simulation stopped"
        }
        SimCommand::Toggle => {
            if sim.toggle() {
                "[INFO] Simulation started"
            } else if sim.is_finished() {
                "[INFO] Match complete, simulation not started"
            } else {
                "[INFO] Simulation stopped"
            }
        }
        SimCommand::Reset => {
            sim.reset();
            "[INFO] Simulation reset to recorded points"
        }
        SimCommand::Shutdown => return false,
    };
    debug!(%match_id, ?cmd, enabled = sim.is_enabled(), "simulation command");

    let _ = tx.send(Delta::Log(log.to_string()));
    tx.send(Delta::Snapshot(LiveSnapshot::from_simulation(match_id, sim)))
        .is_ok()
}

fn tick_logs(tick: &TickOutcome, state: &EngineState, format: MatchFormat) -> Vec<String> {
    let mut lines = Vec::new();
    if tick.outcome.set_won
        && let Some(set) = state.completed_sets.last()
    {
        lines.push(format!(
            "[INFO] Set {} to {}: {}-{}",
            state.completed_sets.len(),
            tick.point.winner.label(),
            set.games.p1,
            set.games.p2
        ));
    }
    if tick.outcome.match_done
        && let Some(winner) = state.match_winner(format)
    {
        lines.push(format!("[ALERT] Match to {}", winner.label()));
    }
    lines
}
