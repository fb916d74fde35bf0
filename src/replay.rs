use crate::points::Point;
use crate::scoring::{EngineState, MatchFormat, PlayerSlot, apply_point};

/// Rebuilds engine state from scratch. This is the only source of truth for the current
/// score: it never reads cached state, and points after the deciding one are ignored.
pub fn replay(points: &[Point], server_seed: PlayerSlot, format: MatchFormat) -> EngineState {
    replay_winners(points.iter().map(|p| p.winner), server_seed, format)
}

pub fn replay_winners<I>(winners: I, server_seed: PlayerSlot, format: MatchFormat) -> EngineState
where
    I: IntoIterator<Item = PlayerSlot>,
{
    let mut state = EngineState::new(server_seed);
    for winner in winners {
        if state.is_match_done(format) {
            break;
        }
        state = apply_point(&state, winner, format).0;
    }
    state
}

/// Seed server for a replay: the recorded server of the last historical point, else `P1`.
pub fn server_seed(points: &[Point]) -> PlayerSlot {
    points.last().map(|p| p.server).unwrap_or(PlayerSlot::P1)
}
