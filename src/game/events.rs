use super::engine::GameState;

/// Notifications the engine emits toward its host
///
/// The host shell (renderer, leaderboard, UI chrome) implements whichever
/// methods it cares about; all default to no-ops. The engine never reads
/// anything back through this trait.
pub trait GameEvents {
    /// The score changed, including the reset to 0 on a (re)start
    fn on_score_changed(&mut self, _score: u32) {}

    /// The game ended with this final score
    fn on_game_over(&mut self, _final_score: u32) {}

    /// The lifecycle state machine moved to a new state
    fn on_state_changed(&mut self, _state: GameState) {}
}

/// Event sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEvents;

impl GameEvents for NullEvents {}
