use thiserror::Error;

/// Errors surfaced by the game engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A direction string outside the four allowed symbols reached the
    /// parsing boundary. Engine APIs take [`Direction`](super::Direction)
    /// directly, so this only occurs when mapping host input.
    #[error("invalid direction `{0}`, expected one of left/right/up/down")]
    InvalidDirection(String),

    /// No free cell is left to place food on. During play this is the
    /// win condition, not a failure.
    #[error("no valid food position left on the board")]
    NoValidFoodPosition,

    /// A start configuration name that matches no preset.
    #[error("unknown start configuration `{0}`")]
    UnknownStartConfig(String),
}
