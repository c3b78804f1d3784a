/// Errors raised by the game core
///
/// Wall hits, body hits and stalls are not errors; they end the episode through
/// the normal [`StepOutcome`](super::StepOutcome).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// An action encoding that is not one of continue / turn right / turn left
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// A configuration the engine cannot run with
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    /// A hand-built state the engine refuses to adopt
    #[error("invalid game state: {0}")]
    InvalidState(String),

    /// Food had to be placed but the snake covers every cell
    #[error("no free cell left to place food")]
    BoardFull,
}
