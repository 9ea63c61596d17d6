use thiserror::Error;

/// A drawing intent that does not apply in the current state.
///
/// These are protocol violations from the map surface, not user-facing
/// failures; callers log and ignore them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DrawingError {
    #[error("A drawing session is already in progress")]
    AlreadyCapturing,

    #[error("No drawing session is in progress")]
    NotCapturing,

    #[error("A polygon holds at most {max} points")]
    PointLimit { max: usize },

    #[error("A polygon needs at least {min} points, found {found}")]
    TooFewPoints { min: usize, found: usize },
}
