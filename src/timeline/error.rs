use thiserror::Error;

/// Failures surfaced by the timeline controller.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Form input rejected before any store call
    #[error("{0}")]
    Validation(String),
    #[error("Event store error: {0:#}")]
    Store(#[source] anyhow::Error),
    #[error("Event {0} is not on the displayed day")]
    NotFound(String),
    #[error("Invalid timeline settings: {0}")]
    Config(String),
}

pub type TimelineResult<T> = Result<T, TimelineError>;
