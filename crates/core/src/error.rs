/// Result alias that carries the custom [`LyricStudioError`] type.
pub type Result<T> = std::result::Result<T, LyricStudioError>;

/// Common error type for the core crate.
///
/// Nothing in here is fatal to the process: every variant degrades a single
/// user action and leaves prior state intact. Callers surface the message
/// through the one active status channel and carry on.
#[derive(Debug, thiserror::Error)]
pub enum LyricStudioError {
    /// An upload or argument failed validation (wrong file type, index out of
    /// range). The operation is aborted with no state change.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Every line of the raw lyric text already carries a timestamp.
    #[error("no more lines to sync")]
    NoMoreLines,
    /// An imported track could not be parsed. Existing state is untouched.
    #[error("failed to parse synced lyrics: {0}")]
    ParseFailure(#[from] serde_json::Error),
    /// A search was requested with a blank term.
    #[error("please enter a search term")]
    EmptyQuery,
    /// A search term matched nothing in the synced track.
    #[error("no matching lyrics found")]
    NoMatches,
    /// Neither rendering backend could be obtained. Composition skips the
    /// current tick and retries on the next one.
    #[error("no rendering surface available: {0}")]
    SurfaceUnavailable(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl LyricStudioError {
    /// Creates an [`InvalidInput`](Self::InvalidInput) error from any
    /// displayable message.
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }
}
