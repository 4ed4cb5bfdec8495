//! Error types for every stage of the place list pipeline.

use thiserror::Error;

/// Maximum number of place names accepted in one batch.
pub const MAX_ENTRIES: usize = 50;

/// Rejections from the input parser. Recoverable by editing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("enter at least one place name")]
    EmptyInput,

    #[error("too many places ({count}), limit is {max} per search")]
    TooManyEntries { count: usize, max: usize },
}

/// Why a single place name could not be resolved.
///
/// These never abort a batch; they are stored inside the failed
/// [`PlaceRecord`](crate::models::PlaceRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("request timed out")]
    Timeout,

    #[error("place not found")]
    NotFound,

    #[error("HTTP error {0}")]
    Http(u16),

    /// Backend answered with a status other than "ok" or "zero results".
    #[error("API error: {0}")]
    Api(String),

    #[error("{0}")]
    Network(String),
}

impl ResolveError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResolveError::Timeout
        } else {
            ResolveError::Network(format!("{:#}", err))
        }
    }
}

/// Failures of a save or load against the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("enter a name for the list")]
    EmptyListName,

    #[error("no places to save, find some places first")]
    NothingToSave,

    #[error("storage API key is not configured")]
    NotConfigured,

    #[error("list not found")]
    NotFound,

    #[error("invalid list data: {0}")]
    InvalidPayload(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for PersistError {
    fn from(err: reqwest::Error) -> Self {
        PersistError::Network(format!("{:#}", err))
    }
}

/// Illegal quiz transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("quiz mode is not active")]
    Inactive,

    #[error("need at least {needed} places for the quiz, found {found}")]
    NotEnoughPlaces { found: usize, needed: usize },

    #[error("this question has already been answered")]
    AlreadyAnswered,

    #[error("answer the current question first")]
    Unanswered,

    #[error("no option {0} in this question")]
    NoSuchOption(usize),

    #[error("labels stay hidden during the quiz")]
    LabelsHidden,
}

/// User-facing controls that can be disabled while an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Find,
    Save,
    Load,
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Control::Find => write!(f, "find"),
            Control::Save => write!(f, "save"),
            Control::Load => write!(f, "load"),
        }
    }
}

/// Error returned by [`Session::dispatch`](crate::session::Session::dispatch).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("{0} is already running")]
    Busy(Control),

    #[error("no marker {0}")]
    NoSuchMarker(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
