use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing")]
    MissingVariable(&'static str),

    #[error("environment variable {name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("review API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("review API returned status {0}")]
    NonSuccessStatus(u16),

    #[error("review API response is not valid JSON: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("not a mapping")]
    NotAMapping,

    #[error("missing homeworks key")]
    MissingHomeworks,

    #[error("homeworks not a list")]
    HomeworksNotAList,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("malformed homework record: {0}")]
    MalformedRecord(&'static str),

    #[error("unknown homework status {0:?}")]
    UnknownStatus(String),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("chat request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("chat API rejected message (status {status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Coarse classification of a cycle failure, used to decide whether a
/// repeated failure is "the same" one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    NonSuccessStatus,
    Decode,
    Shape,
    MalformedRecord,
    UnknownStatus,
}

/// Anything that makes a poll cycle fail. None of these stop the loop.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl CycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CycleError::Fetch(FetchError::Transport(_)) => ErrorKind::Transport,
            CycleError::Fetch(FetchError::NonSuccessStatus(_)) => ErrorKind::NonSuccessStatus,
            CycleError::Fetch(FetchError::Decode(_)) => ErrorKind::Decode,
            CycleError::Shape(_) => ErrorKind::Shape,
            CycleError::Format(FormatError::MalformedRecord(_)) => ErrorKind::MalformedRecord,
            CycleError::Format(FormatError::UnknownStatus(_)) => ErrorKind::UnknownStatus,
        }
    }
}
