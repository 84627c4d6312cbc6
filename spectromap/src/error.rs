use std::fmt::{Display, Formatter};

/// Errors reported by the spectrogram and constellation stages.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The sample buffer does not fill a single analysis frame.
    InsufficientData { samples: usize, frame_size: usize },
    /// Log scaling was requested but the smallest energy value is not positive.
    Domain { minimum: f64 },
    /// A parameter is outside of its accepted range.
    InvalidArgument { name: &'static str, reason: String },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument { name, reason: reason.into() }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InsufficientData { samples, frame_size } => {
                write!(f, "Got {samples} samples, but at least {frame_size} are required for one frame")
            }
            Error::Domain { minimum } => {
                write!(f, "Cannot apply log scale: minimum energy is {minimum}, expected a positive value")
            }
            Error::InvalidArgument { name, reason } => write!(f, "Invalid argument `{name}`: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
