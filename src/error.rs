use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire training module.
pub type Result<T> = std::result::Result<T, TrainErr>;

/// The training module's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainErr {
    /// A caller-supplied argument violates a precondition.
    InvalidArgument(&'static str),
}

impl Display for TrainErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainErr::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl Error for TrainErr {}

/// Boundary conversion for binaries / I/O APIs.
impl From<TrainErr> for io::Error {
    fn from(value: TrainErr) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, value)
    }
}
