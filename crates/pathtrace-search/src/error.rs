use std::fmt;

use pathtrace_core::Point;

/// Errors from stepper construction and stepping.
///
/// An exhausted frontier (no path exists) is *not* an error: it is the
/// [`Status::Exhausted`](crate::Status::Exhausted) terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// A start or end coordinate lies outside the grid or on an obstacle.
    InvalidCoordinate(Point),
    /// `step` was called after the search had already terminated.
    InvalidState,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate(p) => {
                write!(f, "endpoint {p} is out of bounds or on an obstacle")
            }
            Self::InvalidState => write!(f, "step called after the search terminated"),
        }
    }
}

impl std::error::Error for SearchError {}

/// The string did not name a known [`Algorithm`](crate::Algorithm).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlgorithmError(pub(crate) String);

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown algorithm \u{201c}{}\u{201d}", self.0)
    }
}

impl std::error::Error for ParseAlgorithmError {}
