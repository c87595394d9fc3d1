use std::fmt::Display;

use thiserror::Error;

/// Failures that are detected before a grid or a search is allowed to exist.
///
/// A search that simply finds no route is not an error, see
/// [`SearchOutcome`](crate::SearchOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid grid dimension {rows}x{columns}, both must be at least 1 and the cell count must fit in usize")]
    InvalidDimension { rows: usize, columns: usize },

    #[error("invalid search endpoints: {0}")]
    InvalidEndpoints(EndpointFault),
}

/// What is wrong with the requested start and goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFault {
    /// start or goal lies outside the search space
    OutOfBounds,
    /// start and goal are the same node
    Identical,
    /// start or goal is currently impassable
    Impassable,
}

impl Display for EndpointFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EndpointFault::OutOfBounds => "start or goal is outside the grid",
                EndpointFault::Identical => "start and goal are the same cell",
                EndpointFault::Impassable => "start or goal is a barrier",
            }
        )
    }
}
