use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::grid::Point;

/// Estimate of the remaining cost between two nodes.
///
/// Must be non-negative and must never exceed the true shortest-path cost (admissible),
/// otherwise the first path found is no longer guaranteed to be a shortest one.
pub trait Heuristic<R> {
    fn estimate(&self, from: R, to: R) -> f64;
}

impl<R, F: Fn(R, R) -> f64> Heuristic<R> for F {
    fn estimate(&self, from: R, to: R) -> f64 {
        self(from, to)
    }
}

/// The distance metrics available for grids.
///
/// On a 4-connected grid with unit steps every move changes either the row or the column
/// by one, so the true cost is at least the Manhattan distance. Euclidean and Chebyshev
/// distances are never larger than Manhattan distance, which keeps all three admissible;
/// Manhattan is the tightest and therefore expands the fewest cells.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    #[default]
    Manhattan,
    Euclidean,
    Chebyshev,
}

impl Heuristic<Point> for Distance {
    fn estimate(&self, from: Point, to: Point) -> f64 {
        let dr = from.row.abs_diff(to.row) as f64;
        let dc = from.col.abs_diff(to.col) as f64;

        match self {
            Distance::Manhattan => dr + dc,
            Distance::Euclidean => (dr * dr + dc * dc).sqrt(),
            Distance::Chebyshev => dr.max(dc),
        }
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Distance::Manhattan => "manhattan",
                Distance::Euclidean => "euclidean",
                Distance::Chebyshev => "chebyshev",
            }
        )
    }
}

impl FromStr for Distance {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manhattan" => Ok(Distance::Manhattan),
            "euclidean" => Ok(Distance::Euclidean),
            "chebyshev" => Ok(Distance::Chebyshev),
            _ => Err(anyhow::anyhow!("Invalid heuristic: {}", s)),
        }
    }
}
