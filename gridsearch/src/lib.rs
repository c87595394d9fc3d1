//! A* shortest-path search on 4-connected grids.
//!
//! ```
//! use gridsearch::{Distance, Grid, PathFinder, Point};
//!
//! let grid: Grid = "...\nX.X\n...\n".parse().unwrap();
//! let finder = PathFinder::new(&grid, Point::new(0, 0), Point::new(2, 2), Distance::Manhattan)
//!     .unwrap();
//! let (outcome, _) = finder.finish();
//! assert_eq!(outcome.path().unwrap().total_cost, 4);
//! ```

pub mod bfs;
pub mod config;
pub mod error;
pub mod find;
pub mod frontier;
pub mod grid;
pub mod heuristic;
pub mod ledger;
pub mod path;
pub mod space;
pub mod util;

pub use config::SearchConfig;
pub use error::{EndpointFault, SearchError};
pub use find::{
    find_path, Cancellation, NeverCancel, NodeStatus, PathFinder, PathResult, SearchOutcome,
    SearchState, SearchStats,
};
pub use frontier::Frontier;
pub use grid::{Cell, CellState, CellStorage, Grid, Point};
pub use heuristic::{Distance, Heuristic};
pub use ledger::{Score, ScoreLedger, UNREACHABLE};
pub use path::reconstruct;
pub use space::{NodeReference, NodeStorage, SearchSpace};
pub use util::{load_grid, parse_img};
