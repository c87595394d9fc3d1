use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::{EndpointFault, SearchError};
use crate::frontier::Frontier;
use crate::grid::{Grid, Point};
use crate::heuristic::Heuristic;
use crate::ledger::{Score, ScoreLedger};
use crate::space::{NodeStorage, SearchSpace};

/// What the search has done with a node, kept for visualization only
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NodeStatus {
    #[default]
    Unvisited,
    /// entered the frontier at some point
    Open,
    /// expanded (never set for the start)
    Closed,
}

#[derive(Debug, PartialEq, Clone, Eq, Serialize, Deserialize)]
pub struct PathResult<R> {
    /// every node from start to goal, both included
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    /// number of steps, `path.len() - 1`
    pub total_cost: usize,
}

/// How a search ended. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<R> {
    PathFound(PathResult<R>),
    /// the frontier ran dry, start and goal are not connected
    Exhausted,
    /// the cancellation signal was raised before the goal was reached
    Cancelled,
}

impl<R> SearchOutcome<R> {
    pub fn path(&self) -> Option<&PathResult<R>> {
        match self {
            SearchOutcome::PathFound(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState<R> {
    Running,
    Done(SearchOutcome<R>),
}

impl<R> SearchState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, SearchState::Running)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// nodes popped from the frontier, the final pop of the goal included
    pub iterations: usize,
    /// nodes marked closed
    pub expanded: usize,
    /// successful g-score improvements
    pub relaxations: usize,
    pub max_frontier: usize,
}

/// A cooperative stop request, polled once per iteration.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// Never asks the search to stop
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl Cancellation for std::cell::Cell<bool> {
    fn is_cancelled(&self) -> bool {
        self.get()
    }
}

impl<F: Fn() -> bool> Cancellation for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// A single A* search from `start` to `goal`.
///
/// The finder borrows the space for its whole lifetime, so passability cannot change
/// while a search is in progress. It can be driven one iteration at a time with
/// [`PathFinder::step`] or to completion with [`PathFinder::run`] / [`PathFinder::finish`].
pub struct PathFinder<'m, M: SearchSpace, H> {
    space: &'m M,
    heuristic: H,
    start: M::Reference,
    goal: M::Reference,
    ledger: ScoreLedger<M::Reference, M::Storage<Score<M::Reference>>>,
    frontier: Frontier<M::Reference, M::Storage<Option<u64>>>,
    status: M::Storage<NodeStatus>,
    state: SearchState<M::Reference>,
    stats: SearchStats,
}

impl<'m, M: SearchSpace, H: Heuristic<M::Reference>> PathFinder<'m, M, H> {
    /// Validate the endpoints and set up the start node.
    ///
    /// Fails if either endpoint is outside the space or impassable, or if they are the
    /// same node. Nothing is allocated unless the endpoints are valid.
    pub fn new(
        space: &'m M,
        start: M::Reference,
        goal: M::Reference,
        heuristic: H,
    ) -> Result<Self, SearchError> {
        if !space.contains(start) || !space.contains(goal) {
            return Err(SearchError::InvalidEndpoints(EndpointFault::OutOfBounds));
        }
        if start == goal {
            return Err(SearchError::InvalidEndpoints(EndpointFault::Identical));
        }
        if !space.is_passable(start) || !space.is_passable(goal) {
            return Err(SearchError::InvalidEndpoints(EndpointFault::Impassable));
        }

        let estimate = heuristic.estimate(start, goal);
        let ledger = ScoreLedger::new(
            space.create_storage::<Score<M::Reference>>(),
            start,
            estimate,
        );
        let mut frontier = Frontier::new(space.create_storage::<Option<u64>>());
        frontier.push(start, estimate);

        debug!("searching {:?} -> {:?}, estimate {}", start, goal, estimate);

        Ok(Self {
            space,
            heuristic,
            start,
            goal,
            ledger,
            frontier,
            status: space.create_storage::<NodeStatus>(),
            state: SearchState::Running,
            stats: SearchStats {
                max_frontier: 1,
                ..Default::default()
            },
        })
    }

    /// Run to completion without observer or cancellation.
    ///
    /// Returns the outcome together with the per-node status table.
    pub fn finish(mut self) -> (SearchOutcome<M::Reference>, M::Storage<NodeStatus>) {
        let outcome = self.run(|| {}, &NeverCancel);
        (outcome, self.status)
    }

    /// Step until the search ends.
    ///
    /// After every iteration that did not end the search, `observer` is called and then
    /// `cancel` is polled; a raised signal ends the search as [`SearchOutcome::Cancelled`].
    pub fn run<C: Cancellation + ?Sized>(
        &mut self,
        mut observer: impl FnMut(),
        cancel: &C,
    ) -> SearchOutcome<M::Reference> {
        self.run_with(|_| observer(), cancel)
    }

    /// Same as [`PathFinder::run`], but the observer gets to inspect the finder, for
    /// example to render [`PathFinder::status_table`] after every iteration.
    pub fn run_with<C: Cancellation + ?Sized>(
        &mut self,
        mut observer: impl FnMut(&Self),
        cancel: &C,
    ) -> SearchOutcome<M::Reference> {
        loop {
            if let SearchState::Done(outcome) = self.step() {
                return outcome.clone();
            }

            observer(self);

            if cancel.is_cancelled() {
                debug!("search cancelled after {} iterations", self.stats.iterations);
                self.state = SearchState::Done(SearchOutcome::Cancelled);
                return SearchOutcome::Cancelled;
            }
        }
    }

    /// Perform exactly one iteration: pop the best node, stop if it is the goal,
    /// otherwise relax its neighbors and close it.
    ///
    /// Neighbors are visited in the order the space yields them, which together with
    /// the frontier's insertion sequence fixes the result among equally short paths.
    ///
    /// Once the search is done this returns the final state without doing anything.
    pub fn step(&mut self) -> &SearchState<M::Reference> {
        if self.state.is_done() {
            return &self.state;
        }

        let Some(current) = self.frontier.pop() else {
            debug!(
                "no path {:?} -> {:?}, frontier exhausted after {} iterations",
                self.start, self.goal, self.stats.iterations
            );
            self.state = SearchState::Done(SearchOutcome::Exhausted);
            return &self.state;
        };
        self.stats.iterations += 1;

        if current == self.goal {
            let total_cost = self.ledger.g(current);
            debug!(
                "found path {:?} -> {:?}: cost={} iterations={} expanded={}",
                self.start, self.goal, total_cost, self.stats.iterations, self.stats.expanded
            );

            self.state = SearchState::Done(SearchOutcome::PathFound(PathResult {
                path: self.ledger.path_to(current),
                start: self.start,
                goal: self.goal,
                total_cost,
            }));
            return &self.state;
        }

        let space = self.space;
        let g = self.ledger.g(current);
        for neighbor in space.neighbors_of(current) {
            let estimate = self.heuristic.estimate(neighbor, self.goal);
            if !self.ledger.relax(neighbor, current, g + 1, estimate) {
                continue;
            }
            self.stats.relaxations += 1;

            // an already queued neighbor is requeued so its priority follows the better g
            self.frontier.push(neighbor, self.ledger.f(neighbor));
            *self.status.get_mut(neighbor) = NodeStatus::Open;
        }
        self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.high_water());

        if current != self.start {
            *self.status.get_mut(current) = NodeStatus::Closed;
            self.stats.expanded += 1;
        }

        trace!(
            "expanded {:?} g={} frontier={}",
            current,
            g,
            self.frontier.len()
        );

        &self.state
    }

    pub fn state(&self) -> &SearchState<M::Reference> {
        &self.state
    }

    pub fn ledger(&self) -> &ScoreLedger<M::Reference, M::Storage<Score<M::Reference>>> {
        &self.ledger
    }

    pub fn status(&self, node: M::Reference) -> NodeStatus {
        self.status.get(node)
    }

    /// Status of every node, as [`PathFinder::finish`] returns it at the end
    pub fn status_table(&self) -> &M::Storage<NodeStatus> {
        &self.status
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn start(&self) -> M::Reference {
        self.start
    }

    pub fn goal(&self) -> M::Reference {
        self.goal
    }
}

/// Search a grid with the given configuration and return the outcome.
///
/// `config.max_iterations`, when set, cancels the search after that many iterations.
pub fn find_path(
    grid: &Grid,
    start: Point,
    goal: Point,
    config: &SearchConfig,
) -> Result<SearchOutcome<Point>, SearchError> {
    let mut finder = PathFinder::new(grid, start, goal, config.heuristic)?;

    let outcome = match config.max_iterations {
        Some(limit) => {
            let iterations = std::cell::Cell::new(0usize);
            finder.run(
                || iterations.set(iterations.get() + 1),
                &|| iterations.get() >= limit,
            )
        }
        None => finder.run(|| {}, &NeverCancel),
    };

    Ok(outcome)
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::heuristic::Distance;
    use std::cell::Cell;
    use std::time::Instant;

    fn p(row: usize, col: usize) -> Point {
        Point { row, col }
    }

    fn create_basic_map() -> Grid {
        concat!(
            "XXXXXXX\n",
            "X.XXX.X\n",
            "X.XXX.X\n",
            "X.X...X\n",
            "X.X.XXX\n",
            "X......\n",
            "XXXXXXX\n",
        )
        .parse()
        .unwrap()
    }

    fn search(grid: &Grid, start: Point, goal: Point) -> SearchOutcome<Point> {
        PathFinder::new(grid, start, goal, Distance::Manhattan)
            .unwrap()
            .finish()
            .0
    }

    #[test]
    fn test_basic_route() {
        let map = create_basic_map();

        assert!(matches!(
            search(&map, p(1, 1), p(1, 5)),
            SearchOutcome::PathFound(PathResult { total_cost: 12, .. })
        ));
    }

    #[test]
    fn test_barrier_goal_is_rejected() {
        let map = create_basic_map();

        assert_eq!(
            PathFinder::new(&map, p(1, 1), p(0, 5), Distance::Manhattan).err(),
            Some(SearchError::InvalidEndpoints(EndpointFault::Impassable))
        );
    }

    #[test]
    fn test_invalid_endpoints() {
        let grid = Grid::new(3, 3).unwrap();

        assert_eq!(
            PathFinder::new(&grid, p(1, 1), p(1, 1), Distance::Manhattan).err(),
            Some(SearchError::InvalidEndpoints(EndpointFault::Identical))
        );
        assert_eq!(
            PathFinder::new(&grid, p(0, 0), p(3, 0), Distance::Manhattan).err(),
            Some(SearchError::InvalidEndpoints(EndpointFault::OutOfBounds))
        );
    }

    #[test]
    fn test_open_grid_corner_to_corner() {
        let grid = Grid::new(5, 5).unwrap();

        let outcome = search(&grid, p(0, 0), p(4, 4));
        let result = outcome.path().unwrap();

        assert_eq!(result.total_cost, 8);
        assert_eq!(result.path.len(), 9);
        assert_eq!(result.path.first(), Some(&p(0, 0)));
        assert_eq!(result.path.last(), Some(&p(4, 4)));
        for pair in result.path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(b.row >= a.row && b.col >= a.col);
            assert_eq!(b.row - a.row + b.col - a.col, 1);
        }
    }

    #[test]
    fn test_routes_through_single_opening() {
        let grid: Grid = "...\nX.X\n...\n".parse().unwrap();

        let outcome = search(&grid, p(0, 0), p(2, 2));
        let result = outcome.path().unwrap();

        assert_eq!(result.total_cost, 4);
        assert!(result.path.contains(&p(1, 1)));
    }

    #[test]
    fn test_walled_in_start_is_exhausted() {
        let grid: Grid = ".X.\nX.X\n.X.\n".parse().unwrap();

        let mut finder = PathFinder::new(&grid, p(1, 1), p(0, 0), Distance::Manhattan).unwrap();
        assert_eq!(finder.run(|| {}, &NeverCancel), SearchOutcome::Exhausted);
        assert_eq!(finder.stats().iterations, 1);
    }

    #[test]
    fn test_tie_break_follows_neighbor_order() {
        let grid = Grid::new(3, 3).unwrap();

        let outcome = search(&grid, p(0, 0), p(2, 2));

        assert_eq!(
            outcome.path().unwrap().path,
            vec![p(0, 0), p(1, 0), p(2, 0), p(2, 1), p(2, 2)]
        );
    }

    #[test]
    fn test_observer_called_once_per_iteration() {
        let grid = Grid::new(3, 3).unwrap();
        let mut finder = PathFinder::new(&grid, p(0, 0), p(2, 2), Distance::Manhattan).unwrap();

        let mut calls = 0;
        let outcome = finder.run(|| calls += 1, &NeverCancel);

        assert!(matches!(outcome, SearchOutcome::PathFound(_)));
        // every iteration except the one that popped the goal
        assert_eq!(calls, 8);
        assert_eq!(finder.stats().iterations, 9);
        assert_eq!(finder.stats().expanded, 7);
    }

    #[test]
    fn test_observer_sees_status_table() {
        let grid = Grid::new(3, 3).unwrap();
        let mut finder = PathFinder::new(&grid, p(0, 0), p(2, 2), Distance::Manhattan).unwrap();

        let mut frames = Vec::new();
        let calls = std::cell::Cell::new(0);
        let outcome = finder.run_with(
            |f| {
                calls.set(calls.get() + 1);
                let mut frame = grid.clone();
                frame.paint(f.status_table(), f.start(), f.goal(), &SearchOutcome::Exhausted);
                frames.push(frame.to_string());
            },
            &|| calls.get() >= 2,
        );

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(frames, vec!["So.\no..\n..E\n", "So.\nco.\no.E\n"]);
        assert_eq!(finder.state(), &SearchState::Done(SearchOutcome::Cancelled));
        assert_eq!(finder.step(), &SearchState::Done(SearchOutcome::Cancelled));
        assert_eq!(finder.stats().iterations, 2);
    }

    #[test]
    fn test_cancellation_stops_within_one_iteration() {
        let grid = Grid::new(6, 6).unwrap();
        let mut finder = PathFinder::new(&grid, p(0, 0), p(5, 5), Distance::Manhattan).unwrap();

        let polls = Cell::new(0);
        let cancel = || {
            polls.set(polls.get() + 1);
            polls.get() >= 3
        };

        assert_eq!(finder.run(|| {}, &cancel), SearchOutcome::Cancelled);
        assert_eq!(finder.stats().iterations, 3);

        // a finished search stays finished
        assert_eq!(
            finder.step(),
            &SearchState::Done(SearchOutcome::Cancelled)
        );
        assert_eq!(finder.stats().iterations, 3);
    }

    #[test]
    fn test_atomic_and_deadline_cancellation() {
        let grid = Grid::new(6, 6).unwrap();

        let flag = AtomicBool::new(true);
        let mut finder = PathFinder::new(&grid, p(0, 0), p(5, 5), Distance::Manhattan).unwrap();
        assert_eq!(finder.run(|| {}, &flag), SearchOutcome::Cancelled);

        let deadline = Instant::now();
        let mut finder = PathFinder::new(&grid, p(0, 0), p(5, 5), Distance::Manhattan).unwrap();
        assert_eq!(
            finder.run(|| {}, &|| Instant::now() >= deadline),
            SearchOutcome::Cancelled
        );
        assert_eq!(finder.stats().iterations, 1);
    }

    #[test]
    fn test_step_by_step() {
        let grid = Grid::new(1, 3).unwrap();
        let mut finder = PathFinder::new(&grid, p(0, 0), p(0, 2), Distance::Manhattan).unwrap();

        assert_eq!(finder.step(), &SearchState::Running);
        assert_eq!(finder.status(p(0, 1)), NodeStatus::Open);
        assert_eq!(finder.step(), &SearchState::Running);
        assert_eq!(finder.status(p(0, 1)), NodeStatus::Closed);
        assert!(finder.step().is_done());
        assert_eq!(finder.ledger().g(p(0, 2)), 2);
        // the start is never marked closed
        assert_eq!(finder.status(p(0, 0)), NodeStatus::Unvisited);
    }

    #[test]
    fn test_find_path_iteration_limit() {
        let grid = Grid::new(8, 8).unwrap();

        let config = SearchConfig {
            max_iterations: Some(2),
            ..Default::default()
        };
        assert_eq!(
            find_path(&grid, p(0, 0), p(7, 7), &config).unwrap(),
            SearchOutcome::Cancelled
        );

        let outcome = find_path(&grid, p(0, 0), p(7, 7), &SearchConfig::default()).unwrap();
        assert_eq!(outcome.path().unwrap().total_cost, 14);
    }

    #[test]
    fn test_every_heuristic_finds_optimal_cost() {
        let map = create_basic_map();

        for heuristic in [Distance::Manhattan, Distance::Euclidean, Distance::Chebyshev] {
            let (outcome, _) = PathFinder::new(&map, p(1, 1), p(1, 5), heuristic)
                .unwrap()
                .finish();
            assert_eq!(outcome.path().unwrap().total_cost, 12, "{}", heuristic);
        }
    }

    #[test]
    fn test_paint_grid() {
        let mut grid: Grid = "...\nX.X\n...\n".parse().unwrap();

        let (outcome, status) = PathFinder::new(&grid, p(0, 0), p(2, 2), Distance::Manhattan)
            .unwrap()
            .finish();
        grid.paint(&status, p(0, 0), p(2, 2), &outcome);

        assert_eq!(grid.to_string(), "S*c\nX*X\no*E\n");
    }
}
