use crate::error::SearchError;
use crate::find::{NodeStatus, SearchOutcome};
use crate::space::{NodeReference, NodeStorage, SearchSpace};
use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `"row,col"`, surrounding whitespace is ignored
impl FromStr for Point {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("Invalid point `{}`, expected `row,col`", s))?;

        Ok(Point {
            row: row.trim().parse().context("Invalid row")?,
            col: col.trim().parse().context("Invalid column")?,
        })
    }
}

/// Visualization tag of a cell. Never read by the search itself.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    #[default]
    Empty,
    Start,
    End,
    Open,
    Closed,
    Path,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub passable: bool,
    pub state: CellState,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            passable: true,
            state: CellState::Empty,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match (self.passable, self.state) {
                (false, _) => "X",
                (true, CellState::Empty) => ".",
                (true, CellState::Start) => "S",
                (true, CellState::End) => "E",
                (true, CellState::Open) => "o",
                (true, CellState::Closed) => "c",
                (true, CellState::Path) => "*",
            }
        )
    }
}

impl FromStr for Cell {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (passable, state) = match s {
            "X" | "#" => (false, CellState::Empty),
            "." | " " => (true, CellState::Empty),
            "S" => (true, CellState::Start),
            "E" => (true, CellState::End),
            "o" => (true, CellState::Open),
            "c" => (true, CellState::Closed),
            "*" => (true, CellState::Path),
            _ => return Err(anyhow!("Invalid cell: {}", s)),
        };
        Ok(Cell { passable, state })
    }
}

/// A rectangular grid of cells with 4-connected unit-cost movement.
///
/// The dimensions are fixed at construction; only passability and the visualization tags
/// of individual cells can change afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = anyhow::Error;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let mut grid = Grid::new(raw.rows, raw.columns)?;
        if raw.cells.len() != grid.cells.len() {
            bail!(
                "Expected {} cells for a {}x{} grid, got {}",
                grid.cells.len(),
                raw.rows,
                raw.columns,
                raw.cells.len()
            );
        }
        grid.cells = raw.cells;
        Ok(grid)
    }
}

impl Grid {
    /// Create a grid where every cell is passable and untagged
    pub fn new(rows: usize, columns: usize) -> Result<Self, SearchError> {
        let size = rows
            .checked_mul(columns)
            .filter(|&size| size > 0)
            .ok_or(SearchError::InvalidDimension { rows, columns })?;

        Ok(Self {
            rows,
            columns,
            cells: vec![Cell::default(); size],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    /// Row-major index of `point`, `None` outside the grid
    fn index(&self, point: Point) -> Option<usize> {
        self.contains(point)
            .then(|| point.row * self.columns + point.col)
    }

    pub fn get(&self, point: Point) -> Option<Cell> {
        self.index(point).map(|idx| self.cells[idx])
    }

    pub fn is_passable(&self, point: Point) -> bool {
        self.get(point).is_some_and(|cell| cell.passable)
    }

    /// Returns `false` and leaves the grid untouched if `point` is outside it
    pub fn set_passable(&mut self, point: Point, passable: bool) -> bool {
        let Some(idx) = self.index(point) else {
            return false;
        };
        self.cells[idx].passable = passable;
        true
    }

    /// Returns `false` and leaves the grid untouched if `point` is outside it
    pub fn mark(&mut self, point: Point, state: CellState) -> bool {
        let Some(idx) = self.index(point) else {
            return false;
        };
        self.cells[idx].state = state;
        true
    }

    /// Reset every visualization tag to [`CellState::Empty`], passability is kept
    pub fn clear_marks(&mut self) {
        for cell in &mut self.cells {
            cell.state = CellState::Empty;
        }
    }

    /// First cell (in row-major order) carrying the given tag
    pub fn marked(&self, state: CellState) -> Option<Point> {
        self.cells
            .iter()
            .position(|c| c.state == state)
            .map(|idx| Point {
                row: idx / self.columns,
                col: idx % self.columns,
            })
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| Point { row, col }))
    }

    /// Returns the passable neighbors of the given point, in the fixed order
    /// north (row - 1), south (row + 1), east (col + 1), west (col - 1).
    ///
    /// The order decides which of several equally good cells enters the frontier first,
    /// so changing it changes which of several shortest paths a search returns.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> {
        let mut points = Vec::with_capacity(4);

        if point.row > 0 {
            points.push(Point {
                row: point.row - 1,
                col: point.col,
            });
        }
        if point.row + 1 < self.rows {
            points.push(Point {
                row: point.row + 1,
                col: point.col,
            });
        }
        if point.col + 1 < self.columns {
            points.push(Point {
                row: point.row,
                col: point.col + 1,
            });
        }
        if point.col > 0 {
            points.push(Point {
                row: point.row,
                col: point.col - 1,
            });
        }

        // filter to only keep passable cells
        points.retain(|p| self.is_passable(*p));

        points.into_iter()
    }

    /// Scales the grid by the given factor, i.e. to make it twice as large, pass 2.
    /// Interpolates the cells by repeating the existing cells in the new grid.
    pub fn scale_up(&mut self, factor: usize) {
        let factor = factor.max(1);
        let columns = self.columns * factor;
        let mut new_cells = vec![Cell::default(); self.rows * factor * columns];

        for row in 0..self.rows * factor {
            for col in 0..columns {
                new_cells[row * columns + col] =
                    self.cells[(row / factor) * self.columns + col / factor];
            }
        }

        self.rows *= factor;
        self.columns = columns;
        self.cells = new_cells;
    }

    /// Projects a finished search onto the visualization tags: frontier and expanded
    /// cells first, then the path, then the two endpoints.
    pub fn paint(
        &mut self,
        status: &CellStorage<NodeStatus>,
        start: Point,
        goal: Point,
        outcome: &SearchOutcome<Point>,
    ) {
        self.clear_marks();

        for idx in 0..self.cells.len() {
            let point = Point {
                row: idx / self.columns,
                col: idx % self.columns,
            };
            if !status.is_valid(point) {
                continue;
            }
            self.cells[idx].state = match status.get(point) {
                NodeStatus::Unvisited => CellState::Empty,
                NodeStatus::Open => CellState::Open,
                NodeStatus::Closed => CellState::Closed,
            };
        }

        if let SearchOutcome::PathFound(result) = outcome {
            for &point in &result.path {
                self.mark(point, CellState::Path);
            }
        }

        self.mark(start, CellState::Start);
        self.mark(goal, CellState::End);
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses the same character set that [`Display`] produces, one line per row.
/// `#` is accepted as a barrier and a space as an open cell.
impl FromStr for Grid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines: Vec<&str> = s.lines().map(|l| l.trim_end_matches('\r')).collect();
        // a line of spaces is a row of open cells, only trailing empty lines are dropped
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let rows = lines.len();
        let columns = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        let mut grid = Grid::new(rows, columns)?;

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != columns {
                bail!(
                    "Row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    columns
                );
            }
            for (col, c) in line.chars().enumerate() {
                let cell: Cell = c
                    .to_string()
                    .parse()
                    .with_context(|| format!("At row {}, column {}", row, col))?;
                grid.cells[row * columns + col] = cell;
            }
        }

        Ok(grid)
    }
}

/// A NodeStorage over a rectangular grid, stored row-major in a single vec
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    rows: usize,
    columns: usize,
    values: Vec<T>,
}

impl<T: Copy + 'static> NodeStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    fn get(&self, node: Self::Reference) -> T {
        debug_assert!(self.is_valid(node), "{} outside storage", node);
        self.values[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        debug_assert!(self.is_valid(node), "{} outside storage", node);
        &mut self.values[node.row * self.columns + node.col]
    }
}

impl SearchSpace for Grid {
    type Reference = Point;
    type Storage<T: Default + Copy + 'static> = CellStorage<T>;

    fn contains(&self, node: Self::Reference) -> bool {
        Grid::contains(self, node)
    }

    fn is_passable(&self, node: Self::Reference) -> bool {
        Grid::is_passable(self, node)
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        self.neighbors(node)
    }

    fn create_storage<T: Default + Copy + 'static>(&self) -> Self::Storage<T> {
        CellStorage {
            rows: self.rows,
            columns: self.columns,
            values: vec![Default::default(); self.rows * self.columns],
        }
    }
}
