//! Rectangular maze grid, the second consumer of the generic A* search
//!
//! Cells are connected wherever the wall between them is open; search uses
//! a Manhattan heuristic. Besides pathfinding the module carries a
//! depth-first maze generator and a box-drawing renderer for debugging.

use crate::astar::{a_star_search, Graph};

use std::fmt;

/// Row/column coordinate pair
pub type Location = (usize, usize);

/// One grid cell; walls are closed by default
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub left_open: bool,
    pub right_open: bool,
    pub up_open: bool,
    pub down_open: bool,
    pub visited: bool,
    pub cost: f32,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            left_open: false,
            right_open: false,
            up_open: false,
            down_open: false,
            visited: false,
            cost: 1.0,
        }
    }
}

impl Cell {
    fn all_open() -> Self {
        Self {
            left_open: true,
            right_open: true,
            up_open: true,
            down_open: true,
            visited: true,
            cost: 1.0,
        }
    }
}

/// Deterministic xorshift32 generator driving maze generation.
///
/// A seed of 0 is treated as 1 to avoid the degenerate all-zero sequence.
struct SeededRng {
    state: u32,
}

impl SeededRng {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform index in `0..len`
    fn next_index(&mut self, len: usize) -> usize {
        ((self.next_u32() as u64 * len as u64) >> 32) as usize
    }
}

/// A row-major grid of cells with openable walls
#[derive(Debug, Clone)]
pub struct RectangularMaze {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
    /// Cell ids of the most recent solve, kept for rendering
    path: Vec<usize>,
}

impl RectangularMaze {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::default(); rows * columns],
            path: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn location(&self, cell_id: usize) -> Location {
        let row = cell_id / self.columns;
        (row, cell_id - row * self.columns)
    }

    pub fn cell_id(&self, location: Location) -> usize {
        location.0 * self.columns + location.1
    }

    pub fn is_valid(&self, location: Location) -> bool {
        self.cell_id(location) < self.cells.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row * self.columns + col]
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        &mut self.cells[row * self.columns + col]
    }

    /// Closes every wall and clears visit marks
    pub fn reset(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Opens every wall (no maze, free movement)
    pub fn generate_empty_grid(&mut self) {
        self.cells.fill(Cell::all_open());
    }

    /// Sets the traversal cost of one cell
    pub fn set_cost(&mut self, location: Location, cost: f32) {
        if self.is_valid(location) {
            let id = self.cell_id(location);
            self.cells[id].cost = cost;
        }
    }

    /// Closes the perimeter of the rectangle spanned by `start` and `end`,
    /// leaving movement along and inside the rectangle open
    pub fn add_rectangular_wall(&mut self, start: Location, end: Location) {
        let (mut x1, mut y1) = start;
        let (mut x2, mut y2) = end;

        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
        }
        x2 = x2.min(self.rows - 1);
        if y1 > y2 {
            std::mem::swap(&mut y1, &mut y2);
        }
        y2 = y2.min(self.columns - 1);

        for row in x1..=x2 {
            for col in y1..=y2 {
                if row == x1 || row == x2 {
                    if col == y1 || col == y2 {
                        let cell = self.cell_mut(row, col);
                        cell.left_open = col != y1;
                        cell.right_open = col != y2;
                        cell.up_open = row != x1;
                        cell.down_open = row != x2;
                    } else {
                        let cell = self.cell_mut(row, col);
                        cell.up_open = row != x1;
                        cell.down_open = row != x2;
                    }
                } else if col == y1 || col == y2 {
                    let cell = self.cell_mut(row, col);
                    cell.left_open = col != y1;
                    cell.right_open = col != y2;
                }
            }
        }
    }

    /// Carves a perfect maze with a depth-first backtracker, then opens an
    /// entry at the top-left and an exit at the bottom-right.
    ///
    /// The same seed always carves the same maze.
    pub fn generate_maze(&mut self, seed: u32) {
        let mut rng = SeededRng::new(seed);

        self.reset();

        let mut r = 0usize;
        let mut c = 0usize;
        let mut history = vec![(r, c)];

        // Trace a path through the cells, opening walls along the way;
        // when stuck, backtrack until a cell with unvisited neighbours
        // turns up. Empty history means we backtracked to the start.
        while !history.is_empty() {
            self.cell_mut(r, c).visited = true;

            let mut check = Vec::with_capacity(4);
            if c > 0 && !self.cell(r, c - 1).visited {
                check.push(0u8); // left
            }
            if r > 0 && !self.cell(r - 1, c).visited {
                check.push(1); // up
            }
            if c < self.columns - 1 && !self.cell(r, c + 1).visited {
                check.push(2); // right
            }
            if r < self.rows - 1 && !self.cell(r + 1, c).visited {
                check.push(3); // down
            }

            if !check.is_empty() {
                history.push((r, c));
                match check[rng.next_index(check.len())] {
                    0 => {
                        self.cell_mut(r, c).left_open = true;
                        c -= 1;
                        self.cell_mut(r, c).right_open = true;
                    }
                    1 => {
                        self.cell_mut(r, c).up_open = true;
                        r -= 1;
                        self.cell_mut(r, c).down_open = true;
                    }
                    2 => {
                        self.cell_mut(r, c).right_open = true;
                        c += 1;
                        self.cell_mut(r, c).left_open = true;
                    }
                    _ => {
                        self.cell_mut(r, c).down_open = true;
                        r += 1;
                        self.cell_mut(r, c).up_open = true;
                    }
                }
            } else if let Some((pr, pc)) = history.pop() {
                r = pr;
                c = pc;
            }
        }

        // Entry and exit
        self.cell_mut(0, 0).left_open = true;
        self.cell_mut(self.rows - 1, self.columns - 1).right_open = true;
    }

    /// Shortest open route between two locations, endpoints included.
    ///
    /// Out-of-range locations snap to the first and last cell. Empty means
    /// the goal is walled off.
    pub fn find_path(&mut self, start: Location, goal: Location) -> Vec<Location> {
        let start_id = if self.is_valid(start) {
            self.cell_id(start)
        } else {
            0
        };
        let goal_id = if self.is_valid(goal) {
            self.cell_id(goal)
        } else {
            self.cells.len() - 1
        };

        self.path = a_star_search(&*self, start_id, goal_id);
        self.path.iter().map(|&id| self.location(id)).collect()
    }

    /// Route from the top-left to the bottom-right corner
    pub fn solve(&mut self) -> Vec<Location> {
        self.find_path((0, 0), self.location(self.cells.len() - 1))
    }
}

impl Graph for RectangularMaze {
    type NodeId = usize;

    // Movement uses the destination cell's facing wall; generation opens
    // both sides of a carved wall so the relation stays symmetric
    fn neighbors(&self, node: usize) -> Vec<usize> {
        let (row, col) = self.location(node);
        let mut out = Vec::with_capacity(4);

        if row != 0 && self.cell(row - 1, col).down_open {
            out.push(self.cell_id((row - 1, col)));
        }
        if col != 0 && self.cell(row, col - 1).right_open {
            out.push(self.cell_id((row, col - 1)));
        }
        if col < self.columns - 1 && self.cell(row, col + 1).left_open {
            out.push(self.cell_id((row, col + 1)));
        }
        if row < self.rows - 1 && self.cell(row + 1, col).up_open {
            out.push(self.cell_id((row + 1, col)));
        }

        out
    }

    fn cost(&self, _from: usize, to: usize) -> f32 {
        self.cells[to].cost
    }

    fn heuristic(&self, a: usize, b: usize) -> f32 {
        let (r1, c1) = self.location(a);
        let (r2, c2) = self.location(b);
        (r1.abs_diff(r2) + c1.abs_diff(c2)) as f32
    }
}

impl fmt::Display for RectangularMaze {
    /// Renders walls with box-drawing characters and the last solved path
    /// with directional arrows
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render_rows = self.rows * 2 + 1;
        let render_cols = self.columns * 2 + 1;
        let mut grid = vec![vec![' '; render_cols]; render_rows];

        // Wall segments around each cell
        for row in 0..self.rows {
            for col in 0..self.columns {
                let rr = row * 2 + 1;
                let rc = col * 2 + 1;
                let cell = self.cell(row, col);
                if !cell.up_open {
                    grid[rr - 1][rc] = '─';
                }
                if !cell.left_open {
                    grid[rr][rc - 1] = '│';
                }
                if !cell.right_open {
                    grid[rr][rc + 1] = '│';
                }
                if !cell.down_open {
                    grid[rr + 1][rc] = '─';
                }
            }
        }

        // Path arrows
        for pair in self.path.windows(2) {
            let (r1, c1) = self.location(pair[0]);
            let (r2, c2) = self.location(pair[1]);
            grid[r1 * 2 + 1][c1 * 2 + 1] = if r1 == r2 {
                if c2 < c1 {
                    '←'
                } else {
                    '→'
                }
            } else if r2 < r1 {
                '↑'
            } else {
                '↓'
            };
        }
        if let Some(&last) = self.path.last() {
            let (r, c) = self.location(last);
            grid[r * 2 + 1][c * 2 + 1] = '*';
        }

        // Resolve wall junctions from the segments around them
        for row in (0..render_rows).step_by(2) {
            for col in (0..render_cols).step_by(2) {
                let up = row > 0 && grid[row - 1][col] != ' ';
                let left = col > 0 && grid[row][col - 1] != ' ';
                let right = col < render_cols - 1 && grid[row][col + 1] != ' ';
                let down = row < render_rows - 1 && grid[row + 1][col] != ' ';

                grid[row][col] = match (up, right, down, left) {
                    (true, true, true, true) => '┼',
                    (true, true, true, false) => '├',
                    (true, true, false, true) => '┴',
                    (true, false, true, true) => '┤',
                    (false, true, true, true) => '┬',
                    (true, true, false, false) => '└',
                    (true, false, false, true) => '┘',
                    (false, false, true, true) => '┐',
                    (false, true, true, false) => '┌',
                    (false, true, false, true) => '─',
                    (true, false, true, false) => '│',
                    (true, false, false, false) => '╵',
                    (false, true, false, false) => '╶',
                    (false, false, true, false) => '╷',
                    (false, false, false, true) => '╴',
                    (false, false, false, false) => ' ',
                };
            }
        }

        for row in grid {
            for square in row {
                write!(f, "{square}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
