use crate::error::MazeError;

pub const WALL_SYMBOL: char = 'X';
pub const EMPTY_SYMBOL: char = ' ';

/// The level shipped with the binary, one string per row.
pub const DEFAULT_LAYOUT: [&str; 10] = [
    "XXXXXXXXXX",
    "X X   XXXX",
    "X X X XXXX",
    "X X X   XX",
    "X   XXX XX",
    "XXXXXXX XX",
    "X    X   X",
    "XX X X X X",
    "X  X   X X",
    "XXXXXXXXXX",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Empty,
}

impl Cell {
    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            WALL_SYMBOL => Some(Cell::Wall),
            EMPTY_SYMBOL => Some(Cell::Empty),
            _ => None,
        }
    }
}

/// Static, rectangular cell grid. Row-major, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Maze {
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self, MazeError> {
        let width = rows.first().ok_or(MazeError::Empty)?.len();
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);

        for (row, line) in rows.into_iter().enumerate() {
            if line.is_empty() {
                return Err(MazeError::EmptyRow { row });
            }
            if line.len() != width {
                return Err(MazeError::Ragged {
                    row,
                    expected: width,
                    found: line.len(),
                });
            }
            cells.extend(line);
        }

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Parses `'X'` as wall and `' '` as empty; anything else is rejected.
    pub fn parse<S: AsRef<str>>(layout: &[S]) -> Result<Self, MazeError> {
        let rows = layout
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.as_ref()
                    .chars()
                    .enumerate()
                    .map(|(column, symbol)| {
                        Cell::from_symbol(symbol).ok_or(MazeError::UnknownCell {
                            row,
                            column,
                            symbol,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rows)
    }

    pub fn default_layout() -> Result<Self, MazeError> {
        Self::parse(&DEFAULT_LAYOUT)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Iterates `(x, y, cell)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i % self.width, i / self.width, cell))
    }

    pub fn walls(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .filter(|&(_, _, cell)| cell == Cell::Wall)
            .map(|(x, y, _)| (x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_ten_by_ten() {
        let maze = Maze::default_layout().unwrap();
        assert_eq!((maze.width(), maze.height()), (10, 10));
        assert_eq!(maze.cell(0, 0), Some(Cell::Wall));
        assert_eq!(maze.cell(1, 1), Some(Cell::Empty));
        assert_eq!(maze.cell(10, 0), None);
    }

    #[test]
    fn rejects_empty_grid() {
        let layout: [&str; 0] = [];
        assert_eq!(Maze::parse(&layout), Err(MazeError::Empty));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Maze::parse(&["XXX", "X X", "XX"]).unwrap_err();
        assert_eq!(
            err,
            MazeError::Ragged {
                row: 2,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_empty_rows() {
        assert_eq!(Maze::parse(&[""]), Err(MazeError::EmptyRow { row: 0 }));
    }

    #[test]
    fn rejects_unknown_symbols() {
        let err = Maze::parse(&["X#"]).unwrap_err();
        assert_eq!(
            err,
            MazeError::UnknownCell {
                row: 0,
                column: 1,
                symbol: '#'
            }
        );
    }

    #[test]
    fn walls_are_row_major() {
        let maze = Maze::parse(&["X ", " X"]).unwrap();
        assert_eq!(maze.walls().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
    }
}
