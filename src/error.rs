use thiserror::Error;

/// Problems with the maze layout, detected once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze has no rows")]
    Empty,
    #[error("maze row {row} has no cells")]
    EmptyRow { row: usize },
    #[error("maze row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell symbol {symbol:?} at row {row}, column {column}")]
    UnknownCell {
        row: usize,
        column: usize,
        symbol: char,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("ray count must be at least 1")]
    NoRays,
}

/// Anything that can go wrong while assembling a [`crate::frame::Simulation`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid maze: {0}")]
    Maze(#[from] MazeError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("start cell ({x}, {y}) lies outside the {width}x{height} maze")]
    StartOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("start cell ({x}, {y}) is a wall")]
    BlockedStart { x: usize, y: usize },
}
