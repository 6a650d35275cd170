//! First-person view of a grid maze, rendered by sphere tracing a signed
//! distance field instead of stepping through the grid.
//!
//! Per frame: [`frame::Simulation::tick`] moves the player and casts the ray
//! fan, then [`frame::Simulation::render`] describes the frame as
//! [`frame::DrawCommand`]s for a renderer such as [`raster`].
pub mod config;
pub mod error;
pub mod field;
pub mod frame;
pub mod logging;
pub mod marcher;
pub mod maze;
pub mod player;
pub mod projector;
pub mod raster;
pub mod sampler;
pub mod scaler;

pub use config::Config;
pub use error::{ConfigError, MazeError, SetupError};
pub use field::{DistanceField, Obstacle};
pub use frame::{Controls, DrawCommand, Simulation};
pub use marcher::{Marcher, RayResult};
pub use maze::{Cell, Maze};
pub use player::{Direction, PlayerController, Pose};
pub use projector::{Column, Viewport};
