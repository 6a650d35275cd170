//! Per-frame driver: owns the simulation state, applies input, recasts the
//! fan and describes the frame as drawable data.

use std::time::Duration;

use crate::{
    config::Config,
    error::SetupError,
    field::DistanceField,
    marcher::{Marcher, RayResult},
    maze::{Cell, Maze},
    player::{Direction, PlayerController, Pose},
    projector::{self, Column, Viewport},
    sampler,
};

/// Logical controls held at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub move_forward: bool,
    pub move_backward: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BACKGROUND: Rgb = Rgb(0x66, 0x66, 0x66);
pub const FLOOR: Rgb = Rgb(0x88, 0x88, 0x88);
pub const WALL: Rgb = Rgb(0x44, 0x44, 0x44);
pub const BORDER: Rgb = Rgb(0xff, 0xff, 0xff);
pub const RAY: Rgb = Rgb(0xff, 0xc0, 0xcb); // pink
pub const PLAYER: Rgb = Rgb(0x55, 0x55, 0xff);
pub const LABEL: Rgb = Rgb(0xff, 0xff, 0xff);

/// Renderer-agnostic drawing primitives, in painting order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Line {
        from: [f32; 2],
        to: [f32; 2],
        color: Rgb,
    },
    Disc {
        center: [f32; 2],
        radius: f32,
        color: Rgb,
    },
    /// Greyscale wall strip; shade and height are raw projector output.
    Column(Column),
    Text {
        origin: [f32; 2], // top-left
        size: f32,
        text: String,
        color: Rgb,
    },
}

/// Everything one running maze needs. Independent instances share nothing.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: Config,
    maze: Maze,
    field: DistanceField,
    marcher: Marcher,
    player: PlayerController,
    rays: Vec<RayResult>,
    fps: u32,
}

impl Simulation {
    pub fn new(config: Config, maze: Maze) -> Result<Self, SetupError> {
        config.validate()?;

        let (sx, sy) = config.start_cell;
        match maze.cell(sx, sy) {
            None => {
                return Err(SetupError::StartOutOfBounds {
                    x: sx,
                    y: sy,
                    width: maze.width(),
                    height: maze.height(),
                });
            }
            Some(Cell::Wall) => return Err(SetupError::BlockedStart { x: sx, y: sy }),
            Some(Cell::Empty) => {}
        }

        let field = DistanceField::from_maze(&maze, config.cell_size);
        // One shared threshold for "touching a wall" in both rendering and collision
        let marcher = Marcher::new(config.surface_epsilon, config.max_distance);

        let half = 0.5 * config.cell_size;
        let mut pose = Pose {
            position: [
                sx as f32 * config.cell_size + half,
                sy as f32 * config.cell_size + half,
            ],
            heading: config.start_heading,
        };
        pose.normalize_heading();
        let player = PlayerController::new(pose, config.move_speed, config.surface_epsilon);

        log::info!(
            "maze {}x{} with {} obstacles, {} rays over {:.1} degrees{}",
            maze.width(),
            maze.height(),
            field.obstacles().len(),
            config.ray_count,
            config.fov.to_degrees(),
            if config.parallel_rays { " (parallel)" } else { "" }
        );

        let mut sim = Self {
            config,
            maze,
            field,
            marcher,
            player,
            rays: Vec::new(),
            fps: 0,
        };
        sim.recast();
        Ok(sim)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn field(&self) -> &DistanceField {
        &self.field
    }

    pub fn pose(&self) -> Pose {
        self.player.pose()
    }

    /// Fan from the most recent [`Simulation::tick`], left to right.
    pub fn rays(&self) -> &[RayResult] {
        &self.rays
    }

    /// Map on the left, one blank cell, then the 3D view.
    pub fn canvas_size(&self) -> (usize, usize) {
        let cell = self.config.cell_size;
        let w = (2 * self.maze.width() + 1) as f32 * cell;
        let h = self.maze.height() as f32 * cell;
        (w.ceil() as usize, h.ceil() as usize)
    }

    pub fn view_viewport(&self) -> Viewport {
        let cell = self.config.cell_size;
        Viewport {
            x: (self.maze.width() + 1) as f32 * cell,
            y: 0.0,
            width: self.maze.width() as f32 * cell,
            height: self.maze.height() as f32 * cell,
        }
    }

    /// Applies held controls (movement, then rotation) and recasts the fan.
    pub fn tick(&mut self, controls: &Controls, elapsed: Duration) {
        let secs = elapsed.as_secs_f32();
        self.fps = if secs > 0.0 { (1.0 / secs) as u32 } else { 0 };

        let direction = if controls.move_forward {
            Some(Direction::Forward)
        } else if controls.move_backward {
            Some(Direction::Backward)
        } else {
            None
        };
        if let Some(direction) = direction {
            self.player.try_move(&self.field, direction);
        }

        if controls.rotate_left {
            self.player.rotate(-self.config.rotate_speed);
        }
        if controls.rotate_right {
            self.player.rotate(self.config.rotate_speed);
        }
        self.player.normalize_heading();

        self.recast();
    }

    fn recast(&mut self) {
        let pose = self.player.pose();
        let cast = if self.config.parallel_rays {
            sampler::cast_fan_par
        } else {
            sampler::cast_fan
        };
        self.rays = cast(
            &self.field,
            &self.marcher,
            pose,
            self.config.fov,
            self.config.ray_count,
        );

        if log::log_enabled!(log::Level::Trace) {
            let misses = self.rays.iter().filter(|r| !r.surfaced).count();
            log::trace!(
                "cast {} rays from ({:.1}, {:.1}) heading {:.3}, {} misses",
                self.rays.len(),
                pose.position[0],
                pose.position[1],
                pose.heading,
                misses
            );
        }
    }

    pub fn columns(&self) -> Vec<Column> {
        projector::project(
            &self.rays,
            self.view_viewport(),
            self.player.pose().heading,
            self.config.shade_reference,
        )
    }

    /// Describes the current frame. Pure: calling it twice yields the same list.
    pub fn render(&self) -> Vec<DrawCommand> {
        let cell = self.config.cell_size;
        let pose = self.player.pose();
        let mut out = Vec::with_capacity(
            self.maze.width() * self.maze.height() + 2 * self.rays.len() + 4,
        );

        out.push(DrawCommand::Clear(BACKGROUND));
        out.push(DrawCommand::StrokeRect {
            x: 0.0,
            y: 0.0,
            width: self.maze.width() as f32 * cell,
            height: self.maze.height() as f32 * cell,
            color: BORDER,
        });

        out.extend(self.maze.cells().map(|(x, y, c)| DrawCommand::FillRect {
            x: x as f32 * cell,
            y: y as f32 * cell,
            width: cell,
            height: cell,
            color: if c == Cell::Wall { WALL } else { FLOOR },
        }));

        out.extend(self.rays.iter().map(|ray| DrawCommand::Line {
            from: pose.position,
            to: ray.hit,
            color: RAY,
        }));

        out.push(DrawCommand::Disc {
            center: pose.position,
            radius: self.config.player_radius,
            color: PLAYER,
        });

        out.extend(self.columns().into_iter().map(DrawCommand::Column));

        out.push(DrawCommand::Text {
            origin: [20.0, 20.0],
            size: 20.0,
            text: format!("FPS: {}", self.fps),
            color: LABEL,
        });

        out
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    fn sim() -> Simulation {
        Simulation::new(Config::default(), Maze::default_layout().unwrap()).unwrap()
    }

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn starts_centred_in_the_start_cell() {
        let sim = sim();
        assert_eq!(sim.pose().position, [75.0, 75.0]);
        assert!((sim.pose().heading - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(sim.rays().len(), 1000);
    }

    #[test]
    fn rejects_start_inside_a_wall() {
        let config = Config {
            start_cell: (0, 0),
            ..Config::default()
        };
        let err = Simulation::new(config, Maze::default_layout().unwrap()).unwrap_err();
        assert!(matches!(err, SetupError::BlockedStart { x: 0, y: 0 }));
    }

    #[test]
    fn rejects_start_outside_the_grid() {
        let config = Config {
            start_cell: (12, 1),
            ..Config::default()
        };
        let err = Simulation::new(config, Maze::default_layout().unwrap()).unwrap_err();
        assert!(matches!(err, SetupError::StartOutOfBounds { x: 12, .. }));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = Config {
            ray_count: 0,
            ..Config::default()
        };
        let err = Simulation::new(config, Maze::default_layout().unwrap()).unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
    }

    #[test]
    fn forward_walks_down_the_corridor() {
        let mut sim = sim();
        let controls = Controls {
            move_forward: true,
            ..Controls::default()
        };
        sim.tick(&controls, FRAME);
        // f32 cos(PI/2) is slightly negative, hence the one unit drift in x
        assert_eq!(sim.pose().position, [74.0, 78.0]);
    }

    #[test]
    fn forward_wins_over_backward() {
        let mut sim = sim();
        let controls = Controls {
            move_forward: true,
            move_backward: true,
            ..Controls::default()
        };
        sim.tick(&controls, FRAME);
        assert_eq!(sim.pose().position[1], 78.0);
    }

    #[test]
    fn rotation_is_normalized() {
        let mut sim = sim();
        let left = Controls {
            rotate_left: true,
            ..Controls::default()
        };
        // 15 ticks of PI/30 takes the heading from PI/2 to 0, then below
        for _ in 0..16 {
            sim.tick(&left, FRAME);
        }
        let heading = sim.pose().heading;
        assert!((0.0..std::f32::consts::TAU).contains(&heading));
        assert!((heading - (2.0 * PI - PI / 30.0)).abs() < 1e-4);
    }

    #[test]
    fn opposite_rotations_cancel() {
        let mut sim = sim();
        let both = Controls {
            rotate_left: true,
            rotate_right: true,
            ..Controls::default()
        };
        sim.tick(&both, FRAME);
        assert!((sim.pose().heading - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn render_paints_every_layer_in_order() {
        let sim = sim();
        let cmds = sim.render();
        assert_eq!(cmds[0], DrawCommand::Clear(BACKGROUND));
        assert!(matches!(cmds[1], DrawCommand::StrokeRect { .. }));

        let rects = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        let lines = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        let columns = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Column(_)))
            .count();
        assert_eq!(rects, 100);
        assert_eq!(lines, 1000);
        assert_eq!(columns, 1000);
        assert!(matches!(cmds.last(), Some(DrawCommand::Text { .. })));
    }

    #[test]
    fn fps_label_tracks_elapsed_time() {
        let mut sim = sim();
        sim.tick(&Controls::default(), Duration::from_millis(20));
        let label = sim.render().into_iter().find_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        });
        assert_eq!(label.as_deref(), Some("FPS: 50"));
    }

    #[test]
    fn short_marching_bound_leaves_misses_blank() {
        let config = Config {
            max_distance: 100.0,
            ..Config::default()
        };
        let sim = Simulation::new(config, Maze::default_layout().unwrap()).unwrap();
        let columns = sim.columns();
        let misses: Vec<_> = sim
            .rays()
            .iter()
            .zip(&columns)
            .filter(|(ray, _)| !ray.surfaced)
            .collect();
        assert!(!misses.is_empty());
        for (ray, col) in misses {
            assert_eq!(ray.distance, 100.0);
            assert!(col.height <= 0.0, "{ray:?} -> {col:?}");
        }
    }

    #[test]
    fn canvas_fits_map_and_view() {
        let sim = sim();
        let cell = sim.config().cell_size as usize;
        let (w, h) = (sim.maze().width(), sim.maze().height());
        assert_eq!(sim.canvas_size(), ((2 * w + 1) * cell, h * cell));
        assert_eq!(sim.canvas_size(), (1050, 500));
        let view = sim.view_viewport();
        assert_eq!((view.x, view.width, view.height), (550.0, 500.0, 500.0));
    }
}
