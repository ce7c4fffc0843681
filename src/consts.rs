//! Tunable constants for the simulation, the unfair mechanics and the look of the game.

pub(crate) const GRID_WIDTH: u16 = 30;
pub(crate) const GRID_HEIGHT: u16 = 20;

/// Each grid cell is drawn this many terminal columns wide so cells look square
pub(crate) const CELL_COLUMNS: u16 = 2;

pub(crate) const INITIAL_SNAKE_LENGTH: usize = 3;
pub(crate) const MIN_SNAKE_LENGTH: usize = 3;
pub(crate) const FAKE_FOOD_PENALTY: usize = 2;
pub(crate) const OBSTACLE_COUNT: usize = 10;
pub(crate) const MAX_FAKE_WALLS: usize = 3;

pub(crate) const POINTS_PER_LEVEL: u32 = 5;
pub(crate) const POINTS_PER_SPEED_STEP: u32 = 3;

/// Logic moves per second before score and modifiers are applied
pub(crate) const BASE_SPEED: f64 = 8.0;
pub(crate) const SPEED_BOOST_MULTIPLIER: f64 = 2.0;
pub(crate) const FOG_SPEED_MULTIPLIER: f64 = 0.6;

pub(crate) const TARGET_FPS: u32 = 60;

pub(crate) const UNFAIR_CHECK_INTERVAL: f64 = 2.0;
pub(crate) const TELEPORT_OBSTACLES_CHANCE: f64 = 0.10;
pub(crate) const INVISIBLE_SNAKE_CHANCE: f64 = 0.08;
pub(crate) const FOG_OF_WAR_CHANCE: f64 = 0.06;
pub(crate) const FAKE_WALLS_CHANCE: f64 = 0.05;
pub(crate) const FAKE_FOOD_CHANCE: f64 = 0.15;
pub(crate) const SPEED_BOOST_TRAP_CHANCE: f64 = 0.10;

// Modifier durations, in frames at TARGET_FPS
pub(crate) const INVISIBLE_FRAMES: u32 = 180;
pub(crate) const FOG_FRAMES: u32 = 240;
pub(crate) const SPEED_BOOST_FRAMES: u32 = 300;

/// Cells around the head that stay visible while the fog is up
pub(crate) const FOG_RADIUS: f32 = 5.0;

pub(crate) const INTERPOLATION_RATE: f32 = 8.0;

pub(crate) const FOOD_PARTICLE_LIFE: i32 = 40;
pub(crate) const EXPLOSION_PARTICLE_LIFE: i32 = 30;
pub(crate) const TRAIL_PARTICLE_LIFE: i32 = 20;
pub(crate) const FOOD_BURST_COUNT: usize = 8;
pub(crate) const EXPLOSION_BURST_COUNT: usize = 12;
pub(crate) const LEVEL_UP_BURST_COUNT: usize = 16;
pub(crate) const TRAIL_SPAWN_CHANCE: f64 = 0.30;

// Particle physics, in cells and ticks
pub(crate) const PARTICLE_GRAVITY: f32 = 0.02;
pub(crate) const PARTICLE_RESTITUTION: f32 = 0.6;
pub(crate) const PARTICLE_FLOOR_FRICTION: f32 = 0.8;
pub(crate) const FOOD_PARTICLE_LATERAL: f32 = 0.15;
pub(crate) const FOOD_PARTICLE_LIFT: (f32, f32) = (-0.35, -0.05);
pub(crate) const EXPLOSION_SPEED: (f32, f32) = (0.1, 0.4);
pub(crate) const TRAIL_JITTER: f32 = 0.05;
pub(crate) const TRAIL_NOISE_STRENGTH: f32 = 0.01;

pub(crate) const HIGH_SCORE_FILE: &str = ".unfair_snek_high_score.txt";
pub(crate) const LOG_FILE: &str = "unfair_snek.log";
pub(crate) const SEED_ENV_VAR: &str = "UNFAIR_SNEK_SEED";

/// Plain `(r, g, b)` so colours can be blended before they reach the terminal
pub(crate) type Rgb = (u8, u8, u8);

pub(crate) const BG_COLOR: Rgb = (20, 20, 30);
pub(crate) const GRID_COLOR: Rgb = (40, 40, 50);
pub(crate) const SNAKE_HEAD_COLOR: Rgb = (50, 255, 50);
pub(crate) const SNAKE_BODY_COLOR: Rgb = (30, 200, 30);
pub(crate) const FOOD_COLOR: Rgb = (255, 100, 100);
pub(crate) const OBSTACLE_COLOR: Rgb = (120, 120, 120);
pub(crate) const TEXT_COLOR: Rgb = (255, 255, 255);
pub(crate) const DIM_TEXT_COLOR: Rgb = (200, 200, 200);
pub(crate) const WARNING_COLOR: Rgb = (255, 200, 0);
pub(crate) const FOG_COLOR: Rgb = (8, 8, 12);
pub(crate) const FOOD_SHINE_COLOR: Rgb = (255, 200, 200);
