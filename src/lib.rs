//! Tower Flap - A side-scrolling tap-to-fly arcade game
//!
//! Core modules:
//! - `sim`: Simulation (gravity, obstacles, particles, collisions, game state)
//! - `renderer`: Render surface abstraction and scene sync
//! - `platform`: Browser platform backend
//! - `config`: Data-driven game tuning
//! - `game`: Host that owns a running game and drives it per frame

pub mod config;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod ui;

pub use config::GameConfig;
pub use error::{AssetError, ConfigError, GameError};
pub use game::Game;

/// Game configuration constants
pub mod consts {
    /// Downward acceleration added to velocity every tick (px/tick²)
    pub const GRAVITY: f32 = 0.3;
    /// Velocity set on every jump (negative is up, px/tick)
    pub const JUMP_VELOCITY: f32 = -8.0;

    /// Wall-clock interval between obstacle spawns (ms)
    pub const OBSTACLE_INTERVAL_MS: f64 = 1200.0;
    /// Leftward obstacle speed (px/tick)
    pub const OBSTACLE_SPEED: f32 = 2.0;
    /// Vertical opening between the two barriers
    pub const OBSTACLE_GAP: f32 = 300.0;
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    /// Distance past the right viewport edge where obstacles appear
    pub const OBSTACLE_SPAWN_OFFSET: f32 = 60.0;
    /// Minimum distance between the gap and the top of the viewport
    pub const OBSTACLE_TOP_MARGIN: f32 = 20.0;
    /// Minimum distance between the gap and the ground strip
    pub const OBSTACLE_BOTTOM_MARGIN: f32 = 20.0;

    /// Particles created per jump
    pub const BURST_SIZE: usize = 10;
    /// Particle lifetime (ticks)
    pub const PARTICLE_LIFETIME: u32 = 60;
    /// Max horizontal/vertical particle speed (px/tick)
    pub const PARTICLE_SPEED: f32 = 2.0;
    pub const PARTICLE_SIZE: f32 = 4.0;

    pub const CLOUD_COUNT: usize = 5;
    pub const CLOUD_SPEED: f32 = 0.5;

    /// Length of a full day/night cycle (ticks)
    pub const DAY_NIGHT_CYCLE: u32 = 3000;
    pub const DAY_COLOR: u32 = 0x87CEEB;
    pub const NIGHT_COLOR: u32 = 0x000033;

    /// Body bounding square edge
    pub const BODY_SIZE: f32 = 30.0;
    /// Body x as a fraction of viewport width
    pub const BODY_X_FRACTION: f32 = 0.35;
    pub const GROUND_HEIGHT: f32 = 80.0;
    /// Body rests this far above the ground top after a ground death
    pub const GROUND_REST_OFFSET: f32 = 20.0;

    /// Sprite for the body
    pub const BODY_TEXTURE: &str = "/heromama.png";
}
