//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One logical step per tick, no delta-time scaling of physics
//! - Seeded RNG only
//! - Stable iteration order (spawn order for obstacles and particles)
//! - Rendering only through the `RenderSurface` node lifecycle

pub mod ambient;
pub mod collision;
pub mod obstacles;
pub mod particles;
pub mod state;
pub mod tick;

pub use ambient::{CloudLayer, DayNightCycle, interpolate_color};
pub use collision::{Bounds, body_ground_collision, body_obstacle_collision};
pub use obstacles::{Obstacle, ObstacleField, ObstacleStep, SpawnTimer, gap_center_range};
pub use particles::{Particle, ParticleSystem};
pub use state::{Body, GamePhase, GameState, PressOutcome, RngState};
pub use tick::{DeathCause, GameEvent, Simulation, TickInput, tick};
