//! Game state and core simulation types
//!
//! `GameState` is the authoritative play/death state machine. `Body` is the
//! player-controlled entity it drives.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Alive,
    /// Run ended, waiting for a tap to restart
    Dead,
}

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Jumped,
    Restarted,
}

/// Score, death flag and the body's velocity as seen from outside
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    pub phase: GamePhase,
    /// Mirrors `Body::velocity`
    pub velocity: f32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.phase == GamePhase::Dead
    }

    /// Set velocity to the jump impulse. No-op while dead.
    pub fn jump(&mut self, impulse: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.velocity = impulse;
        true
    }

    /// One obstacle passed. No-op while dead.
    pub fn increment_score(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.score += 1;
        true
    }

    /// Alive -> Dead. Returns false if already dead.
    pub fn die(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.phase = GamePhase::Dead;
        true
    }

    /// Dead -> Alive with score and velocity zeroed. Returns false if alive.
    pub fn restart(&mut self) -> bool {
        if !self.is_dead() {
            return false;
        }
        *self = Self::default();
        true
    }

    /// Map a tap to a transition: jump while alive, restart while dead
    pub fn press(&mut self, impulse: f32) -> PressOutcome {
        if self.restart() {
            PressOutcome::Restarted
        } else {
            self.jump(impulse);
            PressOutcome::Jumped
        }
    }
}

/// The player-controlled body
///
/// `pos` is the center of a `size`-sided square. `x` never changes after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub velocity: f32,
    pub size: f32,
    pub initial_y: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            velocity: 0.0,
            size,
            initial_y: y,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, self.size)
    }

    /// One step of constant-gravity integration (semi-implicit Euler)
    pub fn integrate(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.pos.y += self.velocity;
    }

    /// Back to the starting height, at rest
    pub fn reset(&mut self) {
        self.pos.y = self.initial_y;
        self.velocity = 0.0;
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
