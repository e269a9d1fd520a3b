//! Jump particle bursts
//!
//! Purely visual. Each particle is attached to the surface when created and
//! detached on the tick its lifetime runs out.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::renderer::{Color, Layer, NodeId, RenderSurface, Shape};

pub const PARTICLE_COLOR: Color = Color::WHITE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left to live
    pub life: u32,
    pub lifetime: u32,
    pub node: NodeId,
}

impl Particle {
    /// Remaining lifetime fraction, 1 at birth and 0 on the removal tick
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.lifetime as f32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    lifetime: u32,
    speed: f32,
    size: f32,
}

impl ParticleSystem {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            particles: Vec::new(),
            lifetime: config.particle_lifetime.max(1),
            speed: config.particle_speed,
            size: config.particle_size,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Spray `count` particles from a point: random left/right drift, random
    /// downward drift
    pub fn burst(
        &mut self,
        origin: Vec2,
        count: usize,
        rng: &mut impl Rng,
        surface: &mut dyn RenderSurface,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0 * self.speed,
                rng.random::<f32>() * self.speed,
            );
            let node = surface.add_node(
                Layer::Particles,
                Shape::Rect {
                    size: Vec2::splat(self.size),
                    fill: PARTICLE_COLOR,
                },
            );
            surface.set_position(node, origin);
            self.particles.push(Particle {
                pos: origin,
                vel,
                life: self.lifetime,
                lifetime: self.lifetime,
                node,
            });
        }
    }

    /// Move every particle one step and drop the expired ones, keeping the
    /// survivors in creation order
    pub fn tick(&mut self, surface: &mut dyn RenderSurface) {
        self.particles.retain_mut(|particle| {
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
            if particle.life == 0 {
                surface.remove_node(particle.node);
                return false;
            }
            true
        });
    }

    /// Push positions and fade to the surface
    pub fn sync(&self, surface: &mut dyn RenderSurface) {
        for particle in &self.particles {
            surface.set_position(particle.node, particle.pos);
            surface.set_alpha(particle.node, particle.alpha());
        }
    }

    /// Detach and drop every particle
    pub fn clear(&mut self, surface: &mut dyn RenderSurface) {
        for particle in self.particles.drain(..) {
            surface.remove_node(particle.node);
        }
    }
}
