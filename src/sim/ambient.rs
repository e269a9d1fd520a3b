//! Cosmetic background systems: day/night sky and drifting clouds
//!
//! Nothing here affects gameplay. Both systems advance once per tick while
//! alive and freeze with the rest of the scene on death.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::renderer::{Color, Layer, NodeId, RenderSurface, Shape, Viewport};

pub const CLOUD_COLOR: Color = Color::WHITE;

/// Per-channel linear blend between two colors, rounded
pub fn interpolate_color(from: Color, to: Color, t: f32) -> Color {
    let lerp = |a: u8, b: u8| -> u8 {
        let (a, b) = (a as f32, b as f32);
        (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
    };
    Color::from_rgb(
        lerp(from.r(), to.r()),
        lerp(from.g(), to.g()),
        lerp(from.b(), to.b()),
    )
}

/// Sky color cycling between day and night on a sine wave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNightCycle {
    counter: u32,
    period: u32,
    day: Color,
    night: Color,
}

impl DayNightCycle {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            counter: 0,
            period: config.day_night_cycle.max(1),
            day: Color(config.day_color),
            night: Color(config.night_color),
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Sky color for the current phase
    pub fn color(&self) -> Color {
        let phase = self.counter as f32 / self.period as f32;
        let ratio = (phase * std::f32::consts::TAU).sin();
        interpolate_color(self.day, self.night, (ratio + 1.0) / 2.0)
    }

    /// Advance one tick and return the new sky color
    pub fn update(&mut self) -> Color {
        self.counter = (self.counter + 1) % self.period;
        self.color()
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: Vec2,
    pub node: NodeId,
}

/// A handful of clouds scrolling slower than the obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudLayer {
    clouds: Vec<Cloud>,
    speed: f32,
    viewport: Viewport,
}

impl CloudLayer {
    /// Scatter clouds over the upper half of the viewport
    pub fn new(
        config: &GameConfig,
        viewport: Viewport,
        rng: &mut impl Rng,
        surface: &mut dyn RenderSurface,
    ) -> Self {
        let clouds = (0..config.cloud_count)
            .map(|_| {
                let size = Vec2::new(
                    rng.random::<f32>() * 100.0 + 50.0,
                    rng.random::<f32>() * 50.0 + 25.0,
                );
                let pos = Vec2::new(
                    rng.random::<f32>() * viewport.width,
                    rng.random::<f32>() * (viewport.height / 2.0),
                );
                let node = surface.add_node(
                    Layer::Background,
                    Shape::Cloud {
                        size,
                        fill: CLOUD_COLOR,
                    },
                );
                surface.set_position(node, pos);
                Cloud { pos, size, node }
            })
            .collect();

        Self {
            clouds,
            speed: config.cloud_speed,
            viewport,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    /// Drift left; a cloud fully past the left edge re-enters on the right
    /// at a new height
    pub fn update(&mut self, rng: &mut impl Rng) {
        for cloud in &mut self.clouds {
            cloud.pos.x -= self.speed;
            if cloud.pos.x + cloud.size.x < 0.0 {
                cloud.pos.x = self.viewport.width;
                cloud.pos.y = rng.random::<f32>() * (self.viewport.height / 2.0);
            }
        }
    }

    pub fn sync(&self, surface: &mut dyn RenderSurface) {
        for cloud in &self.clouds {
            surface.set_position(cloud.node, cloud.pos);
        }
    }

    pub fn release(&mut self, surface: &mut dyn RenderSurface) {
        for cloud in self.clouds.drain(..) {
            surface.remove_node(cloud.node);
        }
    }
}
