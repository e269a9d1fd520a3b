//! Static scene nodes and the per-frame position sync

use glam::Vec2;

use super::surface::{Color, Layer, NodeId, RenderSurface, Shape, TextureId};
use crate::sim::Simulation;

pub const GROUND_COLOR: Color = Color(0x6C1C0C);

/// Nodes that live as long as the game: the ground strip and the body sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    pub ground: NodeId,
    pub body: NodeId,
}

impl Scene {
    pub fn new(sim: &Simulation, body_texture: TextureId, surface: &mut dyn RenderSurface) -> Self {
        let ground = surface.add_node(
            Layer::Game,
            Shape::Rect {
                size: Vec2::new(sim.viewport.width, sim.config.ground_height),
                fill: GROUND_COLOR,
            },
        );
        surface.set_position(ground, Vec2::new(0.0, sim.ground_y()));

        let body = surface.add_node(
            Layer::Body,
            Shape::Sprite {
                texture: body_texture,
                size: Vec2::splat(sim.body.size),
            },
        );
        surface.set_position(body, sim.body.pos);

        Self { ground, body }
    }

    /// Push everything that moved this tick to the surface
    pub fn sync(&self, sim: &Simulation, surface: &mut dyn RenderSurface) {
        surface.set_background(sim.sky);
        sim.clouds.sync(surface);
        sim.obstacles.sync(surface);
        sim.particles.sync(surface);
        surface.set_position(self.body, sim.body.pos);
    }

    pub fn release(self, surface: &mut dyn RenderSurface) {
        surface.remove_node(self.ground);
        surface.remove_node(self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::renderer::{HeadlessSurface, Viewport};
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_scene_layout_and_sync() {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let texture = surface.load_texture("/heromama.png").unwrap();
        let mut sim = Simulation::new(
            GameConfig::default(),
            Viewport::new(400.0, 800.0),
            1,
            &mut surface,
        );
        let scene = Scene::new(&sim, texture, &mut surface);

        let ground = surface.node(scene.ground).unwrap();
        assert_eq!(ground.pos, Vec2::new(0.0, 720.0));
        assert_eq!(
            ground.shape,
            Shape::Rect {
                size: Vec2::new(400.0, 80.0),
                fill: GROUND_COLOR
            }
        );
        assert_eq!(surface.node(scene.body).unwrap().pos, Vec2::new(140.0, 400.0));

        let input = TickInput {
            taps: 1,
            elapsed_ms: 16.0,
        };
        tick(&mut sim, &input, &mut surface);
        scene.sync(&sim, &mut surface);

        assert_eq!(surface.node(scene.body).unwrap().pos, sim.body.pos);
        assert_eq!(surface.background(), sim.sky);
        for particle in sim.particles.iter() {
            let node = surface.node(particle.node).unwrap();
            assert_eq!(node.pos, particle.pos);
            assert_eq!(node.alpha, particle.alpha());
        }

        scene.release(&mut surface);
        sim.teardown(&mut surface);
        assert_eq!(surface.node_count(), 0);
    }
}
