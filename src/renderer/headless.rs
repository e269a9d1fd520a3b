//! In-memory render surface
//!
//! Keeps every attached node in a map so tests and the native runner can
//! inspect what would be on screen.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec2;

use super::surface::{Color, Layer, NodeId, RenderSurface, Shape, TextureId, Viewport};
use crate::error::AssetError;

/// A node as the headless surface stores it
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessNode {
    pub layer: Layer,
    pub shape: Shape,
    pub pos: Vec2,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    viewport: Viewport,
    nodes: BTreeMap<NodeId, HeadlessNode>,
    textures: HashMap<String, TextureId>,
    /// Paths that fail to load
    missing: HashSet<String>,
    background: Color,
    next_id: u32,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            nodes: BTreeMap::new(),
            textures: HashMap::new(),
            missing: HashSet::new(),
            background: Color::BLACK,
            next_id: 1,
        }
    }

    /// Make `load_texture(path)` fail
    pub fn with_missing_texture(mut self, path: &str) -> Self {
        self.missing.insert(path.to_string());
        self
    }

    pub fn node(&self, id: NodeId) -> Option<&HeadlessNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes attached to a layer
    pub fn count_in(&self, layer: Layer) -> usize {
        self.nodes.values().filter(|n| n.layer == layer).count()
    }

    /// Text of every label, in attach order
    pub fn labels(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter_map(|n| match &n.shape {
                Shape::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }
}

impl RenderSurface for HeadlessSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError> {
        if self.missing.contains(path) {
            return Err(AssetError::NotFound(path.to_string()));
        }
        let next = TextureId(self.textures.len() as u32);
        Ok(*self.textures.entry(path.to_string()).or_insert(next))
    }

    fn add_node(&mut self, layer: Layer, shape: Shape) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            HeadlessNode {
                layer,
                shape,
                pos: Vec2::ZERO,
                alpha: 1.0,
            },
        );
        id
    }

    fn remove_node(&mut self, id: NodeId) {
        self.nodes.remove(&id);
    }

    fn set_position(&mut self, id: NodeId, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.pos = pos;
        }
    }

    fn set_size(&mut self, id: NodeId, new_size: Vec2) {
        if let Some(node) = self.nodes.get_mut(&id) {
            match &mut node.shape {
                Shape::Rect { size, .. }
                | Shape::Tower { size, .. }
                | Shape::Sprite { size, .. }
                | Shape::Cloud { size, .. } => *size = new_size,
                _ => {}
            }
        }
    }

    fn set_fill(&mut self, id: NodeId, new_fill: Color) {
        if let Some(node) = self.nodes.get_mut(&id) {
            match &mut node.shape {
                Shape::Rect { fill, .. } | Shape::Tower { fill, .. } | Shape::Cloud { fill, .. } => {
                    *fill = new_fill
                }
                Shape::Label { style, .. } => style.fill = new_fill,
                Shape::Sprite { .. } => {}
            }
        }
    }

    fn set_alpha(&mut self, id: NodeId, alpha: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.alpha = alpha;
        }
    }

    fn set_text(&mut self, id: NodeId, new_text: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if let Shape::Label { text, .. } = &mut node.shape {
                *text = new_text.to_string();
            }
        }
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_move_remove() {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let id = surface.add_node(
            Layer::Game,
            Shape::Rect {
                size: Vec2::new(10.0, 10.0),
                fill: Color::WHITE,
            },
        );
        surface.set_position(id, Vec2::new(5.0, 6.0));
        assert_eq!(surface.node(id).unwrap().pos, Vec2::new(5.0, 6.0));
        assert_eq!(surface.count_in(Layer::Game), 1);

        surface.remove_node(id);
        assert!(!surface.contains(id));
        // Removing twice is harmless
        surface.remove_node(id);
        assert_eq!(surface.node_count(), 0);
    }

    #[test]
    fn test_missing_texture() {
        let mut surface = HeadlessSurface::new(400.0, 800.0).with_missing_texture("/bird.png");
        assert_eq!(
            surface.load_texture("/bird.png"),
            Err(AssetError::NotFound("/bird.png".to_string()))
        );
        let a = surface.load_texture("/ok.png").unwrap();
        let b = surface.load_texture("/ok.png").unwrap();
        assert_eq!(a, b);
    }
}
