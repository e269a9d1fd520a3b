//! Render surface abstraction
//!
//! The game never draws directly. It attaches retained nodes to a surface,
//! moves them around and detaches them when the thing they show goes away.
//! Backends decide how to paint them (Canvas 2D on the web, an in-memory
//! scene graph for tests and the native runner).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Handle to a node attached to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Handle to a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Packed 0xRRGGBB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);

    #[inline]
    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// CSS hex string (`#rrggbb`)
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0 & 0xFFFFFF)
    }
}

/// Size of the drawable area in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Draw order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Game,
    Particles,
    Body,
    Ui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font styling for labels; how it is realized is up to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub fill: Color,
    /// Outline color, if any
    pub stroke: Option<Color>,
    pub align: TextAlign,
}

/// What a node looks like
///
/// Positions set through [`RenderSurface::set_position`] are the top-left
/// corner for rectangles and towers, the center for sprites and labels, and
/// the first puff's center for clouds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect { size: Vec2, fill: Color },
    /// An obstacle barrier: a rectangle with a grid of lit windows
    Tower { size: Vec2, fill: Color, window_fill: Color },
    /// An image scaled to `size`
    Sprite { texture: TextureId, size: Vec2 },
    Cloud { size: Vec2, fill: Color },
    Label { text: String, style: TextStyle },
}

/// Everything the game needs from a rendering backend
pub trait RenderSurface {
    /// Current drawable size
    fn viewport(&self) -> Viewport;

    /// Load an image. Failing here is fatal to startup.
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError>;

    /// Attach a new node, initially at the origin and fully opaque
    fn add_node(&mut self, layer: Layer, shape: Shape) -> NodeId;

    /// Detach a node. Unknown ids are ignored.
    fn remove_node(&mut self, id: NodeId);

    fn set_position(&mut self, id: NodeId, pos: Vec2);

    /// Resize a rect, tower, sprite or cloud node
    fn set_size(&mut self, id: NodeId, size: Vec2);

    fn set_fill(&mut self, id: NodeId, fill: Color);

    fn set_alpha(&mut self, id: NodeId, alpha: f32);

    /// Replace a label's text
    fn set_text(&mut self, id: NodeId, text: &str);

    /// Clear color behind every layer
    fn set_background(&mut self, color: Color);
}
