//! Rendering module
//!
//! The game draws through a retained-node [`RenderSurface`]: simulation code
//! attaches and detaches nodes, [`scene`] pushes positions once per frame,
//! and the backend decides how to paint them.

pub mod headless;
pub mod scene;
pub mod shapes;
pub mod surface;

pub use headless::{HeadlessNode, HeadlessSurface};
pub use scene::Scene;
pub use surface::{
    Color, Layer, NodeId, RenderSurface, Shape, TextAlign, TextStyle, TextureId, Viewport,
};
