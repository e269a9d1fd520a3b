//! Platform backends
//!
//! The browser backend paints onto a 2D canvas. Native builds have no
//! window and use [`crate::renderer::HeadlessSurface`] instead.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::CanvasSurface;
