//! Canvas 2D backend
//!
//! Keeps a retained node list and repaints the whole canvas once per frame,
//! back to front by layer then attach order.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::error::AssetError;
use crate::renderer::shapes::{cloud_puffs, tower_windows};
use crate::renderer::{
    Color, Layer, NodeId, RenderSurface, Shape, TextAlign, TextStyle, TextureId, Viewport,
};

/// Label line spacing as a multiple of the font size
const LINE_HEIGHT: f64 = 1.2;
const TEXT_OUTLINE_WIDTH: f64 = 4.0;

#[derive(Debug, Clone)]
struct CanvasNode {
    layer: Layer,
    shape: Shape,
    pos: Vec2,
    alpha: f32,
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
    nodes: BTreeMap<NodeId, CanvasNode>,
    /// Decoded images by path, filled by [`CanvasSurface::preload`]
    images: HashMap<String, HtmlImageElement>,
    textures: Vec<HtmlImageElement>,
    texture_ids: HashMap<String, TextureId>,
    background: Color,
    next_id: u32,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, AssetError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| AssetError::NotFound("canvas 2d context".to_string()))?;

        Ok(Self {
            ctx,
            viewport: Viewport::new(canvas.width() as f32, canvas.height() as f32),
            nodes: BTreeMap::new(),
            images: HashMap::new(),
            textures: Vec::new(),
            texture_ids: HashMap::new(),
            background: Color::BLACK,
            next_id: 1,
        })
    }

    /// Fetch and decode an image so `load_texture` can hand it out
    pub async fn preload(&mut self, path: &str) -> Result<(), AssetError> {
        let image = HtmlImageElement::new().map_err(|e| AssetError::Decode {
            path: path.to_string(),
            reason: format!("{e:?}"),
        })?;
        image.set_src(path);
        JsFuture::from(image.decode())
            .await
            .map_err(|e| AssetError::Decode {
                path: path.to_string(),
                reason: format!("{e:?}"),
            })?;

        log::info!(
            "Loaded {} ({}x{})",
            path,
            image.natural_width(),
            image.natural_height()
        );
        self.images.insert(path.to_string(), image);
        Ok(())
    }

    /// Repaint every node
    pub fn draw(&self) {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(&self.background.to_css());
        ctx.fill_rect(
            0.0,
            0.0,
            self.viewport.width as f64,
            self.viewport.height as f64,
        );

        let mut nodes: Vec<(&NodeId, &CanvasNode)> = self.nodes.iter().collect();
        nodes.sort_by_key(|(id, node)| (node.layer, **id));

        for (_, node) in nodes {
            ctx.set_global_alpha(node.alpha.clamp(0.0, 1.0) as f64);
            self.draw_node(node);
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_node(&self, node: &CanvasNode) {
        let ctx = &self.ctx;
        let (x, y) = (node.pos.x as f64, node.pos.y as f64);

        match &node.shape {
            Shape::Rect { size, fill } => {
                ctx.set_fill_style_str(&fill.to_css());
                ctx.fill_rect(x, y, size.x as f64, size.y as f64);
            }
            Shape::Tower {
                size,
                fill,
                window_fill,
            } => {
                ctx.set_fill_style_str(&fill.to_css());
                ctx.fill_rect(x, y, size.x as f64, size.y as f64);
                ctx.set_fill_style_str(&window_fill.to_css());
                for window in tower_windows(*size) {
                    ctx.fill_rect(
                        x + window.min.x as f64,
                        y + window.min.y as f64,
                        window.size.x as f64,
                        window.size.y as f64,
                    );
                }
            }
            Shape::Sprite { texture, size } => {
                let Some(image) = self.textures.get(texture.0 as usize) else {
                    return;
                };
                if let Err(e) = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    image,
                    x - size.x as f64 / 2.0,
                    y - size.y as f64 / 2.0,
                    size.x as f64,
                    size.y as f64,
                ) {
                    log::warn!("draw_image failed: {:?}", e);
                }
            }
            Shape::Cloud { size, fill } => {
                ctx.set_fill_style_str(&fill.to_css());
                for puff in cloud_puffs(*size) {
                    ctx.begin_path();
                    let _ = ctx.arc(
                        x + puff.center.x as f64,
                        y + puff.center.y as f64,
                        puff.radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    ctx.fill();
                }
            }
            Shape::Label { text, style } => self.draw_label(text, style, x, y),
        }
    }

    fn draw_label(&self, text: &str, style: &TextStyle, x: f64, y: f64) {
        let ctx = &self.ctx;
        let weight = if style.bold { "bold " } else { "" };
        ctx.set_font(&format!(
            "{}{}px {}",
            weight, style.font_size, style.font_family
        ));
        ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        ctx.set_text_baseline("top");
        ctx.set_fill_style_str(&style.fill.to_css());
        if let Some(stroke) = style.stroke {
            ctx.set_stroke_style_str(&stroke.to_css());
            ctx.set_line_width(TEXT_OUTLINE_WIDTH);
        }

        let line_height = style.font_size as f64 * LINE_HEIGHT;
        for (i, line) in text.lines().enumerate() {
            let line_y = y + i as f64 * line_height;
            if style.stroke.is_some() {
                let _ = ctx.stroke_text(line, x, line_y);
            }
            let _ = ctx.fill_text(line, x, line_y);
        }
    }
}

impl RenderSurface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError> {
        if let Some(id) = self.texture_ids.get(path) {
            return Ok(*id);
        }
        let image = self
            .images
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))?;
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(image);
        self.texture_ids.insert(path.to_string(), id);
        Ok(id)
    }

    fn add_node(&mut self, layer: Layer, shape: Shape) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            CanvasNode {
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
                Shape::Label { .. } => {}
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
