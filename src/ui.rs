//! Score and game-over overlay

use glam::Vec2;

use crate::renderer::{Color, Layer, NodeId, RenderSurface, Shape, TextAlign, TextStyle, Viewport};

pub const GAME_OVER_TEXT: &str = "Game Over\nTap to Restart";

const SCORE_Y: f32 = 20.0;
const GAME_OVER_RISE: f32 = 60.0;

fn score_style() -> TextStyle {
    TextStyle {
        font_family: "Arial".to_string(),
        font_size: 48.0,
        bold: true,
        fill: Color::BLACK,
        stroke: Some(Color::WHITE),
        align: TextAlign::Center,
    }
}

fn game_over_style() -> TextStyle {
    TextStyle {
        font_size: 36.0,
        ..score_style()
    }
}

/// Heads-up display nodes
#[derive(Debug)]
pub struct Hud {
    score: NodeId,
    game_over: Option<NodeId>,
    viewport: Viewport,
    shown_score: u32,
}

impl Hud {
    pub fn new(surface: &mut dyn RenderSurface, viewport: Viewport) -> Self {
        let score = surface.add_node(
            Layer::Ui,
            Shape::Label {
                text: "0".to_string(),
                style: score_style(),
            },
        );
        surface.set_position(score, Vec2::new(viewport.width / 2.0, SCORE_Y));

        Self {
            score,
            game_over: None,
            viewport,
            shown_score: 0,
        }
    }

    pub fn update_score(&mut self, surface: &mut dyn RenderSurface, score: u32) {
        if score == self.shown_score {
            return;
        }
        self.shown_score = score;
        surface.set_text(self.score, &score.to_string());
    }

    pub fn is_game_over_shown(&self) -> bool {
        self.game_over.is_some()
    }

    /// Show the overlay. A second call while shown does nothing.
    pub fn show_game_over(&mut self, surface: &mut dyn RenderSurface) {
        if self.game_over.is_some() {
            return;
        }
        let node = surface.add_node(
            Layer::Ui,
            Shape::Label {
                text: GAME_OVER_TEXT.to_string(),
                style: game_over_style(),
            },
        );
        surface.set_position(
            node,
            Vec2::new(
                self.viewport.width / 2.0,
                self.viewport.height / 2.0 - GAME_OVER_RISE,
            ),
        );
        self.game_over = Some(node);
    }

    pub fn hide_game_over(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(node) = self.game_over.take() {
            surface.remove_node(node);
        }
    }

    pub fn release(mut self, surface: &mut dyn RenderSurface) {
        self.hide_game_over(surface);
        surface.remove_node(self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HeadlessSurface;

    fn setup() -> (Hud, HeadlessSurface) {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let hud = Hud::new(&mut surface, Viewport::new(400.0, 800.0));
        (hud, surface)
    }

    #[test]
    fn test_score_label() {
        let (mut hud, mut surface) = setup();
        assert_eq!(surface.labels(), vec!["0"]);
        let node = surface.node(hud.score).unwrap();
        assert_eq!(node.pos, Vec2::new(200.0, 20.0));

        hud.update_score(&mut surface, 3);
        assert_eq!(surface.labels(), vec!["3"]);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let (mut hud, mut surface) = setup();
        hud.show_game_over(&mut surface);
        hud.show_game_over(&mut surface);
        assert_eq!(surface.count_in(Layer::Ui), 2);
        assert!(surface.labels().contains(&GAME_OVER_TEXT));

        let node = surface.node(hud.game_over.unwrap()).unwrap();
        assert_eq!(node.pos, Vec2::new(200.0, 340.0));
        assert!(matches!(&node.shape, Shape::Label { style, .. } if style.font_size == 36.0));

        hud.hide_game_over(&mut surface);
        hud.hide_game_over(&mut surface);
        assert!(!hud.is_game_over_shown());
        assert_eq!(surface.count_in(Layer::Ui), 1);
    }

    #[test]
    fn test_release() {
        let (mut hud, mut surface) = setup();
        hud.show_game_over(&mut surface);
        hud.release(&mut surface);
        assert_eq!(surface.node_count(), 0);
    }
}
