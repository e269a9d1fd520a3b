//! Game host
//!
//! Owns one running simulation together with its scene and HUD, queues
//! pointer input between frames and turns frame timestamps into ticks.

use crate::config::GameConfig;
use crate::error::GameError;
use crate::renderer::{RenderSurface, Scene};
use crate::sim::{GameEvent, GameState, Simulation, TickInput, tick};
use crate::ui::Hud;

#[derive(Debug)]
pub struct Game {
    sim: Simulation,
    scene: Scene,
    hud: Hud,
    /// Taps since the last frame
    pending_taps: u32,
    last_frame_ms: Option<f64>,
}

impl Game {
    /// Build a game on `surface`
    ///
    /// The body texture is loaded before anything is attached, so a missing
    /// asset leaves the surface untouched and no frame can ever run.
    pub fn init(
        config: GameConfig,
        seed: u64,
        surface: &mut dyn RenderSurface,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let texture = surface.load_texture(&config.body_texture)?;

        let viewport = surface.viewport();
        let sim = Simulation::new(config, viewport, seed, surface);
        let scene = Scene::new(&sim, texture, surface);
        let hud = Hud::new(surface, viewport);

        Ok(Self {
            sim,
            scene,
            hud,
            pending_taps: 0,
            last_frame_ms: None,
        })
    }

    /// Queue a tap for the next frame
    pub fn pointer_down(&mut self) {
        self.pending_taps += 1;
    }

    pub fn state(&self) -> &GameState {
        &self.sim.state
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn is_game_over_shown(&self) -> bool {
        self.hud.is_game_over_shown()
    }

    /// Run one tick for a display refresh at `now_ms`
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn RenderSurface) -> Vec<GameEvent> {
        let elapsed_ms = match self.last_frame_ms {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        let input = TickInput {
            taps: std::mem::take(&mut self.pending_taps),
            elapsed_ms,
        };
        let events = tick(&mut self.sim, &input, surface);

        for event in &events {
            match event {
                GameEvent::Scored { score } => self.hud.update_score(surface, *score),
                GameEvent::Died { .. } => self.hud.show_game_over(surface),
                GameEvent::Restarted => {
                    self.hud.hide_game_over(surface);
                    self.hud.update_score(surface, 0);
                }
                GameEvent::Jumped { .. } | GameEvent::ObstacleSpawned { .. } => {}
            }
        }

        self.scene.sync(&self.sim, surface);
        events
    }

    /// Stop the game and detach every node it created
    pub fn teardown(self, surface: &mut dyn RenderSurface) {
        self.sim.teardown(surface);
        self.scene.release(surface);
        self.hud.release(surface);
        log::info!("Game torn down");
    }
}
