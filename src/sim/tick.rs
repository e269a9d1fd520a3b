//! Per-frame simulation step
//!
//! One `tick` per display refresh. Physics advances one logical step per
//! tick with no delta-time scaling, so the game runs slower on a slower
//! display. Wall-clock time only drives the obstacle spawn cadence.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::ambient::{CloudLayer, DayNightCycle};
use super::collision::body_ground_collision;
use super::obstacles::{ObstacleField, SpawnTimer};
use super::particles::ParticleSystem;
use super::state::{Body, GameState, PressOutcome, RngState};
use crate::config::GameConfig;
use crate::renderer::{Color, RenderSurface, Viewport};

/// Everything that happened since the last tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer presses, in arrival order
    pub taps: u32,
    /// Wall-clock time since the previous tick (ms)
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Ground,
    Obstacle { id: u32 },
}

/// Notable outcomes of a tick, for the HUD and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped { at: Vec2 },
    Restarted,
    ObstacleSpawned { id: u32 },
    Scored { score: u32 },
    Died { cause: DeathCause, score: u32 },
}

/// The single owned simulation context
///
/// Input and spawn requests are queued and applied at the start of the next
/// tick, so `tick` holding `&mut Simulation` is the only place gameplay
/// state changes.
#[derive(Debug)]
pub struct Simulation {
    pub config: GameConfig,
    pub viewport: Viewport,
    pub seed: u64,
    pub state: GameState,
    pub body: Body,
    pub obstacles: ObstacleField,
    pub particles: ParticleSystem,
    pub spawn_timer: SpawnTimer,
    pub day_night: DayNightCycle,
    pub clouds: CloudLayer,
    /// Ticks simulated while alive
    pub time_ticks: u64,
    /// Current sky color
    pub sky: Color,
    rng: Pcg32,
}

impl Simulation {
    /// Set up a fresh run. The spawn timer starts immediately.
    pub fn new(
        config: GameConfig,
        viewport: Viewport,
        seed: u64,
        surface: &mut dyn RenderSurface,
    ) -> Self {
        let mut rng = RngState::new(seed).to_rng();
        let body = Body::new(
            viewport.width * config.body_x_fraction,
            viewport.height / 2.0,
            config.body_size,
        );
        let clouds = CloudLayer::new(&config, viewport, &mut rng, surface);
        let day_night = DayNightCycle::new(&config);
        let sky = day_night.color();
        let mut spawn_timer = SpawnTimer::new(config.obstacle_interval_ms);
        spawn_timer.start();

        log::info!(
            "Simulation started: viewport {}x{}, seed {}",
            viewport.width,
            viewport.height,
            seed
        );

        Self {
            particles: ParticleSystem::new(&config),
            obstacles: ObstacleField::new(),
            state: GameState::new(),
            body,
            spawn_timer,
            day_night,
            clouds,
            time_ticks: 0,
            sky,
            viewport,
            seed,
            config,
            rng,
        }
    }

    /// Top edge of the ground strip
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.viewport.height - self.config.ground_height
    }

    /// Apply one tap: jump (with a particle burst) while alive, restart
    /// while dead
    pub fn press(&mut self, surface: &mut dyn RenderSurface) -> GameEvent {
        match self.state.press(self.config.jump_velocity) {
            PressOutcome::Jumped => {
                self.body.velocity = self.state.velocity;
                self.particles.burst(
                    self.body.pos,
                    self.config.burst_size,
                    &mut self.rng,
                    surface,
                );
                GameEvent::Jumped { at: self.body.pos }
            }
            PressOutcome::Restarted => {
                self.reset_run(surface);
                GameEvent::Restarted
            }
        }
    }

    /// Dead -> Alive: back to the start with an empty field and a fresh
    /// spawn timer. No-op while alive.
    pub fn restart(&mut self, surface: &mut dyn RenderSurface) -> bool {
        if !self.state.restart() {
            return false;
        }
        self.reset_run(surface);
        true
    }

    fn reset_run(&mut self, surface: &mut dyn RenderSurface) {
        self.body.reset();
        self.state.velocity = self.body.velocity;
        self.obstacles.clear(surface);
        self.spawn_timer.start();
        log::info!("Restarted");
    }

    /// Alive -> Dead. The spawn timer is stopped before anything else can
    /// observe the dead state.
    fn die(&mut self, cause: DeathCause) -> Option<GameEvent> {
        self.spawn_timer.stop();
        if !self.state.die() {
            return None;
        }
        log::info!("Died ({:?}) with score {}", cause, self.state.score);
        Some(GameEvent::Died {
            cause,
            score: self.state.score,
        })
    }

    /// Drop every visual this simulation owns. Consumes the simulation so
    /// nothing can step it afterwards.
    pub fn teardown(mut self, surface: &mut dyn RenderSurface) {
        self.spawn_timer.stop();
        self.particles.clear(surface);
        self.obstacles.clear(surface);
        self.clouds.release(surface);
        log::info!("Simulation torn down after {} ticks", self.time_ticks);
    }
}

/// Advance the simulation by one frame
pub fn tick(
    sim: &mut Simulation,
    input: &TickInput,
    surface: &mut dyn RenderSurface,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Tick boundary: queued input, then queued spawns
    for _ in 0..input.taps {
        events.push(sim.press(surface));
    }

    sim.spawn_timer.advance(input.elapsed_ms);
    if sim.spawn_timer.take_request() {
        let id = sim
            .obstacles
            .spawn(&sim.config, sim.viewport, &mut sim.rng, surface)
            .id;
        events.push(GameEvent::ObstacleSpawned { id });
    }

    if sim.state.is_dead() {
        return events;
    }

    sim.time_ticks += 1;

    // Ambient
    sim.sky = sim.day_night.update();
    sim.clouds.update(&mut sim.rng);

    sim.particles.tick(surface);

    // Physics
    sim.body.integrate(sim.config.gravity);
    sim.state.velocity = sim.body.velocity;

    // Ground
    let ground_y = sim.ground_y();
    if body_ground_collision(sim.body.pos, sim.body.size, ground_y) {
        sim.body.pos.y = ground_y - sim.config.ground_rest_offset;
        events.extend(sim.die(DeathCause::Ground));
        return events;
    }

    // Obstacles
    let outcome = sim
        .obstacles
        .step(&sim.body, sim.config.obstacle_speed, surface);
    for _ in 0..outcome.passed {
        if sim.state.increment_score() {
            log::debug!("Score {}", sim.state.score);
            events.push(GameEvent::Scored {
                score: sim.state.score,
            });
        }
    }
    if let Some(id) = outcome.hit {
        events.extend(sim.die(DeathCause::Obstacle { id }));
    }

    events
}
