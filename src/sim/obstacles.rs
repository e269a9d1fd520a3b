//! Obstacle spawning and lifecycle
//!
//! Obstacles enter past the right edge at a fixed wall-clock cadence, scroll
//! left one fixed step per tick, latch `passed` once the body is past them and
//! are dropped once fully off the left edge.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::body_obstacle_collision;
use super::state::Body;
use crate::config::GameConfig;
use crate::renderer::{Color, Layer, NodeId, RenderSurface, Shape, Viewport};

pub const TOWER_COLOR: Color = Color(0x988C80);
pub const WINDOW_COLOR: Color = Color(0xFFFF00);

/// Surface nodes of the two barriers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierNodes {
    pub top: NodeId,
    pub bottom: NodeId,
}

/// A top/bottom barrier pair sharing one column and one gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub gap_center: f32,
    pub gap: f32,
    pub width: f32,
    /// Scoring latch, flips false -> true exactly once
    pub passed: bool,
    pub nodes: Option<BarrierNodes>,
}

impl Obstacle {
    /// An obstacle with no visuals attached
    pub fn new(id: u32, x: f32, gap_center: f32, gap: f32, width: f32) -> Self {
        Self {
            id,
            x,
            gap_center,
            gap,
            width,
            passed: false,
            nodes: None,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge of the top barrier
    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap / 2.0
    }

    /// Top edge of the bottom barrier
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap / 2.0
    }

    pub fn top_height(&self) -> f32 {
        self.gap_top()
    }

    /// Bottom barrier reaches down to the ground strip
    pub fn bottom_height(&self, ground_y: f32) -> f32 {
        ground_y - self.gap_bottom()
    }

    /// Scroll left by one tick's worth
    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// Latch `passed` the first time the right edge is behind `body_x`.
    /// True only on the call that flips it.
    pub fn mark_passed(&mut self, body_x: f32) -> bool {
        if !self.passed && self.right() < body_x {
            self.passed = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }

    fn attach(&mut self, ground_y: f32, surface: &mut dyn RenderSurface) {
        let top = surface.add_node(
            Layer::Game,
            Shape::Tower {
                size: Vec2::new(self.width, self.top_height().max(0.0)),
                fill: TOWER_COLOR,
                window_fill: WINDOW_COLOR,
            },
        );
        let bottom = surface.add_node(
            Layer::Game,
            Shape::Tower {
                size: Vec2::new(self.width, self.bottom_height(ground_y).max(0.0)),
                fill: TOWER_COLOR,
                window_fill: WINDOW_COLOR,
            },
        );
        self.nodes = Some(BarrierNodes { top, bottom });
        self.sync(surface);
    }

    fn detach(&mut self, surface: &mut dyn RenderSurface) {
        if let Some(nodes) = self.nodes.take() {
            surface.remove_node(nodes.top);
            surface.remove_node(nodes.bottom);
        }
    }

    /// Push the current column position to the surface
    pub fn sync(&self, surface: &mut dyn RenderSurface) {
        if let Some(nodes) = self.nodes {
            surface.set_position(nodes.top, Vec2::new(self.x, 0.0));
            surface.set_position(nodes.bottom, Vec2::new(self.x, self.gap_bottom()));
        }
    }
}

/// Range of gap centers that keeps the whole gap between the top margin and
/// the bottom margin above the ground. `None` if the viewport is too short.
pub fn gap_center_range(config: &GameConfig, viewport: Viewport) -> Option<(f32, f32)> {
    let half_gap = config.obstacle_gap / 2.0;
    let lo = config.obstacle_top_margin + half_gap;
    let hi = viewport.height - config.ground_height - config.obstacle_bottom_margin - half_gap;
    (lo <= hi).then_some((lo, hi))
}

/// What one obstacle pass of a tick produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObstacleStep {
    /// Obstacles newly passed before any hit
    pub passed: u32,
    /// First obstacle the body hit
    pub hit: Option<u32>,
    pub removed: usize,
}

/// Live obstacles in spawn (FIFO) order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    /// Obstacles passed since the last clear, including pruned ones
    passed_total: u32,
    next_id: u32,
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            passed_total: 0,
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn passed_total(&self) -> u32 {
        self.passed_total
    }

    /// Add an obstacle just past the right edge with a random gap
    pub fn spawn(
        &mut self,
        config: &GameConfig,
        viewport: Viewport,
        rng: &mut impl Rng,
        surface: &mut dyn RenderSurface,
    ) -> &Obstacle {
        let ground_y = viewport.height - config.ground_height;
        let gap_center = match gap_center_range(config, viewport) {
            Some((lo, hi)) => rng.random_range(lo..=hi),
            None => {
                log::warn!(
                    "Viewport height {} too short for a {} gap, centering",
                    viewport.height,
                    config.obstacle_gap
                );
                ground_y / 2.0
            }
        };

        let id = self.next_id;
        self.next_id += 1;
        self.push(
            Obstacle::new(
                id,
                viewport.width + config.obstacle_spawn_offset,
                gap_center,
                config.obstacle_gap,
                config.obstacle_width,
            ),
            ground_y,
            surface,
        )
    }

    /// Attach and append a prepared obstacle
    pub fn push(
        &mut self,
        mut obstacle: Obstacle,
        ground_y: f32,
        surface: &mut dyn RenderSurface,
    ) -> &Obstacle {
        self.next_id = self.next_id.max(obstacle.id + 1);
        obstacle.attach(ground_y, surface);
        log::debug!(
            "Spawned obstacle {} at x={} gap_center={}",
            obstacle.id,
            obstacle.x,
            obstacle.gap_center
        );
        self.obstacles.push(obstacle);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// One tick over every obstacle, oldest first: advance, latch passed,
    /// prune off-screen ones, test collision with the body.
    ///
    /// The retained set is rebuilt in order, so no obstacle is skipped or
    /// visited twice. Passes after the first hit in the same tick don't
    /// latch.
    pub fn step(
        &mut self,
        body: &Body,
        speed: f32,
        surface: &mut dyn RenderSurface,
    ) -> ObstacleStep {
        let mut outcome = ObstacleStep::default();
        let passed_total = &mut self.passed_total;

        self.obstacles.retain_mut(|obstacle| {
            obstacle.advance(speed);

            if outcome.hit.is_none() && obstacle.mark_passed(body.pos.x) {
                *passed_total += 1;
                outcome.passed += 1;
            }

            if obstacle.is_off_screen() {
                obstacle.detach(surface);
                outcome.removed += 1;
                return false;
            }

            if outcome.hit.is_none() && body_obstacle_collision(body.pos, body.size, obstacle) {
                outcome.hit = Some(obstacle.id);
            }
            true
        });

        outcome
    }

    /// Sync every obstacle's nodes to its position
    pub fn sync(&self, surface: &mut dyn RenderSurface) {
        for obstacle in &self.obstacles {
            obstacle.sync(surface);
        }
    }

    /// Drop every obstacle and its visuals
    pub fn clear(&mut self, surface: &mut dyn RenderSurface) {
        for obstacle in &mut self.obstacles {
            obstacle.detach(surface);
        }
        self.obstacles.clear();
        self.passed_total = 0;
    }
}

/// Wall-clock spawn cadence
///
/// Fed with frame deltas; when an interval elapses it queues one spawn
/// request for the next tick boundary. Stopping discards progress, so no
/// missed spawns are replayed after a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTimer {
    interval_ms: f64,
    elapsed_ms: f64,
    running: bool,
    pending: bool,
}

impl SpawnTimer {
    /// A stopped timer
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0.0,
            running: false,
            pending: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_ms = 0.0;
        self.pending = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_ms = 0.0;
        self.pending = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Accumulate elapsed time. At most one request is queued no matter how
    /// long the frame was.
    pub fn advance(&mut self, dt_ms: f64) {
        if !self.running || dt_ms.is_nan() || dt_ms <= 0.0 {
            return;
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= self.interval_ms {
            self.pending = true;
            self.elapsed_ms %= self.interval_ms;
        }
    }

    /// Consume the queued spawn request, if any
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HeadlessSurface;
    use crate::sim::state::RngState;

    fn body_at(x: f32, y: f32) -> Body {
        Body::new(x, y, 30.0)
    }

    #[test]
    fn test_barrier_geometry_scenario() {
        // gap_center 300, gap 300, viewport 800 tall, ground 80
        let obstacle = Obstacle::new(1, 0.0, 300.0, 300.0, 60.0);
        let ground_y = 800.0 - 80.0;
        assert_eq!(obstacle.top_height(), 150.0);
        assert_eq!(obstacle.gap_bottom(), 450.0);
        assert_eq!(obstacle.bottom_height(ground_y), 270.0);
    }

    #[test]
    fn test_push_attaches_towers() {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let mut field = ObstacleField::new();
        let obstacle = field.push(Obstacle::new(7, 460.0, 300.0, 300.0, 60.0), 720.0, &mut surface);
        let nodes = obstacle.nodes.unwrap();

        let top = surface.node(nodes.top).unwrap();
        assert_eq!(top.pos, Vec2::new(460.0, 0.0));
        assert!(matches!(top.shape, Shape::Tower { size, .. } if size == Vec2::new(60.0, 150.0)));
        let bottom = surface.node(nodes.bottom).unwrap();
        assert_eq!(bottom.pos, Vec2::new(460.0, 450.0));
        assert!(matches!(bottom.shape, Shape::Tower { size, .. } if size == Vec2::new(60.0, 270.0)));
    }

    #[test]
    fn test_spawn_position_and_gap_range() {
        let config = GameConfig::default();
        let viewport = Viewport::new(400.0, 800.0);
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let mut rng = RngState::new(42).to_rng();
        let mut field = ObstacleField::new();
        let (lo, hi) = gap_center_range(&config, viewport).unwrap();
        let ground_y = viewport.height - config.ground_height;

        for _ in 0..200 {
            let obstacle = field.spawn(&config, viewport, &mut rng, &mut surface);
            assert_eq!(obstacle.x, 460.0);
            assert!(obstacle.gap_center >= lo && obstacle.gap_center <= hi);
            assert!(obstacle.gap_top() >= config.obstacle_top_margin);
            assert!(obstacle.gap_bottom() <= ground_y - config.obstacle_bottom_margin);
            assert!(obstacle.top_height() > 0.0);
            assert!(obstacle.bottom_height(ground_y) > 0.0);
        }
        assert_eq!(field.len(), 200);
        assert_eq!(surface.count_in(Layer::Game), 400);
    }

    #[test]
    fn test_spawn_short_viewport_centers_gap() {
        let config = GameConfig::default();
        let viewport = Viewport::new(400.0, 300.0);
        let mut surface = HeadlessSurface::new(400.0, 300.0);
        let mut rng = RngState::new(1).to_rng();
        let mut field = ObstacleField::new();
        assert!(gap_center_range(&config, viewport).is_none());
        let obstacle = field.spawn(&config, viewport, &mut rng, &mut surface);
        assert_eq!(obstacle.gap_center, (300.0 - 80.0) / 2.0);
    }

    #[test]
    fn test_mark_passed_latches_once() {
        let mut obstacle = Obstacle::new(1, 100.0, 300.0, 300.0, 60.0);
        // right edge 160, body at 160: not yet behind
        assert!(!obstacle.mark_passed(160.0));
        assert!(obstacle.mark_passed(160.5));
        assert!(obstacle.passed);
        assert!(!obstacle.mark_passed(500.0));
    }

    #[test]
    fn test_step_scores_each_obstacle_once() {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let mut field = ObstacleField::new();
        let body = body_at(140.0, 300.0);
        field.push(Obstacle::new(1, 90.0, 300.0, 300.0, 60.0), 720.0, &mut surface);

        // right edge 150 -> 148 -> ... crosses 140 after 6 ticks
        let mut scored = 0;
        for _ in 0..20 {
            let outcome = field.step(&body, 2.0, &mut surface);
            assert_eq!(outcome.hit, None);
            scored += outcome.passed;
        }
        assert_eq!(scored, 1);
        assert_eq!(field.passed_total(), 1);
    }

    #[test]
    fn test_step_prunes_in_order_without_skipping() {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let mut field = ObstacleField::new();
        let body = body_at(300.0, 300.0);
        // Two about to leave, one in the middle, one more about to leave after it
        field.push(Obstacle::new(1, -61.0, 300.0, 300.0, 60.0), 720.0, &mut surface);
        field.push(Obstacle::new(2, -60.5, 300.0, 300.0, 60.0), 720.0, &mut surface);
        field.push(Obstacle::new(3, 50.0, 300.0, 300.0, 60.0), 720.0, &mut surface);
        field.push(Obstacle::new(4, -59.0, 300.0, 300.0, 60.0), 720.0, &mut surface);
        field.push(Obstacle::new(5, 200.0, 300.0, 300.0, 60.0), 720.0, &mut surface);

        let outcome = field.step(&body, 2.0, &mut surface);
        assert_eq!(outcome.removed, 3);
        let ids: Vec<u32> = field.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 5]);
        // Every survivor advanced exactly once
        let xs: Vec<f32> = field.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![48.0, 198.0]);
        // Pruned visuals are gone
        assert_eq!(surface.count_in(Layer::Game), 4);
    }

    #[test]
    fn test_step_reports_first_hit() {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let mut field = ObstacleField::new();
        // Body high up in the top barrier's column
        let body = body_at(140.0, 50.0);
        field.push(Obstacle::new(1, 120.0, 300.0, 300.0, 60.0), 720.0, &mut surface);
        field.push(Obstacle::new(2, 130.0, 300.0, 300.0, 60.0), 720.0, &mut surface);

        let outcome = field.step(&body, 2.0, &mut surface);
        assert_eq!(outcome.hit, Some(1));
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut surface = HeadlessSurface::new(400.0, 800.0);
        let mut field = ObstacleField::new();
        let body = body_at(140.0, 300.0);
        field.push(Obstacle::new(1, 60.0, 300.0, 300.0, 60.0), 720.0, &mut surface);
        field.push(Obstacle::new(2, 300.0, 300.0, 300.0, 60.0), 720.0, &mut surface);
        field.step(&body, 2.0, &mut surface);
        assert_eq!(field.passed_total(), 1);

        field.clear(&mut surface);
        assert!(field.is_empty());
        assert_eq!(field.passed_total(), 0);
        assert_eq!(surface.node_count(), 0);
    }

    #[test]
    fn test_spawn_timer_cadence() {
        let mut timer = SpawnTimer::new(1200.0);
        timer.advance(5000.0);
        assert!(!timer.take_request(), "stopped timer never fires");

        timer.start();
        for _ in 0..71 {
            timer.advance(1000.0 / 60.0);
        }
        assert!(!timer.take_request());
        timer.advance(1000.0 / 60.0);
        timer.advance(1000.0 / 60.0);
        assert!(timer.take_request());
        assert!(!timer.take_request(), "a request is consumed once");
    }

    #[test]
    fn test_spawn_timer_no_backlog() {
        let mut timer = SpawnTimer::new(1200.0);
        timer.start();
        // A long stall only yields one spawn
        timer.advance(10_000.0);
        assert!(timer.take_request());
        assert!(!timer.take_request());

        timer.advance(900.0);
        timer.stop();
        timer.start();
        timer.advance(900.0);
        assert!(!timer.take_request(), "progress before stop is discarded");
    }
}
