//! Collision detection
//!
//! Axis-aligned tests between the body's bounding square and the ground or
//! an obstacle pair. Pure functions, exact comparisons, no tolerance.

use glam::Vec2;

use super::obstacles::Obstacle;

/// Edges of an axis-aligned box (screen coordinates, y grows down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Square of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            left: center.x - half,
            right: center.x + half,
            top: center.y - half,
            bottom: center.y + half,
        }
    }
}

/// Body touches or sinks into the ground. Touching counts.
#[inline]
pub fn body_ground_collision(body_pos: Vec2, body_size: f32, ground_y: f32) -> bool {
    body_pos.y + body_size / 2.0 >= ground_y
}

/// Body overlaps either barrier of an obstacle
///
/// Broad phase: any horizontal separation is a miss regardless of height.
/// Narrow phase: inside the obstacle's column the only safe zone is strictly
/// the gap.
pub fn body_obstacle_collision(body_pos: Vec2, body_size: f32, obstacle: &Obstacle) -> bool {
    let body = Bounds::centered(body_pos, body_size);

    if body.right < obstacle.left() || body.left > obstacle.right() {
        return false;
    }

    body.top < obstacle.gap_top() || body.bottom > obstacle.gap_bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obstacle_at(x: f32, gap_center: f32) -> Obstacle {
        Obstacle::new(1, x, gap_center, 300.0, 60.0)
    }

    #[test]
    fn test_ground_collision_scenario() {
        // 770 + 15 = 785 >= 750
        assert!(body_ground_collision(Vec2::new(140.0, 770.0), 30.0, 750.0));
    }

    #[test]
    fn test_ground_collision_equality_counts() {
        assert!(body_ground_collision(Vec2::new(0.0, 735.0), 30.0, 750.0));
        assert!(!body_ground_collision(Vec2::new(0.0, 734.9), 30.0, 750.0));
    }

    #[test]
    fn test_obstacle_inside_gap_is_safe() {
        // Gap spans 150..450, body spans 285..315 vertically
        let obstacle = obstacle_at(100.0, 300.0);
        assert!(!body_obstacle_collision(Vec2::new(130.0, 300.0), 30.0, &obstacle));
    }

    #[test]
    fn test_obstacle_top_and_bottom_barrier() {
        let obstacle = obstacle_at(100.0, 300.0);
        // Top edge at 149 < 150
        assert!(body_obstacle_collision(Vec2::new(130.0, 164.0), 30.0, &obstacle));
        // Bottom edge at 451 > 450
        assert!(body_obstacle_collision(Vec2::new(130.0, 436.0), 30.0, &obstacle));
    }

    #[test]
    fn test_obstacle_gap_edges_are_exact() {
        let obstacle = obstacle_at(100.0, 300.0);
        // Touching the gap edges exactly is still inside the gap
        assert!(!body_obstacle_collision(Vec2::new(130.0, 165.0), 30.0, &obstacle));
        assert!(!body_obstacle_collision(Vec2::new(130.0, 435.0), 30.0, &obstacle));
    }

    #[test]
    fn test_obstacle_touching_column_edge_counts() {
        // Body right edge == obstacle left edge is not separation
        let obstacle = obstacle_at(100.0, 300.0);
        assert!(body_obstacle_collision(Vec2::new(85.0, 50.0), 30.0, &obstacle));
        // Body left edge == obstacle right edge (160)
        assert!(body_obstacle_collision(Vec2::new(175.0, 50.0), 30.0, &obstacle));
        // One past either edge misses
        assert!(!body_obstacle_collision(Vec2::new(84.0, 50.0), 30.0, &obstacle));
        assert!(!body_obstacle_collision(Vec2::new(176.0, 50.0), 30.0, &obstacle));
    }

    proptest! {
        #[test]
        fn prop_horizontal_separation_vetoes(
            obstacle_x in -200.0f32..1000.0,
            offset in 0.01f32..500.0,
            y in -500.0f32..1500.0,
            to_the_left in any::<bool>(),
        ) {
            let size = 30.0;
            let obstacle = obstacle_at(obstacle_x, 300.0);
            let body_x = if to_the_left {
                // right edge strictly left of the obstacle
                obstacle.left() - size / 2.0 - offset
            } else {
                obstacle.right() + size / 2.0 + offset
            };
            let bounds = Bounds::centered(Vec2::new(body_x, y), size);
            prop_assume!(bounds.right < obstacle.left() || bounds.left > obstacle.right());
            prop_assert!(!body_obstacle_collision(Vec2::new(body_x, y), size, &obstacle));
        }

        #[test]
        fn prop_ground_collision_iff_bottom_reaches_ground(
            y in -100.0f32..1000.0,
            ground_y in 0.0f32..1000.0,
        ) {
            let hit = body_ground_collision(Vec2::new(0.0, y), 30.0, ground_y);
            prop_assert_eq!(hit, y + 15.0 >= ground_y);
        }
    }
}
