//! Geometry derived from node shapes
//!
//! Backends call these to turn a [`Shape`](super::Shape) into primitive
//! rectangles and circles, so every backend lays out windows and cloud puffs
//! the same way.

use glam::Vec2;

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

pub const WINDOW_SIZE: f32 = 12.0;
pub const WINDOW_SPACING: f32 = 20.0;
pub const WINDOW_INSET: f32 = 10.0;
pub const WINDOW_COLUMNS: u32 = 2;

/// Window rectangles for a tower of the given size, relative to its top-left
///
/// One row per full `WINDOW_SPACING` of height, two columns.
pub fn tower_windows(size: Vec2) -> Vec<Rect> {
    if size.y <= 0.0 {
        return Vec::new();
    }
    let rows = (size.y / WINDOW_SPACING).floor() as u32;
    let mut windows = Vec::with_capacity((rows * WINDOW_COLUMNS) as usize);
    for row in 0..rows {
        for col in 0..WINDOW_COLUMNS {
            windows.push(Rect::new(
                WINDOW_INSET + col as f32 * WINDOW_SPACING,
                WINDOW_INSET + row as f32 * WINDOW_SPACING,
                WINDOW_SIZE,
                WINDOW_SIZE,
            ));
        }
    }
    windows
}

/// Six overlapping circles making up a cloud, relative to the cloud origin
pub fn cloud_puffs(size: Vec2) -> [Circle; 6] {
    let (w, h) = (size.x, size.y);
    let puff = |x: f32, y: f32, radius: f32| Circle {
        center: Vec2::new(x, y),
        radius,
    };
    [
        puff(0.0, 0.0, h / 2.0),
        puff(w * 0.2, -h * 0.1, h * 0.45),
        puff(w * 0.4, 0.0, h * 0.5),
        puff(w * 0.2, h * 0.1, h * 0.4),
        puff(w * 0.5, -h * 0.05, h * 0.35),
        puff(w * 0.6, h * 0.05, h * 0.3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tower_windows_rows() {
        // 150 tall -> 7 rows of 2
        let windows = tower_windows(Vec2::new(60.0, 150.0));
        assert_eq!(windows.len(), 14);
        assert_eq!(windows[0], Rect::new(10.0, 10.0, 12.0, 12.0));
        assert_eq!(windows[1], Rect::new(30.0, 10.0, 12.0, 12.0));
        assert_eq!(windows[13].min, Vec2::new(30.0, 130.0));
    }

    #[test]
    fn test_tower_windows_degenerate() {
        assert!(tower_windows(Vec2::new(60.0, 0.0)).is_empty());
        assert!(tower_windows(Vec2::new(60.0, 19.0)).is_empty());
    }

    #[test]
    fn test_cloud_puffs_scale() {
        let puffs = cloud_puffs(Vec2::new(100.0, 50.0));
        assert_eq!(puffs[0].radius, 25.0);
        assert_eq!(puffs[2].center, Vec2::new(40.0, 0.0));
    }
}
