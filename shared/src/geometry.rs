//! Axis-aligned path rectangles and the insertion-ordered set the movement
//! clamp and the zone editor operate on.

use serde::{Deserialize, Serialize};

use crate::GRID;

/// Edge-adjacency tolerance: 5% of one grid unit.
pub const TOUCH_EPSILON: f32 = 0.05 * GRID;

/// An authored axis-aligned, non-rotated rectangle. `(x, y)` is the top-left
/// corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PathRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive containment test, padded on all sides.
    pub fn contains(&self, px: f32, py: f32, padding: f32) -> bool {
        px >= self.x - padding
            && px <= self.x + self.w + padding
            && py >= self.y - padding
            && py <= self.y + self.h + padding
    }

    /// True when any edge of `self` lies within [`TOUCH_EPSILON`] of the
    /// opposing edge of `other`, on either axis.
    pub fn touches(&self, other: &PathRect) -> bool {
        ((self.x + self.w) - other.x).abs() <= TOUCH_EPSILON
            || ((other.x + other.w) - self.x).abs() <= TOUCH_EPSILON
            || ((self.y + self.h) - other.y).abs() <= TOUCH_EPSILON
            || ((other.y + other.h) - self.y).abs() <= TOUCH_EPSILON
    }
}

/// Insertion-ordered collection of path rectangles.
///
/// Search order is insertion order and the first match wins; there is no
/// distance-based ranking anywhere in the movement model, so iteration
/// order is part of the contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathSet {
    rects: Vec<PathRect>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rects(rects: Vec<PathRect>) -> Self {
        Self { rects }
    }

    pub fn rects(&self) -> &[PathRect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PathRect> {
        self.rects.get(index)
    }

    /// First rectangle containing the point under the given padding.
    pub fn find_containing(&self, px: f32, py: f32, padding: f32) -> Option<usize> {
        self.rects
            .iter()
            .position(|rect| rect.contains(px, py, padding))
    }

    /// Adds a rectangle, merging it into the first existing rectangle that
    /// shares position and size on the perpendicular axis and touches it.
    /// Only one merge candidate is applied per insert.
    pub fn insert_merged(&mut self, rect: PathRect) {
        for existing in &mut self.rects {
            let aligned_horiz =
                existing.y == rect.y && existing.h == rect.h && existing.touches(&rect);
            let aligned_vert =
                existing.x == rect.x && existing.w == rect.w && existing.touches(&rect);

            if aligned_horiz {
                let min_x = existing.x.min(rect.x);
                let max_x = (existing.x + existing.w).max(rect.x + rect.w);
                existing.x = min_x;
                existing.w = max_x - min_x;
                return;
            }
            if aligned_vert {
                let min_y = existing.y.min(rect.y);
                let max_y = (existing.y + existing.h).max(rect.y + rect.h);
                existing.y = min_y;
                existing.h = max_y - min_y;
                return;
            }
        }
        self.rects.push(rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_strict() {
        let rect = PathRect::new(0.0, 0.0, 200.0, 50.0);

        assert!(rect.contains(100.0, 25.0, 0.0));
        assert!(rect.contains(0.0, 0.0, 0.0));
        assert!(rect.contains(200.0, 50.0, 0.0));
        assert!(!rect.contains(100.0, 51.0, 0.0));
        assert!(!rect.contains(-1.0, 25.0, 0.0));
    }

    #[test]
    fn test_contains_with_padding() {
        let rect = PathRect::new(0.0, 0.0, 200.0, 50.0);

        assert!(!rect.contains(100.0, 60.0, 0.0));
        assert!(rect.contains(100.0, 60.0, 16.0));
        assert!(rect.contains(-10.0, 25.0, 16.0));
        assert!(!rect.contains(100.0, 67.0, 16.0));
    }

    #[test]
    fn test_touches_within_epsilon() {
        let a = PathRect::new(0.0, 0.0, 32.0, 24.0);

        assert!(a.touches(&PathRect::new(32.0, 0.0, 32.0, 24.0)));
        assert!(a.touches(&PathRect::new(33.0, 0.0, 32.0, 24.0)));
        assert!(!a.touches(&PathRect::new(35.0, 0.0, 32.0, 24.0)));
        // other side
        assert!(PathRect::new(32.0, 0.0, 32.0, 24.0).touches(&a));
    }

    #[test]
    fn test_horizontal_merge() {
        let mut paths = PathSet::new();
        paths.insert_merged(PathRect::new(0.0, 0.0, 32.0, 24.0));
        paths.insert_merged(PathRect::new(32.0, 0.0, 32.0, 24.0));

        assert_eq!(paths.len(), 1);
        assert_eq!(paths.rects()[0], PathRect::new(0.0, 0.0, 64.0, 24.0));
    }

    #[test]
    fn test_vertical_merge() {
        let mut paths = PathSet::new();
        paths.insert_merged(PathRect::new(64.0, 0.0, 32.0, 32.0));
        paths.insert_merged(PathRect::new(64.0, 32.0, 32.0, 64.0));

        assert_eq!(paths.len(), 1);
        assert_eq!(paths.rects()[0], PathRect::new(64.0, 0.0, 32.0, 96.0));
    }

    #[test]
    fn test_no_merge_when_misaligned() {
        let mut paths = PathSet::new();
        paths.insert_merged(PathRect::new(0.0, 0.0, 32.0, 24.0));
        // touching but a different height on the perpendicular axis
        paths.insert_merged(PathRect::new(32.0, 0.0, 32.0, 32.0));

        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_only_first_merge_candidate_applies() {
        let mut paths = PathSet::new();
        paths.insert_merged(PathRect::new(0.0, 0.0, 32.0, 24.0));
        paths.insert_merged(PathRect::new(64.0, 0.0, 32.0, 24.0));
        // touches both neighbors; only the first (insertion order) absorbs it
        paths.insert_merged(PathRect::new(32.0, 0.0, 32.0, 24.0));

        assert_eq!(paths.len(), 2);
        assert_eq!(paths.rects()[0], PathRect::new(0.0, 0.0, 64.0, 24.0));
        assert_eq!(paths.rects()[1], PathRect::new(64.0, 0.0, 32.0, 24.0));
    }

    #[test]
    fn test_find_containing_is_insertion_order() {
        let paths = PathSet::from_rects(vec![
            PathRect::new(0.0, 0.0, 100.0, 100.0),
            PathRect::new(50.0, 50.0, 100.0, 100.0),
        ]);

        // point inside both rects resolves to the earlier one
        assert_eq!(paths.find_containing(60.0, 60.0, 0.0), Some(0));
        assert_eq!(paths.find_containing(120.0, 120.0, 0.0), Some(1));
        assert_eq!(paths.find_containing(500.0, 500.0, 0.0), None);
    }
}
