//! RectTransform - layout data for UI components

use engine_core::Component;
use glam::Vec2;

/// Anchored position, size and pivot of a UI element.
///
/// Pure data: the binding layer reads it every tick and turns it into a node
/// layout. A pivot of (0.5, 0.5) centres the element on its anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectTransform {
    pub anchored_position: Vec2,
    pub size: Vec2,
    pub pivot: Vec2,
}

impl Default for RectTransform {
    fn default() -> Self {
        Self {
            anchored_position: Vec2::ZERO,
            size: Vec2::ZERO,
            pivot: Vec2::splat(0.5),
        }
    }
}

impl RectTransform {
    pub fn new(anchored_position: Vec2, size: Vec2) -> Self {
        Self {
            anchored_position,
            size,
            ..Default::default()
        }
    }

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    /// Translation applied to the anchored rectangle
    pub fn pivot_offset(&self) -> Vec2 {
        -self.pivot * self.size
    }

    /// Top-left corner once the pivot is applied
    pub fn min(&self) -> Vec2 {
        self.anchored_position + self.pivot_offset()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = min + self.size;
        point.cmpge(min).all() && point.cmplt(max).all()
    }
}

impl Component for RectTransform {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_pivot_translates_by_half_size() {
        let rect = RectTransform::new(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0));
        assert_eq!(rect.pivot_offset(), Vec2::new(-20.0, -10.0));
        assert_eq!(rect.min(), Vec2::new(80.0, 40.0));
    }

    #[test]
    fn test_top_left_pivot_has_no_offset() {
        let rect = RectTransform::new(Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0))
            .with_pivot(Vec2::ZERO);
        assert_eq!(rect.min(), Vec2::new(10.0, 10.0));
        assert!(rect.contains(Vec2::new(14.0, 10.0)));
        assert!(!rect.contains(Vec2::new(15.0, 10.0)));
    }
}
