use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in canvas units (points), origin at the top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true when `other` lies entirely inside `self`, with a small tolerance
    /// for accumulated float error.
    pub fn contains(&self, other: &Rect) -> bool {
        const EPSILON: f32 = 0.01;
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// The largest rectangle of the given width/height ratio that fits inside
    /// `self`, centered. Returns `self` unchanged for a non-positive ratio.
    pub fn fit_aspect(&self, aspect: f32) -> Rect {
        if !(aspect.is_finite() && aspect > 0.0) || self.height <= 0.0 {
            return *self;
        }
        if self.width / self.height > aspect {
            let width = self.height * aspect;
            Rect::new(self.x + (self.width - width) / 2.0, self.y, width, self.height)
        } else {
            let height = self.width / aspect;
            Rect::new(self.x, self.y + (self.height - height) / 2.0, self.width, height)
        }
    }
}

/// Slide dimensions shared by every slide of a deck, in points.
///
/// The default is a 16:9 canvas of 16in x 9in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1152.0,
            height: 648.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn test_rect_contains() {
        let outer = Canvas::default().bounds();
        assert!(outer.contains(&Rect::new(0.0, 0.0, 1152.0, 648.0)));
        assert!(!outer.contains(&Rect::new(1000.0, 0.0, 200.0, 10.0)));
    }

    #[test]
    fn test_fit_aspect_letterboxes_wide_box() {
        let slot = Rect::new(0.0, 0.0, 200.0, 100.0);
        let fitted = slot.fit_aspect(1.0);
        assert_eq!(fitted, Rect::new(50.0, 0.0, 100.0, 100.0));
        assert!(slot.contains(&fitted));
    }

    #[test]
    fn test_fit_aspect_pillarboxes_tall_box() {
        let slot = Rect::new(10.0, 10.0, 100.0, 300.0);
        assert_eq!(slot.fit_aspect(2.0), Rect::new(10.0, 135.0, 100.0, 50.0));
        assert_eq!(slot.fit_aspect(0.0), slot);
    }

    #[test]
    fn test_canvas_validity() {
        assert!(Canvas::default().is_valid());
        assert!(!Canvas::new(0.0, 100.0).is_valid());
        assert!(!Canvas::new(f32::NAN, 100.0).is_valid());
    }
}
