use super::Vec2;

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Grows the rectangle by `margin` on every side.
    #[inline]
    pub fn inflate(self, margin: f32) -> Self {
        let r = self.normalized();
        Rect::new(
            r.origin.x - margin,
            r.origin.y - margin,
            r.size.x + 2.0 * margin,
            r.size.y + 2.0 * margin,
        )
    }

    /// Closed containment: [min, max].
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x
            && p.y >= r.origin.y
            && p.x <= (r.origin.x + r.size.x)
            && p.y <= (r.origin.y + r.size.y)
    }

    /// Per-axis distance from `p` to the rectangle; zero on an axis where
    /// `p` lies within the rectangle's extent.
    #[inline]
    pub fn distance_outside(self, p: Vec2) -> Vec2 {
        let r = self.normalized();
        let (min, max) = (r.min(), r.max());
        let dx = if p.x < min.x { min.x - p.x } else if p.x > max.x { p.x - max.x } else { 0.0 };
        let dy = if p.y < min.y { min.y - p.y } else if p.y > max.y { p.y - max.y } else { 0.0 };
        Vec2::new(dx, dy)
    }
}
