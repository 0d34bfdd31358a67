//! Mutable layout rectangles in page coordinates.
//!
//! The y axis points up: `y` is the bottom edge and `top()` is `y + height`.
//! Moving a box "up" increases `y`.

/// Axis-aligned box used for layout areas and occupied areas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rectangle {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub const fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub const fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Upper edge (`y + height`).
    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn set_y(&mut self, y: f32) -> &mut Self {
        self.y = y;
        self
    }

    #[inline]
    pub fn set_height(&mut self, height: f32) -> &mut Self {
        self.height = height;
        self
    }

    #[inline]
    pub fn move_up(&mut self, delta: f32) -> &mut Self {
        self.y += delta;
        self
    }

    #[inline]
    pub fn move_down(&mut self, delta: f32) -> &mut Self {
        self.y -= delta;
        self
    }

    /// Grow upwards; the bottom edge stays put.
    #[inline]
    pub fn increase_height(&mut self, delta: f32) -> &mut Self {
        self.height += delta;
        self
    }

    /// Shrink from the top; the bottom edge stays put.
    #[inline]
    pub fn decrease_height(&mut self, delta: f32) -> &mut Self {
        self.height -= delta;
        self
    }

    /// Smallest rectangle covering both `first` and `second`.
    pub fn common_rectangle(first: &Self, second: &Self) -> Self {
        let left = first.x.min(second.x);
        let bottom = first.y.min(second.y);
        let right = (first.x + first.width).max(second.x + second.width);
        let top = first.top().max(second.top());
        Self::new(left, bottom, right - left, top - bottom)
    }
}
