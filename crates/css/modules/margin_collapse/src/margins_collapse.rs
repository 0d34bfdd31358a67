//! Accumulator for adjoining vertical margins.
//!
//! CSS 2.2 §8.3.1: when margins collapse, the result is the largest positive
//! margin plus the most negative one. Only the two extremes matter, so the
//! accumulator keeps exactly those and discards everything in between.

/// Running extremes of a set of adjoining margins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarginsCollapse {
    /// Largest positive margin joined so far (never below zero).
    max_positive_margin: f32,

    /// Most negative margin joined so far (never above zero).
    min_negative_margin: f32,
}

impl MarginsCollapse {
    /// Create an empty accumulator.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_positive_margin: 0.0,
            min_negative_margin: 0.0,
        }
    }

    /// Join a single margin value.
    ///
    /// Values between the current extremes change nothing.
    #[inline]
    pub fn join_margin(&mut self, margin: f32) {
        if margin > self.max_positive_margin {
            self.max_positive_margin = margin;
        } else if margin < self.min_negative_margin {
            self.min_negative_margin = margin;
        }
    }

    /// Join both extremes of another accumulator into this one.
    #[inline]
    pub fn join(&mut self, other: &Self) {
        self.join_margin(other.max_positive_margin);
        self.join_margin(other.min_negative_margin);
    }

    /// Net collapsed margin: largest positive plus most negative.
    #[inline]
    pub fn collapsed_margins_size(&self) -> f32 {
        self.max_positive_margin + self.min_negative_margin
    }

    #[inline]
    pub const fn max_positive_margin(&self) -> f32 {
        self.max_positive_margin
    }

    #[inline]
    pub const fn min_negative_margin(&self) -> f32 {
        self.min_negative_margin
    }

    /// Whether nothing but zero has been joined.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_positive_margin <= 0.0 && self.min_negative_margin >= 0.0
    }
}

impl From<f32> for MarginsCollapse {
    #[inline]
    fn from(margin: f32) -> Self {
        let mut collapse = Self::new();
        collapse.join_margin(margin);
        collapse
    }
}
