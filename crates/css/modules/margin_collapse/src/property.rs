//! Vertical box properties consulted by margin collapsing.
//!
//! Values are resolved lengths in layout units. Reads return `None` when a
//! property was never set, which is distinct from an explicit zero.

/// Keys of the properties that gate or carry vertical margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    MarginTop,
    MarginBottom,
    PaddingTop,
    PaddingBottom,
    BorderTop,
    BorderBottom,
    /// Shorthand border width applying to every side.
    Border,
    /// Only its presence matters for collapsing.
    Height,
    MinHeight,
}

impl Property {
    /// Number of distinct keys.
    pub const COUNT: usize = 9;

    #[inline]
    const fn slot(self) -> usize {
        match self {
            Self::MarginTop => 0,
            Self::MarginBottom => 1,
            Self::PaddingTop => 2,
            Self::PaddingBottom => 3,
            Self::BorderTop => 4,
            Self::BorderBottom => 5,
            Self::Border => 6,
            Self::Height => 7,
            Self::MinHeight => 8,
        }
    }
}

/// Read access to a set of properties.
pub trait PropertyContainer {
    /// Value of `key`, or `None` when absent.
    fn property(&self, key: Property) -> Option<f32>;

    #[inline]
    fn has_property(&self, key: Property) -> bool {
        self.property(key).is_some()
    }
}

/// Fixed-slot property storage with one optional value per key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyMap {
    values: [Option<f32>; Property::COUNT],
}

impl PropertyMap {
    #[inline]
    pub const fn new() -> Self {
        Self {
            values: [None; Property::COUNT],
        }
    }

    /// Builder-style setter.
    #[inline]
    #[must_use]
    pub fn with(mut self, key: Property, value: f32) -> Self {
        self.set(key, value);
        self
    }

    #[inline]
    pub fn get(&self, key: Property) -> Option<f32> {
        self.values[key.slot()]
    }

    #[inline]
    pub fn set(&mut self, key: Property, value: f32) {
        self.values[key.slot()] = Some(value);
    }

    /// Clear `key`, returning the previous value.
    #[inline]
    pub fn remove(&mut self, key: Property) -> Option<f32> {
        self.values[key.slot()].take()
    }

    #[inline]
    pub fn has(&self, key: Property) -> bool {
        self.get(key).is_some()
    }
}

impl PropertyContainer for PropertyMap {
    #[inline]
    fn property(&self, key: Property) -> Option<f32> {
        self.get(key)
    }
}
