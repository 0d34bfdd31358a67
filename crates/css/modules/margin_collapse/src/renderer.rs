//! Interfaces the collapsing engine needs from the layout tree.
//!
//! The engine never owns layout nodes. It keeps node ids and borrows the tree
//! for the duration of each protocol call, so a previous sibling's occupied
//! area is only written after that sibling's own layout has returned.

use core::fmt::Debug;

use crate::geometry::Rectangle;
use crate::property::{Property, PropertyContainer};

/// Layout node variants that matter for vertical margin collapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// Block container in normal flow.
    Block,
    /// Table wrapper: block-level, but never collapses through or with its content.
    Table,
    /// Inline-level content (line boxes, images, text runs).
    Inline,
}

impl RendererKind {
    /// Only block-level boxes take part in vertical margin collapsing.
    #[inline]
    pub const fn is_block_level(self) -> bool {
        matches!(self, Self::Block | Self::Table)
    }
}

/// A laid-out (or being laid-out) node.
pub trait Renderer {
    /// Declared properties of the model element this renderer draws.
    type Model: PropertyContainer;

    fn kind(&self) -> RendererKind;

    fn model(&self) -> &Self::Model;

    /// Renderer-level value of `key`, falling back to the model element.
    fn property(&self, key: Property) -> Option<f32>;

    /// Override `key` on the renderer; the model element is left untouched.
    fn set_property(&mut self, key: Property, value: f32);

    fn occupied_area(&self) -> &Rectangle;

    fn occupied_area_mut(&mut self) -> &mut Rectangle;

    /// Whether this node roots its own formatting context (e.g. the layout root).
    fn establishes_formatting_context(&self) -> bool;

    #[inline]
    fn is_block_level(&self) -> bool {
        self.kind().is_block_level()
    }
}

/// Id-addressed access to renderers.
pub trait RendererTree {
    type Id: Copy + Eq + Debug;
    type Node: Renderer;

    fn renderer(&self, id: Self::Id) -> &Self::Node;

    fn renderer_mut(&mut self, id: Self::Id) -> &mut Self::Node;
}
