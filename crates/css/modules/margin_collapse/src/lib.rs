//! CSS 2.2 §8.3.1 — Collapsing vertical margins during block layout.
//! Spec: <https://www.w3.org/TR/CSS22/box.html#collapsing-margins>
//!
//! The engine sits between a container's layout and its children's layouts.
//! It decides how much vertical space adjoining margins occupy and rewrites
//! already computed geometry when a later child changes that decision.

mod adjacency;
pub mod geometry;
pub mod handler;
pub mod margins_collapse;
pub mod margins_collapse_info;
pub mod property;
pub mod renderer;

pub use geometry::Rectangle;
pub use handler::MarginsCollapseHandler;
pub use margins_collapse::MarginsCollapse;
pub use margins_collapse_info::MarginsCollapseInfo;
pub use property::{Property, PropertyContainer, PropertyMap};
pub use renderer::{Renderer, RendererKind, RendererTree};
