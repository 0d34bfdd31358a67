//! Which margins of a box are adjoining (CSS 2.2 §8.3.1).

use crate::property::{Property, PropertyContainer};
use crate::renderer::{Renderer, RendererKind};

#[inline]
fn positive(model: &impl PropertyContainer, key: Property) -> bool {
    model.property(key).is_some_and(|value| value > 0.0)
}

pub fn has_top_border<R: Renderer>(renderer: &R) -> bool {
    let model = renderer.model();
    positive(model, Property::BorderTop) || positive(model, Property::Border)
}

pub fn has_bottom_border<R: Renderer>(renderer: &R) -> bool {
    let model = renderer.model();
    positive(model, Property::BorderBottom) || positive(model, Property::Border)
}

pub fn has_top_padding<R: Renderer>(renderer: &R) -> bool {
    positive(renderer.model(), Property::PaddingTop)
}

pub fn has_bottom_padding<R: Renderer>(renderer: &R) -> bool {
    positive(renderer.model(), Property::PaddingBottom)
}

pub fn has_height_property<R: Renderer>(renderer: &R) -> bool {
    renderer.model().has_property(Property::Height)
}

/// Content height already laid out, or a positive min-height.
pub fn has_positive_height<R: Renderer>(renderer: &R) -> bool {
    renderer.occupied_area().height() > 0.0 || positive(renderer.model(), Property::MinHeight)
}

/// Top margin of the first in-flow child collapses with this box's top margin.
pub fn first_child_margin_adjoined_to_parent<R: Renderer>(parent: &R) -> bool {
    !parent.establishes_formatting_context()
        && parent.kind() != RendererKind::Table
        && !has_top_border(parent)
        && !has_top_padding(parent)
}

/// Bottom margin of the last in-flow child collapses with this box's bottom margin.
pub fn last_child_margin_adjoined_to_parent<R: Renderer>(parent: &R) -> bool {
    !parent.establishes_formatting_context()
        && parent.kind() != RendererKind::Table
        && !has_bottom_border(parent)
        && !has_bottom_padding(parent)
        && !has_height_property(parent)
}

/// Box-level preconditions for top and bottom margins collapsing through.
///
/// The children still have to be self-collapsing too; the handler tracks that.
pub fn margins_could_be_self_collapsing<R: Renderer>(renderer: &R) -> bool {
    renderer.kind() != RendererKind::Table
        && !has_top_border(renderer)
        && !has_bottom_border(renderer)
        && !has_top_padding(renderer)
        && !has_bottom_padding(renderer)
        && !has_height_property(renderer)
        && !has_positive_height(renderer)
}

#[inline]
pub fn model_top_margin<R: Renderer>(renderer: &R) -> f32 {
    renderer.model().property(Property::MarginTop).unwrap_or(0.0)
}

#[inline]
pub fn model_bottom_margin<R: Renderer>(renderer: &R) -> f32 {
    renderer
        .model()
        .property(Property::MarginBottom)
        .unwrap_or(0.0)
}
