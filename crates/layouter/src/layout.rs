use anyhow::Result;
use css_margin_collapse::{
    MarginsCollapseHandler, MarginsCollapseInfo, Property, PropertyMap, Rectangle, Renderer as _,
    RendererKind,
};
use indextree::NodeId;
use log::{debug, trace};

use crate::box_tree::BoxTree;
use crate::options::FlowOptions;

/// Result of one layout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    /// Everything was placed.
    Full,
    /// Something did not fit; nothing of the attempt is kept.
    Nothing,
}

/// What a box reports back to its parent's flow.
#[derive(Debug)]
struct LayoutOutcome {
    status: LayoutStatus,
    margins_info: Option<MarginsCollapseInfo>,
}

impl LayoutOutcome {
    const fn nothing() -> Self {
        Self {
            status: LayoutStatus::Nothing,
            margins_info: None,
        }
    }
}

/// Border plus padding on the block axis.
#[derive(Debug, Clone, Copy)]
struct VerticalEdges {
    top: f32,
    bottom: f32,
}

impl VerticalEdges {
    fn from_style(style: &PropertyMap) -> Self {
        let border = style.get(Property::Border).unwrap_or(0.0);
        let side = |key: Property| style.get(key).unwrap_or(border);
        Self {
            top: side(Property::BorderTop) + style.get(Property::PaddingTop).unwrap_or(0.0),
            bottom: side(Property::BorderBottom) + style.get(Property::PaddingBottom).unwrap_or(0.0),
        }
    }
}

/// Top-down block flow over a [`BoxTree`].
pub(crate) struct BlockFlow<'tree> {
    tree: &'tree mut BoxTree,
    options: &'tree FlowOptions,
}

impl<'tree> BlockFlow<'tree> {
    pub(crate) const fn new(tree: &'tree mut BoxTree, options: &'tree FlowOptions) -> Self {
        Self { tree, options }
    }

    /// Lay out the root into `area`.
    pub(crate) fn run(&mut self, area: Rectangle) -> Result<LayoutStatus> {
        let root = self.tree.root();
        Ok(self.layout_node(root, area, None)?.status)
    }

    fn layout_node(
        &mut self,
        id: NodeId,
        area: Rectangle,
        margins_info: Option<MarginsCollapseInfo>,
    ) -> Result<LayoutOutcome> {
        match self.tree.node(id)?.kind() {
            RendererKind::Inline => self.layout_inline(id, area),
            RendererKind::Block | RendererKind::Table => self.layout_block(id, area, margins_info),
        }
    }

    /// Inline leaves stack at the top of `area` with their declared height.
    fn layout_inline(&mut self, id: NodeId, area: Rectangle) -> Result<LayoutOutcome> {
        let node = self.tree.node_mut(id)?;
        let height = node.style().get(Property::Height).unwrap_or(0.0);
        if height > area.height() {
            debug!(
                "inline '{}' needs {height}, only {} available",
                node.label,
                area.height()
            );
            return Ok(LayoutOutcome::nothing());
        }
        *node.occupied_area_mut() = Rectangle::new(area.x(), area.top() - height, area.width(), height);
        Ok(LayoutOutcome {
            status: LayoutStatus::Full,
            margins_info: None,
        })
    }

    fn layout_block(
        &mut self,
        id: NodeId,
        area: Rectangle,
        margins_info: Option<MarginsCollapseInfo>,
    ) -> Result<LayoutOutcome> {
        let node = self.tree.node_mut(id)?;
        node.reset_for_layout();
        let style = *node.style();
        let edges = VerticalEdges::from_style(&style);
        let fixed_height = style.get(Property::Height);
        let min_height = style.get(Property::MinHeight);

        let mut parent_bbox = area;
        let mut handler = self
            .options
            .collapsing_margins
            .then(|| MarginsCollapseHandler::new(id, margins_info));

        match handler.as_mut() {
            Some(margins_handler) => {
                let clamped = clamp_to_fixed_height(
                    &mut parent_bbox,
                    fixed_height,
                    edges,
                    Some(&mut *margins_handler),
                );
                if !clamped {
                    return Ok(LayoutOutcome::nothing());
                }
                margins_handler.start_margins_collapse(&mut *self.tree, &mut parent_bbox);
                // Materialized margins may eat into the clamped box when the slack is short.
                if fixed_height.is_some_and(|height| parent_bbox.height() < height + edges.top + edges.bottom) {
                    return Ok(LayoutOutcome::nothing());
                }
            }
            None => {
                let margin_top = style.get(Property::MarginTop).unwrap_or(0.0);
                let margin_bottom = style.get(Property::MarginBottom).unwrap_or(0.0);
                parent_bbox.decrease_height(margin_top);
                parent_bbox.move_up(margin_bottom).decrease_height(margin_bottom);
                if !clamp_to_fixed_height(&mut parent_bbox, fixed_height, edges, None) {
                    return Ok(LayoutOutcome::nothing());
                }
            }
        }

        parent_bbox.decrease_height(edges.top);
        parent_bbox.move_up(edges.bottom).decrease_height(edges.bottom);
        *self.tree.node_mut(id)?.occupied_area_mut() =
            Rectangle::new(parent_bbox.x(), parent_bbox.top(), parent_bbox.width(), 0.0);

        let mut layout_box = parent_bbox;
        for child in self.tree.children(id) {
            let child_info = handler.as_mut().and_then(|margins_handler| {
                margins_handler.start_child_margins_handling(&*self.tree, child, &mut layout_box)
            });
            let outcome = self.layout_node(child, layout_box, child_info)?;
            if outcome.status == LayoutStatus::Nothing {
                debug!("'{}' abandons its layout attempt", self.tree.node(id)?.label);
                return Ok(LayoutOutcome::nothing());
            }
            if let Some(margins_handler) = handler.as_mut() {
                margins_handler.end_child_margins_handling(
                    &mut *self.tree,
                    outcome.margins_info,
                    &mut layout_box,
                );
            }

            let child_area = *self.tree.node(child)?.occupied_area();
            let occupied = self.tree.node_mut(id)?.occupied_area_mut();
            *occupied = Rectangle::common_rectangle(occupied, &child_area);
            let below_child = child_area.y() - layout_box.y();
            layout_box.set_height(below_child);
        }

        let collapse_info = handler
            .map(|margins_handler| margins_handler.end_margins_collapse(&mut *self.tree));

        let placed = self.tree.node_mut(id)?;
        let margin_top = placed.property(Property::MarginTop).unwrap_or(0.0);
        let margin_bottom = placed.property(Property::MarginBottom).unwrap_or(0.0);
        let occupied = placed.occupied_area_mut();
        let content_height =
            fixed_height.or_else(|| min_height.filter(|&min| min > occupied.height()));
        if let Some(height) = content_height {
            let top = occupied.top();
            occupied.set_height(height).set_y(top - height);
        }
        occupied.increase_height(edges.top);
        occupied.move_down(edges.bottom).increase_height(edges.bottom);
        occupied.increase_height(margin_top);
        occupied.move_down(margin_bottom).increase_height(margin_bottom);
        trace!("'{}' occupies {:?}", placed.label, placed.occupied_area());

        Ok(LayoutOutcome {
            status: LayoutStatus::Full,
            margins_info: collapse_info,
        })
    }
}

/// Shrink `parent_bbox` to the border-box height of a fixed-height box, keeping
/// its top. The slack goes to the margins handler as buffer space.
///
/// Returns `false` when the box does not fit at all.
fn clamp_to_fixed_height(
    parent_bbox: &mut Rectangle,
    fixed_height: Option<f32>,
    edges: VerticalEdges,
    handler: Option<&mut MarginsCollapseHandler<NodeId>>,
) -> bool {
    let Some(height) = fixed_height else {
        return true;
    };
    let border_box_height = height + edges.top + edges.bottom;
    let slack = parent_bbox.height() - border_box_height;
    if slack < 0.0 {
        return false;
    }
    if let Some(margins_handler) = handler {
        margins_handler.process_fixed_height_adjustment(slack);
    }
    parent_bbox.move_up(slack).set_height(border_box_height);
    true
}
