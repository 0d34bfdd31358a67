//! Per-container margin collapsing (CSS 2.2 §8.3.1).
//!
//! Layout is a single forward pass, so whether a child's bottom margin ends up
//! as visible space is only known once the next child (or the end of the
//! container) is reached. The handler keeps that decision pending on the
//! previous child's [`MarginsCollapseInfo`] and patches the already computed
//! occupied area when it resolves.
//!
//! Call order for one container layout attempt:
//!
//! 1. [`MarginsCollapseHandler::start_margins_collapse`]
//! 2. for each child: [`MarginsCollapseHandler::start_child_margins_handling`],
//!    the child's layout, then [`MarginsCollapseHandler::end_child_margins_handling`]
//!    once the child was placed
//! 3. [`MarginsCollapseHandler::end_margins_collapse`]
//!
//! An abandoned attempt simply drops the handler.

use core::fmt::Debug;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::adjacency::{
    first_child_margin_adjoined_to_parent, last_child_margin_adjoined_to_parent,
    margins_could_be_self_collapsing, model_bottom_margin, model_top_margin,
};
use crate::geometry::Rectangle;
use crate::margins_collapse::MarginsCollapse;
use crate::margins_collapse_info::MarginsCollapseInfo;
use crate::property::Property;
use crate::renderer::{Renderer, RendererTree};

/// Where a block child's `collapse_before` was seeded from.
///
/// The child's joins have to be copied back into the same place once it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BeforeSource {
    Parent,
    PrevSibling,
    Fresh,
}

/// Child between `start_child_margins_handling` and `end_child_margins_handling`.
#[derive(Debug, Clone, Copy)]
struct PendingChild {
    index: usize,
    is_block: bool,
    before_source: BeforeSource,
}

/// Bottom margin space taken out of the layout box while an inline child is laid out.
#[derive(Debug, Clone, Copy)]
struct BottomReserve {
    shrunk: f32,
    absorbed: f32,
}

/// Drives margin collapsing for the children of one container.
#[derive(Debug)]
pub struct MarginsCollapseHandler<Id> {
    renderer: Id,
    collapse_info: MarginsCollapseInfo,
    /// Pending decision for the previous block child. `None` after an inline child.
    prev_child_margin_info: Option<MarginsCollapseInfo>,
    pending_child: Option<PendingChild>,
    first_not_empty_kid_index: usize,
    processed_children_num: usize,
    renderer_children: SmallVec<Id, 8>,
    inline_bottom_reserve: Option<BottomReserve>,
}

impl<Id: Copy + Eq + Debug> MarginsCollapseHandler<Id> {
    /// Handler for `renderer`, continuing the state its parent handed down
    /// (`None` for a layout root).
    pub fn new(renderer: Id, collapse_info: Option<MarginsCollapseInfo>) -> Self {
        Self {
            renderer,
            collapse_info: collapse_info.unwrap_or_default(),
            prev_child_margin_info: None,
            pending_child: None,
            first_not_empty_kid_index: 0,
            processed_children_num: 0,
            renderer_children: SmallVec::new(),
            inline_bottom_reserve: None,
        }
    }

    #[inline]
    pub const fn collapse_info(&self) -> &MarginsCollapseInfo {
        &self.collapse_info
    }

    #[inline]
    pub const fn processed_children_num(&self) -> usize {
        self.processed_children_num
    }

    /// Register slack left below a box whose height was clamped to a fixed value.
    pub fn process_fixed_height_adjustment(&mut self, height_delta: f32) {
        let buffer = self.collapse_info.buffer_space() + height_delta;
        self.collapse_info.set_buffer_space(buffer);
        trace!(
            "margins[{:?}]: fixed height adjustment {height_delta}, buffer {buffer}",
            self.renderer
        );
    }

    /// Open the container's own margins and materialize those that cannot
    /// collapse with a child.
    pub fn start_margins_collapse<T>(&mut self, tree: &mut T, parent_bbox: &mut Rectangle)
    where
        T: RendererTree<Id = Id>,
    {
        let renderer = tree.renderer(self.renderer);
        let top_margin = model_top_margin(renderer);
        let bottom_margin = model_bottom_margin(renderer);
        let first_adjoined = first_child_margin_adjoined_to_parent(renderer);
        let last_adjoined = last_child_margin_adjoined_to_parent(renderer);

        self.collapse_info
            .collapse_before_mut()
            .join_margin(top_margin);
        self.collapse_info
            .collapse_after_mut()
            .join_margin(bottom_margin);

        if !first_adjoined {
            let top_indent = self.collapse_info.collapse_before().collapsed_margins_size();
            self.apply_top_margin(parent_bbox, top_indent);
        }
        if !last_adjoined {
            let bottom_indent = self.collapse_info.collapse_after().collapsed_margins_size();
            self.apply_bottom_margin(parent_bbox, bottom_indent);
        }

        // Held by the collapsing state from here on.
        let node = tree.renderer_mut(self.renderer);
        node.set_property(Property::MarginTop, 0.0);
        node.set_property(Property::MarginBottom, 0.0);

        trace!(
            "margins[{:?}]: start, before={:?} after={:?} first_adjoined={first_adjoined} last_adjoined={last_adjoined}",
            self.renderer,
            self.collapse_info.collapse_before(),
            self.collapse_info.collapse_after()
        );
    }

    /// Prepare `layout_box` for `child` and build the state the child lays out with.
    ///
    /// Returns `None` for inline-level children, which never collapse.
    pub fn start_child_margins_handling<T>(
        &mut self,
        tree: &T,
        child: Id,
        layout_box: &mut Rectangle,
    ) -> Option<MarginsCollapseInfo>
    where
        T: RendererTree<Id = Id>,
    {
        debug_assert!(
            self.pending_child.is_none(),
            "start_child_margins_handling called while the previous child is still pending"
        );

        self.renderer_children.push(child);
        let child_index = self.processed_children_num;
        self.processed_children_num += 1;

        let is_block = tree.renderer(child).is_block_level();
        let parent = tree.renderer(self.renderer);
        let first_adjoined = first_child_margin_adjoined_to_parent(parent);
        let last_adjoined = last_child_margin_adjoined_to_parent(parent);

        self.prepare_box_for_layout_attempt(
            layout_box,
            child_index,
            is_block,
            first_adjoined,
            last_adjoined,
        );

        if !is_block {
            self.pending_child = Some(PendingChild {
                index: child_index,
                is_block: false,
                before_source: BeforeSource::Fresh,
            });
            trace!("margins[{:?}]: inline child #{child_index} {child:?}", self.renderer);
            return None;
        }

        let is_first_not_empty = child_index == self.first_not_empty_kid_index;
        let ignore_top = is_first_not_empty && first_adjoined;
        // Optimistic: this child may turn out to be the last one.
        let ignore_bottom = last_adjoined;

        let (collapse_before, before_source) = if child_index == 0 {
            if ignore_top {
                (*self.collapse_info.collapse_before(), BeforeSource::Parent)
            } else {
                (MarginsCollapse::new(), BeforeSource::Fresh)
            }
        } else if let Some(prev) = &self.prev_child_margin_info {
            (*prev.own_collapse_after(), BeforeSource::PrevSibling)
        } else {
            (MarginsCollapse::new(), BeforeSource::Fresh)
        };
        let collapse_after = if ignore_bottom {
            *self.collapse_info.collapse_after()
        } else {
            MarginsCollapse::new()
        };

        let mut child_info =
            MarginsCollapseInfo::new(ignore_top, ignore_bottom, collapse_before, collapse_after);
        if ignore_top && is_first_not_empty {
            child_info.set_buffer_space(self.collapse_info.buffer_space());
        }

        self.pending_child = Some(PendingChild {
            index: child_index,
            is_block: true,
            before_source,
        });
        trace!(
            "margins[{:?}]: block child #{child_index} {child:?} ignore_top={ignore_top} ignore_bottom={ignore_bottom} before={collapse_before:?}",
            self.renderer
        );
        Some(child_info)
    }

    /// Fold a successfully placed child back into the container's state.
    ///
    /// `child_info` is what the child's own handler returned from
    /// [`Self::end_margins_collapse`] (`None` for an inline child).
    pub fn end_child_margins_handling<T>(
        &mut self,
        tree: &mut T,
        child_info: Option<MarginsCollapseInfo>,
        layout_box: &mut Rectangle,
    ) where
        T: RendererTree<Id = Id>,
    {
        let pending = self.pending_child.take();
        debug_assert!(
            pending.is_some(),
            "end_child_margins_handling called without a matching start"
        );
        let Some(pending) = pending else {
            return;
        };
        debug_assert_eq!(
            pending.is_block,
            child_info.is_some(),
            "block children must hand their collapse info back, inline children must not"
        );
        let child_index = pending.index;

        if let Some(info) = &child_info {
            match pending.before_source {
                BeforeSource::Parent => {
                    *self.collapse_info.collapse_before_mut() = *info.collapse_before();
                }
                BeforeSource::PrevSibling => {
                    if let Some(prev) = self.prev_child_margin_info.as_mut() {
                        prev.set_own_collapse_after(*info.collapse_before());
                    }
                }
                BeforeSource::Fresh => {}
            }
            if child_index == self.first_not_empty_kid_index && info.is_self_collapsing() {
                self.first_not_empty_kid_index = child_index + 1;
            }
            let self_collapsing =
                self.collapse_info.is_self_collapsing() && info.is_self_collapsing();
            self.collapse_info.set_self_collapsing(self_collapsing);
        } else {
            self.collapse_info.set_self_collapsing(false);
        }

        if let Some(prev) = &self.prev_child_margin_info {
            let prev_renderer = self.renderer_children[child_index - 1];
            fix_prev_child_occupied_area(tree, prev_renderer, prev, pending.is_block);
            if prev.is_self_collapsing() && prev.is_ignore_own_margin_top() {
                // Never produced visible space: still part of the leading margin.
                self.collapse_info
                    .collapse_before_mut()
                    .join(prev.own_collapse_after());
            }
        }

        let first_adjoined = first_child_margin_adjoined_to_parent(tree.renderer(self.renderer));
        if child_index == self.first_not_empty_kid_index
            && first_adjoined
            && !self.collapse_info.is_self_collapsing()
        {
            self.get_rid_of_collapse_artifacts_atop_occupied_area(tree);
            if let Some(info) = &child_info {
                self.process_used_child_buffer_space(info, layout_box);
            }
        }

        self.prev_child_margin_info = child_info;
    }

    /// Resolve the container's own margins and hand its state back to the parent.
    pub fn end_margins_collapse<T>(self, tree: &mut T) -> MarginsCollapseInfo
    where
        T: RendererTree<Id = Id>,
    {
        debug_assert!(
            self.pending_child.is_none(),
            "end_margins_collapse called while a child is still pending"
        );
        let Self {
            renderer: renderer_id,
            collapse_info: mut info,
            prev_child_margin_info: last_child,
            ..
        } = self;

        if let Some(prev) = last_child
            .as_ref()
            .filter(|prev| prev.is_self_collapsing() && prev.is_ignore_own_margin_top())
        {
            info.collapse_before_mut().join(prev.own_collapse_after());
        }

        let renderer = tree.renderer(renderer_id);
        let could_be_self_collapsing = margins_could_be_self_collapsing(renderer);
        let first_adjoined = first_child_margin_adjoined_to_parent(renderer);
        let bottom_margin = model_bottom_margin(renderer);

        if first_adjoined && info.is_self_collapsing() && !could_be_self_collapsing {
            // No child met content, so the leading margin was never given space.
            let top_indent = info.collapse_before().collapsed_margins_size();
            tree.renderer_mut(renderer_id)
                .occupied_area_mut()
                .move_down(top_indent);
        }
        info.set_self_collapsing(info.is_self_collapsing() && could_be_self_collapsing);

        let last_child_joined = last_child
            .as_ref()
            .filter(|prev| prev.is_ignore_own_margin_bottom());
        let mut own_collapse_after =
            last_child_joined.map_or_else(MarginsCollapse::new, |prev| *prev.own_collapse_after());
        own_collapse_after.join_margin(bottom_margin);
        info.set_own_collapse_after(own_collapse_after);
        if let Some(prev) = last_child_joined {
            info.set_collapse_after(*prev.collapse_after());
        }

        let node = tree.renderer_mut(renderer_id);
        if info.is_self_collapsing() {
            let before = *info.collapse_before();
            info.collapse_after_mut().join(&before);
            info.own_collapse_after_mut().join(&before);
            if !info.is_ignore_own_margin_bottom() && !info.is_ignore_own_margin_top() {
                let collapsed = info.collapse_after().collapsed_margins_size();
                node.set_property(Property::MarginBottom, collapsed);
            }
        } else {
            if !info.is_ignore_own_margin_top() {
                let collapsed = info.collapse_before().collapsed_margins_size();
                node.set_property(Property::MarginTop, collapsed);
            }
            if !info.is_ignore_own_margin_bottom() {
                let collapsed = info.collapse_after().collapsed_margins_size();
                node.set_property(Property::MarginBottom, collapsed);
            }
        }

        trace!(
            "margins[{renderer_id:?}]: end, self_collapsing={} before={:?} after={:?} own_after={:?}",
            info.is_self_collapsing(),
            info.collapse_before(),
            info.collapse_after(),
            info.own_collapse_after()
        );
        info
    }

    /// Undo or apply provisional margin space on `layout_box` before a child attempt.
    fn prepare_box_for_layout_attempt(
        &mut self,
        layout_box: &mut Rectangle,
        child_index: usize,
        is_block: bool,
        first_adjoined: bool,
        last_adjoined: bool,
    ) {
        if let Some(reserve) = self.inline_bottom_reserve.take() {
            layout_box
                .move_down(reserve.shrunk)
                .increase_height(reserve.shrunk);
            let buffer = self.collapse_info.buffer_space() + reserve.absorbed;
            self.collapse_info.set_buffer_space(buffer);
        }

        if let Some(prev) = &self.prev_child_margin_info {
            let prev_can_apply_collapse_after =
                !prev.is_self_collapsing() || !prev.is_ignore_own_margin_top();
            let prev_has_applied_collapse_after =
                !prev.is_ignore_own_margin_bottom() && prev_can_apply_collapse_after;
            if !is_block && prev_can_apply_collapse_after {
                let own_collapsed = prev.own_collapse_after().collapsed_margins_size();
                layout_box.decrease_height(own_collapsed);
            }
            if prev_has_applied_collapse_after {
                let collapsed = prev.collapse_after().collapsed_margins_size();
                layout_box.increase_height(collapsed);
            }
        }

        if !is_block {
            if child_index == self.first_not_empty_kid_index && first_adjoined {
                let top_indent = self.collapse_info.collapse_before().collapsed_margins_size();
                self.apply_top_margin(layout_box, top_indent);
            }
            if last_adjoined {
                let bottom_indent = self.collapse_info.collapse_after().collapsed_margins_size();
                let buffer_before = self.collapse_info.buffer_space();
                let shrunk = self.apply_bottom_margin(layout_box, bottom_indent);
                self.inline_bottom_reserve = Some(BottomReserve {
                    shrunk,
                    absorbed: buffer_before - self.collapse_info.buffer_space(),
                });
            }
        }
    }

    /// Spend a top margin: buffer space first (the box moves down), then shrink.
    fn apply_top_margin(&mut self, bbox: &mut Rectangle, top_indent: f32) {
        let buffer = self.collapse_info.buffer_space();
        let used = if top_indent > 0.0 {
            top_indent.min(buffer.max(0.0))
        } else {
            0.0
        };
        self.collapse_info.set_buffer_space(buffer - used);
        self.collapse_info.set_used_buffer_space(used);
        bbox.move_down(used).decrease_height(top_indent - used);
    }

    /// Spend a bottom margin: buffer space first, then shrink from below.
    ///
    /// Returns how far the bottom edge moved up.
    fn apply_bottom_margin(&mut self, bbox: &mut Rectangle, bottom_indent: f32) -> f32 {
        let buffer = self.collapse_info.buffer_space();
        let absorbed = if bottom_indent > 0.0 {
            bottom_indent.min(buffer.max(0.0))
        } else {
            0.0
        };
        self.collapse_info.set_buffer_space(buffer - absorbed);
        let leftover = bottom_indent - absorbed;
        bbox.move_up(leftover).decrease_height(leftover);
        leftover
    }

    /// The leading margin went to the container's own margin-top; drop the
    /// space it left above the first content.
    fn get_rid_of_collapse_artifacts_atop_occupied_area<T>(&self, tree: &mut T)
    where
        T: RendererTree<Id = Id>,
    {
        let top_indent = self.collapse_info.collapse_before().collapsed_margins_size();
        let bbox = tree.renderer_mut(self.renderer).occupied_area_mut();
        let top = bbox.top() - top_indent;
        let bottom = bbox.y().min(top);
        bbox.set_y(bottom).set_height(top - bottom);
        debug!(
            "margins[{:?}]: trimmed {top_indent} of collapsed margin atop occupied area",
            self.renderer
        );
    }

    /// Reconcile buffer space the first child spent on the container's behalf.
    fn process_used_child_buffer_space(
        &mut self,
        child_info: &MarginsCollapseInfo,
        layout_box: &mut Rectangle,
    ) {
        let child_used = child_info.used_buffer_space();
        if child_used <= 0.0 {
            return;
        }
        let available = self.collapse_info.buffer_space();
        let used = child_used.min(available);
        self.collapse_info.set_buffer_space(available - used);
        self.collapse_info.set_used_buffer_space(used);
        // The child was placed without collapsing into our top edge.
        layout_box.move_down(used);
    }
}

/// Patch the previous sibling's occupied area once the next child is known.
fn fix_prev_child_occupied_area<T>(
    tree: &mut T,
    prev_renderer: T::Id,
    prev: &MarginsCollapseInfo,
    current_is_block: bool,
) where
    T: RendererTree,
{
    let renderer = tree.renderer_mut(prev_renderer);
    let prev_can_apply_collapse_after =
        !prev.is_self_collapsing() || !prev.is_ignore_own_margin_top();
    let prev_has_applied_collapse_after =
        !prev.is_ignore_own_margin_bottom() && prev_can_apply_collapse_after;

    if prev_has_applied_collapse_after {
        // The next child's top margin now carries it.
        let bottom_margin = prev.collapse_after().collapsed_margins_size();
        renderer
            .occupied_area_mut()
            .decrease_height(bottom_margin)
            .move_up(bottom_margin);
        renderer.set_property(Property::MarginBottom, 0.0);
        debug!("margins: folded {bottom_margin} off previous sibling {prev_renderer:?}");
    }

    if !current_is_block && prev_can_apply_collapse_after {
        let own_collapsed = prev.own_collapse_after().collapsed_margins_size();
        renderer
            .occupied_area_mut()
            .increase_height(own_collapsed)
            .move_down(own_collapsed);
        renderer.set_property(Property::MarginBottom, own_collapsed);
        debug!("margins: restored own bottom margin {own_collapsed} on {prev_renderer:?} before inline content");
    }
}
