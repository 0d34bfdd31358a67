//! Per-container collapsing state handed between parent and child layouts.

use crate::margins_collapse::MarginsCollapse;

/// Collapsing state of one container.
///
/// A parent's handler builds one of these for each block-level child and moves
/// it into the child's layout; the child's handler returns it once the child is
/// finished, and the parent reads the resulting fields back.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginsCollapseInfo {
    /// Margins open at the top edge, still joinable with the first child.
    collapse_before: MarginsCollapse,
    /// Margins open at the bottom edge, joinable with what follows.
    collapse_after: MarginsCollapse,
    /// Bottom margins of this box and its descendants only, without anything
    /// inherited from the parent's bottom edge.
    own_collapse_after: MarginsCollapse,
    /// The top margin is absorbed into an ancestor's.
    ignore_own_margin_top: bool,
    /// The bottom margin is absorbed into an ancestor's.
    ignore_own_margin_bottom: bool,
    /// Cleared as soon as content, border, padding or height separates the margins.
    is_self_collapsing: bool,
    /// Slack below a fixed-height box that margins may use without growing it.
    buffer_space: f32,
    /// Part of `buffer_space` already consumed by the top margin.
    used_buffer_space: f32,
}

impl Default for MarginsCollapseInfo {
    #[inline]
    fn default() -> Self {
        Self::new(false, false, MarginsCollapse::new(), MarginsCollapse::new())
    }
}

impl MarginsCollapseInfo {
    /// Fresh state; `is_self_collapsing` starts optimistic.
    #[inline]
    pub const fn new(
        ignore_own_margin_top: bool,
        ignore_own_margin_bottom: bool,
        collapse_before: MarginsCollapse,
        collapse_after: MarginsCollapse,
    ) -> Self {
        Self {
            collapse_before,
            collapse_after,
            own_collapse_after: MarginsCollapse::new(),
            ignore_own_margin_top,
            ignore_own_margin_bottom,
            is_self_collapsing: true,
            buffer_space: 0.0,
            used_buffer_space: 0.0,
        }
    }

    #[inline]
    pub const fn collapse_before(&self) -> &MarginsCollapse {
        &self.collapse_before
    }

    #[inline]
    pub fn collapse_before_mut(&mut self) -> &mut MarginsCollapse {
        &mut self.collapse_before
    }

    #[inline]
    pub const fn collapse_after(&self) -> &MarginsCollapse {
        &self.collapse_after
    }

    #[inline]
    pub fn collapse_after_mut(&mut self) -> &mut MarginsCollapse {
        &mut self.collapse_after
    }

    #[inline]
    pub fn set_collapse_after(&mut self, collapse_after: MarginsCollapse) {
        self.collapse_after = collapse_after;
    }

    #[inline]
    pub const fn own_collapse_after(&self) -> &MarginsCollapse {
        &self.own_collapse_after
    }

    #[inline]
    pub fn own_collapse_after_mut(&mut self) -> &mut MarginsCollapse {
        &mut self.own_collapse_after
    }

    #[inline]
    pub fn set_own_collapse_after(&mut self, own_collapse_after: MarginsCollapse) {
        self.own_collapse_after = own_collapse_after;
    }

    #[inline]
    pub const fn is_ignore_own_margin_top(&self) -> bool {
        self.ignore_own_margin_top
    }

    #[inline]
    pub const fn is_ignore_own_margin_bottom(&self) -> bool {
        self.ignore_own_margin_bottom
    }

    #[inline]
    pub const fn is_self_collapsing(&self) -> bool {
        self.is_self_collapsing
    }

    #[inline]
    pub fn set_self_collapsing(&mut self, is_self_collapsing: bool) {
        self.is_self_collapsing = is_self_collapsing;
    }

    #[inline]
    pub const fn buffer_space(&self) -> f32 {
        self.buffer_space
    }

    #[inline]
    pub fn set_buffer_space(&mut self, buffer_space: f32) {
        self.buffer_space = buffer_space;
    }

    #[inline]
    pub const fn used_buffer_space(&self) -> f32 {
        self.used_buffer_space
    }

    #[inline]
    pub fn set_used_buffer_space(&mut self, used_buffer_space: f32) {
        self.used_buffer_space = used_buffer_space;
    }
}
