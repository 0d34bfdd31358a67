//! Block-flow layouter with vertical margin collapsing.
//!
//! Boxes live in a [`BoxTree`]; [`Layouter::compute_layout`] places them top-down
//! into a page area, y growing upwards.

use anyhow::Result;
use log::debug;
use tracing::info_span;

pub mod box_tree;
pub mod layout;
pub mod options;
mod printing;

pub use box_tree::{BoxNode, BoxTree};
pub use css_margin_collapse::{Property, PropertyMap, Rectangle, Renderer};
pub use indextree::NodeId;
pub use layout::LayoutStatus;
pub use options::FlowOptions;

use layout::BlockFlow;

/// Owns a box tree and lays it out.
///
/// Every call to [`Self::compute_layout`] is a fresh attempt: overrides and
/// geometry from earlier attempts are discarded as each box is reached.
pub struct Layouter {
    tree: BoxTree,
    options: FlowOptions,
}

impl Layouter {
    pub fn new(tree: BoxTree) -> Self {
        Self::with_options(tree, FlowOptions::default())
    }

    pub const fn with_options(tree: BoxTree, options: FlowOptions) -> Self {
        Self { tree, options }
    }

    #[inline]
    pub const fn tree(&self) -> &BoxTree {
        &self.tree
    }

    #[inline]
    pub const fn tree_mut(&mut self) -> &mut BoxTree {
        &mut self.tree
    }

    #[inline]
    pub const fn options(&self) -> &FlowOptions {
        &self.options
    }

    /// Lay the whole tree out into `area`.
    ///
    /// [`LayoutStatus::Nothing`] means some box did not fit; retry with a
    /// larger area.
    ///
    /// # Errors
    /// Returns an error if the tree is inconsistent.
    pub fn compute_layout(&mut self, area: Rectangle) -> Result<LayoutStatus> {
        let _span = info_span!("layouter.compute_layout").entered();
        let status = BlockFlow::new(&mut self.tree, &self.options).run(area)?;
        debug!("layout finished with {status:?}");
        Ok(status)
    }

    /// Occupied area of `id` from the last attempt, margins included.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn occupied_area(&self, id: NodeId) -> Result<Rectangle> {
        Ok(*self.tree.node(id)?.occupied_area())
    }

    /// Border box of `id` from the last attempt.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn border_box(&self, id: NodeId) -> Result<Rectangle> {
        Ok(self.tree.node(id)?.border_box())
    }
}
