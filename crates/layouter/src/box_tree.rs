//! Arena-backed tree of layout boxes.

use anyhow::{Context as _, Result, bail};
use css_margin_collapse::{
    Property, PropertyContainer as _, PropertyMap, Rectangle, Renderer, RendererKind,
    RendererTree,
};
use indextree::{Arena, Node, NodeId};

/// One box in the layout tree.
#[derive(Debug, Clone)]
pub struct BoxNode {
    /// Debug label shown in tree dumps.
    pub label: String,
    kind: RendererKind,
    /// Declared values, as produced by style resolution.
    style: PropertyMap,
    /// Values rewritten during layout; cleared at the start of each attempt.
    overrides: PropertyMap,
    occupied_area: Rectangle,
    establishes_bfc: bool,
}

impl BoxNode {
    fn new(label: &str, kind: RendererKind, style: PropertyMap) -> Self {
        Self {
            label: label.to_owned(),
            kind,
            style,
            overrides: PropertyMap::new(),
            occupied_area: Rectangle::default(),
            establishes_bfc: false,
        }
    }

    #[inline]
    pub const fn style(&self) -> &PropertyMap {
        &self.style
    }

    /// Occupied area minus the margins that ended up materialized on this box.
    pub fn border_box(&self) -> Rectangle {
        let margin_top = self.property(Property::MarginTop).unwrap_or(0.0);
        let margin_bottom = self.property(Property::MarginBottom).unwrap_or(0.0);
        let mut bbox = self.occupied_area;
        bbox.decrease_height(margin_top);
        bbox.move_up(margin_bottom).decrease_height(margin_bottom);
        bbox
    }

    pub(crate) fn reset_for_layout(&mut self) {
        self.overrides = PropertyMap::new();
        self.occupied_area = Rectangle::default();
    }
}

impl Renderer for BoxNode {
    type Model = PropertyMap;

    #[inline]
    fn kind(&self) -> RendererKind {
        self.kind
    }

    #[inline]
    fn model(&self) -> &PropertyMap {
        &self.style
    }

    #[inline]
    fn property(&self, key: Property) -> Option<f32> {
        self.overrides.get(key).or_else(|| self.style.property(key))
    }

    #[inline]
    fn set_property(&mut self, key: Property, value: f32) {
        self.overrides.set(key, value);
    }

    #[inline]
    fn occupied_area(&self) -> &Rectangle {
        &self.occupied_area
    }

    #[inline]
    fn occupied_area_mut(&mut self) -> &mut Rectangle {
        &mut self.occupied_area
    }

    #[inline]
    fn establishes_formatting_context(&self) -> bool {
        self.establishes_bfc
    }
}

/// Box tree with a block root that establishes the block formatting context.
#[derive(Debug)]
pub struct BoxTree {
    arena: Arena<BoxNode>,
    root: NodeId,
}

impl BoxTree {
    pub fn new(root_style: PropertyMap) -> Self {
        let mut arena = Arena::new();
        let mut root_node = BoxNode::new("root", RendererKind::Block, root_style);
        root_node.establishes_bfc = true;
        let root = arena.new_node(root_node);
        Self { arena, root }
    }

    #[inline]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Append a block container under `parent`.
    ///
    /// # Errors
    /// Returns an error if `parent` is unknown, removed, or inline-level.
    pub fn append_block(&mut self, parent: NodeId, label: &str, style: PropertyMap) -> Result<NodeId> {
        self.append(parent, BoxNode::new(label, RendererKind::Block, style))
    }

    /// Append a table wrapper under `parent`.
    ///
    /// # Errors
    /// Returns an error if `parent` is unknown, removed, or inline-level.
    pub fn append_table(&mut self, parent: NodeId, label: &str, style: PropertyMap) -> Result<NodeId> {
        self.append(parent, BoxNode::new(label, RendererKind::Table, style))
    }

    /// Append an inline-level leaf of fixed `height` (a line box, an image).
    ///
    /// # Errors
    /// Returns an error if `parent` is unknown, removed, or inline-level.
    pub fn append_inline(&mut self, parent: NodeId, label: &str, height: f32) -> Result<NodeId> {
        let style = PropertyMap::new().with(Property::Height, height);
        self.append(parent, BoxNode::new(label, RendererKind::Inline, style))
    }

    /// Detach and drop `id` with all its descendants.
    ///
    /// # Errors
    /// Returns an error if `id` is unknown, already removed, or the root.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            bail!("the root box cannot be removed");
        }
        self.node(id)?;
        id.remove_subtree(&mut self.arena);
        Ok(())
    }

    /// # Errors
    /// Returns an error if `id` is not a live node of this tree.
    pub fn node(&self, id: NodeId) -> Result<&BoxNode> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(Node::get)
            .with_context(|| format!("box {id:?} is not in the tree"))
    }

    /// # Errors
    /// Returns an error if `id` is not a live node of this tree.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut BoxNode> {
        self.arena
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(Node::get_mut)
            .with_context(|| format!("box {id:?} is not in the tree"))
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    /// Nodes in document order, paired with their depth below the root.
    pub(crate) fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, 0_usize)];
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            let children = self.children(id);
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
        out
    }

    fn append(&mut self, parent: NodeId, node: BoxNode) -> Result<NodeId> {
        let parent_node = self
            .node(parent)
            .context("cannot append to a box outside the tree")?;
        if parent_node.kind == RendererKind::Inline {
            bail!(
                "inline box {:?} cannot contain '{}'",
                parent_node.label,
                node.label
            );
        }
        let id = self.arena.new_node(node);
        parent.checked_append(id, &mut self.arena)?;
        Ok(id)
    }
}

impl RendererTree for BoxTree {
    type Id = NodeId;
    type Node = BoxNode;

    #[inline]
    fn renderer(&self, id: NodeId) -> &BoxNode {
        self.arena[id].get()
    }

    #[inline]
    fn renderer_mut(&mut self, id: NodeId) -> &mut BoxNode {
        self.arena[id].get_mut()
    }
}
