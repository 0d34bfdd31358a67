#![allow(clippy::float_cmp, reason = "inputs are small integers, exactly representable")]
#![allow(clippy::unwrap_used, reason = "test code")]

use css_margin_collapse::{
    MarginsCollapseHandler, MarginsCollapseInfo, Property, PropertyContainer, PropertyMap,
    Rectangle, Renderer, RendererKind, RendererTree,
};

struct TestNode {
    kind: RendererKind,
    model: PropertyMap,
    overrides: PropertyMap,
    occupied: Rectangle,
    formatting_root: bool,
}

impl Renderer for TestNode {
    type Model = PropertyMap;

    fn kind(&self) -> RendererKind {
        self.kind
    }

    fn model(&self) -> &PropertyMap {
        &self.model
    }

    fn property(&self, key: Property) -> Option<f32> {
        self.overrides.get(key).or_else(|| self.model.property(key))
    }

    fn set_property(&mut self, key: Property, value: f32) {
        self.overrides.set(key, value);
    }

    fn occupied_area(&self) -> &Rectangle {
        &self.occupied
    }

    fn occupied_area_mut(&mut self) -> &mut Rectangle {
        &mut self.occupied
    }

    fn establishes_formatting_context(&self) -> bool {
        self.formatting_root
    }
}

#[derive(Default)]
struct TestTree {
    nodes: Vec<TestNode>,
}

impl TestTree {
    fn add(&mut self, kind: RendererKind, model: PropertyMap) -> usize {
        self.nodes.push(TestNode {
            kind,
            model,
            overrides: PropertyMap::new(),
            occupied: Rectangle::default(),
            formatting_root: false,
        });
        self.nodes.len() - 1
    }

    fn add_root(&mut self) -> usize {
        let id = self.add(RendererKind::Block, PropertyMap::new());
        self.nodes[id].formatting_root = true;
        id
    }

    fn overridden(&self, id: usize, key: Property) -> Option<f32> {
        self.nodes[id].overrides.get(key)
    }
}

impl RendererTree for TestTree {
    type Id = usize;
    type Node = TestNode;

    fn renderer(&self, id: usize) -> &TestNode {
        &self.nodes[id]
    }

    fn renderer_mut(&mut self, id: usize) -> &mut TestNode {
        &mut self.nodes[id]
    }
}

fn init_logging() {
    let _init = env_logger::builder().is_test(true).try_init();
}

fn area() -> Rectangle {
    Rectangle::new(0.0, 0.0, 100.0, 500.0)
}

#[test]
fn top_border_materializes_top_margin_at_start() {
    init_logging();
    let mut tree = TestTree::default();
    let container = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginTop, 15.0)
            .with(Property::BorderTop, 1.0),
    );
    let mut handler = MarginsCollapseHandler::new(container, Some(MarginsCollapseInfo::default()));
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);

    // Spent before any child is seen.
    assert_eq!(bbox.top(), 485.0);
    assert_eq!(bbox.y(), 0.0);
    assert_eq!(tree.overridden(container, Property::MarginTop), Some(0.0));
    assert_eq!(tree.overridden(container, Property::MarginBottom), Some(0.0));
    // The declared value survives for later reads.
    assert_eq!(tree.renderer(container).model().get(Property::MarginTop), Some(15.0));
}

#[test]
fn adjoining_top_margin_is_deferred() {
    init_logging();
    let mut tree = TestTree::default();
    let container = tree.add(
        RendererKind::Block,
        PropertyMap::new().with(Property::MarginTop, 15.0),
    );
    let mut handler = MarginsCollapseHandler::new(container, Some(MarginsCollapseInfo::default()));
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);

    assert_eq!(bbox, area());
    assert_eq!(
        handler.collapse_info().collapse_before().collapsed_margins_size(),
        15.0
    );
}

#[test]
fn bottom_padding_gates_bottom_adjacency_only() {
    init_logging();
    let mut tree = TestTree::default();
    let padded_bottom = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginTop, 7.0)
            .with(Property::MarginBottom, 10.0)
            .with(Property::PaddingBottom, 5.0),
    );
    let mut handler = MarginsCollapseHandler::new(padded_bottom, None);
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);
    assert_eq!(bbox.y(), 10.0, "bottom margin materialized");
    assert_eq!(bbox.top(), 500.0, "top margin still open");

    let padded_top = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginTop, 7.0)
            .with(Property::MarginBottom, 10.0)
            .with(Property::PaddingTop, 5.0),
    );
    let mut handler = MarginsCollapseHandler::new(padded_top, None);
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);
    assert_eq!(bbox.y(), 0.0, "bottom margin still open");
    assert_eq!(bbox.top(), 493.0, "top margin materialized");
}

#[test]
fn height_property_blocks_bottom_adjacency() {
    init_logging();
    let mut tree = TestTree::default();
    let container = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginBottom, 12.0)
            .with(Property::Height, 0.0),
    );
    let mut handler = MarginsCollapseHandler::new(container, None);
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);
    assert_eq!(bbox.y(), 12.0);
    assert_eq!(bbox.height(), 488.0);
}

#[test]
fn buffer_space_absorbs_top_margin() {
    init_logging();
    let mut tree = TestTree::default();
    let container = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginTop, 20.0)
            .with(Property::Border, 1.0)
            .with(Property::Height, 100.0),
    );
    let mut handler = MarginsCollapseHandler::new(container, None);
    let mut bbox = Rectangle::new(0.0, 400.0, 100.0, 100.0);
    handler.process_fixed_height_adjustment(400.0);
    handler.start_margins_collapse(&mut tree, &mut bbox);

    // Moved down into the slack instead of shrinking.
    assert_eq!(bbox.y(), 380.0);
    assert_eq!(bbox.height(), 100.0);
    assert_eq!(handler.collapse_info().buffer_space(), 380.0);
    assert_eq!(handler.collapse_info().used_buffer_space(), 20.0);
}

#[test]
fn formatting_root_children_do_not_adjoin() {
    init_logging();
    let mut tree = TestTree::default();
    let root = tree.add_root();
    let child = tree.add(
        RendererKind::Block,
        PropertyMap::new().with(Property::MarginTop, 9.0),
    );
    let mut handler = MarginsCollapseHandler::new(root, None);
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);
    let info = handler
        .start_child_margins_handling(&tree, child, &mut bbox)
        .unwrap();
    assert!(!info.is_ignore_own_margin_top());
    assert!(!info.is_ignore_own_margin_bottom());
    assert!(info.collapse_before().is_empty());
}

#[test]
fn first_child_inherits_parent_collapse_before() {
    init_logging();
    let mut tree = TestTree::default();
    let container = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginTop, 11.0)
            .with(Property::MarginBottom, 4.0),
    );
    let child = tree.add(RendererKind::Block, PropertyMap::new());
    let mut handler = MarginsCollapseHandler::new(container, Some(MarginsCollapseInfo::default()));
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);
    let info = handler
        .start_child_margins_handling(&tree, child, &mut bbox)
        .unwrap();
    assert!(info.is_ignore_own_margin_top());
    assert!(info.is_ignore_own_margin_bottom());
    assert_eq!(info.collapse_before().collapsed_margins_size(), 11.0);
    assert_eq!(info.collapse_after().collapsed_margins_size(), 4.0);
}

#[test]
fn inline_child_gets_no_context_and_disproves_self_collapsing() {
    init_logging();
    let mut tree = TestTree::default();
    let root = tree.add_root();
    let line = tree.add(RendererKind::Inline, PropertyMap::new());
    let mut handler = MarginsCollapseHandler::new(root, None);
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);
    let info = handler.start_child_margins_handling(&tree, line, &mut bbox);
    assert!(info.is_none());
    handler.end_child_margins_handling(&mut tree, info, &mut bbox);
    let result = handler.end_margins_collapse(&mut tree);
    assert!(!result.is_self_collapsing());
}

#[test]
fn empty_box_collapses_through() {
    init_logging();
    let mut tree = TestTree::default();
    let empty = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginTop, 10.0)
            .with(Property::MarginBottom, 20.0),
    );
    let mut handler = MarginsCollapseHandler::new(empty, Some(MarginsCollapseInfo::default()));
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);
    let result = handler.end_margins_collapse(&mut tree);

    assert!(result.is_self_collapsing());
    assert_eq!(result.collapse_after().collapsed_margins_size(), 20.0);
    assert_eq!(result.own_collapse_after().collapsed_margins_size(), 20.0);
    assert_eq!(tree.overridden(empty, Property::MarginBottom), Some(20.0));
    assert_eq!(tree.overridden(empty, Property::MarginTop), Some(0.0));
}

#[test]
fn table_is_never_self_collapsing() {
    init_logging();
    let mut tree = TestTree::default();
    let table = tree.add(
        RendererKind::Table,
        PropertyMap::new().with(Property::MarginTop, 6.0),
    );
    let mut handler = MarginsCollapseHandler::new(table, None);
    let mut bbox = area();
    handler.start_margins_collapse(&mut tree, &mut bbox);
    assert_eq!(bbox.top(), 494.0, "tables never hand their margin to content");
    let result = handler.end_margins_collapse(&mut tree);
    assert!(!result.is_self_collapsing());
    assert_eq!(tree.overridden(table, Property::MarginTop), Some(6.0));
}

/// Lays out a leaf block the way a driver would: its own handler, a
/// content box of `content_height`, then the collapsed margins added back.
fn layout_leaf(
    tree: &mut TestTree,
    id: usize,
    layout_box: Rectangle,
    info: Option<MarginsCollapseInfo>,
    content_height: f32,
) -> MarginsCollapseInfo {
    let mut handler = MarginsCollapseHandler::new(id, info);
    let mut bbox = layout_box;
    handler.start_margins_collapse(tree, &mut bbox);
    *tree.renderer_mut(id).occupied_area_mut() = Rectangle::new(0.0, bbox.top(), 100.0, 0.0);
    let result = handler.end_margins_collapse(tree);

    let node = tree.renderer_mut(id);
    let top = node.occupied_area().top();
    let margin_top = node.property(Property::MarginTop).unwrap_or(0.0);
    let margin_bottom = node.property(Property::MarginBottom).unwrap_or(0.0);
    let height = content_height + margin_top + margin_bottom;
    *node.occupied_area_mut() = Rectangle::new(0.0, top + margin_top - height, 100.0, height);
    result
}

#[test]
fn next_sibling_folds_previous_bottom_margin() {
    init_logging();
    let mut tree = TestTree::default();
    let root = tree.add_root();
    let first = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginBottom, 10.0)
            .with(Property::Height, 50.0),
    );
    let second = tree.add(
        RendererKind::Block,
        PropertyMap::new()
            .with(Property::MarginTop, 20.0)
            .with(Property::Height, 50.0),
    );

    let mut handler = MarginsCollapseHandler::new(root, None);
    let mut layout_box = area();
    handler.start_margins_collapse(&mut tree, &mut layout_box);

    let first_info = handler.start_child_margins_handling(&tree, first, &mut layout_box);
    let first_result = layout_leaf(&mut tree, first, layout_box, first_info, 50.0);
    handler.end_child_margins_handling(&mut tree, Some(first_result), &mut layout_box);
    let first_box = *tree.renderer(first).occupied_area();
    assert_eq!(first_box.height(), 60.0, "own bottom margin materialized");
    assert_eq!(tree.overridden(first, Property::MarginBottom), Some(10.0));
    layout_box.set_height(first_box.y() - layout_box.y());

    let second_info = handler.start_child_margins_handling(&tree, second, &mut layout_box);
    // The provisional bottom margin is given back to the next attempt.
    assert_eq!(layout_box.top(), 450.0);
    let second_result = layout_leaf(&mut tree, second, layout_box, second_info, 50.0);
    handler.end_child_margins_handling(&mut tree, Some(second_result), &mut layout_box);

    let first_after = *tree.renderer(first).occupied_area();
    assert_eq!(first_box.height() - first_after.height(), 10.0);
    assert_eq!(first_after.top(), first_box.top());
    assert_eq!(tree.overridden(first, Property::MarginBottom), Some(0.0));
    assert_eq!(tree.overridden(second, Property::MarginTop), Some(20.0));

    let second_box = *tree.renderer(second).occupied_area();
    assert_eq!(first_after.y(), second_box.top(), "margin boxes abut");
    let second_border_top = second_box.top() - 20.0;
    assert_eq!(first_after.y() - second_border_top, 20.0);

    let result = handler.end_margins_collapse(&mut tree);
    assert!(!result.is_self_collapsing());
}
