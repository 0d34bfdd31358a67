use core::fmt;

use css_margin_collapse::{Property, Renderer as _, RendererKind};

use crate::Layouter;

impl fmt::Debug for Layouter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "LAYOUT")?;
        let tree = self.tree();
        for (id, depth) in tree.walk() {
            let Ok(node) = tree.node(id) else {
                continue;
            };
            for _ in 0..depth {
                formatter.write_str("  ")?;
            }
            let kind = match node.kind() {
                RendererKind::Block => "block",
                RendererKind::Table => "table",
                RendererKind::Inline => "inline",
            };
            let area = node.occupied_area();
            write!(
                formatter,
                "{kind} \"{}\" [x={} y={} w={} h={}]",
                node.label.escape_debug(),
                area.x(),
                area.y(),
                area.width(),
                area.height()
            )?;
            if let Some(margin_top) = node.property(Property::MarginTop) {
                write!(formatter, " mt={margin_top}")?;
            }
            if let Some(margin_bottom) = node.property(Property::MarginBottom) {
                write!(formatter, " mb={margin_bottom}")?;
            }
            writeln!(formatter)?;
        }
        Ok(())
    }
}
