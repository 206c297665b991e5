use crate::geom::{PixelBox, pixel_box};
use crate::model::{PlacementNode, PlacementTree};
use crate::plan::{MarginMode, SiblingPlanner};
use crate::{Error, Result};
use blockmap_core::{Band, BandMap, CompositionNode, DiagramConfig};

/// Places a composition tree on the configured canvas.
///
/// A single root entry covers the canvas edge to edge; every deeper level is planned with the
/// margin and the category bands. Nodes whose planned slot is empty (the parent was too small to
/// host them) are left out together with their subtrees and counted in
/// [`PlacementTree::dropped`].
///
/// The canvas must be non-empty and `margin`/`strip_unit` non-negative.
pub fn layout_tree(roots: &[CompositionNode], config: &DiagramConfig) -> Result<PlacementTree> {
    let (width, height) = (config.canvas_width, config.canvas_height);
    if width <= 0 || height <= 0 {
        return Err(Error::InvalidCanvas { width, height });
    }
    if config.margin < 0 {
        return Err(Error::InvalidMargin {
            margin: config.margin,
        });
    }
    if config.strip_unit < 0 {
        return Err(Error::InvalidStripUnit {
            strip_unit: config.strip_unit,
        });
    }

    let canvas = pixel_box(0, 0, width - 1, height - 1);
    let walker = LayoutWalker {
        planner: SiblingPlanner::new(config.margin, config.strip_unit),
        bands: &config.bands,
    };

    let slots = if roots.len() == 1 {
        walker.planner.plan_uniform(canvas, 1, MarginMode::Flush)
    } else {
        walker.plan_level(canvas, roots)
    };

    let mut dropped = 0usize;
    let placed = walker.place_all(roots, slots, &mut dropped);
    if dropped > 0 {
        tracing::warn!(dropped, "some nodes did not fit the canvas");
    }

    Ok(PlacementTree {
        width,
        height,
        roots: placed,
        dropped,
    })
}

struct LayoutWalker<'a> {
    planner: SiblingPlanner,
    bands: &'a BandMap,
}

impl LayoutWalker<'_> {
    fn plan_level(&self, parent: PixelBox, siblings: &[CompositionNode]) -> Vec<PixelBox> {
        let bands = siblings
            .iter()
            .map(|n| self.bands.band_for(&n.category))
            .collect::<Vec<Band>>();
        self.planner.plan(parent, &bands, MarginMode::Inset)
    }

    fn place_all(
        &self,
        nodes: &[CompositionNode],
        slots: Vec<PixelBox>,
        dropped: &mut usize,
    ) -> Vec<PlacementNode> {
        let mut out = Vec::with_capacity(nodes.len());
        for (node, rect) in nodes.iter().zip(slots) {
            if rect.is_empty() {
                tracing::debug!(label = %node.label, ?rect, "no room for node");
                *dropped += node.node_count();
                continue;
            }
            out.push(self.place(node, rect, dropped));
        }
        out
    }

    fn place(&self, node: &CompositionNode, rect: PixelBox, dropped: &mut usize) -> PlacementNode {
        let mut placed = PlacementNode::new(node, rect);
        if !node.children.is_empty() {
            let slots = self.plan_level(rect, &node.children);
            placed.children = self.place_all(&node.children, slots, dropped);
        }
        placed
    }
}
