use crate::geom::{PixelBox, pixel_box};
use blockmap_core::{Category, CompositionNode, NodeKind};
use serde::{Deserialize, Serialize};

/// A composition node with its rectangle (inclusive pixel coordinates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementNode {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    pub category: Category,
    pub kind: NodeKind,
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlacementNode>,
}

impl PlacementNode {
    pub(crate) fn new(node: &CompositionNode, rect: PixelBox) -> Self {
        Self {
            label: node.label.clone(),
            property: node.property.clone(),
            category: node.category.clone(),
            kind: node.kind,
            x0: rect.min.x,
            y0: rect.min.y,
            x1: rect.max.x,
            y1: rect.max.y,
            children: Vec::new(),
        }
    }

    pub fn rect(&self) -> PixelBox {
        pixel_box(self.x0, self.y0, self.x1, self.y1)
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Pre-order traversal: a parent always comes before its children.
    pub fn iter(&self) -> impl Iterator<Item = &PlacementNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementTree {
    pub width: i32,
    pub height: i32,
    pub roots: Vec<PlacementNode>,
    /// Composition nodes left out because their slot had no room.
    #[serde(default)]
    pub dropped: usize,
}

impl PlacementTree {
    /// The root rectangle: `(0, 0)-(width-1, height-1)`.
    pub fn canvas(&self) -> PixelBox {
        pixel_box(0, 0, self.width - 1, self.height - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacementNode> {
        self.roots.iter().flat_map(PlacementNode::iter)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}

/// Everything produced for one root class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutedDiagram {
    pub root: String,
    pub composition: Vec<CompositionNode>,
    pub placement: PlacementTree,
}
