#![forbid(unsafe_code)]

pub mod geom;
pub mod layout;
pub mod model;
pub mod plan;
pub mod svg;
pub mod text;

pub use layout::layout_tree;

use crate::model::LayoutedDiagram;
use blockmap_core::{ClassRegistry, DiagramConfig, build_tree};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] blockmap_core::Error),
    #[error("invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: i32, height: i32 },
    #[error("margin must not be negative: {margin}")]
    InvalidMargin { margin: i32 },
    #[error("strip unit must not be negative: {strip_unit}")]
    InvalidStripUnit { strip_unit: i32 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds the composition tree of `root` and places it on the configured canvas.
pub fn layout_class(
    registry: &ClassRegistry,
    root: &str,
    config: &DiagramConfig,
) -> Result<LayoutedDiagram> {
    let composition = build_tree(registry, root, config)?;
    let placement = layout_tree(&composition, config)?;
    tracing::debug!(
        root,
        nodes = placement.node_count(),
        dropped = placement.dropped,
        "laid out class"
    );
    Ok(LayoutedDiagram {
        root: root.to_string(),
        composition,
        placement,
    })
}
