#![forbid(unsafe_code)]

//! `blockmap` draws the composition of a UVM testbench as nested blocks.
//!
//! A [`ClassRegistry`] is built from parsed class records; one root class is expanded into a
//! composition tree, the tree is placed on a fixed canvas, and the placement is drawn as SVG
//! (or PNG).
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`blockmap::render`)
//! - `raster`: enable PNG output via pure-Rust SVG rasterization

pub use blockmap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use blockmap_render::geom::{PixelBox, divide_rect};
    pub use blockmap_render::model::{LayoutedDiagram, PlacementNode, PlacementTree};
    pub use blockmap_render::svg::SvgRenderOptions;
    pub use blockmap_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use blockmap_render::{Error as RenderError, layout_class, layout_tree};

    use blockmap_core::{ClassRegistry, CompositionNode, DiagramConfig};
    use std::sync::Arc;

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] blockmap_core::Error),
        #[error(transparent)]
        Render(#[from] RenderError),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Turns free text into a token usable as an SVG `id`.
    ///
    /// Characters outside `[A-Za-z0-9_:.]` become a single `-`; leading and trailing dashes are
    /// dropped. Tokens that do not start with a letter get a `b-` prefix, and empty input gives
    /// `b-untitled`.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let mut token = String::with_capacity(raw.len() + 2);
        for ch in raw.chars() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '.') {
                token.push(ch);
            } else if !token.is_empty() && !token.ends_with('-') {
                token.push('-');
            }
        }
        let token = token.trim_end_matches('-');
        match token.chars().next() {
            None => "b-untitled".to_string(),
            Some(first) if first.is_ascii_alphabetic() => token.to_string(),
            Some(_) => format!("b-{token}"),
        }
    }

    pub fn render_layouted_svg(
        diagram: &LayoutedDiagram,
        config: &DiagramConfig,
        measurer: &dyn TextMeasurer,
        svg_options: &SvgRenderOptions,
    ) -> String {
        blockmap_render::svg::render_svg(&diagram.placement, &config.theme, measurer, svg_options)
    }

    pub fn render_svg(
        registry: &ClassRegistry,
        root: &str,
        config: &DiagramConfig,
        measurer: &dyn TextMeasurer,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let diagram = layout_class(registry, root, config)?;
        Ok(render_layouted_svg(&diagram, config, measurer, svg_options))
    }

    /// Bundles a registry with the options every call needs.
    ///
    /// All work is CPU-bound and does no I/O; a renderer can be shared across threads and reused
    /// for any number of root classes.
    #[derive(Clone)]
    pub struct HeadlessRenderer {
        pub registry: Arc<ClassRegistry>,
        pub config: DiagramConfig,
        pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
        pub svg: SvgRenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new(registry: ClassRegistry) -> Self {
            Self {
                registry: Arc::new(registry),
                config: DiagramConfig::default(),
                text_measurer: Arc::new(DeterministicTextMeasurer::default()),
                svg: SvgRenderOptions::default(),
            }
        }

        pub fn with_config(mut self, config: DiagramConfig) -> Self {
            self.config = config;
            self
        }

        pub fn with_text_measurer(
            mut self,
            text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
        ) -> Self {
            self.text_measurer = text_measurer;
            self
        }

        pub fn build_tree(&self, root: &str) -> Result<Vec<CompositionNode>> {
            Ok(blockmap_core::build_tree(&self.registry, root, &self.config)?)
        }

        pub fn layout(&self, root: &str) -> Result<LayoutedDiagram> {
            Ok(layout_class(&self.registry, root, &self.config)?)
        }

        pub fn render_svg(&self, root: &str) -> Result<String> {
            self.render_svg_with(root, &self.svg)
        }

        pub fn render_svg_with(&self, root: &str, svg: &SvgRenderOptions) -> Result<String> {
            render_svg(
                &self.registry,
                root,
                &self.config,
                self.text_measurer.as_ref(),
                svg,
            )
        }

        pub fn render_svg_with_diagram_id(&self, root: &str, diagram_id: &str) -> Result<String> {
            let mut svg = self.svg.clone();
            svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self.render_svg_with(root, &svg)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            root: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg_options = raster::svg_options_for(&self.svg, raster);
            let svg = self.render_svg_with(root, &svg_options)?;
            raster::svg_to_png(&svg, raster.scale)
        }
    }

}
