#![forbid(unsafe_code)]

use crate::render::{HeadlessError, SvgRenderOptions, TextMeasurer};
use blockmap_core::{ClassRegistry, DiagramConfig};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// Canvas fill for the PNG. Replaces the SVG background when set.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

pub fn render_png(
    registry: &ClassRegistry,
    root: &str,
    config: &DiagramConfig,
    measurer: &dyn TextMeasurer,
    svg_options: &SvgRenderOptions,
    raster: &RasterOptions,
) -> Result<Vec<u8>> {
    let svg_options = svg_options_for(svg_options, raster);
    let svg = super::render_svg(registry, root, config, measurer, &svg_options)?;
    svg_to_png(&svg, raster.scale)
}

pub(crate) fn svg_options_for(svg: &SvgRenderOptions, raster: &RasterOptions) -> SvgRenderOptions {
    let mut svg = svg.clone();
    if let Some(background) = raster.background.as_deref() {
        svg.background = Some(background.to_string());
    }
    svg
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, scale)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, scale: f32) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    // Labels are measured for a sans-serif face.
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // Block SVGs always carry `width`/`height` equal to the canvas.
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}
