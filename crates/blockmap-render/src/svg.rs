use crate::model::{PlacementNode, PlacementTree};
use crate::text::{TextMeasurer, TextStyle, fit_label};
use blockmap_core::{NodeKind, Theme};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Optional id placed on the root `<svg>` element.
    pub diagram_id: Option<String>,
    /// Padding between a block's top-left corner and its label baseline box.
    pub label_padding: f64,
    /// When true, append the property name to each non-root label (`env [m_env]`).
    pub include_property_names: bool,
    /// Fill of a full-canvas rect drawn before the blocks; `None` leaves the canvas transparent.
    pub background: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            label_padding: 4.0,
            include_property_names: true,
            background: Some("white".to_string()),
        }
    }
}

/// Draws every placed node as an outlined, filled rectangle with its label in the top-left
/// corner. Parents are drawn before their children so nested blocks stay visible.
pub fn render_svg(
    tree: &PlacementTree,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
    options: &SvgRenderOptions,
) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg""#);
    if let Some(id) = options.diagram_id.as_deref() {
        let _ = write!(&mut out, r#" id="{}""#, escape_xml(id));
    }
    let _ = writeln!(
        &mut out,
        r#" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = tree.width,
        h = tree.height
    );

    if let Some(fill) = options.background.as_deref() {
        let _ = writeln!(
            &mut out,
            r#"<rect class="background" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            tree.width,
            tree.height,
            escape_xml(fill)
        );
    }

    let style = TextStyle {
        font_family: None,
        font_size: theme.font_size,
    };
    for node in tree.iter() {
        render_node(&mut out, node, theme, measurer, &style, options);
    }

    out.push_str("</svg>\n");
    out
}

fn render_node(
    out: &mut String,
    node: &PlacementNode,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
    style: &TextStyle,
    options: &SvgRenderOptions,
) {
    let class = match node.kind {
        NodeKind::Class => "block",
        NodeKind::Reference => "block reference",
        NodeKind::Unresolved => "block unresolved",
    };
    let _ = writeln!(
        out,
        r#"<g class="{}" data-category="{}">"#,
        class,
        escape_xml(node.category.as_str())
    );
    let _ = writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}"/>"#,
        node.x0,
        node.y0,
        node.width(),
        node.height(),
        escape_xml(theme.fill_for(&node.category)),
        escape_xml(&theme.outline)
    );

    let mut label = node.label.clone();
    if options.include_property_names {
        if let Some(property) = node.property.as_deref() {
            let _ = write!(&mut label, " [{property}]");
        }
    }
    let max_width = f64::from(node.width()) - 2.0 * options.label_padding;
    let metrics = measurer.measure(&label, style);
    let fitted = fit_label(&label, max_width, style, measurer);
    if !fitted.is_empty() && metrics.height + options.label_padding <= f64::from(node.height()) {
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" fill="{}">{}</text>"#,
            f64::from(node.x0) + options.label_padding,
            f64::from(node.y0) + options.label_padding + style.font_size,
            style.font_size,
            escape_xml(&theme.text),
            escape_xml(&fitted)
        );
    }
    out.push_str("</g>\n");
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
