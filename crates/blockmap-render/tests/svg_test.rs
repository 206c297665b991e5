use blockmap_core::{ClassRecord, ClassRegistry, DiagramConfig, Theme};
use blockmap_render::layout_class;
use blockmap_render::svg::{SvgRenderOptions, render_svg};
use blockmap_render::text::DeterministicTextMeasurer;

fn small_env() -> ClassRegistry {
    ClassRegistry::from_records([
        ClassRecord::new("env", "uvm_env")
            .with_property("scoreboard", "sb")
            .with_property("agent", "ag"),
        ClassRecord::new("scoreboard", "uvm_scoreboard"),
        ClassRecord::new("agent", "uvm_agent"),
    ])
    .expect("registry ok")
}

fn render(registry: &ClassRegistry, root: &str, options: &SvgRenderOptions) -> String {
    let config = DiagramConfig::default();
    let diagram = layout_class(registry, root, &config).expect("layout ok");
    render_svg(
        &diagram.placement,
        &config.theme,
        &DeterministicTextMeasurer::default(),
        options,
    )
}

#[test]
fn svg_draws_one_block_per_node() {
    let svg = render(&small_env(), "env", &SvgRenderOptions::default());
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="800""#));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<g class=\"block\"").count(), 3);

    assert!(svg.contains(
        r##"<rect x="0" y="0" width="799" height="799" fill="#ffff99" stroke="red"/>"##
    ));
    assert!(svg.contains(
        r##"<rect x="40" y="40" width="719" height="199" fill="#ffd9b3" stroke="red"/>"##
    ));
    assert!(svg.contains(r#"<text x="4" y="16" font-size="12" fill="black">env</text>"#));
    assert!(svg.contains(
        r#"<rect class="background" x="0" y="0" width="800" height="800" fill="white"/>"#
    ));
    assert!(svg.contains(">scoreboard [sb]</text>"));
    assert!(svg.contains(">agent [ag]</text>"));
}

#[test]
fn svg_parents_come_before_children() {
    let svg = render(&small_env(), "env", &SvgRenderOptions::default());
    let env = svg.find(">env</text>").expect("env label");
    let scoreboard = svg.find(">scoreboard [sb]</text>").expect("scoreboard label");
    let agent = svg.find(">agent [ag]</text>").expect("agent label");
    assert!(env < scoreboard && scoreboard < agent);
}

#[test]
fn svg_options_control_id_background_and_property_names() {
    let options = SvgRenderOptions {
        diagram_id: Some("tb<1>".to_string()),
        background: None,
        include_property_names: false,
        ..Default::default()
    };
    let svg = render(&small_env(), "env", &options);
    assert!(svg.contains(r#" id="tb&lt;1&gt;""#));
    assert!(!svg.contains(r#"class="background""#));
    assert!(svg.contains(">scoreboard</text>"));
    assert!(svg.contains(">env</text>"));
}

#[test]
fn svg_background_takes_the_configured_fill() {
    let options = SvgRenderOptions {
        background: Some("#ffff99".to_string()),
        ..Default::default()
    };
    let svg = render(&small_env(), "env", &options);
    assert!(svg.contains(r##"height="800" fill="#ffff99"/>"##));
    // The root has no property.
    assert!(svg.contains(">env</text>"));
}

#[test]
fn svg_truncates_labels_that_do_not_fit() {
    let registry = ClassRegistry::from_records([
        ClassRecord::new("top", "uvm_env").with_property("a_rather_long_component_name", "c"),
        ClassRecord::new("a_rather_long_component_name", "uvm_component"),
    ])
    .expect("registry ok");
    let config = DiagramConfig {
        canvas_width: 200,
        canvas_height: 200,
        ..Default::default()
    };
    let diagram = layout_class(&registry, "top", &config).expect("layout ok");
    let svg = render_svg(
        &diagram.placement,
        &Theme::default(),
        &DeterministicTextMeasurer::default(),
        &SvgRenderOptions::default(),
    );
    // Child box is 159px wide: 151px of text at 7.2px per glyph is 19 glyphs and the ellipsis.
    assert!(svg.contains(">a_rather_long_compo\u{2026}</text>"));
    assert!(!svg.contains("a_rather_long_component_name</text>"));
}

#[test]
fn svg_escapes_markup_in_labels() {
    let registry = ClassRegistry::from_records([
        ClassRecord::new("env", "uvm_env").with_property("a&b", "x")
    ])
    .expect("registry ok");
    let svg = render(&registry, "env", &SvgRenderOptions::default());
    assert!(svg.contains(">a&amp;b [x]</text>"));
    assert!(svg.contains(r#"class="block unresolved""#));
}
