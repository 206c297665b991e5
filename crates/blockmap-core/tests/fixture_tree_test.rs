use blockmap_core::{
    Category, ClassRegistry, CompositionNode, DiagramConfig, NodeKind, UnresolvedPolicy,
    build_tree,
};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn testbench() -> ClassRegistry {
    let path = workspace_root().join("fixtures").join("uvm_testbench.json");
    let text = std::fs::read_to_string(&path).expect("fixture");
    ClassRegistry::from_json(&text).expect("registry ok")
}

fn find<'a>(node: &'a CompositionNode, label: &str) -> &'a CompositionNode {
    node.children
        .iter()
        .find(|n| n.label == label)
        .unwrap_or_else(|| panic!("{} has no child {label}", node.label))
}

#[test]
fn fixture_registry_canonicalizes_names_and_supertypes() {
    let registry = testbench();
    assert_eq!(registry.len(), 13);

    let seqr = registry.get("bus_sequencer").expect("sequencer");
    assert_eq!(seqr.supertype, "uvm_sequencer");
    assert_eq!(seqr.full_supertype, "uvm_sequencer #(bus_item)");
    assert_eq!(seqr.category(), Category::Sequencer);

    let cov = registry.get("coverage_collector").expect("collector");
    assert_eq!(cov.category(), Category::Subscriber);
}

#[test]
fn fixture_test_tree_has_the_expected_shape() {
    let registry = testbench();
    let tree = build_tree(&registry, "base_test", &DiagramConfig::default()).expect("tree ok");
    let test = &tree[0];
    assert_eq!(test.category, Category::Test);
    assert_eq!(test.depth(), 5);

    let env = find(test, "tb_env");
    let labels = env.children.iter().map(|n| n.label.as_str()).collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec!["tb_scoreboard", "bus_agent", "bus_agent", "reg_model", "coverage_collector"]
    );

    // bus_item derives from an excluded base class, so the collector holds nothing.
    assert!(find(env, "coverage_collector").is_leaf());

    let fifo = &find(env, "tb_scoreboard").children[0];
    assert_eq!(fifo.kind, NodeKind::Unresolved);
    assert_eq!(fifo.label, "uvm_tlm_analysis_fifo");
    assert_eq!(fifo.property.as_deref(), Some("m_expected"));
}

#[test]
fn fixture_tree_without_unresolved_leaves() {
    let registry = testbench();
    let config = DiagramConfig {
        unresolved: UnresolvedPolicy::Omit,
        ..Default::default()
    };
    let tree = build_tree(&registry, "base_test", &config).expect("tree ok");
    let mut stack = tree.iter().collect::<Vec<_>>();
    while let Some(node) = stack.pop() {
        assert_ne!(node.kind, NodeKind::Unresolved, "{} left in", node.label);
        stack.extend(node.children.iter());
    }
    assert_eq!(tree[0].depth(), 4);
}

#[test]
fn excluding_nothing_expands_sequence_items() {
    let registry = testbench();
    let config = DiagramConfig::default().with_exclude(Vec::<String>::new());
    let tree = build_tree(&registry, "smoke_seq", &config).expect("tree ok");
    assert_eq!(tree.len(), 1);
    assert_eq!(
        tree[0].outline(),
        "uvm_sequence smoke_seq\n  uvm_sequence_item bus_item [req]\n    bit bit [addr] ?\n    bit bit [data] ?\n"
    );
}
