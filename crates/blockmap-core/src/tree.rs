//! Composition trees: a class and, recursively, the known classes its properties hold.
//!
//! The registry is a general graph (`A` may hold `B` which holds `A`), so expansion is bounded by
//! [`DiagramConfig::max_depth`] levels. A class reached at the last level becomes a childless
//! reference leaf. With [`DiagramConfig::detect_cycles`] set, a class that is already being
//! expanded higher up on the same path becomes a reference leaf right away.

use crate::category::Category;
use crate::config::{DiagramConfig, UnresolvedPolicy};
use crate::error::Result;
use crate::registry::{ClassDefinition, ClassRegistry};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A registry class whose properties were expanded.
    Class,
    /// A registry class left unexpanded (depth bound or cycle).
    Reference,
    /// A property type the registry does not know.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionNode {
    /// Display name: the class name, or the canonical type name for unresolved leaves.
    pub label: String,
    /// Declared property name this node was reached through (`None` for the root).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// Canonical class/type name, i.e. the registry key.
    pub type_name: String,
    pub category: Category,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CompositionNode>,
}

impl CompositionNode {
    fn for_class(def: &ClassDefinition, property: Option<&str>, kind: NodeKind) -> Self {
        Self {
            label: def.name.clone(),
            property: property.map(str::to_string),
            type_name: def.name.clone(),
            category: def.category(),
            kind,
            children: Vec::new(),
        }
    }

    fn unresolved(type_name: &str, property: &str) -> Self {
        Self {
            label: type_name.to_string(),
            property: Some(property.to_string()),
            type_name: type_name.to_string(),
            category: Category::from_name(type_name),
            kind: NodeKind::Unresolved,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of node levels in this subtree (a lone node has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Indented text listing, two spaces per level: `<category> <label> [<property>]`.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str("  ");
        }
        let category = self.category.as_str();
        if !category.is_empty() {
            out.push_str(category);
            out.push(' ');
        }
        out.push_str(&self.label);
        if let Some(property) = &self.property {
            let _ = write!(out, " [{property}]");
        }
        match self.kind {
            NodeKind::Reference => out.push_str(" ..."),
            NodeKind::Unresolved => out.push_str(" ?"),
            NodeKind::Class => {}
        }
        out.push('\n');
        for child in &self.children {
            child.write_outline(out, level + 1);
        }
    }
}

/// Builds the composition tree rooted at `root`.
///
/// Returns no entries when the root class (or its supertype) is excluded, otherwise exactly one.
/// Fails with [`crate::Error::NotFound`] when `root` is not in the registry.
pub fn build_tree(
    registry: &ClassRegistry,
    root: &str,
    config: &DiagramConfig,
) -> Result<Vec<CompositionNode>> {
    let def = registry.require(root)?;
    let mut builder = TreeBuilder {
        registry,
        config,
        max_depth: config.max_depth.max(1),
        path: FxHashSet::default(),
    };
    Ok(builder.expand(def, None, 1).into_iter().collect())
}

struct TreeBuilder<'a> {
    registry: &'a ClassRegistry,
    config: &'a DiagramConfig,
    max_depth: usize,
    path: FxHashSet<&'a str>,
}

impl<'a> TreeBuilder<'a> {
    fn is_excluded(&self, def: &ClassDefinition) -> bool {
        self.config.is_excluded(&def.name) || self.config.is_excluded(&def.supertype)
    }

    /// Expands `def` as a node on level `depth` (the root is level 1).
    fn expand(
        &mut self,
        def: &'a ClassDefinition,
        property: Option<&str>,
        depth: usize,
    ) -> Option<CompositionNode> {
        if self.is_excluded(def) {
            tracing::debug!(class = %def.name, "class excluded");
            return None;
        }

        if depth >= self.max_depth && !def.properties.is_empty() {
            tracing::debug!(class = %def.name, depth, "depth bound reached");
            return Some(CompositionNode::for_class(def, property, NodeKind::Reference));
        }

        let mut node = CompositionNode::for_class(def, property, NodeKind::Class);
        self.path.insert(def.name.as_str());

        for prop in &def.properties {
            let type_name = prop.canonical_type();
            if type_name.is_empty() {
                tracing::debug!(class = %def.name, property = %prop.name, "property without a type skipped");
                continue;
            }

            match self.registry.get(type_name) {
                Some(child) if self.config.detect_cycles && self.path.contains(child.name.as_str()) => {
                    if self.is_excluded(child) {
                        continue;
                    }
                    tracing::debug!(class = %child.name, "cycle cut short");
                    node.children.push(CompositionNode::for_class(
                        child,
                        Some(&prop.name),
                        NodeKind::Reference,
                    ));
                }
                Some(child) => {
                    node.children
                        .extend(self.expand(child, Some(&prop.name), depth + 1));
                }
                None => {
                    if self.config.unresolved == UnresolvedPolicy::Omit
                        || self.config.is_excluded(type_name)
                    {
                        continue;
                    }
                    node.children
                        .push(CompositionNode::unresolved(type_name, &prop.name));
                }
            }
        }

        self.path.remove(def.name.as_str());
        Some(node)
    }
}
