use crate::category::{BandMap, Category};
use crate::error::Result;
use crate::names::canonical_type_name;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Default nesting bound for composition trees (root level included).
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// What the tree builder does with a property whose type is not in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Emit a childless leaf labeled with the canonical type name.
    #[default]
    Leaf,
    /// Drop the property silently.
    Omit,
}

/// Renderer colours and font settings, keyed by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub default_fill: String,
    pub outline: String,
    pub text: String,
    pub font_size: f64,
    pub fills: IndexMap<Category, String>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut fills = IndexMap::new();
        fills.insert(Category::Test, "#e8e8ff".to_string());
        fills.insert(Category::Env, "#ffff99".to_string());
        fills.insert(Category::Agent, "#d9f2d9".to_string());
        fills.insert(Category::Scoreboard, "#ffd9b3".to_string());
        fills.insert(Category::Monitor, "#cce5ff".to_string());
        fills.insert(Category::Driver, "#f2d9e6".to_string());
        fills.insert(Category::Sequencer, "#e6f2ff".to_string());
        Self {
            default_fill: "#ffff99".to_string(),
            outline: "red".to_string(),
            text: "black".to_string(),
            font_size: 12.0,
            fills,
        }
    }
}

impl Theme {
    pub fn fill_for(&self, category: &Category) -> &str {
        self.fills
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.default_fill)
    }
}

/// Everything a run needs besides the registry and the root name.
///
/// Field names follow the JSON config file (`camelCase`); any subset may be given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagramConfig {
    pub canvas_width: i32,
    pub canvas_height: i32,
    /// Inset applied around and between sibling slots, in pixels.
    pub margin: i32,
    /// Height of the compact strip per compact sibling, in pixels.
    pub strip_unit: i32,
    pub max_depth: usize,
    /// Class or supertype names whose subtrees are suppressed entirely.
    pub exclude: IndexSet<String>,
    pub unresolved: UnresolvedPolicy,
    /// Stop expanding a class that already appears on the current path.
    pub detect_cycles: bool,
    pub bands: BandMap,
    pub theme: Theme,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 800,
            margin: 20,
            strip_unit: 60,
            max_depth: DEFAULT_MAX_DEPTH,
            exclude: ["uvm_sequence", "uvm_sequence_item"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            unresolved: UnresolvedPolicy::default(),
            detect_cycles: false,
            bands: BandMap::default(),
            theme: Theme::default(),
        }
    }
}

impl DiagramConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// True when `name` (canonicalized) is in the exclusion set.
    pub fn is_excluded(&self, name: &str) -> bool {
        let name = canonical_type_name(name);
        !name.is_empty() && self.exclude.contains(name)
    }

    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bands(mut self, bands: BandMap) -> Self {
        self.bands = bands;
        self
    }
}
