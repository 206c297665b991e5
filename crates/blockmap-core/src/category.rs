//! Node categories and the placement bands they map to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display category of a composition node.
///
/// Known UVM base classes get their own variant; anything else (user base
/// classes, built-in types, unresolved references) keeps its raw name in
/// [`Category::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Test,
    Env,
    Agent,
    Scoreboard,
    Monitor,
    Driver,
    Sequencer,
    Sequence,
    SequenceItem,
    Component,
    Object,
    RegBlock,
    Subscriber,
    Unknown(String),
}

impl Category {
    pub fn from_name(name: &str) -> Self {
        match name {
            "uvm_test" => Self::Test,
            "uvm_env" => Self::Env,
            "uvm_agent" => Self::Agent,
            "uvm_scoreboard" => Self::Scoreboard,
            "uvm_monitor" => Self::Monitor,
            "uvm_driver" => Self::Driver,
            "uvm_sequencer" => Self::Sequencer,
            "uvm_sequence" => Self::Sequence,
            "uvm_sequence_item" => Self::SequenceItem,
            "uvm_component" => Self::Component,
            "uvm_object" => Self::Object,
            "uvm_reg_block" => Self::RegBlock,
            "uvm_subscriber" => Self::Subscriber,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Test => "uvm_test",
            Self::Env => "uvm_env",
            Self::Agent => "uvm_agent",
            Self::Scoreboard => "uvm_scoreboard",
            Self::Monitor => "uvm_monitor",
            Self::Driver => "uvm_driver",
            Self::Sequencer => "uvm_sequencer",
            Self::Sequence => "uvm_sequence",
            Self::SequenceItem => "uvm_sequence_item",
            Self::Component => "uvm_component",
            Self::Object => "uvm_object",
            Self::RegBlock => "uvm_reg_block",
            Self::Subscriber => "uvm_subscriber",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match Self::from_name(&value) {
            Self::Unknown(_) => Self::Unknown(value),
            known => known,
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region of a parent rectangle a sibling is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// Dedicated strip across the top third of the parent.
    Top,
    /// Fixed-height strip sized by the number of compact siblings.
    Compact,
    /// Uniform row filling whatever space is left.
    Middle,
}

/// Band used for every category the table does not mention.
pub const DEFAULT_BAND: Band = Band::Middle;

/// Explicit `Category -> Band` table with a single fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandMap {
    pub default: Band,
    pub table: IndexMap<Category, Band>,
}

impl Default for BandMap {
    fn default() -> Self {
        Self::uniform(DEFAULT_BAND)
            .with(Category::Scoreboard, Band::Top)
            .with(Category::Sequencer, Band::Compact)
            .with(Category::Object, Band::Compact)
            .with(Category::RegBlock, Band::Compact)
    }
}

impl BandMap {
    /// A map that sends every category to `default`.
    pub fn uniform(default: Band) -> Self {
        Self {
            default,
            table: IndexMap::new(),
        }
    }

    pub fn with(mut self, category: impl Into<Category>, band: Band) -> Self {
        self.table.insert(category.into(), band);
        self
    }

    pub fn band_for(&self, category: &Category) -> Band {
        self.table.get(category).copied().unwrap_or(self.default)
    }
}
