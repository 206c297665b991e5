#![forbid(unsafe_code)]

//! Class registry + composition tree builder (headless).
//!
//! Input is a flat set of parsed class records (`name`, `supertype`, typed properties). The
//! registry resolves property types to other known classes; [`build_tree`] turns one root class
//! into a bounded composition tree that `blockmap-render` lays out as nested blocks.
//!
//! Everything here is synchronous and pure: the registry is read-only once built, and every run
//! recomputes its trees from scratch.

pub mod category;
pub mod config;
pub mod error;
pub mod names;
pub mod record;
pub mod registry;
pub mod tree;

pub use category::{Band, BandMap, Category, DEFAULT_BAND};
pub use config::{DEFAULT_MAX_DEPTH, DiagramConfig, Theme, UnresolvedPolicy};
pub use error::{Error, Result};
pub use names::canonical_type_name;
pub use record::{ClassRecord, Property, records_from_json};
pub use registry::{ClassDefinition, ClassRegistry, RegistryBuilder};
pub use tree::{CompositionNode, NodeKind, build_tree};

#[cfg(test)]
mod tests;
