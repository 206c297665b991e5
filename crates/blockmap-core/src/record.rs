//! Parser-facing input records.
//!
//! The source-language parser lives outside this workspace; it hands over one
//! [`ClassRecord`] per class declaration, typically serialized as JSON.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A typed property as declared: `(typeName, propertyName)`.
///
/// Serialized as a two element array, e.g. `["my_agent #(cfg_t)", "agent"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Property {
    pub type_name: String,
    pub name: String,
}

impl Property {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn canonical_type(&self) -> &str {
        crate::names::canonical_type_name(&self.type_name)
    }
}

impl From<(String, String)> for Property {
    fn from((type_name, name): (String, String)) -> Self {
        Self { type_name, name }
    }
}

impl From<Property> for (String, String) {
    fn from(value: Property) -> Self {
        (value.type_name, value.name)
    }
}

/// One parsed class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    #[serde(default, alias = "type")]
    pub supertype: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>, supertype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype: supertype.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, type_name: impl Into<String>, name: impl Into<String>) -> Self {
        self.properties.push(Property::new(type_name, name));
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    List(Vec<ClassRecord>),
    Wrapped { classes: Vec<ClassRecord> },
}

/// Decodes a JSON document holding either `[record, ...]` or `{ "classes": [...] }`.
pub fn records_from_json(text: &str) -> Result<Vec<ClassRecord>> {
    let doc: RecordDocument = serde_json::from_str(text)?;
    Ok(match doc {
        RecordDocument::List(records) => records,
        RecordDocument::Wrapped { classes } => classes,
    })
}
