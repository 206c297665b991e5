use crate::category::Category;
use crate::error::{Error, Result};
use crate::names::canonical_type_name;
use crate::record::{ClassRecord, Property, records_from_json};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// A class as stored in the registry: canonical names plus the declared text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    pub name: String,
    pub supertype: String,
    pub full_name: String,
    pub full_supertype: String,
    pub properties: Vec<Property>,
}

impl ClassDefinition {
    pub fn from_record(record: ClassRecord) -> Result<Self> {
        let name = canonical_type_name(&record.name).to_string();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(Self {
            name,
            supertype: canonical_type_name(&record.supertype).to_string(),
            full_name: record.name,
            full_supertype: record.supertype,
            properties: record.properties,
        })
    }

    pub fn category(&self) -> Category {
        Category::from_name(&self.supertype)
    }
}

/// Accumulates parsed records; [`RegistryBuilder::build`] freezes them.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    classes: IndexMap<String, ClassDefinition>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record. A record whose canonical name is already present replaces it.
    pub fn insert(&mut self, record: ClassRecord) -> Result<&mut Self> {
        let def = ClassDefinition::from_record(record)?;
        if let Some(previous) = self.classes.insert(def.name.clone(), def) {
            tracing::debug!(class = %previous.name, "class redefined; keeping the later record");
        }
        Ok(self)
    }

    pub fn extend<I>(&mut self, records: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = ClassRecord>,
    {
        for record in records {
            self.insert(record)?;
        }
        Ok(self)
    }

    /// Adds every record of a JSON document (see [`records_from_json`]) and returns how many
    /// records it held.
    pub fn extend_from_json(&mut self, text: &str) -> Result<usize> {
        let records = records_from_json(text)?;
        let count = records.len();
        self.extend(records)?;
        Ok(count)
    }

    pub fn build(self) -> ClassRegistry {
        tracing::debug!(classes = self.classes.len(), "class registry built");
        ClassRegistry {
            classes: self.classes,
        }
    }
}

/// Immutable lookup table from canonical class name to its definition.
///
/// Iteration follows first-insertion order, which keeps every derived output deterministic.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: IndexMap<String, ClassDefinition>,
}

impl ClassRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClassRecord>,
    {
        let mut builder = RegistryBuilder::new();
        builder.extend(records)?;
        Ok(builder.build())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut builder = RegistryBuilder::new();
        builder.extend_from_json(text)?;
        Ok(builder.build())
    }

    /// Looks a class up by its declared or canonical name.
    pub fn get(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.get(canonical_type_name(name))
    }

    pub fn require(&self, name: &str) -> Result<&ClassDefinition> {
        self.get(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Classes that no property of any other class refers to, in registry order.
    ///
    /// These are the natural roots of a diagram (usually the test classes).
    pub fn unreferenced(&self) -> Vec<&ClassDefinition> {
        let mut referenced: FxHashSet<&str> = FxHashSet::default();
        for def in self.classes.values() {
            for prop in &def.properties {
                let ty = prop.canonical_type();
                if ty != def.name {
                    referenced.insert(ty);
                }
            }
        }
        self.classes
            .values()
            .filter(|def| !referenced.contains(def.name.as_str()))
            .collect()
    }
}
