//! Declared collections.
//!
//! The catalog is the set of collection names a program declares before any
//! rule is compiled. Rule targets are checked against it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Storage class of a declared collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Persistent across rounds.
    Table,
    /// Emptied at the start of every round.
    Scratch,
    /// Tuples are delivered asynchronously to a remote address.
    Channel,
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Scratch => write!(f, "scratch"),
            Self::Channel => write!(f, "channel"),
        }
    }
}

/// One declared collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDecl {
    pub name: String,
    pub kind: CollectionKind,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
}

impl CollectionDecl {
    pub fn new(name: impl Into<String>, kind: CollectionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self::new(name, CollectionKind::Table)
    }

    pub fn scratch(name: impl Into<String>) -> Self {
        Self::new(name, CollectionKind::Scratch)
    }

    pub fn channel(name: impl Into<String>) -> Self {
        Self::new(name, CollectionKind::Channel)
    }

    /// Attach key and value column names.
    pub fn with_columns(mut self, keys: &[&str], values: &[&str]) -> Self {
        self.keys = keys.iter().map(|k| k.to_string()).collect();
        self.values = values.iter().map(|v| v.to_string()).collect();
        self
    }
}

/// Every collection declared by a program, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CollectionDecl>", into = "Vec<CollectionDecl>")]
pub struct Catalog {
    collections: BTreeMap<String, CollectionDecl>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a collection. A later declaration of the same name replaces
    /// the earlier one.
    pub fn declare(&mut self, decl: CollectionDecl) {
        self.collections.insert(decl.name.clone(), decl);
    }

    /// Builder form of [`Catalog::declare`].
    pub fn with(mut self, decl: CollectionDecl) -> Self {
        self.declare(decl);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CollectionDecl> {
        self.collections.get(name)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

impl From<Vec<CollectionDecl>> for Catalog {
    fn from(decls: Vec<CollectionDecl>) -> Self {
        let mut catalog = Catalog::new();
        for decl in decls {
            catalog.declare(decl);
        }
        catalog
    }
}

impl From<Catalog> for Vec<CollectionDecl> {
    fn from(catalog: Catalog) -> Self {
        catalog.collections.into_values().collect()
    }
}
