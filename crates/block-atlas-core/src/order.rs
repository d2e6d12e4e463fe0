use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BlockAtlasError, Result};

/// Persisted packing order: a JSON array of tile identifiers.
///
/// List position is cell assignment order (row-major).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct OrderList(Vec<String>);

impl OrderList {
    pub fn new(keys: Vec<String>) -> Self {
        Self(keys)
    }

    /// Reads `path`; an absent file is `MissingOrderFile`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(BlockAtlasError::MissingOrderFile(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn push(&mut self, key: impl Into<String>) {
        self.0.push(key.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for OrderList {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl FromIterator<String> for OrderList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
