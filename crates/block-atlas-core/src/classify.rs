use crate::config::{Category, RuleSet};
use serde::{Deserialize, Serialize};

/// Categories a tile belongs to, in rule order.
///
/// Computed once per tile from its identifier; the compositor only looks at
/// this set, never at the identifier string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileClass {
    categories: Vec<Category>,
}

impl TileClass {
    /// Case-insensitive substring classification of `identifier`.
    pub fn of(identifier: &str, rules: &RuleSet) -> Self {
        let lowered = identifier.to_lowercase();
        let mut categories: Vec<Category> = Vec::new();
        for rule in &rules.rules {
            if !categories.contains(&rule.category) && rule.matches(&lowered) {
                categories.push(rule.category);
            }
        }
        Self { categories }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// True when no rule matched; the tile is a plain copy.
    pub fn is_plain(&self) -> bool {
        self.categories.is_empty()
    }
}
