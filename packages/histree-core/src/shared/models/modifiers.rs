//! Modifier sets
//!
//! Modifiers are kept as source strings (`public`, `static`, `@Override`)
//! in a sorted set, so equality and rendering are independent of declaration
//! order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Sorted set of modifier strings attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModifierSet {
    modifiers: BTreeSet<String>,
}

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, modifier: impl Into<String>) -> bool {
        self.modifiers.insert(modifier.into())
    }

    pub fn contains(&self, modifier: &str) -> bool {
        self.modifiers.contains(modifier)
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modifiers.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            modifiers: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for modifier in &self.modifiers {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", modifier)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_insensitive_equality() {
        let a: ModifierSet = ["static", "public", "final"].into_iter().collect();
        let b: ModifierSet = ["public", "final", "static"].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "final public static");
    }

    #[test]
    fn test_contains() {
        let set: ModifierSet = ["public", "@Override"].into_iter().collect();
        assert!(set.contains("@Override"));
        assert!(!set.contains("private"));
    }
}
