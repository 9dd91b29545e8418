use serde::{Deserialize, Serialize};
use std::fmt;

/// A (provider, account) pair the merchant chose to accept payments through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub provider: String,
    pub account: String,
}

impl Selection {
    pub fn new(provider: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            account: account.into(),
        }
    }

    fn matches(&self, provider: &str, account: &str) -> bool {
        self.provider == provider && self.account == account
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.account)
    }
}

/// Set of selections without duplicates, iterated in insertion order.
///
/// Backed by a `Vec`: the set holds at most a handful of pairs, and keeping
/// insertion order makes display and assertions deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    items: Vec<Selection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the pair if present, otherwise appends it.
    ///
    /// Returns whether the pair is selected afterwards.
    pub fn toggle(&mut self, provider: &str, account: &str) -> bool {
        match self.items.iter().position(|s| s.matches(provider, account)) {
            Some(index) => {
                self.items.remove(index);
                false
            }
            None => {
                self.items.push(Selection::new(provider, account));
                true
            }
        }
    }

    pub fn is_selected(&self, provider: &str, account: &str) -> bool {
        self.items.iter().any(|s| s.matches(provider, account))
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Selection] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Selection;
    type IntoIter = std::slice::Iter<'a, Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut set = SelectionSet::new();

        assert!(set.toggle("bKash", "01712345678"));
        assert!(set.is_selected("bKash", "01712345678"));
        assert_eq!(set.count(), 1);

        assert!(!set.toggle("bKash", "01712345678"));
        assert!(!set.is_selected("bKash", "01712345678"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_contents() {
        let mut set = SelectionSet::new();
        set.toggle("bKash", "01712345678");
        set.toggle("Nagad", "01712345678");
        let before = set.clone();

        set.toggle("Rocket", "01787654321");
        set.toggle("Rocket", "01787654321");
        assert_eq!(set, before);

        set.toggle("bKash", "01712345678");
        set.toggle("bKash", "01712345678");
        // Re-adding moves the pair to the end; membership is unchanged
        assert_eq!(set.count(), before.count());
        assert!(before.iter().all(|s| set.is_selected(&s.provider, &s.account)));
    }

    #[test]
    fn test_same_account_under_different_providers_is_distinct() {
        let mut set = SelectionSet::new();
        set.toggle("bKash", "01712345678");
        set.toggle("Nagad", "01712345678");

        assert_eq!(set.count(), 2);
        assert!(!set.is_selected("Rocket", "01712345678"));
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut set = SelectionSet::new();
        set.toggle("Bank", "1234567890");
        set.toggle("bKash", "01787654321");
        set.toggle("Nagad", "01712345678");

        let order: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(
            order,
            vec!["Bank:1234567890", "bKash:01787654321", "Nagad:01712345678"]
        );
    }
}
