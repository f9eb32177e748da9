//! Ordered, duplicate-free link collection

use std::collections::HashSet;

/// An ordered sequence of link targets with set semantics for membership
///
/// Insertion order is preserved from the first occurrence of each link;
/// inserting a link that is already present is a no-op.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    links: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a link unless it is already present
    ///
    /// Returns true if the link was newly inserted.
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.links.push(link);
        true
    }

    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.links.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }

    /// Keeps only the links for which `keep` returns true, preserving order
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        let seen = &mut self.seen;
        self.links.retain(|link| {
            let kept = keep(link);
            if !kept {
                seen.remove(link);
            }
            kept
        });
    }
}

impl PartialEq for LinkSet {
    fn eq(&self, other: &Self) -> bool {
        self.links == other.links
    }
}

impl Eq for LinkSet {}

impl<S: Into<String>> FromIterator<S> for LinkSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for LinkSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for link in iter {
            self.insert(link);
        }
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

impl IntoIterator for LinkSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}
