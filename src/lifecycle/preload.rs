//! Ordered list of files executed during the preload phase.
//!
//! # Design Decisions
//! - Anchors match with or without the `.rs` suffix
//! - Only the first matching entry anchors an insert
//! - A missing anchor appends instead of failing

use std::fmt;

use crate::modules::strip_source_extension;

/// Preload files every application starts with, and whether they are optional.
pub const DEFAULT_PRELOADS: &[(&str, bool)] = &[
    ("start/routes", false),
    ("start/events", true),
    ("start/socket", true),
    ("start/kernel", true),
    ("database/factory", true),
];

/// One file the ignitor attempts to load during preloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadEntry {
    /// Path relative to the application root.
    pub path: String,
    /// Absence is tolerated when set.
    pub optional: bool,
}

impl PreloadEntry {
    pub fn required(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            optional: false,
        }
    }

    pub fn optional(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            optional: true,
        }
    }

    /// Whether this entry is addressed by `anchor`.
    pub fn matches(&self, anchor: &str) -> bool {
        self.path == anchor || strip_source_extension(&self.path) == strip_source_extension(anchor)
    }
}

impl fmt::Display for PreloadEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{} (optional)", self.path)
        } else {
            f.write_str(&self.path)
        }
    }
}

/// Ordered, mutable sequence of preload entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadList {
    entries: Vec<PreloadEntry>,
}

impl Default for PreloadList {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PRELOADS
                .iter()
                .map(|(path, optional)| PreloadEntry {
                    path: path.to_string(),
                    optional: *optional,
                })
                .collect(),
        }
    }
}

impl PreloadList {
    /// The default list.
    pub fn new() -> Self {
        Self::default()
    }

    /// A list with no entries.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a required entry at the end.
    pub fn append(&mut self, path: impl Into<String>) -> &mut Self {
        self.entries.push(PreloadEntry::required(path));
        self
    }

    /// Insert a required entry right after `anchor`, or append when absent.
    pub fn insert_after(&mut self, anchor: &str, path: impl Into<String>) -> &mut Self {
        match self.position(anchor) {
            Some(index) => self.entries.insert(index + 1, PreloadEntry::required(path)),
            None => self.entries.push(PreloadEntry::required(path)),
        }
        self
    }

    /// Insert a required entry right before `anchor`, or append when absent.
    pub fn insert_before(&mut self, anchor: &str, path: impl Into<String>) -> &mut Self {
        match self.position(anchor) {
            Some(index) => self.entries.insert(index, PreloadEntry::required(path)),
            None => self.entries.push(PreloadEntry::required(path)),
        }
        self
    }

    /// Index of the first entry matching `anchor`.
    pub fn position(&self, anchor: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.matches(anchor))
    }

    pub fn entries(&self) -> &[PreloadEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreloadEntry> {
        self.entries.iter()
    }

    /// Entry paths in order.
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PreloadList {
    type Item = &'a PreloadEntry;
    type IntoIter = std::slice::Iter<'a, PreloadEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let list = PreloadList::new();
        assert_eq!(
            list.paths(),
            vec![
                "start/routes",
                "start/events",
                "start/socket",
                "start/kernel",
                "database/factory"
            ]
        );
        assert!(!list.entries()[0].optional);
        assert!(list.entries()[1..].iter().all(|e| e.optional));
    }

    #[test]
    fn test_append_is_required() {
        let mut list = PreloadList::new();
        list.append("start/validators");
        let last = list.entries().last().unwrap();
        assert_eq!(last, &PreloadEntry::required("start/validators"));
    }

    #[test]
    fn test_insert_after_present_anchor() {
        let mut list = PreloadList::new();
        list.insert_after("start/kernel", "start/custom");
        let kernel = list.position("start/kernel").unwrap();
        assert_eq!(list.entries()[kernel + 1], PreloadEntry::required("start/custom"));
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_insert_after_missing_anchor_appends() {
        let mut list = PreloadList::new();
        list.insert_after("does/not/exist", "start/custom");
        assert_eq!(list.paths().last(), Some(&"start/custom"));
    }

    #[test]
    fn test_insert_before_present_anchor() {
        let mut list = PreloadList::new();
        list.insert_before("start/routes", "start/custom");
        assert_eq!(&list.paths()[..2], &["start/custom", "start/routes"]);
    }

    #[test]
    fn test_insert_before_missing_anchor_appends() {
        let mut list = PreloadList::new();
        list.insert_before("does/not/exist", "start/custom");
        assert_eq!(list.paths().last(), Some(&"start/custom"));
    }

    #[test]
    fn test_anchor_matches_with_or_without_extension() {
        let mut with_ext = PreloadList::new();
        with_ext.insert_after("start/kernel.rs", "start/custom");

        let mut without_ext = PreloadList::new();
        without_ext.insert_after("start/kernel", "start/custom");

        assert_eq!(with_ext, without_ext);
        assert_eq!(with_ext.position("start/kernel.rs"), with_ext.position("start/kernel"));
    }

    #[test]
    fn test_stored_extension_matches_bare_anchor() {
        let mut list = PreloadList::empty();
        list.append("start/views.rs").insert_before("start/views", "start/globals");
        assert_eq!(list.paths(), vec!["start/globals", "start/views.rs"]);
    }

    #[test]
    fn test_first_duplicate_anchors() {
        let mut list = PreloadList::empty();
        list.append("start/a").append("start/b").append("start/a");
        list.insert_after("start/a", "start/x");
        assert_eq!(list.paths(), vec!["start/a", "start/x", "start/b", "start/a"]);
    }
}
