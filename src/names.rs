//! Loading the names list and building their search patterns

use crate::normalize::normalize_text;
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeSet, HashSet};

/// A name to search for, as read from the names list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchName {
    /// Normalized name as it appears in the report
    pub display: String,
    /// Key used to detect duplicates (lower-cased when matching ignores case)
    pub key: String,
}

impl SearchName {
    pub fn new(display: impl Into<String>, case_insensitive: bool) -> Self {
        let display = display.into();
        let key = if case_insensitive {
            display.to_lowercase()
        } else {
            display.clone()
        };
        Self { display, key }
    }
}

/// Result of reading a names list
#[derive(Debug, Clone, Default)]
pub struct LoadedNames {
    /// Unique names, in report order
    pub names: Vec<SearchName>,
    /// Entries whose key was already taken, sorted and without repeats
    pub duplicates: Vec<String>,
}

/// Read one name per line, skipping blanks and dropping duplicates
///
/// The first occurrence of a key wins; later ones only end up in
/// `duplicates`. With `sort` the names are ordered by their display string,
/// otherwise the input order is kept.
pub fn load_names<I, S>(lines: I, sort: bool, case_insensitive: bool) -> LoadedNames
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names = Vec::new();
    let mut seen = HashSet::new();
    let mut duplicates = BTreeSet::new();

    for line in lines {
        let name = normalize_text(line.as_ref().trim());
        if name.is_empty() {
            continue;
        }

        let name = SearchName::new(name, case_insensitive);
        if !seen.insert(name.key.clone()) {
            duplicates.insert(name.display);
            continue;
        }
        names.push(name);
    }

    if sort {
        names.sort_by(|a, b| a.display.cmp(&b.display));
    }

    LoadedNames {
        names,
        duplicates: duplicates.into_iter().collect(),
    }
}

/// Whole-word literal matcher for a single name
#[derive(Debug, Clone)]
pub struct NamePattern {
    name: String,
    regex: Regex,
}

impl NamePattern {
    /// Build `\b<name>\b` with the name escaped
    pub fn new(name: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(name)))
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            name: name.to_string(),
            regex,
        })
    }

    /// Display name this pattern searches for
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}
