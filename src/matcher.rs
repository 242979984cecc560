//! Matching names against page text
//!
//! Pages are consumed one at a time in increasing order. Besides the page on
//! its own, the text of the previous page joined with the current one is
//! checked so that a name broken over a page break is still found; such a hit
//! is attributed to the previous page, where the name starts.

use crate::diagnostics::Diagnostics;
use crate::extractor::PageText;
use crate::names::{NamePattern, SearchName};
use crate::normalize::normalize_text;
use std::collections::HashMap;

/// Pages on which each name was found
#[derive(Debug, Clone, Default)]
pub struct OccurrenceMap {
    pages: HashMap<String, Vec<u32>>,
    total: usize,
}

impl OccurrenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `page` for `name`; returns false if it was already the last page
    pub fn record(&mut self, name: &str, page: u32) -> bool {
        let pages = self.pages.entry(name.to_string()).or_default();
        if pages.last() == Some(&page) {
            return false;
        }
        pages.push(page);
        self.total += 1;
        true
    }

    /// Pages for `name` in ascending order, empty if never found
    pub fn pages(&self, name: &str) -> &[u32] {
        self.pages.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn last_page(&self, name: &str) -> Option<u32> {
        self.pages(name).last().copied()
    }

    /// Number of (name, page) pairs recorded
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Normalized text of the last scanned page
struct PreviousPage {
    number: u32,
    text: String,
}

/// Word-boundary matcher for a fixed set of names
#[derive(Debug, Clone)]
pub struct PageMatcher {
    patterns: Vec<NamePattern>,
}

impl PageMatcher {
    pub fn new(names: &[SearchName], case_insensitive: bool) -> Result<Self, regex::Error> {
        let patterns = names
            .iter()
            .map(|name| NamePattern::new(&name.display, case_insensitive))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Match every page of `pages` and collect where each name occurs
    ///
    /// The first error from `pages` aborts the scan and is returned as is.
    pub fn scan<I, E>(
        &self,
        pages: I,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<OccurrenceMap, E>
    where
        I: IntoIterator<Item = Result<PageText, E>>,
    {
        let mut occurrences = OccurrenceMap::new();
        let mut previous: Option<PreviousPage> = None;

        for page in pages {
            let page = page?;
            diagnostics.page_scanned(page.number);
            let text = normalize_text(&page.text);

            // Only physically adjacent pages are joined
            let adjacent = previous
                .as_ref()
                .filter(|prev| prev.number.checked_add(1) == Some(page.number));
            let joined = adjacent.map(|prev| format!("{}{}", prev.text, text));

            for pattern in &self.patterns {
                let name = pattern.name();
                if pattern.is_match(&text) {
                    occurrences.record(name, page.number);
                } else if let (Some(prev), Some(joined)) = (adjacent, joined.as_deref()) {
                    if occurrences.last_page(name) != Some(prev.number) && pattern.is_match(joined)
                    {
                        occurrences.record(name, prev.number);
                    }
                }
            }

            previous = Some(PreviousPage {
                number: page.number,
                text,
            });
        }

        diagnostics.occurrences_found(occurrences.total());
        Ok(occurrences)
    }
}
