//! Restricting the pages that get scanned
//!
//! A spec is a comma separated list of page numbers and inclusive ranges,
//! e.g. `1,11..79,400..450`. An empty spec includes every page.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageSpecError {
    #[error("empty entry in pages spec")]
    EmptyEntry,
    #[error("invalid page number: {0:?}")]
    InvalidNumber(String),
    #[error("reversed page range: {start}..{end}")]
    ReversedRange { start: u32, end: u32 },
}

/// Inclusive range of page numbers; a single page has `start == end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn contains(&self, page: u32) -> bool {
        self.start <= page && page <= self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

/// Set of page numbers to scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagesIncluded {
    ranges: Vec<PageRange>,
}

impl PagesIncluded {
    /// Every page is included
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_all(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[PageRange] {
        &self.ranges
    }

    pub fn contains(&self, page: u32) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|r| r.contains(page))
    }
}

impl FromStr for PagesIncluded {
    type Err = PageSpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        if spec.trim().is_empty() {
            return Ok(Self::all());
        }

        let ranges = spec
            .split(',')
            .map(parse_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ranges })
    }
}

impl fmt::Display for PagesIncluded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", range)?;
        }
        Ok(())
    }
}

fn parse_entry(entry: &str) -> Result<PageRange, PageSpecError> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(PageSpecError::EmptyEntry);
    }

    match entry.split_once("..") {
        Some((start, end)) => {
            let start = parse_page(start)?;
            let end = parse_page(end)?;
            if start > end {
                return Err(PageSpecError::ReversedRange { start, end });
            }
            Ok(PageRange { start, end })
        }
        None => {
            let page = parse_page(entry)?;
            Ok(PageRange {
                start: page,
                end: page,
            })
        }
    }
}

fn parse_page(text: &str) -> Result<u32, PageSpecError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| PageSpecError::InvalidNumber(text.to_string()))
}
