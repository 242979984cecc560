//! Page index of names in a PDF document
//!
//! This crate provides:
//! - Lazy per-page text extraction from PDF documents
//! - Whole-word matching of a names list against every page, including names
//!   broken over a page break
//! - A plain-text index of the pages each name occurs on

pub mod diagnostics;
pub mod extractor;
pub mod matcher;
pub mod names;
pub mod normalize;
pub mod pages;
pub mod report;

pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use extractor::{PageText, PageTexts, PdfDocument};
pub use matcher::{OccurrenceMap, PageMatcher};
pub use names::{load_names, LoadedNames, NamePattern, SearchName};
pub use normalize::{flatten_text, normalize_text, simplify_text};
pub use pages::{PageRange, PageSpecError, PagesIncluded};
pub use report::{format_pages, write_report, ReportOptions};

use std::io::Write;

/// Options for an indexing run
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Sort names by their display string instead of keeping the file order
    pub sort: bool,
    /// Ignore case when matching and when detecting duplicate names
    pub case_insensitive: bool,
    /// Pages to scan (default: all)
    pub pages_included: PagesIncluded,
    /// Output formatting
    pub report: ReportOptions,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            sort: true,
            case_insensitive: true,
            pages_included: PagesIncluded::all(),
            report: ReportOptions::default(),
        }
    }
}

/// Outcome of an indexing run
#[derive(Debug, Clone, Default)]
pub struct IndexSummary {
    /// Number of unique names searched for
    pub names: usize,
    /// Duplicate entries dropped from the names list
    pub duplicates: Vec<String>,
    /// Number of pages that were scanned
    pub pages_scanned: u32,
    /// Number of (name, page) occurrences found
    pub occurrences: usize,
    /// Names that were not found on any page
    pub not_found: Vec<String>,
}

/// Index the pages of `document` on which each name of `names_text` occurs
///
/// `names_text` holds one name per line. The whole document is scanned before
/// anything is written to `out`, so an extraction error leaves `out` untouched.
pub fn index_names<W: Write>(
    document: &PdfDocument,
    names_text: &str,
    out: &mut W,
    options: &IndexOptions,
    diagnostics: &mut dyn Diagnostics,
) -> Result<IndexSummary, IndexError> {
    let loaded = load_names(names_text.lines(), options.sort, options.case_insensitive);
    diagnostics.names_loaded(loaded.names.len());
    if !loaded.duplicates.is_empty() {
        diagnostics.duplicate_names(&loaded.duplicates);
    }

    let matcher = PageMatcher::new(&loaded.names, options.case_insensitive)?;
    let mut pages_scanned = 0;
    let pages = document
        .pages(&options.pages_included)
        .inspect(|page| {
            if page.is_ok() {
                pages_scanned += 1;
            }
        });
    let occurrences = matcher.scan(pages, diagnostics)?;

    diagnostics.writing_report();
    let not_found = write_report(out, &loaded.names, &occurrences, &options.report)?;
    if !options.report.print_unfound && !not_found.is_empty() {
        diagnostics.names_not_found(&not_found);
    }

    Ok(IndexSummary {
        names: loaded.names.len(),
        duplicates: loaded.duplicates,
        pages_scanned,
        occurrences: occurrences.total(),
        not_found,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("PDF is encrypted and the password is missing or wrong")]
    Encrypted,
    #[error("PDF permissions do not allow text extraction")]
    ExtractionNotAllowed,
    #[error("invalid pages spec: {0}")]
    PageSpec(#[from] PageSpecError),
    #[error("invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<lopdf::Error> for IndexError {
    fn from(e: lopdf::Error) -> Self {
        IndexError::Parse(e.to_string())
    }
}
