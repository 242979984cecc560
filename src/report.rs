//! Writing the name index

use crate::matcher::OccurrenceMap;
use crate::names::SearchName;
use std::io::{self, Write};

/// Formatting options for the index output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Text between a name and its page list (default: `" : "`)
    pub separator: String,
    /// Text between two page numbers (default: `", "`)
    pub pages_separator: String,
    /// Text in front of every page number (default: empty)
    pub page_prefix: String,
    /// Added to every printed page number; the first PDF page is page 1
    pub page_offset: i64,
    /// Write `<name><separator>` for names that were never found
    pub print_unfound: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            separator: " : ".to_string(),
            pages_separator: ", ".to_string(),
            page_prefix: String::new(),
            page_offset: 0,
            print_unfound: false,
        }
    }
}

/// Format a page list as it appears after the separator
pub fn format_pages(pages: &[u32], options: &ReportOptions) -> String {
    pages
        .iter()
        .map(|&page| {
            format!(
                "{}{}",
                options.page_prefix,
                i64::from(page) + options.page_offset
            )
        })
        .collect::<Vec<_>>()
        .join(&options.pages_separator)
}

/// Write one line per found name, in the order of `names`
///
/// Returns the names that have no occurrence. They are only written to `out`
/// when `print_unfound` is set.
pub fn write_report<W: Write>(
    out: &mut W,
    names: &[SearchName],
    occurrences: &OccurrenceMap,
    options: &ReportOptions,
) -> io::Result<Vec<String>> {
    let mut not_found = Vec::new();

    for name in names {
        let pages = occurrences.pages(&name.display);
        if pages.is_empty() {
            if options.print_unfound {
                writeln!(out, "{}{}", name.display, options.separator)?;
            }
            not_found.push(name.display.clone());
            continue;
        }

        writeln!(
            out,
            "{}{}{}",
            name.display,
            options.separator,
            format_pages(pages, options)
        )?;
    }

    Ok(not_found)
}
