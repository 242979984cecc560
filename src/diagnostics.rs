//! Progress and warning reporting for an indexing run
//!
//! The indexing code never prints. It reports to a [`Diagnostics`] sink, which
//! the binary backs with the `log` facade and tests back with a recorder.

use log::{info, warn};

/// Receiver for progress and data-quality messages
///
/// Every method has a no-op default so a sink only implements what it needs.
pub trait Diagnostics {
    /// Number of unique names that will be searched for
    fn names_loaded(&mut self, _count: usize) {}

    /// Names-list entries that were dropped as duplicates
    fn duplicate_names(&mut self, _duplicates: &[String]) {}

    /// A page is about to be matched
    fn page_scanned(&mut self, _page: u32) {}

    /// Total (name, page) occurrences recorded once the scan is done
    fn occurrences_found(&mut self, _total: usize) {}

    fn writing_report(&mut self) {}

    /// Names without any occurrence that were left out of the report
    fn names_not_found(&mut self, _names: &[String]) {}
}

/// Sink that discards everything
impl Diagnostics for () {}

/// Sink that forwards to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn names_loaded(&mut self, count: usize) {
        info!("Found {} names", count);
    }

    fn duplicate_names(&mut self, duplicates: &[String]) {
        warn!("Some names are not unique: {}", duplicates.join(", "));
    }

    fn page_scanned(&mut self, page: u32) {
        info!("Parsing page {}...", page);
    }

    fn occurrences_found(&mut self, total: usize) {
        info!(
            "Found a total of {} name occurrences (multiple occurrences of a name on the same page are ignored)",
            total
        );
    }

    fn writing_report(&mut self) {
        info!("Outputting results...");
    }

    fn names_not_found(&mut self, names: &[String]) {
        warn!(
            "Did not find any occurrences of the following names: {}",
            names.join(", ")
        );
    }
}
