//! Location normalization and conflict reporting.
//!
//! Session notes name places freely: multi-stop routes, `/` paths, stray
//! markers, inconsistent case. This module groups those mentions under
//! canonical names and reports what looks wrong.

/// Route splitting and decoration stripping.
pub mod normalize;
/// Locating mentions in their source files.
pub mod references;
/// Grouping mentions into report rows.
pub mod report;

pub use references::{FsSourceReader, ReferenceScanner, SourceReader};
pub use report::{
    build_location_report, EntityCrossRef, LocationReport, LocationReportRow, LocationReporter, SourceRef,
};
