//! Driver: folds rows from one or more delimited files into a finished
//! [`Report`](crate::profile::Report).
//!
//! Each file is profiled into its own shard accumulator and the shards are
//! merged afterwards. Because profile merging is associative and commutative,
//! this is equivalent to feeding every row through a single accumulator, and
//! callers that want parallel scans can profile files on separate threads and
//! merge at the end.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    io_utils,
    profile::{ProfileAccumulator, Report},
};

#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
    /// Delimiter shared by all inputs; resolved per file extension if `None`.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    /// Maximum rows to scan per file (0 = all).
    pub limit: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
            limit: 0,
        }
    }
}

/// Scans every record of the given files and returns the finished report.
pub fn analyze(paths: &[PathBuf], options: &AnalyzeOptions) -> Result<Report> {
    let mut combined = ProfileAccumulator::default();
    for path in paths {
        let shard = profile_file(path, options)
            .with_context(|| format!("Profiling input file {path:?}"))?;
        combined
            .merge(shard)
            .with_context(|| format!("Merging profile for {path:?}"))?;
    }
    info!(
        "Profiled {} field(s) across {} input file(s)",
        combined.field_count(),
        paths.len()
    );
    Ok(combined.finish())
}

/// Profiles a single file into its own accumulator (one shard).
///
/// The first record supplies the field names; every following record is folded
/// in. Rows shorter than the header leave the trailing fields unobserved for
/// that row.
pub fn profile_file(path: &Path, options: &AnalyzeOptions) -> Result<ProfileAccumulator> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    debug!(
        "Reading {:?} with delimiter '{}'",
        path,
        crate::printable_delimiter(delimiter)
    );
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, options.encoding)?;

    let mut profile = ProfileAccumulator::default();
    let mut record = csv::ByteRecord::new();
    let mut rows = 0usize;
    while reader.read_byte_record(&mut record)? {
        if options.limit > 0 && rows >= options.limit {
            break;
        }
        let decoded = io_utils::decode_record(&record, options.encoding)
            .with_context(|| format!("Decoding row {}", rows + 2))?;
        let pairs = headers
            .iter()
            .map(String::as_str)
            .zip(decoded.iter().map(String::as_str));
        profile
            .ingest_row(pairs)
            .with_context(|| format!("Processing row {}", rows + 2))?;
        rows += 1;
    }
    info!("Profiled {} row(s) from {:?}", rows, path);
    Ok(profile)
}
