//! JSON report of verified instances
//!
//! The report file is overwritten on every run and looks like:
//!
//! ```json
//! {
//!   "reliable": [
//!     { "version": "1.7.1", "address": "https://a.example", "uptime": 99.5 }
//!   ],
//!   "low_uptime": [],
//!   "unreliable": []
//! }
//! ```

use crate::output::{OutputError, OutputResult};
use crate::state::{Category, Instance};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Verified instances grouped by category
///
/// Order inside a bucket follows arrival order from the workers and carries
/// no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub reliable: Vec<Instance>,
    pub low_uptime: Vec<Instance>,
    pub unreliable: Vec<Instance>,
}

impl Report {
    /// Appends an instance to the bucket for `category`
    pub fn push(&mut self, category: Category, instance: Instance) {
        self.bucket_mut(category).push(instance);
    }

    pub fn bucket(&self, category: Category) -> &[Instance] {
        match category {
            Category::Reliable => &self.reliable,
            Category::LowUptime => &self.low_uptime,
            Category::Unreliable => &self.unreliable,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<Instance> {
        match category {
            Category::Reliable => &mut self.reliable,
            Category::LowUptime => &mut self.low_uptime,
            Category::Unreliable => &mut self.unreliable,
        }
    }

    /// Total number of instances across all buckets
    pub fn len(&self) -> usize {
        self.reliable.len() + self.low_uptime.len() + self.unreliable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes the report as indented JSON, replacing any existing file
///
/// # Arguments
///
/// * `report` - The report to write
/// * `output_path` - Path of the JSON file
///
/// # Returns
///
/// * `Ok(())` - Report written and flushed
/// * `Err(OutputError)` - The file could not be created or written
pub fn write_report(report: &Report, output_path: &Path) -> OutputResult<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer
        .into_inner()
        .map_err(|e| OutputError::Io(e.into_error()))?
        .sync_all()?;

    Ok(())
}

/// Reads a report previously written by [`write_report`]
pub fn read_report(path: &Path) -> OutputResult<Report> {
    let file = File::open(path)?;
    let report = serde_json::from_reader(BufReader::new(file))?;
    Ok(report)
}
