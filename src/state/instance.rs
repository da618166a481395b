//! A PrivateBin deployment as listed in the directory

use serde::{Deserialize, Serialize};

/// One candidate instance taken from the directory table
///
/// The uptime is the percentage the directory publishes, not something this
/// crate measures. Duplicates in the directory are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// PrivateBin version label from the section heading (e.g. "1.7.1")
    pub version: String,

    /// Base URL of the instance
    pub address: String,

    /// Disclosed uptime percentage
    pub uptime: f64,
}

impl Instance {
    pub fn new(version: impl Into<String>, address: impl Into<String>, uptime: f64) -> Self {
        Self {
            version: version.into(),
            address: address.into(),
            uptime,
        }
    }
}
