//! Classification results for probed instances
//!
//! A probe either completes and yields a [`Disposition`], or fails and yields a
//! [`FetchError`]. The two never coexist on one outcome.

use crate::state::Instance;
use crate::FetchError;
use std::fmt;

/// The report bucket an instance belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Permanent storage, no deletion warnings, uptime at or above threshold
    Reliable,

    /// Permanent storage, no deletion warnings, uptime below threshold
    LowUptime,

    /// Permanent storage offered but the operator warns data may vanish
    Unreliable,
}

impl Category {
    /// Returns the report field name for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reliable => "reliable",
            Self::LowUptime => "low_uptime",
            Self::Unreliable => "unreliable",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for an instance whose page was fetched successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Goes into the named report bucket
    Report(Category),

    /// No "never" expiration option; left out of the report entirely
    Discard,
}

impl Disposition {
    pub const RELIABLE: Self = Self::Report(Category::Reliable);
    pub const LOW_UPTIME: Self = Self::Report(Category::LowUptime);
    pub const UNRELIABLE: Self = Self::Report(Category::Unreliable);

    /// Returns the report category, if this disposition is reportable
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Report(category) => Some(*category),
            Self::Discard => None,
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Report(category) => category.fmt(f),
            Self::Discard => f.write_str("discard"),
        }
    }
}

/// What a worker emits for one candidate
#[derive(Debug, Clone)]
pub struct Outcome {
    pub instance: Instance,
    pub result: Result<Disposition, FetchError>,
}

impl Outcome {
    pub fn classified(instance: Instance, disposition: Disposition) -> Self {
        Self {
            instance,
            result: Ok(disposition),
        }
    }

    pub fn failed(instance: Instance, error: FetchError) -> Self {
        Self {
            instance,
            result: Err(error),
        }
    }

    /// Returns true if the probe itself failed
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}
