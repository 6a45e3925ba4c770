use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One unit of analysis work, read from a line of the input list.
///
/// The identifier is opaque to the coordinator and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem(String);

impl WorkItem {
    /// Build a work item from a raw input line.
    ///
    /// Surrounding whitespace is trimmed; blank lines yield `None`.
    pub fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the identifier as `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Categorical dimension multiplying every work item into independent jobs
/// (a data-collection year in the default setup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CohortVariant(u32);

impl CohortVariant {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl FromStr for CohortVariant {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ModelError::InvalidVariant(s.to_string()))
    }
}

impl fmt::Display for CohortVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
