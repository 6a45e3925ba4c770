//! Work-item list loading.
use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

use pace_model::WorkItem;

/// Chunk size for the newline pre-scan.
const SCAN_CHUNK: usize = 1024 * 1024;

#[derive(Debug, Error)]
#[error("failed to read work items from {}: {source}", path.display())]
pub struct SourceReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Ordered work items, loaded once and owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct WorkItems {
    items: Vec<WorkItem>,
    expected_total: usize,
}

impl WorkItems {
    /// Load a newline-delimited list.
    ///
    /// `expected_total` is the raw newline count of the file, as used for progress; it ignores blank-line
    /// filtering and misses a final line without trailing newline.
    #[instrument(level = "debug", fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, SourceReadError> {
        let read_err = |source: io::Error| SourceReadError {
            path: path.to_path_buf(),
            source,
        };

        let expected_total = count_newlines(path).await.map_err(read_err)?;
        let text = tokio::fs::read_to_string(path).await.map_err(read_err)?;
        let items: Vec<WorkItem> = text.lines().filter_map(WorkItem::from_line).collect();

        debug!(items = items.len(), expected_total, "work items loaded");
        Ok(Self {
            items,
            expected_total,
        })
    }

    /// Build from in-memory items; the expected total is the exact count.
    pub fn from_items(items: Vec<WorkItem>) -> Self {
        let expected_total = items.len();
        Self {
            items,
            expected_total,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn expected_total(&self) -> usize {
        self.expected_total
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a WorkItems {
    type Item = &'a WorkItem;
    type IntoIter = std::slice::Iter<'a, WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Count `\n` bytes, reading the file in fixed-size chunks.
pub async fn count_newlines(path: &Path) -> io::Result<usize> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut buf = vec![0u8; SCAN_CHUNK];
    let mut lines = 0;
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        lines += buf[..n].iter().filter(|&&b| b == b'\n').count();
    }
    Ok(lines)
}
