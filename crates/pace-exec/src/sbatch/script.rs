use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{trace, warn};

/// Description file on disk, removed when dropped.
#[derive(Debug)]
pub(crate) struct ScriptFile {
    path: PathBuf,
}

impl ScriptFile {
    /// Write `contents` to `path`.
    ///
    /// Nothing is left behind if the write fails half-way.
    pub(crate) async fn write(path: PathBuf, contents: &str) -> io::Result<Self> {
        let file = Self { path };
        tokio::fs::write(&file.path, contents).await?;
        trace!(path = %file.path.display(), bytes = contents.len(), "description written");
        Ok(file)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => trace!(path = %self.path.display(), "description removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove description"),
        }
    }
}
