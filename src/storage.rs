use crate::snapshot::Snapshot;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Default location of the snapshot file, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "data/state.json";

/// Abstract snapshot persistence interface
pub trait SnapshotStorage {
    /// Return the stored snapshot. A missing or unreadable snapshot yields an
    /// empty one; this never fails.
    fn load(&self) -> Snapshot;
    /// Replace the stored snapshot
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// File-based snapshot persistence implementation
pub struct FileSnapshotStorage {
    path: PathBuf,
}

impl FileSnapshotStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSnapshotStorage { path: path.into() }
    }

    fn read(&self) -> Result<Snapshot> {
        let content = fs::read(&self.path).context("Failed to read state file")?;
        serde_json::from_slice(&content).context("Failed to parse state file")
    }
}

impl SnapshotStorage for FileSnapshotStorage {
    fn load(&self) -> Snapshot {
        match self.read() {
            Ok(snapshot) => {
                tracing::debug!(path = %self.path.display(), ?snapshot, "Loaded state file");
                snapshot
            }
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == ErrorKind::NotFound) =>
            {
                tracing::info!(
                    path = %self.path.display(),
                    "No state file yet, starting from an empty snapshot"
                );
                Snapshot::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Ignoring state file: {e:#}"
                );
                Snapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }
        let mut json =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        json.push('\n');
        let mut file = File::create(&self.path).context("Failed to open state file for writing")?;
        file.write_all(json.as_bytes())
            .context("Failed to write snapshot to state file")?;
        Ok(())
    }
}
