//! Log Repository
//!
//! Raw execution logs of runs, one file per uid (iterations share it).

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

use crate::db::FileRunDb;
use crate::error::{Result, StoreError};

/// Bytes returned by `get_log` when no size is given
pub const DEFAULT_LOG_CHUNK: usize = 1 << 18;

impl FileRunDb {
    /// Write or append raw bytes to a run's log
    pub fn store_log(
        &self,
        uid: &str,
        project: Option<&str>,
        body: &[u8],
        append: bool,
    ) -> Result<()> {
        let path = self.paths().log_file(project, uid);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)
            .map_err(|e| StoreError::io(&path, e))?;
        file.write_all(body).map_err(|e| StoreError::io(&path, e))?;

        tracing::debug!("Wrote {} log bytes for run {}", body.len(), uid);

        Ok(())
    }

    /// Read up to `size` bytes of a run's log starting at `offset`
    ///
    /// Returns `None` when the run has no log. A zero `size` reads
    /// `DEFAULT_LOG_CHUNK` bytes.
    pub fn get_log(
        &self,
        uid: &str,
        project: Option<&str>,
        offset: u64,
        size: usize,
    ) -> Result<Option<Vec<u8>>> {
        let path = self.paths().log_file(project, uid);
        if !path.is_file() {
            return Ok(None);
        }

        let mut file = File::open(&path).map_err(|e| StoreError::io(&path, e))?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset))
                .map_err(|e| StoreError::io(&path, e))?;
        }

        let size = if size == 0 { DEFAULT_LOG_CHUNK } else { size };
        let mut body = Vec::new();
        file.take(size as u64)
            .read_to_end(&mut body)
            .map_err(|e| StoreError::io(&path, e))?;

        Ok(Some(body))
    }
}
