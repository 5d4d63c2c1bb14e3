//! Schedule Repository
//!
//! Schedules are numbered files under `schedules/`. A new schedule takes the
//! number after the current entry count; taken numbers are skipped, never
//! overwritten.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

use rundb_core::Document;
use rundb_core::domain::schedule::Schedule;

use crate::db::FileRunDb;
use crate::error::{Result, StoreError};
use crate::query::Mask;

impl FileRunDb {
    /// Store a schedule and return the id it was assigned
    pub fn store_schedule(&self, schedule: &impl Document) -> Result<u64> {
        let dir = self.paths().schedules_dir();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
        let mut id = entries.count() as u64 + 1;

        let data = self.dumps(schedule)?;
        let ext = self.ext()?;
        loop {
            let path = self.paths().schedule_file(id, ext);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(data.as_bytes())
                        .map_err(|e| StoreError::io(&path, e))?;
                    tracing::debug!("Stored schedule {}", id);
                    return Ok(id);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => id += 1,
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        }
    }

    /// Every stored schedule, decoded lazily in file-name order
    pub fn list_schedules(&self) -> Result<impl Iterator<Item = Schedule>> {
        Ok(self.list_schedule_entries()?.map(|(_, schedule)| schedule))
    }

    /// Like `list_schedules`, paired with the id each schedule is stored under
    ///
    /// The id is the file stem; a file not named by a number has no id.
    pub fn list_schedule_entries(&self) -> Result<impl Iterator<Item = (Option<u64>, Schedule)>> {
        let scan = self.scan(self.paths().schedules_dir(), Mask::Children)?;
        Ok(scan.into_iter().map(|(record, path)| {
            let id = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse().ok());
            (id, Schedule::from(record))
        }))
    }
}
