//! Save/Load of the crew directory and schedule store.
//!
//! Uses bincode for a compact binary snapshot of every crew record and
//! every stored week. The snapshot carries a format version and is
//! rejected on mismatch.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use divecrew_logic::calendar::WeekAnchor;
use divecrew_logic::crew::CrewMember;
use divecrew_logic::schedule::WeekSchedule;
use serde::{Deserialize, Serialize};

use crate::directory::MemoryDirectory;
use crate::error::StoreError;
use crate::schedule_store::MemoryScheduleStore;

/// Version number for the snapshot format (increment when format changes)
const SNAPSHOT_VERSION: u32 = 1;

/// Serializable snapshot of both collaborators
#[derive(Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// All crew, including deactivated records
    pub crew: Vec<CrewMember>,
    /// Every stored week with its slots
    pub weeks: Vec<(WeekAnchor, WeekSchedule)>,
}

impl Snapshot {
    pub fn capture(directory: &MemoryDirectory, store: &MemoryScheduleStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            crew: directory.all().cloned().collect(),
            weeks: store.iter().map(|(w, s)| (*w, s.clone())).collect(),
        }
    }

    /// Rebuild the collaborators; crew records are validated on the way in.
    pub fn restore(self) -> Result<(MemoryDirectory, MemoryScheduleStore), StoreError> {
        let directory = MemoryDirectory::with_crew(self.crew)?;
        let store = MemoryScheduleStore::with_weeks(self.weeks);
        Ok((directory, store))
    }
}

/// Write a snapshot of the directory and store
pub fn save_snapshot<W: Write>(
    writer: W,
    directory: &MemoryDirectory,
    store: &MemoryScheduleStore,
) -> Result<(), StoreError> {
    let snapshot = Snapshot::capture(directory, store);
    bincode::serialize_into(writer, &snapshot)?;
    log::info!(
        "saved snapshot: {} crew, {} weeks",
        snapshot.crew.len(),
        snapshot.weeks.len()
    );
    Ok(())
}

/// Read a snapshot back into fresh collaborators
pub fn load_snapshot<R: Read>(
    reader: R,
) -> Result<(MemoryDirectory, MemoryScheduleStore), StoreError> {
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }

    snapshot.restore()
}

pub fn save_snapshot_file(
    path: &Path,
    directory: &MemoryDirectory,
    store: &MemoryScheduleStore,
) -> Result<(), StoreError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    save_snapshot(&mut writer, directory, store)?;
    writer.flush()?;
    Ok(())
}

pub fn load_snapshot_file(
    path: &Path,
) -> Result<(MemoryDirectory, MemoryScheduleStore), StoreError> {
    let file = File::open(path)?;
    load_snapshot(BufReader::new(file))
}
