//! On-disk format of the replay memory
//!
//! The memory is written as a single JSON document holding the capacity, the
//! insertion counter and every stored transition with its age, so eviction
//! order carries over to a reloaded memory.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::buffer::{Entry, MemoryError};

/// Current file format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    capacity: usize,
    next_age: u64,
    entries: &'a [Entry],
}

/// Replay memory contents as read from disk
#[derive(Debug, Deserialize)]
pub struct MemorySnapshot {
    pub version: u32,
    pub capacity: usize,
    pub next_age: u64,
    pub entries: Vec<Entry>,
}

/// Write a snapshot to `path`, creating parent directories if needed
pub fn save_snapshot(
    path: &Path,
    capacity: usize,
    next_age: u64,
    entries: &[Entry],
) -> Result<(), MemoryError> {
    let io_error = |source| MemoryError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let snapshot = SnapshotRef {
        version: FORMAT_VERSION,
        capacity,
        next_age,
        entries,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer(&mut writer, &snapshot).map_err(|source| MemoryError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)?;

    debug!(?path, transitions = entries.len(), capacity, "saved replay memory");
    Ok(())
}

/// Read and check a snapshot written by [`save_snapshot`]
pub fn load_snapshot(path: &Path) -> Result<MemorySnapshot, MemoryError> {
    let file = File::open(path).map_err(|source| MemoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let snapshot: MemorySnapshot = serde_json::from_reader(BufReader::new(file)).map_err(
        |source| MemoryError::Format {
            path: path.to_path_buf(),
            source,
        },
    )?;

    if snapshot.version != FORMAT_VERSION {
        return Err(MemoryError::UnsupportedVersion(snapshot.version));
    }
    if snapshot.capacity == 0 {
        return Err(MemoryError::ZeroCapacity);
    }
    if snapshot.entries.len() > snapshot.capacity {
        return Err(MemoryError::CapacityExceeded {
            len: snapshot.entries.len(),
            capacity: snapshot.capacity,
        });
    }

    // Pushes take `next_age` as the new age; eviction relies on ages being unique
    let mut ages = HashSet::with_capacity(snapshot.entries.len());
    let consistent = snapshot
        .entries
        .iter()
        .all(|entry| entry.age < snapshot.next_age && ages.insert(entry.age));
    if !consistent {
        return Err(MemoryError::InconsistentAges {
            next_age: snapshot.next_age,
        });
    }

    debug!(
        ?path,
        transitions = snapshot.entries.len(),
        capacity = snapshot.capacity,
        "loaded replay memory"
    );
    Ok(snapshot)
}
