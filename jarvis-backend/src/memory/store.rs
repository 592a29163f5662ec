use chrono::{Local, NaiveDateTime, Timelike};
use parking_lot::Mutex;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Blob value when no memories exist
pub const EMPTY_MEMORY: &str = "No memories stored yet.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A single remembered fact, stamped to the minute in local time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub timestamp: NaiveDateTime,
    pub body: String,
}

impl MemoryEntry {
    /// Create an entry stamped with the current local time.
    ///
    /// Line breaks in the body become spaces so one entry is always one line of the log.
    pub fn now(body: &str) -> Self {
        let now = Local::now().naive_local();
        let timestamp = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);
        Self {
            timestamp,
            body: body.replace("\r\n", " ").replace(['\r', '\n'], " "),
        }
    }
}

impl fmt::Display for MemoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format(TIMESTAMP_FORMAT), self.body)
    }
}

/// Append-only memory log backed by a text file.
///
/// The in-memory blob always mirrors the file after a successful write. The file
/// write and the blob update happen under one lock so remember and forget never interleave.
pub struct MemoryStore {
    path: PathBuf,
    blob: Mutex<String>,
}

impl MemoryStore {
    /// Open the store at `path`, loading whatever the log already holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let blob = Self::load(&path);
        log::info!(
            "Memory store at {} loaded with {} entries",
            path.display(),
            count_entries(&blob)
        );
        Self {
            path,
            blob: Mutex::new(blob),
        }
    }

    /// Read the log into a blob. Never fails: any read error degrades to [`EMPTY_MEMORY`].
    pub fn load(path: &Path) -> String {
        if !path.exists() {
            return EMPTY_MEMORY.to_string();
        }

        match fs::read_to_string(path) {
            Ok(content) => {
                let content = content.trim();
                if content.is_empty() {
                    EMPTY_MEMORY.to_string()
                } else {
                    content.to_string()
                }
            }
            Err(e) => {
                log::error!("Error loading memory from {}: {}", path.display(), e);
                EMPTY_MEMORY.to_string()
            }
        }
    }

    /// Current blob, or [`EMPTY_MEMORY`]
    pub fn snapshot(&self) -> String {
        self.blob.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        *self.blob.lock() == EMPTY_MEMORY
    }

    pub fn entry_count(&self) -> usize {
        count_entries(&self.blob.lock())
    }

    /// Stamp `body`, persist it, then fold it into the blob.
    ///
    /// Nothing in memory changes unless the line reached the file.
    pub fn append(&self, body: &str) -> io::Result<MemoryEntry> {
        let mut blob = self.blob.lock();

        // Stamped under the lock so the log stays in time order
        let entry = MemoryEntry::now(body);
        let line = entry.to_string();

        self.write_line(&line).map_err(|e| {
            log::error!("Error saving memory to {}: {}", self.path.display(), e);
            e
        })?;

        if *blob == EMPTY_MEMORY {
            *blob = line;
        } else {
            blob.push('\n');
            blob.push_str(&line);
        }

        log::info!("Memory saved: {}", entry.body);
        Ok(entry)
    }

    /// Append `line` as its own line of the log.
    ///
    /// A log whose last line lacks its newline gets one first. A failed write is
    /// truncated back to the previous length so no fragment is left behind.
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let len = file.metadata()?.len();
        let mut record = String::with_capacity(line.len() + 2);
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::Start(len - 1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                record.push('\n');
            }
        }
        record.push_str(line);
        record.push('\n');

        if let Err(e) = file.write_all(record.as_bytes()).and_then(|_| file.flush()) {
            if let Err(truncate_err) = file.set_len(len) {
                log::error!(
                    "Failed to roll back partial memory write at {}: {}",
                    self.path.display(),
                    truncate_err
                );
            }
            return Err(e);
        }
        Ok(())
    }

    /// Delete the log and reset the blob. An already missing log is not an error.
    pub fn clear(&self) -> io::Result<()> {
        let mut blob = self.blob.lock();

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                log::error!("Error clearing memory at {}: {}", self.path.display(), e);
                return Err(e);
            }
        }

        *blob = EMPTY_MEMORY.to_string();
        log::info!("Memory cleared");
        Ok(())
    }
}

fn count_entries(blob: &str) -> usize {
    if blob == EMPTY_MEMORY {
        0
    } else {
        blob.lines().count()
    }
}
