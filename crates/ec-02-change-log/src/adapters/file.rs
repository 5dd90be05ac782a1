//! # File-Backed Audit Log
//!
//! Entries are JSON lines appended to `audit.jsonl` and flushed with
//! `sync_data` before `record` returns. Retention and the id high-water mark
//! live in `audit.meta.json`, written atomically via a temp file.
//!
//! A torn final line (crash mid-append) is dropped on open; a bad line
//! anywhere else is reported as corruption.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::{Page, PageRequest};
use tracing::{debug, error, info, warn};

use crate::adapters::clock::SystemTimeSource;
use crate::domain::{
    AuditEntry, ChangeLogError, ChangeLogResult, Journal, NewAuditEntry, RetentionPolicy,
    MAX_RETENTION_DAYS,
};
use crate::ports::{AuditSink, TimeSource};

const LOG_FILE: &str = "audit.jsonl";
const META_FILE: &str = "audit.meta.json";

#[derive(Debug, Serialize, Deserialize)]
struct LogMeta {
    retention_days: u32,
    next_id: u64,
}

struct FileState {
    journal: Journal,
    file: File,
    /// Length to cut the file back to before the next append. Set when a
    /// failed append could not be rolled back.
    torn_at: Option<u64>,
}

impl FileState {
    /// Cut off a partial line left by an earlier failed append.
    fn heal(&mut self) -> ChangeLogResult<()> {
        if let Some(offset) = self.torn_at {
            self.file
                .set_len(offset)
                .map_err(|e| ChangeLogError::io("truncate partial audit line", e))?;
            self.torn_at = None;
            info!(offset, "Removed partial audit line");
        }
        Ok(())
    }
}

/// Durable append-only audit log.
pub struct FileAuditLog {
    state: Mutex<FileState>,
    dir: PathBuf,
    clock: Arc<dyn TimeSource>,
}

impl FileAuditLog {
    pub fn open<P: AsRef<Path>>(dir: P) -> ChangeLogResult<Self> {
        Self::open_with_clock(dir, Arc::new(SystemTimeSource))
    }

    pub fn open_with_clock<P: AsRef<Path>>(
        dir: P,
        clock: Arc<dyn TimeSource>,
    ) -> ChangeLogResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| ChangeLogError::io("create log dir", e))?;

        let meta = read_meta(&dir.join(META_FILE))?;
        let retention = match RetentionPolicy::new(meta.retention_days) {
            Ok(policy) => policy,
            Err(e) if meta.retention_days > MAX_RETENTION_DAYS => {
                warn!(
                    days = meta.retention_days,
                    error = %e,
                    "Persisted audit retention out of range; clamping"
                );
                RetentionPolicy::new(MAX_RETENTION_DAYS)?
            }
            Err(e) => return Err(e),
        };
        let (entries, torn_tail) = read_entries(&dir.join(LOG_FILE))?;

        if torn_tail {
            warn!(path = %dir.join(LOG_FILE).display(), "Dropping torn trailing audit line");
            rewrite_entries(&dir, &entries)?;
        }

        info!(
            path = %dir.display(),
            entries = entries.len(),
            retention_days = retention.days,
            "Opened audit log"
        );

        let journal = Journal::restore(entries, retention, meta.next_id);
        let file = open_append(&dir.join(LOG_FILE))?;

        Ok(Self {
            state: Mutex::new(FileState {
                journal,
                file,
                torn_at: None,
            }),
            dir,
            clock,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    fn write_meta(&self, journal: &Journal) -> ChangeLogResult<()> {
        let meta = LogMeta {
            retention_days: journal.retention().days,
            next_id: journal.next_id(),
        };
        let bytes =
            serde_json::to_vec_pretty(&meta).map_err(|e| ChangeLogError::io("encode meta", e))?;
        write_atomically(&self.dir.join(META_FILE), &bytes)
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, entry: NewAuditEntry) -> ChangeLogResult<AuditEntry> {
        let mut state = self.state.lock();
        // Appending after a partial line would corrupt the log for good.
        state.heal()?;
        let sealed = state.journal.seal(entry, self.clock.now());

        let mut line =
            serde_json::to_vec(&sealed).map_err(|e| ChangeLogError::io("encode entry", e))?;
        line.push(b'\n');

        let offset = state
            .file
            .metadata()
            .map_err(|e| ChangeLogError::io("stat audit log", e))?
            .len();

        let written = state
            .file
            .write_all(&line)
            .and_then(|_| state.file.sync_data());

        if let Err(e) = written {
            // Do not leave a partial line for the next append to follow.
            if let Err(truncate_err) = state.file.set_len(offset) {
                error!(
                    offset,
                    error = %truncate_err,
                    "Failed to roll back partial audit line; appends refused until removed"
                );
                state.torn_at = Some(offset);
            }
            return Err(ChangeLogError::io("append audit entry", e));
        }

        state.journal.push(sealed.clone());
        ella_telemetry::AUDIT_ENTRIES_WRITTEN.inc();
        debug!(id = sealed.id, action = %sealed.action, "Audit entry recorded");
        Ok(sealed)
    }

    fn list(&self, request: PageRequest) -> ChangeLogResult<Page<AuditEntry>> {
        Ok(self.state.lock().journal.page(request))
    }

    fn clear_before(&self, retention_days: u32) -> ChangeLogResult<usize> {
        let cutoff = RetentionPolicy::new(retention_days)?.cutoff(self.clock.now());
        let mut state = self.state.lock();

        let retained = state.journal.retained_after(cutoff);
        let removed = state.journal.len() - retained.len();
        if removed == 0 {
            return Ok(0);
        }

        // Persist the high-water mark first so ids survive a restart even if
        // every entry is purged.
        self.write_meta(&state.journal)?;
        rewrite_entries(&self.dir, &retained)?;
        state.file = open_append(&self.dir.join(LOG_FILE))?;
        state.torn_at = None;
        state.journal.purge_before(cutoff);

        Ok(removed)
    }

    fn retention(&self) -> ChangeLogResult<RetentionPolicy> {
        Ok(self.state.lock().journal.retention())
    }

    fn set_retention(&self, policy: RetentionPolicy) -> ChangeLogResult<()> {
        let mut state = self.state.lock();
        let previous = state.journal.retention();
        state.journal.set_retention(policy);
        if let Err(e) = self.write_meta(&state.journal) {
            state.journal.set_retention(previous);
            return Err(e);
        }
        Ok(())
    }
}

fn read_meta(path: &Path) -> ChangeLogResult<LogMeta> {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| ChangeLogError::Corrupted {
            line: 0,
            reason: format!("{}: {}", META_FILE, e),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LogMeta {
            retention_days: RetentionPolicy::default().days,
            next_id: 1,
        }),
        Err(e) => Err(ChangeLogError::io("read meta", e)),
    }
}

/// Returns the decoded entries and whether a torn final line was skipped.
fn read_entries(path: &Path) -> ChangeLogResult<(Vec<AuditEntry>, bool)> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), false)),
        Err(e) => return Err(ChangeLogError::io("open audit log", e)),
    };

    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<Result<_, _>>()
        .map_err(|e| ChangeLogError::io("read audit log", e))?;

    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let mut entries = Vec::with_capacity(lines.len());
    let mut torn_tail = false;

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AuditEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(_) if Some(index) == last => torn_tail = true,
            Err(e) => {
                return Err(ChangeLogError::Corrupted {
                    line: index + 1,
                    reason: e.to_string(),
                })
            }
        }
    }

    Ok((entries, torn_tail))
}

fn rewrite_entries(dir: &Path, entries: &[AuditEntry]) -> ChangeLogResult<()> {
    let mut bytes = Vec::new();
    for entry in entries {
        serde_json::to_writer(&mut bytes, entry).map_err(|e| ChangeLogError::io("encode", e))?;
        bytes.push(b'\n');
    }
    write_atomically(&dir.join(LOG_FILE), &bytes)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> ChangeLogResult<()> {
    let temp_path = path.with_extension("tmp");
    let mut file =
        File::create(&temp_path).map_err(|e| ChangeLogError::io("create temp file", e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| ChangeLogError::io("write temp file", e))?;
    std::fs::rename(&temp_path, path).map_err(|e| ChangeLogError::io("rename temp file", e))
}

fn open_append(path: &Path) -> ChangeLogResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ChangeLogError::io("open audit log for append", e))
}
