//! JSONL file writer for domain events.
//!
//! Each [`DomainEvent`] is serialized as a single JSON line carrying its
//! `type` tag and `occurred_at` timestamp, appended via a buffered writer.

use governance_application::EventPublisher;
use governance_domain::DomainEvent;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Activity log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Open the log at `path` for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventPublisher for JsonlEventLog {
    fn publish(&self, event: DomainEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize {} event: {}", event.event_type(), e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush every record; the log is append-only and read by other tools
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use governance_domain::{GovernanceEvent, GroupId, MemberId, SessionId, StepId, WorkflowId};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();

        log.publish(DomainEvent::new(
            GovernanceEvent::VoteCast {
                session_id: SessionId::new("s1"),
                voter_id: MemberId::new("alice"),
                replaced: false,
            },
            Utc::now(),
        ));
        log.publish(DomainEvent::new(
            GovernanceEvent::StepCompleted {
                workflow_id: WorkflowId::new("wf"),
                step_id: StepId::new("a"),
            },
            Utc::now(),
        ));
        drop(log);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.get("type").is_some());
            assert!(record.get("occurred_at").is_some());
        }
        assert_eq!(records[0]["type"], "vote_cast");
        assert_eq!(records[0]["voter_id"], "alice");
        assert_eq!(records[1]["type"], "step_completed");
        assert_eq!(records[1]["step_id"], "a");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.jsonl");
        let event = DomainEvent::new(
            GovernanceEvent::WorkflowCompleted {
                workflow_id: WorkflowId::new("wf"),
                group_id: GroupId::new("g"),
            },
            Utc::now(),
        );

        for _ in 0..2 {
            let log = JsonlEventLog::new(&path).unwrap();
            log.publish(event.clone());
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        // A regular file cannot act as a parent directory
        assert!(JsonlEventLog::new(blocker.join("events.jsonl")).is_none());
    }
}
