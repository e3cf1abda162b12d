//! Watch event types

use std::path::PathBuf;

use crate::sync::SyncReport;

/// Raw filesystem notification, as delivered by the watch backend
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: notify::EventKind,
    pub path: PathBuf,
}

/// Serve lifecycle events, also emitted as NDJSON for CI
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServeEvent {
    ServeStarted {
        template: String,
        output: String,
    },
    /// The first preview exists and watching is about to begin
    TemplateReady {
        output: String,
    },
    ChangeDetected {
        path: String,
    },
    SyncStarted,
    SyncComplete {
        written: usize,
        skipped: usize,
        deleted: usize,
        errors: usize,
    },
    Warning {
        message: String,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl ServeEvent {
    pub fn sync_complete(report: &SyncReport) -> Self {
        ServeEvent::SyncComplete {
            written: report.written.len(),
            skipped: report.skipped.len(),
            deleted: report.deleted.len(),
            errors: report.errors.len(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
