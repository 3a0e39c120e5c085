//! Access log records.
//!
//! One JSON object per line, newline-terminated:
//!
//! ```text
//! {"time":"…","id":"…","remote_ip":"…","host":"…","method":"GET","uri":"/",
//!  "user_agent":"…","status":200,"error":"","latency":1234567,
//!  "latency_human":"1.234567ms","bytes_in":0,"bytes_out":512}
//! ```

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// A completed request. Built at completion, emitted immediately, never retained.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccessLogRecord {
    /// RFC3339 with nanoseconds.
    pub time: String,
    pub id: String,
    pub remote_ip: String,
    pub host: String,
    pub method: String,
    pub uri: String,
    pub user_agent: String,
    pub status: u16,
    pub error: String,
    /// Nanoseconds.
    pub latency: u64,
    pub latency_human: String,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl AccessLogRecord {
    pub fn timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    pub fn set_latency(&mut self, latency: Duration) {
        self.latency = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.latency_human = format!("{latency:?}");
    }

    /// Serialize as a single newline-terminated JSON line.
    pub fn to_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(mut line) => {
                line.push('\n');
                line
            }
            // Cannot happen for plain strings and integers; keep the request id at least.
            Err(_) => format!("{{\"id\":{:?},\"status\":{}}}\n", self.id, self.status),
        }
    }
}

/// Destination for access records.
pub trait AccessLogSink: Send + Sync {
    fn emit(&self, record: &AccessLogRecord);
}

/// Writes records to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl AccessLogSink for StdoutSink {
    fn emit(&self, record: &AccessLogRecord) {
        let line = record.to_line();
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(line.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, id = %record.id, "Failed to write access log record");
        }
    }
}
