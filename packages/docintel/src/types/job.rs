//! Job status reporting and poll configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Server-driven job lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Error,
}

impl JobStatus {
    /// Parse a wire status token. Unknown tokens return `None` and are
    /// treated as non-terminal by the poller.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// One observed job status, as reported by the status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatusReport {
    /// Raw status token; see [`JobStatus::parse`].
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub row_count: Option<u64>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub static_url: Option<String>,
}

impl JobStatusReport {
    /// Shorthand for building a report with just a status token.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }

    /// Shorthand for building a report with a status and message.
    pub fn with_message(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Attempt budget and pacing for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum number of status requests before giving up.
    pub max_attempts: u32,
    /// Sleep between non-terminal polls.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(2),
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}
