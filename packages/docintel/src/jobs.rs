//! Asynchronous job client: submit, then poll to a terminal state.
//!
//! Polling is strictly sequential per job; the loop is an explicit
//! state machine with suspension points only at the status request and
//! the inter-poll sleep, which keeps cancellation easy to add as one
//! more transition later.

use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::JobError;
use crate::traits::backend::JobApi;
use crate::types::job::{JobStatus, JobStatusReport, PollConfig};

/// States of one poll loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// No poll running.
    Idle,
    /// Waiting on the job, with the number of status checks made so far.
    Polling { attempts: u32 },
    /// Job reached `completed`; carries the final status payload.
    Completed(JobStatusReport),
    /// Job reached `error`.
    Failed { message: String },
    /// Attempt budget exhausted before a terminal status.
    TimedOut { attempts: u32 },
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Polling { .. })
    }
}

/// Client for long-running processing jobs.
///
/// Holds no state across calls beyond the in-flight guard; the attempt
/// counter lives for one `poll` invocation.
pub struct JobClient<A: JobApi> {
    api: A,
    config: PollConfig,
    in_flight: Semaphore,
}

impl<A: JobApi> JobClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            config: PollConfig::default(),
            // One tracked job per client; concurrent starts are
            // rejected, not queued.
            in_flight: Semaphore::new(1),
        }
    }

    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Start a job. Resolves to the job id on an accepted response.
    pub async fn submit(&self, job_type: &str, params: &Value) -> Result<String, JobError> {
        let job_id = self.api.start_job(job_type, params).await?;
        info!(job_type, job_id, "job accepted");
        Ok(job_id)
    }

    /// Poll a job until it completes, fails, or the attempt budget runs
    /// out. `on_progress` is invoked for every response that carries a
    /// message, terminal ones included.
    pub async fn poll<F>(
        &self,
        job_id: &str,
        mut on_progress: F,
    ) -> Result<JobStatusReport, JobError>
    where
        F: FnMut(&JobStatusReport),
    {
        let mut state = PollState::Idle;
        loop {
            let attempts = match state {
                PollState::Idle => 0,
                PollState::Polling { attempts } => attempts,
                PollState::Completed(report) => {
                    info!(job_id, "job completed");
                    return Ok(report);
                }
                PollState::Failed { message } => {
                    warn!(job_id, error = %message, "job failed");
                    return Err(JobError::Processing(message));
                }
                PollState::TimedOut { attempts } => {
                    warn!(job_id, attempts, "poll budget exhausted");
                    return Err(JobError::Timeout { attempts });
                }
            };

            let report = self.api.job_status(job_id).await?;
            if report.message.is_some() {
                on_progress(&report);
            }

            state = match JobStatus::parse(&report.status) {
                Some(JobStatus::Completed) => PollState::Completed(report),
                Some(JobStatus::Error) => PollState::Failed {
                    message: report
                        .message
                        .unwrap_or_else(|| "job failed".to_string()),
                },
                // queued, running, and unknown tokens are all
                // non-terminal.
                _ => {
                    let attempts = attempts + 1;
                    if attempts >= self.config.max_attempts {
                        PollState::TimedOut { attempts }
                    } else {
                        debug!(job_id, attempts, status = %report.status, "job still in progress");
                        tokio::time::sleep(self.config.interval).await;
                        PollState::Polling { attempts }
                    }
                }
            };
        }
    }

    /// Submit a job and poll it to completion.
    ///
    /// Rejects with `JobError::Busy` if another run is in flight on
    /// this client.
    pub async fn run<F>(
        &self,
        job_type: &str,
        params: &Value,
        on_progress: F,
    ) -> Result<JobStatusReport, JobError>
    where
        F: FnMut(&JobStatusReport),
    {
        let _permit = self
            .in_flight
            .try_acquire()
            .map_err(|_| JobError::Busy)?;
        let job_id = self.submit(job_type, params).await?;
        self.poll(&job_id, on_progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockJobApi;
    use std::time::Duration;

    fn fast_config(max_attempts: u32) -> PollConfig {
        PollConfig::new()
            .with_max_attempts(max_attempts)
            .with_interval(Duration::ZERO)
    }

    #[tokio::test]
    async fn always_running_times_out_after_exact_attempt_count() {
        let api = MockJobApi::new()
            .with_statuses(vec![JobStatusReport::with_status("running")]);
        let client = JobClient::new(api).with_config(fast_config(3));

        let err = client.poll("job-1", |_| {}).await.unwrap_err();
        assert!(matches!(err, JobError::Timeout { attempts: 3 }));
        // No status call is made after the budget is spent.
        assert_eq!(client.api.status_call_count(), 3);
    }

    #[tokio::test]
    async fn resolves_on_completion_with_exact_callback_counts() {
        let api = MockJobApi::new().with_statuses(vec![
            JobStatusReport::with_message("running", "reading sheet"),
            JobStatusReport::with_message("running", "computing margins"),
            JobStatusReport::with_message("completed", "done"),
        ]);
        let client = JobClient::new(api).with_config(fast_config(10));

        let mut messages = Vec::new();
        let report = client
            .poll("job-1", |r| messages.push(r.message.clone().unwrap()))
            .await
            .unwrap();

        assert_eq!(report.status, "completed");
        assert_eq!(messages, vec!["reading sheet", "computing margins", "done"]);
        assert_eq!(client.api.status_call_count(), 3);
    }

    #[tokio::test]
    async fn responses_without_messages_skip_the_callback() {
        let api = MockJobApi::new().with_statuses(vec![
            JobStatusReport::with_status("queued"),
            JobStatusReport::with_status("running"),
            JobStatusReport::with_status("completed"),
        ]);
        let client = JobClient::new(api).with_config(fast_config(10));

        let mut calls = 0;
        client.poll("job-1", |_| calls += 1).await.unwrap();
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn error_status_rejects_with_processing_message() {
        let api = MockJobApi::new().with_statuses(vec![
            JobStatusReport::with_status("running"),
            JobStatusReport::with_message("error", "sheet has no header row"),
        ]);
        let client = JobClient::new(api).with_config(fast_config(10));

        let err = client.poll("job-1", |_| {}).await.unwrap_err();
        match err {
            JobError::Processing(message) => assert_eq!(message, "sheet has no header row"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unknown_status_tokens_are_non_terminal() {
        let api = MockJobApi::new().with_statuses(vec![
            JobStatusReport::with_status("warming-up"),
            JobStatusReport::with_status("completed"),
        ]);
        let client = JobClient::new(api).with_config(fast_config(10));

        let report = client.poll("job-1", |_| {}).await.unwrap();
        assert_eq!(report.status, "completed");
        assert_eq!(client.api.status_call_count(), 2);
    }

    #[tokio::test]
    async fn rejected_submission_is_a_submission_error() {
        let api = MockJobApi::new().with_submission_error("job type unknown");
        let client = JobClient::new(api).with_config(fast_config(3));

        let err = client
            .run("margin-analysis", &serde_json::json!({}), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::Submission(_)));
    }

    #[tokio::test]
    async fn run_submits_then_polls_to_completion() {
        let api = MockJobApi::new()
            .with_job_id("job-99")
            .with_statuses(vec![
                JobStatusReport::with_status("running"),
                JobStatusReport::with_status("completed"),
            ]);
        let client = JobClient::new(api).with_config(fast_config(10));

        let report = client
            .run("margin-analysis", &serde_json::json!({"sheet": "Q3"}), |_| {})
            .await
            .unwrap();
        assert_eq!(report.status, "completed");
        assert_eq!(client.api.started_jobs(), vec!["margin-analysis".to_string()]);
    }
}
