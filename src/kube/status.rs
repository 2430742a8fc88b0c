use jiff::tz::TimeZone;
use k8s_openapi::{
    api::{
        batch::v1::{Job, JobCondition, JobStatus},
        core::v1::ContainerState,
    },
    apimachinery::pkg::apis::meta::v1::Time,
};
use std::fmt;

const CONDITION_TRUE: &str = "True";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Active,
    Completed,
    Failed,
}

impl JobState {
    pub fn icon(&self) -> &'static str {
        match self {
            JobState::Active => "⏳",
            JobState::Completed => "✅",
            JobState::Failed => "❌",
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, JobState::Active)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobState::Active => "Active",
            JobState::Completed => "Completed",
            JobState::Failed => "Failed",
        };

        write!(f, "{label} {}", self.icon())
    }
}

/// Derive the state of a job from its conditions. The first true `Complete` or
/// `Failed` condition wins.
///
/// # Arguments
///
/// * `conditions` - &[JobCondition]
pub fn classify(conditions: &[JobCondition]) -> JobState {
    conditions
        .iter()
        .filter(|c| c.status == CONDITION_TRUE)
        .find_map(|c| match c.type_.as_str() {
            "Complete" => Some(JobState::Completed),
            "Failed" => Some(JobState::Failed),
            _ => None,
        })
        .unwrap_or(JobState::Active)
}

pub trait JobStatusOps {
    fn state(&self) -> JobState;
    /// Pod counters formatted for display
    fn pod_stats(&self) -> String;
}

impl JobStatusOps for Job {
    fn state(&self) -> JobState {
        let conditions = self
            .status
            .as_ref()
            .and_then(|status| status.conditions.as_deref())
            .unwrap_or_default();

        classify(conditions)
    }

    fn pod_stats(&self) -> String {
        let count = |get: fn(&JobStatus) -> Option<i32>| {
            self.status.as_ref().and_then(get).unwrap_or_default()
        };

        format!(
            "Active: {}, Succeeded: {}, Failed: {}",
            count(|s| s.active),
            count(|s| s.succeeded),
            count(|s| s.failed)
        )
    }
}

/// Summarise what a container is currently doing
pub fn container_state_summary(state: &ContainerState) -> String {
    if let Some(running) = &state.running {
        return format!("Running, Started at: {}", format_time(running.started_at.as_ref()));
    }

    if let Some(waiting) = &state.waiting {
        return format!(
            "Waiting, Reason: {}, Message: {}",
            waiting.reason.as_deref().unwrap_or_default(),
            waiting.message.as_deref().unwrap_or_default()
        );
    }

    if let Some(terminated) = &state.terminated {
        return format!(
            "Finished, Exit code: {}, Finished at: {}, Reason: {}",
            terminated.exit_code,
            format_time(terminated.finished_at.as_ref()),
            terminated.reason.as_deref().unwrap_or_default()
        );
    }

    tracing::warn!("unrecognized container state");
    String::new()
}

/// Format a kubernetes timestamp in UTC, empty when the timestamp is unset
pub fn format_time(time: Option<&Time>) -> String {
    time.map(|t| {
        t.0.to_zoned(TimeZone::UTC)
            .strftime("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
    })
    .unwrap_or_default()
}
