use serde::{Deserialize, Serialize};

/// Progress of a task registration or testing-version update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuilderStatus {
    NotStarted,
    Scheduled,
    CopyingFiles,
    CompilingTest,
    CompilingSolution,
    TestingSolution,
    Success,
    Failure,
    /// Status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl BuilderStatus {
    /// Returns `true` once the builder will not make further progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuilderStatus::Success | BuilderStatus::Failure)
    }
}

/// Progress of a submission through compilation, harness and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    CompilationRunning,
    CompilationFailed,
    CompilationComplete,
    HarnessRunning,
    HarnessFailed,
    HarnessComplete,
    ValidatorRunning,
    ValidatorFailed,
    ValidatorComplete,
    Complete,
    #[serde(other)]
    Unknown,
}

impl SubmissionStatus {
    /// Returns `true` if polling the submission again cannot change its status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Complete
                | SubmissionStatus::CompilationFailed
                | SubmissionStatus::HarnessFailed
                | SubmissionStatus::ValidatorFailed
        )
    }

    /// Returns `true` for the failure states.
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::CompilationFailed
                | SubmissionStatus::HarnessFailed
                | SubmissionStatus::ValidatorFailed
        )
    }
}

/// State of a job in the worker queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Waiting,
    Running,
    #[serde(other)]
    Unknown,
}
