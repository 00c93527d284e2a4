mod field;
pub use field::Field;

mod status;
pub use status::{BuilderStatus, JobState, SubmissionStatus};

mod task;
pub use task::{BuilderInfo, TaskInfo};

mod repo;
pub use repo::{RepoInfo, RepoTag};

mod submission;
pub use submission::{Submission, TestStep};

mod worker;
pub use worker::JobStatus;

/// Identifier of a task definition on the server.
pub type TaskId = String;

/// Identifier of a candidate repository on the server.
pub type RepoId = String;
