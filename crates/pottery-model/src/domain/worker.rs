use serde::{Deserialize, Serialize};

use crate::JobState;

/// Entry of the worker queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub job_id: u64,
    pub status: JobState,
    #[serde(default)]
    pub description: String,
}
