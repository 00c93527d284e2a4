use serde::{Deserialize, Serialize};

use crate::{RepoId, SubmissionStatus};

/// Test run scheduled from a repository tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub repo_id: RepoId,
    pub tag: String,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(default)]
    pub needs_retry: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_steps: Vec<TestStep>,
}

/// Outcome of a single harness step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    #[serde(default)]
    pub test_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_from_server_json() {
        let json = r#"{
            "repoId": "r42",
            "tag": "v1",
            "status": "HARNESS_RUNNING",
            "compilationTimeMs": 120,
            "needsRetry": false,
            "testSteps": [{"testSteps": ["a", "b"], "testSummary": "ok"}]
        }"#;
        let s: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(s.status, SubmissionStatus::HarnessRunning);
        assert_eq!(s.test_steps.len(), 1);
        assert_eq!(s.test_steps[0].test_summary.as_deref(), Some("ok"));
    }
}
