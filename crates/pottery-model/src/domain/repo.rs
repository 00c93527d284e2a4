use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{RepoId, TaskId};

/// Repository created for solving a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    pub repo_id: RepoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub using_testing_version: bool,
    /// Expiry as milliseconds since the unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

impl RepoInfo {
    /// Expiry instant, if the server sent a representable one.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        let millis = self.expiry_date?;
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
    }
}

/// Tag created in a repository; submissions refer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTag {
    pub tag: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_info_expiry() {
        let json = r#"{"repoId":"r42","taskId":"t1","usingTestingVersion":true,"expiryDate":1000}"#;
        let info: RepoInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.repo_id, "r42");
        assert!(info.using_testing_version);
        assert_eq!(info.expires_at().unwrap().unix_timestamp(), 1);
    }

    #[test]
    fn repo_info_without_expiry() {
        let info: RepoInfo = serde_json::from_str(r#"{"repoId":"r1"}"#).unwrap();
        assert!(info.expires_at().is_none());
        assert!(!info.using_testing_version);
    }
}
