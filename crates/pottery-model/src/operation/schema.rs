use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::{BuilderInfo, JobState, JobStatus, RepoInfo, RepoTag, Submission, TaskInfo};

/// Shape an operation's success payload is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// No expectation.
    Any,
    /// Array of strings (task ids, tags, file names, languages).
    StringList,
    /// Object with string values (server status, task types).
    StringMap,
    TaskInfo,
    TaskInfoList,
    BuilderInfo,
    RepoInfo,
    RepoTag,
    Submission,
    JobQueue,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("payload does not match {schema}: {reason}")]
pub struct SchemaMismatch {
    pub schema: &'static str,
    pub reason: String,
}

impl Schema {
    pub fn name(&self) -> &'static str {
        match self {
            Schema::Any => "any",
            Schema::StringList => "string list",
            Schema::StringMap => "string map",
            Schema::TaskInfo => "task info",
            Schema::TaskInfoList => "task info list",
            Schema::BuilderInfo => "builder info",
            Schema::RepoInfo => "repo info",
            Schema::RepoTag => "repo tag",
            Schema::Submission => "submission",
            Schema::JobQueue => "job queue",
        }
    }

    /// Verify that `payload` deserializes into the expected shape.
    pub fn check(&self, payload: &Value) -> Result<(), SchemaMismatch> {
        match self {
            Schema::Any => Ok(()),
            Schema::StringList => self.decode::<Vec<String>>(payload).map(drop),
            Schema::StringMap => self.decode::<BTreeMap<String, String>>(payload).map(drop),
            Schema::TaskInfo => self.decode::<TaskInfo>(payload).map(drop),
            Schema::TaskInfoList => self.decode::<Vec<TaskInfo>>(payload).map(drop),
            Schema::BuilderInfo => self.decode::<BuilderInfo>(payload).map(drop),
            Schema::RepoInfo => self.decode::<RepoInfo>(payload).map(drop),
            Schema::RepoTag => self.decode::<RepoTag>(payload).map(drop),
            Schema::Submission => self.decode::<Submission>(payload).map(drop),
            Schema::JobQueue => self.decode::<Vec<JobStatus>>(payload).map(drop),
        }
    }

    /// One-line human summary of a payload that matches the schema.
    pub fn summarize(&self, payload: &Value) -> Option<String> {
        match self {
            Schema::Any => None,
            Schema::StringList => {
                let items = self.decode::<Vec<String>>(payload).ok()?;
                Some(format!("{} entries", items.len()))
            }
            Schema::StringMap => {
                let map = self.decode::<BTreeMap<String, String>>(payload).ok()?;
                Some(format!("{} keys", map.len()))
            }
            Schema::TaskInfo => {
                let info = self.decode::<TaskInfo>(payload).ok()?;
                Some(format!(
                    "task {} ({})",
                    info.task_id,
                    info.name.as_deref().unwrap_or("unnamed")
                ))
            }
            Schema::TaskInfoList => {
                let infos = self.decode::<Vec<TaskInfo>>(payload).ok()?;
                Some(format!("{} tasks", infos.len()))
            }
            Schema::BuilderInfo => {
                let info = self.decode::<BuilderInfo>(payload).ok()?;
                let state = if info.status.is_terminal() { "done" } else { "in progress" };
                Some(format!(
                    "build {}: {:?} ({state})",
                    info.sha1.as_deref().unwrap_or("HEAD"),
                    info.status
                ))
            }
            Schema::RepoInfo => {
                let info = self.decode::<RepoInfo>(payload).ok()?;
                Some(match info.expires_at() {
                    Some(at) => format!("repo {} expires at {at}", info.repo_id),
                    None => format!("repo {}", info.repo_id),
                })
            }
            Schema::RepoTag => {
                let tag = self.decode::<RepoTag>(payload).ok()?;
                Some(format!("tag {}", tag.tag))
            }
            Schema::Submission => {
                let s = self.decode::<Submission>(payload).ok()?;
                let state = if s.status.is_terminal() { "done" } else { "in progress" };
                Some(format!("submission {}/{}: {:?} ({state})", s.repo_id, s.tag, s.status))
            }
            Schema::JobQueue => {
                let jobs = self.decode::<Vec<JobStatus>>(payload).ok()?;
                let running = jobs.iter().filter(|j| j.status == JobState::Running).count();
                Some(format!("{} jobs ({running} running)", jobs.len()))
            }
        }
    }

    fn decode<T: DeserializeOwned>(&self, payload: &Value) -> Result<T, SchemaMismatch> {
        T::deserialize(payload).map_err(|e| SchemaMismatch {
            schema: self.name(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn any_accepts_everything() {
        assert!(Schema::Any.check(&json!(null)).is_ok());
        assert!(Schema::Any.check(&json!({"x": [1]})).is_ok());
        assert!(Schema::Any.summarize(&json!(1)).is_none());
    }

    #[test]
    fn repo_tag_check() {
        assert!(Schema::RepoTag.check(&json!({"tag": "v1"})).is_ok());

        let err = Schema::RepoTag.check(&json!(["v1"])).unwrap_err();
        assert_eq!(err.schema, "repo tag");
    }

    #[test]
    fn submission_summary() {
        let payload = json!({"repoId": "r42", "tag": "v1", "status": "COMPLETE"});
        assert!(Schema::Submission.check(&payload).is_ok());
        assert_eq!(
            Schema::Submission.summarize(&payload).unwrap(),
            "submission r42/v1: Complete (done)"
        );
    }

    #[test]
    fn job_queue_summary() {
        let payload = json!([
            {"jobId": 1, "status": "RUNNING", "description": "compile"},
            {"jobId": 2, "status": "WAITING", "description": "test"}
        ]);
        assert_eq!(
            Schema::JobQueue.summarize(&payload).unwrap(),
            "2 jobs (1 running)"
        );
    }

    #[test]
    fn summary_of_mismatch_is_none() {
        assert!(Schema::StringList.summarize(&json!({"a": 1})).is_none());
    }
}
