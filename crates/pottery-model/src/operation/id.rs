use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Name of every operation the client knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationId {
    ListTasks,
    ListTestingTasks,
    ListRegisteredTasks,
    ListRetiredTasks,
    GetTask,
    ListTaskTypes,
    ListCriteria,
    ListLanguages,
    CreateTask,
    CreateRemoteTask,
    UpdateTask,
    PollUpdateStatus,
    RegisterTask,
    PollRegistrationStatus,
    RetireTask,
    UnretireTask,
    StartRepo,
    StartRemoteRepo,
    ListRepoTags,
    ListRepoFiles,
    UpdateFile,
    DeleteFile,
    ResetRepo,
    ReadFile,
    TagRepo,
    RequestTest,
    PollSubmission,
    PollStepOutput,
    ResizeWorkers,
    SetTimeoutMultiplier,
    ListWorkerQueue,
    ServerStatus,
}

impl OperationId {
    pub const ALL: [OperationId; 32] = [
        OperationId::ListTasks,
        OperationId::ListTestingTasks,
        OperationId::ListRegisteredTasks,
        OperationId::ListRetiredTasks,
        OperationId::GetTask,
        OperationId::ListTaskTypes,
        OperationId::ListCriteria,
        OperationId::ListLanguages,
        OperationId::CreateTask,
        OperationId::CreateRemoteTask,
        OperationId::UpdateTask,
        OperationId::PollUpdateStatus,
        OperationId::RegisterTask,
        OperationId::PollRegistrationStatus,
        OperationId::RetireTask,
        OperationId::UnretireTask,
        OperationId::StartRepo,
        OperationId::StartRemoteRepo,
        OperationId::ListRepoTags,
        OperationId::ListRepoFiles,
        OperationId::UpdateFile,
        OperationId::DeleteFile,
        OperationId::ResetRepo,
        OperationId::ReadFile,
        OperationId::TagRepo,
        OperationId::RequestTest,
        OperationId::PollSubmission,
        OperationId::PollStepOutput,
        OperationId::ResizeWorkers,
        OperationId::SetTimeoutMultiplier,
        OperationId::ListWorkerQueue,
        OperationId::ServerStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationId::ListTasks => "list-tasks",
            OperationId::ListTestingTasks => "list-testing-tasks",
            OperationId::ListRegisteredTasks => "list-registered-tasks",
            OperationId::ListRetiredTasks => "list-retired-tasks",
            OperationId::GetTask => "get-task",
            OperationId::ListTaskTypes => "list-task-types",
            OperationId::ListCriteria => "list-criteria",
            OperationId::ListLanguages => "list-languages",
            OperationId::CreateTask => "create-task",
            OperationId::CreateRemoteTask => "create-remote-task",
            OperationId::UpdateTask => "update-task",
            OperationId::PollUpdateStatus => "poll-update-status",
            OperationId::RegisterTask => "register-task",
            OperationId::PollRegistrationStatus => "poll-registration-status",
            OperationId::RetireTask => "retire-task",
            OperationId::UnretireTask => "unretire-task",
            OperationId::StartRepo => "start-repo",
            OperationId::StartRemoteRepo => "start-remote-repo",
            OperationId::ListRepoTags => "list-repo-tags",
            OperationId::ListRepoFiles => "list-repo-files",
            OperationId::UpdateFile => "update-file",
            OperationId::DeleteFile => "delete-file",
            OperationId::ResetRepo => "reset-repo",
            OperationId::ReadFile => "read-file",
            OperationId::TagRepo => "tag-repo",
            OperationId::RequestTest => "request-test",
            OperationId::PollSubmission => "poll-submission",
            OperationId::PollStepOutput => "poll-step-output",
            OperationId::ResizeWorkers => "resize-workers",
            OperationId::SetTimeoutMultiplier => "set-timeout-multiplier",
            OperationId::ListWorkerQueue => "list-worker-queue",
            OperationId::ServerStatus => "server-status",
        }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        OperationId::ALL
            .into_iter()
            .find(|id| id.as_str() == norm)
            .ok_or_else(|| ModelError::UnknownOperation(s.to_string()))
    }
}
