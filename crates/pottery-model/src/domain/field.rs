use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Named input slot shared by the user and the operations.
///
/// Each field has a stable wire name, used in path templates and form bodies, e.g.
/// `taskId` or `submissionTag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    TaskId,
    RepoId,
    RepoTag,
    SubmissionTag,
    StepName,
    Sha1,
    Remote,
    ValidityMinutes,
    Variant,
    UsingTestingVersion,
    /// Destination of an uploaded file inside the repository.
    FileName,
    /// Local path of the file to upload.
    UploadFile,
    MimeType,
    DeleteFile,
    ReadFile,
    ResetTag,
    NumThreads,
    Multiplier,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::TaskId,
        Field::RepoId,
        Field::RepoTag,
        Field::SubmissionTag,
        Field::StepName,
        Field::Sha1,
        Field::Remote,
        Field::ValidityMinutes,
        Field::Variant,
        Field::UsingTestingVersion,
        Field::FileName,
        Field::UploadFile,
        Field::MimeType,
        Field::DeleteFile,
        Field::ReadFile,
        Field::ResetTag,
        Field::NumThreads,
        Field::Multiplier,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::TaskId => "taskId",
            Field::RepoId => "repoId",
            Field::RepoTag => "repoTag",
            Field::SubmissionTag => "submissionTag",
            Field::StepName => "stepName",
            Field::Sha1 => "sha1",
            Field::Remote => "remote",
            Field::ValidityMinutes => "validityMinutes",
            Field::Variant => "variant",
            Field::UsingTestingVersion => "usingTestingVersion",
            Field::FileName => "fileName",
            Field::UploadFile => "uploadFile",
            Field::MimeType => "mimeType",
            Field::DeleteFile => "deleteFile",
            Field::ReadFile => "readFile",
            Field::ResetTag => "resetTag",
            Field::NumThreads => "numThreads",
            Field::Multiplier => "multiplier",
        }
    }

    /// Returns `true` for fields naming a file inside a repository.
    ///
    /// Their values may contain `/` separators which must survive path interpolation.
    pub fn is_path_like(&self) -> bool {
        matches!(self, Field::FileName | Field::DeleteFile | Field::ReadFile)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ModelError;

    /// Accepts the exact wire name (`taskId`) or its kebab/snake spelling (`task-id`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = camel_case(s.trim());
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == name)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

/// `task-id` / `task_id` to `taskId`; names without separators pass through.
fn camel_case(name: &str) -> String {
    if !name.contains(['-', '_']) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    for (i, word) in name.split(['-', '_']).filter(|w| !w.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
