use std::collections::BTreeMap;

use pottery_model::{
    BodyField, Field, Method, ModelError, Operation, OperationId as Op, Schema,
};

/// The operation table: one entry per remote endpoint.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ops: BTreeMap<Op, Operation>,
}

impl Catalog {
    #[inline]
    pub fn new() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    /// Every operation of the pottery API.
    pub fn standard() -> Result<Self, ModelError> {
        use Field::*;
        use Method::{Delete, Get, Post};

        // Listing endpoints return either bare ids or task infos.
        let first_task = ["/0/taskId", "/0"];

        let mut c = Self::new();

        // tasks
        c.register(
            Operation::new(Op::ListTasks, Get, "/tasks")?
                .with_output(TaskId, &first_task)?
                .with_schema(Schema::StringList),
        );
        c.register(
            Operation::new(Op::ListTestingTasks, Get, "/tasks/testing")?
                .with_output(TaskId, &first_task)?
                .with_schema(Schema::TaskInfoList),
        );
        c.register(
            Operation::new(Op::ListRegisteredTasks, Get, "/tasks/registered")?
                .with_output(TaskId, &first_task)?
                .with_schema(Schema::TaskInfoList),
        );
        c.register(
            Operation::new(Op::ListRetiredTasks, Get, "/tasks/retired")?
                .with_output(TaskId, &first_task)?
                .with_schema(Schema::StringList),
        );
        c.register(
            Operation::new(Op::GetTask, Get, "/tasks/{taskId}")?.with_schema(Schema::TaskInfo),
        );
        c.register(
            Operation::new(Op::ListTaskTypes, Get, "/tasks/types")?
                .with_schema(Schema::StringMap),
        );
        c.register(Operation::new(Op::ListCriteria, Get, "/tasks/criteria")?);
        c.register(
            Operation::new(Op::ListLanguages, Get, "/tasks/languages")?
                .with_schema(Schema::StringList),
        );
        c.register(
            Operation::new(Op::CreateTask, Post, "/tasks/create")?
                .with_output(TaskId, &["/0/taskId", "/0", "/taskId"])?,
        );
        c.register(
            Operation::new(Op::CreateRemoteTask, Post, "/tasks/create_remote")?
                .with_form([BodyField::required(Remote)])
                .with_output(TaskId, &["/taskId"])?,
        );
        c.register(
            Operation::new(Op::UpdateTask, Post, "/tasks/{taskId}/update")?
                .with_form([BodyField::optional(Sha1)])
                .with_schema(Schema::BuilderInfo),
        );
        c.register(
            Operation::new(Op::PollUpdateStatus, Get, "/tasks/{taskId}/update_status")?
                .with_schema(Schema::BuilderInfo),
        );
        c.register(
            Operation::new(Op::RegisterTask, Post, "/tasks/{taskId}/register")?
                .with_form([BodyField::optional(Sha1)])
                .with_schema(Schema::BuilderInfo),
        );
        c.register(
            Operation::new(
                Op::PollRegistrationStatus,
                Get,
                "/tasks/{taskId}/registering_status",
            )?
            .with_schema(Schema::BuilderInfo),
        );
        c.register(
            Operation::new(Op::RetireTask, Post, "/tasks/{taskId}/retire")?
                .with_output(RepoId, &["/repoId"])?,
        );
        c.register(
            Operation::new(Op::UnretireTask, Post, "/tasks/{taskId}/unretire")?
                .with_output(RepoId, &["/repoId"])?,
        );

        // repositories
        c.register(
            Operation::new(Op::StartRepo, Post, "/repo")?
                .with_form([
                    BodyField::required(TaskId),
                    BodyField::required(ValidityMinutes),
                    BodyField::required(Variant),
                    BodyField::optional(UsingTestingVersion),
                ])
                .with_output(RepoId, &["/repoId"])?
                .with_schema(Schema::RepoInfo),
        );
        c.register(
            Operation::new(Op::StartRemoteRepo, Post, "/repo/remote")?
                .with_form([
                    BodyField::required(TaskId),
                    BodyField::required(ValidityMinutes),
                    BodyField::required(Remote),
                    BodyField::required(Variant),
                ])
                .with_output(RepoId, &["/repoId"])?
                .with_schema(Schema::RepoInfo),
        );
        c.register(
            Operation::new(Op::ListRepoTags, Get, "/repo/{repoId}")?
                .with_schema(Schema::StringList),
        );
        c.register(
            Operation::new(Op::ListRepoFiles, Get, "/repo/{repoId}/{repoTag}")?
                .with_schema(Schema::StringList),
        );
        c.register(
            Operation::new(Op::UpdateFile, Post, "/repo/{repoId}/{repoTag}/{fileName}")?
                .with_multipart([
                    BodyField::file("data", UploadFile),
                    BodyField::optional(MimeType),
                ]),
        );
        c.register(Operation::new(
            Op::DeleteFile,
            Delete,
            "/repo/{repoId}/{repoTag}/{deleteFile}",
        )?);
        c.register(Operation::new(
            Op::ResetRepo,
            Post,
            "/repo/{repoId}/reset/{resetTag}",
        )?);
        c.register(Operation::new(
            Op::ReadFile,
            Get,
            "/repo/{repoId}/{repoTag}/{readFile}",
        )?);
        c.register(
            Operation::new(Op::TagRepo, Post, "/repo/{repoId}")?
                .with_output(SubmissionTag, &["/tag"])?
                .with_schema(Schema::RepoTag),
        );

        // submissions
        c.register(
            Operation::new(Op::RequestTest, Post, "/submissions/{repoId}/{submissionTag}")?
                .with_schema(Schema::Submission),
        );
        c.register(
            Operation::new(Op::PollSubmission, Get, "/submissions/{repoId}/{submissionTag}")?
                .with_schema(Schema::Submission),
        );
        c.register(Operation::new(
            Op::PollStepOutput,
            Get,
            "/submissions/{repoId}/{submissionTag}/output/{stepName}",
        )?);

        // workers and server
        c.register(
            Operation::new(Op::ResizeWorkers, Post, "/worker/resize")?
                .with_form([BodyField::required(NumThreads)]),
        );
        c.register(
            Operation::new(Op::SetTimeoutMultiplier, Post, "/worker/timeoutMultiplier")?
                .with_form([BodyField::required(Multiplier)]),
        );
        c.register(
            Operation::new(Op::ListWorkerQueue, Get, "/worker")?.with_schema(Schema::JobQueue),
        );
        c.register(
            Operation::new(Op::ServerStatus, Get, "/status")?.with_schema(Schema::StringMap),
        );

        Ok(c)
    }

    /// Add an operation, replacing any previous definition with the same id.
    #[inline]
    pub fn register(&mut self, op: Operation) {
        self.ops.insert(op.id, op);
    }

    pub fn get(&self, id: Op) -> Option<&Operation> {
        self.ops.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.ops.values()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Operations whose success writes `field`.
    pub fn producers_of(&self, field: Field) -> Vec<Op> {
        self.ops
            .values()
            .filter(|op| op.output_fields().any(|f| f == field))
            .map(|op| op.id)
            .collect()
    }

    /// Operations that cannot be built without `field`.
    pub fn consumers_of(&self, field: Field) -> Vec<Op> {
        self.ops
            .values()
            .filter(|op| op.required_inputs().any(|f| f == field))
            .map(|op| op.id)
            .collect()
    }

    /// Required inputs of `id` paired with the operations able to fill them.
    ///
    /// An empty producer list means the user has to type the value.
    pub fn prerequisites(&self, id: Op) -> Vec<(Field, Vec<Op>)> {
        let Some(op) = self.get(id) else {
            return Vec::new();
        };
        op.required_inputs()
            .map(|field| {
                let producers = self
                    .producers_of(field)
                    .into_iter()
                    .filter(|p| *p != id)
                    .collect();
                (field, producers)
            })
            .collect()
    }
}
