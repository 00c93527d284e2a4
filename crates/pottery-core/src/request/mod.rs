use std::path::{Path, PathBuf};

use pottery_model::{BodyKind, Encoding, Field, Method, Operation, OperationId, Segment};
use serde::Serialize;
use tracing::{instrument, trace};

use crate::{error::BuildError, state::FieldSnapshot};

/// Fully resolved request, ready to hand to a transport.
///
/// Pure value: building it twice from the same snapshot yields equal descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequestDescriptor {
    pub operation: OperationId,
    pub method: Method,
    /// Path relative to the API base, already percent-encoded.
    pub path: String,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "encoding", content = "parts", rename_all = "lowercase")]
pub enum RequestBody {
    None,
    Form(Vec<(String, String)>),
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    /// Value of a form or text multipart entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            RequestBody::None => None,
            RequestBody::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            RequestBody::Multipart(parts) => parts.iter().find_map(|p| match p {
                MultipartPart::Text { name, value } if name == key => Some(value.as_str()),
                _ => None,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MultipartPart {
    Text {
        name: String,
        value: String,
    },
    /// Reference to a local file; the transport reads it when sending.
    File {
        name: String,
        path: PathBuf,
        file_name: String,
        mime: String,
    },
}

/// Compose the request for `op` from the current field values.
#[instrument(level = "trace", skip(op, fields), fields(operation = %op.id))]
pub fn build_request(op: &Operation, fields: &FieldSnapshot) -> Result<RequestDescriptor, BuildError> {
    let path = resolve_path(op, fields)?;
    let body = match op.encoding {
        Encoding::None => RequestBody::None,
        Encoding::Form => RequestBody::Form(form_pairs(op, fields)?),
        Encoding::Multipart => RequestBody::Multipart(multipart_parts(op, fields)?),
    };
    trace!(method = op.method.as_str(), %path, "request built");

    Ok(RequestDescriptor {
        operation: op.id,
        method: op.method,
        path,
        body,
    })
}

fn require<'a>(op: &Operation, fields: &'a FieldSnapshot, field: Field) -> Result<&'a str, BuildError> {
    fields.value(field).ok_or(BuildError::MissingField {
        operation: op.id,
        field,
    })
}

fn resolve_path(op: &Operation, fields: &FieldSnapshot) -> Result<String, BuildError> {
    let mut path = String::with_capacity(op.path.as_str().len());
    for segment in op.path.segments() {
        match segment {
            Segment::Literal(s) => path.push_str(s),
            Segment::Placeholder(field) => {
                let value = require(op, fields, *field)?;
                path.push_str(&encode_value(*field, value));
            }
        }
    }
    Ok(path)
}

fn encode_value(field: Field, value: &str) -> String {
    if field.is_path_like() {
        value
            .split('/')
            .map(encode_segment)
            .collect::<Vec<_>>()
            .join("/")
    } else {
        encode_segment(value)
    }
}

/// Dot segments are escaped too, otherwise URL normalization would climb out of the template.
fn encode_segment(piece: &str) -> String {
    match piece {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => urlencoding::encode(piece).into_owned(),
    }
}

fn form_pairs(op: &Operation, fields: &FieldSnapshot) -> Result<Vec<(String, String)>, BuildError> {
    let mut pairs = Vec::with_capacity(op.body.len());
    for entry in &op.body {
        let value = if entry.required {
            require(op, fields, entry.field)?
        } else {
            match fields.value(entry.field) {
                Some(v) => v,
                None => continue,
            }
        };
        pairs.push((entry.key.to_string(), value.to_string()));
    }
    Ok(pairs)
}

fn multipart_parts(op: &Operation, fields: &FieldSnapshot) -> Result<Vec<MultipartPart>, BuildError> {
    let mut parts = Vec::with_capacity(op.body.len());
    for entry in &op.body {
        let value = if entry.required {
            require(op, fields, entry.field)?
        } else {
            match fields.value(entry.field) {
                Some(v) => v,
                None => continue,
            }
        };
        let part = match entry.kind {
            BodyKind::Text => MultipartPart::Text {
                name: entry.key.to_string(),
                value: value.to_string(),
            },
            BodyKind::File => {
                let path = PathBuf::from(value);
                MultipartPart::File {
                    name: entry.key.to_string(),
                    file_name: file_name_of(&path, value),
                    mime: fields
                        .value(Field::MimeType)
                        .map(str::to_string)
                        .unwrap_or_else(|| {
                            mime_guess::from_path(&path).first_or_octet_stream().to_string()
                        }),
                    path,
                }
            }
        };
        parts.push(part);
    }
    Ok(parts)
}

fn file_name_of(path: &Path, fallback: &str) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use pottery_model::OperationId as Op;

    use super::*;
    use crate::{Catalog, FieldStore};

    fn build(op: Op, store: &FieldStore) -> Result<RequestDescriptor, BuildError> {
        let catalog = Catalog::standard().unwrap();
        build_request(catalog.get(op).unwrap(), &store.snapshot())
    }

    #[test]
    fn substitutes_placeholders() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r42");
        store.set(Field::SubmissionTag, "v1");
        store.set(Field::StepName, "compile");

        let req = build(Op::PollStepOutput, &store).unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/submissions/r42/v1/output/compile");
        assert_eq!(req.body, RequestBody::None);
    }

    #[test]
    fn same_snapshot_same_descriptor() {
        let store = FieldStore::new();
        store.set(Field::TaskId, "T1");
        store.set(Field::ValidityMinutes, "60");
        store.set(Field::Variant, "java");
        store.set(Field::UsingTestingVersion, "true");

        let a = build(Op::StartRepo, &store).unwrap();
        let b = build(Op::StartRepo, &store).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn missing_placeholder_names_the_field() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r42");

        let err = build(Op::RequestTest, &store).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingField {
                operation: Op::RequestTest,
                field: Field::SubmissionTag
            }
        );
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let store = FieldStore::new();
        store.set(Field::TaskId, "   ");

        let err = build(Op::RegisterTask, &store).unwrap_err();
        assert_eq!(err.field(), Field::TaskId);
    }

    #[test]
    fn form_keeps_declaration_order_and_skips_absent_optionals() {
        let store = FieldStore::new();
        store.set(Field::Variant, "java");
        store.set(Field::TaskId, "T1");
        store.set(Field::ValidityMinutes, "30");

        let req = build(Op::StartRepo, &store).unwrap();
        assert_eq!(req.path, "/repo");
        assert_eq!(
            req.body,
            RequestBody::Form(vec![
                ("taskId".into(), "T1".into()),
                ("validityMinutes".into(), "30".into()),
                ("variant".into(), "java".into()),
            ])
        );
        assert_eq!(req.body.get("taskId"), Some("T1"));
        assert_eq!(req.body.get("usingTestingVersion"), None);
    }

    #[test]
    fn optional_sha1() {
        let store = FieldStore::new();
        store.set(Field::TaskId, "T1");
        let req = build(Op::RegisterTask, &store).unwrap();
        assert_eq!(req.body, RequestBody::Form(vec![]));

        store.set(Field::Sha1, "abcdef");
        let req = build(Op::RegisterTask, &store).unwrap();
        assert_eq!(req.body.get("sha1"), Some("abcdef"));
    }

    #[test]
    fn missing_required_form_field() {
        let store = FieldStore::new();
        let err = build(Op::ResizeWorkers, &store).unwrap_err();
        assert_eq!(err.field(), Field::NumThreads);
    }

    #[test]
    fn path_like_fields_keep_separators() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r42");
        store.set(Field::RepoTag, "HEAD");
        store.set(Field::ReadFile, "src/main/Hello World.java");

        let req = build(Op::ReadFile, &store).unwrap();
        assert_eq!(req.path, "/repo/r42/HEAD/src/main/Hello%20World.java");
    }

    #[test]
    fn plain_fields_are_fully_encoded() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "a/b?c");
        let req = build(Op::ListRepoTags, &store).unwrap();
        assert_eq!(req.path, "/repo/a%2Fb%3Fc");
    }

    #[test]
    fn dot_segments_cannot_escape_the_template() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r42");
        store.set(Field::RepoTag, "HEAD");
        store.set(Field::DeleteFile, "../../../status");
        let req = build(Op::DeleteFile, &store).unwrap();
        assert_eq!(req.path, "/repo/r42/HEAD/%2E%2E/%2E%2E/%2E%2E/status");

        store.set(Field::DeleteFile, "./a/.../b");
        let req = build(Op::DeleteFile, &store).unwrap();
        assert_eq!(req.path, "/repo/r42/HEAD/%2E/a/.../b");

        store.set(Field::RepoId, "..");
        let req = build(Op::TagRepo, &store).unwrap();
        assert_eq!(req.path, "/repo/%2E%2E");

        store.set(Field::RepoId, ".");
        let req = build(Op::ListRepoTags, &store).unwrap();
        assert_eq!(req.path, "/repo/%2E");
    }

    #[test]
    fn multipart_references_upload_file() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r42");
        store.set(Field::RepoTag, "HEAD");
        store.set(Field::FileName, "docs/notes.txt");
        store.set(Field::UploadFile, "/tmp/work/notes.txt");

        let req = build(Op::UpdateFile, &store).unwrap();
        assert_eq!(req.path, "/repo/r42/HEAD/docs/notes.txt");
        let RequestBody::Multipart(parts) = &req.body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts.len(), 1);
        match &parts[0] {
            MultipartPart::File {
                name,
                path,
                file_name,
                mime,
            } => {
                assert_eq!(name, "data");
                assert_eq!(path, &PathBuf::from("/tmp/work/notes.txt"));
                assert_eq!(file_name, "notes.txt");
                assert_eq!(mime, "text/plain");
            }
            other => panic!("unexpected part {other:?}"),
        }
    }

    #[test]
    fn multipart_unknown_extension_is_octet_stream() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r42");
        store.set(Field::RepoTag, "HEAD");
        store.set(Field::FileName, "blob");
        store.set(Field::UploadFile, "/tmp/blob");

        let req = build(Op::UpdateFile, &store).unwrap();
        let RequestBody::Multipart(parts) = &req.body else {
            panic!("expected multipart body");
        };
        assert!(
            matches!(&parts[0], MultipartPart::File { mime, .. } if mime == "application/octet-stream")
        );
    }

    #[test]
    fn multipart_mime_type_field_wins() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r42");
        store.set(Field::RepoTag, "HEAD");
        store.set(Field::FileName, "notes");
        store.set(Field::UploadFile, "/tmp/notes");
        store.set(Field::MimeType, "text/plain");

        let req = build(Op::UpdateFile, &store).unwrap();
        assert_eq!(req.body.get("mimeType"), Some("text/plain"));
        let RequestBody::Multipart(parts) = &req.body else {
            panic!("expected multipart body");
        };
        assert!(matches!(&parts[0], MultipartPart::File { mime, .. } if mime == "text/plain"));
    }

    #[test]
    fn multipart_requires_upload_file() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r42");
        store.set(Field::RepoTag, "HEAD");
        store.set(Field::FileName, "a.txt");

        let err = build(Op::UpdateFile, &store).unwrap_err();
        assert_eq!(err.field(), Field::UploadFile);
    }
}
