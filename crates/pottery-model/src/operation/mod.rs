mod json_path;
pub use json_path::{Extracted, Extraction, JsonPath};

mod schema;
pub use schema::{Schema, SchemaMismatch};

mod template;
pub use template::{PathTemplate, Segment};

mod id;
pub use id::OperationId;

use serde::{Deserialize, Serialize};

use crate::{Field, ModelError};

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// How the request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// No body; everything travels in the path.
    #[default]
    None,
    /// `application/x-www-form-urlencoded`.
    Form,
    /// `multipart/form-data`, required whenever a file is uploaded.
    Multipart,
}

/// Kind of body entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Text,
    /// The field holds a local path; the file content is sent.
    File,
}

/// One entry of a form or multipart body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyField {
    /// Key on the wire.
    pub key: &'static str,
    pub field: Field,
    pub required: bool,
    pub kind: BodyKind,
}

impl BodyField {
    pub fn required(field: Field) -> Self {
        Self {
            key: field.as_str(),
            field,
            required: true,
            kind: BodyKind::Text,
        }
    }

    pub fn optional(field: Field) -> Self {
        Self {
            required: false,
            ..Self::required(field)
        }
    }

    /// File part sent under `key`, read from the path held in `field`.
    pub fn file(key: &'static str, field: Field) -> Self {
        Self {
            key,
            field,
            required: true,
            kind: BodyKind::File,
        }
    }
}

/// Statically defined API call shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub id: OperationId,
    pub method: Method,
    pub path: PathTemplate,
    pub encoding: Encoding,
    pub body: Vec<BodyField>,
    pub outputs: Vec<Extraction>,
    pub schema: Schema,
}

impl Operation {
    pub fn new(id: OperationId, method: Method, path: &str) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            method,
            path: PathTemplate::parse(path)?,
            encoding: Encoding::None,
            body: Vec::new(),
            outputs: Vec::new(),
            schema: Schema::Any,
        })
    }

    pub fn with_form(mut self, fields: impl IntoIterator<Item = BodyField>) -> Self {
        self.encoding = Encoding::Form;
        self.body.extend(fields);
        self
    }

    pub fn with_multipart(mut self, fields: impl IntoIterator<Item = BodyField>) -> Self {
        self.encoding = Encoding::Multipart;
        self.body.extend(fields);
        self
    }

    /// Declare that `field` is written from the first resolving candidate path.
    pub fn with_output(mut self, field: Field, paths: &[&str]) -> Result<Self, ModelError> {
        self.outputs.push(Extraction::new(field, paths)?);
        Ok(self)
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Fields this operation cannot be built without.
    pub fn required_inputs(&self) -> impl Iterator<Item = Field> + '_ {
        self.path
            .placeholders()
            .chain(self.body.iter().filter(|b| b.required).map(|b| b.field))
    }

    /// Fields this operation writes on success.
    pub fn output_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.outputs.iter().map(|e| e.field)
    }
}
