use std::borrow::Cow;

use serde_json::{Value, json};

/// Terminal result of one dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Success(Payload),
    Failure {
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        error: ErrorPayload,
    },
}

impl RequestOutcome {
    /// Non-2xx response carrying `body`.
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        RequestOutcome::Failure {
            status: Some(status),
            error: ErrorPayload::from_body(body.into()),
        }
    }

    /// No response could be obtained.
    pub fn transport(message: impl Into<String>) -> Self {
        RequestOutcome::Failure {
            status: None,
            error: ErrorPayload::Transport {
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success(_))
    }
}

/// Success body: structured JSON or a raw string.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Keep the body as JSON when it parses, as text otherwise.
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body),
        }
    }

    /// JSON view of the payload; text is parsed on demand.
    pub fn json(&self) -> Option<Cow<'_, Value>> {
        match self {
            Payload::Json(v) => Some(Cow::Borrowed(v)),
            Payload::Text(s) => serde_json::from_str(s).ok().map(Cow::Owned),
        }
    }
}

/// Error body of a failed request.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// The server's JSON error document.
    Json(Value),
    /// The error body was not valid JSON.
    Unparseable { raw: String },
    /// Network-level failure, no body.
    Transport { message: String },
}

impl ErrorPayload {
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => ErrorPayload::Json(value),
            Err(_) => ErrorPayload::Unparseable { raw: body },
        }
    }

    /// JSON document shown in the error display.
    pub fn to_json(&self) -> Value {
        match self {
            ErrorPayload::Json(v) => v.clone(),
            ErrorPayload::Unparseable { raw } => json!({ "unparseable": raw }),
            ErrorPayload::Transport { message } => json!({ "transport": message }),
        }
    }
}
