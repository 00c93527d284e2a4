use async_trait::async_trait;
use pottery_core::{ErrorPayload, MultipartPart, Payload, RequestBody, RequestDescriptor, RequestOutcome};
use pottery_model::Method;
use reqwest::multipart::{Form, Part};
use tracing::{debug, trace};

use crate::{config::ClientConfig, errors::ClientError};

/// Sends one resolved request and classifies the response.
///
/// Network and server failures come back as [`RequestOutcome::Failure`]; `Err` is
/// reserved for local problems that prevent the request from being sent at all.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: &RequestDescriptor) -> Result<RequestOutcome, ClientError>;
}

/// [`Transport`] over HTTP via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RequestOutcome, ClientError> {
        let url = self.config.endpoint(&request.path);
        let mut builder = self.client.request(http_method(request.method), url.as_str());

        builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Form(pairs) => builder.form(pairs),
            RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts).await?),
        };

        trace!(method = request.method.as_str(), %url, "sending");
        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "request did not complete");
                return Ok(RequestOutcome::transport(e.to_string()));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Ok(RequestOutcome::Failure {
                    status: Some(status.as_u16()),
                    error: ErrorPayload::Transport {
                        message: e.to_string(),
                    },
                });
            }
        };

        if status.is_success() {
            Ok(RequestOutcome::Success(Payload::from_body(body)))
        } else {
            Ok(RequestOutcome::rejected(status.as_u16(), body))
        }
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

async fn multipart_form(parts: &[MultipartPart]) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            MultipartPart::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartPart::File {
                name,
                path,
                file_name,
                mime,
            } => {
                let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
                    path: path.clone(),
                    source,
                })?;
                let file = Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str(mime)?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}
