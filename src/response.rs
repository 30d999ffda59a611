use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::request::Request;
use crate::util::{is_json_content, media_type};

/// Raw response as produced by a [`Transport`](crate::Transport).
///
/// The pipeline attaches the request that produced it before any
/// after-response observer sees it.
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    status_message: String,
    headers: HeaderMap,
    body: Bytes,
    request: Option<Request>,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_message: status.canonical_reason().unwrap_or_default().to_owned(),
            headers,
            body: body.into(),
            request: None,
        }
    }

    pub fn with_status_message(mut self, status_message: impl Into<String>) -> Self {
        self.status_message = status_message.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Option<String> {
        media_type(&self.headers)
    }

    pub fn is_json(&self) -> bool {
        is_json_content(&self.headers)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The request this response answers. `None` until the pipeline has
    /// seen the response.
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    pub(crate) fn attach_request(&mut self, request: Request) {
        self.request = Some(request);
    }
}
