use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use serde::Serialize;

use crate::ApixResult;
use crate::error::Error;
use crate::util::{JSON_MEDIA_TYPE, parse_header_name, parse_header_value};

/// A logical API request.
///
/// The URI may be relative to the base URL the transport resolves against.
/// `Clone` produces an independent value copy; the pipeline relies on that to
/// replay the request exactly as the caller built it.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    method: Method,
    uri: String,
    body: Bytes,
    headers: HeaderMap,
}

impl Request {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            body: Bytes::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Builds a request whose body is `content` encoded as JSON.
    pub fn json<T>(method: Method, uri: impl Into<String>, content: &T) -> ApixResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(content).map_err(|source| Error::Serialize { source })?;
        Ok(Self::new(method, uri)
            .with_body(body)
            .with_header(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE)))
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn try_with_header(self, name: &str, value: &str) -> ApixResult<Self> {
        let name = parse_header_name(name)?;
        let value = parse_header_value(name.as_str(), value)?;
        Ok(self.with_header(name, value))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
