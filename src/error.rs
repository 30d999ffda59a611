use std::fmt;

use http::{Method, StatusCode};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::event::Stage;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) const BAD_RESPONSE_CODE: &str = "internal_server_error";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransportErrorKind {
    Dns,
    Connect,
    Tls,
    Timeout,
    Read,
    BodyTooLarge,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Dns => "dns",
            Self::Connect => "connect",
            Self::Tls => "tls",
            Self::Timeout => "timeout",
            Self::Read => "read",
            Self::BodyTooLarge => "body_too_large",
            Self::Other => "other",
        };
        formatter.write_str(text)
    }
}

/// Failure of a [`Transport`](crate::Transport) to obtain any response.
#[derive(Debug, Error)]
#[error("http transport error ({kind}) for {method} {uri}: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    method: Method,
    uri: String,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(
        kind: TransportErrorKind,
        method: Method,
        uri: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            method,
            uri: uri.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// A response arrived but its body could not be trusted: an empty `200`
    /// or a non-empty body that failed to decode.
    BadResponse,
    /// A non-2xx response, classified from the API's error payload.
    Application,
}

/// Classified error built from a response the API actually returned.
///
/// The payload follows the OAuth-style error shape used by the API:
/// `error`, `error_description`, `error_uri`, `error_properties` and
/// `error_data`. Missing fields read as `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
    kind: ApiErrorKind,
    payload: Map<String, Value>,
    status: StatusCode,
    status_message: String,
}

impl ApiError {
    pub fn new(
        kind: ApiErrorKind,
        payload: Map<String, Value>,
        status: StatusCode,
        status_message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            payload,
            status,
            status_message: status_message.into(),
        }
    }

    pub(crate) fn bad_response(body: &[u8], status: StatusCode, status_message: &str) -> Self {
        let mut payload = Map::new();
        payload.insert("error".to_owned(), Value::from(BAD_RESPONSE_CODE));
        payload.insert(
            "error_description".to_owned(),
            Value::from(format!(
                "Bad response from server! Response: {}",
                String::from_utf8_lossy(body)
            )),
        );
        Self::new(ApiErrorKind::BadResponse, payload, status, status_message)
    }

    pub(crate) fn application(
        payload: Map<String, Value>,
        status: StatusCode,
        status_message: &str,
    ) -> Self {
        Self::new(ApiErrorKind::Application, payload, status, status_message)
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<&str> {
        self.payload_str("error")
    }

    pub fn description(&self) -> Option<&str> {
        self.payload_str("error_description")
    }

    pub fn error_uri(&self) -> Option<&str> {
        self.payload_str("error_uri")
    }

    pub fn properties(&self) -> Option<&Value> {
        self.payload.get("error_properties")
    }

    pub fn data(&self) -> Option<&Value> {
        self.payload.get("error_data")
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "api error {} ({} {})",
            self.code().unwrap_or("unknown"),
            self.status.as_u16(),
            self.status_message
        )?;
        if let Some(description) = self.description() {
            write!(formatter, ": {description}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCode {
    Transport,
    BadResponse,
    Application,
    SerializeJson,
    InvalidUri,
    InvalidHeaderName,
    InvalidHeaderValue,
    Observer,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::BadResponse => "bad_response",
            Self::Application => "application",
            Self::SerializeJson => "serialize_json",
            Self::InvalidUri => "invalid_uri",
            Self::InvalidHeaderName => "invalid_header_name",
            Self::InvalidHeaderValue => "invalid_header_value",
            Self::Observer => "observer",
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to serialize request json: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid request uri: {uri}")]
    InvalidUri { uri: String },
    #[error("invalid header name {name}: {source}")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },
    #[error("invalid header value for {name}: {source}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
    #[error("{stage} observer failed: {source}")]
    Observer {
        stage: Stage,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Transport(_) => ErrorCode::Transport,
            Self::Api(error) => match error.kind {
                ApiErrorKind::BadResponse => ErrorCode::BadResponse,
                ApiErrorKind::Application => ErrorCode::Application,
            },
            Self::Serialize { .. } => ErrorCode::SerializeJson,
            Self::InvalidUri { .. } => ErrorCode::InvalidUri,
            Self::InvalidHeaderName { .. } => ErrorCode::InvalidHeaderName,
            Self::InvalidHeaderValue { .. } => ErrorCode::InvalidHeaderValue,
            Self::Observer { .. } => ErrorCode::Observer,
        }
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(error) => Some(error),
            _ => None,
        }
    }

    /// HTTP status of the response behind this error, if one was obtained.
    pub fn status(&self) -> Option<StatusCode> {
        self.as_api().map(ApiError::status)
    }

    pub fn status_message(&self) -> Option<&str> {
        self.as_api().map(ApiError::status_message)
    }
}
