use std::io::Read;
use std::time::Duration;

use bytes::Bytes;
use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};

use crate::ApixResult;
use crate::error::{TransportError, TransportErrorKind};
use crate::request::Request;
use crate::response::Response;
use crate::util::{
    merge_headers, parse_header_name, parse_header_value, redact_uri_for_logs, resolve_uri,
};

use super::Transport;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CLIENT_NAME: &str = "apix";
const DEFAULT_MAX_RESPONSE_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Blocking transport backed by a `ureq` agent.
///
/// Relative request URIs are joined onto the base URL; absolute `http(s)`
/// URIs are used as given. Every status code is returned as a response.
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
    default_headers: HeaderMap,
    max_response_body_bytes: usize,
}

pub struct UreqTransportBuilder {
    base_url: String,
    default_headers: HeaderMap,
    request_timeout: Duration,
    connect_timeout: Duration,
    client_name: String,
    max_response_body_bytes: usize,
}

impl UreqTransportBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: HeaderMap::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            client_name: DEFAULT_CLIENT_NAME.to_owned(),
            max_response_body_bytes: DEFAULT_MAX_RESPONSE_BODY_BYTES,
        }
    }

    pub fn client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout.max(Duration::from_millis(1));
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout.max(Duration::from_millis(1));
        self
    }

    pub fn max_response_body_bytes(mut self, max_response_body_bytes: usize) -> Self {
        self.max_response_body_bytes = max_response_body_bytes.max(1);
        self
    }

    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn try_default_header(self, name: &str, value: &str) -> ApixResult<Self> {
        let name = parse_header_name(name)?;
        let value = parse_header_value(name.as_str(), value)?;
        Ok(self.default_header(name, value))
    }

    pub fn try_build(self) -> ApixResult<UreqTransport> {
        if !self.base_url.is_empty() {
            resolve_uri(&self.base_url, "")?;
        }
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .user_agent(self.client_name.as_str())
            .timeout_global(Some(self.request_timeout))
            .timeout_connect(Some(self.connect_timeout))
            .build();
        Ok(UreqTransport {
            agent: config.new_agent(),
            base_url: self.base_url,
            default_headers: self.default_headers,
            max_response_body_bytes: self.max_response_body_bytes,
        })
    }
}

impl UreqTransport {
    pub fn builder(base_url: impl Into<String>) -> UreqTransportBuilder {
        UreqTransportBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        let method = request.method().clone();
        let uri_text = resolve_uri(&self.base_url, request.uri()).map_err(|source| {
            TransportError::new(
                TransportErrorKind::Other,
                method.clone(),
                redact_uri_for_logs(request.uri()),
                "invalid request uri",
            )
            .with_source(source)
        })?;
        let log_uri = redact_uri_for_logs(&uri_text);

        let headers = merge_headers(&self.default_headers, request.headers());
        let mut builder = ureq::http::Request::builder()
            .method(method.clone())
            .uri(uri_text.as_str());
        for (name, value) in &headers {
            builder = builder.header(name, value);
        }
        let http_request = builder.body(request.body().to_vec()).map_err(|source| {
            TransportError::new(
                TransportErrorKind::Other,
                method.clone(),
                log_uri.clone(),
                "failed to build http request",
            )
            .with_source(source)
        })?;

        let mut response = self.agent.run(http_request).map_err(|source| {
            TransportError::new(
                classify_ureq_transport_error(&source),
                method.clone(),
                log_uri.clone(),
                source.to_string(),
            )
            .with_source(source)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = match read_all_body_limited(&mut response, self.max_response_body_bytes) {
            Ok(body) => body,
            Err(ReadBodyError::Read(source)) => {
                let kind = match wrapped_ureq_error(&source) {
                    Some(ureq_error) => classify_ureq_transport_error(ureq_error),
                    None => TransportErrorKind::Read,
                };
                return Err(TransportError::new(
                    kind,
                    method,
                    log_uri,
                    format!("failed to read response body: {source}"),
                )
                .with_source(source));
            }
            Err(ReadBodyError::TooLarge { actual_bytes }) => {
                return Err(TransportError::new(
                    TransportErrorKind::BodyTooLarge,
                    method,
                    log_uri,
                    format!(
                        "response body too large ({actual_bytes} bytes > {} bytes)",
                        self.max_response_body_bytes
                    ),
                ));
            }
        };

        Ok(Response::new(status, headers, body))
    }
}

pub(super) fn classify_ureq_transport_error(error: &ureq::Error) -> TransportErrorKind {
    match error {
        ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
        ureq::Error::HostNotFound => TransportErrorKind::Dns,
        ureq::Error::Tls(_) => TransportErrorKind::Tls,
        ureq::Error::ConnectProxyFailed(_) | ureq::Error::ConnectionFailed => {
            TransportErrorKind::Connect
        }
        ureq::Error::Io(source) => match source.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                TransportErrorKind::Timeout
            }
            std::io::ErrorKind::NotFound => TransportErrorKind::Dns,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::AddrNotAvailable => TransportErrorKind::Connect,
            std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof => TransportErrorKind::Read,
            _ => TransportErrorKind::Other,
        },
        _ => TransportErrorKind::Other,
    }
}

fn wrapped_ureq_error(io_error: &std::io::Error) -> Option<&ureq::Error> {
    io_error
        .get_ref()
        .and_then(|source| source.downcast_ref::<ureq::Error>())
}

enum ReadBodyError {
    Read(std::io::Error),
    TooLarge { actual_bytes: usize },
}

fn read_all_body_limited(
    response: &mut ureq::http::Response<ureq::Body>,
    max_bytes: usize,
) -> Result<Bytes, ReadBodyError> {
    let mut reader = response.body_mut().as_reader();
    let mut collected = Vec::new();
    let mut chunk = [0_u8; 8192];
    let mut total_len = 0_usize;

    loop {
        let read = reader.read(&mut chunk).map_err(ReadBodyError::Read)?;
        if read == 0 {
            break;
        }
        total_len = total_len.saturating_add(read);
        if total_len > max_bytes {
            return Err(ReadBodyError::TooLarge {
                actual_bytes: total_len,
            });
        }
        collected.extend_from_slice(&chunk[..read]);
    }

    Ok(Bytes::from(collected))
}
