use std::fmt;

use crate::decode::Decoded;
use crate::error::Error;
use crate::options::Options;
use crate::request::Request;
use crate::response::Response;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    BeforeRequest,
    OnHttpException,
    AfterResponse,
    OnResponseException,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Self::BeforeRequest,
        Self::OnHttpException,
        Self::AfterResponse,
        Self::OnResponseException,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeRequest => "before_request",
            Self::OnHttpException => "on_http_exception",
            Self::AfterResponse => "after_response",
            Self::OnResponseException => "on_response_exception",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Dispatched before the transport runs.
#[derive(Debug)]
pub struct RequestEvent {
    request: Request,
    options: Options,
}

impl RequestEvent {
    pub(crate) fn new(request: Request, options: Options) -> Self {
        Self { request, options }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub(crate) fn into_parts(self) -> (Request, Options) {
        (self.request, self.options)
    }
}

/// Dispatched when the transport produced no response.
#[derive(Debug)]
pub struct HttpExceptionEvent {
    error: Error,
    request: Request,
    options: Options,
    response: Option<Response>,
}

#[derive(Debug)]
pub enum HttpExceptionDecision {
    Recover(Response),
    Raise(Error),
}

impl HttpExceptionEvent {
    pub(crate) fn new(error: Error, request: Request, options: Options) -> Self {
        Self {
            error,
            request,
            options,
            response: None,
        }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn set_error(&mut self, error: Error) {
        self.error = error;
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn set_response(&mut self, response: Response) {
        self.response = Some(response);
    }

    pub(crate) fn into_decision(self) -> (HttpExceptionDecision, Request, Options) {
        let decision = match self.response {
            Some(response) => HttpExceptionDecision::Recover(response),
            None => HttpExceptionDecision::Raise(self.error),
        };
        (decision, self.request, self.options)
    }
}

/// Dispatched once a response is in hand. Observation only.
#[derive(Debug)]
pub struct ResponseEvent {
    response: Response,
    options: Options,
}

impl ResponseEvent {
    pub(crate) fn new(response: Response, options: Options) -> Self {
        Self { response, options }
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn into_parts(self) -> (Response, Options) {
        (self.response, self.options)
    }
}

/// Dispatched when a response was classified as an error.
///
/// A substitute result takes precedence over the repeat flag.
#[derive(Debug)]
pub struct ResponseExceptionEvent {
    error: Error,
    response: Response,
    options: Options,
    result: Option<Decoded>,
    repeat_request: bool,
}

#[derive(Debug)]
pub enum ResponseExceptionDecision {
    Substitute(Decoded),
    /// Send the original request again with `options`. `error` is raised
    /// instead if the pipeline refuses to repeat.
    Repeat { options: Options, error: Error },
    Raise(Error),
}

impl ResponseExceptionEvent {
    pub(crate) fn new(error: Error, response: Response, options: Options) -> Self {
        Self {
            error,
            response,
            options,
            result: None,
            repeat_request: false,
        }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn set_error(&mut self, error: Error) {
        self.error = error;
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn result(&self) -> Option<&Decoded> {
        self.result.as_ref()
    }

    pub fn set_result(&mut self, result: Decoded) {
        self.result = Some(result);
    }

    pub fn is_repeat_request(&self) -> bool {
        self.repeat_request
    }

    pub fn set_repeat_request(&mut self, repeat_request: bool) {
        self.repeat_request = repeat_request;
    }

    pub(crate) fn into_decision(self) -> ResponseExceptionDecision {
        match self.result {
            Some(result) => ResponseExceptionDecision::Substitute(result),
            None if self.repeat_request => ResponseExceptionDecision::Repeat {
                options: self.options,
                error: self.error,
            },
            None => ResponseExceptionDecision::Raise(self.error),
        }
    }
}
