use http::Method;
use serde::Serialize;
use tracing::{debug, info_span, warn};

use crate::ApixResult;
use crate::decode::{Decoded, classify, decode_body};
use crate::error::Error;
use crate::event::{
    HttpExceptionDecision, HttpExceptionEvent, RequestEvent, ResponseEvent,
    ResponseExceptionDecision, ResponseExceptionEvent,
};
use crate::options::Options;
use crate::request::Request;
use crate::response::Response;
use crate::util::redact_uri_for_logs;

use super::Pipeline;

impl Pipeline {
    /// Repeats replay `request` as passed in here, not as observers left it.
    pub fn send(&self, request: Request, options: Options) -> ApixResult<Decoded> {
        self.send_attempt(request, options, 0)
    }

    pub fn send_plain(&self, request: Request, options: Options) -> ApixResult<Response> {
        self.send_plain_with_options(request, options)
            .map(|(response, _)| response)
    }

    pub fn get(&self, uri: impl Into<String>, options: Options) -> ApixResult<Decoded> {
        self.send(Request::new(Method::GET, uri), options)
    }

    pub fn delete(&self, uri: impl Into<String>, options: Options) -> ApixResult<Decoded> {
        self.send(Request::new(Method::DELETE, uri), options)
    }

    /// Sends `content` as JSON. `None` sends an empty body with no
    /// content type.
    pub fn post<T>(
        &self,
        uri: impl Into<String>,
        content: Option<&T>,
        options: Options,
    ) -> ApixResult<Decoded>
    where
        T: Serialize + ?Sized,
    {
        self.send(content_request(Method::POST, uri, content)?, options)
    }

    pub fn put<T>(
        &self,
        uri: impl Into<String>,
        content: Option<&T>,
        options: Options,
    ) -> ApixResult<Decoded>
    where
        T: Serialize + ?Sized,
    {
        self.send(content_request(Method::PUT, uri, content)?, options)
    }

    fn send_attempt(
        &self,
        request: Request,
        options: Options,
        repeat: usize,
    ) -> ApixResult<Decoded> {
        let original_request = request.clone();
        let span = info_span!(
            "apix.request",
            method = %request.method(),
            uri = %redact_uri_for_logs(request.uri()),
            repeat = repeat
        );
        let _enter = span.enter();

        let (response, options) = self.send_plain_with_options(request, options)?;
        let error = match classify(&response, decode_body(&response)) {
            Ok(decoded) => return Ok(decoded),
            Err(error) => error,
        };
        warn!(
            status = response.status().as_u16(),
            error = %error,
            "response classified as error"
        );

        let mut event = ResponseExceptionEvent::new(error, response, options);
        self.dispatcher.dispatch_response_exception(&mut event)?;
        match event.into_decision() {
            ResponseExceptionDecision::Substitute(result) => {
                debug!("observer substituted the call result");
                Ok(result)
            }
            ResponseExceptionDecision::Repeat { options, error } => {
                if let Some(max_repeats) = self.max_repeats
                    && repeat >= max_repeats
                {
                    warn!(max_repeats, "repeat limit reached, raising last error");
                    return Err(error);
                }
                debug!("observer requested a repeat of the original request");
                self.send_attempt(original_request, options, repeat + 1)
            }
            ResponseExceptionDecision::Raise(error) => Err(error),
        }
    }

    fn send_plain_with_options(
        &self,
        request: Request,
        options: Options,
    ) -> ApixResult<(Response, Options)> {
        let mut event = RequestEvent::new(request, options);
        self.dispatcher.dispatch_before_request(&mut event)?;
        let (request, options) = event.into_parts();

        debug!("sending request");
        let (mut response, request, options) = match self.transport.execute(&request) {
            Ok(response) => (response, request, options),
            Err(error) => {
                warn!(
                    kind = %error.kind(),
                    error = %error,
                    "transport failed"
                );
                let mut event = HttpExceptionEvent::new(Error::Transport(error), request, options);
                self.dispatcher.dispatch_http_exception(&mut event)?;
                match event.into_decision() {
                    (HttpExceptionDecision::Recover(response), request, options) => {
                        debug!("observer substituted a response for the transport failure");
                        (response, request, options)
                    }
                    (HttpExceptionDecision::Raise(error), _, _) => return Err(error),
                }
            }
        };
        response.attach_request(request);
        debug!(status = response.status().as_u16(), "response received");

        let mut event = ResponseEvent::new(response, options);
        self.dispatcher.dispatch_after_response(&mut event)?;
        Ok(event.into_parts())
    }
}

fn content_request<T>(
    method: Method,
    uri: impl Into<String>,
    content: Option<&T>,
) -> ApixResult<Request>
where
    T: Serialize + ?Sized,
{
    match content {
        Some(content) => Request::json(method, uri, content),
        None => Ok(Request::new(method, uri)),
    }
}
