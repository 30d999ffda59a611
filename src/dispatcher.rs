use std::fmt;
use std::sync::Arc;

use crate::ApixResult;
use crate::error::{BoxError, Error};
use crate::event::{
    HttpExceptionEvent, RequestEvent, ResponseEvent, ResponseExceptionEvent, Stage,
};

/// Outcome of one observer. An `Err` aborts the stage and the call.
pub type ObserverResult = Result<(), BoxError>;

pub type Handler<E> = Arc<dyn Fn(&mut E) -> ObserverResult + Send + Sync>;

/// An observer bound to the stage whose event it accepts.
#[derive(Clone)]
pub enum Listener {
    BeforeRequest(Handler<RequestEvent>),
    OnHttpException(Handler<HttpExceptionEvent>),
    AfterResponse(Handler<ResponseEvent>),
    OnResponseException(Handler<ResponseExceptionEvent>),
}

impl Listener {
    pub fn before_request<F>(observer: F) -> Self
    where
        F: Fn(&mut RequestEvent) -> ObserverResult + Send + Sync + 'static,
    {
        Self::BeforeRequest(Arc::new(observer))
    }

    pub fn on_http_exception<F>(observer: F) -> Self
    where
        F: Fn(&mut HttpExceptionEvent) -> ObserverResult + Send + Sync + 'static,
    {
        Self::OnHttpException(Arc::new(observer))
    }

    pub fn after_response<F>(observer: F) -> Self
    where
        F: Fn(&mut ResponseEvent) -> ObserverResult + Send + Sync + 'static,
    {
        Self::AfterResponse(Arc::new(observer))
    }

    pub fn on_response_exception<F>(observer: F) -> Self
    where
        F: Fn(&mut ResponseExceptionEvent) -> ObserverResult + Send + Sync + 'static,
    {
        Self::OnResponseException(Arc::new(observer))
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::BeforeRequest(_) => Stage::BeforeRequest,
            Self::OnHttpException(_) => Stage::OnHttpException,
            Self::AfterResponse(_) => Stage::AfterResponse,
            Self::OnResponseException(_) => Stage::OnResponseException,
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Listener")
            .field(&self.stage())
            .finish()
    }
}

/// An observer interested in several stages at once.
///
/// Every method defaults to a no-op; [`Dispatcher::subscribe`] registers the
/// subscriber on all four stages.
pub trait Subscriber: Send + Sync {
    fn before_request(&self, _event: &mut RequestEvent) -> ObserverResult {
        Ok(())
    }

    fn on_http_exception(&self, _event: &mut HttpExceptionEvent) -> ObserverResult {
        Ok(())
    }

    fn after_response(&self, _event: &mut ResponseEvent) -> ObserverResult {
        Ok(())
    }

    fn on_response_exception(&self, _event: &mut ResponseExceptionEvent) -> ObserverResult {
        Ok(())
    }
}

/// Ordered fan-out of stage events to registered observers.
///
/// Observers run in registration order and all of them run; there is no
/// early exit. Registration takes `&mut self`, so it is finished before a
/// pipeline is shared across threads.
#[derive(Clone, Default)]
pub struct Dispatcher {
    before_request: Vec<Handler<RequestEvent>>,
    on_http_exception: Vec<Handler<HttpExceptionEvent>>,
    after_response: Vec<Handler<ResponseEvent>>,
    on_response_exception: Vec<Handler<ResponseExceptionEvent>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Listener) -> &mut Self {
        match listener {
            Listener::BeforeRequest(handler) => self.before_request.push(handler),
            Listener::OnHttpException(handler) => self.on_http_exception.push(handler),
            Listener::AfterResponse(handler) => self.after_response.push(handler),
            Listener::OnResponseException(handler) => self.on_response_exception.push(handler),
        }
        self
    }

    pub fn on_before_request<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&mut RequestEvent) -> ObserverResult + Send + Sync + 'static,
    {
        self.register(Listener::before_request(observer))
    }

    pub fn on_http_exception<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&mut HttpExceptionEvent) -> ObserverResult + Send + Sync + 'static,
    {
        self.register(Listener::on_http_exception(observer))
    }

    pub fn on_after_response<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&mut ResponseEvent) -> ObserverResult + Send + Sync + 'static,
    {
        self.register(Listener::after_response(observer))
    }

    pub fn on_response_exception<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&mut ResponseExceptionEvent) -> ObserverResult + Send + Sync + 'static,
    {
        self.register(Listener::on_response_exception(observer))
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber>) -> &mut Self {
        let before = Arc::clone(&subscriber);
        let http_exception = Arc::clone(&subscriber);
        let after = Arc::clone(&subscriber);
        self.on_before_request(move |event| before.before_request(event))
            .on_http_exception(move |event| http_exception.on_http_exception(event))
            .on_after_response(move |event| after.after_response(event))
            .on_response_exception(move |event| subscriber.on_response_exception(event))
    }

    pub fn listener_count(&self, stage: Stage) -> usize {
        match stage {
            Stage::BeforeRequest => self.before_request.len(),
            Stage::OnHttpException => self.on_http_exception.len(),
            Stage::AfterResponse => self.after_response.len(),
            Stage::OnResponseException => self.on_response_exception.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Stage::ALL
            .iter()
            .all(|stage| self.listener_count(*stage) == 0)
    }

    pub fn dispatch_before_request(&self, event: &mut RequestEvent) -> ApixResult<()> {
        run_handlers(Stage::BeforeRequest, &self.before_request, event)
    }

    pub fn dispatch_http_exception(&self, event: &mut HttpExceptionEvent) -> ApixResult<()> {
        run_handlers(Stage::OnHttpException, &self.on_http_exception, event)
    }

    pub fn dispatch_after_response(&self, event: &mut ResponseEvent) -> ApixResult<()> {
        run_handlers(Stage::AfterResponse, &self.after_response, event)
    }

    pub fn dispatch_response_exception(
        &self,
        event: &mut ResponseExceptionEvent,
    ) -> ApixResult<()> {
        run_handlers(
            Stage::OnResponseException,
            &self.on_response_exception,
            event,
        )
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Dispatcher")
            .field("before_request", &self.before_request.len())
            .field("on_http_exception", &self.on_http_exception.len())
            .field("after_response", &self.after_response.len())
            .field("on_response_exception", &self.on_response_exception.len())
            .finish()
    }
}

fn run_handlers<E>(stage: Stage, handlers: &[Handler<E>], event: &mut E) -> ApixResult<()> {
    for handler in handlers {
        handler(event).map_err(|source| Error::Observer { stage, source })?;
    }
    Ok(())
}
