use std::sync::Arc;

use crate::dispatcher::{Dispatcher, Listener, Subscriber};
use crate::transport::Transport;

use super::{DEFAULT_MAX_REPEATS, Pipeline, PipelineBuilder};

impl PipelineBuilder {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            dispatcher: Dispatcher::new(),
            max_repeats: Some(DEFAULT_MAX_REPEATS),
        }
    }

    /// Replaces the dispatcher, dropping listeners registered so far.
    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn listener(mut self, listener: Listener) -> Self {
        self.dispatcher.register(listener);
        self
    }

    pub fn subscriber(mut self, subscriber: Arc<dyn Subscriber>) -> Self {
        self.dispatcher.subscribe(subscriber);
        self
    }

    /// Caps how often observers may repeat one call. Once the cap is
    /// reached the error of the last attempt is raised.
    pub fn max_repeats(mut self, max_repeats: usize) -> Self {
        self.max_repeats = Some(max_repeats);
        self
    }

    /// Lets observers repeat a call without limit. An observer that always
    /// asks for a repeat then never returns.
    pub fn unbounded_repeats(mut self) -> Self {
        self.max_repeats = None;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            transport: self.transport,
            dispatcher: self.dispatcher,
            max_repeats: self.max_repeats,
        }
    }
}

impl Pipeline {
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self::builder(transport).build()
    }

    pub fn builder<T>(transport: T) -> PipelineBuilder
    where
        T: Transport + 'static,
    {
        PipelineBuilder::new(Arc::new(transport))
    }

    pub fn from_shared(transport: Arc<dyn Transport>) -> PipelineBuilder {
        PipelineBuilder::new(transport)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn max_repeats(&self) -> Option<usize> {
        self.max_repeats
    }
}
