use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::transport::Transport;

mod builder;
mod execute;

/// How many times observers may force a repeat of one call by default.
pub const DEFAULT_MAX_REPEATS: usize = 16;

/// Request/response orchestrator.
///
/// Runs every call through the four observer stages around one
/// [`Transport`]. Calls block until the transport returns, including any
/// repeats an observer asks for.
pub struct Pipeline {
    transport: Arc<dyn Transport>,
    dispatcher: Dispatcher,
    max_repeats: Option<usize>,
}

pub struct PipelineBuilder {
    transport: Arc<dyn Transport>,
    dispatcher: Dispatcher,
    max_repeats: Option<usize>,
}
