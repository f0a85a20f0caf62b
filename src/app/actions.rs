//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) only mutates [`NavigatorState`](crate::app::NavigatorState);
//! anything that reaches outside it (posting a fetch, ending the session) comes back as an
//! [`Action`] for the runtime to execute in order.

use crate::worker::WorkerMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Ends the navigation session.
    Quit,

    /// Posts a fetch to the background workers.
    PostToWorker(WorkerMessage),
}

impl From<WorkerMessage> for Action {
    fn from(message: WorkerMessage) -> Self {
        Self::PostToWorker(message)
    }
}
