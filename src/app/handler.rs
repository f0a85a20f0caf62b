//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only entry point the runtime uses to change navigation state.
//! It pattern-matches the event, calls the matching [`NavigatorState`] operation, and
//! returns whether the view needs redrawing together with the actions to execute.
//!
//! # Event Types
//!
//! - **Navigation**: `Start`, `SelectCategory`, `SelectSubFilter`, `RowActivated`, `Back`, `Refresh`
//! - **Row filter**: `Char`, `Backspace`, `ClearFilter`
//! - **Worker**: `WorkerResponse`
//!
//! # Example
//!
//! ```
//! use ranktrail::app::{handle_event, Action, Event, NavigatorSettings, NavigatorState};
//! use ranktrail::domain::CategoryCatalog;
//!
//! let mut state = NavigatorState::new(CategoryCatalog::default(), "weather", NavigatorSettings::default());
//! let (render, actions) = handle_event(&mut state, &Event::Start)?;
//! assert!(render);
//! assert!(matches!(actions.as_slice(), [Action::PostToWorker(_)]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::{Action, NavigatorState};
use crate::domain::error::Result;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Issues the initial fetch for the starting category.
    Start,

    /// Ends the session.
    Quit,

    /// Switches to a category by id. Unknown ids are passed through to the backend.
    SelectCategory(String),

    /// Activates a sub-filter tab by index.
    SelectSubFilter(usize),

    /// Activates a row by its index among the visible (filtered) rows.
    RowActivated(usize),

    /// Returns one drill-down level.
    Back,

    /// Re-requests the current ranking.
    Refresh,

    /// Appends a character to the row filter.
    Char(char),

    /// Removes the last character of the row filter.
    Backspace,

    /// Clears the row filter.
    ClearFilter,

    /// Wraps a response from a fetch worker.
    WorkerResponse(WorkerResponse),
}

fn post(message: Option<WorkerMessage>) -> Vec<Action> {
    message.map(Action::PostToWorker).into_iter().collect()
}

/// Processes an event, mutates navigator state, and returns actions to execute.
///
/// Returns `(render, actions)`: `render` is `false` when nothing visible changed, such as
/// a response for a superseded request.
///
/// # Errors
///
/// Currently infallible; the `Result` is kept so state operations can surface failures
/// without changing callers.
pub fn handle_event(state: &mut NavigatorState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Start => Ok((true, post(state.fetch()))),
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::SelectCategory(id) => Ok((true, post(state.select_category(id)))),
        Event::SelectSubFilter(index) => Ok((true, post(state.select_sub_filter(*index)))),
        Event::RowActivated(index) => {
            let Some(item) = state.visible_items().get(*index).map(|item| (*item).clone()) else {
                tracing::debug!(index = index, "no visible row at index");
                return Ok((false, vec![]));
            };

            tracing::debug!(rank = item.rank, entity = %item.entity_name, "row activated");
            Ok((true, post(state.on_row_activated(&item))))
        }
        Event::Back => Ok((true, post(state.on_back()))),
        Event::Refresh => Ok((true, vec![Action::PostToWorker(state.refresh())])),
        Event::Char(c) => {
            state.row_filter.push(*c);
            Ok((true, vec![]))
        }
        Event::Backspace => Ok((state.row_filter.pop().is_some(), vec![])),
        Event::ClearFilter => {
            let changed = !state.row_filter.is_empty();
            state.row_filter.clear();
            Ok((changed, vec![]))
        }
        Event::WorkerResponse(response) => {
            let committed = state.apply_response(response);
            if !committed {
                tracing::debug!(ticket = response.ticket().0, "response superseded, not rendering");
            }
            Ok((committed, vec![]))
        }
    }
}
