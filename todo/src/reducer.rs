//! Reducer logic for the to-do list.
//!
//! Every command is checked against the current state. A command that would
//! change something becomes an event which is applied immediately; anything
//! else is absorbed with a debug log line. Nothing here fails: the widget has
//! no error surface.

use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use std::sync::Arc;
use todo_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer};

/// Environment dependencies for the to-do reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for item creation timestamps
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// Reducer for the to-do list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decides which event, if any, a command produces
    fn decide(state: &TodoState, action: TodoAction, env: &TodoEnvironment) -> Option<TodoAction> {
        match action {
            TodoAction::AddTodo { text } => {
                if text.trim().is_empty() {
                    tracing::debug!("Ignoring blank todo text");
                    return None;
                }
                Some(TodoAction::TodoAdded {
                    id: state.next_id(),
                    text,
                    created_at: env.clock.now(),
                })
            },

            TodoAction::ToggleTodo { id } => {
                let Some(item) = state.get(id) else {
                    tracing::debug!(%id, "Ignoring toggle of unknown todo");
                    return None;
                };
                Some(TodoAction::TodoToggled {
                    id,
                    complete: !item.complete,
                })
            },

            TodoAction::DeleteTodo { id } => {
                if !state.exists(id) {
                    tracing::debug!(%id, "Ignoring delete of unknown todo");
                    return None;
                }
                Some(TodoAction::TodoDeleted { id })
            },

            TodoAction::ClearCompleted => {
                let ids: Vec<TodoId> = state
                    .items()
                    .iter()
                    .filter(|item| item.complete)
                    .map(|item| item.id)
                    .collect();
                if ids.is_empty() {
                    tracing::debug!("No completed todos to clear");
                    return None;
                }
                Some(TodoAction::CompletedCleared { ids })
            },

            TodoAction::ReorderTodo {
                source,
                destination,
            } => {
                if source == destination {
                    return None;
                }
                // Positions come from the full list even when a filter hides
                // some items.
                let (Some(from), Some(to)) = (state.position(source), state.position(destination))
                else {
                    tracing::debug!(%source, %destination, "Ignoring reorder with unknown todo");
                    return None;
                };
                Some(TodoAction::TodoMoved {
                    id: source,
                    from,
                    to,
                })
            },

            TodoAction::SetFilter { filter } => {
                (filter != state.filter()).then_some(TodoAction::FilterChanged { filter })
            },

            TodoAction::ToggleTheme => Some(TodoAction::ThemeChanged {
                theme: state.theme().toggled(),
            }),

            // Events decide themselves
            event => Some(event),
        }
    }

    /// Applies an event to state
    ///
    /// Returns false when nothing changed: the event no longer fits the state
    /// (replayed out of order, refers to a missing item or an id already
    /// issued) or it sets a value that is already current.
    fn apply_event(state: &mut TodoState, event: &TodoAction) -> bool {
        match event {
            TodoAction::TodoAdded {
                id,
                text,
                created_at,
            } => {
                // Ids below next_id were issued before, even if since deleted
                if id.get() < state.next_id || text.trim().is_empty() {
                    return false;
                }
                let Some(next_id) = id.get().checked_add(1) else {
                    return false;
                };
                state
                    .items
                    .push(TodoItem::new(*id, text.clone(), *created_at));
                state.next_id = next_id;
                true
            },
            TodoAction::TodoToggled { id, complete } => {
                match state.items.iter_mut().find(|item| item.id == *id) {
                    Some(item) if item.complete != *complete => {
                        item.complete = *complete;
                        true
                    },
                    _ => false,
                }
            },
            TodoAction::TodoDeleted { id } => {
                let before = state.items.len();
                state.items.retain(|item| item.id != *id);
                state.items.len() != before
            },
            TodoAction::CompletedCleared { ids } => {
                let before = state.items.len();
                state.items.retain(|item| !ids.contains(&item.id));
                state.items.len() != before
            },
            TodoAction::TodoMoved { id, from, to } => {
                let Some(current) = state.position(*id) else {
                    return false;
                };
                if current != *from || *to >= state.items.len() {
                    return false;
                }
                let item = state.items.remove(*from);
                state.items.insert(*to, item);
                true
            },
            TodoAction::FilterChanged { filter } => {
                if state.filter == *filter {
                    return false;
                }
                state.filter = *filter;
                true
            },
            TodoAction::ThemeChanged { theme } => {
                if state.theme == *theme {
                    return false;
                }
                state.theme = *theme;
                true
            },
            // Commands are not applied to state
            TodoAction::AddTodo { .. }
            | TodoAction::ToggleTodo { .. }
            | TodoAction::DeleteTodo { .. }
            | TodoAction::ClearCompleted
            | TodoAction::ReorderTodo { .. }
            | TodoAction::SetFilter { .. }
            | TodoAction::ToggleTheme => false,
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(event) = Self::decide(state, action, env) else {
            return SmallVec::new();
        };

        if Self::apply_event(state, &event) {
            state.bump_revision();
            tracing::debug!(
                event = event.event_type(),
                revision = state.revision(),
                "Applied event"
            );
        } else {
            tracing::debug!(event = event.event_type(), "Event did not apply to current state");
        }

        SmallVec::new()
    }
}
