//! Domain types for the to-do list.
//!
//! The list is a single ordered sequence of items. Everything the widget
//! shows (the filtered view, the "items left" footer, the ids handed to the
//! drag collaborator) is derived from that sequence on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use todo_macros::{Action, State};

/// Unique identifier for a todo item
///
/// Ids are positive and issued in increasing order by the list itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Text as submitted by the user
    pub text: String,
    /// Whether the todo is completed
    pub complete: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Creates a new, incomplete todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            complete: false,
            created_at,
        }
    }
}

/// Error returned when parsing a [`Filter`] or [`Theme`] from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseChoiceError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// View selector: which items the list displays
///
/// The filter never changes which items are stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items
    Completed,
}

impl Filter {
    /// All filters in footer order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Returns true if `item` passes this filter
    #[must_use]
    pub const fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.complete,
            Self::Completed => item.complete,
        }
    }

    /// Lowercase name used in the footer and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseChoiceError {
                kind: "filter",
                value: value.to_string(),
                expected: "all, active, completed",
            })
    }
}

/// Color scheme of the widget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    /// Light background (initial theme)
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        [Self::Light, Self::Dark]
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseChoiceError {
                kind: "theme",
                value: value.to_string(),
                expected: "light, dark",
            })
    }
}

/// State of the to-do list
///
/// `items` is the single source of truth; its order is the display order.
/// Fields are not public outside this crate, and the state cannot be
/// deserialized, so the id invariants (distinct ids, `next_id` above every id
/// ever issued) only change through the reducer.
#[derive(State, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TodoState {
    pub(crate) items: Vec<TodoItem>,
    pub(crate) next_id: u64,
    pub(crate) filter: Filter,
    pub(crate) theme: Theme,
    #[revision]
    revision: u64,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoState {
    /// Creates an empty list showing all items in the light theme
    #[must_use]
    pub const fn new() -> Self {
        Self::with_preferences(Filter::All, Theme::Light)
    }

    /// Creates an empty list with an initial filter and theme
    #[must_use]
    pub const fn with_preferences(filter: Filter, theme: Theme) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            filter,
            theme,
            revision: 0,
        }
    }

    /// All items in display order, regardless of the filter
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Number of stored items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list holds no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The id the next added item will receive
    #[must_use]
    pub const fn next_id(&self) -> TodoId {
        TodoId(self.next_id)
    }

    /// The active filter
    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    /// The active theme
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Position of a todo in the full list
    #[must_use]
    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.position(id).is_some()
    }

    /// Items passing the active filter, in list order
    ///
    /// Recomputed on every call.
    pub fn visible_items(&self) -> impl Iterator<Item = &TodoItem> + '_ {
        let filter = self.filter;
        self.items.iter().filter(move |item| filter.matches(item))
    }

    /// Ids of the visible items, in order
    ///
    /// This is the sequence handed to the drag collaborator.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<TodoId> {
        self.visible_items().map(|item| item.id).collect()
    }

    /// Number of items not yet completed, over the full list
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.items.iter().filter(|item| !item.complete).count()
    }

    /// Number of completed items, over the full list
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items.len() - self.remaining_count()
    }

    /// Footer text: `"1 item left"` or `"N items left"`
    #[must_use]
    pub fn items_left_label(&self) -> String {
        match self.remaining_count() {
            1 => "1 item left".to_string(),
            n => format!("{n} items left"),
        }
    }
}

/// Actions representing commands and events for the to-do list
///
/// Commands are what the UI asks for. The reducer checks them against the
/// current state and, when they would change something, turns them into the
/// matching event and applies it. Commands that would change nothing (blank
/// text, unknown id, dropping an item on itself) are absorbed without an
/// event.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Append a new item
    #[command]
    AddTodo {
        /// Text as typed by the user
        text: String,
    },

    /// Command: Flip an item's completion flag
    #[command]
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Remove an item
    #[command]
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Command: Remove every completed item
    #[command]
    ClearCompleted,

    /// Command: Move `source` to the position currently held by `destination`
    #[command]
    ReorderTodo {
        /// Item being dragged
        source: TodoId,
        /// Item it was dropped on
        destination: TodoId,
    },

    /// Command: Change the view filter
    #[command]
    SetFilter {
        /// Filter to show
        filter: Filter,
    },

    /// Command: Switch between light and dark theme
    #[command]
    ToggleTheme,

    // ========== Events ==========
    /// Event: Item was appended
    #[event]
    TodoAdded {
        /// Assigned identifier
        id: TodoId,
        /// Item text
        text: String,
        /// When the item was created
        created_at: DateTime<Utc>,
    },

    /// Event: Item completion flag changed
    #[event]
    TodoToggled {
        /// Todo identifier
        id: TodoId,
        /// New value of the flag
        complete: bool,
    },

    /// Event: Item was removed
    #[event]
    TodoDeleted {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: Completed items were removed
    #[event]
    CompletedCleared {
        /// Ids removed, in list order
        ids: Vec<TodoId>,
    },

    /// Event: Item was moved within the full list
    #[event]
    TodoMoved {
        /// Todo identifier
        id: TodoId,
        /// Index before the move
        from: usize,
        /// Index after the move
        to: usize,
    },

    /// Event: View filter changed
    #[event]
    FilterChanged {
        /// New filter
        filter: Filter,
    },

    /// Event: Theme changed
    #[event]
    ThemeChanged {
        /// New theme
        theme: Theme,
    },
}
