//! Single-list to-do widget built on a reducer and an async store.
//!
//! The list keeps one ordered sequence of items. Users add items, mark them
//! complete, delete them, clear all completed ones, switch between the
//! all/active/completed views and reorder items by dragging one onto
//! another. The filtered view, the "items left" footer and the ids handed to
//! the drag collaborator are all derived from the sequence on demand.
//!
//! - [`types`]: items, filter, theme, state and the command/event enum
//! - [`reducer`]: command validation and event application
//! - [`drag`]: drag gesture to reorder command translation
//! - [`view`]: plain-text rendering
//! - [`command`] and [`config`]: the terminal front end's input and settings
//!
//! # Quick Start
//!
//! ```no_run
//! use todo_list::{TodoAction, TodoEnvironment, TodoId, TodoReducer, TodoState};
//! use todo_core::environment::SystemClock;
//! use todo_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::new(Arc::new(SystemClock));
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! store.send(TodoAction::AddTodo { text: "Buy milk".to_string() }).await?;
//! store.send(TodoAction::ToggleTodo { id: TodoId::new(1) }).await?;
//!
//! let label = store.state(TodoState::items_left_label).await;
//! println!("{label}");
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod drag;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use command::{Command, ParseCommandError};
pub use config::{Config, ConfigError};
pub use drag::DragEnd;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{Filter, Theme, TodoAction, TodoId, TodoItem, TodoState};
