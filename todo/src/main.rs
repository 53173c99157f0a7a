//! Terminal front end for the to-do list.
//!
//! Reads one command per line from stdin, sends it to the store and prints
//! the list again whenever it changed. Logs go to stderr.

use anyhow::Context;
use std::io::Write;
use std::sync::Arc;
use todo_core::environment::SystemClock;
use todo_runtime::{Store, StoreConfig};
use todo_list::command::USAGE;
use todo_list::{Command, Config, TodoEnvironment, TodoReducer, TodoState, view};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type TodoStore = Store<TodoState, todo_list::TodoAction, TodoEnvironment, TodoReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(theme = %config.theme, filter = %config.filter, "Starting to-do list");

    let store: TodoStore = Store::with_config(
        TodoState::with_preferences(config.filter, config.theme),
        TodoReducer::new(),
        TodoEnvironment::new(Arc::new(SystemClock)),
        StoreConfig::default().with_shutdown_timeout(config.shutdown_timeout),
    );

    print!("{}", store.state(view::render).await);
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{USAGE}"),
            Command::List => print!("{}", store.state(view::render).await),
            Command::Dispatch(action) => dispatch(&store, action).await?,
            Command::Drag(drag) => {
                let visible = store.state(TodoState::visible_ids).await;
                match drag.into_action(&visible) {
                    Some(action) => dispatch(&store, action).await?,
                    None => tracing::debug!(?drag, "Drag ignored"),
                }
            }
        }
    }

    tracing::info!("Shutting down");
    store.shutdown_default().await.context("store did not shut down cleanly")?;
    Ok(())
}

/// Sends `action` and re-renders if the state changed
async fn dispatch(store: &TodoStore, action: todo_list::TodoAction) -> anyhow::Result<()> {
    let before = store.state(TodoState::revision).await;
    store.send(action).await.context("store rejected action")?;

    let (after, rendered) = store.state(|s| (s.revision(), view::render(s))).await;
    if after == before {
        tracing::debug!("Nothing changed");
    } else {
        print!("{rendered}");
    }
    Ok(())
}

fn prompt() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}
