//! slate-tui - Terminal client for the production planner.
//!
//! Three views over the project task list (Gantt timeline, status board,
//! phase table) with full task CRUD. Data comes from the REST API when it
//! is reachable, otherwise from a persisted local snapshot or the built-in
//! demo dataset.

mod api;
mod app;
mod demo;
mod index;
mod models;
mod store;
mod theme;
mod timeline;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use app::App;
use store::{Store, StoreCommand, StoreMessage};

/// Frame rate for the event loop (also drives popup auto-dismiss).
const FRAME_DURATION: Duration = Duration::from_millis(66);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();

    // The only configuration: an optional API base URL argument.
    let args: Vec<String> = std::env::args().collect();
    let api_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or(api::DEFAULT_BASE_URL);

    run_tui(api_url).await
}

async fn run_tui(api_url: &str) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (msg_tx, mut msg_rx) = mpsc::channel::<StoreMessage>(32);
    let (cmd_tx, cmd_rx) = mpsc::channel::<StoreCommand>(32);

    let base_url = api_url.to_string();
    let worker = tokio::spawn(run_store_worker(base_url, msg_tx, cmd_rx));

    let mut app = App::new();
    let result = run_event_loop(&mut terminal, &mut app, &mut msg_rx, &cmd_tx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    worker.abort();

    result
}

/// The store worker: picks the backing store at startup, then serves
/// commands until shutdown. Mutation failures send an error message and
/// change nothing; successes carry the post-mutation dataset.
async fn run_store_worker(
    base_url: String,
    tx: mpsc::Sender<StoreMessage>,
    mut rx: mpsc::Receiver<StoreCommand>,
) {
    let opened = Store::open(&base_url, PathBuf::from(store::SNAPSHOT_FILE)).await;
    let mut store = opened.store;
    tx.send(StoreMessage::Loaded {
        mode: store.mode(),
        data: opened.data,
        selected_project: opened.selected_project,
    })
    .await
    .ok();

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StoreCommand::Refresh => match store.refresh().await {
                Ok(data) => {
                    tx.send(StoreMessage::Refreshed(data)).await.ok();
                }
                Err(e) => {
                    tx.send(StoreMessage::Error(format!("Refresh failed: {}", e)))
                        .await
                        .ok();
                }
            },
            StoreCommand::CreateTask(draft) => match store.create_task(draft).await {
                Ok((task, data)) => {
                    tx.send(StoreMessage::TaskCreated(task)).await.ok();
                    tx.send(StoreMessage::Refreshed(data)).await.ok();
                }
                Err(e) => {
                    tx.send(StoreMessage::Error(format!("Create task failed: {}", e)))
                        .await
                        .ok();
                }
            },
            StoreCommand::UpdateTask(id, draft) => match store.update_task(id, draft).await {
                Ok((task, data)) => {
                    tx.send(StoreMessage::TaskUpdated(task)).await.ok();
                    tx.send(StoreMessage::Refreshed(data)).await.ok();
                }
                Err(e) => {
                    tx.send(StoreMessage::Error(format!("Update task failed: {}", e)))
                        .await
                        .ok();
                }
            },
            StoreCommand::DeleteTask(id) => match store.delete_task(id).await {
                Ok(data) => {
                    tx.send(StoreMessage::TaskDeleted(id)).await.ok();
                    tx.send(StoreMessage::Refreshed(data)).await.ok();
                }
                Err(e) => {
                    tx.send(StoreMessage::Error(format!("Delete task failed: {}", e)))
                        .await
                        .ok();
                }
            },
            StoreCommand::SelectProject(project_id) => {
                store.select_project(project_id);
            }
            StoreCommand::Shutdown => break,
        }
    }
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    msg_rx: &mut mpsc::Receiver<StoreMessage>,
    cmd_tx: &mpsc::Sender<StoreCommand>,
) -> Result<()> {
    loop {
        app.tick();

        terminal.draw(|frame| ui::render(frame, app))?;

        // Drain store messages (non-blocking).
        while let Ok(msg) = msg_rx.try_recv() {
            app.handle_store_message(msg);
        }

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(cmd) = app.handle_key(key) {
                        cmd_tx.send(cmd).await.ok();
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
