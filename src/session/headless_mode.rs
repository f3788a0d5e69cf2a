//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::ui::UIConfig;
use crate::ui::dashboard::DashboardState;
use std::error::Error;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs the application in headless mode
///
/// Events are applied to a dashboard state that is never drawn, so live values and
/// chart updates go through the same path as in the TUI. Every displayable log entry
/// is printed to the console.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting(
        "headless",
        &session.config.api_url,
        &session.config.hub_url,
    );

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();
    let mut state = DashboardState::new(
        Instant::now(),
        UIConfig::new(
            false,
            session.config.api_url.clone(),
            session.config.hub_url.clone(),
        ),
    );

    // Event loop: log events to console until shutdown
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                state.add_event(event);
                state.update();
                for entry in state.take_new_log_entries() {
                    if entry.should_display() {
                        println!("{}", entry);
                    }
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    print_session_shutdown();
    session.cancel.cancel();
    join_background_tasks(session.event_receiver, session.join_handles).await;
    print_session_exit_success();

    Ok(())
}

/// Waits for the background tasks after closing their event queue.
///
/// Nothing reads events once the loop has stopped, so a task blocked on a full
/// queue only finishes after the receiver is gone.
async fn join_background_tasks<T>(
    event_receiver: mpsc::Receiver<T>,
    handles: Vec<JoinHandle<()>>,
) {
    drop(event_receiver);
    for handle in handles {
        let _ = handle.await;
    }
}
