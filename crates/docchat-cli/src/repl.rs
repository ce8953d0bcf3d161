// Interactive chat loop.
//
// One task, three event sources multiplexed with select!:
//   stdin lines       → parse_line → dispatch
//   transport events  → on_transport_event
//   guard deadline    → check_timeout
// A failed connect leaves the loop running offline; session and group
// commands still work over HTTP.

use crate::{render, save_export};
use docchat::commands::{self, Action, Outcome, CONFIRM_FLAG};
use docchat::{ChatClient, ClientConfig, ClientResult, HttpBackend, TransportEvent};
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};

async fn next_event(events: &mut Option<UnboundedReceiver<TransportEvent>>) -> Option<TransportEvent> {
    match events.as_mut() {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn deadline_reached(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

pub async fn run(
    client: &mut ChatClient<HttpBackend>,
    config: &ClientConfig,
    session: Option<String>,
) -> ClientResult<()> {
    let ws_url = config.ws_url()?;
    let mut events = client.connect(&ws_url).await.ok();
    if events.is_some() {
        info!("[repl] Connected to {}", ws_url);
    }

    if let Err(e) = client.list_sessions().await {
        client.surface(&e);
    }
    if let Some(id) = session {
        if let Err(e) = client.select_session(&id).await {
            client.surface(&e);
        }
    }
    render::events(client.drain_events(), true);
    eprintln!("Type a message, or /help for commands. Ctrl-D quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = client.pending_deadline();
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle_line(client, config, &line).await,
                None => break,
            },
            event = next_event(&mut events) => match event {
                Some(event) => client.on_transport_event(event),
                None => {
                    debug!("[repl] Transport event stream ended");
                    events = None;
                }
            },
            _ = deadline_reached(deadline) => {
                client.check_timeout(Instant::now());
            }
        }
        render::events(client.drain_events(), true);
    }
    Ok(())
}

async fn handle_line(client: &mut ChatClient<HttpBackend>, config: &ClientConfig, line: &str) {
    let action = match commands::parse_line(line) {
        Ok(Some(action)) => action,
        Ok(None) => return,
        Err(e) => return client.surface(&e),
    };
    let listing = action.clone();

    match commands::dispatch(client, action, Instant::now()).await {
        Ok(Outcome::Done) => match listing {
            Action::ListSessions => render::sessions(client.state()),
            Action::ListGroups => render::groups(client.state()),
            Action::ListFiles => render::files(client.state()),
            _ => {}
        },
        Ok(Outcome::Exported(file)) => match save_export(&config.export_dir, &file) {
            Ok(path) => client.state_mut().view.notice(format!("Saved {}", path.display())),
            Err(e) => client.surface(&e),
        },
        Ok(Outcome::NeedsConfirmation(prompt)) => {
            client.state_mut().view.notice(format!("{} Repeat with {} to confirm.", prompt, CONFIRM_FLAG))
        }
        Ok(Outcome::Help) => println!("{}", commands::help_text()),
        Err(e) => client.surface(&e),
    }
}
