// Terminal rendering of view events and lists.
// Transcript text goes to stdout; indicators and notices go to stderr.

use docchat::engine::state::AppState;
use docchat::{Message, Sender, SessionEntry, ViewEvent};

pub fn bubble(message: &Message) {
    match &message.timestamp {
        Some(ts) => println!("[{}] {}: {}", ts, message.sender.label(), message.text),
        None => println!("{}: {}", message.sender.label(), message.text),
    }
}

/// `interactive` suppresses echoing the user's own turns.
pub fn events(events: Vec<ViewEvent>, interactive: bool) {
    for event in events {
        match event {
            ViewEvent::Cleared if interactive => eprintln!("── new conversation ──"),
            ViewEvent::Replaced(transcript) if interactive => transcript.iter().for_each(bubble),
            ViewEvent::Appended(message) => {
                if !(interactive && message.sender == Sender::User) {
                    bubble(&message);
                }
            }
            ViewEvent::Spinner(true) => eprintln!("…"),
            ViewEvent::Busy(true) => eprintln!("Uploading…"),
            ViewEvent::ConnectionBanner(Some(text)) => eprintln!("[offline] {}", text),
            ViewEvent::ConnectionBanner(None) => eprintln!("[online]"),
            ViewEvent::TimeoutWarning(Some(text)) => eprintln!("! {}", text),
            ViewEvent::Notice(text) => eprintln!("{}", text),
            _ => {}
        }
    }
}

fn session_line(entry: &SessionEntry, current: bool) {
    let marker = if current { '*' } else { ' ' };
    println!("{} {}  {}", marker, entry.id, entry.display_name);
}

pub fn sessions(state: &AppState) {
    println!("Active:");
    for entry in &state.active {
        session_line(entry, state.is_current(&entry.id));
    }
    if !state.archived.is_empty() {
        println!("Archived:");
        for entry in &state.archived {
            session_line(entry, false);
        }
    }
}

pub fn groups(state: &AppState) {
    for group in &state.groups {
        let scoped = if state.selected_group_ids.contains(&group.id) { '*' } else { ' ' };
        println!("{} {:>4}  {}", scoped, group.id, group.name);
    }
}

pub fn files(state: &AppState) {
    for name in &state.known_files {
        println!("{}", name);
    }
}
