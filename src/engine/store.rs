// DocChat Engine — Session Store
// In-memory transcript cache keyed by session id.

use crate::atoms::types::Message;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SessionStore {
    transcripts: HashMap<String, Vec<Message>>,
}

impl SessionStore {
    /// Start an empty transcript (used for locally created sessions).
    pub fn init(&mut self, session_id: &str) {
        self.transcripts.insert(session_id.to_string(), Vec::new());
    }

    pub fn get(&self, session_id: &str) -> Option<&[Message]> {
        self.transcripts.get(session_id).map(Vec::as_slice)
    }

    pub fn replace(&mut self, session_id: &str, transcript: Vec<Message>) {
        self.transcripts.insert(session_id.to_string(), transcript);
    }

    pub fn append(&mut self, session_id: &str, message: Message) {
        self.transcripts.entry(session_id.to_string()).or_default().push(message);
    }

    pub fn remove(&mut self, session_id: &str) {
        self.transcripts.remove(session_id);
    }
}
