//! Append-only in-memory transcript

use eyre::Result;
use std::collections::HashSet;
use uuid::Uuid;

use super::message::ChatMessage;

/// Generates the identifier stamped on each appended message
pub type IdSource = Box<dyn FnMut() -> Uuid + Send>;

/// Ordered messages for one session; insertion order is display order
pub struct MessageStore {
    messages: Vec<ChatMessage>,
    ids: HashSet<Uuid>,
    next_id: IdSource,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::with_id_source(Box::new(Uuid::new_v4))
    }
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_source(next_id: IdSource) -> Self {
        Self {
            messages: Vec::new(),
            ids: HashSet::new(),
            next_id,
        }
    }

    /// Stamp a fresh identifier on `message` and append it, refusing a duplicate
    pub fn push(&mut self, mut message: ChatMessage) -> Result<()> {
        message.id = (self.next_id)();
        if !self.ids.insert(message.id) {
            eyre::bail!("Duplicate message id: {}", message.id);
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages appended at or after `from`
    pub fn since(&self, from: usize) -> &[ChatMessage] {
        &self.messages[from.min(self.messages.len())..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}
