use serde::{Deserialize, Serialize};

/// One past query in a session: created when the query starts, updated
/// when its answer arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Session-assigned id, starting at 1
    pub id: u64,

    /// Display label, derived from the id
    pub label: String,

    /// The queried URL
    pub url: String,

    /// The question asked
    pub question: String,

    /// The aggregated answer, once one arrived
    pub answer: Option<String>,

    /// Cleaned page text retained for re-display
    pub cleaned_text: Option<String>,
}

/// In-memory chat history for a single session.
///
/// Each session owns its own store; nothing namespaces records by
/// session, so sharing one store across sessions would mix their
/// histories. There is no eviction; the caller drops the store when the
/// session ends.
#[derive(Debug)]
pub struct SessionHistory {
    next_id: u64,
    records: Vec<ChatRecord>,
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHistory {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }

    /// Creates a record for a query that is about to run and returns its id
    pub fn new_chat(&mut self, url: &str, question: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(ChatRecord {
            id,
            label: format!("Chat {}", id),
            url: url.to_string(),
            question: question.to_string(),
            answer: None,
            cleaned_text: None,
        });
        id
    }

    /// Stores the answer (and retained page text) on an existing record.
    /// Returns false when the id is unknown.
    pub fn record_answer(&mut self, id: u64, answer: &str, cleaned_text: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.answer = Some(answer.to_string());
                record.cleaned_text = Some(cleaned_text.to_string());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u64) -> Option<&ChatRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ChatRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
