use serde::{Deserialize, Serialize};

/// One indexed record, materialized from a single Parquet row.
///
/// Only `message`, `tag`, `sender` and `event` are tokenized. The remaining
/// string fields are carried as opaque payload and returned with search
/// results untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub message: String,
    pub message_raw: String,
    pub structured_data: String,
    pub tag: String,
    pub sender: String,
    pub groupings: String,
    pub event: String,
    #[serde(rename = "eventID")]
    pub event_id: String,
    /// Nanoseconds since the Unix epoch, `0` when the source row had none.
    pub timestamp: i64,
    pub namespace: String,
}

impl Document {
    /// Creates a document with only an id and a message; handy for direct injection.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// The text that feeds the inverted index.
    pub fn tokenizable_text(&self) -> String {
        let mut text = String::with_capacity(
            self.message.len() + self.tag.len() + self.sender.len() + self.event.len() + 3,
        );
        text.push_str(&self.message);
        text.push(' ');
        text.push_str(&self.tag);
        text.push(' ');
        text.push_str(&self.sender);
        text.push(' ');
        text.push_str(&self.event);
        text
    }
}
