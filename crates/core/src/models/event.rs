use serde::{Deserialize, Serialize};

/// A file attached to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub size: u64,
}

/// Who sent a message, as far as gating predicates care.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub bot: bool,
    pub role_ids: Vec<u64>,
}

/// Platform-neutral view of a chat message handed to the log pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub author: Author,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
}

impl MessageEvent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_attachment(mut self, filename: &str, url: &str) -> Self {
        self.attachments.push(Attachment {
            filename: filename.to_string(),
            url: url.to_string(),
            size: 0,
        });
        self
    }
}
