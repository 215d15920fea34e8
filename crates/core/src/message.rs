//! Prompt message and document types.
//!
//! These are the values handed to an external chat-completion client.
//! Unlike a conversation log they carry no ids or timestamps: the content of
//! a document is a pure function of what was assembled into it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The role of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions
    System,
    /// The model persona
    Assistant,
    /// The request itself
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Assistant => "assistant",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// An assembled few-shot prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDocument {
    /// Ordered messages: persona preamble, then the user request
    pub messages: Vec<PromptMessage>,

    /// How many exemplars made it into the prompt
    pub num_examples_used: usize,

    /// How many ranked exemplars were left out to respect the budget
    #[serde(default)]
    pub examples_dropped_for_budget: usize,
}

impl PromptDocument {
    /// True when the prompt carries no exemplars.
    pub fn is_zero_shot(&self) -> bool {
        self.num_examples_used == 0
    }

    /// SHA-256 over every (role, content) pair, hex encoded.
    ///
    /// Equal hashes mean byte-identical message content, which is what
    /// prompt caches and benchmark reproducibility checks key on.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for message in &self.messages {
            hasher.update(message.role.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(message.content.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }

    /// Serialize the message list as a JSON array of `{role, content}`.
    pub fn messages_to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.messages)
    }

    /// Parse a JSON array written by [`messages_to_json`](Self::messages_to_json).
    pub fn messages_from_json(json: &str) -> serde_json::Result<Vec<PromptMessage>> {
        serde_json::from_str(json)
    }
}
