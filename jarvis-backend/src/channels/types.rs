use crate::commands::Command;

/// What an incoming chat text turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// A `/command`
    Command(Command),
    /// A "remember this:" directive with the text after the marker, trimmed
    Remember(String),
    /// Anything else, relayed to the inference backend
    Chat(String),
}

/// One outbound chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Send with Telegram's legacy Markdown parse mode
    pub markdown: bool,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: false,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: true,
        }
    }
}

/// Messages to deliver, in order, for one incoming text
#[derive(Debug, Clone, Default)]
pub struct DispatchResult {
    pub replies: Vec<Reply>,
}

impl DispatchResult {
    pub fn single(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
        }
    }

    pub fn many(replies: Vec<Reply>) -> Self {
        Self { replies }
    }
}
