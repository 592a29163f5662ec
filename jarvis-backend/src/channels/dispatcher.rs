use crate::ai::{build_prompt, OllamaClient, ERROR_PREFIX};
use crate::channels::types::{DispatchResult, Incoming, Reply};
use crate::channels::util::{split_message, GENERATED_REPLY_LIMIT};
use crate::commands;
use crate::memory::MemoryStore;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Case-insensitive marker that turns a message into a memory
static REMEMBER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)remember this:").expect("valid remember marker"));

/// Dispatcher routes chat text to commands, the memory store, or the AI.
///
/// This is the one context object every handler receives; the memory blob and the
/// active model are only reachable through the store and client it owns.
pub struct MessageDispatcher {
    memory: Arc<MemoryStore>,
    ollama: Arc<OllamaClient>,
    persona: String,
}

impl MessageDispatcher {
    pub fn new(memory: Arc<MemoryStore>, ollama: Arc<OllamaClient>, persona: String) -> Self {
        Self {
            memory,
            ollama,
            persona,
        }
    }

    pub fn ollama(&self) -> &OllamaClient {
        &self.ollama
    }

    /// Decide what an incoming text is without acting on it
    pub fn classify(&self, text: &str) -> Incoming {
        if let Some(cmd) = commands::parse(text) {
            return Incoming::Command(cmd);
        }

        if let Some(marker) = REMEMBER_MARKER.find(text) {
            return Incoming::Remember(text[marker.end()..].trim().to_string());
        }

        Incoming::Chat(text.to_string())
    }

    /// Handle a classified message and return the replies to deliver
    pub async fn dispatch(&self, incoming: Incoming) -> DispatchResult {
        match incoming {
            Incoming::Command(cmd) => {
                DispatchResult::many(commands::execute(cmd, &self.memory, &self.ollama).await)
            }
            Incoming::Remember(body) => self.handle_remember(&body),
            Incoming::Chat(text) => self.handle_chat(&text).await,
        }
    }

    fn handle_remember(&self, body: &str) -> DispatchResult {
        if body.is_empty() {
            return DispatchResult::single(Reply::plain(
                "🧠 Remember what, exactly? Say 'remember this: [info]'.",
            ));
        }

        let reply = match self.memory.append(body) {
            Ok(_) => Reply::plain(
                "🧠 Noted and filed away in my memory banks. I won't forget this one.",
            ),
            Err(_) => Reply::plain(format!(
                "{} Memory storage failed. That's... concerning.",
                ERROR_PREFIX
            )),
        };
        DispatchResult::single(reply)
    }

    async fn handle_chat(&self, text: &str) -> DispatchResult {
        if !self.ollama.is_ready() {
            return DispatchResult::single(Reply::plain(format!(
                "{} My AI core is offline. Use /status to check the situation.",
                ERROR_PREFIX
            )));
        }

        let prompt = build_prompt(&self.persona, &self.memory.snapshot(), text);
        let response = match self.ollama.generate(&prompt, None).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Generation failed: {}", e);
                e.user_message()
            }
        };

        DispatchResult::many(
            split_message(&response, GENERATED_REPLY_LIMIT)
                .into_iter()
                .map(Reply::plain)
                .collect(),
        )
    }
}
