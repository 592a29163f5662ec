//! Telegram command handling

mod help;
mod memory;
mod models;
mod status;

use crate::ai::{OllamaClient, ERROR_PREFIX};
use crate::channels::types::Reply;
use crate::memory::MemoryStore;

/// Slash commands understood by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Welcome text: `/start`
    Start,
    /// Same as start: `/help`
    Help,
    /// Fresh availability probe and model listing: `/status`
    Status,
    /// Last-known models: `/models`
    Models,
    /// Switch the active model: `/model <name>`
    Model(Option<String>),
    /// Dump stored memories: `/memory`
    Memory,
    /// Wipe stored memories: `/forget`
    Forget,
    /// Anything else starting with `/`
    Unknown(String),
}

/// Parse a command from text. Returns `None` unless the text starts with `/`.
///
/// The command word is case-insensitive and a `@botname` suffix is ignored.
pub fn parse(text: &str) -> Option<Command> {
    let rest = text.trim().strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let word = parts.next().unwrap_or("");
    let command = word.split('@').next().unwrap_or(word).to_lowercase();
    let args: Vec<&str> = parts.collect();

    log::debug!("Telegram commands: Parsing '{}' -> {} {:?}", text, command, args);

    let parsed = match command.as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "status" => Command::Status,
        "models" => Command::Models,
        "model" => Command::Model(if args.is_empty() {
            None
        } else {
            Some(args.join(" "))
        }),
        "memory" => Command::Memory,
        "forget" => Command::Forget,
        _ => Command::Unknown(command),
    };
    Some(parsed)
}

/// Execute a command and return the replies to send
pub async fn execute(cmd: Command, memory: &MemoryStore, ollama: &OllamaClient) -> Vec<Reply> {
    match cmd {
        Command::Start | Command::Help => vec![help::execute()],
        Command::Status => vec![status::execute(memory, ollama).await],
        Command::Models => vec![models::list(ollama)],
        Command::Model(name) => vec![models::switch(ollama, name.as_deref())],
        Command::Memory => memory::show(memory),
        Command::Forget => vec![memory::forget(memory)],
        Command::Unknown(name) => vec![Reply::plain(format!(
            "{} Unknown command /{}. Use /help to see what I can do.",
            ERROR_PREFIX, name
        ))],
    }
}
