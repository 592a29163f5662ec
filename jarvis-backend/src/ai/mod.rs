pub mod ollama;
pub mod prompt;
pub mod types;

#[cfg(test)]
pub mod test_server;

pub use ollama::OllamaClient;
pub use prompt::build_prompt;
pub use types::ERROR_PREFIX;
