use std::env;
use std::path::PathBuf;

use crate::ai::prompt::DEFAULT_PERSONA;

/// Placeholder shipped in sample `.env` files
const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN_HERE";

#[derive(Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub ollama_url: String,
    pub ollama_binary: String,
    pub memory_file: PathBuf,
    pub persona: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| "TELEGRAM_BOT_TOKEN must be set".to_string())?;
        if telegram_bot_token.trim().is_empty() || telegram_bot_token == TOKEN_PLACEHOLDER {
            return Err(format!(
                "Please replace '{}' with your actual bot token from BotFather",
                TOKEN_PLACEHOLDER
            ));
        }

        Ok(Self {
            telegram_bot_token,
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string())
                .trim_end_matches('/')
                .to_string(),
            ollama_binary: env::var("OLLAMA_BIN").unwrap_or_else(|_| "ollama".to_string()),
            memory_file: env::var("MEMORY_FILE")
                .unwrap_or_else(|_| "bot_memory.txt".to_string())
                .into(),
            persona: load_persona(env::var("PERSONA_FILE").ok().map(PathBuf::from)),
        })
    }
}

/// Read the persona override, falling back to the built-in JARVIS text.
fn load_persona(path: Option<PathBuf>) -> String {
    let Some(path) = path else {
        return DEFAULT_PERSONA.to_string();
    };

    match std::fs::read_to_string(&path) {
        Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
        Ok(_) => {
            log::warn!("Persona file {} is empty, using default persona", path.display());
            DEFAULT_PERSONA.to_string()
        }
        Err(e) => {
            log::warn!(
                "Failed to read persona file {}: {}, using default persona",
                path.display(),
                e
            );
            DEFAULT_PERSONA.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_defaults_without_path() {
        assert_eq!(load_persona(None), DEFAULT_PERSONA);
    }

    #[test]
    fn test_persona_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.txt");
        std::fs::write(&path, "  You are a terse butler.\n").unwrap();
        assert_eq!(load_persona(Some(path)), "You are a terse butler.");
    }

    #[test]
    fn test_persona_falls_back_on_empty_or_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "\n\n").unwrap();
        assert_eq!(load_persona(Some(empty)), DEFAULT_PERSONA);
        assert_eq!(
            load_persona(Some(dir.path().join("missing.txt"))),
            DEFAULT_PERSONA
        );
    }
}
