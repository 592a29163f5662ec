//! Model listing and switching

use crate::ai::{OllamaClient, ERROR_PREFIX};
use crate::channels::types::Reply;

/// List the last-known models, marking the active one
pub fn list(ollama: &OllamaClient) -> Reply {
    let models = ollama.models();
    if models.is_empty() {
        return Reply::plain(format!(
            "{} No models available. Please install models first.",
            ERROR_PREFIX
        ));
    }

    let active = ollama.active_model();
    let mut message = String::from("📋 **Available Models:**\n\n");
    for (i, model) in models.iter().enumerate() {
        let marker = if active.as_ref() == Some(model) {
            " *(active)*"
        } else {
            ""
        };
        message.push_str(&format!("{}. `{}`{}\n", i + 1, model, marker));
    }

    Reply::markdown(message)
}

/// Switch the active model to `name`
pub fn switch(ollama: &OllamaClient, name: Option<&str>) -> Reply {
    let Some(name) = name else {
        return Reply::markdown("Usage: `/model <model_name>`");
    };

    match ollama.select_model(name) {
        Ok(model) => Reply::markdown(format!("✅ Active model switched to: `{}`", model)),
        Err(e) => Reply::plain(e.user_message()),
    }
}
