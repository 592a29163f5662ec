//! Status command - probes the backend and reports what is loaded

use crate::ai::OllamaClient;
use crate::channels::types::Reply;
use crate::memory::MemoryStore;

/// Model names listed before the rest are summarised
const MAX_LISTED_MODELS: usize = 5;

/// Execute the status command
pub async fn execute(memory: &MemoryStore, ollama: &OllamaClient) -> Reply {
    if ollama.check_availability().await {
        ollama.list_models().await;
    }

    let models = ollama.models();
    let active = ollama
        .active_model()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "None".to_string());

    let mut message = format!(
        "🔍 **System Status**\n\n\
        Ollama: {}\n\
        Available Models: {}\n\
        Active Model: {}\n\
        Memory Entries: {}\n",
        if ollama.availability().is_available() {
            "✅ Online"
        } else {
            "❌ Offline"
        },
        models.len(),
        active,
        memory.entry_count(),
    );

    if !models.is_empty() {
        message.push_str("\n**Models:**\n");
        for model in models.iter().take(MAX_LISTED_MODELS) {
            message.push_str(&format!("• {}\n", model));
        }
        if models.len() > MAX_LISTED_MODELS {
            message.push_str(&format!(
                "... and {} more",
                models.len() - MAX_LISTED_MODELS
            ));
        }
    }

    Reply::markdown(message)
}
