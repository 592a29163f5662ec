use dotenv::dotenv;
use std::sync::Arc;
use tokio::sync::oneshot;

mod ai;
mod channels;
mod commands;
mod config;
mod http;
mod memory;

use ai::OllamaClient;
use channels::MessageDispatcher;
use config::Config;
use memory::MemoryStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Initializing JARVIS...");
    let memory = Arc::new(MemoryStore::open(&config.memory_file));

    log::info!("Probing Ollama at {}", config.ollama_url);
    let ollama = Arc::new(OllamaClient::new(&config.ollama_url, &config.ollama_binary));
    if ollama.check_availability().await {
        log::info!("Loading AI models...");
        ollama.list_models().await;
    } else {
        log::warn!("Ollama not properly installed or not running");
    }

    let dispatcher = Arc::new(MessageDispatcher::new(
        memory,
        ollama,
        config.persona.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    match channels::start_telegram_listener(&config.telegram_bot_token, dispatcher, shutdown_rx)
        .await
    {
        Ok(()) => log::info!("JARVIS shutting down..."),
        Err(e) => {
            log::error!("JARVIS crashed: {}", e);
            std::process::exit(1);
        }
    }
}
