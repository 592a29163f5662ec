use crate::channels::dispatcher::MessageDispatcher;
use crate::channels::types::{Incoming, Reply};
use crate::channels::util::preview;
use std::sync::Arc;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatAction, ChatId, ParseMode};
use tokio::sync::oneshot;

/// Commands shown in Telegram's command menu
fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Show the welcome message"),
        BotCommand::new("status", "Check system status"),
        BotCommand::new("models", "List available AI models"),
        BotCommand::new("model", "Switch AI model"),
        BotCommand::new("memory", "View stored memories"),
        BotCommand::new("forget", "Clear all memories"),
    ]
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<MessageDispatcher>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let user_name = msg
        .from()
        .map(|u| u.first_name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    log::info!(
        "Telegram: Message from {} in chat {}: {}",
        user_name,
        msg.chat.id.0,
        preview(text, 50)
    );

    let incoming = dispatcher.classify(text);

    if matches!(incoming, Incoming::Chat(_)) && dispatcher.ollama().is_ready() {
        if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
            log::warn!("Telegram: Failed to send typing indicator: {}", e);
        }
    }

    let result = dispatcher.dispatch(incoming).await;

    for reply in result.replies {
        send_reply(&bot, msg.chat.id, reply).await;
    }

    Ok(())
}

/// Send one reply. Markdown the server cannot parse is resent as plain text.
async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) {
    if reply.markdown {
        // Legacy Markdown matches the `**`-style texts; MarkdownV2 would need escaping
        #[allow(deprecated)]
        let mode = ParseMode::Markdown;
        match bot
            .send_message(chat_id, reply.text.clone())
            .parse_mode(mode)
            .await
        {
            Ok(_) => return,
            Err(e) => log::warn!("Telegram: Markdown reply rejected ({}), resending as plain text", e),
        }
    }

    if let Err(e) = bot.send_message(chat_id, reply.text).await {
        log::error!("Failed to send Telegram message: {}", e);
    }
}

/// Start the Telegram long-polling listener and run until shutdown
pub async fn start_telegram_listener(
    bot_token: &str,
    dispatcher: Arc<MessageDispatcher>,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), String> {
    let bot = Bot::new(bot_token);

    // Fails fast on a bad token
    let me = bot
        .get_me()
        .await
        .map_err(|e| format!("Telegram authentication failed: {}", e))?;
    log::info!("Telegram: Bot connected as {}", me.user.first_name);

    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        log::warn!("Telegram: Failed to register command menu: {}", e);
    }

    let handler = Update::filter_message().endpoint(handle_message);

    let mut telegram = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .default_handler(|_| async {})
        .build();

    let shutdown_token = telegram.shutdown_token();
    tokio::spawn(async move {
        if shutdown_rx.await.is_ok() {
            log::info!("Telegram listener received shutdown signal");
            if let Err(e) = shutdown_token.shutdown() {
                log::warn!("Telegram listener was not running: {}", e);
            }
        }
    });

    log::info!("JARVIS is now online...");
    telegram.dispatch().await;
    log::info!("Telegram listener stopped");

    Ok(())
}
