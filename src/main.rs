mod config;
mod ledger;

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::prelude::*;

use config::Config;
use ledger::{InboundMessage, LedgerEngine, LedgerStore, TelegramClient};

struct BotState {
    engine: LedgerEngine,
    telegram: TelegramClient,
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ledgerbot.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("ledgerbot.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("Starting ledgerbot...");
    info!("Loaded config from {config_path}");
    if let Some(chat_id) = config.broadcast_chat_id {
        info!("Broadcasting recorded transactions to chat {chat_id}");
    }

    let bot = Bot::new(&config.telegram_bot_token);
    let store = LedgerStore::open(&config.db_path());
    let state = Arc::new(BotState {
        engine: LedgerEngine::new(store, config.broadcast_chat_id),
        telegram: TelegramClient::new(bot.clone()),
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let inbound = telegram_to_inbound(&msg, text);
    for reply in state.engine.handle(&inbound) {
        // Fire and forget: a failed send only loses that one reply.
        state.telegram.send_message(reply.chat_id, &reply.text).await.ok();
    }

    Ok(())
}

fn telegram_to_inbound(msg: &Message, text: &str) -> InboundMessage {
    let sender_name = msg
        .from
        .as_ref()
        .map(|u| u.first_name.clone())
        .unwrap_or_else(|| "unknown".to_string());

    InboundMessage {
        chat_id: msg.chat.id.0,
        sender_name,
        text: text.to_string(),
    }
}
