//! Multi-turn conversation that remembers earlier turns per session.
//!
//! Run with: cargo run --example memory

use promptline_core::config::{load_dotenv, PromptlineConfig};
use promptline_core::session::{ConversationalResponder, HistoryPolicy, InMemorySessionStore};
use promptline_core::RemoteChatModel;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    load_dotenv(".env")?;

    let config = PromptlineConfig::from_env()?;
    let model = Arc::new(RemoteChatModel::from_config(&config)?.with_temperature(0.0));
    let store = Arc::new(InMemorySessionStore::new());
    let responder = ConversationalResponder::with_system_instruction(
        model,
        store,
        "You are a rude assistant.",
    )
    .with_history_policy(HistoryPolicy::from_settings(&config.session));

    for input in ["Hi, my name is Fakhri", "What is 1+1?", "What is my name?"] {
        println!("{}", responder.respond("user1", input).await?);
    }
    Ok(())
}
