//! Tool-augmented assistant with Wikipedia lookup.
//!
//! Run with: cargo run --example agent

use promptline_core::config::{load_dotenv, PromptlineConfig};
use promptline_core::tools::{ToolRegistry, WikipediaSearch};
use promptline_core::{RemoteChatModel, ToolAugmentedResponder};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SYSTEM: &str = "You are a helpful AI assistant named AnjingPintar with access to Wikipedia search tool.

When users ask about factual information, people, places, events, or things, use the search_wikipedia tool to get accurate information.

Always provide clear and informative responses based on the tool results.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    load_dotenv(".env")?;

    let config = PromptlineConfig::from_env()?;
    let model = Arc::new(RemoteChatModel::from_config(&config)?.with_temperature(0.9));
    let tools = ToolRegistry::new().with_tool(WikipediaSearch::new(reqwest::Client::new()));
    let agent = ToolAugmentedResponder::with_system_instruction(model, tools, SYSTEM)
        .with_settings(config.agent.clone());

    let exchange = agent
        .respond_traced("Hello, who are you? I want to ask, Who is Albert Einstein?")
        .await?;

    for invocation in &exchange.tool_invocations {
        println!("Tool called: {}", invocation.call.name());
        println!("Arguments: {}", invocation.call.function.arguments);
        println!("Tool result:\n{}\n", invocation.outcome.render());
    }
    println!("Final answer: {}", exchange.answer);
    Ok(())
}
