//! Rewrite a customer-service reply in another style.
//!
//! Run with: cargo run --example translate

use promptline_core::config::{load_dotenv, PromptlineConfig};
use promptline_core::{ChatPromptTemplate, LlmChain, PromptValues, RemoteChatModel};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const TEMPLATE: &str = "Translate the text that is delimited by triple backticks into a style that is {style}. text: ```{text}```\n";

const SERVICE_REPLY: &str = "Hey there customer, the warranty does not cover cleaning expenses \
for your kitchen because it's your fault that you misused your blender by forgetting to put \
the lid on before starting the blender. Tough luck! See ya!\n";

const PIRATE_STYLE: &str = "a polite tone that speaks in English Pirate";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    load_dotenv(".env")?;

    let config = PromptlineConfig::from_env()?;
    let model = Arc::new(RemoteChatModel::from_config(&config)?.with_temperature(0.0));
    let chain = LlmChain::new(ChatPromptTemplate::from_template(TEMPLATE)?, model);

    let values = PromptValues::new()
        .set("style", PIRATE_STYLE)
        .set("text", SERVICE_REPLY);
    println!("{}", chain.invoke(&values).await?);
    Ok(())
}
