//! Feed the head of a product table into a single-prompt chain.
//!
//! Run with: cargo run --example product_chain

use promptline_core::chain::TableSnapshot;
use promptline_core::config::{load_dotenv, PromptlineConfig};
use promptline_core::{ChatPromptTemplate, LlmChain, PromptValues, RemoteChatModel};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    load_dotenv(".env")?;

    let config = PromptlineConfig::from_env()?;
    let model = Arc::new(RemoteChatModel::from_config(&config)?.with_temperature(0.9));
    let prompt = ChatPromptTemplate::from_template(
        "What is the best name to describe a company that makes {product}?",
    )?;
    let chain = LlmChain::new(prompt, model);

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/Product.csv");
    let products = TableSnapshot::from_csv_path(path, TableSnapshot::HEAD_ROWS)?;

    let answer = chain.invoke(&PromptValues::new().set("product", &products)).await?;
    println!("{answer}");
    Ok(())
}
