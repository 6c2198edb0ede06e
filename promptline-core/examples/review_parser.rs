//! Pull typed fields out of a free-form product review.
//!
//! Run with: cargo run --example review_parser

use promptline_core::config::{load_dotenv, PromptlineConfig};
use promptline_core::extract::{ExtractionSchema, FieldKind, StructuredExtractor};
use promptline_core::RemoteChatModel;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const REVIEW: &str = "This leaf blower is pretty amazing.  It has four settings: candle blower, \
gentle breeze, windy city, and tornado. It arrived in two days, just in time for my wife's \
anniversary present. I think my wife liked it so much she was speechless. So far I've been \
the only one using it, and I've been using it every other morning to clear the leaves on our \
lawn. It's slightly more expensive than the other leaf blowers out there, but I think it's \
worth it for the extra features.\n";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    load_dotenv(".env")?;

    let config = PromptlineConfig::from_env()?;
    let model = Arc::new(
        RemoteChatModel::from_config(&config)?
            .with_temperature(0.0)
            .with_json_mode(),
    );

    let schema = ExtractionSchema::new()
        .field(
            "gift",
            FieldKind::Boolean,
            "Was the item purchased as a gift for someone else? Answer True if yes, False if not or unknown.",
        )
        .field(
            "delivery_days",
            FieldKind::Integer { sentinel: Some(-1) },
            "How many days did it take for the product to arrive? If this information is not found, output -1.",
        )
        .field(
            "price_value",
            FieldKind::TextList,
            "Extract any sentences about the value or price, and output them as a comma separated Python list.",
        );

    let record = StructuredExtractor::new(model)?.extract(REVIEW, &schema).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    println!("gift: {}", record["gift"]);
    Ok(())
}
