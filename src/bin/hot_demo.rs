//! Fetch the hot list once with the current config and print it as JSON.

use sinchew_hot::ingest::config::load_config_default;
use sinchew_hot::SinchewHotProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let provider = SinchewHotProvider::from_config(load_config_default()?)?;
    let (stage, items) = provider.fetch_with_stage().await;

    eprintln!("stage={} count={}", stage.as_str(), items.len());
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
