//! One-shot board extraction driven by environment variables.
//!
//! Reads `API_URL`, `API_KEY`, and `BOARD_ID` (a `.env` file is honored),
//! extracts the full board, and writes the flattened records as a JSON array
//! to `<BOARD_ID>.json` in the current directory.
//!
//! ```text
//! API_URL=https://api.monday.com/v2 API_KEY=... BOARD_ID=1234567890 \
//!     cargo run --example extract_board
//! ```

use anyhow::Context;
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} environment variable not set"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_url = required_env("API_URL")?;
    let api_key = required_env("API_KEY")?;
    let board_id = required_env("BOARD_ID")?;

    let records = boarddown::extract_board(&api_url, &api_key, &board_id)
        .await
        .context("board extraction failed")?;

    let path = format!("{board_id}.json");
    let body = serde_json::to_string(&records).context("failed to serialize records")?;
    std::fs::write(&path, body).with_context(|| format!("failed to write {path}"))?;

    println!("Wrote {} records to {path}", records.len());
    Ok(())
}
