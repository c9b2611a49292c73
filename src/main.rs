// Stock Scraper batch entry point

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let summary = stock_scraper_lib::run().await.context("batch aborted")?;

    if summary.failed > 0 || summary.sink_failures > 0 {
        tracing::warn!(
            "Batch {} finished with {} failed symbols and {} sink failures",
            summary.run_id,
            summary.failed,
            summary.sink_failures
        );
    }

    Ok(())
}
