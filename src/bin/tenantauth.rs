use anyhow::Result;
use tenantauth::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // The guard flushes exported spans on every return path, errors included.
    let (action, _telemetry) = cli::start()?;

    action.execute().await
}
