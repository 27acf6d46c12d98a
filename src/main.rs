mod app;
mod cli;
mod configuration;
mod rest;
mod store;
mod tracing;
mod types;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let app = app::App::from_cli()?;
    app.run().await
}
