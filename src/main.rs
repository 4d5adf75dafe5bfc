use anyhow::Context;
use clap::Parser;

use blogs_api::{Config, Server, api};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.setup_logging();

    let app = config.build_app().context("failed to prepare the blog store")?;
    let router = api::routes(app.into_shared());

    Server::bind(config.addr)
        .serve(router)
        .await
        .with_context(|| format!("server on {} failed", config.addr))
}
