use std::sync::Arc;

use anyhow::Context;
use tinyhttpd::config::Config;
use tinyhttpd::dispatch::Dispatcher;
use tinyhttpd::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let root = cfg
        .root
        .canonicalize()
        .with_context(|| format!("Cannot use {} as server root", cfg.root.display()))?;
    let content_types = Arc::new(cfg.content_type_table()?);
    let dispatcher = Arc::new(Dispatcher::new(&root, content_types).with_cgi_extension(&cfg.cgi_extension));

    tracing::info!("Serving {}", root.display());

    tokio::select! {
        res = server::listener::run(&cfg.listen_addr, dispatcher) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
