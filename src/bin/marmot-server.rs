use clap::Parser;
use marmot::{server, Config, Mode};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    config.validate()?;

    info!(
        "marmot-server version: {}, starting {} node on port {}",
        env!("CARGO_PKG_VERSION"),
        config.node_type,
        config.port
    );
    if config.node_type == Mode::Leader {
        info!(
            "Write quorum: {} of {} followers",
            config.write_quorum,
            config.followers.len()
        );
        info!(
            "Delay range: {:.0}ms - {:.0}ms",
            config.min_delay * 1000.0,
            config.max_delay * 1000.0
        );
    }

    server::run(config).await
}
