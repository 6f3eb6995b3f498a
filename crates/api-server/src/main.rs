use anyhow::Result;
use api_server::{create_router, setup_app_state};
use clap::Parser;
use infrastructure::ServerConfig;
use infrastructure::database::redact;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tank inventory API server", long_about = None)]
struct Args {
    /// Directory holding default.toml and per-environment overrides
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Bind host, overrides the configuration
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides the configuration
    #[arg(long)]
    port: Option<u16>,

    /// Database URL, overrides DATABASE_URL and the configuration
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api_server=debug,application=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("🛢️  Tank Inventory API Starting...");

    let mut config = ServerConfig::load(&args.config_dir)?;
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    info!("Connecting to database {}...", redact(&config.database_url));
    let addr = config.bind_address();
    let state = setup_app_state(config).await?;
    info!("✅ Database ready");

    let app = create_router(state);

    info!("🚀 API Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
