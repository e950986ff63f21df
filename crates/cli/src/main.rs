use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lina")]
#[command(about = "LINE assistant webhook gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the webhook gateway (POST /callback). Requires LINE_CHANNEL_ACCESS_TOKEN,
    /// LINE_CHANNEL_SECRET, and OPENAI_API_KEY in the environment or a .env file.
    Serve {
        /// HTTP port (default from LINA_PORT or 8000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send a push message to a LINE user id (fire-and-forget).
    Push {
        /// LINE user id to send to
        user_id: String,
        /// Message text
        message: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("lina {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { port }) => {
            if let Err(e) = run_serve(port).await {
                log::error!("serve failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Push { user_id, message }) => {
            if let Err(e) = run_push(&user_id, &message).await {
                log::error!("push failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = lib::config::Config::from_env()?;
    if let Some(p) = port {
        config.port = p;
    }
    log::info!("starting gateway on {}:{}", config.bind, config.port);
    lib::gateway::run_gateway(config).await
}

/// Push needs only the channel access token. Send failures are printed and
/// non-fatal; a missing token is a configuration error and exits non-zero.
async fn run_push(user_id: &str, message: &str) -> anyhow::Result<()> {
    let token = lib::config::required_var("LINE_CHANNEL_ACCESS_TOKEN")?;
    let base = std::env::var("LINE_API_BASE").ok();
    let client = lib::line::LineClient::new(token, base);
    match client.push_message(user_id, message).await {
        Ok(()) => println!("Successfully sent message to {}", user_id),
        Err(e) => println!("Failed to send message: {}", e),
    }
    Ok(())
}
