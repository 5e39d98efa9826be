use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tianji::api::{self, AppState};
use tianji::cli;
use tianji::config::Config;
use tianji::models::{Direction, UserInput};
use tianji::oracle::Oracle;
use tianji::provider::GeminiClient;
use tianji::zodiac::Zodiac;

#[derive(Parser)]
#[command(name = "tianji")]
#[command(about = "2026 丙午 zodiac readings from a generative-language provider")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for a reading and print the scroll
    Ask {
        /// Birth date, YYYY-MM-DD
        #[arg(short, long)]
        birthday: String,

        /// career, relationship or wealth (事业, 感情, 财运 also accepted)
        #[arg(short, long, default_value = "career")]
        direction: Direction,

        /// Save the scroll to a directory (defaults to the configured export dir)
        #[arg(short, long, num_args = 0..=1)]
        save: Option<Option<PathBuf>>,
    },
    /// Print the zodiac sign for a year
    Zodiac {
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

/// Initialize tracing with output to stderr (CLI commands) or stdout (server)
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tianji=info,tower_http=debug".into()),
    );

    if use_stderr {
        // Keep stdout for the reading itself
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn build_oracle(config: &Config) -> anyhow::Result<Oracle> {
    let client = GeminiClient::from_config(config).context("Failed to create provider client")?;
    Ok(Oracle::new(Arc::new(client), config.model.clone()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let use_stderr = !matches!(args.command, Commands::Serve { .. });
    init_tracing(use_stderr);

    match args.command {
        Commands::Ask {
            birthday,
            direction,
            save,
        } => {
            let config = Config::load().context("Failed to load configuration")?;
            let input = UserInput::new(birthday, direction);
            input.validate()?;
            let oracle = build_oracle(&config)?;
            let save_dir = save.map(|dir| dir.unwrap_or_else(|| config.export_dir.clone()));

            let reading = cli::ask(&oracle, input, save_dir.as_deref()).await?;
            println!("{}", reading.card);
            match reading.saved {
                Some(Ok(path)) => println!("已珍藏：{}", path.display()),
                Some(Err(e)) => eprintln!("{}", e.notice()),
                None => {}
            }
        }
        Commands::Zodiac { year } => {
            let sign = Zodiac::from_year(year);
            println!("{} ({})", sign.label(), sign.english_name());
        }
        Commands::Serve { port } => {
            let config = Config::load().context("Failed to load configuration")?;
            let oracle = build_oracle(&config)?;
            let app = api::create_router(AppState::new(oracle));

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!("Tianji listening on http://127.0.0.1:{}", port);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
