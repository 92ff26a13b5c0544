//! uastgate CLI - serve the UAST gateway, or use its detector locally

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uastgate::config::{self, ServerConfig, UastgateConfig};
use uastgate::language::{LanguageDetector, LANGUAGES};
use uastgate::ui::{self, Icons};

#[derive(Parser)]
#[command(name = "uastgate")]
#[command(version)]
#[command(about = "HTTP gateway for language detection, UAST parsing and tree filtering")]
#[command(long_about = r#"
uastgate sits in front of a UAST service and exposes:
  • GET  /get-languages   known languages and their categories
  • POST /detect-lang     language detection for a snippet
  • POST /parse           parse a snippet into a UAST
  • POST /filter          path queries over encoded tree batches

Example usage:
  uastgate init
  uastgate serve --uast-url http://127.0.0.1:9432
  uastgate detect ./src/main.go
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Base URL of the UAST service
        #[arg(short, long, env = "UASTGATE_UAST_URL")]
        uast_url: Option<String>,

        /// Timeout for each UAST service call, in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Detect the language of a file
    Detect {
        /// File to classify
        file: PathBuf,
    },

    /// List the known languages
    Languages,

    /// Write a default config file
    Init {
        /// Where to write the config
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { config: config_path, host, port, uast_url, timeout_secs } => {
            let file_config = config::load_config(config_path.as_deref())?;
            if file_config.is_none() {
                tracing::debug!("No config file found, using defaults and flags");
            }

            let overrides = UastgateConfig { host, port, uast_url, timeout_secs };
            let server_config = ServerConfig::resolve(file_config, overrides);

            ui::header(&format!("uastgate listening on {}:{}", server_config.host, server_config.port));
            ui::info("UAST service", &server_config.uast_url);
            uastgate::server::start_server(&server_config).await?;
        }

        Commands::Detect { file } => {
            let content = std::fs::read_to_string(&file)?;
            let detector = LanguageDetector::new();
            let filename = file.file_name().and_then(|s| s.to_str());
            let language = detector.detect(&content, filename);

            if language.is_unknown() {
                ui::error(&format!("Could not determine the language of {}", file.display()));
                anyhow::bail!("language undetermined");
            }

            println!("{} {} ({})", Icons::FILE, language.name, language.category);
        }

        Commands::Languages => {
            ui::section("Known languages");
            println!("{}", ui::languages_table(LANGUAGES));
        }

        Commands::Init { path, force } => {
            let path = path.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &UastgateConfig::defaults(), force)?;
            ui::success(&format!("{} Wrote {}", Icons::GEAR, path.display()));
        }
    }

    Ok(())
}
