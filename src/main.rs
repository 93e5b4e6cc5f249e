//! HTTP stream parser CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!     file / stdin
//!     ──────────────┐
//!                   ▼
//!           ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!           │    stream    │───▶│     http     │───▶│   Request    │──▶ stdout
//!           │    driver    │    │ state machine│    │ (text/JSON)  │
//!           └──────────────┘    └──────────────┘    └──────────────┘
//!
//!           ┌──────────────┐
//!           │ stream lines │──────────────────────────────────────────▶ stdout
//!           └──────────────┘
//!
//!     Cross-cutting: config (TOML), observability (tracing)
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::AsyncRead;

use http_stream_parser::config::validation::validate_config;
use http_stream_parser::config::{load_or_default, AppConfig, ConfigError, EofPolicy};
use http_stream_parser::observability::init_logging;
use http_stream_parser::stream::{request_from_async_reader, spawn_lines};
use http_stream_parser::Request;

#[derive(Parser)]
#[command(name = "http-stream-parser")]
#[command(about = "Parse HTTP/1.1 request heads from a file or stdin", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one request and print its request line and headers
    Request {
        /// Input file; stdin when omitted
        path: Option<PathBuf>,

        /// Bytes requested per read
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Accept a request whose header section is cut off by end-of-stream
        #[arg(long)]
        lenient: bool,

        /// Print the request as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every line of the input
    Lines {
        /// Input file; stdin when omitted
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if let Commands::Request {
        chunk_size,
        lenient,
        ..
    } = &cli.command
    {
        if let Some(size) = chunk_size {
            config.parser.read_chunk_size = *size;
        }
        if *lenient {
            config.parser.eof_policy = EofPolicy::Lenient;
        }
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability)?;

    tracing::debug!(
        read_chunk_size = config.parser.read_chunk_size,
        max_buffered_bytes = config.parser.max_buffered_bytes,
        eof_policy = ?config.parser.eof_policy,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Request { path, json, .. } => run_request(&config, path.as_deref(), json).await,
        Commands::Lines { path } => run_lines(path.as_deref()).await,
    }
}

async fn open_input(
    path: Option<&Path>,
) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reading input file");
            Ok(Box::new(tokio::fs::File::open(path).await?))
        }
        None => Ok(Box::new(tokio::io::stdin())),
    }
}

async fn run_request(
    config: &AppConfig,
    path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = open_input(path).await?;
    let request = request_from_async_reader(input, &config.parser).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        print!("{}", render_request(&request));
    }
    Ok(())
}

async fn run_lines(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let input = open_input(path).await?;
    let mut lines = spawn_lines(input);
    while let Some(line) = lines.recv().await {
        println!("read: {}", line?);
    }
    Ok(())
}

fn render_request(request: &Request) -> String {
    let mut out = format!(
        "Request line:\n- Method: {}\n- Target: {}\n- Version: {}\nHeaders:\n",
        request.method(),
        request.target(),
        request.http_version()
    );
    let mut headers: Vec<_> = request.headers().iter().collect();
    headers.sort_unstable();
    for (name, value) in headers {
        out.push_str(&format!("- {}: {}\n", name, value));
    }
    out
}
