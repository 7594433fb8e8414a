//! `viewurl` command line.
//!
//! ```bash
//! viewurl [--config viewurl.toml] parse /cities/grid "/population=1000,2000"
//! viewurl [--config viewurl.toml] construct '{"type":"cities","item":"","view":"grid"}'
//! viewurl [--config viewurl.toml] serve
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use viewurl::error::{Result, ViewUrlError};
use viewurl::{Codec, Schema, Settings, State};

const USAGE: &str = "usage: viewurl [--config <file>] (parse <url>... | construct <state-json> | serve)";

#[tokio::main]
async fn main() -> ExitCode {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.iter().position(|arg| arg == "--config") {
        Some(index) if index + 1 < args.len() => {
            let path = args.remove(index + 1);
            args.remove(index);
            Some(path)
        }
        Some(_) => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
        None => None,
    };
    let settings = match Settings::load(config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(settings, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "viewurl failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings, args: &[String]) -> Result<()> {
    let schema = Schema::from_file(&settings.schema_file)?;
    info!(schema = %settings.schema_file, types = schema.types().len(), "schema loaded");
    let codec = Codec::new(schema, settings.hooks.clone());
    match args {
        [command, urls @ ..] if command == "parse" && !urls.is_empty() => {
            for url in urls {
                let state = codec.parse(url).await;
                println!("{}", serde_json::to_string(&state)?);
            }
            Ok(())
        }
        [command, json] if command == "construct" => {
            let state: State = serde_json::from_str(json)?;
            println!("{}", codec.construct(&state));
            Ok(())
        }
        [command] if command == "serve" => serve(codec, &settings.bind).await,
        _ => Err(ViewUrlError::Config(USAGE.to_owned())),
    }
}

async fn serve(codec: Codec<viewurl::StaticHooks>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "listening");
    axum::serve(listener, viewurl::server::router(Arc::new(codec))).await?;
    Ok(())
}
