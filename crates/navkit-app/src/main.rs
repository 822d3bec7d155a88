mod cli;
mod replay;

use std::process::ExitCode;

use navkit_config::NavkitConfig;
use navkit_webview::decision::{extract_domain, validate_url};
use navkit_webview::store;
use navkit_webview::url_utils::{display_host, is_secure, resolve_input};
use navkit_webview::{NavigationPolicy, RecordingRenderer, SessionController};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

const DEFAULT_DIRECTIVE: &str = "navkit=info";

/// Install the tracing subscriber. `--log-level` wins over the config.
fn init_logging(args: &Args, config: Option<&NavkitConfig>) {
    let directive = args
        .log_level
        .as_deref()
        .or_else(|| config.map(|c| c.logging.level.as_directive()))
        .unwrap_or(DEFAULT_DIRECTIVE);

    let filter = match directive.parse::<Directive>() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::new(DEFAULT_DIRECTIVE),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), navkit_common::NavkitError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| navkit_common::NavkitError::Other(format!("failed to encode output: {e}")))?;
    println!("{json}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Logging depends on the config, so load it first and report afterwards.
    let loaded = navkit_config::load_config(args.config.as_deref());
    init_logging(&args, loaded.as_ref().ok());

    tracing::info!("navkit v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        NavkitConfig::default()
    });

    match run(args.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &NavkitConfig) -> navkit_common::Result<ExitCode> {
    match command {
        Command::Resolve { input, engine } => {
            let engine = engine.unwrap_or(config.browser.search_engine);
            match resolve_input(&input, engine) {
                Some(url) => {
                    println!("{url}");
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("nothing to resolve");
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Command::Check { url } => {
            let policy = NavigationPolicy::new(config.browser.blocked_domains.clone());
            let report = match validate_url(&url) {
                Ok(url) => serde_json::json!({
                    "url": url.as_str(),
                    "valid": true,
                    "allowed": policy.allows(&url),
                    "secure": is_secure(&url),
                    "host": extract_domain(&url),
                    "display_host": display_host(&url),
                }),
                Err(error) => serde_json::json!({
                    "url": url,
                    "valid": false,
                    "error": error.to_string(),
                }),
            };
            print_json(&report)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Replay { script, bookmarks } => {
            let steps = replay::load_script(&script)?;
            let saved = match &bookmarks {
                Some(path) => store::load_bookmarks(path)?,
                None => Vec::new(),
            };

            let mut session = SessionController::from_config(RecordingRenderer::new(), config)
                .with_bookmarks(saved);
            let results = replay::run(&mut session, steps).await;

            if let Some(path) = &bookmarks {
                store::save_bookmarks(path, session.bookmarks())?;
            }
            print_json(&replay::report(&session, results))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
