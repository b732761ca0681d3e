use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::prelude::*;

use codex_slack_notify::config::{load_env_file, Config};
use codex_slack_notify::{build_message, load_payload, NotificationError, SlackNotifier};

#[derive(Parser)]
#[command(
    name = "codex-slack-notify",
    about = "Send Codex notifications to a Slack DM",
    version
)]
struct Cli {
    /// Slack user ID to DM (or set SLACK_USER_ID)
    #[arg(long)]
    user_id: Option<String>,

    /// Path to a .env file with SLACK_BOT_TOKEN / SLACK_USER_ID values
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Environment variable that holds the Slack bot token
    #[arg(long)]
    token_env: Option<String>,

    /// Raw JSON payload string
    #[arg(long)]
    payload: Option<String>,

    /// Path to a file containing the JSON payload
    #[arg(long)]
    payload_file: Option<PathBuf>,

    /// Title used when the payload has none
    #[arg(long)]
    title: Option<String>,

    /// Config file (default: ~/.codex-slack-notify/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    // load before any variable lookup so the file can supply both values
    if let Err(e) = load_env_file(cli.env_file.as_deref()) {
        error!("{:#}", e);
        return Ok(ExitCode::FAILURE);
    }

    let config = Config::load(cli.config.as_deref()).wrap_err("failed to load config")?;

    let token_env = cli
        .token_env
        .clone()
        .unwrap_or_else(|| config.slack.token_env.clone());
    let Some(token) = env_value(&token_env) else {
        error!("Missing Slack token in environment variable {}", token_env);
        return Ok(ExitCode::FAILURE);
    };

    let env_user_id = env_value("SLACK_USER_ID");
    let Some(user_id) = config.resolve_user_id(cli.user_id.as_deref(), env_user_id.as_deref())
    else {
        error!("Missing Slack user ID (set --user-id or SLACK_USER_ID)");
        return Ok(ExitCode::FAILURE);
    };

    match notify(&cli, &config, token, &user_id).await {
        Ok(()) => {
            info!("Slack notification sent to {}", user_id);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Failed to send Slack notification: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn notify(
    cli: &Cli,
    config: &Config,
    token: String,
    user_id: &str,
) -> Result<(), NotificationError> {
    let payload = load_payload(cli.payload.as_deref(), cli.payload_file.as_deref())?;
    let title = cli.title.as_deref().or(config.notify.title.as_deref());
    let message = build_message(&payload, title);

    let notifier = SlackNotifier::new(token)
        .with_base_url(&config.slack.base_url)
        .with_timeout(config.timeout());
    notifier.send_direct_message(user_id, &message).await
}

/// Non-empty value of an environment variable.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Initialise tracing: stderr gets info+, the log file gets debug+.
/// Falls back to stderr only when the log directory cannot be created.
fn init_tracing() {
    let file_layer = Config::home_dir()
        .map(|home| home.join("logs"))
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| {
            // rotated daily
            let file_appender = tracing_appender::rolling::daily(dir, "codex-slack-notify.log");
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                        tracing_subscriber::EnvFilter::new("codex_slack_notify=debug")
                    }),
                )
        });

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(tracing_subscriber::EnvFilter::new(
            "warn,codex_slack_notify=info",
        ));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}
