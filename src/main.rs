#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Initializes the bot:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, GitLab client, Brain
//! - Application: Router, Room Context, Rendering
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::infrastructure::gitlab::HttpConnector;
use crate::infrastructure::matrix::MatrixService;

#[derive(Parser, Debug)]
#[command(author, version, about = "Matrix bot driving GitLab from chat rooms")]
struct Args {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Directory holding session.log
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&args.config)?;

    // 2. Logging Setup
    fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("Failed to create {}", args.data_dir.display()))?;

    // Clear previous session log
    let log_path = args.data_dir.join("session.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(&args.data_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn,reqwest=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting {}...", config.bot.name);
    if config.services.gitlab.token.is_none() {
        tracing::warn!("No GITLAB_TOKEN configured; rooms must run `access config` first");
    }

    // 3. Initialize Infrastructure
    let brain = crate::infrastructure::brain::open(&config.brain).await?;
    let connector = Arc::new(HttpConnector::new(
        config.services.gitlab.record_limit,
        config.services.gitlab.timeout_secs,
    )?);

    // 4. Initialize Application Components
    let router = Arc::new(CommandRouter::new(config.clone(), brain, connector)?);

    // 5. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .initial_device_display_name(&config.bot.name)
        .send()
        .await?;

    tracing::info!("Logged in as {}", config.services.matrix.username);

    if let Some(display_name) = &config.services.matrix.display_name {
        if let Err(e) = client.account().set_display_name(Some(display_name.as_str())).await {
            tracing::warn!("Failed to set display name: {}", e);
        }
    }

    // 6. Event Handlers
    let start_time = std::time::SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            let MessageType::Text(text_content) = &original_msg.content.msgtype else {
                return;
            };
            if original_msg.sender == room.own_user_id() {
                return;
            }

            let body = &text_content.body;
            tracing::debug!("Received message from {}: \n{}", original_msg.sender, body);

            let chat = MatrixService::new(room);
            if let Err(e) = router
                .route(&chat, body, original_msg.sender.as_str())
                .await
            {
                tracing::error!("Failed to route message: {}", e);
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("Invited to {}, joining", room.room_id());
            if let Err(e) = room.join().await {
                tracing::error!("Failed to join {}: {}", room.room_id(), e);
            }
        }
    });

    // 7. Sync until the process is stopped
    client
        .sync(SyncSettings::default())
        .await
        .context("Matrix sync stopped")?;

    Ok(())
}
