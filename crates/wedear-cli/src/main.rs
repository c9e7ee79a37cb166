//! # wedear
//!
//! Connects to the realtime channel as one user and prints every inbound
//! frame to stdout as a JSON line. Logs go to stderr.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use wedear_core::{FrameKind, StaticSession};
use wedear_realtime::{RealtimeClient, message_handler};
use wedear_settings::WedearSettings;

/// Realtime channel client.
#[derive(Parser, Debug)]
#[command(name = "wedear", about = "Print realtime frames for a user")]
struct Cli {
    /// Authenticated user ID.
    #[arg(long)]
    user_id: String,

    /// Role of the user, e.g. `doctor` or `patient`.
    #[arg(long)]
    role: String,

    /// Settings file (defaults to `~/.wedear/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Message server host (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Message server port (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Log level when `RUST_LOG` is unset (overrides settings).
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn load_settings(&self) -> Result<WedearSettings> {
        let path = self
            .settings
            .clone()
            .unwrap_or_else(wedear_settings::settings_path);
        let mut settings = wedear_settings::load_settings_from_path(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
        self.apply_overrides(&mut settings);
        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }

    fn apply_overrides(&self, settings: &mut WedearSettings) {
        if let Some(host) = &self.host {
            settings.realtime.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.realtime.port = port;
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        if self.json_logs {
            settings.logging.json = true;
        }
    }
}

/// One stdout line per frame.
fn frame_line(kind: &FrameKind, payload: &serde_json::Value) -> String {
    serde_json::json!({ "type": kind.as_str(), "payload": payload }).to_string()
}

fn register_printers(client: &RealtimeClient) {
    for kind in FrameKind::KNOWN {
        let printed = kind.clone();
        let _ = client.add_message_handler(
            kind,
            message_handler(move |payload| {
                println!("{}", frame_line(&printed, &payload.to_json()));
                Ok(())
            }),
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let settings = args.load_settings()?;
    wedear_logging::init_from_settings(&settings.logging);

    let client = RealtimeClient::with_websocket(settings.realtime.clone());
    register_printers(&client);
    client
        .connect_session(&StaticSession::authenticated(&args.user_id, &args.role))
        .context("Failed to start realtime connection")?;

    tracing::info!(
        host = %settings.realtime.host,
        port = settings.realtime.port,
        "listening for realtime frames, Ctrl-C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    tracing::info!("shutting down");
    client.shutdown().await;
    Ok(())
}
