//! ESPHome native API server binary.
//!
//! # Usage
//!
//! ```bash
//! # Plaintext, no password
//! esphome-server --bind 0.0.0.0:6053 --name demo-device
//!
//! # Noise-encrypted, PSK supplied as base64 (matches the `api: encryption:`
//! # key ESPHome's YAML config generates)
//! esphome-server --bind 0.0.0.0:6053 --name demo-device --psk <base64-32-bytes>
//! ```

use std::time::Duration;

use clap::Parser;
use esphome_core::connection::DeviceIdentity;
use esphome_server::{Server, ServerConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "esphome-server")]
#[command(about = "ESPHome native API server")]
#[command(version)]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0:6053")]
    bind: String,

    #[arg(long, default_value = "esphome-device")]
    name: String,

    #[arg(long)]
    password: Option<String>,

    /// 32-byte pre-shared key, base64-encoded. When set, every connection
    /// must negotiate Noise; plaintext connections are refused.
    #[arg(long)]
    psk: Option<String>,

    #[arg(long, default_value = "100")]
    batch_delay_ms: u64,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn decode_psk(encoded: &str) -> Result<[u8; 32], Box<dyn std::error::Error>> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    let bytes = STANDARD.decode(encoded)?;
    if bytes.len() != 32 {
        return Err(format!("PSK must decode to 32 bytes, got {}", bytes.len()).into());
    }
    let mut psk = [0u8; 32];
    psk.copy_from_slice(&bytes);
    Ok(psk)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let psk = args.psk.as_deref().map(decode_psk).transpose()?;

    tracing::info!("esphome native API server starting");
    tracing::info!(bind = %args.bind, encrypted = psk.is_some(), "binding");

    let config = ServerConfig {
        bind_address: args.bind,
        identity: DeviceIdentity {
            name: args.name.clone(),
            friendly_name: args.name,
            esphome_version: env!("CARGO_PKG_VERSION").to_string(),
            api_encryption_supported: psk.is_some(),
            ..Default::default()
        },
        password: args.password,
        psk,
        batch_delay: Duration::from_millis(args.batch_delay_ms),
    };

    let server = Server::bind(config).await?;
    tracing::info!("listening on {}", server.local_addr()?);
    server.run().await?;

    Ok(())
}
