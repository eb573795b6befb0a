use std::path::PathBuf;

use clap::Parser;
use faultline_core::Mode;
use faultline_telemetry::LogFormat;

/// Faultline error boundary
#[derive(Debug, Parser)]
#[command(name = "faultline", about = "HTTP error boundary with redacted operator alerts")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "faultline.toml", env = "FAULTLINE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "FAULTLINE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Override the responder mode (development or production)
    #[arg(long, env = "FAULTLINE_MODE")]
    pub mode: Option<Mode>,

    /// Log filter directive, `RUST_LOG` syntax
    #[arg(long, default_value = "info", env = "FAULTLINE_LOG")]
    pub log_level: String,

    /// Log output format (text or json)
    #[arg(long, default_value = "text", env = "FAULTLINE_LOG_FORMAT")]
    pub log_format: LogFormat,
}
