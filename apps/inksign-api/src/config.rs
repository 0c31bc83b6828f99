//! Runtime configuration read from the environment

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Deadline for the load/sign/save step of one signature request
    pub sign_timeout: Option<Duration>,
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(p) => p.parse().context("PORT must be a port number")?,
            Err(_) => DEFAULT_PORT,
        };

        let max_upload_bytes = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(v) => v.parse().context("MAX_UPLOAD_BYTES must be a byte count")?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let sign_timeout = match std::env::var("SIGN_TIMEOUT_MS") {
            Ok(v) => Some(Duration::from_millis(
                v.parse().context("SIGN_TIMEOUT_MS must be milliseconds")?,
            )),
            Err(_) => None,
        };

        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            let data_dir = default_data_dir();
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/inksign.db?mode=rwc", data_dir.display())
        });

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_url,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes,
            sign_timeout,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

/// Where the default SQLite file lives when DATABASE_URL is unset
fn default_data_dir() -> PathBuf {
    let base = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("APPDATA").map(PathBuf::from))
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("inksign-api")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str, port: u16) -> Config {
        Config {
            host: host.to_string(),
            port,
            database_url: "sqlite::memory:".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            sign_timeout: None,
        }
    }

    #[test]
    fn test_bind_addr() {
        let addr = config("127.0.0.1", 5000).bind_addr().unwrap();
        assert_eq!(addr.port(), 5000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_default_data_dir_is_app_specific() {
        assert!(default_data_dir().ends_with("inksign-api"));
    }

    #[test]
    fn test_bind_addr_rejects_hostname() {
        assert!(config("not a host", 80).bind_addr().is_err());
    }
}
