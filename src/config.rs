//! Настройки сервиса из переменных окружения

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::session::{DEFAULT_PREVIEW_ROWS, DEFAULT_SAMPLE_ROWS};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub preview_rows: usize,
    pub sample_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

impl Config {
    /// TABPREP_HOST, TABPREP_PORT, TABPREP_MAX_UPLOAD_BYTES,
    /// TABPREP_PREVIEW_ROWS, TABPREP_SAMPLE_ROWS
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: parse_or(&lookup, "TABPREP_HOST", defaults.host)?,
            port: parse_or(&lookup, "TABPREP_PORT", defaults.port)?,
            max_upload_bytes: parse_or(&lookup, "TABPREP_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            preview_rows: parse_or(&lookup, "TABPREP_PREVIEW_ROWS", defaults.preview_rows)?,
            sample_rows: parse_or(&lookup, "TABPREP_SAMPLE_ROWS", defaults.sample_rows)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: '{}'", key, raw)),
        _ => Ok(default),
    }
}
