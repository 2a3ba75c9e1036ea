use anyhow::{anyhow, Context};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_FILE: &str = "school.sqlite3";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Workspace opened at start-up, if any.
    pub workspace: Option<PathBuf>,
    pub db_file: String,
    pub busy_timeout: Duration,
    pub wal: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: None,
            db_file: DEFAULT_DB_FILE.to_string(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            wal: true,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(v) = lookup("SCHOOLD_WORKSPACE").filter(|v| !v.trim().is_empty()) {
            cfg.workspace = Some(PathBuf::from(v.trim()));
        }
        if let Some(v) = lookup("SCHOOLD_DB_FILE") {
            let v = v.trim();
            if v.is_empty() || v.contains('/') || v.contains('\\') {
                return Err(anyhow!("SCHOOLD_DB_FILE must be a plain file name, got {v:?}"));
            }
            cfg.db_file = v.to_string();
        }
        if let Some(v) = lookup("SCHOOLD_BUSY_TIMEOUT_MS") {
            let ms: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("SCHOOLD_BUSY_TIMEOUT_MS must be an integer, got {v:?}"))?;
            cfg.busy_timeout = Duration::from_millis(ms);
        }
        if let Some(v) = lookup("SCHOOLD_WAL") {
            cfg.wal = parse_flag(&v)
                .ok_or_else(|| anyhow!("SCHOOLD_WAL must be true/false, got {v:?}"))?;
        }

        Ok(cfg)
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
