use std::env;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use lbprobe_core::{Config, SortOrder};

/// Command-line arguments for lbprobe
#[derive(Debug, Parser)]
#[command(name = "lbprobe", version)]
#[command(about = "Smoke-test a leaderboard HTTP API", long_about = None)]
pub struct Cli {
    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Base URL of the service under test [default: http://localhost:3000]")]
    pub base_url: Option<String>,

    #[arg(long, help = "Test account email")]
    pub email: Option<String>,

    #[arg(long, help = "Test account password")]
    pub password: Option<String>,

    #[arg(long, help = "Maximum rows per leaderboard read")]
    pub limit: Option<u32>,

    #[arg(long, help = "Rows skipped on leaderboard reads")]
    pub offset: Option<u32>,

    #[arg(long, help = "Column to sort leaderboard reads by")]
    pub order_by: Option<String>,

    #[arg(long, help = "Sort direction for leaderboard reads (asc or desc)")]
    pub order: Option<SortOrder>,

    #[arg(short, long, help = "Log requests and responses to stderr")]
    pub verbose: bool,

    #[arg(long, help = "Print the resolved configuration and exit")]
    pub show_config: bool,
}

impl Cli {
    /// Defaults, then the config file, then `LBPROBE_*` variables, then
    /// flags. The result is validated.
    pub fn resolve_config(&self) -> Result<Config> {
        let base = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };
        let mut config = base.with_env(|key| env::var(key).ok());
        self.apply(&mut config);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.target.base_url.clone_from(base_url);
        }
        if let Some(email) = &self.email {
            config.credentials.email.clone_from(email);
        }
        if let Some(password) = &self.password {
            config.credentials.password.clone_from(password);
        }
        if self.limit.is_some() {
            config.leaderboard.limit = self.limit;
        }
        if self.offset.is_some() {
            config.leaderboard.offset = self.offset;
        }
        if self.order_by.is_some() {
            config.leaderboard.order_by.clone_from(&self.order_by);
        }
        if self.order.is_some() {
            config.leaderboard.order = self.order;
        }
    }
}
