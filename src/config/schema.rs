use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::slack::{DEFAULT_TIMEOUT_SECS, SLACK_API_BASE};

/// Prefix for environment overrides, e.g. `CODEX_NOTIFY_SLACK__TIMEOUT_SECS=5`.
pub const ENV_PREFIX: &str = "CODEX_NOTIFY_";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Slack API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-attempt request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bot token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_base_url() -> String {
    SLACK_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_token_env() -> String {
    "SLACK_BOT_TOKEN".to_string()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token_env: default_token_env(),
        }
    }
}

/// Defaults for the notification itself; CLI flags take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Config {
    /// `~/.codex-slack-notify`
    pub fn home_dir() -> Result<PathBuf> {
        let base_dirs = directories::BaseDirs::new()
            .ok_or_else(|| color_eyre::eyre::eyre!("could not determine home directory"))?;
        Ok(base_dirs.home_dir().join(".codex-slack-notify"))
    }

    /// `~/.codex-slack-notify/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`. The file is
    /// optional in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load_from_path(&Self::config_path()?),
        }
    }

    /// Defaults, then the TOML file, then `CODEX_NOTIFY_*` variables.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        Self::load_layered(path, ENV_PREFIX)
    }

    fn load_layered(path: &Path, env_prefix: &str) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(env_prefix).split("__"))
            .extract()
            .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.slack.base_url)
            .wrap_err_with(|| format!("invalid slack.base_url: {}", self.slack.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("slack.base_url must be http or https, got {}", url.scheme());
        }
        if self.slack.timeout_secs == 0 {
            bail!("slack.timeout_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.slack.timeout_secs)
    }

    /// Target user: `--user-id`, then `SLACK_USER_ID` (read after the `.env`
    /// file is loaded), then `notify.user_id`. Empty values are skipped.
    pub fn resolve_user_id(&self, cli: Option<&str>, env: Option<&str>) -> Option<String> {
        [cli, env, self.notify.user_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
            .map(String::from)
    }
}
