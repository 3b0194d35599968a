use std::time::Duration;

use anyhow::{Context, bail};
use quiz_display::role::DisplayRole;
use quiz_display::session::{
    ClientSession, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT, MIN_POLL_INTERVAL,
};
use serde::{Deserialize, Serialize};


const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum StringSource {
    Literal(String),
    EnvVar(String),
    // Trailing whitespace is dropped, so that files ending with a newline work.
    File(String),
}

impl StringSource {
    pub fn get(&self) -> anyhow::Result<String> {
        match self {
            Self::Literal(s) => Ok(s.clone()),
            Self::EnvVar(v) => {
                std::env::var(v).context(format!("Missing environment variable '{v}'."))
            }
            Self::File(f) => std::fs::read_to_string(f)
                .map(|s| s.trim_end().to_owned())
                .context(format!("Failed to read file '{f}'.")),
        }
    }
}

// What a display page would have been rendered with.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    // Puppet flag of the display; ignored by the `controller` command.
    pub puppet: String,
    pub touch_nav: bool,
    pub access: String,
    pub page: i64,
    pub param: i64,
    pub index: i32,
    pub update: i64,
    pub monitor: i64,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    // E.g. "http://localhost:8080/".
    pub server_url: String,
    pub csrf_token: StringSource,
    // Sent as the `Cookie` header. The server ties CSRF tokens to the session cookie.
    #[serde(default)]
    pub session_cookie: Option<StringSource>,
    #[serde(default)]
    pub display: DisplayOptions,
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub poll_interval: Duration,
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
    // How often poll latency is logged.
    #[serde(with = "humantime_serde", default = "default_stats_interval")]
    pub stats_interval: Duration,
}

fn default_poll_interval() -> Duration { DEFAULT_POLL_INTERVAL }
fn default_request_timeout() -> Duration { DEFAULT_REQUEST_TIMEOUT }
fn default_stats_interval() -> Duration { DEFAULT_STATS_INTERVAL }

impl ConsoleConfig {
    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let config: ConsoleConfig =
            serde_yaml::from_str(contents).context("Parsing config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn read(filename: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(filename)
            .with_context(|| format!("Reading config file '{filename}'"))?;
        Self::from_yaml(&contents)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval < MIN_POLL_INTERVAL {
            bail!(
                "poll_interval {} is below {}",
                humantime::format_duration(self.poll_interval),
                humantime::format_duration(MIN_POLL_INTERVAL)
            );
        }
        if self.request_timeout.is_zero() {
            bail!("request_timeout must be positive");
        }
        Ok(())
    }

    pub fn display_role(&self) -> DisplayRole { DisplayRole::from_flag(&self.display.puppet) }

    pub fn client_session(&self, role: DisplayRole) -> anyhow::Result<ClientSession> {
        let display = &self.display;
        Ok(ClientSession {
            touch_nav: display.touch_nav,
            access: display.access.clone(),
            page: display.page,
            param: display.param,
            index: display.index,
            update: display.update,
            monitor: display.monitor,
            poll_interval: self.poll_interval,
            request_timeout: self.request_timeout,
            ..ClientSession::new(role, self.csrf_token.get()?)
        })
    }
}
