use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::role::DisplayRole;


pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

// Values the host page injects when it renders a presentation, controller or monitor page.
// Field names follow what the page templates emit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(rename = "puppet", default = "default_role")]
    pub role: DisplayRole,
    #[serde(default)]
    pub touch_nav: bool,
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub param: i64,
    #[serde(default)]
    pub index: i32,
    #[serde(default)]
    pub tick: String,
    #[serde(default)]
    pub update: i64,
    #[serde(default)]
    pub monitor: i64,
    pub csrf_token: String,
    // Milliseconds.
    pub interval: u64,
    // Milliseconds.
    #[serde(default)]
    pub timeout: Option<u64>,
}

fn default_role() -> DisplayRole { DisplayRole::Puppet(String::new()) }

// Everything a display page knows about itself. The server is authoritative for `index` and
// `tick`; the client keeps a mirror which is reconciled on every poll response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSession {
    pub role: DisplayRole,
    pub touch_nav: bool,
    pub access: String,
    pub page: i64,
    pub param: i64,
    pub index: i32,
    pub tick: String,
    pub update: i64,
    pub monitor: i64,
    // Number of controller refresh polls sent so far.
    pub second: i64,
    pub csrf_token: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Json)
    }
}

impl ClientSession {
    pub fn new(role: DisplayRole, csrf_token: String) -> Self {
        ClientSession {
            role,
            touch_nav: false,
            access: String::new(),
            page: 0,
            param: 0,
            index: 0,
            tick: String::new(),
            update: 0,
            monitor: 0,
            second: 0,
            csrf_token,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_page_config(config: PageConfig) -> Result<Self, ConfigError> {
        let poll_interval = Duration::from_millis(config.interval);
        if poll_interval < MIN_POLL_INTERVAL {
            return Err(ConfigError::InvalidInterval(format!(
                "poll interval {poll_interval:?} is below {MIN_POLL_INTERVAL:?}"
            )));
        }
        let request_timeout =
            config.timeout.map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_millis);
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidInterval("request timeout is zero".to_owned()));
        }
        Ok(ClientSession {
            role: config.role,
            touch_nav: config.touch_nav,
            access: config.access,
            page: config.page,
            param: config.param,
            index: config.index,
            tick: config.tick,
            update: config.update,
            monitor: config.monitor,
            second: 0,
            csrf_token: config.csrf_token,
            poll_interval,
            request_timeout,
        })
    }

    pub fn from_page_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_page_config(PageConfig::from_json(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_page_config() {
        let session = ClientSession::from_page_json(
            r#"{"puppet": "C", "touchNav": true, "access": "abc", "page": 4, "param": 2,
                "index": 7, "tick": "12", "update": 3, "monitor": 1, "csrfToken": "tok",
                "interval": 500}"#,
        )
        .unwrap();
        assert_eq!(session.role, DisplayRole::Controller);
        assert!(session.touch_nav);
        assert_eq!(session.index, 7);
        assert_eq!(session.tick, "12");
        assert_eq!(session.second, 0);
        assert_eq!(session.poll_interval, Duration::from_millis(500));
        assert_eq!(session.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn minimal_page_config_is_a_puppet() {
        let session =
            ClientSession::from_page_json(r#"{"csrfToken": "tok", "interval": 1000}"#).unwrap();
        assert_eq!(session.role, DisplayRole::Puppet(String::new()));
        assert_eq!(session.index, 0);
    }

    #[test]
    fn reject_tiny_interval() {
        let err =
            ClientSession::from_page_json(r#"{"csrfToken": "tok", "interval": 5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval(_)));
    }
}
