use crate::errors::ConfigError;
use std::{env, fmt, str::FromStr, time::Duration};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const COMPLETION_RESET_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TOTAL_SESSIONS: u32 = 4;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The three flavours of the timer widget. They share one reconciliation loop
/// and differ only in which controls and side effects they expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    Classic,
    Labeled,
    #[default]
    TapToFocus,
}

impl Variant {
    pub fn supports_pause(self) -> bool {
        !matches!(self, Self::TapToFocus)
    }

    pub fn tap_to_focus(self) -> bool {
        matches!(self, Self::TapToFocus)
    }

    pub fn earns_templates(self) -> bool {
        matches!(self, Self::TapToFocus)
    }

    pub fn shows_session_label(self) -> bool {
        matches!(self, Self::Labeled)
    }

    pub fn uses_server_total(self) -> bool {
        matches!(self, Self::Labeled)
    }

    pub fn reports_status(self) -> bool {
        matches!(self, Self::Labeled)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Classic => "classic",
            Self::Labeled => "labeled",
            Self::TapToFocus => "tap-to-focus",
        })
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "labeled" | "labelled" => Ok(Self::Labeled),
            "tap-to-focus" | "tap_to_focus" | "tap" => Ok(Self::TapToFocus),
            other => Err(format!("expected classic, labeled or tap-to-focus, got `{other}`")),
        }
    }
}

/// Knobs consumed by the controller itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub variant: Variant,
    pub poll_interval: Duration,
    pub completion_reset_delay: Duration,
    pub total_sessions: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            completion_reset_delay: COMPLETION_RESET_DELAY,
            total_sessions: DEFAULT_TOTAL_SESSIONS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub template_id: u32,
    pub notifications: bool,
    pub request_timeout: Duration,
    pub controller: ControllerSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            template_id: 1,
            notifications: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            controller: ControllerSettings::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys keep their
    /// defaults, malformed ones are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("TIMER_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid("TIMER_BASE_URL", url, "must be an http(s) url"));
            }
            config.base_url = url.to_string();
        }

        if let Some(value) = lookup("TIMER_VARIANT") {
            config.controller.variant = value.parse().map_err(|reason: String| {
                ConfigError::invalid("TIMER_VARIANT", value.as_str(), reason)
            })?;
        }

        if let Some(value) = lookup("TIMER_TEMPLATE") {
            config.template_id = parse_positive("TIMER_TEMPLATE", &value)?;
        }

        if let Some(value) = lookup("TIMER_POLL_MS") {
            config.controller.poll_interval =
                Duration::from_millis(parse_positive("TIMER_POLL_MS", &value)?.into());
        }

        if let Some(value) = lookup("TIMER_TOTAL_SESSIONS") {
            config.controller.total_sessions = parse_positive("TIMER_TOTAL_SESSIONS", &value)?;
        }

        if let Some(value) = lookup("TIMER_NOTIFICATIONS") {
            config.notifications = parse_flag("TIMER_NOTIFICATIONS", &value)?;
        }

        if let Some(value) = lookup("TIMER_REQUEST_TIMEOUT_MS") {
            config.request_timeout =
                Duration::from_millis(parse_positive("TIMER_REQUEST_TIMEOUT_MS", &value)?.into());
        }

        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError::invalid(key, value, "must be greater than zero")),
        Ok(parsed) => Ok(parsed),
        Err(err) => Err(ConfigError::invalid(key, value, err)),
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected a boolean")),
    }
}
