//! Configuration settings for the project-management assistant.
//!
//! Configuration is built once at startup (file, then environment for any
//! credential left blank) and handed to the service clients. Nothing past
//! startup reads the environment.

use crate::error::{ConfigError, Result};
use crate::tasks::MAX_HORIZON_DAYS;
use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub board: BoardConfig,
    pub calendar: CalendarConfig,
    pub email: EmailConfig,
    pub assistant: AssistantSettings,
    /// People reminders can be addressed to.
    pub team: Vec<TeamMember>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("pm-assistant.toml"),
            dirs::config_dir()
                .map(|p| p.join("pm-assistant/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".pm-assistant/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Fill blank credentials and identifiers from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Fill blank credentials and identifiers from `lookup`.
    ///
    /// Values already present in the file win over the environment.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fill = |slot: &mut Option<String>, key: &str| {
            if slot.as_deref().map_or(true, |v| v.trim().is_empty()) {
                if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                    *slot = Some(value);
                }
            }
        };

        fill(&mut self.board.api_key, "TRELLO_KEY");
        fill(&mut self.board.token, "TRELLO_TOKEN");
        fill(&mut self.board.board_id, "TRELLO_BOARD_ID");
        fill(&mut self.board.todo_list_id, "TRELLO_TODO_LIST_ID");
        fill(&mut self.board.in_progress_list_id, "TRELLO_INPROGRESS_LIST_ID");
        fill(&mut self.board.done_list_id, "TRELLO_DONE_LIST_ID");
        fill(&mut self.calendar.api_key, "GCALENDAR_KEY");
        fill(&mut self.email.api_key, "MAIL_API_KEY");
        fill(&mut self.email.from, "MAIL_FROM");

        let mut calendar_id = None;
        fill(&mut calendar_id, "GCALENDAR_CALENDAR_ID");
        if let Some(id) = calendar_id {
            if self.calendar.calendar_id == CalendarConfig::default().calendar_id {
                self.calendar.calendar_id = id;
            }
        }

        let mut timezone = None;
        fill(&mut timezone, "DEFAULT_TIMEZONE");
        if let Some(tz) = timezone {
            if self.assistant.timezone == AssistantSettings::default().timezone {
                self.assistant.timezone = tz;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".to_string()).into());
        }

        if self.assistant.horizon_days == 0 {
            return Err(
                ConfigError::Invalid("assistant.horizon_days must be > 0".to_string()).into(),
            );
        }

        if self.assistant.stale_after_days == 0 {
            return Err(
                ConfigError::Invalid("assistant.stale_after_days must be > 0".to_string()).into(),
            );
        }

        if self.assistant.horizon_days > MAX_HORIZON_DAYS
            || self.assistant.stale_after_days > MAX_HORIZON_DAYS
        {
            return Err(ConfigError::Invalid(format!(
                "assistant.horizon_days and assistant.stale_after_days must be at most {}",
                MAX_HORIZON_DAYS
            ))
            .into());
        }

        self.calendar.meeting_length()?;

        self.assistant.tz()?;

        for (index, member) in self.team.iter().enumerate() {
            if member.name.trim().is_empty() {
                return Err(ConfigError::MissingField(format!("team[{}].name", index)).into());
            }
            if !member.email.contains('@') {
                return Err(ConfigError::Invalid(format!(
                    "team[{}].email is not an email address: {}",
                    index, member.email
                ))
                .into());
            }
        }

        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Enable permissive CORS for browser front-ends.
    pub enable_cors: bool,
    /// Path prefix for all API routes.
    pub prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            enable_cors: true,
            prefix: "/api".to_string(),
        }
    }
}

/// Trello board configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub token: Option<String>,
    pub board_id: Option<String>,
    /// List new cards are created in; maps to `todo`.
    pub todo_list_id: Option<String>,
    /// Maps to `in-progress`.
    pub in_progress_list_id: Option<String>,
    /// Maps to `done`.
    pub done_list_id: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.trello.com/1".to_string(),
            api_key: None,
            token: None,
            board_id: None,
            todo_list_id: None,
            in_progress_list_id: None,
            done_list_id: None,
            timeout_secs: 30,
        }
    }
}

/// Google Calendar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub calendar_id: String,
    /// Length of meetings booked without an explicit end.
    pub meeting_minutes: i64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CalendarConfig {
    /// Longest meeting that may be booked, one day.
    pub const MAX_MEETING_MINUTES: i64 = 1440;

    /// `meeting_minutes` as a duration, rejecting values outside one minute to one day.
    pub fn meeting_length(&self) -> Result<Duration> {
        if !(1..=Self::MAX_MEETING_MINUTES).contains(&self.meeting_minutes) {
            return Err(ConfigError::Invalid(format!(
                "calendar.meeting_minutes must be between 1 and {}, got {}",
                Self::MAX_MEETING_MINUTES,
                self.meeting_minutes
            ))
            .into());
        }
        Ok(Duration::minutes(self.meeting_minutes))
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            api_key: None,
            calendar_id: "primary".to_string(),
            meeting_minutes: 60,
            timeout_secs: 30,
        }
    }
}

/// Transactional mail API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Base URL of the mail relay; messages are posted to `{base_url}/send`.
    pub base_url: String,
    pub api_key: Option<String>,
    /// Sender address.
    pub from: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mailrelay.example/v1".to_string(),
            api_key: None,
            from: None,
            timeout_secs: 30,
        }
    }
}

/// Behaviour of the assistant itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Size of the due window in days.
    pub horizon_days: u32,
    /// IANA timezone used to read and render meeting times.
    pub timezone: String,
    /// Days without activity before a task gets a reminder.
    pub stale_after_days: u32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            timezone: "America/New_York".to_string(),
            stale_after_days: 3,
        }
    }
}

impl AssistantSettings {
    /// Parsed timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::Invalid(format!(
                "assistant.timezone is not a known timezone: {}",
                self.timezone
            ))
            .into()
        })
    }
}

/// A person reminders can be sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    /// Trello member id, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    /// Trello username, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}
