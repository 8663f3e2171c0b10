use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuditError;

pub mod client;

pub use self::client::SlackClient;

/// The reserved account Slack uses for its own system bot.
pub const SLACKBOT_USER_ID: &str = "USLACKBOT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_restricted: bool,
    #[serde(default)]
    pub is_ultra_restricted: bool,
    #[serde(default)]
    pub profile: SlackProfile,
}

impl SlackUser {
    /// Profile email, if set and non-empty.
    pub fn email(&self) -> Option<&str> {
        self.profile
            .email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
    }

    /// Email when present, account id otherwise.
    pub fn display_email(&self) -> &str {
        self.email().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackProfile {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub num_members: u64,
}

/// One row of `team.accessLogs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogin {
    pub user_id: String,
    pub date_last: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelVisibility {
    Public,
    Private,
}

impl ChannelVisibility {
    pub fn as_type(self) -> &'static str {
        match self {
            ChannelVisibility::Public => "public_channel",
            ChannelVisibility::Private => "private_channel",
        }
    }
}

/// A single page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// The Slack Web API methods the audit consumes. Each call fetches one page.
#[async_trait]
pub trait SlackApi: Send + Sync {
    async fn users_list(&self, cursor: Option<String>) -> Result<CursorPage<SlackUser>, AuditError>;

    async fn conversations_list(
        &self,
        visibility: ChannelVisibility,
        cursor: Option<String>,
    ) -> Result<CursorPage<SlackChannel>, AuditError>;

    async fn conversations_members(
        &self,
        channel_id: &str,
        cursor: Option<String>,
    ) -> Result<CursorPage<String>, AuditError>;

    /// Access log entries ordered newest first. `page` starts at 0.
    async fn access_logs(&self, page: u32) -> Result<Vec<AccessLogin>, AuditError>;
}
