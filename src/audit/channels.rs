use regex::Regex;
use tracing::info;

use super::{AccountChannels, collect_cursor_pages};
use crate::error::AuditError;
use crate::slack::{ChannelVisibility, SlackApi, SlackChannel};

pub const MATCH_ALL: &str = ".*";

/// Channel name filter anchored at the start of the name.
#[derive(Debug, Clone)]
pub struct ChannelFilter {
    pattern: String,
    /// `None` matches every name.
    regex: Option<Regex>,
}

impl ChannelFilter {
    pub fn new(pattern: &str) -> Result<Self, AuditError> {
        if pattern == MATCH_ALL {
            return Ok(Self::match_all());
        }
        let regex = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex: Some(regex),
        })
    }

    pub fn match_all() -> Self {
        Self {
            pattern: MATCH_ALL.to_string(),
            regex: None,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex
            .as_ref()
            .is_none_or(|regex| regex.is_match(name))
    }
}

/// Lists non-archived channels of one visibility whose name matches `filter`,
/// in the order Slack returned them.
pub async fn list_channels(
    api: &dyn SlackApi,
    visibility: ChannelVisibility,
    filter: &ChannelFilter,
    max_pages: u32,
) -> Result<Vec<SlackChannel>, AuditError> {
    info!(
        "fetching {} conversations for filter '{}'",
        visibility.as_type(),
        filter.pattern()
    );
    let all = collect_cursor_pages("conversations.list", max_pages, |cursor| {
        api.conversations_list(visibility, cursor)
    })
    .await?;

    let total = all.len();
    let matched: Vec<SlackChannel> = all
        .into_iter()
        .filter(|channel| filter.matches(&channel.name))
        .collect();

    info!("matched {}/{} channels", matched.len(), total);
    Ok(matched)
}

/// Builds the per-account channel list. Channels reporting no members are
/// skipped without a call.
pub async fn aggregate_members(
    api: &dyn SlackApi,
    channels: &[SlackChannel],
    max_pages: u32,
) -> Result<AccountChannels, AuditError> {
    info!("fetching all members of each channel");
    let mut account_channels = AccountChannels::new();

    for channel in channels.iter().filter(|channel| channel.num_members > 0) {
        let members = collect_cursor_pages("conversations.members", max_pages, |cursor| {
            api.conversations_members(&channel.id, cursor)
        })
        .await?;
        info!("- #{} ({} members)", channel.name, members.len());

        for member in members {
            account_channels
                .entry(member)
                .or_default()
                .push(channel.name.clone());
        }
    }

    Ok(account_channels)
}
