//! Report rows built from the fetched directory, memberships and activity.
//! Everything here is pure; rendering goes through `Display`.

use std::collections::BTreeMap;
use std::fmt;

use super::roles::{is_free, is_licensed};
use super::{AccountChannels, Accounts, RecentActivity};
use crate::slack::{SlackChannel, SlackUser};

pub const SEPARATOR: &str = "------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactiveCategory {
    /// Multi-channel guests.
    Licensed,
    /// Single-channel guests.
    Free,
}

impl InactiveCategory {
    pub fn label(self) -> &'static str {
        match self {
            InactiveCategory::Licensed => "licensed",
            InactiveCategory::Free => "free",
        }
    }

    fn includes(self, user: &SlackUser) -> bool {
        match self {
            InactiveCategory::Licensed => is_licensed(user),
            InactiveCategory::Free => is_free(user),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InactiveReport {
    pub category: InactiveCategory,
    pub window_days: u32,
    /// Sorted alphabetically.
    pub emails: Vec<String>,
}

pub fn inactive_report(
    accounts: &Accounts,
    recent: &RecentActivity,
    category: InactiveCategory,
    window_days: u32,
) -> InactiveReport {
    let mut emails: Vec<String> = accounts
        .iter()
        .filter(|(id, user)| category.includes(user) && !recent.contains_key(*id))
        .map(|(_, user)| user.display_email().to_string())
        .collect();
    emails.sort();

    InactiveReport {
        category,
        window_days,
        emails,
    }
}

impl fmt::Display for InactiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(
            f,
            "These {} users have not logged in during the last {} days:",
            self.category.label(),
            self.window_days
        )?;
        for email in &self.emails {
            writeln!(f, " - {email}")?;
        }
        writeln!(f, "{SEPARATOR}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnderUtilizedRow {
    pub email: String,
    pub account_id: String,
    /// In aggregation order.
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnderUtilizedReport {
    pub rows: Vec<UnderUtilizedRow>,
}

/// Licensed accounts that belong to fewer than two of the scanned channels.
pub fn under_utilized_report(
    accounts: &Accounts,
    account_channels: &AccountChannels,
) -> UnderUtilizedReport {
    let mut rows: Vec<UnderUtilizedRow> = account_channels
        .iter()
        .filter(|(_, channels)| channels.len() < 2)
        .filter_map(|(id, channels)| {
            let user = accounts.get(id).filter(|user| is_licensed(user))?;
            Some(UnderUtilizedRow {
                email: user.display_email().to_string(),
                account_id: id.clone(),
                channels: channels.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| (&a.email, &a.account_id).cmp(&(&b.email, &b.account_id)));

    UnderUtilizedReport { rows }
}

impl fmt::Display for UnderUtilizedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "These licensed users are members of less than 2 channels:")?;
        for row in &self.rows {
            writeln!(
                f,
                " - {} ({}) belongs to {}",
                row.email,
                row.account_id,
                channel_list(&row.channels)
            )?;
        }
        writeln!(f, "{SEPARATOR}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChannelRow {
    pub email: String,
    /// Sorted alphabetically.
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChannelReport {
    /// Sorted by email.
    pub rows: Vec<UserChannelRow>,
}

pub fn user_channel_report(
    accounts: &Accounts,
    account_channels: &AccountChannels,
) -> UserChannelReport {
    let mut by_email: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (id, channels) in account_channels {
        let Some(email) = accounts.get(id).and_then(SlackUser::email) else {
            continue;
        };
        by_email
            .entry(email)
            .or_default()
            .extend(channels.iter().cloned());
    }

    let rows = by_email
        .into_iter()
        .map(|(email, mut channels)| {
            channels.sort();
            channels.dedup();
            UserChannelRow {
                email: email.to_string(),
                channels,
            }
        })
        .collect();

    UserChannelReport { rows }
}

impl fmt::Display for UserChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        for row in &self.rows {
            writeln!(f, " - {} belongs to {}", row.email, channel_list(&row.channels))?;
        }
        writeln!(f, "{SEPARATOR}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMembers {
    pub channel: String,
    /// Sorted alphabetically.
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUserReport {
    /// Sorted by channel name.
    pub channels: Vec<ChannelMembers>,
}

pub fn channel_user_report(
    accounts: &Accounts,
    account_channels: &AccountChannels,
) -> ChannelUserReport {
    let mut by_channel: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (id, channels) in account_channels {
        let Some(email) = accounts.get(id).and_then(SlackUser::email) else {
            continue;
        };
        for channel in channels {
            by_channel
                .entry(channel.as_str())
                .or_default()
                .push(email.to_string());
        }
    }

    let channels = by_channel
        .into_iter()
        .map(|(channel, mut emails)| {
            emails.sort();
            ChannelMembers {
                channel: channel.to_string(),
                emails,
            }
        })
        .collect();

    ChannelUserReport { channels }
}

impl fmt::Display for ChannelUserReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        for members in &self.channels {
            writeln!(f, "{SEPARATOR}")?;
            writeln!(f, "Members of #{}", members.channel)?;
            for email in &members.emails {
                writeln!(f, " - {email}")?;
            }
        }
        writeln!(f, "{SEPARATOR}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivateChannelReport {
    /// In the order Slack listed them.
    pub names: Vec<String>,
}

pub fn private_channel_report(channels: &[SlackChannel]) -> PrivateChannelReport {
    PrivateChannelReport {
        names: channels.iter().map(|channel| channel.name.clone()).collect(),
    }
}

impl fmt::Display for PrivateChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "Listing all (non-archived) private channels:")?;
        for name in &self.names {
            writeln!(f, "- #{name}")?;
        }
        writeln!(f, "{SEPARATOR}")
    }
}

fn channel_list(channels: &[String]) -> String {
    channels
        .iter()
        .map(|name| format!("#{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}
