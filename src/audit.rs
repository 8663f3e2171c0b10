use std::collections::HashMap;
use std::future::Future;
use std::io::Write;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use tracing::info;

use crate::config::Config;
use crate::error::AuditError;
use crate::slack::{ChannelVisibility, CursorPage, SlackApi, SlackUser};

pub mod activity;
pub mod channels;
pub mod directory;
pub mod report;
pub mod roles;

#[cfg(test)]
pub(crate) mod testing;

pub use self::activity::scan_recent_activity;
pub use self::channels::{ChannelFilter, aggregate_members, list_channels};
pub use self::directory::{AccountDirectory, fetch_accounts};
pub use self::report::{
    InactiveCategory, channel_user_report, inactive_report, private_channel_report,
    under_utilized_report, user_channel_report,
};

/// Active accounts keyed by account id.
pub type Accounts = HashMap<String, SlackUser>;

/// Account id to the channel names it belongs to, in the order channels were
/// processed.
pub type AccountChannels = HashMap<String, Vec<String>>;

/// Account id to the most recent `date_last` seen inside the activity window.
pub type RecentActivity = HashMap<String, i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Inactive licensed and free users plus licensed users in fewer than 2 channels.
    Inactive,
    /// Channels with the users that belong to them.
    Channel,
    /// Users with the channels they belong to.
    User,
    /// Non-archived private channels.
    Private,
}

/// Drains a cursor-paginated listing, giving up after `max_pages` pages.
pub(crate) async fn collect_cursor_pages<T, F, Fut>(
    method: &str,
    max_pages: u32,
    mut fetch: F,
) -> Result<Vec<T>, AuditError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>, AuditError>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    for _ in 0..max_pages {
        let page = fetch(cursor.take()).await?;
        items.extend(page.items);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return Ok(items),
        }
    }
    Err(AuditError::PaginationExhausted {
        method: method.to_string(),
        pages: max_pages,
    })
}

/// Directory and public channel membership shared by the account reports.
async fn gather_memberships(
    api: &dyn SlackApi,
    channel_filter: &str,
    max_pages: u32,
) -> Result<(AccountDirectory, AccountChannels), AuditError> {
    let filter = ChannelFilter::new(channel_filter)?;
    let directory = fetch_accounts(api, max_pages).await?;
    info!(
        active = directory.accounts.len(),
        deactivated = directory.summary.deactivated,
        "directory loaded"
    );
    let channels = list_channels(api, ChannelVisibility::Public, &filter, max_pages).await?;
    let account_channels = aggregate_members(api, &channels, max_pages).await?;
    Ok((directory, account_channels))
}

/// Runs one report end to end, writing each section to `out` as soon as it is
/// ready.
pub async fn run<W: Write>(
    api: &dyn SlackApi,
    config: &Config,
    kind: ReportKind,
    channel_filter: &str,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<(), AuditError> {
    let max_pages = config.slack.max_pages;
    info!(report = ?kind, filter = channel_filter, "starting audit");

    match kind {
        ReportKind::Inactive => {
            let (directory, account_channels) =
                gather_memberships(api, channel_filter, max_pages).await?;
            let window_days = config.audit.window_days;
            let recent = scan_recent_activity(api, window_days, max_pages, now).await?;
            for category in [InactiveCategory::Licensed, InactiveCategory::Free] {
                let report = inactive_report(&directory.accounts, &recent, category, window_days);
                write!(out, "{report}")?;
            }
            write!(
                out,
                "{}",
                under_utilized_report(&directory.accounts, &account_channels)
            )?;
        }
        ReportKind::User => {
            let (directory, account_channels) =
                gather_memberships(api, channel_filter, max_pages).await?;
            write!(
                out,
                "{}",
                user_channel_report(&directory.accounts, &account_channels)
            )?;
        }
        ReportKind::Channel => {
            let (directory, account_channels) =
                gather_memberships(api, channel_filter, max_pages).await?;
            write!(
                out,
                "{}",
                channel_user_report(&directory.accounts, &account_channels)
            )?;
        }
        ReportKind::Private => {
            let channels = list_channels(
                api,
                ChannelVisibility::Private,
                &ChannelFilter::match_all(),
                max_pages,
            )
            .await?;
            write!(out, "{}", private_channel_report(&channels))?;
        }
    }

    out.flush()?;
    Ok(())
}
