use tracing::info;

use super::roles::{Role, RoleSummary, is_active};
use super::{Accounts, collect_cursor_pages};
use crate::error::AuditError;
use crate::slack::SlackApi;

#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    /// Active accounts only.
    pub accounts: Accounts,
    /// Counts over every account returned, deactivated ones included.
    pub summary: RoleSummary,
}

pub async fn fetch_accounts(
    api: &dyn SlackApi,
    max_pages: u32,
) -> Result<AccountDirectory, AuditError> {
    info!("fetching all users");
    let users =
        collect_cursor_pages("users.list", max_pages, |cursor| api.users_list(cursor)).await?;

    let summary = RoleSummary::from_users(&users);
    log_summary(&summary);

    let accounts = users
        .into_iter()
        .filter(is_active)
        .map(|user| (user.id.clone(), user))
        .collect();

    Ok(AccountDirectory { accounts, summary })
}

fn log_summary(summary: &RoleSummary) {
    info!("fetched {} users", summary.total);
    info!("- {} owners", summary.owners);
    for (count, role) in [
        (summary.admins, Role::Admin),
        (summary.members, Role::Member),
        (summary.multi_channel_guests, Role::MultiChannelGuest),
        (summary.single_channel_guests, Role::SingleChannelGuest),
        (summary.deactivated, Role::Deactivated),
    ] {
        info!("- {count} {role}s");
    }
}
