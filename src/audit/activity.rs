//! Access log scan for accounts seen inside the trailing activity window.
//!
//! `team.accessLogs` is assumed to be ordered newest first across pages, so the
//! scan stops at the first entry at or before the cutoff. That ordering is not
//! verified; an out-of-order log would hide some active accounts.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::RecentActivity;
use crate::error::AuditError;
use crate::slack::SlackApi;

pub const DEFAULT_WINDOW_DAYS: u32 = 90;

pub fn activity_cutoff(now: DateTime<Utc>, window_days: u32) -> Result<i64, AuditError> {
    now.checked_sub_signed(Duration::days(i64::from(window_days)))
        .map(|cutoff| cutoff.timestamp())
        .ok_or(AuditError::WindowOutOfRange { days: window_days })
}

pub async fn scan_recent_activity(
    api: &dyn SlackApi,
    window_days: u32,
    max_pages: u32,
    now: DateTime<Utc>,
) -> Result<RecentActivity, AuditError> {
    let cutoff = activity_cutoff(now, window_days)?;
    info!(window_days, cutoff, "fetching access logs");

    let mut recent = RecentActivity::new();
    let mut entries = 0usize;

    for page in 0..max_pages {
        let logins = api.access_logs(page).await?;
        if logins.is_empty() {
            info!(entries, pages = page, "access log exhausted");
            return Ok(recent);
        }

        for login in logins {
            if login.date_last <= cutoff {
                info!(entries, pages = page + 1, "access log scan reached cutoff");
                return Ok(recent);
            }
            recent.entry(login.user_id).or_insert(login.date_last);
            entries += 1;
        }
        debug!(page, accounts = recent.len(), "access log page scanned");
    }

    Err(AuditError::PaginationExhausted {
        method: "team.accessLogs".to_string(),
        pages: max_pages,
    })
}
