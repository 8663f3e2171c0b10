//! In-memory Slack workspace for driving the audit pipeline in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AuditError;
use crate::slack::{
    AccessLogin, ChannelVisibility, CursorPage, SlackApi, SlackChannel, SlackProfile, SlackUser,
};

/// Listings are stored as pages; the cursor handed out is the next page index.
#[derive(Default)]
pub(crate) struct FakeSlack {
    pub(crate) users: Vec<Vec<SlackUser>>,
    pub(crate) public_channels: Vec<Vec<SlackChannel>>,
    pub(crate) private_channels: Vec<Vec<SlackChannel>>,
    pub(crate) members: HashMap<String, Vec<Vec<String>>>,
    pub(crate) access_pages: Vec<Vec<AccessLogin>>,
    pub(crate) failing_method: Option<&'static str>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeSlack {
    pub(crate) fn calls_to(&self, method: &str) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|call| call.as_str() == method)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    fn record(&self, method: &str) -> Result<(), AuditError> {
        self.calls.lock().expect("calls lock").push(method.to_string());
        if self.failing_method == Some(method) {
            return Err(AuditError::api(method, "fatal_error"));
        }
        Ok(())
    }
}

fn page_at<T: Clone>(pages: &[Vec<T>], cursor: Option<String>) -> CursorPage<T> {
    let index = cursor
        .as_deref()
        .map(|c| c.parse::<usize>().expect("fake cursor is a page index"))
        .unwrap_or(0);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next_cursor = (index + 1 < pages.len()).then(|| (index + 1).to_string());
    CursorPage { items, next_cursor }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn users_list(&self, cursor: Option<String>) -> Result<CursorPage<SlackUser>, AuditError> {
        self.record("users.list")?;
        Ok(page_at(&self.users, cursor))
    }

    async fn conversations_list(
        &self,
        visibility: ChannelVisibility,
        cursor: Option<String>,
    ) -> Result<CursorPage<SlackChannel>, AuditError> {
        self.record("conversations.list")?;
        let pages = match visibility {
            ChannelVisibility::Public => &self.public_channels,
            ChannelVisibility::Private => &self.private_channels,
        };
        Ok(page_at(pages, cursor))
    }

    async fn conversations_members(
        &self,
        channel_id: &str,
        cursor: Option<String>,
    ) -> Result<CursorPage<String>, AuditError> {
        self.record("conversations.members")?;
        let pages = self.members.get(channel_id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(page_at(pages, cursor))
    }

    async fn access_logs(&self, page: u32) -> Result<Vec<AccessLogin>, AuditError> {
        self.record("team.accessLogs")?;
        Ok(self
            .access_pages
            .get(page as usize)
            .cloned()
            .unwrap_or_default())
    }
}

pub(crate) fn user_with_email(id: &str, email: &str) -> SlackUser {
    SlackUser {
        id: id.to_string(),
        profile: SlackProfile {
            email: Some(email.to_string()),
        },
        ..Default::default()
    }
}

pub(crate) fn channel(id: &str, name: &str, num_members: u64) -> SlackChannel {
    SlackChannel {
        id: id.to_string(),
        name: name.to_string(),
        num_members,
    }
}

pub(crate) fn login(user_id: &str, date_last: i64) -> AccessLogin {
    AccessLogin {
        user_id: user_id.to_string(),
        date_last,
    }
}

pub(crate) fn pages_of(pages: Vec<Vec<&str>>) -> Vec<Vec<String>> {
    pages
        .into_iter()
        .map(|page| page.into_iter().map(str::to_string).collect())
        .collect()
}
