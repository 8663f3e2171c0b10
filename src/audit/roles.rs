//! Role classification over raw account attributes.
//!
//! Every predicate other than [`is_active`] is false for inactive accounts.
//! Owner and admin are overlays; member, licensed and free partition the
//! remaining active accounts.

use std::fmt;

use crate::slack::{SLACKBOT_USER_ID, SlackUser};

pub fn is_active(user: &SlackUser) -> bool {
    !user.deleted && !user.is_bot && user.id != SLACKBOT_USER_ID
}

pub fn is_owner(user: &SlackUser) -> bool {
    is_active(user) && user.is_owner
}

pub fn is_admin(user: &SlackUser) -> bool {
    is_active(user) && user.is_admin
}

pub fn is_member(user: &SlackUser) -> bool {
    is_active(user) && !is_admin(user) && !is_licensed(user) && !is_free(user)
}

/// Multi-channel guest.
pub fn is_licensed(user: &SlackUser) -> bool {
    is_active(user) && !is_free(user) && user.is_restricted
}

/// Single-channel guest.
pub fn is_free(user: &SlackUser) -> bool {
    is_active(user) && user.is_ultra_restricted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Deactivated,
    Admin,
    Member,
    MultiChannelGuest,
    SingleChannelGuest,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Deactivated => "deactivated user",
            Role::Admin => "administrator",
            Role::Member => "full member",
            Role::MultiChannelGuest => "multichannel guest",
            Role::SingleChannelGuest => "singlechannel guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exclusive role of an account. Guest flags take precedence over the admin flag.
pub fn classify(user: &SlackUser) -> Role {
    if !is_active(user) {
        Role::Deactivated
    } else if is_free(user) {
        Role::SingleChannelGuest
    } else if is_licensed(user) {
        Role::MultiChannelGuest
    } else if is_member(user) {
        Role::Member
    } else {
        Role::Admin
    }
}

/// Per-role counts over a full, unfiltered directory listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleSummary {
    pub total: usize,
    pub owners: usize,
    pub admins: usize,
    pub members: usize,
    pub multi_channel_guests: usize,
    pub single_channel_guests: usize,
    pub deactivated: usize,
}

impl RoleSummary {
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a SlackUser>) -> Self {
        let mut summary = Self::default();
        for user in users {
            summary.total += 1;
            if is_owner(user) {
                summary.owners += 1;
            }
            match classify(user) {
                Role::Deactivated => summary.deactivated += 1,
                Role::Admin => summary.admins += 1,
                Role::Member => summary.members += 1,
                Role::MultiChannelGuest => summary.multi_channel_guests += 1,
                Role::SingleChannelGuest => summary.single_channel_guests += 1,
            }
        }
        summary
    }
}
