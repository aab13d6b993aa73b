//! Identity and permission types shared by the pipeline and the gateway adapter.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

snowflake!(
    /// Platform user id.
    UserId
);
snowflake!(
    /// Platform guild (server) id.
    GuildId
);
snowflake!(
    /// Platform channel id.
    ChannelId
);
snowflake!(
    /// Platform message id.
    MessageId
);

/// Permissions a command can require from the invoker or from the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    Administrator,
    ManageGuild,
    ManageMessages,
    SendMessages,
    EmbedLinks,
    AttachFiles,
    ReadMessageHistory,
}

impl Permission {
    /// Snake-case name, as shown to users.
    pub fn name(self) -> &'static str {
        match self {
            Permission::Administrator => "administrator",
            Permission::ManageGuild => "manage_guild",
            Permission::ManageMessages => "manage_messages",
            Permission::SendMessages => "send_messages",
            Permission::EmbedLinks => "embed_links",
            Permission::AttachFiles => "attach_files",
            Permission::ReadMessageHistory => "read_message_history",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of granted permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: Permission) {
        self.0.insert(permission);
    }

    /// Administrator implies every other permission.
    pub fn grants(&self, permission: Permission) -> bool {
        self.0.contains(&Permission::Administrator) || self.0.contains(&permission)
    }

    /// Permissions from `required` that this set does not grant, in order.
    pub fn missing(&self, required: &[Permission]) -> Vec<Permission> {
        required
            .iter()
            .copied()
            .filter(|p| !self.grants(*p))
            .collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Profile of a user as seen by command handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    /// Display tag, e.g. `name` or `name#1234`.
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Guild join time; absent outside guilds.
    pub joined_at: Option<DateTime<Utc>>,
    /// Role mentions (`<@&id>`), excluding the default role.
    pub roles: Vec<String>,
    /// Public badge names, e.g. `House Bravery`.
    pub badges: Vec<String>,
    pub bot: bool,
}

impl UserProfile {
    pub fn new(id: UserId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar_url: None,
            created_at,
            joined_at: None,
            roles: Vec::new(),
            badges: Vec::new(),
            bot: false,
        }
    }
}

/// Guild the command was invoked in.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildInfo {
    pub id: GuildId,
    pub name: String,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub member_count: u64,
    pub online_count: u64,
    pub boosters: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrator_grants_everything() {
        let set: PermissionSet = [Permission::Administrator].into_iter().collect();
        assert!(set.grants(Permission::ManageGuild));
        assert!(set.missing(&[Permission::EmbedLinks, Permission::ManageMessages]).is_empty());
    }

    #[test]
    fn test_missing_keeps_required_order() {
        let set: PermissionSet = [Permission::SendMessages].into_iter().collect();
        let missing = set.missing(&[
            Permission::ManageMessages,
            Permission::SendMessages,
            Permission::EmbedLinks,
        ]);
        assert_eq!(missing, vec![Permission::ManageMessages, Permission::EmbedLinks]);
    }

    #[test]
    fn test_snowflake_display() {
        assert_eq!(UserId(42).to_string(), "42");
        assert_eq!(GuildId::from(7).get(), 7);
    }
}
