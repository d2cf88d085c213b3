//! Guild access - the externally resolved caller context
//!
//! Guild settings and memberships are owned by another system. The feed
//! reads them once per request, turns them into a [`FeedContext`] and
//! consults only the context afterwards.

use crate::entities::Author;
use crate::error::DomainError;
use crate::value_objects::{resolve_privileges, FeedPrivileges, MemberRole, Membership, Snowflake};

/// Feed-relevant guild settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    pub id: Snowflake,
    pub public_read: bool,
}

/// A user's membership record in a guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub display_name: String,
    pub role: MemberRole,
    pub membership: Membership,
    pub reputation: i32,
}

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Snowflake,
    pub display_name: String,
    pub role: MemberRole,
    pub membership: Membership,
    pub reputation: i32,
}

impl Viewer {
    /// Authenticated user with no membership record
    pub fn outsider(user_id: Snowflake) -> Self {
        Self {
            user_id,
            display_name: String::new(),
            role: MemberRole::Member,
            membership: Membership::None,
            reputation: 0,
        }
    }
}

impl From<MemberRecord> for Viewer {
    fn from(record: MemberRecord) -> Self {
        Self {
            user_id: record.user_id,
            display_name: record.display_name,
            role: record.role,
            membership: record.membership,
            reputation: record.reputation,
        }
    }
}

/// Who is asking, in which guild, with which capabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedContext {
    pub guild_id: Snowflake,
    pub viewer: Option<Viewer>,
    pub public_read: bool,
    pub privileges: FeedPrivileges,
}

impl FeedContext {
    pub fn new(settings: &GuildSettings, viewer: Option<Viewer>) -> Self {
        let privileges = viewer
            .as_ref()
            .map(|v| resolve_privileges(v.role, v.membership))
            .unwrap_or_default();

        Self {
            guild_id: settings.id,
            viewer,
            public_read: settings.public_read,
            privileges,
        }
    }

    #[inline]
    pub fn user_id(&self) -> Option<Snowflake> {
        self.viewer.as_ref().map(|v| v.user_id)
    }

    #[inline]
    pub fn is_member(&self) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|v| v.membership.is_active())
    }

    /// Reads need a public guild or an active membership
    pub fn ensure_can_read(&self) -> Result<(), DomainError> {
        if self.public_read || self.is_member() {
            return Ok(());
        }
        match self.viewer {
            None => Err(DomainError::Unauthorized),
            Some(_) => Err(DomainError::NotMember),
        }
    }

    /// Any authenticated caller
    pub fn require_viewer(&self) -> Result<&Viewer, DomainError> {
        self.viewer.as_ref().ok_or(DomainError::Unauthorized)
    }

    /// An authenticated, active member
    pub fn require_member(&self) -> Result<&Viewer, DomainError> {
        let viewer = self.require_viewer()?;
        if !viewer.membership.is_active() {
            return Err(DomainError::NotMember);
        }
        Ok(viewer)
    }

    /// An active member holding `capability`
    pub fn require(&self, capability: FeedPrivileges) -> Result<&Viewer, DomainError> {
        let viewer = self.require_member()?;
        if !self.privileges.contains(capability) {
            return Err(DomainError::Forbidden {
                capability: capability.name(),
            });
        }
        Ok(viewer)
    }

    /// Author snapshot for content written by the current viewer
    pub fn author(&self) -> Result<Author, DomainError> {
        let viewer = self.require_member()?;
        Ok(Author {
            id: viewer.user_id,
            display_name: viewer.display_name.clone(),
            role: viewer.role,
            reputation: viewer.reputation,
        })
    }
}
