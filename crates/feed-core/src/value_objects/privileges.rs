//! Feed capability set and the role/membership resolution boundary
//!
//! `resolve_privileges` is the only place that maps a guild role and a
//! membership status to capabilities. Everything downstream checks the
//! resulting [`FeedPrivileges`] and never branches on roles directly.

use bitflags::bitflags;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Capabilities a caller holds in one guild's feed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FeedPrivileges: u32 {
        /// Create posts and replies
        const POST               = 1 << 0;
        /// Pin and unpin posts
        const PIN_UNPIN          = 1 << 1;
        /// Close and reopen posts
        const CLOSE_REOPEN       = 1 << 2;
        /// Hard-delete posts
        const DELETE             = 1 << 3;
        /// Accept an answer on a question the caller did not author
        const ACCEPT_ON_BEHALF   = 1 << 4;

        /// Any capability that makes the caller a moderator
        const MODERATE = Self::PIN_UNPIN.bits()
            | Self::CLOSE_REOPEN.bits()
            | Self::DELETE.bits();
    }
}

impl FeedPrivileges {
    #[inline]
    pub fn can_post(self) -> bool {
        self.contains(Self::POST)
    }

    #[inline]
    pub fn can_pin_unpin(self) -> bool {
        self.contains(Self::PIN_UNPIN)
    }

    #[inline]
    pub fn can_close_reopen(self) -> bool {
        self.contains(Self::CLOSE_REOPEN)
    }

    #[inline]
    pub fn can_delete(self) -> bool {
        self.contains(Self::DELETE)
    }

    #[inline]
    pub fn can_accept_on_behalf(self) -> bool {
        self.contains(Self::ACCEPT_ON_BEHALF)
    }

    /// Whether the holder sees withheld scores
    #[inline]
    pub fn is_moderator(self) -> bool {
        self.intersects(Self::MODERATE)
    }

    /// Stable name of a single capability, used in error messages
    pub fn name(self) -> &'static str {
        if self == Self::POST {
            "canPost"
        } else if self == Self::PIN_UNPIN {
            "canPinUnpin"
        } else if self == Self::CLOSE_REOPEN {
            "canCloseReopen"
        } else if self == Self::DELETE {
            "canDelete"
        } else if self == Self::ACCEPT_ON_BEHALF {
            "canAcceptOnBehalf"
        } else {
            "multiple"
        }
    }
}

impl Default for FeedPrivileges {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for FeedPrivileges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#07b}", self.bits())
    }
}

/// Serialized as the boolean capability struct clients expect
impl Serialize for FeedPrivileges {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("FeedPrivileges", 5)?;
        s.serialize_field("can_post", &self.can_post())?;
        s.serialize_field("can_pin_unpin", &self.can_pin_unpin())?;
        s.serialize_field("can_close_reopen", &self.can_close_reopen())?;
        s.serialize_field("can_delete", &self.can_delete())?;
        s.serialize_field("can_accept_on_behalf", &self.can_accept_on_behalf())?;
        s.end()
    }
}

/// Role a user holds in a guild, owned by the external membership system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    #[default]
    Member,
    Expert,
    Moderator,
    Admin,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Expert => "expert",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored role name; unknown names fall back to `member`
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "expert" => Self::Expert,
            "moderator" => Self::Moderator,
            "admin" => Self::Admin,
            _ => Self::Member,
        }
    }
}

/// Status of a user's membership in a guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    #[default]
    None,
    Pending,
    Active,
    Suspended,
}

impl Membership {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "active" => Self::Active,
            "suspended" => Self::Suspended,
            _ => Self::None,
        }
    }

    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Map a role and membership status to feed capabilities
///
/// Only active members hold capabilities. Moderators can do everything
/// except hard-delete; admins hold the full set.
pub fn resolve_privileges(role: MemberRole, membership: Membership) -> FeedPrivileges {
    if !membership.is_active() {
        return FeedPrivileges::empty();
    }

    match role {
        MemberRole::Member | MemberRole::Expert => FeedPrivileges::POST,
        MemberRole::Moderator => {
            FeedPrivileges::POST
                | FeedPrivileges::PIN_UNPIN
                | FeedPrivileges::CLOSE_REOPEN
                | FeedPrivileges::ACCEPT_ON_BEHALF
        }
        MemberRole::Admin => FeedPrivileges::all(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_member_can_only_post() {
        let privileges = resolve_privileges(MemberRole::Member, Membership::Active);
        assert!(privileges.can_post());
        assert!(!privileges.can_pin_unpin());
        assert!(!privileges.can_accept_on_behalf());
        assert!(!privileges.is_moderator());
    }

    #[test]
    fn test_moderator_cannot_delete() {
        let privileges = resolve_privileges(MemberRole::Moderator, Membership::Active);
        assert!(privileges.can_pin_unpin());
        assert!(privileges.can_close_reopen());
        assert!(privileges.can_accept_on_behalf());
        assert!(!privileges.can_delete());
        assert!(privileges.is_moderator());
    }

    #[test]
    fn test_admin_holds_everything() {
        assert_eq!(
            resolve_privileges(MemberRole::Admin, Membership::Active),
            FeedPrivileges::all()
        );
    }

    #[test]
    fn test_inactive_membership_grants_nothing() {
        for membership in [Membership::None, Membership::Pending, Membership::Suspended] {
            assert!(resolve_privileges(MemberRole::Admin, membership).is_empty());
        }
    }

    #[test]
    fn test_capability_names() {
        assert_eq!(FeedPrivileges::POST.name(), "canPost");
        assert_eq!(FeedPrivileges::DELETE.name(), "canDelete");
        assert_eq!(FeedPrivileges::MODERATE.name(), "multiple");
    }

    #[test]
    fn test_serialize_as_flags() {
        let json = serde_json::to_value(FeedPrivileges::POST | FeedPrivileges::DELETE).unwrap();
        assert_eq!(json["can_post"], true);
        assert_eq!(json["can_delete"], true);
        assert_eq!(json["can_pin_unpin"], false);
    }

    #[test]
    fn test_role_and_membership_parsing() {
        assert_eq!(MemberRole::from_str_lossy("moderator"), MemberRole::Moderator);
        assert_eq!(MemberRole::from_str_lossy("owner"), MemberRole::Member);
        assert_eq!(Membership::from_str_lossy("active"), Membership::Active);
        assert_eq!(Membership::from_str_lossy("banned"), Membership::None);
    }
}
