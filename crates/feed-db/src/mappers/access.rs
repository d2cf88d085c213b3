//! Guild directory model -> entity mapper

use feed_core::entities::{GuildSettings, MemberRecord};
use feed_core::value_objects::{MemberRole, Membership, Snowflake};

use crate::models::{GuildMemberModel, GuildModel};

impl From<GuildModel> for GuildSettings {
    fn from(model: GuildModel) -> Self {
        GuildSettings {
            id: Snowflake::new(model.id),
            public_read: model.public_read,
        }
    }
}

impl From<GuildMemberModel> for MemberRecord {
    fn from(model: GuildMemberModel) -> Self {
        MemberRecord {
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            display_name: model.display_name,
            role: MemberRole::from_str_lossy(&model.role),
            membership: Membership::from_str_lossy(&model.status),
            reputation: model.reputation,
        }
    }
}
