//! Guild directory models (tables owned by the membership system)

use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct GuildModel {
    pub id: i64,
    pub public_read: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct GuildMemberModel {
    pub guild_id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub role: String,
    pub status: String,
    pub reputation: i32,
}
