use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub token: String,
    pub cmd_prefix: String,
    pub sql_server_ip: String,
    pub sql_server_port: u16,
    pub sql_server_username: String,
    pub sql_server_password: String,
    pub guild: GuildConfig,
    pub xp: XpConfig,
    pub unbelievaboat: UnbelievaBoatConfig,
    pub users: UsersConfig,
}

#[derive(Debug, Deserialize)]
pub struct GuildConfig {
    pub id: u64,
    pub roles: RolesConfig,
    pub channels: ChannelsConfig,
    pub webhooks: WebhooksConfig,
    /// Cumulative donation total -> reward role.
    pub donation_roles: BTreeMap<i64, u64>,
    /// Channels locked down while the economy bot is offline.
    pub dank_channels: Vec<u64>,
    pub appeals_url: String,
}

#[derive(Debug, Deserialize)]
pub struct RolesConfig {
    pub staff: u64,
    pub helper: u64,
    pub moderator: u64,
    pub afk_access: u64,
    pub blacklisted: u64,
    pub trading: u64,
    pub middleman: u64,
    pub middleman_trading: u64,
    pub staff_leave: u64,
    pub welcomer: u64,
    pub reviver: u64,
}

#[derive(Debug, Deserialize)]
pub struct ChannelsConfig {
    pub chat: u64,
    pub giveaways: u64,
    pub middleman: u64,
    pub scammer_banner: u64,
    pub outside_heists: u64,
    pub trading_rules: u64,
    pub readme: u64,
    pub reaction_roles: u64,
}

#[derive(Debug, Deserialize)]
pub struct WebhooksConfig {
    pub leave: String,
    pub blacklist: String,
}

#[derive(Debug, Deserialize)]
pub struct XpConfig {
    /// Minimum interval between XP grants for one user, in seconds.
    pub cooldown_seconds: u64,
    /// Maximum number of users tracked by the cooldown gate at once.
    #[serde(default = "default_cooldown_capacity")]
    pub cooldown_capacity: usize,
    /// Channels where messages earn XP.
    pub channels: Vec<u64>,
    /// Level threshold -> reward role.
    pub roles: BTreeMap<i64, u64>,
    /// Minimum level required to submit a topic photo.
    pub photo_min_level: i64,
}

fn default_cooldown_capacity() -> usize {
    100
}

#[derive(Debug, Deserialize)]
pub struct UnbelievaBoatConfig {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UsersConfig {
    pub dank_memer: u64,
    /// The modmail account users should DM to reach staff.
    pub contact: u64,
}
